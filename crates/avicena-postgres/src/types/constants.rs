//! Constants used by models and queries throughout the crate.

/// Constants related to attachment lifecycle.
pub mod attachment {
    /// Number of hours within which an attachment counts as recently uploaded.
    pub const RECENTLY_UPLOADED_HOURS: i64 = 1;
}
