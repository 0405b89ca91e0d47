//! Request body size limiting middleware.

use tower_http::limit::RequestBodyLimitLayer;

/// Default maximum request body size: 16MB
pub const DEFAULT_MAX_BODY_SIZE: usize = 16 * 1024 * 1024;

/// Additional headroom for multipart framing around an upload: 1MB
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Creates a request body size limit layer with a custom size.
///
/// # Arguments
///
/// * `max_size` - Maximum allowed request body size in bytes
pub fn create_body_limit_layer(max_size: usize) -> RequestBodyLimitLayer {
    RequestBodyLimitLayer::new(max_size)
}

/// Returns the request body limit that accommodates the upload policy.
///
/// The limit never goes below [`DEFAULT_MAX_BODY_SIZE`] and otherwise adds
/// headroom for multipart boundaries and metadata fields on top of the
/// largest accepted file.
#[must_use]
pub fn body_limit_for_uploads(max_upload_bytes: i64) -> usize {
    let policy_bytes = usize::try_from(max_upload_bytes).unwrap_or(0);
    DEFAULT_MAX_BODY_SIZE.max(policy_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_max_body_size() {
        assert_eq!(DEFAULT_MAX_BODY_SIZE, 16 * 1024 * 1024);
    }

    #[test]
    fn test_create_body_limit_layer() {
        let _layer = create_body_limit_layer(1024 * 1024); // 1MB
        // Layer creation should not panic
    }

    #[test]
    fn test_body_limit_floors_at_default() {
        // A small upload policy still allows the default body size
        assert_eq!(body_limit_for_uploads(1024), DEFAULT_MAX_BODY_SIZE);
    }

    #[test]
    fn test_body_limit_grows_with_policy() {
        let large_policy = 64 * 1024 * 1024;
        let limit = body_limit_for_uploads(large_policy as i64);
        assert!(limit > large_policy);
    }
}
