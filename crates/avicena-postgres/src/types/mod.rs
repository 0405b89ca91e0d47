//! Contains constraints, enumerations and other custom types.

mod constants;
mod constraint;
mod enums;
mod utilities;

pub use self::constants::attachment::RECENTLY_UPLOADED_HOURS;
pub use self::constraint::{AttachmentConstraints, ConstraintCategory, ConstraintViolation};
pub use self::enums::{AttachmentSource, OwnerKind};
pub use self::utilities::{HasCreatedAt, HasDeletedAt, HasUpdatedAt, is_within_duration};
