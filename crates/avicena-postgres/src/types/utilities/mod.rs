//! Utility traits and helpers shared by the model types.

mod time_helpers;

pub use self::time_helpers::{
    HasCreatedAt, HasDeletedAt, HasUpdatedAt, constants, is_within_duration,
};
