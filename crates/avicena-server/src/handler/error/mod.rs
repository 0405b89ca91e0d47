//! [`Error`], [`ErrorKind`] and [`Result`].

mod attach_error;
mod http_error;
mod pg_attachment;
mod pg_error;

pub use http_error::{Error, ErrorKind, Result};
