//! Observability middleware for monitoring and debugging.
//!
//! This module provides middleware for:
//! - Distributed tracing with request IDs
//! - Structured logging with redacted sensitive headers

mod tracing;

pub use tracing::{
    create_propagate_request_id_layer, create_request_id_layer, create_sensitive_headers_layer,
    create_trace_layer,
};
