//! Enhanced HTTP request extractors with improved error handling and validation.
//!
//! This module provides custom Axum extractors that enhance the default
//! functionality with better error messages, validation, logging, and type
//! safety. All extractors are designed to be drop-in replacements for their
//! standard Axum counterparts while providing additional features.
//!
//! # Extractor Categories
//!
//! ## Request Identity
//!
//! - [`Actor`] - Authenticated staff account id forwarded by the gateway
//!
//! ## Request Data Extraction
//!
//! - [`Json`] - Enhanced JSON deserialization with better error messages
//! - [`ValidateJson`] - JSON extraction with automatic validation
//! - [`Path`] - Path parameter extraction with detailed error context
//! - [`Query`] - Query parameter extraction with enhanced error messages
//! - [`Multipart`] - Multipart form extraction with improved error handling

// Request Identity
mod actor;

// Request Data Extraction
pub mod reject;

pub use crate::extract::actor::{ACTOR_ID_HEADER, Actor};
pub use crate::extract::reject::{Json, Multipart, Path, Query, ValidateJson};
