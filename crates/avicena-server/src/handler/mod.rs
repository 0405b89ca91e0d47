//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! Every route is registered through aide's [`ApiRouter`] so the served
//! OpenAPI document stays in sync with the actual handlers.
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler
//! [`ApiRouter`]: aide::axum::ApiRouter

mod attachments;
mod encounters;
mod error;
mod monitors;
mod patients;
pub mod request;
pub mod response;
mod transfers;

use aide::axum::ApiRouter;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
use crate::service::ServiceState;

/// Catch-all for paths no route matches.
#[inline]
async fn handler() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns an [`ApiRouter`] with all resource routes.
pub fn api_routes() -> ApiRouter<ServiceState> {
    ApiRouter::new()
        .merge(attachments::routes())
        .merge(encounters::routes())
        .merge(monitors::routes())
        .merge(patients::routes())
        .merge(transfers::routes())
        .fallback(handler)
}

#[cfg(test)]
mod test {
    use axum::http::StatusCode;

    use super::*;

    #[tokio::test]
    async fn fallback_answers_not_found() {
        let response = handler().await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
