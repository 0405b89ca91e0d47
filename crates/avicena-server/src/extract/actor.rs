//! Requesting actor extraction from forwarded identity headers.
//!
//! The surrounding hospital platform authenticates staff before requests reach
//! this service and forwards the staff account id in a trusted header. This
//! module extracts that id so uploads can be attributed to the person who made
//! them.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::handler::{Error, ErrorKind};

/// Name of the header carrying the authenticated staff account id.
pub const ACTOR_ID_HEADER: &str = "x-actor-id";

/// Requesting staff member forwarded by the gateway.
///
/// The header is optional: service-to-service calls carry no actor and the
/// extractor yields `None`. A header that is present but not a valid UUID is
/// rejected with a 400 response.
#[must_use]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Actor(pub Option<Uuid>);

impl Actor {
    /// Returns the actor id if the request carried one.
    #[inline]
    pub fn actor_id(&self) -> Option<Uuid> {
        self.0
    }
}

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(ACTOR_ID_HEADER) else {
            return Ok(Self(None));
        };

        let actor_id = value
            .to_str()
            .ok()
            .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
            .ok_or_else(|| {
                ErrorKind::BadRequest
                    .with_message("Invalid actor header")
                    .with_context(format!(
                        "The '{ACTOR_ID_HEADER}' header must contain a valid UUID"
                    ))
            })?;

        Ok(Self(Some(actor_id)))
    }
}

impl aide::OperationInput for Actor {}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn request_parts(actor_header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = actor_header {
            builder = builder.header(ACTOR_ID_HEADER, value);
        }
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[tokio::test]
    async fn missing_header_yields_no_actor() {
        let mut parts = request_parts(None);
        let actor = Actor::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(actor.actor_id(), None);
    }

    #[tokio::test]
    async fn valid_header_yields_actor_id() {
        let staff_id = Uuid::new_v4();
        let mut parts = request_parts(Some(&staff_id.to_string()));

        let actor = Actor::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(actor.actor_id(), Some(staff_id));
    }

    #[tokio::test]
    async fn malformed_header_is_rejected() {
        let mut parts = request_parts(Some("not-a-uuid"));

        let error = Actor::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::BadRequest);
    }
}
