/// HTTP middleware utilities for space-service
///
/// Authentication itself happens upstream: the API gateway validates
/// the bearer token and forwards the verified identity as
/// `X-User-Id` / `X-User-Role` headers. This module only extracts
/// those headers into a typed requester identity.
use actix_web::{error::ErrorUnauthorized, Error, FromRequest, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::domain::models::Role;

/// Verified requester identity forwarded by the gateway.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub role: Role,
}

impl AuthenticatedUser {
    fn from_headers(req: &HttpRequest) -> Result<Self, Error> {
        let id_header = req
            .headers()
            .get("X-User-Id")
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| ErrorUnauthorized("Missing X-User-Id header"))?;

        let id = Uuid::parse_str(id_header)
            .map_err(|_| ErrorUnauthorized("Invalid user ID"))?;

        // Absent role header means a regular user; only an explicit
        // "admin" grants elevated permissions.
        let role = match req.headers().get("X-User-Role").and_then(|h| h.to_str().ok()) {
            Some("admin") => Role::Admin,
            _ => Role::User,
        };

        Ok(AuthenticatedUser { id, role })
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(AuthenticatedUser::from_headers(req))
    }
}
