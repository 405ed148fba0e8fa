use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use uuid::Uuid;

use crate::errors::AppError;
use crate::identity::{bearer_token, IdentityResolver};

pub const SESSION_COOKIE: &str = "token";

/// The caller, resolved from a bearer token or the session cookie.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub id: Uuid,
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
    let resolver = req
        .app_data::<web::Data<dyn IdentityResolver>>()
        .ok_or_else(|| AppError::Internal("identity resolver is not configured".to_string()))?;

    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token)
        .map(str::to_string)
        .or_else(|| req.cookie(SESSION_COOKIE).map(|c| c.value().to_string()))
        .ok_or(AppError::Unauthorized)?;

    resolver
        .resolve(&token)
        .map(|id| AuthenticatedUser { id })
        .ok_or(AppError::Unauthorized)
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
