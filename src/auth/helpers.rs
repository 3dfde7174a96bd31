use actix_identity::{CookieIdentityPolicy, Identity, IdentityService};

use crate::errors::ServiceError;

const COOKIE_NAME: &str = "levelup-auth";

/// get the user_id of the current authenticated identity
/// returns Unauthorized when no identity is found or when it's malformed
pub fn get_user_id(id: &Identity) -> Result<i64, ServiceError> {
    match id.identity() {
        Some(identity) => identity.parse::<i64>().map_err(|_| {
            error!("malformed identity: {}", identity);
            ServiceError::Unauthorized
        }),
        None => Err(ServiceError::Unauthorized),
    }
}

/// remember the user id for the requests that follow
pub fn remember(id: &Identity, user_id: i64) {
    id.remember(user_id.to_string());
}

/// the middleware that signs and reads the identity cookie
pub fn identity_service(private_key: &[u8]) -> IdentityService<CookieIdentityPolicy> {
    IdentityService::new(
        CookieIdentityPolicy::new(private_key)
            .name(COOKIE_NAME)
            .path("/")
            .http_only(true)
            .secure(false),
    )
}
