//! Bearer token middleware.
//!
//! Wrap any scope or resource with [`BearerAuthMiddlewareFactory`] to require a valid access token in the
//! `Authorization: Bearer <token>` header. The token is checked with the [`TokenIssuer`] registered as app data.
//! Requests without a valid access token are rejected with a 401.

use std::{pin::Pin, rc::Rc};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web,
    Error,
};
use futures::{
    future::{ok, Ready},
    Future,
};
use log::*;

use crate::{
    auth::{JwtClaims, TokenIssuer, TokenType},
    errors::{AuthError, ServerError},
};

#[derive(Default)]
pub struct BearerAuthMiddlewareFactory;

impl BearerAuthMiddlewareFactory {
    pub fn new() -> Self {
        Self
    }
}

impl<S, B> Transform<S, ServiceRequest> for BearerAuthMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = BearerAuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(BearerAuthMiddlewareService { service: Rc::new(service) })
    }
}

pub struct BearerAuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for BearerAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        Box::pin(async move {
            let claims = claims_from_request(&req)?;
            trace!("🔑️ Request to {} authorised for {}", req.path(), claims.username);
            service.call(req).await
        })
    }
}

fn claims_from_request(req: &ServiceRequest) -> Result<JwtClaims, ServerError> {
    let issuer = req.app_data::<web::Data<TokenIssuer>>().ok_or_else(|| {
        error!("🔑️ No token issuer has been configured. All authenticated requests will fail.");
        ServerError::ConfigurationError("No token issuer has been configured".into())
    })?;
    let token = bearer_token(req).ok_or(AuthError::MissingToken)?;
    let claims = issuer.validate(token, TokenType::Access).map_err(|e| {
        debug!("🔑️ Rejected bearer token for {}. {e}", req.path());
        e
    })?;
    Ok(claims)
}

fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() {
        Some(token.trim())
    } else {
        None
    }
}
