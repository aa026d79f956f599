/// JWT authentication for Bearer token validation.
///
/// Two entry points share the same verification logic:
/// - `JwtAuthMiddleware`, wrapped around scopes where every route is
///   protected; it stores the verified identity in request extensions.
/// - `AuthenticatedUser` as an extractor for mixed public/protected
///   scopes; it reads the extension if the middleware already ran and
///   otherwise validates the Authorization header itself.
use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    http::header::HeaderMap,
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;
use uuid::Uuid;

use crate::security::jwt;

/// Verified user identity extracted from a JWT
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub Uuid);

/// Validate the Authorization header and extract the caller's identity.
fn authenticate(headers: &HeaderMap) -> Result<AuthenticatedUser, Error> {
    let auth_header = headers
        .get("Authorization")
        .ok_or_else(|| ErrorUnauthorized("Missing Authorization header"))?
        .to_str()
        .map_err(|_| ErrorUnauthorized("Invalid Authorization header"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ErrorUnauthorized("Invalid Authorization scheme, expected Bearer"))?;

    let token_data = jwt::validate_token(token).map_err(|e| {
        tracing::debug!("Token validation failed: {}", e);
        ErrorUnauthorized("Invalid or expired token")
    })?;

    let user_id = Uuid::parse_str(&token_data.claims.sub)
        .map_err(|_| ErrorUnauthorized("Invalid user ID in token"))?;

    Ok(AuthenticatedUser(user_id))
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        if let Some(user) = req.extensions().get::<AuthenticatedUser>().copied() {
            return ready(Ok(user));
        }
        ready(authenticate(req.headers()))
    }
}

/// JWT authentication middleware factory
pub struct JwtAuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddlewareService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(JwtAuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct JwtAuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            // Finish header reads before touching extensions_mut; both
            // borrow the same RefCell-backed request state.
            let user = authenticate(req.headers())?;
            req.extensions_mut().insert(user);

            service.call(req).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::{HeaderName, HeaderValue};

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("authorization"),
            HeaderValue::from_str(value).unwrap(),
        );
        headers
    }

    #[test]
    fn test_missing_header_rejected() {
        assert!(authenticate(&HeaderMap::new()).is_err());
    }

    #[test]
    fn test_wrong_scheme_rejected() {
        let headers = headers_with_auth("Basic dXNlcjpwYXNz");
        assert!(authenticate(&headers).is_err());
    }

    #[test]
    fn test_valid_token_accepted() {
        jwt::initialize_keys("test-secret-for-unit-tests").unwrap();
        let user_id = Uuid::new_v4();
        let token = jwt::generate_token(user_id, "a@example.com", "alice", 3600).unwrap();

        let headers = headers_with_auth(&format!("Bearer {}", token));
        assert_eq!(authenticate(&headers).unwrap(), AuthenticatedUser(user_id));
    }
}
