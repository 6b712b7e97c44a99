//! API token authentication
//!
//! `Authorization: Token <key>` (or `Bearer <key>`) is resolved to a user and
//! stored in the request extensions. A request without the header continues
//! anonymously; a malformed header or unknown token is rejected with 401.

use actix_service::{Service, Transform};
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
    body::EitherBody,
    dev::{Payload, ServiceRequest, ServiceResponse},
    http::{Method, header::AUTHORIZATION},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::errors::FoodgramError;
use crate::storage::{SeaOrmStorage, User};

/// 请求扩展中保存的已认证用户
#[derive(Clone, Debug)]
struct AuthenticatedUser(User);

/// 从 Authorization header 提取令牌
///
/// - `None`：没有 header（匿名）
/// - `Some(Err(()))`：header 格式不正确
fn extract_token(value: &str) -> Option<Result<&str, ()>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let token = value
        .strip_prefix("Token ")
        .or_else(|| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    Some(token.ok_or(()))
}

/// Token authentication middleware
#[derive(Clone)]
pub struct TokenAuth {
    storage: Arc<SeaOrmStorage>,
}

impl TokenAuth {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }
}

impl<S, B> Transform<S, ServiceRequest> for TokenAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = TokenAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TokenAuthMiddleware {
            service: Rc::new(service),
            storage: self.storage.clone(),
        }))
    }
}

pub struct TokenAuthMiddleware<S> {
    service: Rc<S>,
    storage: Arc<SeaOrmStorage>,
}

impl<S, B> TokenAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    fn reject(req: ServiceRequest, err: FoodgramError) -> ServiceResponse<EitherBody<B>> {
        debug!("Token authentication rejected {}: {}", req.path(), err);
        let response = err.error_response().map_into_right_body();
        req.into_response(response)
    }
}

impl<S, B> Service<ServiceRequest> for TokenAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_service::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let storage = self.storage.clone();

        Box::pin(async move {
            // CORS 预检直接放行
            if req.method() == Method::OPTIONS {
                return service.call(req).await.map(|res| res.map_into_left_body());
            }

            let header = req
                .headers()
                .get(AUTHORIZATION)
                .map(|h| h.to_str().map(str::to_owned));

            let token = match header {
                None => None,
                Some(Err(_)) => {
                    return Ok(Self::reject(
                        req,
                        FoodgramError::unauthorized("Invalid Authorization header"),
                    ));
                }
                Some(Ok(raw)) => match extract_token(&raw) {
                    None => None,
                    Some(Ok(token)) => Some(token.to_string()),
                    Some(Err(())) => {
                        return Ok(Self::reject(
                            req,
                            FoodgramError::unauthorized("Invalid Authorization header"),
                        ));
                    }
                },
            };

            if let Some(token) = token {
                match storage.find_user_by_token(&token).await {
                    Ok(Some(user)) => {
                        trace!("Authenticated user {} for {}", user.id, req.path());
                        req.extensions_mut().insert(AuthenticatedUser(user));
                    }
                    Ok(None) => {
                        return Ok(Self::reject(
                            req,
                            FoodgramError::unauthorized("Invalid token"),
                        ));
                    }
                    Err(e) => return Ok(Self::reject(req, e)),
                }
            }

            service.call(req).await.map(|res| res.map_into_left_body())
        })
    }
}

/// 必须已认证的用户；匿名请求返回 401
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

impl FromRequest for CurrentUser {
    type Error = FoodgramError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let user = req
            .extensions()
            .get::<AuthenticatedUser>()
            .map(|u| CurrentUser(u.0.clone()))
            .ok_or_else(|| {
                FoodgramError::unauthorized("Authentication credentials were not provided")
            });
        ready(user)
    }
}

/// 可选用户；匿名请求得到 `None`
#[derive(Clone, Debug)]
pub struct MaybeUser(pub Option<User>);

impl MaybeUser {
    pub fn user(&self) -> Option<&User> {
        self.0.as_ref()
    }
}

impl FromRequest for MaybeUser {
    type Error = FoodgramError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let user = req
            .extensions()
            .get::<AuthenticatedUser>()
            .map(|u| u.0.clone());
        ready(Ok(MaybeUser(user)))
    }
}

#[cfg(test)]
mod tests {
    use super::extract_token;

    #[test]
    fn test_extract_token_variants() {
        assert_eq!(extract_token("Token abc123"), Some(Ok("abc123")));
        assert_eq!(extract_token("Bearer abc123"), Some(Ok("abc123")));
        assert_eq!(extract_token(""), None);
        assert_eq!(extract_token("Basic dXNlcjpwYXNz"), Some(Err(())));
        assert_eq!(extract_token("Token "), Some(Err(())));
    }
}
