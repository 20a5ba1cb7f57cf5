use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage, ResponseError,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::{
    auth::TokenService,
    error::AppError,
    models::Account,
    state::AppState,
    store::{AccountStore, StoreError},
};

/// Message returned for every authentication failure on protected routes.
pub const UNAUTHORIZED_DETAIL: &str = "Could not validate credentials";

/// Why a request was not authenticated. Only logged; clients see a uniform 401.
#[derive(Debug, thiserror::Error)]
pub enum AuthRejection {
    #[error("missing credential")]
    MissingCredential,
    #[error("invalid or expired credential")]
    InvalidCredential,
    #[error("unknown subject")]
    UnknownSubject,
    #[error("inactive account")]
    InactiveAccount,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Extracts the token from an `Authorization: Bearer <token>` value.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Resolves the caller's account from the `Authorization` header value.
///
/// Steps: bearer extraction, token verification, subject lookup, active check.
/// The first failing step decides the rejection.
pub async fn authenticate(
    authorization: Option<&str>,
    tokens: &TokenService,
    accounts: &AccountStore,
) -> Result<Account, AuthRejection> {
    let token = authorization
        .and_then(bearer_token)
        .ok_or(AuthRejection::MissingCredential)?;

    let username = tokens
        .verify(token)
        .map_err(|_| AuthRejection::InvalidCredential)?;

    let account = accounts
        .find_by_username(&username)
        .await?
        .ok_or(AuthRejection::UnknownSubject)?;

    if !account.is_active {
        return Err(AuthRejection::InactiveAccount);
    }

    Ok(account)
}

/// Guards a scope: requests without a valid bearer token for an active account are
/// answered with 401 and never reach the handler. On success the resolved `Account`
/// is placed in the request extensions for [`crate::auth::CurrentAccount`].
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let state = match req.app_data::<web::Data<AppState>>().cloned() {
                Some(state) => state,
                None => {
                    return Ok(reject(
                        req,
                        AppError::Internal("AppState is not registered".into()),
                    ))
                }
            };

            let authorization = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);

            match authenticate(authorization.as_deref(), &state.tokens, &state.accounts).await {
                Ok(account) => {
                    req.extensions_mut().insert(account);
                    service
                        .call(req)
                        .await
                        .map(ServiceResponse::map_into_left_body)
                }
                Err(AuthRejection::Store(e)) => Ok(reject(req, AppError::Store(e))),
                Err(rejection) => {
                    log::debug!("Rejected {} {}: {}", req.method(), req.path(), rejection);
                    Ok(reject(
                        req,
                        AppError::Unauthorized(UNAUTHORIZED_DETAIL.into()),
                    ))
                }
            }
        })
    }
}

/// Answers the request directly, so outer middleware still sees a response.
fn reject<B>(req: ServiceRequest, error: AppError) -> ServiceResponse<EitherBody<B>> {
    let response = error.error_response();
    req.into_response(response).map_into_right_body()
}
