use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::middleware::UNAUTHORIZED_DETAIL;
use crate::error::AppError;
use crate::models::Account;

/// The account resolved by `AuthMiddleware` for the current request.
///
/// Handlers take their owner id from here and nowhere else. Used outside a scope
/// wrapped by `AuthMiddleware`, extraction fails with 401.
#[derive(Debug, Clone)]
pub struct CurrentAccount(pub Account);

impl CurrentAccount {
    pub fn id(&self) -> i64 {
        self.0.id
    }
}

impl FromRequest for CurrentAccount {
    type Error = ActixError; // AppError will be converted into ActixError via ResponseError
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Account>().cloned() {
            Some(account) => ready(Ok(CurrentAccount(account))),
            None => {
                log::warn!("No authenticated account on {}", req.path());
                ready(Err(AppError::Unauthorized(UNAUTHORIZED_DETAIL.into()).into()))
            }
        }
    }
}
