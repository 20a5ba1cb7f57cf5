use actix_web::{get, HttpResponse, Responder};

use crate::{auth::CurrentAccount, models::AccountResponse};

/// The authenticated caller's own account.
#[get("/me")]
pub async fn me(current: CurrentAccount) -> impl Responder {
    HttpResponse::Ok().json(AccountResponse::from(&current.0))
}
