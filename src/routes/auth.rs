use crate::{
    auth::{LoginForm, SignupRequest, TokenResponse},
    error::AppError,
    models::AccountResponse,
    state::AppState,
    store::accounts::{EMAIL_TAKEN, USERNAME_TAKEN},
};
use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

/// Create a new account
///
/// Username conflicts are reported before email conflicts. The response never
/// includes the password hash.
#[post("/signup")]
pub async fn signup(
    state: web::Data<AppState>,
    payload: web::Json<SignupRequest>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    if state
        .accounts
        .find_by_username(&payload.username)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(USERNAME_TAKEN.into()));
    }

    if state.accounts.find_by_email(&payload.email).await?.is_some() {
        return Err(AppError::Conflict(EMAIL_TAKEN.into()));
    }

    let account = state
        .accounts
        .create_account(&payload.username, &payload.email, &payload.password)
        .await?;
    log::info!("Created account {} ({})", account.id, account.username);

    Ok(HttpResponse::Ok().json(AccountResponse::from(&account)))
}

/// Obtain an access token
///
/// Takes form-encoded `username` and `password`; answers 401 for any mismatch.
#[post("/token")]
pub async fn login(
    state: web::Data<AppState>,
    form: web::Form<LoginForm>,
) -> Result<impl Responder, AppError> {
    let account = state
        .accounts
        .verify_credentials(&form.username, &form.password)
        .await?
        .ok_or_else(|| {
            log::info!("Failed login for {:?}", form.username);
            AppError::Unauthorized("Incorrect username or password".into())
        })?;

    let access_token = state.tokens.issue_access_token(&account.username)?;
    log::info!("Issued access token for account {}", account.id);

    Ok(HttpResponse::Ok().json(TokenResponse::bearer(access_token)))
}
