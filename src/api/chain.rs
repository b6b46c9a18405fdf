use actix_web::{HttpResponse, get, post, web};
use log::debug;

use super::error::ApiError;
use super::models::{
    AppState, DifficultyResponse, SetDifficultyRequest, ValidateResponse, VerifyQuery,
};
use super::validate;

/// Every block, genesis first.
#[get("/view_chain")]
pub async fn view_chain(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let records = AppState::reading(&state, |bc| Ok(bc.export())).await?;
    Ok(HttpResponse::Ok().json(records))
}

/// Check the chain; `?mode=strict` also re-checks proof-of-work.
#[get("/verify_chain")]
pub async fn verify_chain(
    state: web::Data<AppState>,
    query: web::Query<VerifyQuery>,
) -> Result<HttpResponse, ApiError> {
    let mode = query.into_inner().mode;
    let valid = AppState::reading(&state, move |bc| Ok(bc.validate(mode))).await?;
    debug!("GET /verify_chain - mode={mode:?} valid={valid}");
    Ok(HttpResponse::Ok().json(ValidateResponse { valid }))
}

/// Update PoW difficulty (affects future blocks only).
#[post("/set_difficulty")]
pub async fn set_difficulty(
    state: web::Data<AppState>,
    body: web::Json<SetDifficultyRequest>,
) -> Result<HttpResponse, ApiError> {
    let difficulty = validate::difficulty(body.into_inner().difficulty)?;
    AppState::writing(&state, move |bc| {
        bc.set_difficulty(difficulty);
        Ok(())
    })
    .await?;
    Ok(HttpResponse::Ok().json(DifficultyResponse {
        message: format!("Difficulty set to {difficulty}"),
        difficulty,
    }))
}
