use actix_web::{HttpResponse, get, web};

use super::error::ApiError;
use super::models::{AppState, HealthResponse};

#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let (blockchain_length, difficulty) =
        AppState::reading(&state, |bc| Ok((bc.len(), bc.difficulty()))).await?;
    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "healthy",
        blockchain_length,
        difficulty,
    }))
}
