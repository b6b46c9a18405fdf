use actix_web::{HttpResponse, post, web};

use super::error::ApiError;
use super::models::{AppState, BlockResponse, TamperRequest};
use super::validate;

/// Rewrite a block's data after the fact and recompute its hash.
#[post("/tamper_block")]
pub async fn tamper_block(
    state: web::Data<AppState>,
    body: web::Json<TamperRequest>,
) -> Result<HttpResponse, ApiError> {
    let TamperRequest { index, new_data } = body.into_inner();

    let (index, block) = AppState::writing(&state, move |bc| {
        let (index, new_data) = validate::tamper(index, new_data, bc.len())?;
        let block = bc.tamper(index, new_data)?.export();
        Ok((index, block))
    })
    .await?;

    Ok(HttpResponse::Ok().json(BlockResponse {
        message: format!("Block {index} tampered successfully"),
        block,
    }))
}
