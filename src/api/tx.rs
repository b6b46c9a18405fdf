use actix_web::{HttpResponse, post, web};
use log::{debug, info};

use super::error::ApiError;
use super::models::{AddTransactionRequest, AppState, BlockResponse};
use super::validate;
use crate::blockchain::{Block, now_timestamp};

/// Wrap one transaction in a new block, mine it and append it.
///
/// Mining is CPU-bound, so it runs on the blocking pool while holding the
/// write lock: linking to the tail, mining and appending happen as one step.
#[post("/add_transaction")]
pub async fn add_transaction(
    state: web::Data<AppState>,
    body: web::Json<AddTransactionRequest>,
) -> Result<HttpResponse, ApiError> {
    let transaction = validate::transaction(body.into_inner().transaction)?;
    debug!("POST /add_transaction - received {transaction}");

    let (report, block) = AppState::writing(&state, move |bc| {
        let candidate = Block::new(
            bc.next_index(),
            now_timestamp(),
            vec![transaction],
            bc.last_block().hash.clone(),
        );
        let report = bc.add_block(candidate)?;
        Ok((report, bc.last_block().export()))
    })
    .await?;

    info!(
        "POST /add_transaction - block #{} sealed (hash={}, difficulty={}, nonce={}, attempts={}, {} ms)",
        report.index,
        report.hash,
        report.difficulty,
        report.nonce,
        report.attempts,
        report.elapsed.as_millis()
    );

    Ok(HttpResponse::Ok().json(BlockResponse {
        message: "Transaction added successfully".to_string(),
        block,
    }))
}
