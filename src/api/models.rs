use crate::blockchain::{BlockRecord, Blockchain, ValidationMode};
use actix_web::web;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::error::ApiError;

/// Shared application state: the one ledger of this process.
///
/// Mutations take the write lock for their whole duration (mining included),
/// reads share the read lock. Handlers go through [`AppState::reading`] and
/// [`AppState::writing`] so lock waits happen on the blocking pool, never on an
/// async worker.
pub struct AppState {
    pub blockchain: RwLock<Blockchain>,
}

impl AppState {
    pub fn new(blockchain: Blockchain) -> Self {
        Self {
            blockchain: RwLock::new(blockchain),
        }
    }

    pub fn read(&self) -> Result<RwLockReadGuard<'_, Blockchain>, ApiError> {
        self.blockchain
            .read()
            .map_err(|_| ApiError::Internal("blockchain lock poisoned".into()))
    }

    pub fn write(&self) -> Result<RwLockWriteGuard<'_, Blockchain>, ApiError> {
        self.blockchain
            .write()
            .map_err(|_| ApiError::Internal("blockchain lock poisoned".into()))
    }

    /// Run `f` under the read lock on the blocking pool.
    pub async fn reading<R, F>(state: &web::Data<Self>, f: F) -> Result<R, ApiError>
    where
        F: FnOnce(&Blockchain) -> Result<R, ApiError> + Send + 'static,
        R: Send + 'static,
    {
        let state = state.clone();
        web::block(move || {
            let bc = state.read()?;
            f(&bc)
        })
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
    }

    /// Run `f` under the write lock on the blocking pool.
    pub async fn writing<R, F>(state: &web::Data<Self>, f: F) -> Result<R, ApiError>
    where
        F: FnOnce(&mut Blockchain) -> Result<R, ApiError> + Send + 'static,
        R: Send + 'static,
    {
        let state = state.clone();
        web::block(move || {
            let mut bc = state.write()?;
            f(&mut bc)
        })
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
    }
}

/* ---------- Requests ---------- */
// Fields stay loose JSON values so the handlers can tell "absent" from
// "wrong type" from "out of range".

#[derive(Debug, Deserialize)]
pub struct SetDifficultyRequest {
    pub difficulty: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct AddTransactionRequest {
    pub transaction: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct TamperRequest {
    pub index: Option<Value>,
    pub new_data: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct VerifyQuery {
    #[serde(default)]
    pub mode: ValidationMode,
}

/* ---------- Responses ---------- */

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct DifficultyResponse {
    pub message: String,
    pub difficulty: u32,
}

#[derive(Serialize)]
pub struct BlockResponse {
    pub message: String,
    pub block: BlockRecord,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub blockchain_length: usize,
    pub difficulty: u32,
}
