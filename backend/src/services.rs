//! Document service: loading, saving and summarizing stored user documents.
//!
//! Every incoming document goes through the same codec the client logic
//! uses, so only documents that decode cleanly are ever stored.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use shared::{SaveResponse, StatisticsResponse, UserDocument};
use tracing::{info, warn};

use crate::db::DbConnection;
use crate::domain::{self, DecodeError, SessionState};
use crate::save_gate::SaveGate;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("Document belongs to {found:?}, not {expected:?}")]
    LoginMismatch { expected: String, found: String },
    #[error("No document stored for {0:?}")]
    UnknownLogin(String),
    #[error("Saving too often, retry in {} ms", .retry_after.as_millis())]
    Throttled { retry_after: Duration },
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

#[derive(Clone)]
pub struct DocumentService {
    db: DbConnection,
    save_gate: Arc<Mutex<SaveGate>>,
}

impl DocumentService {
    pub fn new(db: DbConnection, min_save_interval: Duration) -> Self {
        Self {
            db,
            save_gate: Arc::new(Mutex::new(SaveGate::new(min_save_interval))),
        }
    }

    /// Decode the stored document of `login`
    pub async fn load(&self, login: &str) -> Result<SessionState, ServiceError> {
        let stored = self
            .db
            .get_document(login)
            .await?
            .ok_or_else(|| ServiceError::UnknownLogin(login.to_string()))?;

        Ok(domain::load_from_document(&stored.document)?)
    }

    /// The stored document in its canonical wire form
    pub async fn load_document(&self, login: &str) -> Result<UserDocument, ServiceError> {
        let state = self.load(login).await?;
        Ok(domain::encode(&state))
    }

    /// Validate and store a document posted by the client.
    ///
    /// A document without a login is taken to belong to `login`; one naming a
    /// different user is refused.
    pub async fn save(&self, login: &str, raw: &str) -> Result<SaveResponse, ServiceError> {
        let mut state = domain::load_from_document(raw)?;

        if state.user.login.trim().is_empty() {
            state.user.login = login.to_string();
        } else if state.user.login != login {
            return Err(ServiceError::LoginMismatch {
                expected: login.to_string(),
                found: state.user.login.clone(),
            });
        }

        let document = domain::to_document(&state).map_err(anyhow::Error::from)?;
        self.pass_save_gate(login)?;

        let saved_at = chrono::Utc::now().to_rfc3339();
        if let Err(e) = self.db.put_document(login, &document, &saved_at).await {
            // the save never landed, so it must not count against the gate
            self.gate().forget(login);
            return Err(ServiceError::Storage(e));
        }

        info!(
            "Saved document for {}: {} incomes, {} expenses",
            login,
            state.ledger.incomes.len(),
            state.ledger.expenses.len()
        );

        Ok(SaveResponse {
            login: login.to_string(),
            saved_at,
            income_count: state.ledger.incomes.len(),
            expense_count: state.ledger.expenses.len(),
        })
    }

    fn gate(&self) -> MutexGuard<'_, SaveGate> {
        self.save_gate
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn pass_save_gate(&self, login: &str) -> Result<(), ServiceError> {
        let now = Instant::now();
        let mut gate = self.gate();

        if gate.try_pass(login, now) {
            Ok(())
        } else {
            let retry_after = gate.retry_after(login, now);
            warn!("Save for {} rejected, retry in {:?}", login, retry_after);
            Err(ServiceError::Throttled { retry_after })
        }
    }

    /// Monthly totals and savings allocation in the user's display currency
    pub async fn statistics(&self, login: &str) -> Result<StatisticsResponse, ServiceError> {
        let state = self.load(login).await?;
        let totals = state.totals();

        Ok(StatisticsResponse {
            login: login.to_string(),
            currency: state.user.checked_curr.display_code().to_string(),
            income_total: totals.income_total,
            expense_total: totals.expense_total,
            net: totals.net,
            allocation: state.allocation(),
            slider: state.allocation_slider(),
        })
    }

    pub async fn delete(&self, login: &str) -> Result<(), ServiceError> {
        if self.db.delete_document(login).await? {
            self.gate().forget(login);
            info!("Deleted document for {}", login);
            Ok(())
        } else {
            Err(ServiceError::UnknownLogin(login.to_string()))
        }
    }

    pub async fn list_logins(&self) -> Result<Vec<String>, ServiceError> {
        Ok(self.db.list_logins().await?)
    }
}
