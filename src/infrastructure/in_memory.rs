use crate::domain::ports::{PaymentProvider, SettlementStore};
use crate::domain::settlement::{
    PaymentHandle, PaymentOutcome, PaymentRequest, PaymentStatus,
};
use crate::error::{Result, SettlementError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// An in-memory payment rail with scripted behavior.
///
/// Backs dry runs of the CLI and the engine tests. Shared state lives
/// behind `Arc<RwLock<..>>`, so clones observe the same payments and
/// query counters.
#[derive(Default, Clone)]
pub struct InMemoryProvider {
    confirm_after: Option<u32>,
    reject_payments: bool,
    fail_status_queries: bool,
    /// handle -> transaction hash assigned at pay time
    payments: Arc<RwLock<HashMap<String, String>>>,
    /// handle -> number of status queries observed
    queries: Arc<RwLock<HashMap<String, u32>>>,
}

impl InMemoryProvider {
    /// A provider whose payments confirm on the `attempts`-th status query.
    pub fn confirming_after(attempts: u32) -> Self {
        Self {
            confirm_after: Some(attempts),
            ..Self::default()
        }
    }

    /// A provider whose payments never confirm.
    pub fn never_confirming() -> Self {
        Self::default()
    }

    /// A provider that rejects every payment submission.
    pub fn rejecting() -> Self {
        Self {
            reject_payments: true,
            ..Self::default()
        }
    }

    /// A provider whose status endpoint always errors.
    pub fn failing_status() -> Self {
        Self {
            confirm_after: Some(1),
            fail_status_queries: true,
            ..Self::default()
        }
    }

    pub async fn payments_issued(&self) -> u32 {
        self.payments.read().await.len() as u32
    }

    pub async fn status_queries(&self, handle: &PaymentHandle) -> u32 {
        self.queries
            .read()
            .await
            .get(handle.as_str())
            .copied()
            .unwrap_or(0)
    }

    pub async fn total_status_queries(&self) -> u32 {
        self.queries.read().await.values().sum()
    }
}

#[async_trait]
impl PaymentProvider for InMemoryProvider {
    async fn pay(&self, _request: &PaymentRequest) -> Result<PaymentHandle> {
        if self.reject_payments {
            return Err(SettlementError::Provider(
                "payment rejected: insufficient funds".to_string(),
            ));
        }

        let mut payments = self.payments.write().await;
        let n = payments.len() as u64 + 1;
        let handle = format!("pay_{n}");
        payments.insert(handle.clone(), format!("0x{n:064x}"));
        Ok(PaymentHandle::new(handle))
    }

    async fn payment_status(&self, handle: &PaymentHandle) -> Result<PaymentStatus> {
        let count = {
            let mut queries = self.queries.write().await;
            let count = queries.entry(handle.as_str().to_string()).or_insert(0);
            *count += 1;
            *count
        };

        if self.fail_status_queries {
            return Err(SettlementError::Provider(
                "status endpoint unavailable".to_string(),
            ));
        }

        let payments = self.payments.read().await;
        let hash = payments.get(handle.as_str()).ok_or_else(|| {
            SettlementError::Provider(format!("unknown payment: {handle}"))
        })?;

        match self.confirm_after {
            Some(threshold) if count >= threshold => Ok(PaymentStatus::Confirmed {
                hash: hash.clone(),
            }),
            _ => Ok(PaymentStatus::Pending),
        }
    }
}

/// A thread-safe in-memory store for settlement records.
///
/// Uses `Arc<RwLock<HashMap<String, PaymentOutcome>>>` to allow shared
/// concurrent access from independent settlement flows.
#[derive(Default, Clone)]
pub struct InMemorySettlementStore {
    outcomes: Arc<RwLock<HashMap<String, PaymentOutcome>>>,
}

impl InMemorySettlementStore {
    /// Creates a new, empty in-memory settlement store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettlementStore for InMemorySettlementStore {
    async fn store(&self, outcome: PaymentOutcome) -> Result<()> {
        let mut outcomes = self.outcomes.write().await;
        outcomes.insert(outcome.payment_id.clone(), outcome);
        Ok(())
    }

    async fn get(&self, payment_id: &str) -> Result<Option<PaymentOutcome>> {
        let outcomes = self.outcomes.read().await;
        Ok(outcomes.get(payment_id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<PaymentOutcome>> {
        let outcomes = self.outcomes.read().await;
        Ok(outcomes.values().cloned().collect())
    }
}
