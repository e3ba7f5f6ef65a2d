use super::settlement::{PaymentHandle, PaymentOutcome, PaymentRequest, PaymentStatus};
use crate::error::Result;
use async_trait::async_trait;

/// External payment rail consumed by the settlement engine.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Submits a payment and returns the rail's opaque identifier.
    async fn pay(&self, request: &PaymentRequest) -> Result<PaymentHandle>;

    /// Reads the rail-side state of an in-flight payment.
    ///
    /// Must be an idempotent read: re-querying a settled payment returns
    /// the same status and changes nothing on the rail.
    async fn payment_status(&self, handle: &PaymentHandle) -> Result<PaymentStatus>;
}

/// Sink for terminal settlement records, consumed by the order workflow.
#[async_trait]
pub trait SettlementStore: Send + Sync {
    async fn store(&self, outcome: PaymentOutcome) -> Result<()>;
    async fn get(&self, payment_id: &str) -> Result<Option<PaymentOutcome>>;
    async fn get_all(&self) -> Result<Vec<PaymentOutcome>>;
}

pub type PaymentProviderBox = Box<dyn PaymentProvider>;
pub type SettlementStoreBox = Box<dyn SettlementStore>;
