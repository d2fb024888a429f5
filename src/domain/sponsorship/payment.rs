//! Ledger rows and transaction references.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{
    PaymentId, PaymentMethodId, SponsorshipId, SubscriptionId, Timestamp,
};

use super::{Amount, PaymentStatus};

/// Prefix marking which flow created a ledger row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefPrefix {
    OneTime,
    Subscription,
}

impl RefPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefPrefix::OneTime => "OT",
            RefPrefix::Subscription => "SUB",
        }
    }
}

/// Globally unique ledger reference: `{prefix}-{yyyymmdd-hhmmss}-{6 hex}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionRef(String);

impl TransactionRef {
    /// Generates a reference from the given time and 3 random bytes.
    pub fn generate(prefix: RefPrefix, at: Timestamp) -> Self {
        let mut suffix = [0u8; 3];
        rand::thread_rng().fill_bytes(&mut suffix);
        Self::from_parts(prefix, at, suffix)
    }

    pub fn from_parts(prefix: RefPrefix, at: Timestamp, suffix: [u8; 3]) -> Self {
        Self(format!(
            "{}-{}-{}",
            prefix.as_str(),
            at.compact(),
            hex::encode_upper(suffix)
        ))
    }

    pub(crate) fn from_row(raw: String) -> Self {
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fields for appending a ledger row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayment {
    pub sponsorship_id: SponsorshipId,
    pub subscription_id: Option<SubscriptionId>,
    pub payment_method_id: PaymentMethodId,
    pub amount: Amount,
    pub status: PaymentStatus,
    pub transaction_ref: TransactionRef,
}

/// An append-only ledger row. Never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payment {
    pub id: PaymentId,
    pub sponsorship_id: SponsorshipId,
    pub subscription_id: Option<SubscriptionId>,
    pub payment_method_id: PaymentMethodId,
    pub amount: Amount,
    pub status: PaymentStatus,
    pub transaction_ref: TransactionRef,
    pub created_at: Timestamp,
}
