// Payment classification value objects

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    Deposit,
    Withdrawal,
}

impl From<&str> for TransactionType {
    /// Anything that is not a deposit counts as money leaving the account.
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "deposit" => TransactionType::Deposit,
            _ => TransactionType::Withdrawal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Failed,
    Declined,
    Other,
}

impl PaymentStatus {
    pub fn is_rejected(&self) -> bool {
        matches!(self, PaymentStatus::Failed | PaymentStatus::Declined)
    }
}

impl From<&str> for PaymentStatus {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "failed" => PaymentStatus::Failed,
            "declined" => PaymentStatus::Declined,
            _ => PaymentStatus::Other,
        }
    }
}
