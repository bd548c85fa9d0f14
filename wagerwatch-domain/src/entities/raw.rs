// Rows as they come out of the storage adapter, before grouping

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entities::{Bet, Deposit, Diagnostic, Withdrawal};
use crate::value_objects::{Currency, PaymentStatus, PlayerId, TransactionType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub date: NaiveDateTime,
    pub player_id: PlayerId,
    pub paid_amount: Decimal,
    pub transaction_type: String,
    pub status: String,
    pub paid_currency: Currency,
}

impl PaymentRecord {
    pub fn transaction_type(&self) -> TransactionType {
        TransactionType::from(self.transaction_type.as_str())
    }

    pub fn is_rejected(&self) -> bool {
        PaymentStatus::from(self.status.as_str()).is_rejected()
    }

    pub fn to_deposit(&self) -> Deposit {
        Deposit {
            timestamp: self.date,
            amount: self.paid_amount,
            currency: self.paid_currency.clone(),
        }
    }

    pub fn to_withdrawal(&self) -> Withdrawal {
        Withdrawal {
            timestamp: self.date,
            amount: self.paid_amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetRecord {
    pub bet_id: String,
    pub accept_time: NaiveDateTime,
    pub result: String,
    pub price_change_policy: String,
    pub settlement_exchange_rate: Option<Decimal>,
    pub currency: Currency,
    pub player_id: PlayerId,
    pub amount: Decimal,
    pub profit: Decimal,
    pub payout: Decimal,
}

impl BetRecord {
    pub fn to_bet(&self) -> Bet {
        Bet {
            bet_id: self.bet_id.clone(),
            accept_time: self.accept_time,
            amount: self.amount,
            currency: self.currency.clone(),
            settlement_exchange_rate: self.settlement_exchange_rate,
            payout: self.payout,
        }
    }
}

/// Records that survived loading, plus the diagnostics raised while reading them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedRecords<T> {
    pub records: Vec<T>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Default for LoadedRecords<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            diagnostics: Vec::new(),
        }
    }
}

impl<T> LoadedRecords<T> {
    pub fn extend(&mut self, other: LoadedRecords<T>) {
        self.records.extend(other.records);
        self.diagnostics.extend(other.diagnostics);
    }
}
