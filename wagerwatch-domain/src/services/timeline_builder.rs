use std::collections::BTreeMap;

use crate::entities::{BetRecord, PaymentRecord, PlayerBatch};
use crate::value_objects::{PlayerId, TransactionType};

/// Groups raw rows by player, drops failed and declined payments and sorts
/// every sequence by time. Players come out in ascending id order.
pub fn build_player_batches(payments: Vec<PaymentRecord>, bets: Vec<BetRecord>) -> Vec<PlayerBatch> {
    let mut batches: BTreeMap<PlayerId, PlayerBatch> = BTreeMap::new();

    for payment in payments.iter().filter(|payment| !payment.is_rejected()) {
        let batch = batches
            .entry(payment.player_id)
            .or_insert_with(|| PlayerBatch::new(payment.player_id));
        match payment.transaction_type() {
            TransactionType::Deposit => batch.deposits.push(payment.to_deposit()),
            TransactionType::Withdrawal => batch.withdrawals.push(payment.to_withdrawal()),
        }
    }

    for bet in &bets {
        batches
            .entry(bet.player_id)
            .or_insert_with(|| PlayerBatch::new(bet.player_id))
            .bets
            .push(bet.to_bet());
    }

    batches
        .into_values()
        .map(|mut batch| {
            batch.sort_by_time();
            batch
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::Currency;
    use chrono::{NaiveDate, NaiveDateTime};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn at(minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 1, 1)
            .and_then(|date| date.and_hms_opt(20, minute, 0))
            .expect("valid time")
    }

    fn payment(player: i64, minute: u32, kind: &str, status: &str) -> PaymentRecord {
        PaymentRecord {
            date: at(minute),
            player_id: PlayerId(player),
            paid_amount: dec!(100),
            transaction_type: kind.to_string(),
            status: status.to_string(),
            paid_currency: Currency::reference(),
        }
    }

    fn bet(player: i64, minute: u32) -> BetRecord {
        BetRecord {
            bet_id: format!("{player}-{minute}"),
            accept_time: at(minute),
            result: "won".to_string(),
            price_change_policy: "none".to_string(),
            settlement_exchange_rate: None,
            currency: Currency::reference(),
            player_id: PlayerId(player),
            amount: dec!(10),
            profit: Decimal::ZERO,
            payout: dec!(10),
        }
    }

    #[test]
    fn groups_splits_and_sorts() {
        let batches = build_player_batches(
            vec![
                payment(2, 30, "deposit", "Approved"),
                payment(1, 10, "withdrawal", "Approved"),
                payment(1, 5, "Deposit", "Approved"),
                payment(1, 1, "deposit", "Approved"),
            ],
            vec![bet(1, 20), bet(1, 2), bet(3, 0)],
        );

        let ids: Vec<_> = batches.iter().map(|batch| batch.player_id).collect();
        assert_eq!(ids, vec![PlayerId(1), PlayerId(2), PlayerId(3)]);

        let first = &batches[0];
        assert_eq!(
            first.deposits.iter().map(|d| d.timestamp).collect::<Vec<_>>(),
            vec![at(1), at(5)]
        );
        assert_eq!(first.withdrawals.len(), 1);
        assert_eq!(
            first.bets.iter().map(|b| b.accept_time).collect::<Vec<_>>(),
            vec![at(2), at(20)]
        );
        assert!(batches[2].deposits.is_empty());
        assert_eq!(batches[2].bets.len(), 1);
    }

    #[test]
    fn rejected_payments_are_dropped() {
        let batches = build_player_batches(
            vec![
                payment(1, 1, "deposit", "Failed"),
                payment(1, 2, "withdrawal", "declined"),
                payment(1, 3, "withdrawal", "Approved"),
            ],
            Vec::new(),
        );
        assert_eq!(batches.len(), 1);
        assert!(batches[0].deposits.is_empty());
        assert_eq!(batches[0].withdrawals.len(), 1);
    }

    #[test]
    fn only_rejected_payments_produce_no_player() {
        let batches = build_player_batches(vec![payment(4, 1, "deposit", "Failed")], Vec::new());
        assert!(batches.is_empty());
    }
}
