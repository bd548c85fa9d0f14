use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use csv::{ReaderBuilder, Trim};
use tracing::{debug, error};

use wagerwatch_domain::{
    BetRecord, Currency, DataProvider, Diagnostic, DiagnosticSink, LoadedRecords, PaymentRecord,
    PlayerId, RecordSource,
};

use crate::repositories::csv_columns::{to_date, to_decimal, to_integer, ColumnIndex, Row};
use crate::utils::{display_name, list_csv_files};

pub const PAYMENT_COLUMNS: &[&str] = &[
    "Date",
    "player_id",
    "paid_amount",
    "transaction_type",
    "status",
    "paid_currency",
];

pub const BET_COLUMNS: &[&str] = &[
    "bet_id",
    "accept_time",
    "result",
    "price_change_policy",
    "settlement_exchange_rate",
    "currency",
    "player_id",
    "amount",
    "profit",
    "payout",
];

type ParseRow<T> = fn(&Row<'_>, &mut dyn DiagnosticSink) -> Result<T, Diagnostic>;

/// A file lacking a required column is skipped with an error log.
pub struct CsvDataProvider {
    payments_dir: PathBuf,
    bets_dir: PathBuf,
}

impl CsvDataProvider {
    pub fn new(payments_dir: impl Into<PathBuf>, bets_dir: impl Into<PathBuf>) -> Self {
        Self {
            payments_dir: payments_dir.into(),
            bets_dir: bets_dir.into(),
        }
    }
}

#[async_trait]
impl DataProvider for CsvDataProvider {
    async fn load_payments(&self) -> Result<LoadedRecords<PaymentRecord>> {
        let dir = self.payments_dir.clone();
        tokio::task::spawn_blocking(move || {
            load_directory(&dir, RecordSource::Payments, PAYMENT_COLUMNS, parse_payment)
        })
        .await?
    }

    async fn load_bets(&self) -> Result<LoadedRecords<BetRecord>> {
        let dir = self.bets_dir.clone();
        tokio::task::spawn_blocking(move || {
            load_directory(&dir, RecordSource::Bets, BET_COLUMNS, parse_bet)
        })
        .await?
    }
}

fn load_directory<T>(
    dir: &Path,
    source: RecordSource,
    columns: &'static [&'static str],
    parse: ParseRow<T>,
) -> Result<LoadedRecords<T>> {
    let files = list_csv_files(dir)
        .with_context(|| format!("listing {} directory {}", source.as_str(), dir.display()))?;
    let mut loaded = LoadedRecords::default();
    for path in files {
        match read_file(&path, source, columns, parse) {
            Ok(part) => {
                debug!(
                    file = %path.display(),
                    records = part.records.len(),
                    diagnostics = part.diagnostics.len(),
                    "csv file loaded"
                );
                loaded.extend(part);
            }
            Err(err) => error!(file = %path.display(), "skipping csv file: {:#}", err),
        }
    }
    Ok(loaded)
}

fn read_file<T>(
    path: &Path,
    source: RecordSource,
    columns: &'static [&'static str],
    parse: ParseRow<T>,
) -> Result<LoadedRecords<T>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let headers = reader.headers()?.clone();
    let columns = ColumnIndex::locate(&headers, columns)?;
    let file = display_name(path);

    let mut loaded = LoadedRecords::default();
    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                let line = err.position().map(|position| position.line()).unwrap_or(0);
                loaded.diagnostics.push(Diagnostic::DroppedRecord {
                    source,
                    file: file.clone(),
                    line,
                    column: String::new(),
                    value: err.to_string(),
                });
                continue;
            }
        };
        let row = Row {
            record: &record,
            columns: &columns,
            source,
            file: &file,
            line: record.position().map(|position| position.line()).unwrap_or(0),
        };
        match parse(&row, &mut loaded.diagnostics) {
            Ok(parsed) => loaded.records.push(parsed),
            Err(diagnostic) => loaded.diagnostics.push(diagnostic),
        }
    }
    Ok(loaded)
}

fn parse_payment(row: &Row<'_>, _sink: &mut dyn DiagnosticSink) -> Result<PaymentRecord, Diagnostic> {
    Ok(PaymentRecord {
        date: row.required("Date", to_date)?,
        player_id: row.required("player_id", to_integer).map(PlayerId)?,
        paid_amount: row.required("paid_amount", to_decimal)?,
        transaction_type: row.required_text("transaction_type")?,
        status: row.required_text("status")?,
        paid_currency: row.required_text("paid_currency").map(|code| Currency::new(&code))?,
    })
}

fn parse_bet(row: &Row<'_>, sink: &mut dyn DiagnosticSink) -> Result<BetRecord, Diagnostic> {
    Ok(BetRecord {
        bet_id: row.required_text("bet_id")?,
        accept_time: row.required("accept_time", to_date)?,
        result: row.required_text("result")?,
        price_change_policy: row.required_text("price_change_policy")?,
        settlement_exchange_rate: row.optional("settlement_exchange_rate", to_decimal, sink),
        currency: row.required_text("currency").map(|code| Currency::new(&code))?,
        player_id: row.required("player_id", to_integer).map(PlayerId)?,
        amount: row.required("amount", to_decimal)?,
        profit: row.required("profit", to_decimal)?,
        payout: row.required("payout", to_decimal)?,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rust_decimal_macros::dec;

    use super::*;

    const PAYMENTS_HEADER: &str = "Date,player_id,paid_amount,transaction_type,status,paid_currency,comment";
    const BETS_HEADER: &str = "bet_id,accept_time,result,price_change_policy,settlement_exchange_rate,currency,player_id,amount,profit,payout";

    fn write(dir: &Path, name: &str, lines: &[&str]) {
        fs::write(dir.join(name), lines.join("\n")).expect("write csv");
    }

    fn provider(root: &Path) -> CsvDataProvider {
        let payments = root.join("payments");
        let bets = root.join("bets");
        fs::create_dir_all(&payments).expect("payments dir");
        fs::create_dir_all(&bets).expect("bets dir");
        CsvDataProvider::new(payments, bets)
    }

    #[tokio::test]
    async fn payments_load_and_bad_rows_are_reported() {
        let root = tempfile::tempdir().expect("tempdir");
        let provider = provider(root.path());
        write(
            &root.path().join("payments"),
            "2022.csv",
            &[
                PAYMENTS_HEADER,
                "01/01/2022 20:00,7,100.50,deposit,Approved,usd,first",
                "error,7,100,deposit,Approved,USD,",
                "01012022 08:30 PM,7,na,withdrawal,Approved,USD,",
                "01012022 08:45 PM,7.0,90,withdrawal,Failed,USD,",
            ],
        );

        let loaded = provider.load_payments().await.expect("load");

        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.records[0].player_id, PlayerId(7));
        assert_eq!(loaded.records[0].paid_amount, dec!(100.50));
        assert_eq!(loaded.records[0].paid_currency, Currency::reference());
        assert!(loaded.records[1].is_rejected());
        assert_eq!(loaded.diagnostics.len(), 2);
        assert!(matches!(
            &loaded.diagnostics[0],
            Diagnostic::DroppedRecord { column, line: 3, .. } if column == "Date"
        ));
        assert!(matches!(
            &loaded.diagnostics[1],
            Diagnostic::DroppedRecord { column, value, .. } if column == "paid_amount" && value == "na"
        ));
    }

    #[tokio::test]
    async fn bets_keep_rows_without_exchange_rate() {
        let root = tempfile::tempdir().expect("tempdir");
        let provider = provider(root.path());
        write(
            &root.path().join("bets"),
            "bets.csv",
            &[
                BETS_HEADER,
                "b1,01/01/2022 20:02,won,none,0.8,EUR,7,85,255,340",
                "b2,01/01/2022 20:03,lost,none,,USD,7,10,-10,0",
                "b3,01/01/2022 20:04,won,none,NaN,USD,8,abc,0,0",
            ],
        );

        let loaded = provider.load_bets().await.expect("load");

        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.records[0].settlement_exchange_rate, Some(dec!(0.8)));
        assert_eq!(loaded.records[0].currency, Currency::new("EUR"));
        assert_eq!(loaded.records[1].settlement_exchange_rate, None);
        assert_eq!(loaded.records[1].profit, dec!(-10));
        assert_eq!(loaded.diagnostics.len(), 1);
    }

    #[tokio::test]
    async fn unreadable_exchange_rate_keeps_the_bet_and_is_reported() {
        let root = tempfile::tempdir().expect("tempdir");
        let provider = provider(root.path());
        write(
            &root.path().join("bets"),
            "bets.csv",
            &[BETS_HEADER, "b1,01/01/2022 20:02,won,none,abc,EUR,7,85,255,340"],
        );

        let loaded = provider.load_bets().await.expect("load");

        assert_eq!(loaded.records.len(), 1);
        assert_eq!(loaded.records[0].settlement_exchange_rate, None);
        assert_eq!(
            loaded.diagnostics,
            vec![Diagnostic::InvalidValue {
                source: RecordSource::Bets,
                file: "bets.csv".to_string(),
                line: 2,
                column: "settlement_exchange_rate".to_string(),
                value: "abc".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn files_are_merged_in_name_order_and_broken_files_skipped() {
        let root = tempfile::tempdir().expect("tempdir");
        let provider = provider(root.path());
        let dir = root.path().join("bets");
        write(&dir, "b.csv", &[BETS_HEADER, "second,01/01/2022 20:05,won,none,,USD,1,1,1,2"]);
        write(&dir, "a.csv", &[BETS_HEADER, "first,01/01/2022 20:06,won,none,,USD,1,1,1,2"]);
        write(&dir, "c.csv", &["bet_id,amount", "x,1"]);
        write(&dir, "readme.txt", &["not data"]);

        let loaded = provider.load_bets().await.expect("load");

        let ids: Vec<&str> = loaded.records.iter().map(|bet| bet.bet_id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second"]);
        assert!(loaded.diagnostics.is_empty());
    }

    #[tokio::test]
    async fn missing_directory_fails_the_load() {
        let root = tempfile::tempdir().expect("tempdir");
        let provider = CsvDataProvider::new(root.path().join("nope"), root.path().join("nope"));
        assert!(provider.load_payments().await.is_err());
    }
}
