// Cell level conversions shared by the payment and bet readers

use std::str::FromStr;

use anyhow::{anyhow, Result};
use chrono::NaiveDateTime;
use csv::StringRecord;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use wagerwatch_domain::{Diagnostic, DiagnosticSink, RecordSource};

pub const DATE_FORMATS: [&str; 2] = ["%d/%m/%Y %H:%M", "%m%d%Y %I:%M %p"];
pub const NA_VALUES: [&str; 3] = ["na", "NaN", "error"];

pub fn is_missing(raw: &str) -> bool {
    let value = raw.trim();
    value.is_empty() || NA_VALUES.contains(&value)
}

pub fn to_date(raw: &str) -> Option<NaiveDateTime> {
    let value = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

/// Accepts plain integers and whole numbers written with a fraction, e.g. `42.0`.
pub fn to_integer(raw: &str) -> Option<i64> {
    let value = raw.trim();
    value.parse::<i64>().ok().or_else(|| {
        to_decimal(value)
            .filter(|number| number.fract().is_zero())
            .and_then(|number| number.to_i64())
    })
}

pub fn to_decimal(raw: &str) -> Option<Decimal> {
    let value = raw.trim();
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .ok()
}

#[derive(Debug, Clone)]
pub struct ColumnIndex {
    names: &'static [&'static str],
    positions: Vec<usize>,
}

impl ColumnIndex {
    pub fn locate(headers: &StringRecord, names: &'static [&'static str]) -> Result<Self> {
        let mut positions = Vec::with_capacity(names.len());
        let mut missing = Vec::new();
        for name in names {
            match headers.iter().position(|header| header.trim() == *name) {
                Some(position) => positions.push(position),
                None => missing.push(*name),
            }
        }
        if !missing.is_empty() {
            return Err(anyhow!("missing columns: {}", missing.join(", ")));
        }
        Ok(Self { names, positions })
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.names
            .iter()
            .position(|candidate| *candidate == name)
            .map(|slot| self.positions[slot])
    }
}

/// One data row together with where it came from.
pub struct Row<'a> {
    pub record: &'a StringRecord,
    pub columns: &'a ColumnIndex,
    pub source: RecordSource,
    pub file: &'a str,
    pub line: u64,
}

impl<'a> Row<'a> {
    pub fn raw(&self, column: &str) -> &'a str {
        self.columns
            .position(column)
            .and_then(|position| self.record.get(position))
            .unwrap_or("")
    }

    pub fn required<T>(
        &self,
        column: &str,
        convert: impl Fn(&str) -> Option<T>,
    ) -> Result<T, Diagnostic> {
        let raw = self.raw(column);
        if is_missing(raw) {
            return Err(self.dropped(column, raw));
        }
        convert(raw).ok_or_else(|| self.dropped(column, raw))
    }

    pub fn required_text(&self, column: &str) -> Result<String, Diagnostic> {
        self.required(column, |raw| Some(raw.trim().to_string()))
    }

    /// Missing values become `None` quietly; unparseable ones become `None`
    /// and are recorded.
    pub fn optional<T>(
        &self,
        column: &str,
        convert: impl Fn(&str) -> Option<T>,
        sink: &mut dyn DiagnosticSink,
    ) -> Option<T> {
        let raw = self.raw(column);
        if is_missing(raw) {
            return None;
        }
        let converted = convert(raw);
        if converted.is_none() {
            sink.record(Diagnostic::InvalidValue {
                source: self.source,
                file: self.file.to_string(),
                line: self.line,
                column: column.to_string(),
                value: raw.to_string(),
            });
        }
        converted
    }

    pub fn dropped(&self, column: &str, value: &str) -> Diagnostic {
        Diagnostic::DroppedRecord {
            source: self.source,
            file: self.file.to_string(),
            line: self.line,
            column: column.to_string(),
            value: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn na_markers_are_missing() {
        for raw in ["", "  ", "na", "NaN", " error "] {
            assert!(is_missing(raw), "{raw:?}");
        }
        assert!(!is_missing("NA"));
        assert!(!is_missing("0"));
    }

    #[test]
    fn both_date_formats_parse() {
        let expected = NaiveDate::from_ymd_opt(2022, 3, 1)
            .and_then(|date| date.and_hms_opt(20, 15, 0))
            .expect("valid time");
        assert_eq!(to_date("01/03/2022 20:15"), Some(expected));
        assert_eq!(to_date("03012022 08:15 PM"), Some(expected));
        assert_eq!(to_date("2022-03-01"), None);
    }

    #[test]
    fn numbers_parse_exactly() {
        assert_eq!(to_integer("17"), Some(17));
        assert_eq!(to_integer("17.0"), Some(17));
        assert_eq!(to_integer("17.5"), None);
        assert_eq!(to_decimal("0.1"), Some(dec!(0.1)));
        assert_eq!(to_decimal("1e2"), Some(dec!(100)));
        assert_eq!(to_decimal("ten"), None);
    }

    #[test]
    fn missing_header_is_reported() {
        let headers = StringRecord::from(vec!["bet_id", "amount"]);
        let err = ColumnIndex::locate(&headers, &["bet_id", "amount", "payout"])
            .expect_err("payout missing");
        assert!(err.to_string().contains("payout"));
    }

    #[test]
    fn row_conversion_reports_column_and_value() {
        let headers = StringRecord::from(vec!["amount", "extra", "rate"]);
        let columns = ColumnIndex::locate(&headers, &["amount", "rate"]).expect("columns");
        let record = StringRecord::from(vec!["abc", "ignored", "na"]);
        let row = Row {
            record: &record,
            columns: &columns,
            source: RecordSource::Bets,
            file: "bets.csv",
            line: 3,
        };

        assert_eq!(
            row.required("amount", to_decimal),
            Err(Diagnostic::DroppedRecord {
                source: RecordSource::Bets,
                file: "bets.csv".to_string(),
                line: 3,
                column: "amount".to_string(),
                value: "abc".to_string(),
            })
        );
        let mut diagnostics = Vec::<Diagnostic>::new();
        assert_eq!(row.optional("rate", to_decimal, &mut diagnostics), None);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn unconvertible_optional_value_is_kept_as_none_and_recorded() {
        let headers = StringRecord::from(vec!["rate"]);
        let columns = ColumnIndex::locate(&headers, &["rate"]).expect("columns");
        let record = StringRecord::from(vec!["abc"]);
        let row = Row {
            record: &record,
            columns: &columns,
            source: RecordSource::Bets,
            file: "bets.csv",
            line: 5,
        };
        let mut diagnostics = Vec::<Diagnostic>::new();

        assert_eq!(row.optional("rate", to_decimal, &mut diagnostics), None);
        assert_eq!(
            diagnostics,
            vec![Diagnostic::InvalidValue {
                source: RecordSource::Bets,
                file: "bets.csv".to_string(),
                line: 5,
                column: "rate".to_string(),
                value: "abc".to_string(),
            }]
        );
    }
}
