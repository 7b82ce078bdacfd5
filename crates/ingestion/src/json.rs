//! Key-based JSON line parser.
//!
//! One raw line in, exactly one [`Record`] out, same non-throwing
//! guarantee as the CSV parser. Field mapping is key-based with fallback
//! keys for known aliases. An unknown type code keeps whatever common
//! fields were present and lands in partition `B`, unlike the CSV
//! parser, which discards everything on an unknown type.

use serde_json::{Map, Value};
use tickfeed_core::{CommonFields, QuoteFields, Record, RecordType, TradeFields};
use tracing::trace;

/// Parse one JSON line into a record.
pub fn parse_line(line: &str) -> Record {
    match try_parse(line) {
        Some(record) => record,
        None => {
            trace!(line, "unparseable json line routed to bad record");
            Record::bad()
        }
    }
}

/// `None` means the line is rejected wholesale and routed to the
/// bad-record policy.
fn try_parse(line: &str) -> Option<Record> {
    let obj = match serde_json::from_str::<Value>(line) {
        Ok(Value::Object(obj)) => obj,
        _ => return None,
    };

    let code = str_key(&obj, &["event_type", "rec_type"]).unwrap_or_else(|| "B".to_string());

    // The sequence number is common to both record shapes; a present but
    // non-integer value rejects the whole line, an absent one is null.
    let event_sequence = match obj.get("event_seq_nb") {
        None | Some(Value::Null) => None,
        Some(value) => Some(int_value(value)?),
    };

    let common = CommonFields {
        trade_date: str_key(&obj, &["trade_dt", "trade_date"]),
        symbol: str_key(&obj, &["symbol"]),
        exchange: str_key(&obj, &["exchange"]),
        event_time: str_key(&obj, &["event_tm"]),
        event_sequence,
        arrival_time: str_key(&obj, &["file_tm"]),
    };

    let record = match RecordType::from_code(&code) {
        Some(RecordType::Trade) => Record::trade(
            common,
            TradeFields {
                trade_price: float_key(&obj, &["trade_pr"]),
                trade_size: int_key(&obj, &["trade_size"]),
                execution_id: str_key(&obj, &["execution_id"]),
            },
        ),
        Some(RecordType::Quote) => Record::quote(
            common,
            QuoteFields {
                bid_price: float_key(&obj, &["bid_pr"]),
                bid_size: int_key(&obj, &["bid_size"]),
                ask_price: float_key(&obj, &["ask_pr"]),
                ask_size: int_key(&obj, &["ask_size"]),
            },
        ),
        // Unknown classification: the base record stands, with null
        // domain fields, under partition B.
        _ => Record::bad_with_common(common),
    };
    Some(record)
}

/// First present key wins. Numbers are stringified so a numeric
/// `event_seq_nb`-style value in a string slot is not silently dropped.
fn str_key(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| match obj.get(*k) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Accepts a JSON number or a numeric string; absent or unconvertible
/// values are null.
fn float_key(obj: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|k| match obj.get(*k) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

/// Accepts a JSON integer or a numeric string; absent or unconvertible
/// values are null.
fn int_key(obj: &Map<String, Value>, keys: &[&str]) -> Option<i64> {
    keys.iter().find_map(|k| match obj.get(*k) {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    })
}

/// Like [`int_key`] but for a single already-present value.
fn int_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_trade_round_trip() {
        let rec = parse_line(r#"{"event_type":"T","symbol":"MSFT","trade_pr":300.5,"trade_size":50}"#);
        assert_eq!(rec.record_type, RecordType::Trade);
        assert_eq!(rec.partition, RecordType::Trade);
        assert_eq!(rec.symbol.as_deref(), Some("MSFT"));
        assert_relative_eq!(rec.trade_price.unwrap(), 300.5);
        assert_eq!(rec.trade_size, Some(50));
        assert!(rec.bid_price.is_none());
    }

    #[test]
    fn test_quote_round_trip() {
        let rec = parse_line(
            r#"{"event_type":"Q","symbol":"AAPL","exchange":"NASDAQ","bid_pr":150.0,"bid_size":10,"ask_pr":150.5,"ask_size":20}"#,
        );
        assert_eq!(rec.record_type, RecordType::Quote);
        assert_relative_eq!(rec.bid_price.unwrap(), 150.0);
        assert_eq!(rec.bid_size, Some(10));
        assert_relative_eq!(rec.ask_price.unwrap(), 150.5);
        assert_eq!(rec.ask_size, Some(20));
        assert!(rec.trade_price.is_none());
    }

    #[test]
    fn test_rec_type_fallback_key() {
        let rec = parse_line(r#"{"rec_type":"q","symbol":"AAPL"}"#);
        assert_eq!(rec.record_type, RecordType::Quote);
    }

    #[test]
    fn test_trade_date_alias() {
        let a = parse_line(r#"{"event_type":"T","trade_dt":"2024-01-01"}"#);
        let b = parse_line(r#"{"event_type":"T","trade_date":"2024-01-01"}"#);
        assert_eq!(a.trade_date.as_deref(), Some("2024-01-01"));
        assert_eq!(b.trade_date.as_deref(), Some("2024-01-01"));
    }

    #[test]
    fn test_arrival_falls_back_to_file_tm_then_now() {
        let rec = parse_line(r#"{"event_type":"T","file_tm":"2024-01-01T00:00:00"}"#);
        assert_eq!(rec.arrival_time, "2024-01-01T00:00:00");

        let rec = parse_line(r#"{"event_type":"T"}"#);
        assert!(chrono::DateTime::parse_from_rfc3339(&rec.arrival_time).is_ok());
    }

    #[test]
    fn test_unknown_type_preserves_common_fields() {
        let rec = parse_line(r#"{"event_type":"X","symbol":"AAPL","exchange":"NASDAQ"}"#);
        assert_eq!(rec.record_type, RecordType::Bad);
        assert_eq!(rec.partition, RecordType::Bad);
        // Unlike the CSV parser, identifying fields survive.
        assert_eq!(rec.symbol.as_deref(), Some("AAPL"));
        assert_eq!(rec.exchange.as_deref(), Some("NASDAQ"));
        assert!(rec.trade_price.is_none());
        assert!(rec.bid_price.is_none());
    }

    #[test]
    fn test_missing_type_keys_default_to_bad() {
        let rec = parse_line(r#"{"symbol":"AAPL"}"#);
        assert_eq!(rec.partition, RecordType::Bad);
        assert_eq!(rec.symbol.as_deref(), Some("AAPL"));
    }

    #[test]
    fn test_malformed_json_is_fully_bad() {
        let rec = parse_line("{not json");
        assert_eq!(rec.record_type, RecordType::Bad);
        assert!(rec.symbol.is_none());
    }

    #[test]
    fn test_non_object_json_is_bad() {
        assert_eq!(parse_line("[1,2,3]").record_type, RecordType::Bad);
        assert_eq!(parse_line("42").record_type, RecordType::Bad);
    }

    #[test]
    fn test_numeric_strings_convert() {
        let rec = parse_line(r#"{"event_type":"T","trade_pr":"300.5","trade_size":"50","event_seq_nb":"7"}"#);
        assert_relative_eq!(rec.trade_price.unwrap(), 300.5);
        assert_eq!(rec.trade_size, Some(50));
        assert_eq!(rec.event_sequence, Some(7));
    }

    #[test]
    fn test_unconvertible_trade_field_is_null_not_bad() {
        let rec = parse_line(r#"{"event_type":"T","symbol":"MSFT","trade_pr":"oops"}"#);
        assert_eq!(rec.record_type, RecordType::Trade);
        assert!(rec.trade_price.is_none());
        assert_eq!(rec.symbol.as_deref(), Some("MSFT"));
    }

    #[test]
    fn test_unconvertible_sequence_rejects_whole_line() {
        // The sequence number is the one common field converted eagerly;
        // a present but non-integer value discards everything.
        let rec = parse_line(r#"{"event_type":"T","symbol":"MSFT","event_seq_nb":"abc"}"#);
        assert_eq!(rec.record_type, RecordType::Bad);
        assert_eq!(rec.partition, RecordType::Bad);
        assert!(rec.symbol.is_none());
    }

    #[test]
    fn test_null_sequence_stays_null() {
        let rec = parse_line(r#"{"event_type":"T","symbol":"MSFT","event_seq_nb":null}"#);
        assert_eq!(rec.record_type, RecordType::Trade);
        assert!(rec.event_sequence.is_none());
        assert_eq!(rec.symbol.as_deref(), Some("MSFT"));
    }

    #[test]
    fn test_execution_id_carried_on_trades() {
        let rec = parse_line(r#"{"event_type":"T","execution_id":"E-123"}"#);
        assert_eq!(rec.execution_id.as_deref(), Some("E-123"));
    }
}
