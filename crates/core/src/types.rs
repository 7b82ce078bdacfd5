//! Core data types for the tickfeed pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Classification of a normalized record: trade, quote, or bad.
///
/// Doubles as the partition key for the partitioned write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RecordType {
    /// An executed transaction (price, size).
    #[serde(rename = "T")]
    Trade,
    /// A bid/ask quote.
    #[serde(rename = "Q")]
    Quote,
    /// An unparseable or unclassifiable input line.
    #[serde(rename = "B")]
    Bad,
}

impl RecordType {
    /// Single-letter wire code (`T`, `Q`, `B`).
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::Trade => "T",
            RecordType::Quote => "Q",
            RecordType::Bad => "B",
        }
    }

    /// Classify a raw type code, case-insensitively.
    ///
    /// Only `T` and `Q` are recognized; everything else (including `B`
    /// itself) is an unknown classification and returns `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "T" => Some(RecordType::Trade),
            "Q" => Some(RecordType::Quote),
            _ => None,
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The unified record every parser must populate.
///
/// One record per input line, always. Domain fields are nullable; which
/// group is populated depends on `record_type` and is fixed at
/// construction: trade fields for `T`, quote fields for `Q`, neither for
/// `B`. `partition` always equals `record_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Trading date (as carried on the wire, e.g. `2024-01-01`).
    pub trade_date: Option<String>,
    /// Record classification.
    pub record_type: RecordType,
    pub symbol: Option<String>,
    pub exchange: Option<String>,
    /// Event timestamp as carried on the wire.
    pub event_time: Option<String>,
    pub event_sequence: Option<i64>,
    /// When the line reached the feed; ingestion instant if absent upstream.
    pub arrival_time: String,
    /// Trade-only fields.
    pub trade_price: Option<f64>,
    pub trade_size: Option<i64>,
    pub execution_id: Option<String>,
    /// Quote-only fields.
    pub bid_price: Option<f64>,
    pub bid_size: Option<i64>,
    pub ask_price: Option<f64>,
    pub ask_size: Option<i64>,
    /// Partition key; always agrees with `record_type`.
    pub partition: RecordType,
    /// Audit fields, attached after parsing by the enricher.
    pub source_path: Option<String>,
    pub source_file: Option<String>,
    pub ingest_timestamp: Option<DateTime<Utc>>,
}

/// Fields common to trades and quotes, extracted before branching.
#[derive(Debug, Clone, Default)]
pub struct CommonFields {
    pub trade_date: Option<String>,
    pub symbol: Option<String>,
    pub exchange: Option<String>,
    pub event_time: Option<String>,
    pub event_sequence: Option<i64>,
    /// Falls back to the ingestion instant when `None`.
    pub arrival_time: Option<String>,
}

/// Trade-only fields.
#[derive(Debug, Clone, Default)]
pub struct TradeFields {
    pub trade_price: Option<f64>,
    pub trade_size: Option<i64>,
    pub execution_id: Option<String>,
}

/// Quote-only fields.
#[derive(Debug, Clone, Default)]
pub struct QuoteFields {
    pub bid_price: Option<f64>,
    pub bid_size: Option<i64>,
    pub ask_price: Option<f64>,
    pub ask_size: Option<i64>,
}

impl Record {
    fn base(record_type: RecordType, common: CommonFields) -> Self {
        let arrival_time = common
            .arrival_time
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| Utc::now().to_rfc3339());
        Self {
            trade_date: common.trade_date,
            record_type,
            symbol: common.symbol,
            exchange: common.exchange,
            event_time: common.event_time,
            event_sequence: common.event_sequence,
            arrival_time,
            trade_price: None,
            trade_size: None,
            execution_id: None,
            bid_price: None,
            bid_size: None,
            ask_price: None,
            ask_size: None,
            partition: record_type,
            source_path: None,
            source_file: None,
            ingest_timestamp: None,
        }
    }

    /// Build a trade record. Quote fields stay null.
    pub fn trade(common: CommonFields, trade: TradeFields) -> Self {
        let mut rec = Self::base(RecordType::Trade, common);
        rec.trade_price = trade.trade_price;
        rec.trade_size = trade.trade_size;
        rec.execution_id = trade.execution_id;
        rec
    }

    /// Build a quote record. Trade fields stay null.
    pub fn quote(common: CommonFields, quote: QuoteFields) -> Self {
        let mut rec = Self::base(RecordType::Quote, common);
        rec.bid_price = quote.bid_price;
        rec.bid_size = quote.bid_size;
        rec.ask_price = quote.ask_price;
        rec.ask_size = quote.ask_size;
        rec
    }

    /// The shared bad-record policy: every domain field null, classified
    /// and partitioned under `B`, arrival set to the ingestion instant.
    pub fn bad() -> Self {
        Self::base(RecordType::Bad, CommonFields::default())
    }

    /// An unclassifiable record that keeps whatever common fields the
    /// input carried. Used by the JSON parser for unknown type codes.
    pub fn bad_with_common(common: CommonFields) -> Self {
        Self::base(RecordType::Bad, common)
    }
}

/// A record paired with the path of the file that supplied its line.
///
/// The form records travel in between parsing and audit enrichment.
#[derive(Debug, Clone)]
pub struct SourcedRecord {
    pub source: PathBuf,
    pub record: Record,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn test_record_type_from_code() {
        assert_eq!(RecordType::from_code("T"), Some(RecordType::Trade));
        assert_eq!(RecordType::from_code("q"), Some(RecordType::Quote));
        assert_eq!(RecordType::from_code(" t "), Some(RecordType::Trade));
        assert_eq!(RecordType::from_code("X"), None);
        assert_eq!(RecordType::from_code("B"), None);
        assert_eq!(RecordType::from_code(""), None);
    }

    #[test]
    fn test_bad_record_shape() {
        let rec = Record::bad();
        assert_eq!(rec.record_type, RecordType::Bad);
        assert_eq!(rec.partition, RecordType::Bad);
        assert!(rec.trade_date.is_none());
        assert!(rec.symbol.is_none());
        assert!(rec.trade_price.is_none());
        assert!(rec.bid_price.is_none());
        // arrival_time is never null and is a valid RFC 3339 instant
        assert!(DateTime::parse_from_rfc3339(&rec.arrival_time).is_ok());
    }

    #[test]
    fn test_trade_never_carries_quote_fields() {
        let rec = Record::trade(
            CommonFields {
                symbol: Some("AAPL".into()),
                ..Default::default()
            },
            TradeFields {
                trade_price: Some(150.25),
                trade_size: Some(100),
                execution_id: None,
            },
        );
        assert_eq!(rec.record_type, RecordType::Trade);
        assert_eq!(rec.partition, RecordType::Trade);
        assert_eq!(rec.trade_price, Some(150.25));
        assert!(rec.bid_price.is_none());
        assert!(rec.ask_size.is_none());
    }

    #[test]
    fn test_record_type_wire_codes() {
        let rec = Record::bad();
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["record_type"], "B");
        assert_eq!(json["partition"], "B");
    }

    #[test]
    fn test_arrival_time_passthrough() {
        let rec = Record::quote(
            CommonFields {
                arrival_time: Some("2024-01-01T00:00:00".into()),
                ..Default::default()
            },
            QuoteFields::default(),
        );
        assert_eq!(rec.arrival_time, "2024-01-01T00:00:00");
    }
}
