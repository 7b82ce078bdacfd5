//! Positional CSV line parser.
//!
//! One raw line in, exactly one [`Record`] out. Anything the parser
//! cannot make sense of (too few fields, an unknown type code, a
//! malformed number) becomes a bad record; a single malformed line never
//! aborts the run.

use std::str::FromStr;
use tickfeed_core::{CommonFields, QuoteFields, Record, RecordType, TradeFields};
use tracing::trace;

/// Minimum field count for a line to carry the common positional layout.
const MIN_FIELDS: usize = 7;

/// Parse one CSV line into a record.
///
/// Total function: never panics, never returns an error. Field layout is
/// positional: `trade_date, arrival_time, record_type, symbol,
/// event_time, event_sequence, exchange`, then trade fields (price, size)
/// for `T` lines or `bid_price, bid_size, ask_price, ask_size` for `Q`
/// lines. Trailing fields may be absent.
pub fn parse_line(line: &str) -> Record {
    match try_parse(line) {
        Some(record) => record,
        None => {
            trace!(line, "unparseable csv line routed to bad record");
            Record::bad()
        }
    }
}

/// `None` means the line is rejected wholesale and routed to the
/// bad-record policy.
fn try_parse(line: &str) -> Option<Record> {
    // Keep empty positions so later indices stay aligned.
    let vals: Vec<&str> = line.split(',').map(str::trim).collect();
    if vals.len() < MIN_FIELDS {
        return None;
    }

    let common = CommonFields {
        trade_date: non_empty(vals[0]),
        arrival_time: non_empty(vals[1]),
        symbol: non_empty(vals[3]),
        event_time: non_empty(vals[4]),
        event_sequence: parse_field(vals[5])?,
        exchange: non_empty(vals[6]),
    };

    // Unknown classification is itself a failure mode, not a best guess.
    match RecordType::from_code(vals[2])? {
        RecordType::Trade => Some(Record::trade(
            common,
            TradeFields {
                trade_price: parse_at(&vals, 7)?,
                trade_size: parse_at(&vals, 8)?,
                // The CSV layout carries no execution id.
                execution_id: None,
            },
        )),
        RecordType::Quote => Some(Record::quote(
            common,
            QuoteFields {
                bid_price: parse_at(&vals, 7)?,
                bid_size: parse_at(&vals, 8)?,
                ask_price: parse_at(&vals, 9)?,
                ask_size: parse_at(&vals, 10)?,
            },
        )),
        RecordType::Bad => None,
    }
}

fn non_empty(val: &str) -> Option<String> {
    if val.is_empty() {
        None
    } else {
        Some(val.to_string())
    }
}

/// Empty field → `Some(None)` (null); malformed field → `None` (reject
/// the whole line).
fn parse_field<T: FromStr>(val: &str) -> Option<Option<T>> {
    if val.is_empty() {
        Some(None)
    } else {
        val.parse::<T>().ok().map(Some)
    }
}

/// Like [`parse_field`], but tolerates the position being absent entirely.
fn parse_at<T: FromStr>(vals: &[&str], idx: usize) -> Option<Option<T>> {
    match vals.get(idx) {
        Some(val) => parse_field(val),
        None => Some(None),
    }
}
