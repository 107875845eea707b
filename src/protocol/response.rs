use serde_json::Value;
use thiserror::Error;

use crate::card::Card;

use super::ProtocolMode;

/// Highest bid a seat can place.
pub const MAX_BID: u8 = 3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("no digit found in bid response")]
    NoDigit,
    #[error("response is not valid JSON: {0}")]
    Json(String),
    #[error("expected {expected}, got '{found}'")]
    Shape {
        expected: &'static str,
        found: String,
    },
    #[error("value {0} is out of range")]
    OutOfRange(i64),
}

/// Extracts a bid from a bot response.
///
/// In compat mode the first ASCII digit anywhere in the text is the bid. In strict mode the
/// text must be a JSON number or `{"response": <number>}` in `0..=3`.
pub fn parse_bid(text: &str, mode: ProtocolMode) -> Result<u8, ParseError> {
    match mode {
        ProtocolMode::Compat => text
            .bytes()
            .find(u8::is_ascii_digit)
            .map(|b| b - b'0')
            .ok_or(ParseError::NoDigit),
        ProtocolMode::Strict => {
            let value = strict_payload(text)?;
            let bid = value.as_i64().ok_or_else(|| ParseError::Shape {
                expected: "an integer bid",
                found: value.to_string(),
            })?;
            if !(0..=MAX_BID as i64).contains(&bid) {
                return Err(ParseError::OutOfRange(bid));
            }
            Ok(bid as u8)
        }
    }
}

/// Extracts the cards a bot played.
///
/// In compat mode the text is scanned up to the first `]`; each run of digits seen before it
/// is one card and everything else is skipped. Reaching the end of the text also ends the
/// list. In strict mode the text must be a JSON array of cards or `{"response": [...]}`.
pub fn parse_cards(text: &str, mode: ProtocolMode) -> Result<Vec<Card>, ParseError> {
    match mode {
        ProtocolMode::Compat => {
            let mut cards = vec![];
            let mut bytes = text.bytes().take_while(|b| *b != b']').peekable();
            while let Some(b) = bytes.next() {
                if !b.is_ascii_digit() {
                    continue;
                }
                let mut value = i64::from(b - b'0');
                while let Some(d) = bytes.next_if(u8::is_ascii_digit) {
                    value = value.saturating_mul(10).saturating_add(i64::from(d - b'0'));
                }
                cards.push(card_from(value)?);
            }
            Ok(cards)
        }
        ProtocolMode::Strict => {
            let value = strict_payload(text)?;
            let Value::Array(items) = value else {
                return Err(ParseError::Shape {
                    expected: "an array of cards",
                    found: value.to_string(),
                });
            };
            items
                .iter()
                .map(|item| {
                    item.as_i64()
                        .ok_or_else(|| ParseError::Shape {
                            expected: "an integer card",
                            found: item.to_string(),
                        })
                        .and_then(card_from)
                })
                .collect()
        }
    }
}

fn card_from(value: i64) -> Result<Card, ParseError> {
    u8::try_from(value)
        .ok()
        .and_then(Card::new)
        .ok_or(ParseError::OutOfRange(value))
}

/// The JSON payload of a strict response, unwrapping a `{"response": ...}` object.
fn strict_payload(text: &str) -> Result<Value, ParseError> {
    let value: Value =
        serde_json::from_str(text.trim()).map_err(|e| ParseError::Json(e.to_string()))?;
    match value {
        Value::Object(mut map) => map.remove("response").ok_or_else(|| ParseError::Shape {
            expected: "a 'response' field",
            found: Value::Object(map).to_string(),
        }),
        other => Ok(other),
    }
}
