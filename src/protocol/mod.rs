//! Text protocol spoken with the bots.
//!
//! Requests are hand-assembled text (not a serializer) so that the exact bytes that existing
//! bots were written against can be reproduced. Responses are parsed either leniently, as
//! those bots expect, or strictly as JSON.
//!
//! # Request envelope
//!
//! ```text
//! {"requests":[{"own":[1,4,7],"bid":[0,2]}],"responses":[]}
//! ```
//!
//! The `responses` array is always empty.

pub mod request;
pub mod response;

pub use request::{envelope, BidRequest, OpeningInfo, PlayRequest};
pub use response::{parse_bid, parse_cards, ParseError};

/// Selects between byte-for-byte compatibility with legacy bots and well-formed JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProtocolMode {
    /// Requests reproduce the historical text, quirks included; responses are scanned
    /// for digits.
    #[default]
    Compat,
    /// Requests are valid JSON; responses must be valid JSON with in-range values.
    Strict,
}
