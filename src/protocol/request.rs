use std::fmt::{Display, Write};

use crate::card::Card;

use super::ProtocolMode;

/// Wraps a request fragment into the full text written to the bot's standard input.
pub fn envelope(fragment: &str) -> String {
    format!("{{{fragment}],\"responses\":[]}}")
}

/// Bidding request: the seat's dealt hand and the bids placed so far this game.
#[derive(Debug, Clone, Copy)]
pub struct BidRequest<'a> {
    pub own: &'a [Card],
    pub bids: &'a [u8],
}

impl BidRequest<'_> {
    pub fn fragment(&self) -> String {
        let mut out = String::from("\"requests\":[{");
        push_list(&mut out, Some("own"), self.own);
        out.push(',');
        push_list(&mut out, Some("bid"), self.bids);
        out.push('}');
        out
    }
}

/// Context sent only on the first play turn of a game.
#[derive(Debug, Clone, Copy)]
pub struct OpeningInfo<'a> {
    pub reserve: &'a [Card],
    pub landlord: usize,
    pub seat: usize,
    pub final_bid: u32,
}

/// Play request for one seat.
#[derive(Debug, Clone, Copy)]
pub struct PlayRequest<'a> {
    /// Latest plays of seats `seat + 1` and `seat + 2`, in that order.
    pub history: [&'a [Card]; 2],
    pub own: &'a [Card],
    /// `Some` on the first play turn only.
    pub opening: Option<OpeningInfo<'a>>,
}

impl PlayRequest<'_> {
    pub fn fragment(&self, mode: ProtocolMode) -> String {
        let mut out = String::from("\"requests\":[");
        if self.opening.is_none() && mode == ProtocolMode::Compat {
            // legacy bots expect this stray comma after the first turn
            out.push(',');
        }
        out.push('{');

        out.push_str("\"history\":[");
        for (i, played) in self.history.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            match mode {
                ProtocolMode::Compat => push_list(&mut out, Some(""), played),
                ProtocolMode::Strict => push_list(&mut out, None, played),
            }
        }
        out.push_str("],");
        push_list(&mut out, Some("own"), self.own);

        if let Some(opening) = &self.opening {
            out.push(',');
            push_list(&mut out, Some("publiccard"), opening.reserve);
            let _ = write!(
                out,
                ",\"landlord\":{},\"pos\":{},\"finalbid\":{}",
                opening.landlord, opening.seat, opening.final_bid
            );
        }
        out.push('}');
        out
    }
}

fn push_list<T: Display>(out: &mut String, key: Option<&str>, values: &[T]) {
    if let Some(key) = key {
        let _ = write!(out, "\"{key}\":");
    }
    out.push('[');
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "{value}");
    }
    out.push(']');
}
