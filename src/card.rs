//! Card encoding shared by every other module.
//!
//! A card is a small integer in `0..=53`. Values `0..52` are the standard deck, where
//! `value / 4` groups the four suits of one rank together. `52` and `53` are the two jokers.

use std::fmt::Display;

/// Number of cards in a full deck, jokers included.
pub const DECK_SIZE: usize = 54;

/// A single card, stored as its integer encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Card(u8);

impl Card {
    /// The black joker.
    pub const SMALL_JOKER: Card = Card(52);
    /// The red joker.
    pub const BIG_JOKER: Card = Card(53);

    /// Returns `None` when `value` is outside `0..=53`.
    pub fn new(value: u8) -> Option<Card> {
        if (value as usize) < DECK_SIZE {
            Some(Card(value))
        } else {
            None
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_joker(self) -> bool {
        self.0 >= Self::SMALL_JOKER.0
    }

    /// Cards sharing a rank group differ only by suit. Both jokers share group 13.
    pub fn rank_group(self) -> u8 {
        self.0 / 4
    }

    /// Every card of the deck in ascending order.
    pub fn all() -> impl Iterator<Item = Card> {
        (0..DECK_SIZE as u8).map(Card)
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// True when a single play doubles the running score of the game.
///
/// Two patterns qualify: both jokers played together ("rocket") and four cards of one rank
/// group ("bomb"). Anything else leaves the score unchanged.
pub fn doubles_score(played: &[Card]) -> bool {
    match played {
        [a, b] => a.is_joker() && b.is_joker() && a != b,
        [first, rest @ ..] if played.len() == 4 => {
            rest.iter().all(|c| c.rank_group() == first.rank_group())
        }
        _ => false,
    }
}

/// Removes `played` from `hand` as a multiset difference.
///
/// Cards that are not in the hand are ignored, so the hand never grows. The remaining hand
/// is left sorted.
pub fn remove_played(hand: &mut Vec<Card>, played: &[Card]) {
    hand.sort_unstable();
    let mut played = played.to_vec();
    played.sort_unstable();

    let mut remaining = Vec::with_capacity(hand.len());
    let mut to_remove = played.into_iter().peekable();
    for card in hand.drain(..) {
        while to_remove.next_if(|c| *c < card).is_some() {}
        if to_remove.next_if_eq(&card).is_none() {
            remaining.push(card);
        }
    }
    *hand = remaining;
}
