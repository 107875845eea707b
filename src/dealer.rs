//! Shuffling and dealing.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::card::{Card, DECK_SIZE};

/// Number of seats at the table.
pub const NUM_SEATS: usize = 3;
/// Cards dealt to each seat.
pub const HAND_SIZE: usize = 17;
/// Cards set aside for the landlord.
pub const RESERVE_SIZE: usize = DECK_SIZE - HAND_SIZE * NUM_SEATS;

/// The cards of one round: a hand per seat plus the reserve ("kitty").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    pub hands: [Vec<Card>; NUM_SEATS],
    pub reserve: Vec<Card>,
}

/// Owns the deck and the random generator used to shuffle it.
#[derive(Debug)]
pub struct Dealer {
    deck: [Card; DECK_SIZE],
    rng: StdRng,
    stacked: bool,
}

impl Dealer {
    /// Deterministic dealer: the same seed always produces the same sequence of deals.
    pub fn seeded(seed: u64) -> Dealer {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Dealer {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Dealer that always deals `deck` as given: [`shuffle`](Self::shuffle) leaves it as is.
    ///
    /// # Panics
    /// If `deck` is not a permutation of the 54 cards.
    pub fn stacked(deck: [Card; DECK_SIZE]) -> Dealer {
        let mut sorted = deck;
        sorted.sort_unstable();
        assert!(
            sorted.iter().copied().eq(Card::all()),
            "a stacked deck must hold every card exactly once"
        );
        Dealer {
            deck,
            rng: StdRng::seed_from_u64(0),
            stacked: true,
        }
    }

    fn with_rng(rng: StdRng) -> Dealer {
        let mut dealer = Dealer {
            deck: ordered_deck(),
            rng,
            stacked: false,
        };
        dealer.shuffle();
        dealer
    }

    /// Rebuilds the deck and applies a uniformly random permutation. Stacked decks stay put.
    pub fn shuffle(&mut self) {
        if self.stacked {
            return;
        }
        self.deck = ordered_deck();
        self.deck.shuffle(&mut self.rng);
    }

    pub fn deck(&self) -> &[Card] {
        &self.deck
    }

    /// Deals one card to each seat in turn for 17 steps, then sets aside the last 3 cards.
    pub fn deal(&self) -> Deal {
        let mut hands: [Vec<Card>; NUM_SEATS] = Default::default();
        for step in self.deck[..HAND_SIZE * NUM_SEATS].chunks_exact(NUM_SEATS) {
            for (hand, card) in hands.iter_mut().zip(step) {
                hand.push(*card);
            }
        }
        let reserve = self.deck[HAND_SIZE * NUM_SEATS..].to_vec();
        Deal { hands, reserve }
    }
}

/// The unshuffled deck, `0..54` in order.
pub fn ordered_deck() -> [Card; DECK_SIZE] {
    let mut deck = [Card::SMALL_JOKER; DECK_SIZE];
    for (slot, card) in deck.iter_mut().zip(Card::all()) {
        *slot = card;
    }
    deck
}
