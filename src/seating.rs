//! Which bot sits at which seat.
//!
//! Seats are table positions (`0..3`), bots are agent identities (`0..3`). A [`PlayerOrder`]
//! maps the former to the latter, and a [`SeatRotation`] decides how that mapping changes
//! between the games of a round.

use std::fmt::Display;

use crate::dealer::NUM_SEATS;

/// Permutation of the bots: `order.bot_at(seat)` plays `seat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerOrder([usize; NUM_SEATS]);

impl PlayerOrder {
    pub fn identity() -> PlayerOrder {
        PlayerOrder([0, 1, 2])
    }

    /// Returns `None` unless `bots` holds each of `0..3` exactly once.
    pub fn new(bots: [usize; NUM_SEATS]) -> Option<PlayerOrder> {
        let mut seen = [false; NUM_SEATS];
        for bot in bots {
            if bot >= NUM_SEATS || seen[bot] {
                return None;
            }
            seen[bot] = true;
        }
        Some(PlayerOrder(bots))
    }

    pub fn bot_at(&self, seat: usize) -> usize {
        self.0[seat]
    }

    pub fn bots(&self) -> [usize; NUM_SEATS] {
        self.0
    }

    /// Advances to the lexicographically next permutation, wrapping from the last one
    /// (`[2, 1, 0]`) back to the identity.
    pub fn next_permutation(&self) -> PlayerOrder {
        let mut p = self.0;
        let Some(i) = (0..NUM_SEATS - 1).rev().find(|&i| p[i] < p[i + 1]) else {
            p.reverse();
            return PlayerOrder(p);
        };
        let j = (i + 1..NUM_SEATS)
            .rev()
            .find(|&j| p[j] > p[i])
            .unwrap_or(i + 1);
        p.swap(i, j);
        p[i + 1..].reverse();
        PlayerOrder(p)
    }
}

impl Default for PlayerOrder {
    fn default() -> Self {
        Self::identity()
    }
}

impl Display for PlayerOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.0[0], self.0[1], self.0[2])
    }
}

/// How seating changes from one game to the next within a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeatRotation {
    /// Lexicographic permutation order, starting from the identity.
    ///
    /// All six seatings are visited evenly only when the number of games per round is a
    /// multiple of six.
    Lexicographic { current: PlayerOrder },
    /// The same seating for every game.
    Fixed(PlayerOrder),
    /// An explicit sequence of seatings, cycled.
    Scripted {
        orders: Vec<PlayerOrder>,
        index: usize,
    },
}

impl SeatRotation {
    pub fn lexicographic() -> SeatRotation {
        SeatRotation::Lexicographic {
            current: PlayerOrder::identity(),
        }
    }

    /// # Panics
    /// If `orders` is empty.
    pub fn scripted(orders: Vec<PlayerOrder>) -> SeatRotation {
        assert!(!orders.is_empty(), "a scripted rotation needs at least one order");
        SeatRotation::Scripted { orders, index: 0 }
    }

    pub fn current(&self) -> PlayerOrder {
        match self {
            SeatRotation::Lexicographic { current } => *current,
            SeatRotation::Fixed(order) => *order,
            SeatRotation::Scripted { orders, index } => orders[*index],
        }
    }

    pub fn advance(&mut self) {
        match self {
            SeatRotation::Lexicographic { current } => *current = current.next_permutation(),
            SeatRotation::Fixed(_) => {}
            SeatRotation::Scripted { orders, index } => *index = (*index + 1) % orders.len(),
        }
    }

    /// Back to the first seating; called at the start of every round.
    pub fn reset(&mut self) {
        match self {
            SeatRotation::Lexicographic { current } => *current = PlayerOrder::identity(),
            SeatRotation::Fixed(_) => {}
            SeatRotation::Scripted { index, .. } => *index = 0,
        }
    }
}

impl Default for SeatRotation {
    fn default() -> Self {
        Self::lexicographic()
    }
}
