use tracing::trace;

use crate::card::{doubles_score, remove_played, Card};
use crate::dealer::{Deal, NUM_SEATS};
use crate::gateway::Gateway;
use crate::protocol::{OpeningInfo, PlayRequest};

use super::bidding::Contract;
use super::{GameError, Table};

/// Turn numbers continue from bidding, so the first play turn is 2.
pub const FIRST_PLAY_TURN: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Finished {
    /// Seat that emptied its hand.
    pub winner: usize,
    /// Contract bid after every doubling, capped at `u32::MAX`.
    pub score: u32,
    /// Turn during which the game ended.
    pub turn: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Turn { seat: usize, turn: u32 },
    Finished(Finished),
}

/// Trick-playing state machine.
///
/// Seats play in order `0, 1, 2` every turn, whoever the landlord is. The game ends the
/// moment one hand is empty, without letting the remaining seats of that turn play.
#[derive(Debug, Clone)]
pub struct PlayPhase {
    hands: [Vec<Card>; NUM_SEATS],
    last_played: [Vec<Card>; NUM_SEATS],
    reserve: Vec<Card>,
    contract: Contract,
    score: u32,
    seat: usize,
    turn: u32,
    finished: Option<Finished>,
}

impl PlayPhase {
    /// Starts the phase; the reserve joins the landlord's hand.
    pub fn new(deal: &Deal, contract: Contract) -> PlayPhase {
        let mut hands = deal.hands.clone();
        hands[contract.landlord].extend_from_slice(&deal.reserve);
        PlayPhase {
            hands,
            last_played: Default::default(),
            reserve: deal.reserve.clone(),
            contract,
            score: contract.bid,
            seat: 0,
            turn: FIRST_PLAY_TURN,
            finished: None,
        }
    }

    pub fn state(&self) -> PlayState {
        match self.finished {
            Some(finished) => PlayState::Finished(finished),
            None => PlayState::Turn {
                seat: self.seat,
                turn: self.turn,
            },
        }
    }

    pub fn hand(&self, seat: usize) -> &[Card] {
        &self.hands[seat]
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// What the seat to play gets to see.
    ///
    /// Only the latest play of each other seat is shown, not the whole game. The reserve,
    /// landlord, position and contract are only sent on the first play turn.
    pub fn request(&self) -> PlayRequest<'_> {
        let seat = self.seat;
        let opening = (self.turn == FIRST_PLAY_TURN).then(|| OpeningInfo {
            reserve: &self.reserve,
            landlord: self.contract.landlord,
            seat,
            final_bid: self.contract.bid,
        });
        PlayRequest {
            history: [
                &self.last_played[(seat + 1) % NUM_SEATS],
                &self.last_played[(seat + 2) % NUM_SEATS],
            ],
            own: &self.hands[seat],
            opening,
        }
    }

    /// Applies the cards played by the seat whose turn it is.
    ///
    /// Cards the seat does not hold are ignored when updating its hand, but still count for
    /// the doubling patterns and still show up in the history.
    ///
    /// # Panics
    /// If the game is already finished.
    pub fn apply(&mut self, played: Vec<Card>) -> PlayState {
        assert!(self.finished.is_none(), "play applied to a finished game");
        let seat = self.seat;

        remove_played(&mut self.hands[seat], &played);
        if doubles_score(&played) {
            self.score = self.score.saturating_mul(2);
        }
        self.last_played[seat] = played;

        if self.hands[seat].is_empty() {
            self.finished = Some(Finished {
                winner: seat,
                score: self.score,
                turn: self.turn,
            });
        } else if seat + 1 == NUM_SEATS {
            self.seat = 0;
            self.turn += 1;
        } else {
            self.seat += 1;
        }
        self.state()
    }
}

/// Plays turns until a hand is empty or `turn_limit` full turns went by.
pub(super) fn run(
    deal: &Deal,
    contract: Contract,
    table: &mut Table<'_, '_>,
    gateway: &mut Gateway,
    turn_limit: u32,
) -> Result<Finished, GameError> {
    let mut phase = PlayPhase::new(deal, contract);
    loop {
        match phase.state() {
            PlayState::Finished(finished) => return Ok(finished),
            PlayState::Turn { turn, .. } if turn - FIRST_PLAY_TURN >= turn_limit => {
                return Err(GameError::TurnLimit { limit: turn_limit });
            }
            PlayState::Turn { seat, turn } => {
                let played = table.play(gateway, seat, &phase.request())?;
                trace!(seat, turn, ?played, "play");
                phase.apply(played);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dealer::{ordered_deck, Dealer};

    fn cards(values: &[u8]) -> Vec<Card> {
        values.iter().map(|v| Card::new(*v).unwrap()).collect()
    }

    fn phase(landlord: usize, bid: u32) -> PlayPhase {
        let deal = Dealer::stacked(ordered_deck()).deal();
        PlayPhase::new(&deal, Contract { landlord, bid })
    }

    #[test]
    fn landlord_receives_reserve() {
        let phase = phase(1, 1);
        assert_eq!(phase.hand(0).len(), 17);
        assert_eq!(phase.hand(1).len(), 20);
        assert_eq!(phase.hand(2).len(), 17);
        assert!(phase.hand(1).ends_with(&cards(&[51, 52, 53])));
    }

    #[test]
    fn turns_cycle_through_seats() {
        let mut phase = phase(0, 1);
        assert_eq!(phase.state(), PlayState::Turn { seat: 0, turn: 2 });
        phase.apply(vec![]);
        phase.apply(vec![]);
        assert_eq!(phase.state(), PlayState::Turn { seat: 2, turn: 2 });
        phase.apply(vec![]);
        assert_eq!(phase.state(), PlayState::Turn { seat: 0, turn: 3 });
    }

    #[test]
    fn opening_context_only_on_first_turn() {
        let mut phase = phase(2, 3);
        let request = phase.request();
        let opening = request.opening.unwrap();
        assert_eq!(opening.landlord, 2);
        assert_eq!(opening.seat, 0);
        assert_eq!(opening.final_bid, 3);
        assert_eq!(opening.reserve, cards(&[51, 52, 53]));

        for _ in 0..3 {
            phase.apply(vec![]);
        }
        assert!(phase.request().opening.is_none());
    }

    #[test]
    fn history_shows_latest_play_of_the_next_two_seats() {
        let mut phase = phase(0, 1);
        phase.apply(cards(&[0]));
        phase.apply(cards(&[1]));
        // seat 2 sees seat 0 then seat 1
        let request = phase.request();
        assert_eq!(request.history[0], cards(&[0]));
        assert_eq!(request.history[1], cards(&[1]));

        phase.apply(cards(&[2]));
        phase.apply(cards(&[3]));
        // seat 1 sees seat 2 then the newer play of seat 0
        let request = phase.request();
        assert_eq!(request.history[0], cards(&[2]));
        assert_eq!(request.history[1], cards(&[3]));
    }

    #[test]
    fn doubling_patterns_multiply_score() {
        let mut phase = phase(2, 3);
        // seat 0 holds 0, 3, 6, 9..., seat 1 holds 1, 4, 7..., seat 2 holds 2, 5, ... + reserve
        phase.apply(cards(&[0, 1, 2, 3]));
        assert_eq!(phase.score(), 6);
        phase.apply(cards(&[4, 7]));
        assert_eq!(phase.score(), 6);
        phase.apply(cards(&[52, 53]));
        assert_eq!(phase.score(), 12);
        assert!(!phase.hand(2).contains(&Card::BIG_JOKER));
    }

    #[test]
    fn repeated_rockets_saturate_the_score() {
        let mut phase = phase(0, 3);
        for _ in 0..40 {
            phase.apply(cards(&[52, 53]));
        }
        assert_eq!(phase.score(), u32::MAX);
        assert_eq!(phase.state(), PlayState::Turn { seat: 1, turn: 15 });
    }

    #[test]
    fn emptying_a_hand_ends_the_game_immediately() {
        let mut phase = phase(1, 2);
        let seat_0 = phase.hand(0).to_vec();
        let state = phase.apply(seat_0);
        assert_eq!(
            state,
            PlayState::Finished(Finished {
                winner: 0,
                score: 2,
                turn: 2
            })
        );
    }

    #[test]
    #[should_panic]
    fn no_play_after_the_end() {
        let mut phase = phase(1, 2);
        let seat_0 = phase.hand(0).to_vec();
        phase.apply(seat_0);
        phase.apply(vec![]);
    }
}
