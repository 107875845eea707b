//! One game: bidding, trick playing and scoring.

pub mod bidding;
pub mod playing;
pub mod scoring;

use thiserror::Error;
use tracing::{debug, instrument};

use crate::agent::{Agent, AgentError};
use crate::card::Card;
use crate::dealer::{Deal, NUM_SEATS};
use crate::gateway::Gateway;
use crate::protocol::{BidRequest, PlayRequest};
use crate::seating::PlayerOrder;

pub use bidding::{Bidding, BiddingState, Contract};
pub use playing::{Finished, PlayPhase, PlayState};
pub use scoring::{deltas_by_bot, score_deltas};

#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Agent(#[from] AgentError),
    #[error("no hand was emptied within {limit} turns")]
    TurnLimit { limit: u32 },
}

impl GameError {
    pub fn is_fatal(&self) -> bool {
        match self {
            GameError::Agent(e) => e.is_fatal(),
            GameError::TurnLimit { .. } => false,
        }
    }
}

/// The bots of a game and the parameters each one plays with, seen through the seating.
///
/// `agents` and `parameters` are indexed by bot, requests are addressed by seat.
pub struct Table<'t, 'a> {
    agents: &'t mut [&'a mut dyn Agent],
    parameters: &'t [Vec<f64>],
    order: PlayerOrder,
}

impl<'t, 'a> Table<'t, 'a> {
    /// # Panics
    /// If there is not exactly one agent and one parameter vector per seat.
    pub fn new(
        agents: &'t mut [&'a mut dyn Agent],
        parameters: &'t [Vec<f64>],
        order: PlayerOrder,
    ) -> Table<'t, 'a> {
        assert_eq!(agents.len(), NUM_SEATS, "one agent per seat");
        assert_eq!(parameters.len(), NUM_SEATS, "one parameter vector per seat");
        Table {
            agents,
            parameters,
            order,
        }
    }

    pub fn order(&self) -> PlayerOrder {
        self.order
    }

    fn bid(
        &mut self,
        gateway: &mut Gateway,
        seat: usize,
        request: &BidRequest<'_>,
    ) -> Result<u8, AgentError> {
        let bot = self.order.bot_at(seat);
        gateway.request_bid(&mut *self.agents[bot], &self.parameters[bot], request)
    }

    fn play(
        &mut self,
        gateway: &mut Gateway,
        seat: usize,
        request: &PlayRequest<'_>,
    ) -> Result<Vec<Card>, AgentError> {
        let bot = self.order.bot_at(seat);
        gateway.request_play(&mut *self.agents[bot], &self.parameters[bot], request)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOutcome {
    pub contract: Contract,
    pub finished: Finished,
    /// Score change per seat.
    pub seat_deltas: [i64; NUM_SEATS],
    /// Score change per bot.
    pub bot_deltas: [i64; NUM_SEATS],
}

impl GameOutcome {
    pub fn landlord_won(&self) -> bool {
        self.finished.winner == self.contract.landlord
    }
}

/// Plays a full game on `deal` with the seating of `table`.
#[instrument(skip_all, fields(order = %table.order()))]
pub fn play_game(
    deal: &Deal,
    table: &mut Table<'_, '_>,
    gateway: &mut Gateway,
    turn_limit: u32,
) -> Result<GameOutcome, GameError> {
    let contract = bidding::run(deal, table, gateway)?;
    debug!(?contract, "bidding resolved");

    let finished = playing::run(deal, contract, table, gateway, turn_limit)?;
    let seat_deltas = score_deltas(contract.landlord, finished.winner, finished.score);
    let outcome = GameOutcome {
        contract,
        finished,
        seat_deltas,
        bot_deltas: deltas_by_bot(seat_deltas, table.order()),
    };
    debug!(?outcome, "game finished");
    Ok(outcome)
}
