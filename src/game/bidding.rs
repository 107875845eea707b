use tracing::trace;

use crate::agent::AgentError;
use crate::dealer::{Deal, NUM_SEATS};
use crate::gateway::Gateway;
use crate::protocol::response::MAX_BID;
use crate::protocol::BidRequest;

use super::Table;

/// Outcome of the bidding: who is landlord and the base score of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contract {
    pub landlord: usize,
    /// Highest bid, never below 1.
    pub bid: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiddingState {
    NotStarted,
    PlayerBidding(usize),
    Resolved(Contract),
}

/// Bidding state machine. Seats bid once each, in seat order.
#[derive(Debug, Clone)]
pub struct Bidding {
    state: BiddingState,
    bids: Vec<u8>,
    best_seat: usize,
    best_bid: u8,
}

impl Bidding {
    pub fn new() -> Bidding {
        Bidding {
            state: BiddingState::NotStarted,
            bids: Vec::with_capacity(NUM_SEATS),
            best_seat: 0,
            best_bid: 0,
        }
    }

    pub fn state(&self) -> BiddingState {
        self.state
    }

    /// Bids placed so far, in seat order.
    pub fn bids(&self) -> &[u8] {
        &self.bids
    }

    pub fn start(&mut self) -> BiddingState {
        if self.state == BiddingState::NotStarted {
            self.state = BiddingState::PlayerBidding(0);
        }
        self.state
    }

    /// Records the bid of the seat whose turn it is.
    ///
    /// Only a strictly higher bid takes the lead, so the first claimant wins ties. Bidding
    /// ends after the last seat, or as soon as the maximum bid has been reached.
    ///
    /// # Panics
    /// If no seat is currently bidding.
    pub fn record(&mut self, bid: u8) -> BiddingState {
        let BiddingState::PlayerBidding(seat) = self.state else {
            panic!("bid recorded while bidding is {:?}", self.state);
        };
        self.bids.push(bid);
        if bid > self.best_bid {
            self.best_bid = bid;
            self.best_seat = seat;
        }

        self.state = if self.best_bid == MAX_BID || seat + 1 == NUM_SEATS {
            BiddingState::Resolved(Contract {
                landlord: self.best_seat,
                bid: u32::from(self.best_bid.max(1)),
            })
        } else {
            BiddingState::PlayerBidding(seat + 1)
        };
        self.state
    }
}

impl Default for Bidding {
    fn default() -> Self {
        Self::new()
    }
}

/// Asks every seat for a bid and resolves the contract.
pub(super) fn run(
    deal: &Deal,
    table: &mut Table<'_, '_>,
    gateway: &mut Gateway,
) -> Result<Contract, AgentError> {
    let mut bidding = Bidding::new();
    let mut state = bidding.start();
    loop {
        match state {
            BiddingState::PlayerBidding(seat) => {
                let request = BidRequest {
                    own: &deal.hands[seat],
                    bids: bidding.bids(),
                };
                let bid = table.bid(gateway, seat, &request)?;
                trace!(seat, bid, "bid");
                state = bidding.record(bid);
            }
            BiddingState::Resolved(contract) => return Ok(contract),
            BiddingState::NotStarted => unreachable!("bidding was started"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bid_all(bids: &[u8]) -> (BiddingState, usize) {
        let mut bidding = Bidding::new();
        let mut state = bidding.start();
        let mut asked = 0;
        for bid in bids {
            if !matches!(state, BiddingState::PlayerBidding(_)) {
                break;
            }
            state = bidding.record(*bid);
            asked += 1;
        }
        (state, asked)
    }

    #[test]
    fn highest_bid_wins() {
        let (state, asked) = bid_all(&[1, 0, 2]);
        assert_eq!(asked, 3);
        assert_eq!(
            state,
            BiddingState::Resolved(Contract {
                landlord: 2,
                bid: 2
            })
        );
    }

    #[test]
    fn nobody_bids_gives_minimum_contract() {
        let (state, _) = bid_all(&[0, 0, 0]);
        assert_eq!(
            state,
            BiddingState::Resolved(Contract {
                landlord: 0,
                bid: 1
            })
        );
    }

    #[test]
    fn first_claimant_wins_ties() {
        let (state, _) = bid_all(&[0, 2, 2]);
        assert_eq!(
            state,
            BiddingState::Resolved(Contract {
                landlord: 1,
                bid: 2
            })
        );
    }

    #[test]
    fn maximum_bid_stops_bidding() {
        let (state, asked) = bid_all(&[3, 1, 2]);
        assert_eq!(asked, 1);
        assert_eq!(
            state,
            BiddingState::Resolved(Contract {
                landlord: 0,
                bid: 3
            })
        );

        let (state, asked) = bid_all(&[1, 3, 0]);
        assert_eq!(asked, 2);
        assert_eq!(
            state,
            BiddingState::Resolved(Contract {
                landlord: 1,
                bid: 3
            })
        );
    }

    #[test]
    fn bids_are_kept_in_order() {
        let mut bidding = Bidding::new();
        bidding.start();
        bidding.record(1);
        bidding.record(0);
        assert_eq!(bidding.bids(), [1, 0]);
        assert_eq!(bidding.state(), BiddingState::PlayerBidding(2));
    }

    #[test]
    #[should_panic]
    fn recording_before_start_panics() {
        Bidding::new().record(1);
    }
}
