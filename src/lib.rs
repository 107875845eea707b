//! # Landlord Arena
//!
//! A simulator for the three-player "landlord" card game that tunes the parameters of external
//! bots by self-play.
//!
//! It provides:
//! - Dealing, bidding, trick play and scoring of a game (`game`)
//! - A file-based text protocol to talk to bots running as separate OS processes (`agent`,
//!   `protocol`)
//! - Seat rotation, so every bot plays every seat of the same deal (`seating`)
//! - An evolutionary loop over a shared parameter vector (`evolution`, `Simulator`)
//!
//! Bots are programs launched once per decision. Before each launch the simulator writes the
//! bot's parameters and the request to files in the working directory; the bot writes its
//! answer to a third file and exits.
//!
//! # Documentation Overview
//!
//! - For the epoch / round / game loop and failure handling, see the [`simulator`] module.
//! - For configuring the simulation, see [`Configuration`](crate::configuration::Configuration).
//! - For the wire format, see the [`protocol`] module.
//! - For plugging in other kinds of bots, implement the [`Agent`](crate::agent::Agent) trait.
//!
//! # Usage Example
//!
//! ```no_run
//! use landlord_arena::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Configuration::new().with_epochs(10).with_seed(42);
//!     let files = ExchangeFiles::in_dir(config.work_dir());
//!
//!     let agents: Vec<Box<dyn Agent>> = (0..3)
//!         .map(|bot| {
//!             Box::new(
//!                 ExternalAgent::new(format!("bot{bot}"), format!("./bot{bot}"), files.clone())
//!                     .with_timeout(config.action_timeout()),
//!             ) as Box<dyn Agent>
//!         })
//!         .collect();
//!
//!     let mut simulator = Simulator::new(agents, config)?;
//!     for report in simulator.run()? {
//!         println!("{report}");
//!     }
//!     Ok(())
//! }
//! ```

pub use anyhow;
pub mod agent;
pub mod card;
pub mod configuration;
pub mod dealer;
pub mod evolution;
pub mod game;
pub mod gateway;
mod logger;
mod process;
pub mod protocol;
pub mod seating;
pub mod simulator;
pub mod transcript;

/// Commonly used types and traits for quick access.
///
/// ```rust
/// use landlord_arena::prelude::*;
/// ```
pub mod prelude {
    pub use crate::agent::{
        Agent, AgentError, ConstantAgent, ExchangeFiles, ExternalAgent, ScriptedAgent,
    };
    pub use crate::configuration::Configuration;
    pub use crate::dealer::Dealer;
    pub use crate::protocol::ProtocolMode;
    pub use crate::seating::{PlayerOrder, SeatRotation};
    pub use crate::simulator::{EpochReport, Simulator};
}
