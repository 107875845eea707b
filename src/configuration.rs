//! Config for the simulator behaviors
//!
//! Configuration can be created programmatically using [`Configuration::new()`] or by reading
//! environment variables using [`Configuration::from_env()`].
//!
//! # Environment Variables
//!
//! All values are optional. Flags are enabled by the (case-insensitive) value `"true"`;
//! numbers that fail to parse fall back to the default.
//!
//! - `ARENA_VERBOSE` — Print per-game scores and epoch results (default: `true`)
//! - `ARENA_LOG` — Enable logging to a file (default: `false`)
//! - `ARENA_STRICT` — Use the strict protocol instead of the legacy one (default: `false`)
//! - `ARENA_TRANSCRIPT` — Keep a transcript of the current round's requests (default: `true`)
//! - `ARENA_DEBUG_AGENT_STDERR` — Let bot stderr through (default: `false`)
//! - `ARENA_EPOCHS` — Number of epochs (default: `100`)
//! - `ARENA_ROUNDS` — Rounds per epoch (default: `50`)
//! - `ARENA_GAMES` — Games per round (default: `6`)
//! - `ARENA_PARAMETERS` — Length of the parameter vector (default: `23`)
//! - `ARENA_TIMEOUT_MS` — Time a bot gets per decision, `0` for no limit (default: `10000`)
//! - `ARENA_TURN_LIMIT` — Turns after which a game is abandoned (default: `100`)
//! - `ARENA_MUTATION_STEP` — Largest mutation step (default: `0.1`)
//! - `ARENA_SEED` — Seed for shuffling and mutations (default: random)
//! - `ARENA_WORK_DIR` — Directory of the exchange files and transcript (default: `.`)

use std::{path::PathBuf, str::FromStr, time::Duration};

use crate::evolution::{DEFAULT_CONTROL_BOT, DEFAULT_PARAMETER_COUNT};
use crate::protocol::ProtocolMode;

/// Configuration for simulator behaviors.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    pub(crate) verbose: bool,
    pub(crate) log: bool,
    pub(crate) protocol: ProtocolMode,
    pub(crate) transcript: bool,
    pub(crate) debug_agent_stderr: bool,
    pub(crate) epochs: usize,
    pub(crate) rounds_per_epoch: usize,
    pub(crate) games_per_round: usize,
    pub(crate) parameter_count: usize,
    pub(crate) control_bot: usize,
    pub(crate) action_timeout: Option<Duration>,
    pub(crate) turn_limit: u32,
    pub(crate) mutation_step: f64,
    pub(crate) seed: Option<u64>,
    pub(crate) work_dir: PathBuf,
}

impl Configuration {
    /// Create a new configuration with default parameters.
    ///
    /// By default:
    /// - Per-game scores and epoch results are printed to stdout.
    /// - Logging to file is disabled.
    /// - The legacy protocol is spoken, and a transcript is kept.
    /// - 100 epochs of 50 rounds of 6 games, with 23 parameters, bot 1 as control.
    /// - Bots get 10 seconds per decision, games are abandoned after 100 turns.
    /// - Shuffles and mutations are seeded from entropy.
    /// - Exchange files live in the current directory.
    pub fn new() -> Self {
        Self {
            verbose: true,
            log: false,
            protocol: ProtocolMode::Compat,
            transcript: true,
            debug_agent_stderr: false,
            epochs: 100,
            rounds_per_epoch: 50,
            games_per_round: 6,
            parameter_count: DEFAULT_PARAMETER_COUNT,
            control_bot: DEFAULT_CONTROL_BOT,
            action_timeout: Some(Duration::from_secs(10)),
            turn_limit: 100,
            mutation_step: 0.1,
            seed: None,
            work_dir: PathBuf::from("."),
        }
    }

    /// Create configuration from environment variables, see the [module documentation](self).
    pub fn from_env() -> Self {
        fn get_env_flag(var: &str, default: bool) -> bool {
            match std::env::var(var) {
                Ok(val) => val.eq_ignore_ascii_case("true"),
                Err(_) => default,
            }
        }

        fn get_env_value<T: FromStr>(var: &str) -> Option<T> {
            std::env::var(var).ok()?.trim().parse().ok()
        }

        let default = Self::new();
        let protocol = if get_env_flag("ARENA_STRICT", false) {
            ProtocolMode::Strict
        } else {
            ProtocolMode::Compat
        };
        let action_timeout = match get_env_value::<u64>("ARENA_TIMEOUT_MS") {
            Some(0) => None,
            Some(ms) => Some(Duration::from_millis(ms)),
            None => default.action_timeout,
        };

        Self {
            verbose: get_env_flag("ARENA_VERBOSE", default.verbose),
            log: get_env_flag("ARENA_LOG", default.log),
            protocol,
            transcript: get_env_flag("ARENA_TRANSCRIPT", default.transcript),
            debug_agent_stderr: get_env_flag(
                "ARENA_DEBUG_AGENT_STDERR",
                default.debug_agent_stderr,
            ),
            epochs: get_env_value("ARENA_EPOCHS").unwrap_or(default.epochs),
            rounds_per_epoch: get_env_value("ARENA_ROUNDS").unwrap_or(default.rounds_per_epoch),
            games_per_round: get_env_value("ARENA_GAMES").unwrap_or(default.games_per_round),
            parameter_count: get_env_value("ARENA_PARAMETERS").unwrap_or(default.parameter_count),
            control_bot: default.control_bot,
            action_timeout,
            turn_limit: get_env_value("ARENA_TURN_LIMIT").unwrap_or(default.turn_limit),
            mutation_step: get_env_value("ARENA_MUTATION_STEP").unwrap_or(default.mutation_step),
            seed: get_env_value("ARENA_SEED"),
            work_dir: std::env::var_os("ARENA_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.work_dir),
        }
    }

    /// Enable or disable console output.
    pub fn with_verbose(mut self, value: bool) -> Self {
        self.verbose = value;
        self
    }

    /// Enable or disable logging to file.
    pub fn with_log(mut self, value: bool) -> Self {
        self.log = value;
        self
    }

    pub fn with_protocol(mut self, value: ProtocolMode) -> Self {
        self.protocol = value;
        self
    }

    /// Enable or disable the per-round transcript (`log.txt` in the working directory).
    pub fn with_transcript(mut self, value: bool) -> Self {
        self.transcript = value;
        self
    }

    /// Enable or disable bot stderr output (debug purposes only).
    pub fn with_debug_agent_stderr(mut self, value: bool) -> Self {
        self.debug_agent_stderr = value;
        self
    }

    pub fn with_epochs(mut self, value: usize) -> Self {
        self.epochs = value;
        self
    }

    pub fn with_rounds_per_epoch(mut self, value: usize) -> Self {
        self.rounds_per_epoch = value;
        self
    }

    /// Use a multiple of 6 to give every bot every seat equally often.
    pub fn with_games_per_round(mut self, value: usize) -> Self {
        self.games_per_round = value;
        self
    }

    pub fn with_parameter_count(mut self, value: usize) -> Self {
        self.parameter_count = value;
        self
    }

    /// Bot that always plays the unmodified baseline.
    pub fn with_control_bot(mut self, value: usize) -> Self {
        self.control_bot = value;
        self
    }

    /// `None` waits for bots indefinitely.
    pub fn with_action_timeout(mut self, value: Option<Duration>) -> Self {
        self.action_timeout = value;
        self
    }

    pub fn with_turn_limit(mut self, value: u32) -> Self {
        self.turn_limit = value;
        self
    }

    pub fn with_mutation_step(mut self, value: f64) -> Self {
        self.mutation_step = value;
        self
    }

    /// Fixes the seed of shuffles and mutations, making runs reproducible.
    pub fn with_seed(mut self, value: u64) -> Self {
        self.seed = Some(value);
        self
    }

    pub fn with_work_dir(mut self, value: impl Into<PathBuf>) -> Self {
        self.work_dir = value.into();
        self
    }

    pub fn protocol(&self) -> ProtocolMode {
        self.protocol
    }

    pub fn action_timeout(&self) -> Option<Duration> {
        self.action_timeout
    }

    pub fn debug_agent_stderr(&self) -> bool {
        self.debug_agent_stderr
    }

    pub fn work_dir(&self) -> &std::path::Path {
        &self.work_dir
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}
