//! Core simulation loop.
//!
//! This module defines the [`Simulator`] type, which orchestrates the parameter search.
//! Its responsibilities include:
//!
//! - Mutating the parameters of every bot but the control one at the start of an epoch
//! - Dealing a new round, and playing several games on it with rotating seats
//! - Keeping the score of each bot over the epoch
//! - Folding the best bot's parameters into the shared baseline at the end of the epoch
//!
//! # Rounds and games
//!
//! A round is one deal, replayed `games_per_round` times. Between games the seating advances
//! to the next permutation, so the same hands are played by different bots. Seating is reset
//! to the identity at the start of every round.
//!
//! # Failures
//!
//! A game in which a bot times out, answers garbage or never finishes is voided: it is logged,
//! counted in the [`EpochReport`], and leaves scores untouched. A bot that cannot be launched
//! at all, or an unusable working directory, aborts the simulation.

use std::fmt::Display;

use anyhow::{bail, Context};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info, instrument, trace, warn};

use crate::agent::Agent;
use crate::configuration::Configuration;
use crate::dealer::{Deal, Dealer, NUM_SEATS};
use crate::evolution::Population;
use crate::game::{play_game, GameError, GameOutcome, Table};
use crate::gateway::Gateway;
use crate::logger::init_logger;
use crate::seating::{PlayerOrder, SeatRotation};
use crate::transcript::Transcript;

/// Name of the transcript inside the working directory.
pub const TRANSCRIPT_FILE: &str = "log.txt";

/// What happened during one epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct EpochReport {
    pub epoch: usize,
    /// Score of each bot over the whole epoch.
    pub scores: [i64; NUM_SEATS],
    /// Bot whose parameters were adopted.
    pub winner: usize,
    /// Baseline after the update.
    pub baseline: Vec<f64>,
    pub rounds_played: usize,
    pub games_played: usize,
    pub voided_games: usize,
}

impl Display for EpochReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "epoch {}: bot {} wins with score {} ({} rounds, {} games, {} voided)",
            self.epoch + 1,
            self.winner,
            self.scores[self.winner],
            self.rounds_played,
            self.games_played,
            self.voided_games
        )
    }
}

#[derive(Debug, Default)]
struct Tally {
    games_played: usize,
    voided_games: usize,
}

/// Runs epochs of self-play between three bots and evolves their shared parameters.
pub struct Simulator {
    config: Configuration,
    agents: Vec<Box<dyn Agent>>,
    dealer: Dealer,
    rng: StdRng,
    population: Population,
    rotation: SeatRotation,
    gateway: Gateway,
    scores: [i64; NUM_SEATS],
}

impl Simulator {
    /// Create a [`Simulator`] for exactly three agents, indexed by bot number.
    ///
    /// # Errors
    /// If there are not three agents, the control bot is not one of them, or the log file or
    /// transcript cannot be created.
    #[instrument(skip_all)]
    pub fn new(agents: Vec<Box<dyn Agent>>, config: Configuration) -> anyhow::Result<Simulator> {
        if agents.len() != NUM_SEATS {
            bail!("expected {NUM_SEATS} agents, got {}", agents.len());
        }
        if config.control_bot >= NUM_SEATS {
            bail!("control bot {} does not exist", config.control_bot);
        }
        if config.log {
            init_logger(&config.work_dir)?;
        }
        trace!(?config);

        let mut gateway = Gateway::new(config.protocol);
        if config.transcript {
            gateway = gateway.with_transcript(Transcript::create(
                config.work_dir.join(TRANSCRIPT_FILE),
            )?);
        }

        let (dealer, rng) = match config.seed {
            Some(seed) => (
                Dealer::seeded(seed),
                StdRng::seed_from_u64(seed.wrapping_add(1)),
            ),
            None => (Dealer::from_entropy(), StdRng::from_entropy()),
        };
        let population = Population::new(
            config.parameter_count,
            config.control_bot,
            config.mutation_step,
        );

        Ok(Simulator {
            config,
            agents,
            dealer,
            rng,
            population,
            rotation: SeatRotation::default(),
            gateway,
            scores: [0; NUM_SEATS],
        })
    }

    /// Replace the dealer, e.g. with a stacked deck.
    pub fn with_dealer(mut self, dealer: Dealer) -> Self {
        self.dealer = dealer;
        self
    }

    /// Replace the lexicographic seat rotation.
    pub fn with_rotation(mut self, rotation: SeatRotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Resume from a known population.
    pub fn with_population(mut self, population: Population) -> Self {
        self.population = population;
        self
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Scores of the epoch in progress, by bot.
    pub fn scores(&self) -> [i64; NUM_SEATS] {
        self.scores
    }

    /// Runs every configured epoch.
    ///
    /// # Errors
    /// On a fatal agent error (see module documentation).
    pub fn run(&mut self) -> anyhow::Result<Vec<EpochReport>> {
        let mut reports = Vec::with_capacity(self.config.epochs);
        for epoch in 0..self.config.epochs {
            if self.config.verbose {
                println!("Starting epoch {}/{}", epoch + 1, self.config.epochs);
            }
            reports.push(self.run_epoch(epoch)?);
        }
        if self.config.verbose {
            println!("Simulation completed successfully!");
        }
        Ok(reports)
    }

    /// Mutates, plays every round of the epoch, then updates the baseline.
    #[instrument(skip(self))]
    pub fn run_epoch(&mut self, epoch: usize) -> anyhow::Result<EpochReport> {
        self.scores = [0; NUM_SEATS];
        self.population.mutate(&mut self.rng);
        let parameters: Vec<Vec<f64>> = (0..NUM_SEATS)
            .map(|bot| self.population.parameters_for(bot))
            .collect();

        let mut tally = Tally::default();
        let mut rounds_played = 0;
        for round in 0..self.config.rounds_per_epoch {
            self.run_round(&parameters, &mut tally)
                .with_context(|| format!("epoch {epoch}, round {round}"))?;
            rounds_played += 1;

            if round == self.config.rounds_per_epoch / 2 && self.is_stagnant() {
                info!(round, scores = ?self.scores, "stagnant epoch, skipping remaining rounds");
                break;
            }
        }

        let scores = self.scores;
        let winner = self.population.commit(&scores);
        let report = EpochReport {
            epoch,
            scores,
            winner,
            baseline: self.population.baseline().to_vec(),
            rounds_played,
            games_played: tally.games_played,
            voided_games: tally.voided_games,
        };
        info!(%report);
        if self.config.verbose {
            print_epoch_report(&report);
        }
        self.scores = [0; NUM_SEATS];
        Ok(report)
    }

    /// Two bots still scoreless means the games are not telling the bots apart.
    fn is_stagnant(&self) -> bool {
        self.scores.iter().filter(|s| **s == 0).count() >= 2
    }

    fn run_round(&mut self, parameters: &[Vec<f64>], tally: &mut Tally) -> anyhow::Result<()> {
        self.dealer.shuffle();
        let deal = self.dealer.deal();
        self.gateway.begin_round();
        self.rotation.reset();

        for game in 0..self.config.games_per_round {
            let order = self.rotation.current();
            match self.play_one(&deal, parameters, order) {
                Ok(outcome) => {
                    for (score, delta) in self.scores.iter_mut().zip(outcome.bot_deltas) {
                        *score += delta;
                    }
                    tally.games_played += 1;
                    if self.config.verbose {
                        print_scores(order, &self.scores);
                    }
                }
                Err(e) if e.is_fatal() => {
                    return Err(e).with_context(|| format!("game {game} with seating {order}"));
                }
                Err(e) => {
                    error!(game, %order, "game voided: {e}");
                    tally.voided_games += 1;
                }
            }
            self.rotation.advance();
        }
        Ok(())
    }

    fn play_one(
        &mut self,
        deal: &Deal,
        parameters: &[Vec<f64>],
        order: PlayerOrder,
    ) -> Result<GameOutcome, GameError> {
        let mut agents: Vec<&mut dyn Agent> = self
            .agents
            .iter_mut()
            .map(|agent| agent.as_mut() as &mut dyn Agent)
            .collect();
        let mut table = Table::new(&mut agents, parameters, order);
        let outcome = play_game(deal, &mut table, &mut self.gateway, self.config.turn_limit);
        if let Err(GameError::TurnLimit { limit }) = &outcome {
            warn!(%order, limit, "game abandoned");
        }
        outcome
    }
}

fn print_scores(order: PlayerOrder, scores: &[i64; NUM_SEATS]) {
    for bot in order.bots() {
        println!("Bot {bot}: {}", scores[bot]);
    }
}

fn print_epoch_report(report: &EpochReport) {
    for (bot, score) in report.scores.iter().enumerate() {
        println!("Bot {bot}: {score}");
    }
    println!(
        "\x1b[32mBot {} wins with score {}\x1b[39m",
        report.winner, report.scores[report.winner]
    );
    println!(
        "Updated parameters: {}",
        report
            .baseline
            .iter()
            .map(f64::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    );
}
