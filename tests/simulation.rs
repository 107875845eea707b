use std::{cell::RefCell, rc::Rc};

use landlord_arena::prelude::*;

/// Bids 1 and then plays its whole hand, so whoever sits in seat 0 wins every game.
struct Sweeper {
    name: String,
    parameters_seen: Rc<RefCell<Vec<Vec<f64>>>>,
}

impl Sweeper {
    fn new(bot: usize) -> (Self, Rc<RefCell<Vec<Vec<f64>>>>) {
        let seen = Rc::new(RefCell::new(vec![]));
        let sweeper = Sweeper {
            name: format!("sweeper{bot}"),
            parameters_seen: seen.clone(),
        };
        (sweeper, seen)
    }
}

impl Agent for Sweeper {
    fn name(&self) -> &str {
        &self.name
    }

    fn respond(&mut self, envelope: &str, parameters: &[f64]) -> Result<String, AgentError> {
        self.parameters_seen.borrow_mut().push(parameters.to_vec());
        if envelope.contains("\"bid\":") {
            return Ok("1".into());
        }
        let start = envelope.find("\"own\":").expect("play request has a hand") + "\"own\":".len();
        let end = start + envelope[start..].find(']').expect("hand is closed") + 1;
        Ok(envelope[start..end].to_owned())
    }
}

fn quiet_config(dir: &std::path::Path) -> Configuration {
    Configuration::new()
        .with_verbose(false)
        .with_seed(7)
        .with_work_dir(dir)
}

#[test]
fn seat_zero_bot_wins_the_epoch() {
    let dir = tempfile::tempdir().unwrap();
    let mut seen = vec![];
    let agents: Vec<Box<dyn Agent>> = (0..3)
        .map(|bot| {
            let (agent, parameters) = Sweeper::new(bot);
            seen.push(parameters);
            Box::new(agent) as Box<dyn Agent>
        })
        .collect();

    let config = quiet_config(dir.path())
        .with_epochs(1)
        .with_rounds_per_epoch(4)
        .with_games_per_round(1);
    let mut simulator = Simulator::new(agents, config)
        .unwrap()
        .with_rotation(SeatRotation::Fixed(PlayerOrder::new([2, 0, 1]).unwrap()));
    let reports = simulator.run().unwrap();

    assert_eq!(reports.len(), 1);
    let report = &reports[0];
    // landlord in seat 0 with a bid of 1, four rounds
    assert_eq!(report.scores, [-4, -4, 8]);
    assert_eq!(report.winner, 2);
    assert_eq!(report.rounds_played, 4);
    assert_eq!(report.games_played, 4);
    assert_eq!(report.voided_games, 0);

    // the control bot plays the untouched baseline
    assert!(seen[1].borrow().iter().all(|p| p.iter().all(|v| *v == 0.0)));
    let bot_2_parameters = seen[2].borrow()[0].clone();
    assert_eq!(report.baseline, bot_2_parameters);
    let changed = bot_2_parameters.iter().filter(|v| **v != 0.0).count();
    assert!((3..23).contains(&changed), "{changed}");
    assert_eq!(simulator.population().baseline(), report.baseline.as_slice());
    assert_eq!(simulator.scores(), [0, 0, 0]);
}

#[test]
fn transcript_only_holds_the_last_round() {
    let dir = tempfile::tempdir().unwrap();
    let agents: Vec<Box<dyn Agent>> = (0..3)
        .map(|bot| Box::new(Sweeper::new(bot).0) as Box<dyn Agent>)
        .collect();
    let config = quiet_config(dir.path())
        .with_epochs(1)
        .with_rounds_per_epoch(3)
        .with_games_per_round(2);
    let mut simulator = Simulator::new(agents, config).unwrap();
    simulator.run().unwrap();

    let transcript = std::fs::read_to_string(dir.path().join("log.txt")).unwrap();
    // two games of three bids and one winning play
    assert_eq!(transcript.lines().count(), 8);
    assert!(transcript.lines().all(|l| l.ends_with(r#"],"responses":[]}"#)));
}

#[test]
fn unfinished_games_are_voided_and_stop_the_epoch_early() {
    let dir = tempfile::tempdir().unwrap();
    let agents: Vec<Box<dyn Agent>> = (0..3)
        .map(|bot| Box::new(ConstantAgent::new(format!("bot{bot}"), "0")) as Box<dyn Agent>)
        .collect();
    let config = quiet_config(dir.path())
        .with_epochs(2)
        .with_rounds_per_epoch(6)
        .with_games_per_round(6)
        .with_turn_limit(3)
        .with_transcript(false);
    let mut simulator = Simulator::new(agents, config).unwrap();
    let reports = simulator.run().unwrap();

    assert_eq!(reports.len(), 2);
    for report in &reports {
        assert_eq!(report.scores, [0, 0, 0]);
        assert_eq!(report.winner, 0);
        // rounds 0..=3, then the epoch is cut short
        assert_eq!(report.rounds_played, 4);
        assert_eq!(report.games_played, 0);
        assert_eq!(report.voided_games, 24);
    }
    assert!(!dir.path().join("log.txt").exists());
}

#[test]
fn seeded_runs_are_reproducible() {
    let run = || {
        let dir = tempfile::tempdir().unwrap();
        let agents: Vec<Box<dyn Agent>> = (0..3)
            .map(|bot| Box::new(Sweeper::new(bot).0) as Box<dyn Agent>)
            .collect();
        let config = quiet_config(dir.path())
            .with_epochs(3)
            .with_rounds_per_epoch(2)
            .with_games_per_round(1);
        Simulator::new(agents, config).unwrap().run().unwrap()
    };
    assert_eq!(run(), run());
}

#[test]
fn three_agents_are_required() {
    let dir = tempfile::tempdir().unwrap();
    let agents: Vec<Box<dyn Agent>> = vec![Box::new(ConstantAgent::new("lonely", "0"))];
    assert!(Simulator::new(agents, quiet_config(dir.path())).is_err());
}

#[test]
fn control_bot_must_be_seated() {
    let dir = tempfile::tempdir().unwrap();
    let agents: Vec<Box<dyn Agent>> = (0..3)
        .map(|bot| Box::new(ConstantAgent::new(format!("bot{bot}"), "0")) as Box<dyn Agent>)
        .collect();
    let config = quiet_config(dir.path()).with_control_bot(3);
    let error = Simulator::new(agents, config).err().expect("control bot 3 is rejected");
    assert!(error.to_string().contains("control bot 3"));
}
