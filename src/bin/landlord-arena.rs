//! Command line entry point: `landlord-arena [bot0 bot1 bot2]`.
//!
//! Bots default to `./bot0`, `./bot1` and `./bot2`. Everything else is read from the
//! environment, see [`Configuration::from_env`].

use std::path::PathBuf;

use anyhow::bail;
use landlord_arena::prelude::*;

fn main() -> anyhow::Result<()> {
    let config = Configuration::from_env();

    let mut programs: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    if programs.is_empty() {
        programs = (0..3).map(|bot| PathBuf::from(format!("./bot{bot}"))).collect();
    }
    if programs.len() != 3 {
        bail!("usage: landlord-arena [bot0 bot1 bot2]");
    }

    let files = ExchangeFiles::in_dir(config.work_dir());
    let agents = programs
        .into_iter()
        .enumerate()
        .map(|(bot, program)| {
            Box::new(
                ExternalAgent::new(format!("bot{bot}"), program, files.clone())
                    .with_timeout(config.action_timeout())
                    .with_stderr(config.debug_agent_stderr()),
            ) as Box<dyn Agent>
        })
        .collect();

    let mut simulator = Simulator::new(agents, config)?;
    let reports = simulator.run()?;

    let voided: usize = reports.iter().map(|r| r.voided_games).sum();
    if voided > 0 {
        eprintln!("{voided} games were voided, see the log for details");
    }
    if let Some(last) = reports.last() {
        println!(
            "Final parameters: {}",
            last.baseline
                .iter()
                .map(f64::to_string)
                .collect::<Vec<_>>()
                .join(" ")
        );
    }
    Ok(())
}
