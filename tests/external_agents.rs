#![cfg(unix)]

use std::time::Duration;

use landlord_arena::game::GameError;
use landlord_arena::prelude::*;

fn shell_bot(name: &str, files: &ExchangeFiles, script: &str) -> ExternalAgent {
    ExternalAgent::new(name, "sh", files.clone()).with_args(vec!["-c".into(), script.into()])
}

#[test]
fn files_are_exchanged_around_each_launch() {
    let dir = tempfile::tempdir().unwrap();
    let files = ExchangeFiles::in_dir(dir.path());
    let mut bot = shell_bot("echo", &files, "cat; printf ' 2'");

    let response = bot.respond("{request}", &[0.5, -1.0]).unwrap();
    assert_eq!(response, "{request} 2");
    assert_eq!(std::fs::read_to_string(&files.request).unwrap(), "{request}");
    assert_eq!(std::fs::read_to_string(&files.parameters).unwrap(), "0.5 -1\n");
    assert_eq!(std::fs::read_to_string(&files.response).unwrap(), "{request} 2");
}

#[test]
fn slow_bot_times_out() {
    let dir = tempfile::tempdir().unwrap();
    let files = ExchangeFiles::in_dir(dir.path());
    let mut bot = shell_bot("sleepy", &files, "sleep 5; echo 1")
        .with_timeout(Some(Duration::from_millis(100)));

    let error = bot.respond("{}", &[]).unwrap_err();
    assert!(matches!(error, AgentError::Timeout { .. }), "{error}");
    assert!(!error.is_fatal());
}

#[test]
fn failing_exit_status_still_counts() {
    let dir = tempfile::tempdir().unwrap();
    let files = ExchangeFiles::in_dir(dir.path());
    let mut bot = shell_bot("grumpy", &files, "echo 3; exit 1");
    assert_eq!(bot.respond("{}", &[]).unwrap(), "3\n");
}

#[test]
fn missing_bot_stops_the_simulation() {
    let dir = tempfile::tempdir().unwrap();
    let files = ExchangeFiles::in_dir(dir.path());
    let agents: Vec<Box<dyn Agent>> = (0..3)
        .map(|bot| {
            Box::new(ExternalAgent::new(
                format!("bot{bot}"),
                dir.path().join(format!("bot{bot}")),
                files.clone(),
            )) as Box<dyn Agent>
        })
        .collect();
    let config = Configuration::new()
        .with_verbose(false)
        .with_seed(1)
        .with_work_dir(dir.path());

    let error = Simulator::new(agents, config).unwrap().run().unwrap_err();
    let game_error = error
        .chain()
        .find_map(|e| e.downcast_ref::<GameError>())
        .expect("a game failed");
    assert!(game_error.is_fatal());
    assert!(matches!(
        game_error,
        GameError::Agent(AgentError::Launch { .. })
    ));
}

#[test]
fn shell_bots_play_a_full_epoch() {
    let dir = tempfile::tempdir().unwrap();
    let files = ExchangeFiles::in_dir(dir.path());
    // bid 3, then pass forever
    let script = r#"if grep -q '"bid":' ; then echo 3; else echo '[]'; fi"#;
    let agents: Vec<Box<dyn Agent>> = (0..3)
        .map(|bot| Box::new(shell_bot(&format!("bot{bot}"), &files, script)) as Box<dyn Agent>)
        .collect();
    let config = Configuration::new()
        .with_verbose(false)
        .with_seed(3)
        .with_epochs(1)
        .with_rounds_per_epoch(1)
        .with_games_per_round(1)
        .with_turn_limit(2)
        .with_work_dir(dir.path());

    let reports = Simulator::new(agents, config).unwrap().run().unwrap();
    assert_eq!(reports[0].voided_games, 1);
    let transcript = std::fs::read_to_string(dir.path().join("log.txt")).unwrap();
    // seat 0 bids 3 and wins the contract at once, then two turns of passes
    assert_eq!(transcript.lines().count(), 1 + 2 * 3);
}
