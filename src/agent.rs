//! Decision makers for the seats at the table.
//!
//! An [`Agent`] receives the full request envelope as text plus the parameter vector it
//! should play with, and answers with raw response text. Parsing that text is the job of the
//! [`Gateway`](crate::gateway::Gateway).
//!
//! Two implementations are provided:
//! - [`ExternalAgent`]: runs a bot executable once per decision, exchanging files.
//! - [`ScriptedAgent`]: replays canned responses, for tests and dry runs.

use std::{
    collections::VecDeque,
    fs::File,
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

use thiserror::Error;
use tracing::{instrument, trace, warn};

use crate::process::AgentProcess;
use crate::protocol::ParseError;

/// Why an agent could not produce a usable decision.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("could not launch agent '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("agent '{agent}' did not answer within {after:?}")]
    Timeout { agent: String, after: Duration },
    #[error("agent '{agent}' sent a malformed response: {source}")]
    MalformedResponse {
        agent: String,
        #[source]
        source: ParseError,
    },
    #[error("agent '{agent}' has no scripted response left")]
    ScriptExhausted { agent: String },
    #[error("agent I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AgentError {
    /// Fatal errors will repeat on every call (missing binary, unusable working directory),
    /// so the whole simulation stops. The others only spoil the current game.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AgentError::Launch { .. } | AgentError::Io(_))
    }
}

/// A seat's decision maker.
pub trait Agent {
    fn name(&self) -> &str;

    /// Answers one request.
    ///
    /// `envelope` is the complete request text and `parameters` the vector this agent plays
    /// with for the current epoch.
    fn respond(&mut self, envelope: &str, parameters: &[f64]) -> Result<String, AgentError>;
}

/// Location of the files exchanged with external bots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeFiles {
    pub request: PathBuf,
    pub response: PathBuf,
    pub parameters: PathBuf,
}

impl ExchangeFiles {
    /// `in.txt`, `out.txt` and `score.txt` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> ExchangeFiles {
        let dir = dir.as_ref();
        ExchangeFiles {
            request: dir.join("in.txt"),
            response: dir.join("out.txt"),
            parameters: dir.join("score.txt"),
        }
    }
}

/// A bot executable, launched once per decision as `program args < request > response`.
#[derive(Debug, Clone)]
pub struct ExternalAgent {
    name: String,
    program: PathBuf,
    args: Vec<String>,
    files: ExchangeFiles,
    timeout: Option<Duration>,
    allow_stderr: bool,
}

impl ExternalAgent {
    pub fn new(
        name: impl Into<String>,
        program: impl Into<PathBuf>,
        files: ExchangeFiles,
    ) -> Self {
        ExternalAgent {
            name: name.into(),
            program: program.into(),
            args: vec![],
            files,
            timeout: None,
            allow_stderr: false,
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// `None` waits for the bot indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Lets the bot's stderr through to the simulator's stderr (debug purposes only).
    pub fn with_stderr(mut self, value: bool) -> Self {
        self.allow_stderr = value;
        self
    }

    fn write_parameters(&self, parameters: &[f64]) -> std::io::Result<()> {
        let line = parameters
            .iter()
            .map(f64::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        std::fs::write(&self.files.parameters, line + "\n")
    }
}

impl Agent for ExternalAgent {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip_all, fields(agent = %self.name))]
    fn respond(&mut self, envelope: &str, parameters: &[f64]) -> Result<String, AgentError> {
        self.write_parameters(parameters)?;
        {
            let mut request = File::create(&self.files.request)?;
            request.write_all(envelope.as_bytes())?;
            request.flush()?;
        }

        let stdin = File::open(&self.files.request)?;
        let stdout = File::create(&self.files.response)?;
        let mut process =
            AgentProcess::launch(&self.program, &self.args, stdin, stdout, self.allow_stderr)
                .map_err(|source| AgentError::Launch {
                    program: self.program.display().to_string(),
                    source,
                })?;
        trace!(pid = process.id(), "agent launched");

        let status = process
            .wait_timeout(self.timeout)
            .map_err(|e| std::io::Error::other(format!("{e:#}")))?;
        let Some(status) = status else {
            if let Err(e) = process.try_kill() {
                warn!("could not kill timed out agent: {e:#}");
            }
            return Err(AgentError::Timeout {
                agent: self.name.clone(),
                after: self.timeout.unwrap_or_default(),
            });
        };
        if !status.success() {
            // Exit codes were never part of the contract; the response still counts.
            warn!(%status, "agent exited unsuccessfully");
        }

        let response = std::fs::read_to_string(&self.files.response)?;
        trace!(response = %response, "agent answered");
        Ok(response)
    }
}

/// Replays a fixed list of responses, one per request, and keeps every envelope it was sent.
#[derive(Debug, Clone, Default)]
pub struct ScriptedAgent {
    name: String,
    responses: VecDeque<String>,
    received: Vec<String>,
    last_parameters: Vec<f64>,
}

impl ScriptedAgent {
    pub fn new<I, S>(name: impl Into<String>, responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedAgent {
            name: name.into(),
            responses: responses.into_iter().map(Into::into).collect(),
            received: vec![],
            last_parameters: vec![],
        }
    }

    /// Envelopes received so far, oldest first.
    pub fn received(&self) -> &[String] {
        &self.received
    }

    pub fn last_parameters(&self) -> &[f64] {
        &self.last_parameters
    }

    pub fn remaining(&self) -> usize {
        self.responses.len()
    }
}

impl Agent for ScriptedAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn respond(&mut self, envelope: &str, parameters: &[f64]) -> Result<String, AgentError> {
        self.received.push(envelope.to_owned());
        self.last_parameters = parameters.to_vec();
        self.responses
            .pop_front()
            .ok_or_else(|| AgentError::ScriptExhausted {
                agent: self.name.clone(),
            })
    }
}

/// Answers every request with the same text. Useful as a stand-in bot.
#[derive(Debug, Clone)]
pub struct ConstantAgent {
    name: String,
    response: String,
}

impl ConstantAgent {
    pub fn new(name: impl Into<String>, response: impl Into<String>) -> Self {
        ConstantAgent {
            name: name.into(),
            response: response.into(),
        }
    }
}

impl Agent for ConstantAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn respond(&mut self, _envelope: &str, _parameters: &[f64]) -> Result<String, AgentError> {
        Ok(self.response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_agent_replays_in_order() {
        let mut agent = ScriptedAgent::new("s", ["1", "[2]"]);
        assert_eq!(agent.respond("a", &[0.5]).unwrap(), "1");
        assert_eq!(agent.respond("b", &[]).unwrap(), "[2]");
        assert!(matches!(
            agent.respond("c", &[]),
            Err(AgentError::ScriptExhausted { .. })
        ));
        assert_eq!(agent.received(), ["a", "b", "c"]);
        assert_eq!(agent.remaining(), 0);
    }

    #[test]
    fn scripted_agent_keeps_parameters() {
        let mut agent = ScriptedAgent::new("s", ["0"]);
        agent.respond("x", &[1.0, -2.5]).unwrap();
        assert_eq!(agent.last_parameters(), [1.0, -2.5]);
    }

    #[test]
    fn fatal_errors() {
        let launch = AgentError::Launch {
            program: "bot".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(launch.is_fatal());
        assert!(!AgentError::ScriptExhausted { agent: "s".into() }.is_fatal());
        assert!(!AgentError::Timeout {
            agent: "s".into(),
            after: Duration::from_secs(1)
        }
        .is_fatal());
    }

    #[test]
    fn exchange_files_layout() {
        let files = ExchangeFiles::in_dir("/tmp/arena");
        assert_eq!(files.request, PathBuf::from("/tmp/arena/in.txt"));
        assert_eq!(files.response, PathBuf::from("/tmp/arena/out.txt"));
        assert_eq!(files.parameters, PathBuf::from("/tmp/arena/score.txt"));
    }
}
