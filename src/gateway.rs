//! The only path from the game to an agent.
//!
//! The gateway wraps request fragments into the envelope, records them in the transcript,
//! asks the agent and decodes its answer according to the [`ProtocolMode`].

use tracing::{debug, warn};

use crate::agent::{Agent, AgentError};
use crate::card::Card;
use crate::protocol::{envelope, parse_bid, parse_cards, BidRequest, PlayRequest, ProtocolMode};
use crate::transcript::Transcript;

#[derive(Debug, Default)]
pub struct Gateway {
    mode: ProtocolMode,
    transcript: Option<Transcript>,
}

impl Gateway {
    pub fn new(mode: ProtocolMode) -> Gateway {
        Gateway {
            mode,
            transcript: None,
        }
    }

    pub fn with_transcript(mut self, transcript: Transcript) -> Gateway {
        self.transcript = Some(transcript);
        self
    }

    /// Starts a new round: the transcript only keeps the current round.
    pub fn begin_round(&mut self) {
        if let Some(transcript) = &mut self.transcript {
            if let Err(e) = transcript.truncate() {
                warn!("{e:#}");
            }
        }
    }

    pub fn request_bid(
        &mut self,
        agent: &mut dyn Agent,
        parameters: &[f64],
        request: &BidRequest<'_>,
    ) -> Result<u8, AgentError> {
        let response = self.exchange(agent, parameters, &request.fragment())?;
        parse_bid(&response, self.mode).map_err(|source| AgentError::MalformedResponse {
            agent: agent.name().to_owned(),
            source,
        })
    }

    pub fn request_play(
        &mut self,
        agent: &mut dyn Agent,
        parameters: &[f64],
        request: &PlayRequest<'_>,
    ) -> Result<Vec<Card>, AgentError> {
        let response = self.exchange(agent, parameters, &request.fragment(self.mode))?;
        parse_cards(&response, self.mode).map_err(|source| AgentError::MalformedResponse {
            agent: agent.name().to_owned(),
            source,
        })
    }

    fn exchange(
        &mut self,
        agent: &mut dyn Agent,
        parameters: &[f64],
        fragment: &str,
    ) -> Result<String, AgentError> {
        let envelope = envelope(fragment);
        if let Some(transcript) = &mut self.transcript {
            if let Err(e) = transcript.append(&envelope) {
                warn!("{e:#}");
            }
        }
        let response = agent.respond(&envelope, parameters)?;
        debug!(agent = agent.name(), response = response.trim(), "exchange");
        Ok(response)
    }
}
