//! Prompt-building wrappers around the hosted chat-completion service.
//!
//! Four operations live here: quiz generation, tutoring, practice-question
//! generation and grading. Each assembles a system/user prompt pair, makes
//! exactly one call (no retries), and either parses the reply into a typed
//! result or fails with an [`AgentError`] the caller must handle.

pub mod generator;
pub mod reviewer;
pub mod tester;
pub mod tutor;

use std::time::Duration;

use chatgpt::client::ChatGPT;
use chatgpt::config::ChatGPTEngine;
use thiserror::Error;

pub use generator::QuizGenerator;
pub use reviewer::Reviewer;
pub use tester::PracticeGenerator;
pub use tutor::Tutor;

/// Model every agent talks to.
const AGENT_MODEL: ChatGPTEngine = ChatGPTEngine::Custom("gpt-4o");

const CALL_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum AgentError {
    /// The completion call itself failed: transport, auth, timeout.
    #[error("completion request failed: {0}")]
    Completion(#[from] chatgpt::err::Error),
    /// The reply did not match the shape the prompt demanded.
    #[error("malformed reply from model: {0}")]
    MalformedReply(String),
}

/// Client with the shared model and timeout plus a per-agent temperature.
fn build_client(api_key: &str, temperature: f32) -> Result<ChatGPT, AgentError> {
    let mut client = ChatGPT::new(api_key)?;
    client.config.engine = AGENT_MODEL;
    client.config.temperature = temperature;
    client.config.timeout = CALL_TIMEOUT;
    Ok(client)
}

/// Parse the single JSON object a data-producing prompt demands. Models wrap
/// replies in a Markdown fence often enough that the fence is stripped first.
fn parse_reply<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T, AgentError> {
    let body = strip_code_fence(raw);
    serde_json::from_str(body).map_err(|err| AgentError::MalformedReply(err.to_string()))
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Probe {
        value: u32,
    }

    #[test]
    fn bare_json_parses() {
        let probe: Probe = parse_reply("{\"value\": 7}").unwrap();
        assert_eq!(probe, Probe { value: 7 });
    }

    #[test]
    fn fenced_json_parses() {
        let raw = "```json\n{\"value\": 7}\n```";
        let probe: Probe = parse_reply(raw).unwrap();
        assert_eq!(probe.value, 7);

        let raw = "```\n{\"value\": 3}\n```";
        let probe: Probe = parse_reply(raw).unwrap();
        assert_eq!(probe.value, 3);
    }

    #[test]
    fn prose_reply_is_a_malformed_reply_error() {
        let result: Result<Probe, AgentError> = parse_reply("Sure! Here are your questions.");
        assert!(matches!(result, Err(AgentError::MalformedReply(_))));
    }
}
