//! Reasoning-service boundary.
//!
//! The pipeline talks to the language model exclusively through
//! [`ReasoningService`]; the production implementation lives in
//! [`ollama`], and [`ScriptedReasoner`] stands in for it in tests.

pub mod ollama;

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

use crate::pipeline::agents::AgentProfile;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("cannot reach reasoning service at {0}")]
    Connection(String),

    #[error("reasoning request timed out after {0}s")]
    Timeout(u64),

    #[error("reasoning service quota exhausted: {0}")]
    Quota(String),

    #[error("reasoning service returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("reasoning request failed: {0}")]
    Request(String),

    #[error("malformed reasoning service response: {0}")]
    ResponseParsing(String),

    #[error("no reasoning model available")]
    NoModel,
}

/// External reasoning collaborator. One call per pipeline step, no retries.
#[async_trait]
pub trait ReasoningService: Send + Sync {
    /// Run `prompt` under the agent's persona and return the raw model text.
    async fn invoke(&self, agent: &AgentProfile, prompt: &str) -> Result<String, LlmError>;
}

/// One recorded call against a [`ScriptedReasoner`].
#[derive(Debug, Clone)]
pub struct Invocation {
    pub agent: String,
    pub prompt: String,
}

/// Deterministic reasoner for tests.
///
/// Replays a scripted sequence of responses (falling back to a fixed
/// acknowledgement once the script is exhausted) and records every
/// invocation so tests can assert call counts and prompt contents.
pub struct ScriptedReasoner {
    script: Mutex<VecDeque<Result<String, LlmError>>>,
    invocations: Mutex<Vec<Invocation>>,
}

impl ScriptedReasoner {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            invocations: Mutex::new(Vec::new()),
        }
    }

    /// Build a reasoner that answers each call in order with the given texts.
    pub fn with_responses(responses: &[&str]) -> Self {
        let reasoner = Self::new();
        for response in responses {
            reasoner.push_response(response);
        }
        reasoner
    }

    pub fn push_response(&self, text: &str) {
        self.script
            .lock()
            .expect("script lock")
            .push_back(Ok(text.to_string()));
    }

    pub fn push_failure(&self, error: LlmError) {
        self.script.lock().expect("script lock").push_back(Err(error));
    }

    pub fn call_count(&self) -> usize {
        self.invocations.lock().expect("invocation lock").len()
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().expect("invocation lock").clone()
    }
}

impl Default for ScriptedReasoner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReasoningService for ScriptedReasoner {
    async fn invoke(&self, agent: &AgentProfile, prompt: &str) -> Result<String, LlmError> {
        self.invocations.lock().expect("invocation lock").push(Invocation {
            agent: agent.name.to_string(),
            prompt: prompt.to_string(),
        });

        match self.script.lock().expect("script lock").pop_front() {
            Some(entry) => entry,
            None => Ok(format!("[{}] acknowledged", agent.name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::agents::VERIFIER;

    #[tokio::test]
    async fn scripted_responses_replay_in_order() {
        let reasoner = ScriptedReasoner::with_responses(&["first", "second"]);
        assert_eq!(reasoner.invoke(&VERIFIER, "a").await.unwrap(), "first");
        assert_eq!(reasoner.invoke(&VERIFIER, "b").await.unwrap(), "second");
        assert_eq!(reasoner.call_count(), 2);
    }

    #[tokio::test]
    async fn scripted_failure_is_returned() {
        let reasoner = ScriptedReasoner::new();
        reasoner.push_failure(LlmError::Quota("monthly limit".into()));
        let err = reasoner.invoke(&VERIFIER, "x").await.unwrap_err();
        assert!(matches!(err, LlmError::Quota(_)));
    }

    #[tokio::test]
    async fn exhausted_script_falls_back_to_acknowledgement() {
        let reasoner = ScriptedReasoner::new();
        let text = reasoner.invoke(&VERIFIER, "x").await.unwrap();
        assert!(text.contains(VERIFIER.name));
    }

    #[tokio::test]
    async fn invocations_record_agent_and_prompt() {
        let reasoner = ScriptedReasoner::with_responses(&["ok"]);
        reasoner.invoke(&VERIFIER, "the prompt text").await.unwrap();
        let calls = reasoner.invocations();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].agent, "verifier");
        assert_eq!(calls[0].prompt, "the prompt text");
    }
}
