//! Conversational agent — persona + memory + provider composed into one
//! `respond` operation.
//!
//! The memory lock covers only the snapshot and the commit of the finished
//! turn pair; the provider round-trip happens with no lock held, so a slow
//! generation call never blocks other callers out of the transcript. A
//! failed generation commits nothing — a retried call sees the same history
//! it would have seen the first time.

use tokio::sync::Mutex;
use tracing::debug;

use crate::llm::{LlmProvider, ProviderError};
use crate::memory::{ConversationMemory, Speaker, Turn};
use crate::persona::PersonaTemplate;

pub struct ConversationalAgent {
    persona: PersonaTemplate,
    provider: LlmProvider,
    memory: Mutex<ConversationMemory>,
}

impl ConversationalAgent {
    pub fn new(persona: PersonaTemplate, provider: LlmProvider, memory: ConversationMemory) -> Self {
        Self { persona, provider, memory: Mutex::new(memory) }
    }

    /// Generate a reply to `input` and record the exchange.
    ///
    /// `input` is assumed non-empty — the relay boundary validates it.
    /// The User and Agent turns are appended together, only after the
    /// provider call succeeds.
    pub async fn respond(&self, input: &str) -> Result<String, ProviderError> {
        let history = self.memory.lock().await.snapshot();
        let prompt = self.persona.render(&history, input);

        debug!(history_turns = history.len(), prompt_len = prompt.len(), "dispatching to provider");

        let reply = self.provider.complete(&prompt).await?;

        {
            let mut memory = self.memory.lock().await;
            memory.append(Turn::new(Speaker::User, input));
            memory.append(Turn::new(Speaker::Agent, reply.clone()));
        }

        debug!(reply_len = reply.len(), "exchange recorded");
        Ok(reply)
    }

    /// Number of recorded turns. Read-only; used by inspection and tests.
    pub async fn turn_count(&self) -> usize {
        self.memory.lock().await.len()
    }

    /// Owned copy of the transcript as of this call.
    pub async fn transcript(&self) -> Vec<Turn> {
        self.memory.lock().await.snapshot()
    }
}
