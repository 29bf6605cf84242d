//! In-process conversation transcript.
//!
//! One [`ConversationMemory`] holds the single implicit session for the
//! process lifetime. Turns are appended in strict call order and never
//! reordered; the only mutation besides `append` is the optional FIFO
//! eviction applied inside `append` when a `transcript_cap` is configured.

use chrono::{DateTime, Utc};

// ── Turn ──────────────────────────────────────────────────────────────────────

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Agent,
}

impl Speaker {
    /// Line prefix used when the transcript is rendered into a prompt.
    pub fn label(&self) -> &'static str {
        match self {
            Speaker::User => "Human",
            Speaker::Agent => "Agent",
        }
    }
}

/// One message exchange unit. Immutable once created.
#[derive(Debug, Clone)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
    /// Wall-clock stamp taken at append time; informational only,
    /// ordering is append order.
    pub at: DateTime<Utc>,
}

impl Turn {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self { speaker, text: text.into(), at: Utc::now() }
    }
}

// ── ConversationMemory ────────────────────────────────────────────────────────

/// Append-only ordered transcript of the current session.
///
/// Unbounded by default — sessions are expected to be short-lived processes.
/// With a cap, the oldest turns are dropped first.
#[derive(Debug, Default)]
pub struct ConversationMemory {
    turns: Vec<Turn>,
    cap: Option<usize>,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transcript bounded to `cap` turns (FIFO), or unbounded when `None`.
    pub fn with_cap(cap: Option<usize>) -> Self {
        Self { turns: Vec::new(), cap }
    }

    /// Add a turn at the end, evicting the oldest when over the cap.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
        if let Some(cap) = self.cap {
            while self.turns.len() > cap {
                self.turns.remove(0);
            }
        }
    }

    /// Owned copy of the transcript as of this call.
    pub fn snapshot(&self) -> Vec<Turn> {
        self.turns.clone()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_preserves_order() {
        let mut mem = ConversationMemory::new();
        mem.append(Turn::new(Speaker::User, "hello"));
        mem.append(Turn::new(Speaker::Agent, "hi there"));
        mem.append(Turn::new(Speaker::User, "how are you"));

        let turns = mem.snapshot();
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[0].speaker, Speaker::User);
        assert_eq!(turns[0].text, "hello");
        assert_eq!(turns[1].speaker, Speaker::Agent);
        assert_eq!(turns[1].text, "hi there");
        assert_eq!(turns[2].text, "how are you");
    }

    #[test]
    fn snapshot_is_a_copy() {
        let mut mem = ConversationMemory::new();
        mem.append(Turn::new(Speaker::User, "a"));
        let snap = mem.snapshot();
        mem.append(Turn::new(Speaker::Agent, "b"));

        assert_eq!(snap.len(), 1);
        assert_eq!(mem.len(), 2);
    }

    #[test]
    fn fifo_cap_drops_oldest() {
        let mut mem = ConversationMemory::with_cap(Some(4));
        for i in 0..6 {
            mem.append(Turn::new(Speaker::User, format!("msg{i}")));
        }

        let turns = mem.snapshot();
        assert_eq!(turns.len(), 4);
        assert_eq!(turns[0].text, "msg2");
        assert_eq!(turns[3].text, "msg5");
    }

    #[test]
    fn uncapped_grows_freely() {
        let mut mem = ConversationMemory::with_cap(None);
        for i in 0..100 {
            mem.append(Turn::new(Speaker::Agent, format!("{i}")));
        }
        assert_eq!(mem.len(), 100);
    }

    #[test]
    fn speaker_labels() {
        assert_eq!(Speaker::User.label(), "Human");
        assert_eq!(Speaker::Agent.label(), "Agent");
    }
}
