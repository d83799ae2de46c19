//! Chat transcript for the HR bot
//!
//! Bot replies and user prompts are kept in two lists and shown interleaved,
//! reply first, by position.

use serde::{Deserialize, Serialize};

pub const GREETING: &str = "Greetings, I’m the HR Bot here to assist you.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    Bot,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub message: String,
    pub sender: Sender,
}

impl ChatMessage {
    pub fn bot(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            sender: Sender::Bot,
        }
    }

    pub fn user(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            sender: Sender::User,
        }
    }
}

/// Interleave by index, `incoming[i]` before `outgoing[i]`; the tail of the
/// longer list follows in order.
pub fn merge_messages(incoming: &[ChatMessage], outgoing: &[ChatMessage]) -> Vec<ChatMessage> {
    let len = incoming.len().max(outgoing.len());
    let mut merged = Vec::with_capacity(incoming.len() + outgoing.len());
    for i in 0..len {
        if let Some(msg) = incoming.get(i) {
            merged.push(msg.clone());
        }
        if let Some(msg) = outgoing.get(i) {
            merged.push(msg.clone());
        }
    }
    merged
}

#[derive(Debug, Clone)]
pub struct ChatTranscript {
    incoming: Vec<ChatMessage>,
    outgoing: Vec<ChatMessage>,
}

impl Default for ChatTranscript {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatTranscript {
    /// Transcript opened by the bot greeting.
    pub fn new() -> Self {
        Self {
            incoming: vec![ChatMessage::bot(GREETING)],
            outgoing: Vec::new(),
        }
    }

    /// Record a user prompt. Blank input is ignored and yields `None`.
    pub fn push_outgoing(&mut self, text: &str) -> Option<&ChatMessage> {
        if text.trim().is_empty() {
            return None;
        }
        self.outgoing.push(ChatMessage::user(text));
        self.outgoing.last()
    }

    pub fn push_incoming(&mut self, text: impl Into<String>) {
        self.incoming.push(ChatMessage::bot(text));
    }

    /// Record a prompt and the reply it got. Blank prompts are ignored.
    pub fn push_exchange(&mut self, prompt: &str, reply: impl Into<String>) -> bool {
        if self.push_outgoing(prompt).is_none() {
            return false;
        }
        self.push_incoming(reply);
        true
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        merge_messages(&self.incoming, &self.outgoing)
    }

    /// Merged messages after the first `seen`.
    pub fn messages_since(&self, seen: usize) -> Vec<ChatMessage> {
        self.messages().into_iter().skip(seen).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_interleaves_incoming_first() {
        let incoming = vec![ChatMessage::bot("b1"), ChatMessage::bot("b2")];
        let outgoing = vec![
            ChatMessage::user("u1"),
            ChatMessage::user("u2"),
            ChatMessage::user("u3"),
        ];

        let merged: Vec<_> = merge_messages(&incoming, &outgoing)
            .into_iter()
            .map(|m| m.message)
            .collect();
        assert_eq!(merged, vec!["b1", "u1", "b2", "u2", "u3"]);
    }

    #[test]
    fn test_merge_empty_lists() {
        assert!(merge_messages(&[], &[]).is_empty());
    }

    #[test]
    fn test_transcript_starts_with_greeting() {
        let transcript = ChatTranscript::new();
        assert_eq!(transcript.messages(), vec![ChatMessage::bot(GREETING)]);
    }

    #[test]
    fn test_transcript_ignores_blank_prompts() {
        let mut transcript = ChatTranscript::new();
        assert!(transcript.push_outgoing("   ").is_none());
        assert!(transcript.push_outgoing("How many leave days do I have?").is_some());
        transcript.push_incoming("You have 12.");

        let senders: Vec<_> = transcript.messages().iter().map(|m| m.sender).collect();
        assert_eq!(senders, vec![Sender::Bot, Sender::User, Sender::Bot]);
    }

    #[test]
    fn test_exchanges_extend_transcript_in_order() {
        let mut transcript = ChatTranscript::new();
        assert!(transcript.push_exchange("q1", "a1"));
        assert!(!transcript.push_exchange("  ", "dropped"));
        let seen = transcript.messages().len();
        assert!(transcript.push_exchange("q2", "a2"));

        let all: Vec<_> = transcript.messages().into_iter().map(|m| m.message).collect();
        assert_eq!(all, vec![GREETING, "q1", "a1", "q2", "a2"]);
        assert_eq!(
            transcript.messages_since(seen),
            vec![ChatMessage::user("q2"), ChatMessage::bot("a2")]
        );
        assert!(transcript.messages_since(99).is_empty());
    }
}
