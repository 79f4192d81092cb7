//! The visible conversation: an append-only list of messages plus the
//! "awaiting reply" flag that drives the loading indicator.

use crate::api::FALLBACK_MESSAGE;
use crate::error::ChatError;
use crate::models::Message;
use serde::Serialize;

/// Canned prompts offered on an empty conversation.
pub const SUGGESTIONS: [&str; 3] = ["Check Credit Limit", "Analyze Expenses", "Report an Issue"];

/// Handed out by [`Conversation::submit`] and presented back on completion.
/// Only the most recently issued ticket may append a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// A query that was accepted and must be sent to the chat endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingQuery {
    pub ticket: Ticket,
    pub query: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Conversation {
    messages: Vec<Message>,
    awaiting: bool,
    #[serde(skip)]
    latest: u64,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept user input. Blank input is ignored and returns `None`;
    /// otherwise the trimmed text is appended as a user message.
    pub fn submit(&mut self, input: &str) -> Option<PendingQuery> {
        let query = input.trim();
        if query.is_empty() {
            return None;
        }

        self.messages.push(Message::user(query));
        self.latest += 1;
        self.awaiting = true;

        Some(PendingQuery {
            ticket: Ticket(self.latest),
            query: query.to_string(),
        })
    }

    /// Record the outcome of a chat request. Failures become the fallback
    /// message. Returns the appended bot message, or `None` when the ticket
    /// has been superseded and the reply was dropped.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        result: Result<String, ChatError>,
    ) -> Option<&Message> {
        if ticket.0 != self.latest {
            tracing::debug!(
                seq = ticket.0,
                latest = self.latest,
                "dropping reply for superseded request"
            );
            return None;
        }

        let content = match result {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, "chat request failed");
                FALLBACK_MESSAGE.to_string()
            }
        };

        self.awaiting = false;
        self.messages.push(Message::bot(content));
        self.messages.last()
    }

    /// Give up on a request without a reply. The user message stays, the
    /// loading state ends and a late reply for `ticket` is dropped.
    pub fn abandon(&mut self, ticket: Ticket) {
        if ticket.0 != self.latest {
            return;
        }
        tracing::debug!(seq = ticket.0, "request abandoned");
        self.awaiting = false;
        self.latest += 1;
    }

    /// Drop every message. Requests still in flight become stale.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.awaiting = false;
        self.latest += 1;
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn is_awaiting(&self) -> bool {
        self.awaiting
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn test_blank_input_ignored() {
        let mut convo = Conversation::new();
        assert!(convo.submit("").is_none());
        assert!(convo.submit("   \t\n").is_none());
        assert!(convo.is_empty());
        assert!(!convo.is_awaiting());
    }

    #[test]
    fn test_submit_then_complete() {
        let mut convo = Conversation::new();
        let pending = convo.submit("  Check Credit Limit ").unwrap();
        assert_eq!(pending.query, "Check Credit Limit");
        assert_eq!(convo.len(), 1);
        assert!(convo.is_awaiting());
        assert_eq!(convo.messages()[0].role(), Role::User);
        assert_eq!(convo.messages()[0].content(), "Check Credit Limit");

        let reply = convo
            .complete(pending.ticket, Ok("Your limit is 50,000".to_string()))
            .unwrap();
        assert_eq!(reply.role(), Role::Bot);
        assert_eq!(convo.len(), 2);
        assert!(!convo.is_awaiting());
    }

    #[test]
    fn test_failure_appends_fallback_verbatim() {
        let mut convo = Conversation::new();
        let pending = convo.submit("hello").unwrap();
        convo.complete(pending.ticket, Err(ChatError::Timeout));
        assert_eq!(convo.messages()[1].content(), FALLBACK_MESSAGE);
        assert_eq!(convo.messages()[1].role(), Role::Bot);
    }

    #[test]
    fn test_superseded_reply_dropped() {
        let mut convo = Conversation::new();
        let first = convo.submit("first").unwrap();
        let second = convo.submit("second").unwrap();
        assert!(second.ticket > first.ticket);

        assert!(convo.complete(second.ticket, Ok("reply two".into())).is_some());
        assert!(convo.complete(first.ticket, Ok("reply one".into())).is_none());

        let contents: Vec<&str> = convo.messages().iter().map(|m| m.content()).collect();
        assert_eq!(contents, vec!["first", "second", "reply two"]);
    }

    #[test]
    fn test_clear_makes_in_flight_stale() {
        let mut convo = Conversation::new();
        let pending = convo.submit("hello").unwrap();
        convo.clear();
        assert!(convo.is_empty());
        assert!(!convo.is_awaiting());
        assert!(convo.complete(pending.ticket, Ok("late".into())).is_none());
        assert!(convo.is_empty());
    }

    #[test]
    fn test_abandoned_request_drops_late_reply() {
        let mut convo = Conversation::new();
        let pending = convo.submit("hello").unwrap();
        convo.abandon(pending.ticket);
        assert!(!convo.is_awaiting());
        assert!(convo.complete(pending.ticket, Ok("late".into())).is_none());
        assert_eq!(convo.len(), 1);

        let next = convo.submit("again").unwrap();
        assert!(convo.complete(next.ticket, Ok("reply".into())).is_some());
        assert_eq!(convo.len(), 3);
    }

    #[test]
    fn test_abandoning_superseded_ticket_keeps_latest() {
        let mut convo = Conversation::new();
        let first = convo.submit("first").unwrap();
        let second = convo.submit("second").unwrap();
        convo.abandon(first.ticket);
        assert!(convo.is_awaiting());
        assert!(convo.complete(second.ticket, Ok("reply two".into())).is_some());
    }

    #[test]
    fn test_length_never_decreases_without_clear() {
        let mut convo = Conversation::new();
        let mut last_len = 0;
        for input in ["a", "", "b", "  ", "c"] {
            if let Some(p) = convo.submit(input) {
                assert!(convo.len() > last_len);
                last_len = convo.len();
                convo.complete(p.ticket, Ok(format!("re: {}", input)));
            }
            assert!(convo.len() >= last_len);
            last_len = convo.len();
        }
        assert_eq!(convo.len(), 6);
    }
}
