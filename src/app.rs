//! Top-level application state. [`App`] is the only place that mutates the
//! session, theme or conversation; the terminal layer reads snapshots and
//! calls the operations below.

use crate::api::ChatService;
use crate::auth::Authenticator;
use crate::conversation::{Conversation, PendingQuery, Ticket};
use crate::error::{AuthError, ChatError};
use crate::models::{Message, Session, ThemeMode};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    Login,
    Main,
}

#[derive(Debug, Clone, Serialize)]
pub struct AppState {
    pub screen: Screen,
    pub session: Option<Session>,
    pub theme: ThemeMode,
    pub conversation: Conversation,
}

pub struct App {
    state: AppState,
    authenticator: Box<dyn Authenticator>,
    chat: Arc<dyn ChatService>,
}

impl App {
    pub fn new(
        authenticator: Box<dyn Authenticator>,
        chat: Arc<dyn ChatService>,
        theme: ThemeMode,
    ) -> Self {
        Self {
            state: AppState {
                screen: Screen::Login,
                session: None,
                theme,
                conversation: Conversation::new(),
            },
            authenticator,
            chat,
        }
    }

    pub fn login(&mut self, user_id: &str, secret: &str) -> Result<&Session, AuthError> {
        let session = self.authenticator.authenticate(user_id, secret)?;
        tracing::info!(user_id = %session.user_id, "logged in");
        self.state.screen = Screen::Main;
        let session = self.state.session.insert(session);
        Ok(&*session)
    }

    /// Drop the session and the conversation and return to the login screen.
    pub fn logout(&mut self) {
        if let Some(session) = self.state.session.take() {
            tracing::info!(user_id = %session.user_id, "logged out");
        }
        self.state.conversation.clear();
        self.state.screen = Screen::Login;
    }

    pub fn toggle_theme(&mut self) -> ThemeMode {
        self.state.theme = self.state.theme.toggle();
        self.state.theme
    }

    pub fn new_chat(&mut self) {
        self.state.conversation.clear();
    }

    /// Accept input from the text box, a suggestion or a transcript.
    /// Ignored while logged out or when the input is blank.
    pub fn submit(&mut self, input: &str) -> Option<PendingQuery> {
        if self.state.screen != Screen::Main {
            return None;
        }
        self.state.conversation.submit(input)
    }

    pub fn complete(
        &mut self,
        ticket: Ticket,
        result: Result<String, ChatError>,
    ) -> Option<Message> {
        self.state.conversation.complete(ticket, result).cloned()
    }

    /// Stop waiting for `ticket`; its reply is dropped if it still arrives.
    pub fn abandon(&mut self, ticket: Ticket) {
        self.state.conversation.abandon(ticket);
    }

    /// Submit `input` and return the query together with the user it is sent
    /// for. `None` while logged out or when the input is blank.
    pub fn begin(&mut self, input: &str) -> Option<(String, PendingQuery)> {
        let user_id = self.user_id()?.to_string();
        let pending = self.submit(input)?;
        Some((user_id, pending))
    }

    /// Submit `input`, wait for the chat endpoint and append its reply (or
    /// the fallback). Returns the appended bot message.
    pub async fn send(&mut self, input: &str) -> Option<Message> {
        let (user_id, pending) = self.begin(input)?;

        let result = self.chat.send_query(&user_id, &pending.query).await;
        self.complete(pending.ticket, result)
    }

    pub fn chat_service(&self) -> Arc<dyn ChatService> {
        Arc::clone(&self.chat)
    }

    pub fn user_id(&self) -> Option<&str> {
        self.state.session.as_ref().map(|s| s.user_id.as_str())
    }

    pub fn screen(&self) -> Screen {
        self.state.screen
    }

    pub fn theme(&self) -> ThemeMode {
        self.state.theme
    }

    pub fn conversation(&self) -> &Conversation {
        &self.state.conversation
    }

    pub fn snapshot(&self) -> AppState {
        self.state.clone()
    }
}
