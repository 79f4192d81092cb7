use crate::app::{App, Screen};
use crate::conversation::SUGGESTIONS;
use crate::error::{RecognitionError, Result};
use crate::models::Message;
use crate::speech::{SpeechInput, SpeechSynthesizer};
use crate::ui::{self, MarkdownRenderer};
use colored::*;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use std::borrow::Cow::{self, Borrowed, Owned};
use std::sync::Arc;

const COMMANDS: &[&str] = &[
    "/help", "/history", "/logout", "/mute", "/new", "/quit", "/s", "/theme", "/voice",
];

/// What a line typed on the chat screen asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Empty,
    Send(String),
    Suggestion(usize),
    Voice,
    Mute,
    Theme,
    History,
    New,
    Logout,
    Help,
    Quit,
    Unknown(String),
}

/// Interpret one input line. Bare `1`..`3` pick a suggestion only while the
/// suggestions are on screen, i.e. the conversation is empty.
pub fn parse_command(line: &str, conversation_empty: bool) -> Command {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Empty;
    }

    if conversation_empty {
        if let Some(index) = suggestion_index(trimmed) {
            return Command::Suggestion(index);
        }
    }

    if !trimmed.starts_with('/') {
        return Command::Send(trimmed.to_string());
    }

    let mut parts = trimmed.split_whitespace();
    match parts.next().unwrap_or_default() {
        "/s" | "/suggest" => match parts.next().and_then(suggestion_index) {
            Some(index) => Command::Suggestion(index),
            None => Command::Unknown(trimmed.to_string()),
        },
        "/voice" | "/mic" => Command::Voice,
        "/mute" => Command::Mute,
        "/theme" => Command::Theme,
        "/history" => Command::History,
        "/new" => Command::New,
        "/logout" => Command::Logout,
        "/help" | "/?" => Command::Help,
        "/quit" | "/exit" => Command::Quit,
        _ => Command::Unknown(trimmed.to_string()),
    }
}

fn suggestion_index(token: &str) -> Option<usize> {
    let n = token.parse::<usize>().ok()?;
    (1..=SUGGESTIONS.len()).contains(&n).then(|| n - 1)
}

/// Completion for slash commands, plus masking for the password prompt.
#[derive(Default)]
pub struct ReplHelper {
    masking: bool,
}

impl Helper for ReplHelper {}

impl Completer for ReplHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if self.masking || !line.starts_with('/') {
            return Ok((0, vec![]));
        }

        let candidates = COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Hinter for ReplHelper {
    type Hint = String;
}

impl Validator for ReplHelper {}

impl Highlighter for ReplHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if self.masking {
            Owned("*".repeat(line.chars().count()))
        } else if line.starts_with('/') {
            Owned(line.cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

/// Terminal front end: login prompt, then the chat screen.
pub struct Repl {
    app: App,
    speech_input: Arc<SpeechInput>,
    speech_output: Option<Arc<SpeechSynthesizer>>,
    muted: bool,
    renderer: MarkdownRenderer,
    editor: Editor<ReplHelper, DefaultHistory>,
    preset_login: Option<(String, String)>,
    draft: Option<String>,
}

impl Repl {
    pub fn new(
        app: App,
        speech_input: Arc<SpeechInput>,
        speech_output: Option<Arc<SpeechSynthesizer>>,
    ) -> Result<Self> {
        let mut editor = Editor::<ReplHelper, DefaultHistory>::new()?;
        editor.set_helper(Some(ReplHelper::default()));

        Ok(Self {
            app,
            speech_input,
            speech_output,
            muted: false,
            renderer: MarkdownRenderer::new(),
            editor,
            preset_login: None,
            draft: None,
        })
    }

    /// Credentials tried once before the login prompt is shown.
    pub fn with_login(mut self, user_id: String, secret: String) -> Self {
        self.preset_login = Some((user_id, secret));
        self
    }

    pub async fn run(&mut self) -> Result<()> {
        loop {
            let keep_going = match self.app.screen() {
                Screen::Login => self.login_screen()?,
                Screen::Main => self.chat_screen().await?,
            };
            if !keep_going {
                break;
            }
        }
        println!("{}", "Goodbye!".bright_green());
        Ok(())
    }

    fn set_masking(&mut self, masking: bool) {
        if let Some(helper) = self.editor.helper_mut() {
            helper.masking = masking;
        }
    }

    fn read_secret(&mut self, prompt: &str) -> std::result::Result<String, ReadlineError> {
        self.set_masking(true);
        let line = self.editor.readline(prompt);
        self.set_masking(false);
        line
    }

    /// Returns `false` when the user leaves instead of logging in.
    fn login_screen(&mut self) -> Result<bool> {
        if let Some((user_id, secret)) = self.preset_login.take() {
            match self.app.login(&user_id, &secret) {
                Ok(_) => return Ok(true),
                Err(e) => println!("{}", ui::format_login_error(&e.to_string())),
            }
        }

        println!("{}", ui::format_login_banner());
        loop {
            let user_id = match self.editor.readline("User ID: ") {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(false),
                Err(e) => return Err(e.into()),
            };
            let secret = match self.read_secret("Password: ") {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(false),
                Err(e) => return Err(e.into()),
            };

            match self.app.login(&user_id, &secret) {
                Ok(_) => return Ok(true),
                Err(e) => println!("{}", ui::format_login_error(&e.to_string())),
            }
        }
    }

    fn print_screen(&self) {
        let theme = self.app.theme();
        println!(
            "{}",
            ui::format_header(self.app.user_id().unwrap_or_default(), theme)
        );
        let conversation = self.app.conversation();
        if conversation.is_empty() {
            println!("{}", ui::format_empty_state(theme));
        } else {
            for message in conversation.messages() {
                self.print_message(message);
            }
        }
    }

    fn print_message(&self, message: &Message) {
        println!(
            "{}",
            ui::format_message(message, &self.renderer, self.app.theme())
        );
    }

    /// Returns `false` on quit; `true` after logout so the login screen runs.
    async fn chat_screen(&mut self) -> Result<bool> {
        self.print_screen();

        loop {
            let readline = match self.draft.take() {
                Some(draft) => self.editor.readline_with_initial("› ", (draft.as_str(), "")),
                None => self.editor.readline("› "),
            };

            let line = match readline {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => {
                    println!("{}", "Type /quit to exit.".yellow());
                    continue;
                }
                Err(ReadlineError::Eof) => return Ok(false),
                Err(e) => return Err(e.into()),
            };

            match parse_command(&line, self.app.conversation().is_empty()) {
                Command::Empty => {}
                Command::Send(text) => {
                    let _ = self.editor.add_history_entry(text.as_str());
                    self.send(&text).await;
                }
                Command::Suggestion(index) => self.send(SUGGESTIONS[index]).await,
                Command::Voice => self.listen().await,
                Command::Mute => {
                    self.muted = !self.muted;
                    let state = if self.muted { "off" } else { "on" };
                    println!("{}", ui::format_notice(&format!("Spoken replies {}.", state)));
                }
                Command::Theme => {
                    self.app.toggle_theme();
                    self.print_screen();
                }
                Command::History => self.print_screen(),
                Command::New => {
                    self.app.new_chat();
                    self.print_screen();
                }
                Command::Logout => {
                    self.app.logout();
                    return Ok(true);
                }
                Command::Help => print!("{}", ui::format_help()),
                Command::Quit => return Ok(false),
                Command::Unknown(cmd) => {
                    println!("{}", ui::format_notice(&format!("Unknown command: {}", cmd)));
                }
            }
        }
    }

    async fn send(&mut self, text: &str) {
        let Some((user_id, pending)) = self.app.begin(text) else {
            return;
        };

        if let Some(message) = self.app.conversation().messages().last() {
            self.print_message(message);
        }
        println!("{}", ui::format_typing_indicator());

        let chat = self.app.chat_service();
        let result = tokio::select! {
            result = chat.send_query(&user_id, &pending.query) => result,
            _ = tokio::signal::ctrl_c() => {
                self.app.abandon(pending.ticket);
                println!("{}", ui::format_notice("Request cancelled."));
                return;
            }
        };

        if let Some(reply) = self.app.complete(pending.ticket, result) {
            self.print_message(&reply);
            self.speak(reply.content());
        }
    }

    fn speak(&self, text: &str) {
        if self.muted {
            return;
        }
        if let Some(ref synthesizer) = self.speech_output {
            synthesizer.speak(text);
        }
    }

    async fn listen(&mut self) {
        if !self.speech_input.is_available() {
            println!("{}", ui::format_notice(ui::RECOGNITION_UNSUPPORTED));
            return;
        }

        println!(
            "{}",
            format!("Listening ({})… press Ctrl-C to stop.", self.speech_input.locale()).dimmed()
        );

        let speech_input = Arc::clone(&self.speech_input);
        let listening = speech_input.listen();
        tokio::pin!(listening);

        let outcome = tokio::select! {
            outcome = &mut listening => outcome,
            _ = tokio::signal::ctrl_c() => {
                self.speech_input.stop();
                listening.as_mut().await
            }
        };

        match outcome {
            Ok(Some(transcript)) => self.draft = Some(transcript),
            Ok(None) => println!("{}", "No speech captured.".dimmed()),
            Err(RecognitionError::Unavailable) => {
                println!("{}", ui::format_notice(ui::RECOGNITION_UNSUPPORTED))
            }
            Err(e) => tracing::warn!(error = %e, "could not start speech recognition"),
        }
    }
}
