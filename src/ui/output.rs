use super::highlight::MarkdownRenderer;
use crate::conversation::SUGGESTIONS;
use crate::models::{Message, Role, ThemeMode};
use colored::*;

pub const APP_NAME: &str = "OneCard AI";
pub const DISCLAIMER: &str = "Free Research Preview. OneCard AI may produce inaccurate information.";
pub const RECOGNITION_UNSUPPORTED: &str = "Speech recognition not supported on this system.";

const ACCENT: (u8, u8, u8) = (249, 115, 22);

fn accent(text: &str) -> ColoredString {
    text.truecolor(ACCENT.0, ACCENT.1, ACCENT.2)
}

fn body(text: &str, mode: ThemeMode) -> ColoredString {
    match mode {
        ThemeMode::Light => text.truecolor(55, 65, 81),
        ThemeMode::Dark => text.truecolor(229, 231, 235),
    }
}

fn rule_width() -> usize {
    terminal_size::terminal_size()
        .map(|(terminal_size::Width(w), _)| w as usize)
        .unwrap_or(60)
        .clamp(20, 80)
}

fn rule() -> String {
    "─".repeat(rule_width()).dimmed().to_string()
}

pub fn format_login_banner() -> String {
    format!(
        "{}\n{}\n",
        APP_NAME.bold().truecolor(ACCENT.0, ACCENT.1, ACCENT.2),
        "Sign in to continue".dimmed()
    )
}

pub fn format_login_error(message: &str) -> String {
    format!("{} {}", "✗".red(), message.red())
}

pub fn format_header(user_id: &str, mode: ThemeMode) -> String {
    let icon = match mode {
        ThemeMode::Light => "☾",
        ThemeMode::Dark => "☀",
    };
    format!(
        "{}\n{}  {}  {}\n{}",
        rule(),
        "AI Chat Helper".bold(),
        format!("signed in as {}", user_id).dimmed(),
        format!("{} {} mode", icon, mode).dimmed(),
        rule()
    )
}

pub fn format_empty_state(mode: ThemeMode) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", body("How can I help you?", mode).bold()));
    out.push_str(&format!(
        "{}\n\n",
        "I can help you analyze your OneCard spending, manage your limits, or clarify transaction details."
            .dimmed()
    ));
    for (i, suggestion) in SUGGESTIONS.iter().enumerate() {
        out.push_str(&format!(
            "  {} {}  {}\n",
            accent(&format!("[{}]", i + 1)),
            body(suggestion, mode).bold(),
            "Get instant details.".dimmed()
        ));
    }
    out
}

pub fn format_message(message: &Message, renderer: &MarkdownRenderer, mode: ThemeMode) -> String {
    let time = message.sent_at().format("%H:%M").to_string();
    match message.role() {
        Role::User => format!(
            "{} {}\n{}\n",
            accent(message.role().label()).bold(),
            time.dimmed(),
            accent(message.content())
        ),
        Role::Bot => {
            let rendered = renderer.render(message.content(), mode);
            format!(
                "{} {}\n{}",
                body(message.role().label(), mode).bold(),
                time.dimmed(),
                body(&rendered, mode)
            )
        }
    }
}

pub fn format_typing_indicator() -> String {
    format!("{}", "AI is typing…".dimmed().italic())
}

pub fn format_notice(text: &str) -> String {
    format!("{}", text.yellow())
}

pub fn format_help() -> String {
    let commands = [
        ("1-3", "send a suggestion (empty chat only)"),
        ("/s N", "send suggestion N"),
        ("/voice", "speak your message"),
        ("/mute", "toggle reading replies aloud"),
        ("/theme", "switch light/dark mode"),
        ("/history", "show the conversation again"),
        ("/new", "start a new chat"),
        ("/logout", "sign out"),
        ("/quit", "exit"),
        ("Ctrl-C", "stop listening or cancel a pending reply"),
    ];
    let mut out = String::new();
    for (cmd, desc) in commands {
        out.push_str(&format!("  {:<10} {}\n", cmd.cyan(), desc.dimmed()));
    }
    out.push_str(&format!("{}\n", DISCLAIMER.dimmed()));
    out
}
