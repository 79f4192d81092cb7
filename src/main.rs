use clap::Parser;
use colored::*;
use std::process;
use std::sync::Arc;

use onecard::api::ChatClient;
use onecard::app::App;
use onecard::auth::SharedSecretAuthenticator;
use onecard::cli::Args;
use onecard::config::Config;
use onecard::logging;
use onecard::repl::Repl;
use onecard::speech::{AudioPlayer, CommandPlayer, SpeechInput, SpeechSynthesizer};
use onecard::ui::{self, MarkdownRenderer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match Config::from_env_and_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red(), e);
            process::exit(1);
        }
    };

    logging::init(config.verbose);
    tracing::debug!(endpoint = %config.api.endpoint, theme = %config.theme, "configuration loaded");

    let chat = Arc::new(ChatClient::new(
        config.api.endpoint.clone(),
        config.api.timeout_secs,
    )?);
    let authenticator = Box::new(SharedSecretAuthenticator::new(config.shared_secret.clone()));
    let mut app = App::new(authenticator, chat, config.theme);

    let speech_output = if config.speech_enabled {
        let player: Arc<dyn AudioPlayer> = Arc::new(CommandPlayer::new(config.speech.player.clone()));
        match SpeechSynthesizer::new(config.speech.clone(), player) {
            Ok(synth) if synth.is_enabled() => Some(Arc::new(synth)),
            Ok(_) => {
                tracing::debug!("no text-to-speech key configured, replies will not be spoken");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "text-to-speech disabled");
                None
            }
        }
    } else {
        None
    };

    if !args.query.is_empty() {
        let query = args.query.join(" ");
        let Some(secret) = args.password.as_deref() else {
            eprintln!("{}", "Error: --password is required when sending a single question".red());
            process::exit(1);
        };
        if let Err(e) = app.login(args.user.as_deref().unwrap_or_default(), secret) {
            eprintln!("{}", ui::format_login_error(&e.to_string()));
            process::exit(1);
        }

        let renderer = MarkdownRenderer::new();
        if let Some(reply) = app.send(&query).await {
            println!("{}", ui::format_message(&reply, &renderer, app.theme()));
            if let Some(synth) = speech_output {
                if let Err(e) = synth.speak_now(reply.content()).await {
                    tracing::warn!(error = %e, "text-to-speech failed");
                }
            }
        }
        return Ok(());
    }

    let speech_input = Arc::new(SpeechInput::from_config(&config.recognition));
    let mut repl = Repl::new(app, speech_input, speech_output)?;
    if let Some(secret) = args.password {
        repl = repl.with_login(args.user.unwrap_or_default(), secret);
    }
    repl.run().await?;

    Ok(())
}
