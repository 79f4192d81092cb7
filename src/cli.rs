use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(name = "onecard")]
#[command(about = "Terminal chat client for the OneCard AI assistant", long_about = None)]
pub struct Args {
    #[arg(short = 'u', long = "user", help = "User ID to log in with")]
    pub user: Option<String>,

    #[arg(
        short = 'p',
        long = "password",
        help = "Login password (prompted for when omitted)"
    )]
    pub password: Option<String>,

    #[arg(
        long = "api-endpoint",
        help = "Chat endpoint URL (e.g., http://localhost:8000/chat)"
    )]
    pub api_endpoint: Option<String>,

    #[arg(long = "theme", help = "Start in light or dark mode")]
    pub theme: Option<String>,

    #[arg(long = "no-speech", help = "Do not read replies aloud")]
    pub no_speech: bool,

    #[arg(short = 'v', long = "verbose", help = "Print diagnostic logs to stderr")]
    pub verbose: bool,

    #[arg(help = "Send a single question and exit")]
    pub query: Vec<String>,
}
