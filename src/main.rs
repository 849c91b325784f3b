use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use chatbot::endpoint::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS, EndpointError, EndpointTimeouts, HttpEndpoint,
};
use chatbot::llm::{LlmChat, LlmClient};
use chatbot::services::assistant::AssistantConfig;
use chatbot::state::AppState;
use chatbot::widget::{DEFAULT_TICKET_POLL_LIMIT, DEFAULT_TICKET_POLL_SECS, SubmitPolicy, WidgetOptions};
use chatbot::{routes, terminal};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("endpoint setup failed: {0}")]
    Endpoint(#[from] EndpointError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "chatbot", about = "Chat widget and the /chat assistant service behind it")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service (`/chat`, ticket and admin routes).
    Serve(ServeArgs),
    /// Open the chat widget in this terminal.
    Chat(ChatArgs),
}

#[derive(Args, Debug)]
struct ServeArgs {
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,

    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0")]
    bind: String,
}

#[derive(Args, Debug)]
struct ChatArgs {
    #[arg(long, env = "CHATBOT_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    /// Whole-request timeout; 0 waits forever.
    #[arg(long, env = "CHATBOT_REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    request_timeout_secs: u64,

    #[arg(long, env = "CHATBOT_CONNECT_TIMEOUT_SECS", default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS)]
    connect_timeout_secs: u64,

    #[arg(long, env = "CHATBOT_TICKET_POLL_SECS", default_value_t = DEFAULT_TICKET_POLL_SECS)]
    ticket_poll_secs: u64,

    #[arg(long, env = "CHATBOT_TICKET_POLL_LIMIT", default_value_t = DEFAULT_TICKET_POLL_LIMIT)]
    ticket_poll_limit: u32,

    /// Refuse new messages until the previous reply arrives.
    #[arg(long, env = "CHATBOT_SINGLE_FLIGHT")]
    single_flight: bool,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // A missing .env is fine; real deployments set the environment directly.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => {
            tracing_subscriber::fmt::init();
            run_serve(args).await
        }
        Command::Chat(args) => {
            // Keep stdout for the transcript.
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_max_level(tracing::Level::WARN)
                .init();
            run_chat(args).await
        }
    }
}

async fn run_serve(args: ServeArgs) -> Result<(), CliError> {
    // LLM is optional: without it every message is handed to an admin.
    let llm = match LlmClient::from_env() {
        Ok(client) => {
            info!(model = client.model(), "LLM client initialized");
            let client: Arc<dyn LlmChat> = Arc::new(client);
            Some(client)
        }
        Err(e) => {
            warn!(error = %e, "LLM client not configured; all messages go to the admin queue");
            None
        }
    };

    let state = AppState::new(llm, AssistantConfig::from_env());
    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind((args.bind.as_str(), args.port)).await?;

    info!(addr = %listener.local_addr()?, "chatbot listening");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn run_chat(args: ChatArgs) -> Result<(), CliError> {
    let timeouts = EndpointTimeouts::from_secs(args.request_timeout_secs, args.connect_timeout_secs);
    let endpoint = HttpEndpoint::new(&args.base_url, timeouts)?;
    let options = WidgetOptions {
        policy: if args.single_flight { SubmitPolicy::SingleFlight } else { SubmitPolicy::Concurrent },
        ticket_poll_interval: Duration::from_secs(args.ticket_poll_secs.max(1)),
        ticket_poll_limit: args.ticket_poll_limit,
    };
    terminal::run(Arc::new(endpoint), options).await?;
    Ok(())
}
