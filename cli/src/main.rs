use buffbucks_core::config::{DEFAULT_AGGREGATE_URL, DEFAULT_DAY_WINDOW_URL, DEFAULT_IDENTITY_URL};
use buffbucks_core::{Endpoints, HttpUpstream, MintPipeline};
use clap::{Parser, Subcommand};

mod commands;
mod util;

#[derive(Parser)]
#[command(name = "buffbucks", version, about = "BuffBucks oracle: turn today's activity into a mint amount")]
struct Cli {
    /// Fitness OAuth bearer token
    #[arg(long, env = "ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Identity (userinfo) endpoint
    #[arg(long, env = "BUFFBUCKS_IDENTITY_URL", default_value = DEFAULT_IDENTITY_URL)]
    identity_url: String,

    /// Day-window (midnight timestamp) endpoint
    #[arg(long, env = "BUFFBUCKS_DAY_WINDOW_URL", default_value = DEFAULT_DAY_WINDOW_URL)]
    day_window_url: String,

    /// Fitness dataset aggregate endpoint
    #[arg(long, env = "BUFFBUCKS_AGGREGATE_URL", default_value = DEFAULT_AGGREGATE_URL)]
    aggregate_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute today's mint amount: args are <claimed_email> <last_mint_time_millis>
    Mint {
        /// Positional invocation arguments, passed through as received
        #[arg(num_args = 0.., allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Return the verified email of the account behind the access token
    Email,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    util::init_tracing();
    let cli = Cli::parse();

    let endpoints = Endpoints::new(&cli.identity_url, &cli.day_window_url, &cli.aggregate_url)
        .unwrap_or_else(|e| {
            util::exit_error(
                "invalid_config",
                &e.to_string(),
                Some("Endpoint URLs must be absolute http(s) URLs."),
            )
        });
    let pipeline = MintPipeline::new(HttpUpstream::new(), endpoints);
    let credential = cli.access_token.as_deref();

    let code = match cli.command {
        Commands::Mint { args } => commands::mint::run(&pipeline, &args, credential).await,
        Commands::Email => commands::email::run(&pipeline, credential).await,
    };
    std::process::exit(code);
}
