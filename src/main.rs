//! hobby-client - command-line front end for the hobby recommendation service

mod cli;

use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use hobby_client::{
    api::AppState,
    config::{Config, DataSource},
    models::{BudgetTier, Environment, GatheringId, HobbyId, MeetingType, SocialStyle},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "hobby-client",
    version,
    about = "Find a hobby that fits you",
    long_about = "Sign up, answer a five-question survey and browse hobby recommendations.\n\
                  \n\
                  Environment Variables:\n\
                    API_BASE_URL                     # Backend base URL (default http://localhost:5000/api)\n\
                    REQUEST_TIMEOUT_SECS             # Per-request timeout (default 10)\n\
                    DATA_SOURCE                      # network | fixture\n\
                    STORAGE_DIR                      # Where the session is kept (default .hobby-client)\n\
                    RECOMMENDATION_LIMIT             # Default number of recommendations\n\
                    RUST_LOG                         # Log filter (default hobby_client=info)"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Override the backend base URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Serve hobbies and recommendations from the bundled fixture
    #[arg(long, global = true)]
    fixture: bool,

    /// Override the session storage directory
    #[arg(long, global = true)]
    storage_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create an account
    Signup {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Repeat the password
        #[arg(long)]
        password_confirm: String,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        birth_year: String,
        #[arg(long, default_value = "")]
        gender: String,
    },
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out and forget the session
    Logout,
    /// Show who is signed in
    Whoami,
    /// Answer the survey, interactively or with --answers
    Survey {
        /// Five comma-separated option values in question order,
        /// e.g. indoor,alone,moderate,yes,medium
        #[arg(long, value_delimiter = ',')]
        answers: Option<Vec<String>>,
    },
    /// List the backend's survey questions
    Questions,
    /// Browse the hobby catalog
    Hobbies {
        #[arg(long, short = 's')]
        search: Option<String>,
        #[arg(long, short = 'c')]
        category: Option<String>,
        #[arg(long)]
        environment: Option<Environment>,
        #[arg(long)]
        social: Option<SocialStyle>,
        #[arg(long)]
        budget: Option<BudgetTier>,
    },
    /// List hobby categories
    Categories,
    /// Show one hobby with reviews and similar hobbies
    Hobby { hobby_id: HobbyId },
    /// Rate a hobby from 1 to 5
    Rate {
        hobby_id: HobbyId,
        #[arg(long, short = 'r')]
        rating: u8,
        #[arg(long)]
        review: Option<String>,
        /// You have actually tried it
        #[arg(long)]
        experienced: bool,
    },
    /// Personal recommendations
    Recommend {
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },
    /// Most popular hobbies
    Popular {
        #[arg(long, short = 'n', default_value = "10")]
        limit: usize,
    },
    /// Hobbies similar to another one
    Similar {
        hobby_id: HobbyId,
        #[arg(long, short = 'n', default_value = "5")]
        limit: usize,
    },
    /// Browse gatherings
    Gatherings {
        #[arg(long)]
        hobby_id: Option<HobbyId>,
        #[arg(long)]
        region: Option<String>,
        #[arg(long)]
        meeting_type: Option<MeetingType>,
        #[arg(long, short = 's')]
        search: Option<String>,
    },
    /// Show one gathering
    Gathering { gathering_id: GatheringId },
    /// Create a gathering (requires login)
    CreateGathering {
        #[arg(long)]
        hobby_id: Option<HobbyId>,
        #[arg(long)]
        name: String,
        #[arg(long)]
        region: String,
        #[arg(long, default_value = "offline")]
        meeting_type: MeetingType,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        schedule: Option<String>,
        #[arg(long)]
        contact: Option<String>,
        #[arg(long)]
        website: Option<String>,
    },
    /// List regions with gatherings
    Regions,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hobby_client=info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = Config::from_env()?;
    if let Some(url) = &cli.api_url {
        config.api_base_url = url.clone();
    }
    if cli.fixture {
        config.data_source = DataSource::Fixture;
    }
    if let Some(dir) = &cli.storage_dir {
        config.storage_dir = dir.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let state = match AppState::from_config(config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialise client");
            eprintln!("{}", e.user_message("Could not start the client."));
            return ExitCode::FAILURE;
        }
    };

    match cli::run(&state, cli.command, cli.json).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
