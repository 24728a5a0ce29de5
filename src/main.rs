use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;

use nudge::config::AppConfig;
use nudge::handlers;
use nudge::models::{ExercisePlan, User};
use nudge::services::messaging::dry_run::DryRunMessaging;
use nudge::services::messaging::twilio::TwilioSmsProvider;
use nudge::services::messaging::MessagingProvider;
use nudge::services::users::NewUser;
use nudge::services::{admin_auth, eligibility, reminders, scheduler, users};
use nudge::state::AppState;
use nudge::store::{JsonFileStore, UserRepository};

/// Family exercise reminders over SMS
#[derive(Parser)]
#[command(name = "nudge")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the webhook server and the hourly reminder scheduler (default)
    Serve,

    /// Run one reminder sweep right now
    SendNow {
        /// Log messages instead of sending them
        #[arg(long)]
        dry_run: bool,
    },

    /// List registered users
    ListUsers,

    /// Register a family member
    AddUser {
        #[arg(long)]
        name: String,

        /// E.164 phone number, e.g. +12065551234
        #[arg(long)]
        phone: String,

        #[arg(long, default_value = "America/Los_Angeles")]
        timezone: String,

        #[arg(long)]
        age: u32,

        /// Local hour (0-23) to send reminders
        #[arg(long)]
        preferred_hour: Option<u8>,

        /// Days between reminders
        #[arg(long)]
        cadence_days: Option<u32>,

        /// senior_beginner or adult_intermediate; picked by age when omitted
        #[arg(long)]
        plan: Option<String>,
    },

    /// Print a sample reminder without sending it
    Preview {
        #[arg(long, default_value = "senior_beginner")]
        plan: String,

        /// Routine rotation index
        #[arg(long, default_value_t = 0)]
        index: u32,

        #[arg(long, default_value = "妈妈")]
        name: String,
    },

    /// Print a signed admin token for the HTTP API
    AdminToken {
        /// Validity in seconds (defaults to ADMIN_TOKEN_EXPIRY)
        #[arg(long)]
        expires_in: Option<i64>,
    },
}

fn build_state(config: AppConfig, force_dry_run: bool) -> AppState {
    let messaging: Box<dyn MessagingProvider> = if force_dry_run || config.dry_run() {
        tracing::warn!("running in dry-run mode, messages will be logged but not sent");
        Box::new(DryRunMessaging)
    } else {
        tracing::info!(from = %config.twilio_phone_number, "using Twilio SMS provider");
        Box::new(TwilioSmsProvider::from_config(&config))
    };

    let store: Box<dyn UserRepository> = Box::new(open_store(&config));
    AppState {
        users: Mutex::new(store),
        config,
        messaging,
    }
}

fn open_store(config: &AppConfig) -> JsonFileStore {
    JsonFileStore::open(&config.users_file, config.data_encryption_key.as_deref())
}

fn parse_plan(plan: &str) -> anyhow::Result<ExercisePlan> {
    ExercisePlan::parse(plan).with_context(|| {
        format!("unknown plan {plan:?}, expected senior_beginner or adult_intermediate")
    })
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let period = Duration::from_secs(config.check_interval_secs);
    let addr = format!("0.0.0.0:{}", config.port);
    let state = Arc::new(build_state(config, false));

    tokio::spawn(scheduler::run(Arc::clone(&state), period));

    let app = handlers::router(state);

    tracing::info!("starting server on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn list_users(config: &AppConfig) -> anyhow::Result<()> {
    let store = open_store(config);
    let users = users::list_users(&store)?;
    if users.is_empty() {
        println!("No users found. Add one with `nudge add-user`.");
        return Ok(());
    }

    println!(
        "\n{:<12} {:<16} {:<24} {:<5} {:<8} {:<20} Last Sent",
        "Name", "Phone", "Timezone", "Age", "Active", "Plan"
    );
    println!("{}", "-".repeat(110));
    for u in users {
        println!(
            "{:<12} {:<16} {:<24} {:<5} {:<8} {:<20} {}",
            u.name,
            u.phone,
            u.timezone,
            u.age,
            if u.active { "yes" } else { "no" },
            u.exercise_plan.as_str(),
            u.last_sent_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "never".to_string()),
        );
    }
    println!();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await?,
        Commands::SendNow { dry_run } => {
            let state = build_state(config, dry_run);
            let report = reminders::sweep_now(&state).await?;
            println!(
                "Checked {} users: sent {}, failed {}.",
                report.checked,
                report.sent.len(),
                report.failed.len()
            );
        }
        Commands::ListUsers => list_users(&config)?,
        Commands::AddUser {
            name,
            phone,
            timezone,
            age,
            preferred_hour,
            cadence_days,
            plan,
        } => {
            let exercise_plan = plan.as_deref().map(parse_plan).transpose()?;
            let store = open_store(&config);
            let user = users::add_user(
                &store,
                &NewUser {
                    name,
                    phone,
                    timezone,
                    age,
                    preferred_hour,
                    cadence_days,
                    exercise_plan,
                },
            )?;
            println!(
                "Added {} ({}, {}).",
                user.name,
                user.phone,
                user.exercise_plan.as_str()
            );
        }
        Commands::Preview { plan, index, name } => {
            let mut user = User::new(&name, "+10000000000", "UTC", 0);
            user.exercise_plan = parse_plan(&plan)?;
            user.reminders_sent = index;
            println!("{}", eligibility::build_message(&user));
        }
        Commands::AdminToken { expires_in } => {
            let ttl = admin_auth::lifetime(expires_in.unwrap_or(config.admin_token_ttl_secs))?;
            let token = admin_auth::generate_token(&config.admin_secret, ttl, chrono::Utc::now())?;
            println!("{token}");
            println!(
                "\nUsage: curl -H \"X-Admin-Token: {token}\" http://localhost:{}/api/users",
                config.port
            );
        }
    }

    Ok(())
}
