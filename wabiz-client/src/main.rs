use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::prelude::*;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "wabiz", author, version, about = "Contact import and session tools for the WhatsApp Business dashboard", long_about = None)]
struct Args {
    #[arg(long, global = true)]
    log_file_path: Option<String>,

    /// Backend base URL, overriding the config file
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a contact CSV and show what would be imported
    Preview {
        file: PathBuf,

        /// Print the decoded contacts as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the sample contact CSV
    Sample {
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Log in and store the session
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in user and selected company
    Status,

    /// List the companies available to the logged-in user
    Companies,

    /// Select the company that contact commands act on
    UseCompany { id: String },

    /// Decode a contact CSV and submit it to the backend
    Import { file: PathBuf },

    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if let Some(log_path) = &args.log_file_path {
        let log_path = std::path::Path::new(log_path);
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(std::path::Path::new(".")),
            log_path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("wabiz.log")),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        std::mem::forget(guard);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }

    dispatch(args.command, args.api_url).await
}

/// Runs one command. Preview and sample work on local files only, so they run
/// without loading the config or the stored session.
async fn dispatch(command: Command, api_url: Option<String>) -> anyhow::Result<()> {
    match command {
        Command::Preview { file, json } => commands::preview(&file, json),
        Command::Sample { output } => commands::sample(output),
        command => {
            let mut ctx = commands::Context::load(api_url)?;
            run(&mut ctx, command).await
        }
    }
}

async fn run(ctx: &mut commands::Context, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Preview { file, json } => commands::preview(&file, json),
        Command::Sample { output } => commands::sample(output),
        Command::Login { email, password } => commands::login(ctx, email, password).await,
        Command::Logout => commands::logout(ctx),
        Command::Status => commands::status(ctx),
        Command::Companies => commands::companies(ctx).await,
        Command::UseCompany { id } => commands::use_company(ctx, id),
        Command::Import { file } => commands::import(ctx, &file).await,
        Command::Config => commands::show_config(ctx),
    }
}

// Points the config directory at a temp dir through XDG_CONFIG_HOME, which
// `dirs` only honours on Linux.
#[cfg(all(test, target_os = "linux"))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_commands_ignore_broken_session() {
        let dir = tempfile::tempdir().unwrap();
        let config_home = dir.path().join("config");
        std::fs::create_dir_all(config_home.join("wabiz")).unwrap();
        std::fs::write(config_home.join("wabiz").join("session.json"), "{ not json").unwrap();
        std::env::set_var("XDG_CONFIG_HOME", &config_home);

        let csv = dir.path().join("contacts.csv");
        std::fs::write(&csv, "phone,name\n+111,Ann\n").unwrap();

        dispatch(
            Command::Preview {
                file: csv,
                json: true,
            },
            None,
        )
        .await
        .unwrap();

        let sample = dir.path().join("sample.csv");
        dispatch(
            Command::Sample {
                output: Some(sample.clone()),
            },
            None,
        )
        .await
        .unwrap();
        assert!(sample.exists());

        // Neither command created a default config file
        assert!(!config_home.join("wabiz").join("client.toml").exists());

        // Commands that talk to the backend still load the session
        let err = dispatch(Command::Status, None).await.unwrap_err();
        assert!(format!("{err:#}").contains("Failed to load session"));
    }
}
