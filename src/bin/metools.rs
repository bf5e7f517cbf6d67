use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use metools::services::configurators::Env;
use metools::services::storage::session::{File, InMemory};
use metools::{ApiClient, Configurator, NewTask, Session, SessionStorage, SignupData};
use serde::Serialize;
use url::Url;

/// Command-line front end for the metools task backend.
#[derive(Debug, Parser)]
#[command(name = "metools", version)]
struct Cli {
    /// Backend base url. Falls back to `BASE_URL`.
    #[arg(long = "base-url", value_name = "url", global = true)]
    base_url: Option<Url>,
    /// Where the session is persisted. Falls back to `METOOLS_SESSION_FILE`.
    #[arg(long = "session-file", value_name = "path", global = true)]
    session_file: Option<PathBuf>,
    /// Keep the session in memory only; nothing is read from or written to disk.
    #[arg(long, global = true)]
    ephemeral: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Register a new account.
    Signup {
        username: String,
        email: String,
        #[arg(long, env = "METOOLS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Log in and remember the session.
    Login {
        username: String,
        #[arg(long, env = "METOOLS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session.
    Logout,
    /// Show the profile the stored token belongs to.
    Whoami,
    /// Work with the current user's tasks.
    #[command(subcommand)]
    Tasks(TasksCommand),
}

#[derive(Debug, Subcommand)]
enum TasksCommand {
    List,
    /// Create a task; data is given as `key=value` pairs.
    Create {
        #[arg(value_name = "type")]
        type_: String,
        #[arg(value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
    Delete {
        task_id: String,
    },
    /// Delete every task belonging to the current user.
    Clear,
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected key=value, got `{raw}`"))
}

fn setup_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .unwrap_or_default();

    let config = tracing_subscriber::registry().with(filter_layer);

    if atty::is(atty::Stream::Stderr) {
        config
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .init();
    } else {
        config
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing();
    let cli = Cli::parse();

    let mut config = Env::new()?;
    if let Some(base_url) = cli.base_url {
        config = config.with_base_url(base_url);
    }
    if let Some(session_file) = cli.session_file {
        config = config.with_session_path(session_file);
    }

    let client = ApiClient::from_config(&config);
    let storage: Box<dyn SessionStorage> = if cli.ephemeral {
        Box::new(InMemory::new())
    } else {
        Box::new(File::new(config.session_path()))
    };
    let session = Session::restore(client, storage)
        .await
        .context("could not restore session")?;

    run(session, cli.command).await
}

async fn run(
    mut session: Session<Box<dyn SessionStorage>>,
    command: Command,
) -> anyhow::Result<()> {
    match command {
        Command::Signup {
            username,
            email,
            password,
        } => {
            let data = SignupData {
                username,
                email,
                repeat_password: password.clone(),
                password,
            };
            let problems = data.problems();
            if !problems.is_empty() {
                let problems: Vec<String> = problems.iter().map(ToString::to_string).collect();
                anyhow::bail!("{}", problems.join("; "));
            }
            print_json(&session.client().signup(&data).await?)
        }
        Command::Login { username, password } => {
            let state = session.login(&username, &password).await?;
            print_json(&serde_json::json!({
                "username": state.username,
                "email": state.email,
            }))
        }
        Command::Logout => {
            session.logout().await?;
            Ok(())
        }
        Command::Whoami => {
            let token = session.token()?;
            print_json(&session.client().me(token).await?)
        }
        Command::Tasks(command) => {
            let token = session.token()?;
            let client = session.client();
            match command {
                TasksCommand::List => print_json(&client.list_tasks(token).await?),
                TasksCommand::Create { type_, fields } => {
                    let task = fields
                        .into_iter()
                        .fold(NewTask::new(type_), |task, (key, value)| {
                            task.with_field(key, value)
                        });
                    print_json(&client.create_task(token, &task).await?)
                }
                TasksCommand::Delete { task_id } => {
                    print_json(&client.delete_task_by_id_for_user(token, &task_id).await?)
                }
                TasksCommand::Clear => print_json(&client.delete_all_tasks_for_user(token).await?),
            }
        }
    }
}
