//! Poro Focus CLI - a Pomodoro focus timer with a task list
//!
//! This tool helps you stay focused:
//! - drift-corrected work/break countdown with auto-cycling
//! - sound cues at interval ends
//! - a small task list with a focus-mode view

use anyhow::Result;
use clap::{CommandFactory, Parser};

use porofocus::cli::{Cli, Commands, Display, IpcClient, TaskCommands};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize logging
    init_tracing();

    // Parse command line arguments
    let cli = Cli::parse();

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&e.to_string());
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    // Set verbose logging if requested
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Toggle) => {
            let client = IpcClient::new()?;
            let response = client.toggle().await?;
            Display::show_command_result(&response);
        }
        Some(Commands::Reset) => {
            let client = IpcClient::new()?;
            let response = client.reset().await?;
            Display::show_command_result(&response);
        }
        Some(Commands::Mode) => {
            let client = IpcClient::new()?;
            let response = client.mode().await?;
            Display::show_command_result(&response);
        }
        Some(Commands::Work { minutes }) => {
            let client = IpcClient::new()?;
            let response = client.work(minutes).await?;
            Display::show_command_result(&response);
        }
        Some(Commands::Break { minutes }) => {
            let client = IpcClient::new()?;
            let response = client.break_time(minutes).await?;
            Display::show_command_result(&response);
        }
        Some(Commands::Sound { state }) => {
            let client = IpcClient::new()?;
            let response = client.sound(state).await?;
            Display::show_command_result(&response);
        }
        Some(Commands::Status) => {
            let client = IpcClient::new()?;
            let response = client.status().await?;
            Display::show_status(&response);
        }
        Some(Commands::Task { action }) => {
            let client = IpcClient::new()?;
            match action {
                TaskCommands::Add { title, icon } => {
                    let response = client.task_add(title, icon).await?;
                    Display::show_command_result(&response);
                }
                TaskCommands::Done { id } => {
                    let response = client.task_done(id).await?;
                    Display::show_command_result(&response);
                }
                TaskCommands::Rm { id } => {
                    let response = client.task_remove(id).await?;
                    Display::show_command_result(&response);
                }
                TaskCommands::List { focus } => {
                    let response = client.task_list(focus).await?;
                    Display::show_tasks(&response);
                }
            }
        }
        Some(Commands::Daemon) => {
            porofocus::daemon::run(None).await?;
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
