//! Moira console binary entrypoint.
//!
//! This is the main entry point for the `moira` command-line tool.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use moira_console::cli::{Cli, Commands};
use moira_console::commands::{
    ContactsCommand, GlobalCommand, NotificationsCommand, PatternsCommand, SilentCommand, StatsCommand,
    SubscriptionsCommand, TagsCommand, TriggerCommand, TriggersCommand,
};
use moira_console::output::OutputFormat;
use moira_console::ConsoleConfig;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Merges the configuration file with command-line overrides.
fn resolve_config(cli: &Cli) -> moira_console::Result<ConsoleConfig> {
    let mut config = ConsoleConfig::load(cli.config.as_deref())?;
    if let Some(api_url) = &cli.api_url {
        config = config.with_api_url(api_url.as_str());
    }
    if let Some(login) = &cli.login {
        config = config.with_login(login.as_str());
    }
    config.validate()?;
    Ok(config)
}

async fn run(cli: Cli) -> moira_console::Result<()> {
    let config = resolve_config(&cli)?;
    let client = config.client()?;
    tracing::debug!(api_url = %client.base_url(), "using Moira API");

    let format = OutputFormat::new(cli.format);
    let mut stdout = io::stdout().lock();

    match &cli.command {
        Commands::Triggers(args) => {
            let store = config.filter_store();
            let cmd = TriggersCommand::new(&client, store.as_ref());
            cmd.execute(&mut stdout, &format, args).await?;
        }
        Commands::Trigger { command } => {
            let cmd = TriggerCommand::new(&client);
            cmd.execute(&mut stdout, &format, command).await?;
        }
        Commands::Contacts { command } => {
            let cmd = ContactsCommand::new(&client);
            cmd.execute(&mut stdout, &format, command).await?;
        }
        Commands::Subscriptions { command } => {
            let cmd = SubscriptionsCommand::new(&client);
            cmd.execute(&mut stdout, &format, command).await?;
        }
        Commands::Silent { command } => {
            let cmd = SilentCommand::new(&client);
            cmd.execute(&mut stdout, &format, command).await?;
        }
        Commands::Tags { command } => {
            let cmd = TagsCommand::new(&client);
            cmd.execute(&mut stdout, &format, command).await?;
        }
        Commands::Patterns { command } => {
            let cmd = PatternsCommand::new(&client);
            cmd.execute(&mut stdout, &format, command).await?;
        }
        Commands::Notifications { command } => {
            let cmd = NotificationsCommand::new(&client);
            cmd.execute(&mut stdout, &format, command).await?;
        }
        Commands::Stats(args) => {
            let cmd = StatsCommand::new(&client);
            cmd.execute(&mut stdout, &format, args).await?;
        }
        Commands::Global { command } => {
            let cmd = GlobalCommand::new(&client);
            cmd.execute(&mut stdout, &format, command).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use moira_console::cli::{ContactCommands, Format, SilentCommands, TriggerCommands};
    use moira_core::{ContactType, Maintenance, TimeOffset};

    #[test]
    fn cli_parses_trigger_list() {
        let cli = Cli::parse_from(["moira", "triggers", "--tag", "prod", "--tag", "db", "--only-problems", "-p", "2"]);
        match cli.command {
            Commands::Triggers(args) => {
                assert_eq!(args.tags, vec!["prod", "db"]);
                assert!(args.only_problems);
                assert_eq!(args.page, 2);
            }
            _ => panic!("expected triggers command"),
        }
    }

    #[test]
    fn cli_parses_maintenance_duration() {
        let cli = Cli::parse_from(["moira", "trigger", "maintenance", "t1", "1d", "--metric", "a.b"]);
        match cli.command {
            Commands::Trigger {
                command: TriggerCommands::Maintenance { id, duration, metric },
            } => {
                assert_eq!(id, "t1");
                assert_eq!(duration, Maintenance::OneDay);
                assert_eq!(metric.as_deref(), Some("a.b"));
            }
            _ => panic!("expected trigger maintenance"),
        }
    }

    #[test]
    fn cli_rejects_unknown_duration() {
        assert!(Cli::try_parse_from(["moira", "trigger", "maintenance", "t1", "5y"]).is_err());
    }

    #[test]
    fn cli_parses_contact_add() {
        let cli = Cli::parse_from(["moira", "contacts", "add", "slack", "ops", "--fallback", "#alerts"]);
        match cli.command {
            Commands::Contacts {
                command: ContactCommands::Add { kind, value, fallback },
            } => {
                assert_eq!(kind, ContactType::Slack);
                assert_eq!(value, "ops");
                assert_eq!(fallback.as_deref(), Some("#alerts"));
            }
            _ => panic!("expected contacts add"),
        }
    }

    #[test]
    fn cli_parses_silent_add_default_duration() {
        let cli = Cli::parse_from(["moira", "silent", "add", "servers.*"]);
        match cli.command {
            Commands::Silent {
                command: SilentCommands::Add { patterns, duration, .. },
            } => {
                assert_eq!(patterns, vec!["servers.*"]);
                assert_eq!(duration, TimeOffset::OneHour);
            }
            _ => panic!("expected silent add"),
        }
    }

    #[test]
    fn cli_respects_format_flag() {
        let cli = Cli::parse_from(["moira", "--format", "json", "tags", "list"]);
        assert_eq!(cli.format, Format::Json);
    }

    #[test]
    fn api_url_flag_overrides_config() {
        let cli = Cli::parse_from(["moira", "-u", "http://moira.local/api", "--login", "ops", "tags", "list"]);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.api_url, "http://moira.local/api");
        assert_eq!(config.login.as_deref(), Some("ops"));
    }

    #[test]
    fn invalid_api_url_is_rejected() {
        let cli = Cli::parse_from(["moira", "-u", "ftp://moira.local", "tags", "list"]);
        assert!(resolve_config(&cli).is_err());
    }

    #[tokio::test]
    async fn run_without_server_fails() {
        let cli = Cli::parse_from(["moira", "-u", "http://127.0.0.1:9/api", "tags", "list"]);
        assert!(run(cli).await.is_err());
    }
}
