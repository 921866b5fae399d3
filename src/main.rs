mod cli;
mod config;
mod context;
mod error;
mod handlers;
mod maven;
mod pom;
mod repository;
mod scm;
mod services;
mod validation;

use clap::Parser;
use cli::{Cli, Commands, RawEvent};
use colored::Colorize;
use config::ToolingConfig;
use context::AppContext;
use error::Result;
use handlers::Response;
use handlers::approve_merge::ApproveMergeEvent;
use handlers::build_status::BuildStatusEvent;
use handlers::set_version::SetVersionEvent;
use handlers::update_dependencies::UpdateDependenciesEvent;
use serde::de::DeserializeOwned;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let response = match run(cli) {
        Ok(response) => response,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            process::exit(1);
        }
    };

    match serde_json::to_string_pretty(&response) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            process::exit(1);
        }
    }

    if !response.is_success() {
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<Response> {
    let config = ToolingConfig::load(cli.config.as_deref())?;
    let context = AppContext::new(config);

    let response = match cli.command {
        Commands::UpdateDependencies {
            repository_name,
            jira_number,
            branch_name,
            event,
        } => {
            let event = event_or(event, || UpdateDependenciesEvent {
                repository_name,
                jira_number,
                branch_name,
            })?;
            handlers::update_dependencies::handle(&context, &event)
        }
        Commands::SetVersion {
            repository_name,
            new_pom_version,
            jira_number,
            branch_name,
            event,
        } => {
            let event = event_or(event, || SetVersionEvent {
                repository_name,
                new_pom_version,
                jira_number,
                branch_name,
            })?;
            handlers::set_version::handle(&context, &event)
        }
        Commands::CheckBuildStatus {
            merge_request_url,
            event,
        } => {
            let event = event_or(event, || BuildStatusEvent { merge_request_url })?;
            handlers::build_status::handle(&context, &event)
        }
        Commands::ApproveMerge {
            merge_request_url,
            event,
        } => {
            let event = event_or(event, || ApproveMergeEvent { merge_request_url })?;
            handlers::approve_merge::handle(&context, &event)
        }
    };

    Ok(response)
}

/// The `--event` JSON when given, otherwise the event assembled from flags.
fn event_or<T: DeserializeOwned>(raw: RawEvent, from_flags: impl FnOnce() -> T) -> Result<T> {
    match raw.json {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Ok(from_flags()),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_current_span(true)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_event_takes_precedence_over_flags() {
        let raw = RawEvent {
            json: Some(r#"{"mergeRequestUrl":"https://gitlab/x/-/merge_requests/2"}"#.to_string()),
        };
        let event = event_or(raw, || BuildStatusEvent {
            merge_request_url: Some("flag".to_string()),
        })
        .unwrap();
        assert_eq!(
            event.merge_request_url.as_deref(),
            Some("https://gitlab/x/-/merge_requests/2")
        );

        let event = event_or(RawEvent::default(), || BuildStatusEvent {
            merge_request_url: Some("flag".to_string()),
        })
        .unwrap();
        assert_eq!(event.merge_request_url.as_deref(), Some("flag"));
    }

    #[test]
    fn malformed_event_is_rejected() {
        let raw = RawEvent {
            json: Some("{not json".to_string()),
        };
        let result = event_or(raw, BuildStatusEvent::default);
        assert!(result.is_err());
    }
}
