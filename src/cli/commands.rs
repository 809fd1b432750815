//! Command dispatch

use std::io;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;
use crate::tree_traits::TreeNodeConvert;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see `qtree --help`".to_string(),
        ));
    };

    match command {
        Commands::Show { id, details } => show(&container(cli)?, id, *details),
        Commands::Json { id, compact } => json(&container(cli)?, id, *compact),
        Commands::List => list(&container(cli)?),
        Commands::Check { verbose } => check(&container(cli)?, *verbose),
        Commands::Config { command } => config(cli, command),
        Commands::Completion { shell } => {
            completion(*shell);
            Ok(())
        }
    }
}

/// Settings from config files and env, with command-line overrides applied.
pub fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(dir) = &cli.content_dir {
        settings.content_dir = dir.clone();
    }
    debug!("load_settings: {:?}", settings);
    Ok(settings)
}

fn container(cli: &Cli) -> CliResult<ServiceContainer> {
    Ok(ServiceContainer::new(load_settings(cli)?))
}

#[instrument(skip(container))]
fn show(container: &ServiceContainer, id: &str, details: bool) -> CliResult<()> {
    let document = container.tree_service.load_tree(id)?;
    output::info(&document.to_tree_with(details));
    Ok(())
}

#[instrument(skip(container))]
fn json(container: &ServiceContainer, id: &str, compact: bool) -> CliResult<()> {
    let document = container.tree_service.load_tree(id)?;
    let rendered = if compact {
        serde_json::to_string(&document)
    } else {
        serde_json::to_string_pretty(&document)
    }
    .map_err(|e| ApplicationError::OperationFailed {
        context: format!("serialize tree {}", id),
        source: Box::new(e),
    })?;
    output::info(&rendered);
    Ok(())
}

fn ensure_content_dir(container: &ServiceContainer) -> CliResult<()> {
    let dir = &container.settings.content_dir;
    if container.fs.is_dir(dir) {
        Ok(())
    } else {
        Err(CliError::InvalidArgs(format!(
            "content directory does not exist: {}",
            dir.display()
        )))
    }
}

/// Ids in the content directory; listing failures are I/O errors.
fn content_ids(container: &ServiceContainer) -> CliResult<Vec<String>> {
    ensure_content_dir(container)?;
    container.store.list().map_err(|e| {
        InfraError::io(
            format!("list {}", container.settings.content_dir.display()),
            e,
        )
        .into()
    })
}

#[instrument(skip(container))]
fn list(container: &ServiceContainer) -> CliResult<()> {
    for id in content_ids(container)? {
        output::info(&id);
    }
    Ok(())
}

#[instrument(skip(container))]
fn check(container: &ServiceContainer, verbose: bool) -> CliResult<()> {
    let ids = content_ids(container)?;
    let outcomes = container.tree_service.check_ids(ids);
    let total = outcomes.len();
    let mut failed = 0;

    for outcome in &outcomes {
        match &outcome.result {
            Ok(summary) => {
                output::success(&format!(
                    "{}: {} nodes, depth {}, {} dropped",
                    outcome.id,
                    summary.node_count,
                    summary.depth,
                    summary.report.dropped.len()
                ));
                if verbose {
                    for item in &summary.report.dropped {
                        let id = item.id.as_deref().unwrap_or("<no id>");
                        output::dropped(&format!("{}: {}", id, item.reason));
                    }
                    for id in &summary.report.collisions {
                        output::dropped(&format!("{}: duplicate id", id));
                    }
                }
            }
            Err(e) => {
                failed += 1;
                // Diagnostics keep the cause visible, unlike the user-facing message
                match e.not_found_cause() {
                    Some(cause) => output::failure(&format!("{}: {}", outcome.id, cause)),
                    None => output::failure(&format!("{}: {}", outcome.id, e)),
                }
            }
        }
    }

    if failed > 0 {
        return Err(CliError::CheckFailed { failed, total });
    }
    Ok(())
}

fn config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::header("# effective settings");
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => {
                return Err(CliError::Usage(
                    "cannot determine config directory".to_string(),
                ))
            }
        },
    }
    Ok(())
}

fn completion(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
