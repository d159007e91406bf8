//! Environment selection from `--env-file`, `--env` and `--var`.

use std::path::Path;

use anyhow::{Context, Result, bail};
use relay_core::Environment;
use tracing::debug;

use crate::cli::EnvironmentArgs;

/// Identifier given to an environment built only from `--var` flags.
const COMMAND_LINE_ENV_ID: &str = "command-line";

/// Builds the environment selected by the CLI flags, if any.
///
/// `--var` overrides are applied on top of the selected file environment, or
/// form an environment of their own when no file is given.
pub(crate) fn resolve_environment(args: &EnvironmentArgs) -> Result<Option<Environment>> {
    let mut selected = match &args.env_file {
        Some(path) => select_environment(&load_environments(path)?, args.env_name.as_deref())?,
        None => None,
    };

    if !args.vars.is_empty() {
        let mut environment = selected.take().unwrap_or_else(|| {
            Environment::new(COMMAND_LINE_ENV_ID, "Command line")
        });
        for (key, value) in &args.vars {
            environment.variables.insert(key.clone(), value.clone());
        }
        selected = Some(environment);
    }

    if let Some(environment) = &selected {
        debug!(
            name = %environment.name,
            variables = environment.variables.len(),
            "environment selected"
        );
    }
    Ok(selected)
}

fn load_environments(path: &Path) -> Result<Vec<Environment>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read environment file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse environment file {}", path.display()))
}

fn select_environment(
    environments: &[Environment],
    name: Option<&str>,
) -> Result<Option<Environment>> {
    let Some(name) = name else {
        return Ok(environments.first().cloned());
    };

    let found = environments
        .iter()
        .find(|environment| environment.name == name)
        .or_else(|| {
            environments
                .iter()
                .find(|environment| environment.name.eq_ignore_ascii_case(name))
        });

    match found {
        Some(environment) => Ok(Some(environment.clone())),
        None => {
            let available: Vec<&str> = environments.iter().map(|env| env.name.as_str()).collect();
            bail!(
                "environment `{name}` not found (available: {})",
                if available.is_empty() {
                    "none".to_string()
                } else {
                    available.join(", ")
                }
            )
        }
    }
}
