//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use relay_core::download::DOWNLOAD_TIMEOUT_SECS;
use relay_core::{Method, REQUEST_TIMEOUT_SECS};

/// Send HTTP requests and stream downloads from the terminal.
///
/// Request templates may contain `{{variable}}` placeholders, resolved from an
/// environment file and `--var` overrides.
#[derive(Parser, Debug)]
#[command(name = "relay")]
#[command(author, version, about)]
pub struct Cli {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send one request and print the response
    Request(RequestArgs),
    /// Stream a download and report progress (Ctrl-C cancels)
    Download(DownloadArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RequestArgs {
    /// Target URL; may contain {{variable}} placeholders
    pub url: String,

    /// HTTP method (GET, POST, PUT, PATCH, DELETE)
    #[arg(short = 'X', long, default_value = "GET")]
    pub method: Method,

    /// Header line in "Key: Value" form (repeatable)
    #[arg(short = 'H', long = "header", value_name = "KEY: VALUE")]
    pub headers: Vec<String>,

    /// Request body; only sent for POST, PUT and PATCH
    #[arg(short = 'd', long = "data", value_name = "BODY")]
    pub body: Option<String>,

    /// Bearer token sent as "Authorization: Bearer <TOKEN>"
    #[arg(long)]
    pub token: Option<String>,

    /// Print response headers before the body
    #[arg(short = 'i', long)]
    pub include: bool,

    /// Request timeout in seconds (1-600)
    #[arg(long, default_value_t = REQUEST_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=600))]
    pub timeout: u64,

    #[command(flatten)]
    pub environment: EnvironmentArgs,
}

#[derive(Args, Debug, Clone)]
pub struct DownloadArgs {
    /// URL to download; may contain {{variable}} placeholders
    pub url: String,

    /// Connect and per-read timeout in seconds (1-600)
    #[arg(long, default_value_t = DOWNLOAD_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=600))]
    pub timeout: u64,

    #[command(flatten)]
    pub environment: EnvironmentArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct EnvironmentArgs {
    /// JSON file holding an array of environments ({id, name, variables})
    #[arg(long, value_name = "FILE")]
    pub env_file: Option<PathBuf>,

    /// Name of the environment to select from --env-file (default: first)
    #[arg(long = "env", value_name = "NAME", requires = "env_file")]
    pub env_name: Option<String>,

    /// Variable override in KEY=VALUE form (repeatable)
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_variable)]
    pub vars: Vec<(String, String)>,
}

fn parse_variable(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("variable name is empty in `{raw}`"));
    }
    Ok((key.to_string(), value.to_string()))
}
