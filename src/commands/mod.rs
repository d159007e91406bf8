//! CLI command handlers.

mod download;
mod environment;
mod request;

pub use download::run_download_command;
pub use request::run_request_command;
