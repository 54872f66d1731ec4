//! Predict buttons and loading banner for the telco churn console.
//!
//! [`dispatcher`] binds every predict trigger of a ready [`page`] to the
//! prediction service reached through [`transport`]; [`banner`] owns the
//! status element's show/hide cycle. [`commands`] drives both from a terminal.

pub mod banner;
pub mod commands;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod page;
pub mod transport;

pub use banner::{show_loading_message, LoadingBanner};
pub use config::UiConfig;
pub use dispatcher::{PredictDispatcher, PredictionOutcome};
pub use error::{RequestError, UiError, UiResult};
pub use page::Page;
pub use transport::{HttpBackend, PredictClient};

use crate::commands::Cli;

/// Loads configuration and runs the parsed command.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = commands::load_config(&cli)?;
    commands::run(cli, config).await
}
