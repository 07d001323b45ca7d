use clap::Parser;
use std::time::Duration;
use crate::api::ApiConfig;
use crate::clock::{ ClockConfig, DEFAULT_DATE_FORMAT };
use crate::dashboard::state::SendFailurePolicy;
use crate::terminal::render::Layout;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Conversation API Args ---
    /// Base URL of the conversation API (e.g., http://127.0.0.1:8000/api)
    #[arg(long, env = "DASHBOARD_API_URL", default_value = "http://127.0.0.1:8000/api")]
    pub api_base_url: String,

    /// Per-request timeout in seconds for conversation API calls.
    #[arg(long, env = "DASHBOARD_REQUEST_TIMEOUT", default_value = "30", value_parser = clap::value_parser!(u64).range(1..))]
    pub request_timeout_secs: u64,

    // --- Composer Args ---
    /// What to do with a user message whose send request failed (keep, mark, rollback)
    #[arg(long, env = "DASHBOARD_ON_SEND_FAILURE", default_value = "keep")]
    pub on_send_failure: SendFailurePolicy,

    // --- Display Args ---
    /// Seconds between clock refreshes in the header.
    #[arg(long, env = "DASHBOARD_CLOCK_INTERVAL", default_value = "60", value_parser = clap::value_parser!(u64).range(1..))]
    pub clock_interval_secs: u64,

    /// chrono strftime pattern for the header clock.
    #[arg(long, env = "DASHBOARD_DATE_FORMAT", default_value = DEFAULT_DATE_FORMAT)]
    pub date_format: String,

    /// Show either the conversation list or the open conversation, toggled with /menu.
    #[arg(long, env = "DASHBOARD_COMPACT", default_value = "false")]
    pub compact: bool,

    // --- General App Args ---
    /// Enable debug logging/output
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,
}

impl Args {
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.api_base_url.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub fn clock_config(&self) -> ClockConfig {
        ClockConfig {
            interval: Duration::from_secs(self.clock_interval_secs),
            format: self.date_format.clone(),
        }
    }

    pub fn layout(&self) -> Layout {
        if self.compact { Layout::Compact } else { Layout::Wide }
    }
}
