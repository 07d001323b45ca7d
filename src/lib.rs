pub mod api;
pub mod cli;
pub mod clock;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod terminal;

use cli::Args;
use dashboard::Dashboard;
use log::info;
use std::error::Error;
use std::sync::Arc;
use terminal::dialog::TerminalConfirmDialog;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Dashboard Configuration ---");
    info!("API Base URL: {}", args.api_base_url);
    info!("Request Timeout: {}s", args.request_timeout_secs);
    info!("On Send Failure: {:?}", args.on_send_failure);
    info!("Clock Interval: {}s", args.clock_interval_secs);
    info!("Date Format: {}", args.date_format);
    info!("Layout: {:?}", args.layout());
    info!("-------------------------------");

    let api = api::new_client(&args.api_config())?;
    let (dialog, confirmations) = TerminalConfirmDialog::channel();
    let dashboard = Dashboard::new(api, Arc::new(dialog))
        .with_send_failure_policy(args.on_send_failure);

    let mounted = dashboard.mount(args.clock_config());
    terminal::run(mounted, confirmations, args.layout()).await
}
