//! `rollcall` -- daily roll call from the terminal.
//!
//! Loads one class roster for one date from the school backend, applies a
//! single command to it, waits for the resulting saves, then prints the
//! notifications and the roster.
//!
//! # Environment variables
//!
//! | Variable                        | Required | Default                     | Description                |
//! |---------------------------------|----------|-----------------------------|----------------------------|
//! | `ROLLCALL_API_URL`              | no       | `http://127.0.0.1:8000/api` | Backend API root           |
//! | `ROLLCALL_ACCESS_TOKEN`         | no       | --                          | Bearer token               |
//! | `ROLLCALL_REQUEST_TIMEOUT_SECS` | no       | `30`                        | Per-request timeout        |

use std::sync::Arc;

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rollcall_cli::cli::{self, Cli, Command};
use rollcall_cli::render;
use rollcall_client::{AttendanceApi, ClientConfig};
use rollcall_events::EventBus;
use rollcall_view::AttendanceView;

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "rollcall=info,rollcall_cli=info,rollcall_view=info,rollcall_client=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Cli::parse();
    let config = ClientConfig::from_env().context("invalid client configuration")?;
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());

    tracing::info!(
        api_url = %config.api_url,
        grade = %args.grade,
        date = %date,
        authenticated = config.access_token.is_some(),
        "Starting rollcall",
    );

    let api = AttendanceApi::new(config.clone()).context("failed to build HTTP client")?;
    let bus = Arc::new(EventBus::default());
    let mut notifications = bus.subscribe();
    let view = AttendanceView::new(Arc::new(api), bus);

    let result = cli::execute(&view, args.grade, date, &args.command).await;
    view.wait_idle().await;

    while let Ok(notification) = notifications.try_recv() {
        eprintln!("{}", render::notification_line(&notification));
    }

    let photos = matches!(args.command, Command::Show { photos: true });
    print!(
        "{}",
        render::roster_table(&view.snapshot().await, photos.then_some(&config))
    );

    result.context("roll call failed")
}
