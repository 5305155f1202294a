//! Webhook logging example
//!
//! Posts a handful of records to the Slack incoming webhook named by the
//! `SLACK_WEBHOOK_URL` environment variable, using background delivery.
//!
//! Run with: SLACK_WEBHOOK_URL=https://hooks.slack.com/... cargo run --example webhook_logging

use slack_log_sink::prelude::*;
use slack_log_sink::{attrs, info};
use std::time::Duration;

struct Address {
    street: String,
    city: String,
    postal_code: String,
    country: String,
}

struct User {
    username: String,
    #[allow(dead_code)]
    password: String,
    addresses: Vec<Address>,
}

impl LogValuer for User {
    fn log_value(&self) -> Value {
        let addresses = self
            .addresses
            .iter()
            .enumerate()
            .map(|(i, addr)| {
                Attr::group(
                    format!("{:03}", i),
                    vec![
                        Attr::string("street", &addr.street),
                        Attr::string("city", &addr.city),
                        Attr::string("postal_code", &addr.postal_code),
                        Attr::string("country", &addr.country),
                    ],
                )
            })
            .collect();

        Value::group(vec![
            Attr::string("username", &self.username),
            Attr::string("password", "********"),
            Attr::group("addresses", addresses),
        ])
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Slack Log Sink - Webhook Logging Example ===\n");

    let webhook_url = match std::env::var("SLACK_WEBHOOK_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Set SLACK_WEBHOOK_URL to an incoming webhook URL to run this example");
            return Ok(());
        }
    };

    let formatter = SlackMessageFormatter::new(
        FormatterOptions::default()
            .with_application_name("slack_log_sink")
            .with_include_source(true)
            .with_ignore_attrs(["^internal\\."]),
    );
    let handler = SlackHandler::builder()
        .webhook_url(webhook_url)
        .level(LogLevel::TRACE)
        .formatter(formatter)
        .async_dispatch(true)
        .build()?;
    let metrics_view = handler.clone();
    let logger = Logger::new(handler);

    println!("1. One message per level:");
    logger.trace("this is a trace message", Vec::new()).await?;
    logger.debug("this is a debug message", Vec::new()).await?;
    info!(logger, "this is an info message").await?;
    logger.notice("this is a notice message", Vec::new()).await?;
    logger.warn("this is a warning message", Vec::new()).await?;

    println!("2. Derived loggers with groups:");
    let scoped = logger
        .with(attrs!["root_key" => "1"])
        .with_group("group1")
        .with(attrs!["k1" => "v1"])
        .with_group("nested")
        .with(attrs!["logger_name" => "frodo"]);
    scoped.error("this is an error message", Vec::new()).await?;

    println!("3. Structured attributes:");
    let admin = User {
        username: "admin".to_string(),
        password: "admin123".to_string(),
        addresses: vec![Address {
            street: "1234 Acme Way".to_string(),
            city: "New York".to_string(),
            postal_code: "12345".to_string(),
            country: "United States".to_string(),
        }],
    };
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "config file missing");
    scoped
        .info(
            "this is an info message with attributes",
            vec![
                Attr::float("ratio", 0.75),
                Attr::duration("took", Duration::from_secs(5)),
                Attr::time("now", chrono::Utc::now()),
                Attr::valuer("admin", &admin),
                Attr::error("error", &io_error),
                Attr::string("internal.trace_id", "hidden by the ignore pattern"),
            ],
        )
        .await?;

    println!("\nWaiting for background deliveries...");
    logger.shutdown(false).await?;

    let metrics = metrics_view.metrics();
    println!(
        "Delivered {}/{} messages ({:.1}% failed)",
        metrics.delivered(),
        metrics.dispatched(),
        metrics.failure_rate()
    );
    Ok(())
}
