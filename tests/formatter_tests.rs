//! Integration tests for record formatting
//!
//! These tests verify:
//! - The default block layout and attribute rendering
//! - Structured values (valuers, error chains) after flattening
//! - Ignore patterns and renderer hooks on realistic records
//! - The JSON body sent to the webhook

use chrono::{TimeZone, Utc};
use serde_json::json;
use slack_log_sink::prelude::*;
use slack_log_sink::slack::{Block, DEFAULT_TIME_PREFIX};
use std::fmt;
use std::time::Duration;

struct Address {
    street: &'static str,
    city: &'static str,
    postal_code: &'static str,
    country: &'static str,
}

struct User {
    username: &'static str,
    password: &'static str,
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
                        Attr::string("street", addr.street),
                        Attr::string("city", addr.city),
                        Attr::string("postal_code", addr.postal_code),
                        Attr::string("country", addr.country),
                    ],
                )
            })
            .collect();

        Value::group(vec![
            Attr::string("username", self.username),
            Attr::string("password", "********"),
            Attr::group("addresses", addresses),
        ])
    }
}

#[derive(Debug)]
struct QueryError {
    source: std::io::Error,
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "query failed")
    }
}

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

fn admin() -> User {
    User {
        username: "admin",
        password: "admin123",
        addresses: vec![
            Address {
                street: "1234 Acme Way",
                city: "New York",
                postal_code: "12345",
                country: "United States",
            },
            Address {
                street: "1 Main St",
                city: "Boston",
                postal_code: "02108",
                country: "United States",
            },
        ],
    }
}

fn attr_texts(message: &WebhookMessage) -> Vec<String> {
    message.blocks[5..].iter().filter_map(Block::text).collect()
}

fn format(formatter: &SlackMessageFormatter, attrs: &[Attr]) -> WebhookMessage {
    let time = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    formatter
        .format_record(time, LogLevel::INFO, None, "hello", attrs)
        .expect("formatting succeeds")
}

#[test]
fn test_duration_scenario() {
    let message = format(
        &SlackMessageFormatter::default(),
        &[Attr::duration("took", Duration::from_secs(5))],
    );

    assert_eq!(message.blocks[4].text().as_deref(), Some("hello"));
    assert_eq!(attr_texts(&message), vec!["*took*: `5s`"]);
}

#[test]
fn test_block_count_matches_surviving_attrs() {
    let formatter = SlackMessageFormatter::new(
        FormatterOptions::default().with_ignore_attrs(["^internal\\."]),
    );
    let attrs = vec![
        Attr::string("a", "1"),
        Attr::group(
            "internal",
            vec![Attr::int("x", 1), Attr::int("y", 2)],
        ),
        Attr::group("empty", Vec::new()),
        Attr::bool("b", false),
    ];

    let message = format(&formatter, &attrs);
    assert_eq!(message.len(), 5 + 2);
}

#[test]
fn test_valuer_is_flattened_and_masked() {
    let message = format(
        &SlackMessageFormatter::default(),
        &[Attr::valuer("admin", &admin())],
    );
    let texts = attr_texts(&message);

    assert!(texts.contains(&"*admin.password*: `********`".to_string()));
    assert!(texts.contains(&"*admin.addresses.000.city*: `New York`".to_string()));
    assert!(texts.contains(&"*admin.addresses.001.postal_code*: `02108`".to_string()));
    assert!(texts.iter().all(|t| !t.contains("admin123")));
    assert_eq!(texts.len(), 2 + 2 * 4);
}

#[test]
fn test_error_chain_rendering() {
    let err = QueryError {
        source: std::io::Error::new(std::io::ErrorKind::TimedOut, "socket timed out"),
    };
    let message = format(&SlackMessageFormatter::default(), &[Attr::error("error", &err)]);

    assert_eq!(
        attr_texts(&message),
        vec![
            "*error.causes.000*: `socket timed out`",
            "*error.message*: `query failed`",
        ]
    );
}

#[test]
fn test_unsorted_keeps_emission_order() {
    let formatter = SlackMessageFormatter::new(FormatterOptions::default().with_sort_attrs(false));
    let message = format(
        &formatter,
        &[Attr::string("zeta", "1"), Attr::string("alpha", "2")],
    );
    assert_eq!(attr_texts(&message), vec!["*zeta*: `1`", "*alpha*: `2`"]);
}

#[test]
fn test_generic_renderer_sees_group_and_leaf() {
    let formatter = SlackMessageFormatter::new(FormatterOptions::default().with_attr_renderer(
        |_ctx, group, key, value| {
            let key = if group.is_empty() {
                key.to_string()
            } else {
                format!("{} ({})", key, group)
            };
            Ok((key, value))
        },
    ));
    let message = format(
        &formatter,
        &[Attr::group("req", vec![Attr::group("hdr", vec![Attr::string("host", "x")])])],
    );
    assert_eq!(attr_texts(&message), vec!["*host (req.hdr)*: `x`"]);
}

#[test]
fn test_prefixes_and_custom_time() {
    let formatter = SlackMessageFormatter::new(
        FormatterOptions::default()
            .with_time_prefix("At ")
            .with_include_source(true)
            .with_source_prefix("From ")
            .with_time_renderer(|_ctx, time| Ok(time.format("%Y-%m-%d").to_string()))
            .with_source_renderer(|_ctx, site| {
                Ok(site.map_or_else(|| "nowhere".to_string(), |s| s.file.clone()))
            }),
    );
    let message = format(&formatter, &[]);
    assert_eq!(
        message.blocks[2].text().as_deref(),
        Some("At 2024-06-01\nFrom nowhere")
    );
}

#[test]
fn test_default_time_line() {
    let message = format(&SlackMessageFormatter::default(), &[]);
    let line = message.blocks[2].text().unwrap();
    assert!(line.starts_with(DEFAULT_TIME_PREFIX));
    assert!(!line.contains('\n'));
}

#[test]
fn test_webhook_json_body() {
    let formatter = SlackMessageFormatter::new(
        FormatterOptions::default()
            .with_application_name("slogx")
            .with_timestamp_format(TimestampFormat::Rfc3339),
    );
    let message = format(&formatter, &[Attr::int("attr2", 100)]);

    assert_eq!(
        serde_json::to_value(&message).unwrap(),
        json!({
            "blocks": [
                {"type": "divider"},
                {"type": "context", "elements": [
                    {"type": "mrkdwn", "text": "slogx"},
                    {"type": "mrkdwn", "text": ":information_source: info"}
                ]},
                {"type": "context", "elements": [
                    {"type": "mrkdwn", "text": "Occurred at:\t2024-06-01T12:00:00Z"}
                ]},
                {"type": "divider"},
                {"type": "section", "text": {"type": "mrkdwn", "text": "hello"}},
                {"type": "context", "elements": [
                    {"type": "mrkdwn", "text": "*attr2*: `100`"}
                ]}
            ]
        })
    );
}
