//! Property-based tests for slack_log_sink using proptest

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use slack_log_sink::core::attrs::{flatten, sort_by_key};
use slack_log_sink::prelude::*;
use slack_log_sink::slack::Block;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

// ============================================================================
// Strategies
// ============================================================================

#[derive(Debug, Clone)]
enum Tree {
    Leaf(i64),
    Group(BTreeMap<String, Tree>),
}

fn tree_strategy() -> impl Strategy<Value = BTreeMap<String, Tree>> {
    let leaf = any::<i64>().prop_map(Tree::Leaf);
    let node = leaf.prop_recursive(4, 32, 4, |inner| {
        prop::collection::btree_map("[a-z]{1,3}", inner, 0..4).prop_map(Tree::Group)
    });
    prop::collection::btree_map("[a-z]{1,3}", node, 0..5)
}

fn to_attrs(nodes: &BTreeMap<String, Tree>) -> Vec<Attr> {
    nodes
        .iter()
        .map(|(key, node)| match node {
            Tree::Leaf(v) => Attr::int(key.clone(), *v),
            Tree::Group(children) => Attr::group(key.clone(), to_attrs(children)),
        })
        .collect()
}

fn leaf_paths(nodes: &BTreeMap<String, Tree>, prefix: &str, out: &mut Vec<(String, i64)>) {
    for (key, node) in nodes {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match node {
            Tree::Leaf(v) => out.push((path, *v)),
            Tree::Group(children) => leaf_paths(children, &path, out),
        }
    }
}

/// Flat attributes drawn from a small key space so duplicates are common
fn flat_attrs_strategy() -> impl Strategy<Value = Vec<(String, i64)>> {
    prop::collection::vec(("[a-e]", any::<i64>()), 0..20)
}

fn format(formatter: &SlackMessageFormatter, attrs: &[Attr]) -> WebhookMessage {
    let time = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    formatter
        .format_record(time, LogLevel::INFO, None, "m", attrs)
        .unwrap()
}

#[derive(Debug)]
struct User {
    username: String,
    password: String,
    cities: Vec<String>,
}

impl LogValuer for User {
    fn log_value(&self) -> Value {
        let addresses = self
            .cities
            .iter()
            .enumerate()
            .map(|(i, city)| Attr::group(format!("{:03}", i), vec![Attr::string("city", city)]))
            .collect();
        Value::group(vec![
            Attr::string("username", &self.username),
            Attr::string("password", "********"),
            Attr::group("addresses", addresses),
        ])
    }
}

impl OpaqueValue for User {
    fn as_log_valuer(&self) -> Option<&dyn LogValuer> {
        Some(self)
    }
}

// ============================================================================
// Attribute helpers
// ============================================================================

proptest! {
    /// Flattened keys are the dotted root-to-leaf paths, one per leaf
    #[test]
    fn test_flatten_paths(tree in tree_strategy()) {
        let mut expected = Vec::new();
        leaf_paths(&tree, "", &mut expected);

        let flat = flatten(&to_attrs(&tree));
        let actual: Vec<(String, i64)> = flat
            .iter()
            .map(|a| match a.value {
                Value::Int(v) => (a.key.clone(), v),
                ref other => panic!("group survived flattening: {:?}", other),
            })
            .collect();

        prop_assert_eq!(actual, expected);
    }

    /// Duplicate keys collapse to one entry holding the last value
    #[test]
    fn test_flatten_last_wins(pairs in flat_attrs_strategy()) {
        let attrs: Vec<Attr> = pairs.iter().map(|(k, v)| Attr::int(k.clone(), *v)).collect();
        let flat = flatten(&attrs);

        let mut last = HashMap::new();
        let mut first_seen = Vec::new();
        for (k, v) in &pairs {
            if last.insert(k.clone(), *v).is_none() {
                first_seen.push(k.clone());
            }
        }

        let keys: Vec<String> = flat.iter().map(|a| a.key.clone()).collect();
        prop_assert_eq!(keys, first_seen);
        for attr in &flat {
            prop_assert_eq!(&attr.value, &Value::Int(last[&attr.key]));
        }
    }

    /// Sorting the flattened sequence keeps the last value of every key
    #[test]
    fn test_sort_after_flatten_last_wins(pairs in flat_attrs_strategy()) {
        // every pair is emitted twice, plain and through an inlined group
        let attrs: Vec<Attr> = pairs
            .iter()
            .flat_map(|(k, v)| {
                vec![
                    Attr::int(k.clone(), v.wrapping_sub(1)),
                    Attr::group("", vec![Attr::int(k.clone(), *v)]),
                ]
            })
            .collect();
        let sorted = sort_by_key(&flatten(&attrs));

        let mut last = BTreeMap::new();
        for (k, v) in &pairs {
            last.insert(k.clone(), *v);
        }
        let expected: Vec<Attr> = last.into_iter().map(|(k, v)| Attr::int(k, v)).collect();
        prop_assert_eq!(sorted, expected);
    }

    /// Sorting is idempotent and keeps equal keys in input order
    #[test]
    fn test_sort_idempotent_and_stable(pairs in flat_attrs_strategy()) {
        let attrs: Vec<Attr> = pairs
            .iter()
            .enumerate()
            .map(|(i, (k, _))| Attr::uint(k.clone(), i as u64))
            .collect();

        let once = sort_by_key(&attrs);
        let twice = sort_by_key(&once);
        prop_assert_eq!(&once, &twice);

        for window in once.windows(2) {
            prop_assert!(window[0].key <= window[1].key);
            if window[0].key == window[1].key {
                match (&window[0].value, &window[1].value) {
                    (Value::Uint(a), Value::Uint(b)) => prop_assert!(a < b),
                    _ => prop_assert!(false, "unexpected value kind"),
                }
            }
        }
    }
}

// ============================================================================
// Formatter
// ============================================================================

proptest! {
    /// Five fixed blocks plus one per surviving attribute
    #[test]
    fn test_block_count(tree in tree_strategy(), include in any::<bool>(), ignore_a in any::<bool>()) {
        let mut options = FormatterOptions::default().with_include_attrs(include);
        if ignore_a {
            options = options.with_ignore_attrs(["^a"]);
        }
        let formatter = SlackMessageFormatter::new(options);

        let mut leaves = Vec::new();
        leaf_paths(&tree, "", &mut leaves);
        let surviving = leaves
            .iter()
            .filter(|(path, _)| !(ignore_a && path.starts_with('a')))
            .count();

        let message = format(&formatter, &to_attrs(&tree));
        let expected = 5 + if include { surviving } else { 0 };
        prop_assert_eq!(message.len(), expected);
    }

    /// Ignored keys never reach the output, whatever the sort setting
    #[test]
    fn test_ignored_keys_never_rendered(pairs in flat_attrs_strategy(), sort in any::<bool>()) {
        let formatter = SlackMessageFormatter::new(
            FormatterOptions::default()
                .with_sort_attrs(sort)
                .with_ignore_attrs(["^secret\\."]),
        );
        let attrs: Vec<Attr> = pairs
            .iter()
            .map(|(k, v)| Attr::group("secret", vec![Attr::int(k.clone(), *v)]))
            .chain(pairs.iter().map(|(k, v)| Attr::int(k.clone(), *v)))
            .collect();

        let message = format(&formatter, &attrs);
        for block in &message.blocks[5..] {
            let text = block.text().unwrap_or_default();
            prop_assert!(!text.starts_with("*secret."), "leaked: {}", text);
        }
    }

    /// A masked password never shows up in the rendered message
    #[test]
    fn test_password_is_masked(
        password in "pw-[a-z0-9]{6,12}",
        username in "[a-z]{3,10}",
        cities in prop::collection::vec("[A-Z][a-z]{2,8}", 0..4),
    ) {
        let user = User { username, password, cities };
        let message = format(&SlackMessageFormatter::default(), &[Attr::valuer("user", &user)]);

        let json = message.to_json().unwrap();
        prop_assert!(!json.contains(&user.password));
        prop_assert!(message
            .blocks
            .iter()
            .filter_map(Block::text)
            .any(|t| t == "*user.password*: `********`"));
    }

    /// A valuer wrapped in `Value::Any` by hand is masked the same way
    #[test]
    fn test_hand_built_valuer_is_masked(
        password in "pw-[a-z0-9]{6,12}",
        username in "[a-z]{3,10}",
        cities in prop::collection::vec("[A-Z][a-z]{2,8}", 0..4),
        sort in any::<bool>(),
    ) {
        let user = User { username, password: password.clone(), cities };
        let formatter = SlackMessageFormatter::new(FormatterOptions::default().with_sort_attrs(sort));
        let message = format(&formatter, &[Attr::new("user", Value::Any(Arc::new(user)))]);

        let json = message.to_json().unwrap();
        prop_assert!(!json.contains(&password));
        prop_assert!(message
            .blocks
            .iter()
            .filter_map(Block::text)
            .any(|t| t == "*user.password*: `********`"));
    }
}
