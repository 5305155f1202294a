//! Helpers over ordered attribute sequences

use super::record::Record;
use super::value::{Attr, Value};
use std::collections::HashMap;

/// Separator between group names and leaf keys in flattened keys
pub const KEY_SEPARATOR: char = '.';

/// Flatten nested groups into leaf attributes keyed by their dotted path.
///
/// Groups never appear in the output and empty groups contribute nothing.
/// A hand-built `Value::Any` with a structured view is resolved first.
/// A group with an empty key is inlined into its parent. When the same
/// dotted key occurs more than once, the entry keeps the position of the
/// first occurrence and the value of the last.
pub fn flatten(attrs: &[Attr]) -> Vec<Attr> {
    let mut flat = Vec::with_capacity(attrs.len());
    let mut positions = HashMap::new();
    flatten_into(attrs, None, &mut flat, &mut positions);
    flat
}

fn flatten_into(
    attrs: &[Attr],
    prefix: Option<&str>,
    flat: &mut Vec<Attr>,
    positions: &mut HashMap<String, usize>,
) {
    for attr in attrs {
        let value = attr.value.clone().resolve();
        let key = match prefix {
            Some(prefix) if attr.key.is_empty() && value.is_group() => prefix.to_string(),
            Some(prefix) => format!("{}{}{}", prefix, KEY_SEPARATOR, attr.key),
            None => attr.key.clone(),
        };

        match value {
            Value::Group(children) => {
                let child_prefix = if key.is_empty() { None } else { Some(key.as_str()) };
                flatten_into(&children, child_prefix, flat, positions);
            }
            value => match positions.get(&key) {
                Some(&index) => flat[index].value = value,
                None => {
                    positions.insert(key.clone(), flat.len());
                    flat.push(Attr { key, value });
                }
            },
        }
    }
}

/// Stable lexicographic sort by key, applied to nested groups as well.
///
/// Sorting flattened attributes keeps the last-wins result of [`flatten`];
/// sorting before flattening can reorder duplicates.
pub fn sort_by_key(attrs: &[Attr]) -> Vec<Attr> {
    let mut sorted: Vec<Attr> = attrs
        .iter()
        .map(|attr| match &attr.value {
            Value::Group(children) => Attr::group(attr.key.clone(), sort_by_key(children)),
            _ => attr.clone(),
        })
        .collect();
    sorted.sort_by(|a, b| a.key.cmp(&b.key));
    sorted
}

/// Merge a handler's inherited attributes with a record's own attributes.
///
/// Inherited attributes were already nested under the active group when
/// they were attached, so they are emitted as-is, followed by the record's
/// attributes. No deduplication happens here; the order decides which
/// duplicate wins once the result is flattened.
pub fn consolidate(inherited: &[Attr], record: &Record) -> Vec<Attr> {
    inherited
        .iter()
        .chain(record.attrs.iter())
        .cloned()
        .collect()
}

/// Split a flattened key into its group path and leaf key
pub fn split_key(key: &str) -> (&str, &str) {
    match key.rfind(KEY_SEPARATOR) {
        Some(index) => (&key[..index], &key[index + 1..]),
        None => ("", key),
    }
}
