/// URL extraction from arbitrary JSON (bookmark exports, tab dumps, ...)
use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::link_data::LinkCandidate;

/// Keys that may hold a link, checked in order
///
/// A key whose value is not a web URL does not hide the keys after it:
/// `{"url": "ftp://x", "href": "https://y"}` yields `https://y`. Older
/// popups stopped at the first non-empty key and found nothing there.
pub const URL_KEYS: [&str; 3] = ["url", "href", "link"];

/// Keys that may hold a link title, checked in order
pub const TITLE_KEYS: [&str; 4] = ["title", "name", "text", "label"];

/// Upper bound on nodes visited in one walk
pub const MAX_VISITED_NODES: usize = 1_000_000;

static WEB_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://").expect("valid web url pattern"));

/// True for absolute http(s) URLs, scheme matched case-insensitively
pub fn is_web_url(url: &str) -> bool {
    WEB_URL.is_match(url)
}

/// Pull every link record out of a JSON document
///
/// Walks the document depth-first in document order. Any object carrying a
/// web URL under one of `URL_KEYS` yields a candidate, and its nested
/// objects and arrays are still walked. Results are deduplicated by URL,
/// first occurrence wins.
///
/// Extraction never fails: if the walk is aborted the links collected so far
/// are returned.
pub fn extract(input: &Value) -> Vec<LinkCandidate> {
    extract_with_budget(input, MAX_VISITED_NODES)
}

fn extract_with_budget(input: &Value, budget: usize) -> Vec<LinkCandidate> {
    let mut found = Vec::new();

    if let Err(e) = walk(input, budget, &mut found) {
        log::warn!("URL extraction stopped early: {}", e);
    }

    let mut seen = HashSet::new();
    found.retain(|candidate: &LinkCandidate| seen.insert(candidate.url.clone()));
    found
}

fn walk(root: &Value, budget: usize, found: &mut Vec<LinkCandidate>) -> Result<(), String> {
    let mut stack: Vec<&Value> = vec![root];
    let mut visited = 0usize;

    while let Some(node) = stack.pop() {
        visited += 1;
        if visited > budget {
            return Err(format!("visited more than {} nodes", budget));
        }

        match node {
            Value::Array(items) => {
                stack.extend(items.iter().rev().filter(|v| is_container(v)));
            }
            Value::Object(fields) => {
                if let Some(candidate) = link_record(fields) {
                    found.push(candidate);
                }
                stack.extend(fields.values().rev().filter(|v| is_container(v)));
            }
            _ => {}
        }
    }

    Ok(())
}

fn is_container(value: &Value) -> bool {
    matches!(value, Value::Array(_) | Value::Object(_))
}

/// Read an object as a link record, if it looks like one
fn link_record(fields: &Map<String, Value>) -> Option<LinkCandidate> {
    let url = URL_KEYS
        .iter()
        .filter_map(|key| fields.get(*key).and_then(Value::as_str))
        .find(|url| is_web_url(url))?;

    let title = TITLE_KEYS
        .iter()
        .filter_map(|key| fields.get(*key).and_then(Value::as_str))
        .find(|title| !title.is_empty())
        .unwrap_or("");

    Some(LinkCandidate::new(url, title))
}
