use regex::Regex;
use scribe_types::DisplayBlock;
use std::sync::OnceLock;

use crate::items::HistoryItem;

/// Shown when a payload has no recoverable content at all.
pub const UNPARSED_PLACEHOLDER: &str = "Unable to parse transcript content";

fn thinking_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)<thinking>(.*?)</thinking>").expect("static thinking pattern")
    })
}

fn tool_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\[Tool: (?P<name>[\w./-]+)\]\s*(?P<result>.*)$")
            .expect("static tool line pattern")
    })
}

/// Recover display blocks from a serialized historical payload.
///
/// The backend does not guarantee the shape of stored content, so parsing
/// degrades through three stages and never drops content:
/// 1. strict decode of the tagged `HistoryItem` schema (list or single item)
/// 2. regex extraction of the known literal patterns the renderer emits
///    (`<thinking>...</thinking>` sections, `[Tool: name] result` lines)
/// 3. the raw payload as one best-effort text block, or a placeholder when
///    the payload is blank
///
/// Blocks are stamped `base_timestamp + index` so list keys stay stable.
pub fn parse_history_payload(raw: &str, base_timestamp: i64) -> Vec<DisplayBlock> {
    if let Some(blocks) = parse_strict(raw, base_timestamp) {
        return blocks;
    }

    tracing::warn!("strict transcript decode failed, trying pattern extraction");

    if let Some(blocks) = extract_patterns(raw, base_timestamp) {
        return blocks;
    }

    let text = raw.trim();
    let text = if text.is_empty() {
        UNPARSED_PLACEHOLDER.to_string()
    } else {
        text.to_string()
    };
    vec![DisplayBlock::text(text, base_timestamp)]
}

fn parse_strict(raw: &str, base_timestamp: i64) -> Option<Vec<DisplayBlock>> {
    if let Ok(items) = serde_json::from_str::<Vec<HistoryItem>>(raw) {
        return Some(items_to_blocks(items, base_timestamp));
    }
    if let Ok(item) = serde_json::from_str::<HistoryItem>(raw) {
        return Some(items_to_blocks(vec![item], base_timestamp));
    }
    None
}

fn items_to_blocks(items: Vec<HistoryItem>, base_timestamp: i64) -> Vec<DisplayBlock> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| item.into_block(base_timestamp + i as i64))
        .collect()
}

/// Tolerant extraction of the literal patterns older payloads contain.
/// Returns None when nothing matched so the caller can fall through.
fn extract_patterns(raw: &str, base_timestamp: i64) -> Option<Vec<DisplayBlock>> {
    let mut blocks = Vec::new();
    let mut remainder = raw.to_string();

    for capture in thinking_re().captures_iter(raw) {
        let thinking = capture[1].trim().to_string();
        if !thinking.is_empty() {
            blocks.push(DisplayBlock::Thinking {
                thinking,
                signature: None,
                timestamp: base_timestamp + blocks.len() as i64,
            });
        }
        remainder = remainder.replace(&capture[0], "");
    }

    for capture in tool_line_re().captures_iter(raw) {
        blocks.push(DisplayBlock::Tool {
            tool_id: format!("history_{}", blocks.len()),
            tool_name: capture["name"].to_string(),
            input: serde_json::Value::Null,
            result: capture["result"].trim().to_string(),
            is_error: false,
            timestamp: base_timestamp + blocks.len() as i64,
        });
        remainder = remainder.replace(&capture[0], "");
    }

    if blocks.is_empty() {
        return None;
    }

    // Whatever the patterns did not claim is still content
    let leftover = remainder.trim();
    if !leftover.is_empty() {
        blocks.push(DisplayBlock::text(
            leftover,
            base_timestamp + blocks.len() as i64,
        ));
    }

    Some(blocks)
}
