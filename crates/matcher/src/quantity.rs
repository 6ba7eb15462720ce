use regex::Regex;
use std::sync::OnceLock;

/// Trailing `<integer>[ monthly|annually]` at the end of a line
fn quantity_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(\d+)\s*(annually|monthly)?$").expect("quantity pattern is valid")
    })
}

/// Split a trailing quantity off an RFQ line
///
/// Returns the remaining description and the monthly quantity. Annual
/// quantities are divided by 12 with integer division, so anything under
/// 12 a year becomes 0. Without a trailing number the quantity is 1 and
/// the trimmed line is returned unchanged.
pub fn extract_quantity(line: &str) -> (String, u64) {
    let line = line.trim();

    let Some(caps) = quantity_pattern().captures(line) else {
        return (line.to_string(), 1);
    };

    // Group 1 always participates when the pattern matches
    let number = &caps[1];
    let Ok(mut quantity) = number.parse::<u64>() else {
        return (line.to_string(), 1);
    };

    if caps.get(2).map(|m| m.as_str()) == Some("annually") {
        quantity /= 12;
    }

    let start = caps.get(0).map_or(line.len(), |m| m.start());
    (line[..start].trim().to_string(), quantity)
}
