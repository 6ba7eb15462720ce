/// Normalize text before it is embedded.
///
/// Every run of non-ASCII characters collapses to a single space, then
/// surrounding whitespace is trimmed. Never fails.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;

    for c in text.chars() {
        if c.is_ascii() {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push(' ');
            in_run = true;
        }
    }

    out.trim().to_string()
}
