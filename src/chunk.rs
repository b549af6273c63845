// src/chunk.rs
// Splits arbitrary-length report text into platform-safe message parts.
// Pure; lengths are counted in chars so multi-byte text stays within the
// platform limit and hard splits never land inside a code point.

/// Split `text` into parts of at most `max_len` chars.
///
/// Whole lines are greedily packed into the current part; a single line
/// longer than `max_len` is hard-split at fixed boundaries (mid-word splits
/// are an accepted trade-off). Empty input yields an empty vector.
pub fn split_message(text: &str, max_len: usize) -> Vec<String> {
    assert!(max_len > 0, "max_len must be positive");

    if text.is_empty() {
        return Vec::new();
    }
    if text.chars().count() <= max_len {
        return vec![text.to_string()];
    }

    let mut parts: Vec<String> = Vec::new();
    let mut cur = String::new();
    let mut cur_chars = 0usize;

    for line in text.split('\n') {
        let line_chars = line.chars().count();
        // +1 for the newline that would join `line` onto `cur`.
        let candidate_chars = if cur.is_empty() {
            line_chars
        } else {
            cur_chars + 1 + line_chars
        };

        if candidate_chars > max_len {
            if !cur.is_empty() {
                parts.push(std::mem::take(&mut cur));
                cur_chars = 0;
            }
            if line_chars > max_len {
                hard_split_into(line, max_len, &mut parts);
            } else {
                cur.push_str(line);
                cur_chars = line_chars;
            }
        } else {
            if !cur.is_empty() {
                cur.push('\n');
            }
            cur.push_str(line);
            cur_chars = candidate_chars;
        }
    }
    if !cur.is_empty() {
        parts.push(cur);
    }
    parts
}

fn hard_split_into(line: &str, max_len: usize, parts: &mut Vec<String>) {
    let mut piece = String::new();
    let mut n = 0usize;
    for ch in line.chars() {
        piece.push(ch);
        n += 1;
        if n == max_len {
            parts.push(std::mem::take(&mut piece));
            n = 0;
        }
    }
    if !piece.is_empty() {
        parts.push(piece);
    }
}
