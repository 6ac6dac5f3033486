//! Common helpers shared by the line-oriented manifest scanners.

/// Truncates a string to a maximum character count with ellipsis.
///
/// Counts characters, not bytes, so multi-byte input is never split. The
/// ellipsis counts toward `max_chars`.
pub fn truncate_string(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_chars {
        return s.to_string();
    }

    let keep_chars = max_chars.saturating_sub(3);
    let truncated: String = s.chars().take(keep_chars).collect();
    format!("{truncated}...")
}

/// Cut `line` at the first `marker` that sits outside a quoted string.
///
/// Quotes are `'` and `"`; a backslash escapes the next character inside a quote.
pub fn strip_inline_comment<'a>(line: &'a str, marker: &str) -> &'a str {
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (idx, ch) in line.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == q {
                quote = None;
            }
            continue;
        }

        if ch == '"' || ch == '\'' {
            quote = Some(ch);
        } else if line[idx..].starts_with(marker) {
            return line[..idx].trim_end();
        }
    }

    line
}

/// Remove one pair of matching surrounding quotes, if present.
pub fn unquote(s: &str) -> &str {
    let s = s.trim();
    for q in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(q) && s.ends_with(q) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Contents of every complete single- or double-quoted string in `line`, in order.
pub fn quoted_strings(line: &str) -> Vec<&str> {
    let mut found = Vec::new();
    let mut open: Option<(char, usize)> = None;

    for (idx, ch) in line.char_indices() {
        match open {
            Some((q, start)) if ch == q => {
                found.push(&line[start..idx]);
                open = None;
            }
            Some(_) => {}
            None if ch == '"' || ch == '\'' => open = Some((ch, idx + ch.len_utf8())),
            None => {}
        }
    }

    found
}

/// Net count of opening minus closing brackets outside quoted strings.
///
/// A `[` directly after `/` opens a version range (`poco/[>1.0 <1.9]`), not a
/// list, so it and its matching `]` are not counted.
pub fn bracket_balance(line: &str) -> i32 {
    let mut balance = 0;
    let mut quote: Option<char> = None;
    let mut range_depth = 0;
    let mut prev: Option<char> = None;

    for ch in line.chars() {
        if let Some(q) = quote {
            if ch == q {
                quote = None;
            }
        } else {
            match ch {
                '"' | '\'' => quote = Some(ch),
                '[' if prev == Some('/') => range_depth += 1,
                ']' if range_depth > 0 => range_depth -= 1,
                '(' | '[' | '{' => balance += 1,
                ')' | ']' | '}' => balance -= 1,
                _ => {}
            }
        }
        prev = Some(ch);
    }

    balance
}
