//! Script string-literal extraction.
//!
//! The walker does not execute or fully parse JavaScript; it only needs the
//! string literals out of a script body. The scanner here tracks quotes,
//! escapes, and comments well enough to find them, and the evaluation
//! helpers interpret a literal's escape sequences the way a JS engine
//! would, falling back to the raw text when the literal is malformed.

/// Extracts the raw string-literal tokens (quotes included) from a script
/// body, in source order.
///
/// Template literals are skipped: their interpolations make them code, not
/// content. Comments are skipped so commented-out strings do not surface.
pub fn string_literals(source: &str) -> Vec<String> {
    let mut literals = Vec::new();
    let chars: Vec<char> = source.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '/' if i + 1 < chars.len() && chars[i + 1] == '/' => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '/' if i + 1 < chars.len() && chars[i + 1] == '*' => {
                i += 2;
                while i + 1 < chars.len() && !(chars[i] == '*' && chars[i + 1] == '/') {
                    i += 1;
                }
                i = (i + 2).min(chars.len());
            }
            '\'' | '"' => {
                if let Some((literal, next)) = scan_quoted(&chars, i, c) {
                    literals.push(literal);
                    i = next;
                } else {
                    // Unterminated literal; nothing more to find.
                    break;
                }
            }
            '`' => {
                // Skip template literal content wholesale.
                i += 1;
                while i < chars.len() && chars[i] != '`' {
                    if chars[i] == '\\' {
                        i += 1;
                    }
                    i += 1;
                }
                i += 1;
            }
            _ => i += 1,
        }
    }

    literals
}

/// Scans one quoted literal starting at `start` (which holds `quote`).
/// Returns the raw lexeme including quotes and the index after it.
fn scan_quoted(chars: &[char], start: usize, quote: char) -> Option<(String, usize)> {
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            // A raw newline ends an ordinary JS string; treat as unterminated.
            '\n' => return None,
            c if c == quote => {
                let literal: String = chars[start..=i].iter().collect();
                return Some((literal, i + 1));
            }
            _ => i += 1,
        }
    }
    None
}

/// Strips one pair of matching surrounding quotes, trimming whitespace on
/// both sides of the operation.
///
/// Strict contract: the input must be non-empty after trimming. An empty
/// string is a caller bug and faults with an index panic rather than being
/// silently recovered.
pub fn strip_quotes(s: &str) -> String {
    let s = s.trim();
    let chars: Vec<char> = s.chars().collect();

    let first = chars[0];
    let last = chars[chars.len() - 1];

    let stripped: String = if (first == '\'' && last == '\'') || (first == '"' && last == '"') {
        if chars.len() == 1 {
            String::new()
        } else {
            chars[1..chars.len() - 1].iter().collect()
        }
    } else {
        s.to_string()
    };

    stripped.trim().to_string()
}

/// Best-effort escape evaluation for a script string literal.
///
/// The literal is stripped of its quotes and interpreted first under
/// double-quote semantics, then single-quote semantics. If neither reading
/// holds together, the input is returned unmodified rather than guessed at.
pub fn evaluate_escapes(s: &str) -> String {
    let stripped = strip_quotes(s);

    if let Some(out) = unescape(&stripped, '"') {
        return out;
    }
    if let Some(out) = unescape(&stripped, '\'') {
        return out;
    }

    s.to_string()
}

/// Interprets `s` as the body of a string delimited by `quote`. Returns
/// `None` when the body could not legally appear inside such a string
/// (an unescaped delimiter or a dangling backslash).
fn unescape(s: &str, quote: char) -> Option<String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c == quote {
            return None;
        }
        if c != '\\' {
            out.push(c);
            continue;
        }

        let escaped = chars.next()?;
        match escaped {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '0' => out.push('\0'),
            'b' => out.push('\u{0008}'),
            'f' => out.push('\u{000C}'),
            'v' => out.push('\u{000B}'),
            'x' => {
                let hex: String = chars.by_ref().take(2).collect();
                if hex.len() != 2 {
                    return None;
                }
                let code = u32::from_str_radix(&hex, 16).ok()?;
                out.push(char::from_u32(code)?);
            }
            'u' => {
                let hex: String = chars.by_ref().take(4).collect();
                if hex.len() != 4 {
                    return None;
                }
                let code = u32::from_str_radix(&hex, 16).ok()?;
                out.push(char::from_u32(code)?);
            }
            // Unrecognized escapes resolve to the escaped character itself.
            other => out.push(other),
        }
    }

    Some(out)
}
