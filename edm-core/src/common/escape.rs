//! Escaping and line-prefix helpers shared by the Markdown and HTML behaviors
//!
//! Markdown escaping happens in two places. Text nodes escape the characters
//! that could open inline syntax wherever they appear. Block emitters then
//! escape line starts, since whether `-` or `1.` opens a list depends on the
//! column it ends up in, which a text node cannot know.

/// Characters that may start inline syntax anywhere in a line.
const INLINE_SPECIAL: &[char] = &['\\', '`', '*', '_', '[', ']', '<', '&', '~', '|', '#'];

/// Characters that open a block construct at the start of a line.
const LINE_START_SPECIAL: &[char] = &['-', '+', '=', '>'];

/// Backslash-escapes inline Markdown syntax in literal text.
pub fn escape_markdown_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if INLINE_SPECIAL.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escapes list, quote and setext markers at the start of every line.
pub fn escape_line_starts(text: &str) -> String {
    text.split('\n')
        .map(escape_line_start)
        .collect::<Vec<_>>()
        .join("\n")
}

fn escape_line_start(line: &str) -> String {
    let body = line.trim_start_matches(' ');
    let indent = &line[..line.len() - body.len()];

    if body.starts_with(LINE_START_SPECIAL) {
        return format!("{indent}\\{body}");
    }

    let digits = body.chars().take_while(char::is_ascii_digit).count();
    if (1..=9).contains(&digits) && body[digits..].starts_with(['.', ')']) {
        return format!("{indent}{}\\{}", &body[..digits], &body[digits..]);
    }

    line.to_string()
}

/// Escapes text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Prefixes the first line with `first` and every later line with `rest`.
/// Empty later lines get `blank` instead, so indentation never leaves
/// trailing whitespace.
pub fn prefix_lines(text: &str, first: &str, rest: &str, blank: &str) -> String {
    let mut out = String::with_capacity(text.len() + first.len());
    for (i, line) in text.split('\n').enumerate() {
        if i == 0 {
            out.push_str(first);
        } else {
            out.push('\n');
            out.push_str(if line.is_empty() { blank } else { rest });
        }
        out.push_str(line);
    }
    out
}

/// Length of the longest run of `c` in `text`.
pub fn longest_run(text: &str, c: char) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for ch in text.chars() {
        if ch == c {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}
