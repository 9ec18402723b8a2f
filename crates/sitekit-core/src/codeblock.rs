//! Code-block dedent for display and copy.
//!
//! Code pasted into HTML templates inherits the template's indentation.
//! [`dedent`] removes it so the rendered block and the copy button's
//! clipboard text start at column zero.

/// Remove the indentation shared by every non-blank line.
///
/// - Leading and trailing blank lines are dropped.
/// - The common prefix is taken literally (tabs and spaces are not
///   expanded), so mixed indentation only loses what every line shares.
/// - Trailing whitespace is trimmed from each line.
/// - Blank lines inside the block become empty lines.
pub fn dedent(code: &str) -> String {
    let lines: Vec<&str> = code.lines().map(str::trim_end).collect();

    let first = match lines.iter().position(|l| !l.is_empty()) {
        Some(i) => i,
        None => return String::new(),
    };
    let last = lines.iter().rposition(|l| !l.is_empty()).unwrap_or(first);
    let body = &lines[first..=last];

    let prefix = body
        .iter()
        .copied()
        .filter(|l| !l.is_empty())
        .map(leading_whitespace)
        .reduce(common_prefix)
        .unwrap_or("");

    body.iter()
        .map(|&l| l.strip_prefix(prefix).unwrap_or(l))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Text placed on the clipboard by a block's copy button.
pub fn copy_text(code: &str) -> String {
    let mut text = dedent(code);
    if !text.is_empty() {
        text.push('\n');
    }
    text
}

fn leading_whitespace(line: &str) -> &str {
    let end = line
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map(|(i, _)| i)
        .unwrap_or(line.len());
    &line[..end]
}

fn common_prefix<'a>(a: &'a str, b: &'a str) -> &'a str {
    let end = a
        .char_indices()
        .zip(b.chars())
        .find(|((_, ca), cb)| ca != cb)
        .map(|((i, _), _)| i)
        .unwrap_or_else(|| a.len().min(b.len()));
    &a[..end]
}
