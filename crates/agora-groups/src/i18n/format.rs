//! ICU-style message formatting.
//!
//! Supports `{name}` substitution and `{name,plural,...}` blocks with
//! `=N`, `one` and `other` selectors; `#` inside a chosen branch is the
//! number. Placeholders without a matching argument are left as written.

use std::fmt;

/// A message argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg<'a> {
    Text(&'a str),
    Number(i64),
}

impl Arg<'_> {
    fn as_number(&self) -> Option<i64> {
        match self {
            Arg::Number(n) => Some(*n),
            Arg::Text(text) => text.trim().parse().ok(),
        }
    }
}

impl fmt::Display for Arg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Text(text) => f.write_str(text),
            Arg::Number(n) => write!(f, "{n}"),
        }
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(text: &'a str) -> Self {
        Arg::Text(text)
    }
}

impl<'a> From<&'a String> for Arg<'a> {
    fn from(text: &'a String) -> Self {
        Arg::Text(text)
    }
}

impl From<i64> for Arg<'_> {
    fn from(n: i64) -> Self {
        Arg::Number(n)
    }
}

impl From<u32> for Arg<'_> {
    fn from(n: u32) -> Self {
        Arg::Number(i64::from(n))
    }
}

impl From<usize> for Arg<'_> {
    fn from(n: usize) -> Self {
        Arg::Number(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

/// Format `pattern` with `args`.
pub fn format_message(pattern: &str, args: &[(&str, Arg<'_>)]) -> String {
    let bytes = pattern.as_bytes();
    let mut out = String::with_capacity(pattern.len());
    let mut pos = 0;

    while let Some(offset) = pattern[pos..].find('{') {
        let open = pos + offset;
        out.push_str(&pattern[pos..open]);

        let Some(close) = matching_brace(bytes, open) else {
            // Unbalanced: emit the rest verbatim.
            pos = open;
            break;
        };

        let whole = &pattern[open..=close];
        match render_placeholder(&pattern[open + 1..close], args) {
            Some(rendered) => out.push_str(&rendered),
            None => out.push_str(whole),
        }
        pos = close + 1;
    }

    out.push_str(&pattern[pos..]);
    out
}

fn matching_brace(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, b) in bytes.iter().enumerate().skip(open) {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split at top-level commas into at most `max` parts.
fn split_top_level(inner: &str, max: usize) -> Vec<&str> {
    let mut parts = Vec::with_capacity(max);
    let mut depth = 0usize;
    let mut start = 0;
    for (i, b) in inner.bytes().enumerate() {
        match b {
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            b',' if depth == 0 && parts.len() + 1 < max => {
                parts.push(&inner[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&inner[start..]);
    parts
}

fn lookup<'a>(args: &[(&str, Arg<'a>)], name: &str) -> Option<Arg<'a>> {
    args.iter().find(|(key, _)| *key == name).map(|(_, arg)| *arg)
}

fn render_placeholder(inner: &str, args: &[(&str, Arg<'_>)]) -> Option<String> {
    let parts = split_top_level(inner, 3);
    let arg = lookup(args, parts[0].trim())?;

    match parts.get(1).map(|kind| kind.trim()) {
        None => Some(arg.to_string()),
        Some("plural") => {
            let n = arg.as_number()?;
            let branch = select_plural(parts.get(2)?, n)?;
            Some(format_message(&replace_hash(branch, n), args))
        }
        Some("number") => arg.as_number().map(|n| n.to_string()),
        Some(_) => Some(arg.to_string()),
    }
}

/// Parse `sel{body} sel{body} ...` pairs.
fn plural_branches(style: &str) -> Option<Vec<(&str, &str)>> {
    let bytes = style.as_bytes();
    let mut branches = Vec::new();
    let mut pos = 0;

    while pos < style.len() {
        let Some(offset) = style[pos..].find('{') else {
            if style[pos..].trim().is_empty() {
                break;
            }
            return None;
        };
        let open = pos + offset;
        let close = matching_brace(bytes, open)?;
        branches.push((style[pos..open].trim(), &style[open + 1..close]));
        pos = close + 1;
    }

    Some(branches)
}

fn select_plural(style: &str, n: i64) -> Option<&str> {
    let branches = plural_branches(style)?;
    let exact = format!("={n}");

    branches
        .iter()
        .find(|(selector, _)| *selector == exact)
        .or_else(|| {
            if n == 1 {
                branches.iter().find(|(selector, _)| *selector == "one")
            } else {
                None
            }
        })
        .or_else(|| branches.iter().find(|(selector, _)| *selector == "other"))
        .map(|(_, body)| *body)
}

/// Replace top-level `#` with the number.
fn replace_hash(branch: &str, n: i64) -> String {
    let mut out = String::with_capacity(branch.len());
    let mut depth = 0usize;
    for ch in branch.chars() {
        match ch {
            '{' => {
                depth += 1;
                out.push(ch);
            }
            '}' => {
                depth = depth.saturating_sub(1);
                out.push(ch);
            }
            '#' if depth == 0 => out.push_str(&n.to_string()),
            _ => out.push(ch),
        }
    }
    out
}
