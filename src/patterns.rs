//! Loading and matching of ignore patterns.
//!
//! Patterns come from a `.gitignore` in the scan root but are matched with
//! plain shell-glob rules: a path is ignored when its root-relative form or
//! its bare file name matches any pattern. There is no negation, no
//! directory anchoring and no precedence between patterns.

use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobMatcher};
use log::debug;
use std::path::Path;

/// Name of the ignore file looked up in the scan root.
pub const IGNORE_FILE_NAME: &str = ".gitignore";

/// Reads the ignore file in `directory` and returns its pattern lines in order.
///
/// A missing file yields no patterns. Lines are trimmed; blank lines and
/// `#` comments are dropped. Patterns are not validated here.
pub fn load_ignore_patterns(directory: &Path) -> Result<Vec<String>> {
    let path = directory.join(IGNORE_FILE_NAME);
    if !path.is_file() {
        debug!("No ignore file at {}", path.display());
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read ignore file: {}", path.display()))?;

    Ok(parse_ignore_patterns(&content))
}

/// Extracts pattern lines from ignore file content.
fn parse_ignore_patterns(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_owned)
        .collect()
}

/// Rewrites a shell glob into globset syntax with the same meaning.
///
/// Shell globs know only `*`, `?` and `[...]`. Runs of `*` collapse so
/// globset never sees a recursive `**`; braces and backslashes become
/// one-character classes so they stay literal; an unterminated `[` is a
/// literal bracket.
fn to_globset_syntax(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len() + 8);
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' => {
                if !out.ends_with('*') {
                    out.push('*');
                }
                i += 1;
            }
            '{' => {
                out.push_str("[{]");
                i += 1;
            }
            '}' => {
                out.push_str("[}]");
                i += 1;
            }
            '\\' => {
                out.push_str("[\\]");
                i += 1;
            }
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    let members: String = chars[i + 1..end].iter().collect();
                    push_class(&mut out, &members);
                    i = end + 1;
                }
                None => {
                    out.push_str("[[]");
                    i += 1;
                }
            },
            c => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}

/// Index of the `]` closing the class opened at `start`, if any.
///
/// A `]` directly after `[` or `[!` is a member, not the terminator.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start + 1;
    if chars.get(j) == Some(&'!') {
        j += 1;
    }
    if chars.get(j) == Some(&']') {
        j += 1;
    }
    while j < chars.len() && chars[j] != ']' {
        j += 1;
    }
    (j < chars.len()).then_some(j)
}

fn push_class(out: &mut String, members: &str) {
    if let Some(rest) = members.strip_prefix('!') {
        out.push_str("[!");
        out.push_str(rest);
        out.push(']');
        return;
    }

    // A leading `^` is a member in shell globs but negates in globset.
    match members.strip_prefix('^') {
        Some("") => out.push('^'),
        Some("-") => out.push_str("[-^]"),
        Some(rest) => match rest.strip_suffix('-') {
            Some(head) => {
                out.push('[');
                out.push_str(head);
                out.push_str("^-]");
            }
            None => {
                out.push('[');
                out.push_str(rest);
                out.push_str("^]");
            }
        },
        None => {
            out.push('[');
            out.push_str(members);
            out.push(']');
        }
    }
}

enum Pattern {
    Glob(GlobMatcher),
    /// Patterns globset still rejects (e.g. reversed ranges) are compared verbatim.
    Literal(String),
}

impl Pattern {
    fn compile(raw: &str) -> Self {
        let glob = GlobBuilder::new(&to_globset_syntax(raw))
            .literal_separator(false)
            .backslash_escape(false)
            .build();

        match glob {
            Ok(glob) => Pattern::Glob(glob.compile_matcher()),
            Err(err) => {
                debug!("Matching '{raw}' literally: {err}");
                Pattern::Literal(raw.to_owned())
            }
        }
    }

    fn matches(&self, candidate: &str) -> bool {
        match self {
            Pattern::Glob(matcher) => matcher.is_match(candidate),
            Pattern::Literal(raw) => raw == candidate,
        }
    }
}

/// Compiled set of ignore patterns.
#[derive(Default)]
pub struct IgnoreMatcher {
    patterns: Vec<Pattern>,
}

impl IgnoreMatcher {
    pub fn new(patterns: &[String]) -> Self {
        Self {
            patterns: patterns.iter().map(|p| Pattern::compile(p)).collect(),
        }
    }

    /// True when `rel_path` or its file name matches any pattern.
    pub fn is_ignored(&self, rel_path: &Path) -> bool {
        if self.patterns.is_empty() {
            return false;
        }

        let full = rel_path.to_string_lossy();
        let name = rel_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        self.patterns
            .iter()
            .any(|p| p.matches(&full) || p.matches(&name))
    }
}
