//! Paths into a JSON state tree.
//!
//! A path is a sequence of segments, each either an object key or an array
//! index. Mappers and rename tables are usually written with dotted strings
//! (`"user.address.city"`, `"items.0.name"`, `"items[0]['display.name']"`),
//! which [`parse_path`] turns into a [`Path`].

use crate::error::{MapperError, MapperResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single segment in a JSON path.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Seg {
    /// Object key access: `{"key": value}`
    Key(String),
    /// Array index access: `[index]`
    Index(usize),
}

impl Seg {
    /// Create a key segment.
    #[inline]
    pub fn key(k: impl Into<String>) -> Self {
        Seg::Key(k.into())
    }
}

impl fmt::Display for Seg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seg::Key(k) => write!(f, ".{}", k),
            Seg::Index(i) => write!(f, "[{}]", i),
        }
    }
}

impl From<String> for Seg {
    fn from(s: String) -> Self {
        Seg::Key(s)
    }
}

impl From<&str> for Seg {
    fn from(s: &str) -> Self {
        Seg::Key(s.to_owned())
    }
}

impl From<usize> for Seg {
    fn from(i: usize) -> Self {
        Seg::Index(i)
    }
}

/// A complete path into a JSON structure.
///
/// # Examples
///
/// ```
/// use tirea_mapper::{parse_path, Path};
///
/// let built = Path::root().key("users").index(0).key("name");
/// let parsed = parse_path("users.0.name").unwrap();
/// assert_eq!(built, parsed);
/// assert_eq!(built.to_string(), "$.users[0].name");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Path(Vec<Seg>);

impl Path {
    /// Create an empty path (root).
    #[inline]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Append a key segment and return self (builder pattern).
    #[inline]
    pub fn key(mut self, k: impl Into<String>) -> Self {
        self.0.push(Seg::Key(k.into()));
        self
    }

    /// Append an index segment and return self (builder pattern).
    #[inline]
    pub fn index(mut self, i: usize) -> Self {
        self.0.push(Seg::Index(i));
        self
    }

    /// Push a segment onto the path (mutating).
    #[inline]
    pub fn push(&mut self, seg: Seg) {
        self.0.push(seg);
    }

    /// Get the segments of this path.
    #[inline]
    pub fn segments(&self) -> &[Seg] {
        &self.0
    }

    /// Check if this path is empty (root).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of segments in this path.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Render this path in the dotted notation accepted by [`parse_path`].
    ///
    /// Keys that would not survive a dotted round trip (empty, numeric, or
    /// containing `.`, `[`, `]` or quotes) are written in double-quoted
    /// bracket form, with `"` and `\` escaped by a backslash.
    pub fn to_dotted(&self) -> String {
        let mut out = String::new();
        for seg in &self.0 {
            match seg {
                Seg::Index(i) => {
                    out.push('[');
                    out.push_str(&i.to_string());
                    out.push(']');
                }
                Seg::Key(k) if needs_brackets(k) => {
                    out.push_str("[\"");
                    for c in k.chars() {
                        if matches!(c, '"' | '\\') {
                            out.push('\\');
                        }
                        out.push(c);
                    }
                    out.push_str("\"]");
                }
                Seg::Key(k) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(k);
                }
            }
        }
        out
    }
}

fn needs_brackets(key: &str) -> bool {
    key.is_empty()
        || key.bytes().all(|b| b.is_ascii_digit())
        || key.contains(['.', '[', ']', '"', '\''])
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for seg in &self.0 {
            write!(f, "{}", seg)?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = MapperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_path(s)
    }
}

impl FromIterator<Seg> for Path {
    fn from_iter<I: IntoIterator<Item = Seg>>(iter: I) -> Self {
        Path(iter.into_iter().collect())
    }
}

impl IntoIterator for Path {
    type Item = Seg;
    type IntoIter = std::vec::IntoIter<Seg>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Seg;
    type IntoIter = std::slice::Iter<'a, Seg>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::ops::Index<usize> for Path {
    type Output = Seg;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

/// Parse a dotted path string into a [`Path`].
///
/// - `a.b.c` yields three key segments; empty segments (`a..b`) are skipped.
/// - All-digit dotted segments are indices: `items.0.name`.
/// - Only `0` and digit runs without a leading zero are indices, so `a.007`
///   names the key `"007"`. Indices above 2^53 - 2 are keys as well.
/// - Brackets hold indices or keys: `items[0]`, `a["b.c"]`, `a['b']`, `a[b]`.
///   Inside quotes a backslash escapes the next character: `a["say \"hi\""]`.
/// - The empty string is the root path.
///
/// # Examples
///
/// ```
/// use tirea_mapper::{parse_path, path};
///
/// assert_eq!(parse_path("a.b").unwrap(), path!("a", "b"));
/// assert_eq!(parse_path("list[2].value").unwrap(), path!("list", 2, "value"));
/// assert!(parse_path("list[2").is_err());
/// ```
pub fn parse_path(input: &str) -> MapperResult<Path> {
    let bytes = input.as_bytes();
    let mut path = Path::root();
    let mut pos = 0;
    let mut segment_start = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'.' => {
                push_dotted(&mut path, &input[segment_start..pos]);
                pos += 1;
                segment_start = pos;
            }
            b'[' => {
                push_dotted(&mut path, &input[segment_start..pos]);
                let (seg, next) = parse_bracket(input, pos)?;
                path.push(seg);
                pos = next;
                match bytes.get(pos) {
                    None | Some(b'[') => {}
                    Some(b'.') => pos += 1,
                    Some(_) => {
                        return Err(MapperError::invalid_path(
                            input,
                            pos,
                            "expected '.' or '[' after ']'",
                        ))
                    }
                }
                segment_start = pos;
            }
            b']' => return Err(MapperError::invalid_path(input, pos, "unmatched ']'")),
            _ => pos += 1,
        }
    }
    push_dotted(&mut path, &input[segment_start..]);

    Ok(path)
}

fn push_dotted(path: &mut Path, segment: &str) {
    if segment.is_empty() {
        return;
    }
    path.push(classify(segment));
}

/// Largest index a segment may name; anything above is an object key.
const MAX_INDEX: u64 = (1 << 53) - 2;

/// `0` or `[1-9][0-9]*` up to [`MAX_INDEX`] is an index; every other segment,
/// including `007`, is a key.
fn classify(segment: &str) -> Seg {
    let canonical = segment == "0"
        || (!segment.starts_with('0') && segment.bytes().all(|b| b.is_ascii_digit()));
    if canonical {
        let index = segment
            .parse::<u64>()
            .ok()
            .filter(|i| *i <= MAX_INDEX)
            .and_then(|i| usize::try_from(i).ok());
        if let Some(i) = index {
            return Seg::Index(i);
        }
    }
    Seg::key(segment)
}

/// Parse the bracket group opening at `open`, returning the segment and the
/// offset just past the closing `]`.
fn parse_bracket(input: &str, open: usize) -> MapperResult<(Seg, usize)> {
    let body = open + 1;
    match input.as_bytes().get(body) {
        Some(&quote @ (b'"' | b'\'')) => {
            let unterminated = || MapperError::invalid_path(input, body, "unterminated quote");
            let mut key = String::new();
            let mut chars = input[body + 1..].char_indices();
            let close = loop {
                match chars.next().ok_or_else(unterminated)? {
                    (_, '\\') => key.push(chars.next().ok_or_else(unterminated)?.1),
                    (i, c) if c == quote as char => break body + 1 + i,
                    (_, c) => key.push(c),
                }
            };
            if input.as_bytes().get(close + 1) != Some(&b']') {
                return Err(MapperError::invalid_path(
                    input,
                    close + 1,
                    "expected ']' after quoted key",
                ));
            }
            Ok((Seg::Key(key), close + 2))
        }
        _ => {
            let close = input[body..]
                .find(']')
                .map(|i| body + i)
                .ok_or_else(|| MapperError::invalid_path(input, open, "unterminated bracket"))?;
            let content = &input[body..close];
            if content.is_empty() {
                return Err(MapperError::invalid_path(input, open, "empty brackets"));
            }
            Ok((classify(content), close + 1))
        }
    }
}

/// Construct a `Path` from a sequence of segments.
///
/// # Examples
///
/// ```
/// use tirea_mapper::path;
///
/// // String literals become Key segments, numbers become Index segments
/// let p = path!("items", 0, "name");
/// assert_eq!(p.len(), 3);
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::Path::root()
    };
    ($($seg:expr),+ $(,)?) => {{
        let mut p = $crate::Path::root();
        $(
            p.push($crate::path!(@seg $seg));
        )+
        p
    }};
    (@seg $seg:expr) => {
        $crate::Seg::from($seg)
    };
}
