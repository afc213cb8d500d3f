//! Pattern parsing and resolution.
//!
//! Parsing scans the pattern left to right while tracking brace-nesting
//! depth with a counter rather than a regular expression: a literal-escape
//! body (`{{text}}`) contains brace pairs of its own, which a single regex
//! cannot match reliably. A transition from depth 0 to 1 opens a candidate
//! placeholder span; the return to depth 0 closes it and hands the body to
//! the body parser.

use std::fmt;
use thiserror::Error;

/// Error type for malformed patterns.
///
/// All variants carry the byte offset of the offending brace or body so the
/// driver can point at the exact spot in the command word.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// A `{` was opened but its placeholder never returned to depth zero.
    #[error("unterminated pattern: '{{' at byte {position} is never closed")]
    Unterminated {
        /// Byte offset of the opening `{`.
        position: usize,
    },

    /// A `}` appeared with no placeholder open.
    #[error("unbalanced '}}' at byte {position}")]
    UnbalancedClose {
        /// Byte offset of the stray `}`.
        position: usize,
    },

    /// A placeholder body matched none of the recognized forms.
    #[error("unrecognized placeholder '{{{body}}}' at byte {position}")]
    UnrecognizedPlaceholder {
        /// The body text between the outermost braces.
        body: String,
        /// Byte offset of the opening `{`.
        position: usize,
    },
}

/// One parsed piece of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Verbatim text between placeholders.
    Literal(String),
    /// `{}` - insert the full replacement value.
    Whole,
    /// `{{text}}` - insert the literal text `{text}`.
    LiteralEscape(String),
    /// `{:n}` / `{:n:m}` - characters `[start, end)` of the value.
    CharRange {
        start: i64,
        /// `None` selects the single character at `start`.
        end: Option<i64>,
    },
    /// `{d:n}` / `{d:n:m}` - components `[start, end)` of the value split
    /// by `delimiter`, joined with no separator.
    ComponentRange {
        delimiter: String,
        start: i64,
        end: Option<i64>,
    },
}

/// A parsed command pattern.
///
/// Parse once with [`Template::parse`], then call [`Template::resolve`] for
/// each replacement value. A `Template` never mutates after parsing, and
/// parsing the same input twice yields the same segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parse a pattern into its segments.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] when braces are unbalanced or a
    /// placeholder body matches none of the recognized forms. A pattern
    /// that parses here is guaranteed to resolve against any value.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut body = String::new();
        let mut depth = 0usize;
        let mut span_start = 0usize;

        for (pos, ch) in pattern.char_indices() {
            match ch {
                '{' => {
                    if depth == 0 {
                        span_start = pos;
                        if !literal.is_empty() {
                            segments.push(Segment::Literal(std::mem::take(&mut literal)));
                        }
                    } else {
                        body.push('{');
                    }
                    depth += 1;
                }
                '}' => {
                    if depth == 0 {
                        return Err(PatternError::UnbalancedClose { position: pos });
                    }
                    depth -= 1;
                    if depth == 0 {
                        segments.push(parse_body(&body, span_start)?);
                        body.clear();
                    } else {
                        body.push('}');
                    }
                }
                _ => {
                    if depth == 0 {
                        literal.push(ch);
                    } else {
                        body.push(ch);
                    }
                }
            }
        }

        if depth > 0 {
            return Err(PatternError::Unterminated {
                position: span_start,
            });
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Template { segments })
    }

    /// Check a pattern without building a `Template`.
    ///
    /// Equivalent to `Template::parse(pattern).map(|_| ())`.
    pub fn validate(pattern: &str) -> Result<(), PatternError> {
        Self::parse(pattern).map(|_| ())
    }

    /// Resolve the pattern against one replacement value.
    ///
    /// Out-of-range indices clamp to the nearest valid bound and inverted
    /// ranges yield the empty string, so this is infallible.
    pub fn resolve(&self, value: &str) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Whole => out.push_str(value),
                Segment::LiteralEscape(text) => {
                    out.push('{');
                    out.push_str(text);
                    out.push('}');
                }
                Segment::CharRange { start, end } => {
                    let chars: Vec<char> = value.chars().collect();
                    let (lo, hi) = clamp_range(*start, *end, chars.len());
                    out.extend(chars[lo..hi].iter());
                }
                Segment::ComponentRange {
                    delimiter,
                    start,
                    end,
                } => {
                    let parts: Vec<&str> = value.split(delimiter.as_str()).collect();
                    let (lo, hi) = clamp_range(*start, *end, parts.len());
                    out.push_str(&parts[lo..hi].concat());
                }
            }
        }
        out
    }

    /// The parsed segments, in pattern order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => write!(f, "{}", text)?,
                Segment::Whole => write!(f, "{{}}")?,
                Segment::LiteralEscape(text) => write!(f, "{{{{{}}}}}", text)?,
                Segment::CharRange { start, end } => match end {
                    Some(end) => write!(f, "{{:{}:{}}}", start, end)?,
                    None => write!(f, "{{:{}}}", start)?,
                },
                Segment::ComponentRange {
                    delimiter,
                    start,
                    end,
                } => match end {
                    Some(end) => write!(f, "{{{}:{}:{}}}", delimiter, start, end)?,
                    None => write!(f, "{{{}:{}}}", delimiter, start)?,
                },
            }
        }
        Ok(())
    }
}

/// Parse one placeholder body (the text between the outermost braces).
///
/// The recognized forms are tried in priority order: empty body, literal
/// escape, then the index form `<delimiter>?:<start>(:<end>)?`.
fn parse_body(body: &str, position: usize) -> Result<Segment, PatternError> {
    if body.is_empty() {
        return Ok(Segment::Whole);
    }

    if body.len() >= 2 && body.starts_with('{') && body.ends_with('}') {
        return Ok(Segment::LiteralEscape(body[1..body.len() - 1].to_string()));
    }

    let unrecognized = || PatternError::UnrecognizedPlaceholder {
        body: body.to_string(),
        position,
    };

    // Index form. The delimiter is everything before the first ':', so it
    // can never itself contain a colon.
    let (delimiter, indices) = body.split_once(':').ok_or_else(|| unrecognized())?;
    let (start_text, end_text) = match indices.split_once(':') {
        Some((start, end)) => (start, Some(end)),
        None => (indices, None),
    };

    let start: i64 = start_text.parse().map_err(|_| unrecognized())?;
    let end: Option<i64> = match end_text {
        Some(text) => Some(text.parse().map_err(|_| unrecognized())?),
        None => None,
    };

    if delimiter.is_empty() {
        Ok(Segment::CharRange { start, end })
    } else {
        Ok(Segment::ComponentRange {
            delimiter: delimiter.to_string(),
            start,
            end,
        })
    }
}

/// Resolve a signed index pair against a sequence of `len` elements.
///
/// Negative indices count from the end. An omitted end selects the single
/// element at the resolved start. Both bounds clamp to `[0, len]` and an
/// inverted range collapses to empty.
fn clamp_range(start: i64, end: Option<i64>, len: usize) -> (usize, usize) {
    let len = len as i64;
    let lo = if start < 0 { start + len } else { start };
    let hi = match end {
        Some(end) if end < 0 => end + len,
        Some(end) => end,
        None => lo + 1,
    };

    let lo = lo.clamp(0, len);
    let hi = hi.clamp(lo, len);
    (lo as usize, hi as usize)
}
