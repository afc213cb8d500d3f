//! Command pattern engine for per-item argument substitution.
//!
//! A pattern is a command word containing zero or more brace-delimited
//! placeholders. Each placeholder describes how to derive text from the
//! replacement value of the current input item:
//!
//! - `{}` - the entire replacement value
//! - `{{text}}` - the literal text `{text}` (the only escape mechanism)
//! - `{:n}` - the nth character of the value
//! - `{:n:m}` - characters `[n, m)` of the value
//! - `{d:n}` - the nth component of the value split by the string `d`
//! - `{d:n:m}` - components `[n, m)` of the value split by `d`, joined
//!
//! Indices may be negative, counting from the end. Out-of-range indices
//! are clamped to the nearest valid bound, so resolution never fails once
//! a pattern has parsed.
//!
//! Patterns are parsed once and reused for every replacement value.
//! Resolution is purely computational and safe to call from any thread.

mod template;

pub use template::{PatternError, Segment, Template};
