//! Error types, traits and utilities.
//!
//! Parse failures are ordinary values: an [`Error`] carries a message, an optional
//! snapshot of the input state at the point of failure, and the nested errors of any
//! alternatives that were tried. Nothing in an error borrows from the input, so errors
//! outlive the cursor that produced them.

use super::*;

/// A structured parse error.
///
/// Errors form a tree: leaf failures (produced by primitive parsers) have no
/// `underlying` entries, while aggregating combinators such as
/// [`choice`](crate::primitive::choice) attach one
/// underlying error per failed alternative, in attempt order. Errors have value
/// semantics and compare structurally.
///
/// The [`Display`](fmt::Display) rendering is stable: the message, then the context in
/// parentheses, then each underlying error on its own line, indented two spaces per
/// nesting level.
///
/// # Examples
///
/// ```
/// # use parsley::prelude::*;
/// let mut input = "c";
/// let err = choice((just('a'), just('b'))).parse(&mut input).unwrap_err();
/// assert_eq!(err.underlying().len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Error {
    message: String,
    context: Option<Context>,
    underlying: Vec<Error>,
}

/// A snapshot of the input state captured when an [`Error`] was created.
///
/// The snapshot is by value: it stores a count and a rendered description, never a live
/// reference into the input, so an error's lifetime is independent of the cursor's.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Context {
    /// Elements remaining at the point of failure, if the input could report a count.
    pub remaining: Option<usize>,
    /// A rendering of the next element, or `"end of input"`.
    pub description: String,
}

impl Error {
    /// Create a leaf error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            underlying: Vec::new(),
        }
    }

    /// An error for input that ended where `expected` should have appeared.
    pub fn unexpected_end(expected: impl fmt::Display) -> Self {
        Self::new(format!("unexpected end of input, expected {}", expected))
    }

    /// An error for finding `found` where `expected` should have appeared.
    pub fn unexpected(found: impl fmt::Debug, expected: impl fmt::Display) -> Self {
        Self::new(format!("expected {}, found {:?}", expected, found))
    }

    /// The aggregate error produced when every branch of an alternation fails. Each
    /// failed branch contributes one underlying entry, in attempt order.
    pub fn no_match(tried: Vec<Error>) -> Self {
        Self::new("no alternative matched").with_underlying(tried)
    }

    /// Attach a context snapshot.
    pub fn with_context(mut self, context: Context) -> Self {
        self.context = Some(context);
        self
    }

    /// Attach a context snapshot taken from the current input state.
    pub fn with_input_context<I: Input>(self, input: &I) -> Self
    where
        I::Token: fmt::Debug,
    {
        let description = match input.first() {
            Some(token) => format!("{:?}", token),
            None => String::from("end of input"),
        };
        self.with_context(Context {
            remaining: input.len(),
            description,
        })
    }

    /// Attach nested errors.
    pub fn with_underlying(mut self, underlying: Vec<Error>) -> Self {
        self.underlying = underlying;
        self
    }

    /// The failure message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The input snapshot taken when the error was created, if any.
    pub fn context(&self) -> Option<&Context> {
        self.context.as_ref()
    }

    /// The nested errors of failed alternatives, in attempt order. Empty for leaf
    /// errors.
    pub fn underlying(&self) -> &[Error] {
        &self.underlying
    }

    fn fmt_at_depth(&self, f: &mut fmt::Formatter, depth: usize) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(context) = &self.context {
            match context.remaining {
                Some(n) => write!(f, " ({} remaining, next: {})", n, context.description)?,
                None => write!(f, " (next: {})", context.description)?,
            }
        }
        for under in &self.underlying {
            writeln!(f)?;
            for _ in 0..=depth {
                write!(f, "  ")?;
            }
            under.fmt_at_depth(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.fmt_at_depth(f, 0)
    }
}

impl std::error::Error for Error {}

/// An [`Error`] (or any error value) paired with the input offset it occurred at.
///
/// Produced by [`Parser::parse_located`](crate::Parser::parse_located) and
/// [`Parser::parse_spanned`](crate::Parser::parse_spanned); the offset is the position
/// the failing parser started from.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Located<E = Error> {
    offset: usize,
    error: E,
}

impl<E> Located<E> {
    /// Pair an error with the input offset it occurred at.
    pub fn at(offset: usize, error: E) -> Self {
        Self { offset, error }
    }

    /// The input offset the error occurred at.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The wrapped error.
    pub fn error(&self) -> &E {
        &self.error
    }

    /// Unwrap, discarding the offset.
    pub fn into_error(self) -> E {
        self.error
    }
}

impl<E: fmt::Display> fmt::Display for Located<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "at offset {}: {}", self.offset, self.error)
    }
}

impl<E: fmt::Display + fmt::Debug> std::error::Error for Located<E> {}

/// The failure of a negative lookahead: the wrapped pattern matched where it was
/// required not to.
///
/// This is deliberately a separate, narrower type than [`Error`]: negative lookahead
/// has exactly one way to fail. It converts into [`Error`] via [`From`] so
/// [`Parser::not`](crate::Parser::not) composes with ordinary grammars.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnexpectedMatch;

impl fmt::Display for UnexpectedMatch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unexpected match")
    }
}

impl std::error::Error for UnexpectedMatch {}

impl From<UnexpectedMatch> for Error {
    fn from(_: UnexpectedMatch) -> Self {
        Error::new("expected pattern not to match, but it matched")
    }
}
