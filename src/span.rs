//! Spans and span-carrying values.

use super::*;

/// A half-open range of input offsets, `start..end`.
///
/// Offsets count elements consumed from the start of the input: tokens for token
/// slices, characters for strings, bytes for byte inputs. An empty match produces an
/// empty span where `start == end`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// Offset of the first element covered.
    pub start: usize,
    /// Offset one past the last element covered.
    pub end: usize,
}

impl Span {
    /// Create a span covering `start..end`.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// The number of elements covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span covers no elements.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The smallest span covering both `self` and `other`.
    pub fn union(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl From<Span> for std::ops::Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A parsed value paired with the [`Span`] of input it was parsed from.
///
/// Produced by [`Parser::with_span`](crate::Parser::with_span).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spanned<T> {
    /// The parsed value.
    pub value: T,
    /// The input range the value was parsed from.
    pub span: Span,
}

impl<T> Spanned<T> {
    /// Pair a value with the span it was parsed from.
    pub fn new(value: T, span: Span) -> Self {
        Self { value, span }
    }

    /// Map the value, keeping the span.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Spanned<U> {
        Spanned {
            value: f(self.value),
            span: self.span,
        }
    }
}

/// See [`Parser::with_span`].
#[derive(Copy, Clone)]
pub struct WithSpan<P> {
    pub(crate) parser: P,
}

impl<I, P> Parser<I> for WithSpan<P>
where
    I: Tracking,
    P: Parser<I>,
{
    type Output = Spanned<P::Output>;

    fn parse(&self, input: &mut I) -> Result<Self::Output, Error> {
        let start = input.offset();
        let value = self.parser.parse(input)?;
        Ok(Spanned::new(value, Span::new(start, input.offset())))
    }
}
