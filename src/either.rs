//! Support for the [`either`](::either) crate.
//!
//! `Either<L, R>` lets a composition site pick between two differently-typed parsers
//! with a common output at runtime, the if/else counterpart to `impl Parser for
//! Option<P>`.
//!
//! # Examples
//!
//! ```
//! # use parsley::prelude::*;
//! use either::Either;
//!
//! fn delimiter(strict: bool) -> Either<impl Parser<&'static str, Output = ()>, impl Parser<&'static str, Output = ()>> {
//!     if strict {
//!         Either::Left(seq("; "))
//!     } else {
//!         Either::Right(just(';').ignored())
//!     }
//! }
//!
//! let mut input = ";x";
//! assert_eq!(delimiter(false).parse(&mut input), Ok(()));
//! assert_eq!(input, "x");
//!
//! let mut input = ";x";
//! assert!(delimiter(true).parse(&mut input).is_err());
//! ```

use super::*;
use ::either::Either;

impl<I, L, R> Parser<I> for Either<L, R>
where
    I: Input,
    L: Parser<I>,
    R: Parser<I, Output = L::Output>,
{
    type Output = L::Output;

    fn parse(&self, input: &mut I) -> Result<Self::Output, Error> {
        match self {
            Either::Left(parser) => parser.parse(input),
            Either::Right(parser) => parser.parse(input),
        }
    }
}
