//! Recursive parsers (parser that include themselves within their patterns).
//!
//! Self-reference is a chicken-and-egg problem for value-built grammars: a parser
//! cannot mention itself before it exists. [`recursive`] solves it with a declare-bind
//! split behind a single call: the closure receives a handle to the parser being
//! defined, uses it freely, and the finished definition is written into the handle
//! exactly once. Cloned handles share the definition. [`lazy`] is the simpler
//! alternative that rebuilds its parser on every invocation.

use super::*;

/// See [`recursive`].
pub struct Recursive<'a, I: Input, O> {
    inner: Rc<OnceCell<Box<dyn Parser<I, Output = O> + 'a>>>,
}

impl<'a, I: Input, O> Clone for Recursive<'a, I, O> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<'a, I: Input, O> Parser<I> for Recursive<'a, I, O> {
    type Output = O;

    fn parse(&self, input: &mut I) -> Result<O, Error> {
        let parser = self
            .inner
            .get()
            .expect("recursive parser used before being defined");
        // Deep nesting recurses through here; grow onto the heap rather than
        // overflowing the thread stack.
        #[cfg(feature = "stacker")]
        {
            stacker::maybe_grow(64 * 1024, 1024 * 1024, || parser.parse(input))
        }
        #[cfg(not(feature = "stacker"))]
        {
            parser.parse(input)
        }
    }
}

/// Construct a parser that may refer to itself.
///
/// The closure is given a handle to the parser being defined and must return the
/// definition; the handle may be cloned into as many positions of the grammar as
/// needed. The definition is built once, when `recursive` returns, no matter how many
/// times the result is run or cloned.
///
/// With the `stacker` feature (on by default), deeply nested inputs spill the parse
/// onto heap-allocated stack segments instead of overflowing.
///
/// # Examples
///
/// ```
/// # use parsley::prelude::*;
/// // Counts the nesting depth of balanced parentheses.
/// let depth = recursive(|depth| {
///     depth
///         .delimited_by(just('('), just(')'))
///         .map(|d: u32| d + 1)
///         .or(empty().boxed().to(0))
/// });
/// let mut input = "((()))";
/// assert_eq!(depth.parse(&mut input), Ok(3));
/// ```
pub fn recursive<'a, I, O, P, F>(f: F) -> Recursive<'a, I, O>
where
    I: Input,
    P: Parser<I, Output = O> + 'a,
    F: FnOnce(Recursive<'a, I, O>) -> P,
{
    let handle = Recursive {
        inner: Rc::new(OnceCell::new()),
    };
    let parser = f(handle.clone());
    if handle.inner.set(Box::new(parser)).is_err() {
        unreachable!("the definition cell is fresh");
    }
    handle
}

/// See [`lazy`].
#[derive(Copy, Clone)]
pub struct Lazy<F> {
    f: F,
}

impl<I, P, F> Parser<I> for Lazy<F>
where
    I: Input,
    P: Parser<I>,
    F: Fn() -> P,
{
    type Output = P::Output;

    fn parse(&self, input: &mut I) -> Result<P::Output, Error> {
        (self.f)().parse(input)
    }
}

/// Defer construction of a parser until it is first run, rebuilding it on every
/// invocation.
///
/// Useful for breaking definition-order cycles between grammar functions. Prefer
/// [`recursive`] for self-reference: it builds the grammar once instead of once per
/// attempt.
///
/// # Examples
///
/// ```
/// # use parsley::prelude::*;
/// fn digits() -> impl Parser<&'static str, Output = &'static str> {
///     take_while(|c: &char| c.is_ascii_digit()).at_least(1)
/// }
///
/// let parser = lazy(digits);
/// let mut input = "123!";
/// assert_eq!(parser.parse(&mut input), Ok("123"));
/// ```
pub fn lazy<P, F: Fn() -> P>(f: F) -> Lazy<F> {
    Lazy { f }
}
