//! Parser primitives that accept specific patterns.
//!
//! These are the leaves of a grammar. Each is created by a free function and composed
//! with the methods of [`Parser`]. Leaves that peek before consuming (`just`, `filter`,
//! `any`) leave the cursor untouched on failure; leaves that consume as they match
//! (`seq`, `take`, `take_through`) leave it wherever the mismatch was found. Only the
//! backtracking combinators restore the cursor.

use super::*;

/// Does `input` begin with the elements of `seq`?
fn starts_with<I, S>(input: &I, seq: &S) -> bool
where
    I: Input,
    S: Input<Token = I::Token>,
    I::Token: PartialEq,
{
    let mut input = input.clone();
    let mut seq = seq.clone();
    while !seq.is_empty() {
        let want = seq.bump();
        match input.first() {
            Some(got) if got == want => {
                input.bump();
            }
            _ => return false,
        }
    }
    true
}

/// See [`just`].
#[derive(Copy, Clone)]
pub struct Just<T> {
    token: T,
}

impl<I, T> Parser<I> for Just<T>
where
    I: Input<Token = T>,
    T: Clone + PartialEq + fmt::Debug,
{
    type Output = T;

    fn parse(&self, input: &mut I) -> Result<T, Error> {
        match input.first() {
            Some(token) if token == self.token => Ok(input.bump()),
            Some(token) => Err(Error::unexpected(token, format!("{:?}", self.token))
                .with_input_context(input)),
            None => Err(Error::unexpected_end(format!("{:?}", self.token))
                .with_input_context(input)),
        }
    }
}

/// A parser that accepts only the given token.
///
/// Peeks before consuming: on failure the cursor has not moved.
///
/// # Examples
///
/// ```
/// # use parsley::prelude::*;
/// let mut input = "abc";
/// assert_eq!(just('a').parse(&mut input), Ok('a'));
/// assert!(just('z').parse(&mut input).is_err());
/// assert_eq!(input, "bc");
/// ```
pub fn just<T: Clone + PartialEq>(token: T) -> Just<T> {
    Just { token }
}

/// See [`seq`].
#[derive(Copy, Clone)]
pub struct Seq<S> {
    seq: S,
}

impl<I, S> Parser<I> for Seq<S>
where
    I: Input,
    S: Input<Token = I::Token> + fmt::Debug,
    I::Token: PartialEq + fmt::Debug,
{
    type Output = ();

    fn parse(&self, input: &mut I) -> Result<(), Error> {
        let mut expected = self.seq.clone();
        while !expected.is_empty() {
            let want = expected.bump();
            match input.first() {
                Some(got) if got == want => {
                    input.bump();
                }
                Some(got) => {
                    return Err(Error::unexpected(got, format!("{:?}", self.seq))
                        .with_input_context(input))
                }
                None => {
                    return Err(Error::unexpected_end(format!("{:?}", self.seq))
                        .with_input_context(input))
                }
            }
        }
        Ok(())
    }
}

/// A parser that accepts the given sequence of tokens.
///
/// Consumes as it matches: on a mismatch the cursor stops at the offending element.
/// Wrap in [`Parser::rewind`] or an alternation if the partial consumption must be
/// undone.
///
/// # Examples
///
/// ```
/// # use parsley::prelude::*;
/// let mut input = "hello, world";
/// assert_eq!(seq("hello").parse(&mut input), Ok(()));
/// assert_eq!(input, ", world");
/// ```
pub fn seq<S: Input>(seq: S) -> Seq<S> {
    Seq { seq }
}

/// See [`any`].
#[derive(Copy, Clone)]
pub struct Any;

impl<I: Input> Parser<I> for Any {
    type Output = I::Token;

    fn parse(&self, input: &mut I) -> Result<I::Token, Error> {
        if input.is_empty() {
            Err(Error::unexpected_end("any element"))
        } else {
            Ok(input.bump())
        }
    }
}

/// A parser that accepts any single element, failing only at the end of input.
///
/// # Examples
///
/// ```
/// # use parsley::prelude::*;
/// let mut input = "xy";
/// assert_eq!(any().parse(&mut input), Ok('x'));
/// assert_eq!(any().parse(&mut input), Ok('y'));
/// assert!(any().parse(&mut input).is_err());
/// ```
pub fn any() -> Any {
    Any
}

/// See [`filter`].
#[derive(Copy, Clone)]
pub struct Filter<F> {
    predicate: F,
}

impl<I, F> Parser<I> for Filter<F>
where
    I: Input,
    I::Token: fmt::Debug,
    F: Fn(&I::Token) -> bool,
{
    type Output = I::Token;

    fn parse(&self, input: &mut I) -> Result<I::Token, Error> {
        match input.first() {
            Some(token) if (self.predicate)(&token) => Ok(input.bump()),
            Some(token) => Err(Error::unexpected(token, "an element matching the predicate")),
            None => Err(Error::unexpected_end("an element matching the predicate")),
        }
    }
}

/// A parser that accepts a single element if it satisfies the predicate.
///
/// Peeks before consuming: a rejected element is not consumed.
///
/// # Examples
///
/// ```
/// # use parsley::prelude::*;
/// let digit = filter(|c: &char| c.is_ascii_digit());
/// let mut input = "7a";
/// assert_eq!(digit.parse(&mut input), Ok('7'));
/// assert!(digit.parse(&mut input).is_err());
/// assert_eq!(input, "a");
/// ```
pub fn filter<T, F: Fn(&T) -> bool>(predicate: F) -> Filter<F> {
    Filter { predicate }
}

/// See [`end`].
#[derive(Copy, Clone)]
pub struct End;

impl<I: Input> Parser<I> for End
where
    I::Token: fmt::Debug,
{
    type Output = ();

    fn parse(&self, input: &mut I) -> Result<(), Error> {
        match input.first() {
            None => Ok(()),
            Some(token) => Err(Error::unexpected(token, "end of input")),
        }
    }
}

/// A parser that succeeds, consuming nothing, only at the end of input.
///
/// # Examples
///
/// ```
/// # use parsley::prelude::*;
/// let mut input = "a";
/// assert!(end().parse(&mut input).is_err());
/// just('a').parse(&mut input)?;
/// assert_eq!(end().parse(&mut input), Ok(()));
/// # Ok::<(), parsley::Error>(())
/// ```
pub fn end() -> End {
    End
}

/// See [`empty`].
#[derive(Copy, Clone)]
pub struct Empty;

impl<I: Input> Parser<I> for Empty {
    type Output = ();

    fn parse(&self, _input: &mut I) -> Result<(), Error> {
        Ok(())
    }
}

/// A parser that always succeeds, consuming nothing. Chain with [`Parser::to`] to
/// inject a constant value into a grammar.
///
/// # Examples
///
/// ```
/// # use parsley::prelude::*;
/// let mut input = "abc";
/// assert_eq!(empty().boxed().to(42).parse(&mut input), Ok(42));
/// assert_eq!(input, "abc");
/// ```
pub fn empty() -> Empty {
    Empty
}

/// See [`fail`].
pub struct Fail<O> {
    message: String,
    phantom: PhantomData<O>,
}

impl<O> Clone for Fail<O> {
    fn clone(&self) -> Self {
        Self {
            message: self.message.clone(),
            phantom: PhantomData,
        }
    }
}

impl<I: Input, O> Parser<I> for Fail<O> {
    type Output = O;

    fn parse(&self, _input: &mut I) -> Result<O, Error> {
        Err(Error::new(self.message.clone()))
    }
}

/// A parser that always fails with the given message, consuming nothing.
///
/// # Examples
///
/// ```
/// # use parsley::prelude::*;
/// let mut input = "abc";
/// let err = fail::<i32>("not supported").parse(&mut input).unwrap_err();
/// assert_eq!(err.message(), "not supported");
/// assert_eq!(input, "abc");
/// ```
pub fn fail<O>(message: impl Into<String>) -> Fail<O> {
    Fail {
        message: message.into(),
        phantom: PhantomData,
    }
}

/// See [`take_while`].
#[derive(Copy, Clone)]
pub struct TakeWhile<F> {
    predicate: F,
    at_least: usize,
    at_most: Option<usize>,
}

impl<F> TakeWhile<F> {
    /// Require at least `n` matching elements; fewer is a parse failure that restores
    /// the cursor.
    pub fn at_least(mut self, n: usize) -> Self {
        if let Some(max) = self.at_most {
            assert!(n <= max, "minimum cannot exceed maximum");
        }
        self.at_least = n;
        self
    }

    /// Stop after at most `n` matching elements, leaving the rest unconsumed.
    pub fn at_most(mut self, n: usize) -> Self {
        assert!(self.at_least <= n, "maximum cannot be less than minimum");
        self.at_most = Some(n);
        self
    }
}

impl<I, F> Parser<I> for TakeWhile<F>
where
    I: Input,
    F: Fn(&I::Token) -> bool,
{
    type Output = I::Slice;

    fn parse(&self, input: &mut I) -> Result<I::Slice, Error> {
        let start = input.clone();
        let mut taken = 0;
        while self.at_most.map_or(true, |max| taken < max) {
            match input.first() {
                Some(token) if (self.predicate)(&token) => {
                    input.bump();
                    taken += 1;
                }
                _ => break,
            }
        }
        if taken < self.at_least {
            *input = start;
            return Err(Error::new(format!(
                "expected at least {} elements matching the predicate, found {}",
                self.at_least, taken,
            )));
        }
        Ok(start.slice_until(input))
    }
}

/// A parser that greedily consumes the longest prefix whose elements satisfy the
/// predicate, producing it as a zero-copy slice.
///
/// Unbounded by default (an empty prefix succeeds); constrain with
/// [`at_least`](TakeWhile::at_least) and [`at_most`](TakeWhile::at_most).
///
/// # Examples
///
/// ```
/// # use parsley::prelude::*;
/// let digits = take_while(|c: &char| c.is_ascii_digit()).at_least(1);
/// let mut input = "123abc";
/// assert_eq!(digits.parse(&mut input), Ok("123"));
/// assert_eq!(input, "abc");
/// assert!(digits.parse(&mut input).is_err());
/// ```
pub fn take_while<T, F: Fn(&T) -> bool>(predicate: F) -> TakeWhile<F> {
    TakeWhile {
        predicate,
        at_least: 0,
        at_most: None,
    }
}

/// See [`take_until`].
#[derive(Copy, Clone)]
pub struct TakeUntil<S> {
    terminator: S,
}

impl<I, S> Parser<I> for TakeUntil<S>
where
    I: Input,
    S: Input<Token = I::Token>,
    I::Token: PartialEq,
{
    type Output = I::Slice;

    fn parse(&self, input: &mut I) -> Result<I::Slice, Error> {
        let start = input.clone();
        while !starts_with(input, &self.terminator) && !input.is_empty() {
            input.bump();
        }
        Ok(start.slice_until(input))
    }
}

/// A parser that consumes everything up to, but not including, the first occurrence of
/// the terminator sequence.
///
/// Never fails: if the terminator does not occur, the whole remaining input is
/// produced. The scan is naive, re-checking the terminator at every position.
///
/// # Examples
///
/// ```
/// # use parsley::prelude::*;
/// let mut input = "key = value";
/// assert_eq!(take_until(" = ").parse(&mut input), Ok("key"));
/// assert_eq!(input, " = value");
/// ```
pub fn take_until<S: Input>(terminator: S) -> TakeUntil<S> {
    assert!(!terminator.is_empty(), "terminator must be non-empty");
    TakeUntil { terminator }
}

/// See [`take_through`].
#[derive(Copy, Clone)]
pub struct TakeThrough<S> {
    terminator: S,
}

impl<I, S> Parser<I> for TakeThrough<S>
where
    I: Input,
    S: Input<Token = I::Token> + fmt::Debug,
    I::Token: PartialEq,
{
    type Output = I::Slice;

    fn parse(&self, input: &mut I) -> Result<I::Slice, Error> {
        let start = input.clone();
        loop {
            if starts_with(input, &self.terminator) {
                let mut rest = self.terminator.clone();
                while !rest.is_empty() {
                    rest.bump();
                    input.bump();
                }
                return Ok(start.slice_until(input));
            }
            if input.is_empty() {
                return Err(Error::new(format!(
                    "expected terminator {:?} before end of input",
                    self.terminator,
                )));
            }
            input.bump();
        }
    }
}

/// A parser that consumes everything up to and including the first occurrence of the
/// terminator sequence.
///
/// Fails, with the cursor at the end of input, if the terminator never occurs.
///
/// # Examples
///
/// ```
/// # use parsley::prelude::*;
/// let mut input = "/* comment */ code";
/// assert_eq!(take_through("*/").parse(&mut input), Ok("/* comment */"));
/// assert_eq!(input, " code");
/// ```
pub fn take_through<S: Input>(terminator: S) -> TakeThrough<S> {
    assert!(!terminator.is_empty(), "terminator must be non-empty");
    TakeThrough { terminator }
}

/// See [`take`].
#[derive(Copy, Clone)]
pub struct Take {
    count: usize,
}

impl<I: Input> Parser<I> for Take {
    type Output = I::Slice;

    fn parse(&self, input: &mut I) -> Result<I::Slice, Error> {
        let start = input.clone();
        for taken in 0..self.count {
            if input.is_empty() {
                return Err(Error::new(format!(
                    "expected {} elements, found {}",
                    self.count, taken,
                )));
            }
            input.bump();
        }
        Ok(start.slice_until(input))
    }
}

/// A parser that consumes exactly `count` elements, producing them as a zero-copy
/// slice. Fails, reporting how many were available, if the input is shorter.
///
/// # Examples
///
/// ```
/// # use parsley::prelude::*;
/// let mut input = "abcdef";
/// assert_eq!(take(4).parse(&mut input), Ok("abcd"));
/// assert_eq!(input, "ef");
/// ```
pub fn take(count: usize) -> Take {
    Take { count }
}

/// See [`skip`].
#[derive(Copy, Clone)]
pub struct Skip {
    count: usize,
}

impl<I: Input> Parser<I> for Skip {
    type Output = ();

    fn parse(&self, input: &mut I) -> Result<(), Error> {
        for skipped in 0..self.count {
            if input.is_empty() {
                return Err(Error::new(format!(
                    "expected {} elements, found {}",
                    self.count, skipped,
                )));
            }
            input.bump();
        }
        Ok(())
    }
}

/// A parser that consumes and discards exactly `count` elements.
///
/// # Examples
///
/// ```
/// # use parsley::prelude::*;
/// let mut input = "abcdef";
/// skip(2).parse(&mut input)?;
/// assert_eq!(input, "cdef");
/// # Ok::<(), parsley::Error>(())
/// ```
pub fn skip(count: usize) -> Skip {
    Skip { count }
}

/// See [`rest`].
#[derive(Copy, Clone)]
pub struct Rest;

impl<I: Input> Parser<I> for Rest {
    type Output = I::Slice;

    fn parse(&self, input: &mut I) -> Result<I::Slice, Error> {
        let start = input.clone();
        while !input.is_empty() {
            input.bump();
        }
        Ok(start.slice_until(input))
    }
}

/// A parser that consumes the entire remaining input, producing it as a zero-copy
/// slice. Never fails; the slice may be empty.
///
/// # Examples
///
/// ```
/// # use parsley::prelude::*;
/// let mut input = "anything";
/// assert_eq!(rest().parse(&mut input), Ok("anything"));
/// assert_eq!(rest().parse(&mut input), Ok(""));
/// ```
pub fn rest() -> Rest {
    Rest
}

/// See [`custom`].
#[derive(Copy, Clone)]
pub struct Custom<F> {
    f: F,
}

impl<I, O, F> Parser<I> for Custom<F>
where
    I: Input,
    F: Fn(&mut I) -> Result<O, Error>,
{
    type Output = O;

    fn parse(&self, input: &mut I) -> Result<O, Error> {
        (self.f)(input)
    }
}

/// A parser that runs the given function directly against the input cursor.
///
/// The escape hatch for patterns the built-in primitives cannot express. The function
/// is responsible for its own consumption discipline: if it should be atomic on
/// failure, it must restore the cursor itself (or be wrapped in an alternation).
///
/// # Examples
///
/// ```
/// # use parsley::prelude::*;
/// // A little-endian u16, straight off a byte slice.
/// let u16le = custom(|input: &mut &[u8]| {
///     let lo = take(2).parse(input)?;
///     Ok(u16::from_le_bytes([lo[0], lo[1]]))
/// });
/// let mut input: &[u8] = &[0x34, 0x12, 0xff];
/// assert_eq!(u16le.parse(&mut input), Ok(0x1234));
/// ```
pub fn custom<I, O, F: Fn(&mut I) -> Result<O, Error>>(f: F) -> Custom<F> {
    Custom { f }
}

/// See [`choice`].
#[derive(Copy, Clone)]
pub struct Choice<T> {
    parsers: T,
}

macro_rules! impl_choice_for_tuple {
    ($($X:ident)*) => {
        #[allow(non_snake_case)]
        impl<I, O, $($X),*> Parser<I> for Choice<($($X,)*)>
        where
            I: Input,
            $($X: Parser<I, Output = O>),*
        {
            type Output = O;

            fn parse(&self, input: &mut I) -> Result<O, Error> {
                let Choice { parsers: ($($X,)*) } = self;
                let before = input.clone();
                let mut tried = Vec::new();
                $(
                    *input = before.clone();
                    match $X.parse(input) {
                        Ok(out) => return Ok(out),
                        Err(err) => tried.push(err),
                    }
                )*
                *input = before;
                Err(Error::no_match(tried))
            }
        }
    };
}

impl_choice_for_tuple!(A B);
impl_choice_for_tuple!(A B C);
impl_choice_for_tuple!(A B C D);
impl_choice_for_tuple!(A B C D E);
impl_choice_for_tuple!(A B C D E F);

fn choice_of_slice<I: Input, P: Parser<I>>(
    parsers: &[P],
    input: &mut I,
) -> Result<P::Output, Error> {
    let before = input.clone();
    let mut tried = Vec::with_capacity(parsers.len());
    for parser in parsers {
        *input = before.clone();
        match parser.parse(input) {
            Ok(out) => return Ok(out),
            Err(err) => tried.push(err),
        }
    }
    *input = before;
    Err(Error::no_match(tried))
}

impl<I: Input, P: Parser<I>, const N: usize> Parser<I> for Choice<[P; N]> {
    type Output = P::Output;

    fn parse(&self, input: &mut I) -> Result<P::Output, Error> {
        choice_of_slice(&self.parsers, input)
    }
}

impl<I: Input, P: Parser<I>> Parser<I> for Choice<Vec<P>> {
    type Output = P::Output;

    fn parse(&self, input: &mut I) -> Result<P::Output, Error> {
        choice_of_slice(&self.parsers, input)
    }
}

/// A parser that tries each of the given parsers in order against the same starting
/// position, producing the output of the first that succeeds.
///
/// The cursor is restored before every attempt, so a branch that consumed before
/// failing cannot skew the next one, and is fully restored if all branches fail. The
/// aggregate failure carries one underlying error per branch, in attempt order.
///
/// Accepts a tuple of up to six differently-typed parsers with a common output, or an
/// array/`Vec` of uniformly-typed parsers.
///
/// # Examples
///
/// ```
/// # use parsley::prelude::*;
/// let keyword = choice((
///     seq("let").boxed().to("let"),
///     seq("if").boxed().to("if"),
///     seq("else").boxed().to("else"),
/// ));
/// let mut input = "if x";
/// assert_eq!(keyword.parse(&mut input), Ok("if"));
/// ```
pub fn choice<T>(parsers: T) -> Choice<T> {
    Choice { parsers }
}

/// See [`group`].
#[derive(Copy, Clone)]
pub struct Group<T> {
    parsers: T,
}

macro_rules! impl_group_for_tuple {
    ($($X:ident)*) => {
        #[allow(non_snake_case)]
        impl<I: Input, $($X: Parser<I>),*> Parser<I> for Group<($($X,)*)> {
            type Output = ($($X::Output,)*);

            fn parse(&self, input: &mut I) -> Result<Self::Output, Error> {
                let Group { parsers: ($($X,)*) } = self;
                Ok(($($X.parse(input)?,)*))
            }
        }
    };
}

impl_group_for_tuple!(A B);
impl_group_for_tuple!(A B C);
impl_group_for_tuple!(A B C D);
impl_group_for_tuple!(A B C D E);
impl_group_for_tuple!(A B C D E F);

/// A parser that runs the given parsers in sequence, producing their outputs as a flat
/// tuple. Avoids the nested pairs that chained [`Parser::then`] calls build up.
///
/// Failure of any member propagates without rollback, like `.then`.
///
/// # Examples
///
/// ```
/// # use parsley::prelude::*;
/// let date = group((
///     take(4).boxed().then_ignore(just('-')),
///     take(2).boxed().then_ignore(just('-')),
///     take(2),
/// ));
/// let mut input = "2026-08-30";
/// assert_eq!(date.parse(&mut input), Ok(("2026", "08", "30")));
/// ```
pub fn group<T>(parsers: T) -> Group<T> {
    Group { parsers }
}

#[cfg(test)]
mod tests {
    use crate::pin;
    use crate::prelude::*;

    #[test]
    fn just_does_not_consume_on_failure() {
        let mut input = "banana";
        assert!(just('x').parse(&mut input).is_err());
        assert_eq!(input, "banana");
    }

    #[test]
    fn seq_partial_consumption_stands() {
        let mut input = "help";
        assert!(seq("hello").parse(&mut input).is_err());
        assert_eq!(input, "p");
    }

    #[test]
    fn seq_matches_token_slices() {
        let mut input: &[u8] = b"\x00\x01rest";
        let magic: &[u8] = &[0x00, 0x01];
        assert_eq!(seq(magic).parse(&mut input), Ok(()));
        assert_eq!(input, b"rest");
    }

    #[test]
    fn take_while_bounds() {
        let digits = take_while(|c: &char| c.is_ascii_digit());

        let mut input = "1234abc";
        assert_eq!(digits.at_most(2).parse(&mut input), Ok("12"));
        assert_eq!(input, "34abc");

        let mut input = "12x";
        assert!(digits.at_least(3).parse(&mut input).is_err());
        assert_eq!(input, "12x", "minimum violation must restore the cursor");
    }

    #[test]
    #[should_panic(expected = "minimum cannot exceed maximum")]
    fn take_while_rejects_inverted_bounds() {
        let _ = take_while(|c: &char| c.is_alphabetic()).at_most(2).at_least(3);
    }

    #[test]
    fn take_until_degrades_to_rest() {
        let mut input = "no terminator here";
        assert_eq!(take_until("@").parse(&mut input), Ok("no terminator here"));
        assert_eq!(input, "");
    }

    #[test]
    fn take_through_includes_terminator() {
        let mut input = "abc;def";
        assert_eq!(take_through(";").parse(&mut input), Ok("abc;"));
        assert_eq!(input, "def");

        let mut input = "abcdef";
        assert!(take_through(";").parse(&mut input).is_err());
        assert_eq!(input, "", "failed scan leaves the cursor at the end");
    }

    #[test]
    fn take_reports_actual_count() {
        let mut input = "ab";
        let err = take(5).parse(&mut input).unwrap_err();
        assert_eq!(err.message(), "expected 5 elements, found 2");
    }

    #[test]
    fn choice_restores_between_and_after_branches() {
        // The first branch consumes "ab" before failing on 'X'; the second must still
        // see the input from the start.
        let parser = choice((pin(seq("abX")).to(1), pin(seq("abc")).to(2)));
        let mut input = "abc";
        assert_eq!(parser.parse(&mut input), Ok(2));

        let parser = choice((pin(seq("abX")).to(1), pin(seq("abY")).to(2)));
        let mut input = "abc";
        let err = parser.parse(&mut input).unwrap_err();
        assert_eq!(input, "abc", "overall failure must restore the cursor");
        assert_eq!(err.underlying().len(), 2);
    }

    #[test]
    fn choice_over_vec() {
        let parsers: Vec<_> = ["foo", "bar", "baz"].iter().map(|s| seq(*s)).collect();
        let mut input = "bazaar";
        assert_eq!(choice(parsers).parse(&mut input), Ok(()));
        assert_eq!(input, "aar");
    }

    #[test]
    fn group_flattens() {
        let letter = filter(|c: &char| c.is_alphabetic());
        let digit = filter(|c: &char| c.is_ascii_digit());
        let mut input = "a1b";
        assert_eq!(
            group((letter, digit, letter)).parse(&mut input),
            Ok(('a', '1', 'b')),
        );
    }

    #[test]
    fn custom_controls_its_own_consumption() {
        let version = custom(|input: &mut &str| {
            seq("v").parse(input)?;
            take_while(|c: &char| c.is_ascii_digit())
                .at_least(1)
                .parse(input)
        });
        let mut input = "v42.";
        assert_eq!(version.parse(&mut input), Ok("42"));
        assert_eq!(input, ".");
    }
}
