//! Combinators that allow combining and extending existing parsers.
//!
//! Each struct here is created by a method of [`Parser`]; none are constructed
//! directly. The cursor discipline is uniform: sequencing combinators (`then`,
//! `then_with`, `delimited_by`) propagate failure without touching the cursor, while
//! the alternation family (`or`, `or_not`, `not`, `rewind`, `repeated`,
//! `separated_by`) saves the cursor before each attempt and restores it when the
//! attempt fails.

use super::*;

/// See [`Parser::map`].
#[derive(Copy, Clone)]
pub struct Map<P, F> {
    pub(crate) parser: P,
    pub(crate) f: F,
}

impl<I, P, F, U> Parser<I> for Map<P, F>
where
    I: Input,
    P: Parser<I>,
    F: Fn(P::Output) -> U,
{
    type Output = U;

    fn parse(&self, input: &mut I) -> Result<U, Error> {
        self.parser.parse(input).map(&self.f)
    }
}

/// See [`Parser::try_map`].
#[derive(Copy, Clone)]
pub struct TryMap<P, F> {
    pub(crate) parser: P,
    pub(crate) f: F,
}

impl<I, P, F, U> Parser<I> for TryMap<P, F>
where
    I: Input,
    P: Parser<I>,
    F: Fn(P::Output) -> Result<U, Error>,
{
    type Output = U;

    fn parse(&self, input: &mut I) -> Result<U, Error> {
        // A rejected value does not undo the upstream consumption.
        self.parser.parse(input).and_then(&self.f)
    }
}

/// See [`Parser::then_with`].
#[derive(Copy, Clone)]
pub struct ThenWith<P, F> {
    pub(crate) parser: P,
    pub(crate) f: F,
}

impl<I, P, F, Q> Parser<I> for ThenWith<P, F>
where
    I: Input,
    P: Parser<I>,
    F: Fn(P::Output) -> Q,
    Q: Parser<I>,
{
    type Output = Q::Output;

    fn parse(&self, input: &mut I) -> Result<Q::Output, Error> {
        let out = self.parser.parse(input)?;
        (self.f)(out).parse(input)
    }
}

/// See [`Parser::filter`].
#[derive(Copy, Clone)]
pub struct Filtered<P, F> {
    pub(crate) parser: P,
    pub(crate) predicate: F,
}

impl<I, P, F> Parser<I> for Filtered<P, F>
where
    I: Input,
    P: Parser<I>,
    P::Output: fmt::Debug,
    F: Fn(&P::Output) -> bool,
{
    type Output = P::Output;

    fn parse(&self, input: &mut I) -> Result<P::Output, Error> {
        let out = self.parser.parse(input)?;
        if (self.predicate)(&out) {
            Ok(out)
        } else {
            Err(Error::unexpected(out, "an output accepted by the predicate"))
        }
    }
}

/// See [`Parser::to`].
#[derive(Copy, Clone)]
pub struct To<P, O> {
    pub(crate) parser: P,
    pub(crate) value: O,
}

impl<I, P, O> Parser<I> for To<P, O>
where
    I: Input,
    P: Parser<I>,
    O: Clone,
{
    type Output = O;

    fn parse(&self, input: &mut I) -> Result<O, Error> {
        self.parser.parse(input)?;
        Ok(self.value.clone())
    }
}

/// See [`Parser::ignored`].
pub type Ignored<P> = To<P, ()>;

/// See [`Parser::then`].
#[derive(Copy, Clone)]
pub struct Then<A, B> {
    pub(crate) first: A,
    pub(crate) second: B,
}

impl<I, A, B> Parser<I> for Then<A, B>
where
    I: Input,
    A: Parser<I>,
    B: Parser<I>,
{
    type Output = (A::Output, B::Output);

    fn parse(&self, input: &mut I) -> Result<Self::Output, Error> {
        let a = self.first.parse(input)?;
        let b = self.second.parse(input)?;
        Ok((a, b))
    }
}

/// See [`Parser::ignore_then`].
#[derive(Copy, Clone)]
pub struct IgnoreThen<A, B> {
    pub(crate) first: A,
    pub(crate) second: B,
}

impl<I, A, B> Parser<I> for IgnoreThen<A, B>
where
    I: Input,
    A: Parser<I>,
    B: Parser<I>,
{
    type Output = B::Output;

    fn parse(&self, input: &mut I) -> Result<B::Output, Error> {
        self.first.parse(input)?;
        self.second.parse(input)
    }
}

/// See [`Parser::then_ignore`].
#[derive(Copy, Clone)]
pub struct ThenIgnore<A, B> {
    pub(crate) first: A,
    pub(crate) second: B,
}

impl<I, A, B> Parser<I> for ThenIgnore<A, B>
where
    I: Input,
    A: Parser<I>,
    B: Parser<I>,
{
    type Output = A::Output;

    fn parse(&self, input: &mut I) -> Result<A::Output, Error> {
        let a = self.first.parse(input)?;
        self.second.parse(input)?;
        Ok(a)
    }
}

/// See [`Parser::delimited_by`].
#[derive(Copy, Clone)]
pub struct DelimitedBy<P, L, R> {
    pub(crate) parser: P,
    pub(crate) open: L,
    pub(crate) close: R,
}

impl<I, P, L, R> Parser<I> for DelimitedBy<P, L, R>
where
    I: Input,
    P: Parser<I>,
    L: Parser<I>,
    R: Parser<I>,
{
    type Output = P::Output;

    fn parse(&self, input: &mut I) -> Result<P::Output, Error> {
        self.open.parse(input)?;
        let out = self.parser.parse(input)?;
        self.close.parse(input)?;
        Ok(out)
    }
}

/// See [`Parser::or`].
#[derive(Copy, Clone)]
pub struct Or<A, B> {
    pub(crate) first: A,
    pub(crate) second: B,
}

impl<I, A, B> Parser<I> for Or<A, B>
where
    I: Input,
    A: Parser<I>,
    B: Parser<I, Output = A::Output>,
{
    type Output = A::Output;

    fn parse(&self, input: &mut I) -> Result<A::Output, Error> {
        let before = input.clone();
        let first = match self.first.parse(input) {
            Ok(out) => return Ok(out),
            Err(err) => err,
        };
        *input = before.clone();
        match self.second.parse(input) {
            Ok(out) => Ok(out),
            Err(second) => {
                *input = before;
                Err(Error::no_match(vec![first, second]))
            }
        }
    }
}

/// See [`Parser::or_not`].
#[derive(Copy, Clone)]
pub struct OrNot<P> {
    pub(crate) parser: P,
}

impl<I, P> Parser<I> for OrNot<P>
where
    I: Input,
    P: Parser<I>,
{
    type Output = Option<P::Output>;

    fn parse(&self, input: &mut I) -> Result<Option<P::Output>, Error> {
        let before = input.clone();
        match self.parser.parse(input) {
            Ok(out) => Ok(Some(out)),
            Err(_) => {
                *input = before;
                Ok(None)
            }
        }
    }
}

/// See [`Parser::not`].
#[derive(Copy, Clone)]
pub struct Not<P> {
    pub(crate) parser: P,
}

impl<I, P> Parser<I> for Not<P>
where
    I: Input,
    P: Parser<I>,
{
    type Output = ();

    fn parse(&self, input: &mut I) -> Result<(), Error> {
        let before = input.clone();
        let result = self.parser.parse(input);
        *input = before;
        match result {
            Ok(_) => Err(UnexpectedMatch.into()),
            Err(_) => Ok(()),
        }
    }
}

/// See [`Parser::rewind`].
#[derive(Copy, Clone)]
pub struct Rewind<P> {
    pub(crate) parser: P,
}

impl<I, P> Parser<I> for Rewind<P>
where
    I: Input,
    P: Parser<I>,
{
    type Output = P::Output;

    fn parse(&self, input: &mut I) -> Result<P::Output, Error> {
        let before = input.clone();
        let result = self.parser.parse(input);
        *input = before;
        result
    }
}

/// See [`Parser::repeated`].
#[derive(Copy, Clone)]
pub struct Repeated<P> {
    pub(crate) parser: P,
    pub(crate) at_least: usize,
    pub(crate) at_most: Option<usize>,
}

impl<P> Repeated<P> {
    /// Require at least `n` repetitions; fewer is a parse failure that restores the
    /// cursor to where the whole repetition began.
    pub fn at_least(mut self, n: usize) -> Self {
        if let Some(max) = self.at_most {
            assert!(n <= max, "minimum cannot exceed maximum");
        }
        self.at_least = n;
        self
    }

    /// Stop after at most `n` repetitions, leaving the rest of the input unconsumed.
    pub fn at_most(mut self, n: usize) -> Self {
        assert!(self.at_least <= n, "maximum cannot be less than minimum");
        self.at_most = Some(n);
        self
    }

    /// Require exactly `n` repetitions.
    pub fn exactly(self, n: usize) -> Self {
        Self {
            at_least: n,
            at_most: Some(n),
            ..self
        }
    }
}

impl<I, P> Parser<I> for Repeated<P>
where
    I: Input,
    P: Parser<I>,
{
    type Output = Vec<P::Output>;

    fn parse(&self, input: &mut I) -> Result<Vec<P::Output>, Error> {
        let start = input.clone();
        let mut items = Vec::new();
        let mut last_err = None;
        while self.at_most.map_or(true, |max| items.len() < max) {
            let before = input.clone();
            match self.parser.parse(input) {
                Ok(item) => items.push(item),
                Err(err) => {
                    // The failed final attempt is rolled back, so the cursor rests
                    // after the last full repetition.
                    *input = before;
                    last_err = Some(err);
                    break;
                }
            }
        }
        if items.len() < self.at_least {
            *input = start;
            let mut err = Error::new(format!(
                "expected at least {} repetitions, found {}",
                self.at_least,
                items.len(),
            ));
            if let Some(last) = last_err {
                err = err.with_underlying(vec![last]);
            }
            return Err(err);
        }
        Ok(items)
    }
}

/// See [`Parser::separated_by`].
#[derive(Copy, Clone)]
pub struct SeparatedBy<P, S> {
    pub(crate) parser: P,
    pub(crate) separator: S,
    pub(crate) at_least: usize,
    pub(crate) at_most: Option<usize>,
    pub(crate) allow_leading: bool,
    pub(crate) allow_trailing: bool,
}

impl<P, S> SeparatedBy<P, S> {
    /// Require at least `n` items; fewer is a parse failure that restores the cursor
    /// to where the whole list began.
    pub fn at_least(mut self, n: usize) -> Self {
        if let Some(max) = self.at_most {
            assert!(n <= max, "minimum cannot exceed maximum");
        }
        self.at_least = n;
        self
    }

    /// Stop after at most `n` items.
    pub fn at_most(mut self, n: usize) -> Self {
        assert!(self.at_least <= n, "maximum cannot be less than minimum");
        self.at_most = Some(n);
        self
    }

    /// Also accept one separator before the first item.
    pub fn allow_leading(mut self) -> Self {
        self.allow_leading = true;
        self
    }

    /// Also accept one separator after the last item.
    pub fn allow_trailing(mut self) -> Self {
        self.allow_trailing = true;
        self
    }
}

impl<I, P, S> Parser<I> for SeparatedBy<P, S>
where
    I: Input,
    P: Parser<I>,
    S: Parser<I>,
{
    type Output = Vec<P::Output>;

    fn parse(&self, input: &mut I) -> Result<Vec<P::Output>, Error> {
        let start = input.clone();
        if self.allow_leading {
            let before = input.clone();
            if self.separator.parse(input).is_err() {
                *input = before;
            }
        }

        let mut items = Vec::new();
        let mut last_err = None;
        let before = input.clone();
        match self.parser.parse(input) {
            Ok(item) => items.push(item),
            Err(err) => {
                *input = before;
                last_err = Some(err);
            }
        }
        if items.is_empty() {
            // Nothing matched; a leading separator (if any) is not ours to consume.
            *input = start;
            return if self.at_least == 0 {
                Ok(items)
            } else {
                Err(minimum_violation(self.at_least, 0, last_err))
            };
        }

        while self.at_most.map_or(true, |max| items.len() < max) {
            let before = input.clone();
            if self.separator.parse(input).is_err() {
                *input = before;
                break;
            }
            match self.parser.parse(input) {
                Ok(item) => items.push(item),
                Err(err) => {
                    // A dangling separator is rolled back along with the failed item.
                    *input = before;
                    last_err = Some(err);
                    break;
                }
            }
        }
        if self.allow_trailing {
            let before = input.clone();
            if self.separator.parse(input).is_err() {
                *input = before;
            }
        }

        if items.len() < self.at_least {
            *input = start;
            return Err(minimum_violation(self.at_least, items.len(), last_err));
        }
        Ok(items)
    }
}

fn minimum_violation(at_least: usize, found: usize, last_err: Option<Error>) -> Error {
    let err = Error::new(format!(
        "expected at least {} items, found {}",
        at_least, found,
    ));
    match last_err {
        Some(last) => err.with_underlying(vec![last]),
        None => err,
    }
}

#[cfg(test)]
mod tests {
    use crate::pin;
    use crate::prelude::*;

    fn digit() -> impl Parser<&'static str, Output = char> + Copy {
        filter(|c: &char| c.is_ascii_digit())
    }

    #[test]
    fn try_map_keeps_consumption() {
        let parser = pin(take_while(|c: &char| c.is_ascii_digit()).at_least(1))
            .try_map(|s: &str| s.parse::<u8>().map_err(|e| Error::new(e.to_string())));

        let mut input = "42;";
        assert_eq!(parser.parse(&mut input), Ok(42));

        let mut input = "999;";
        assert!(parser.parse(&mut input).is_err());
        assert_eq!(input, ";", "rejected value leaves upstream consumption in place");
    }

    #[test]
    fn then_with_length_prefixed() {
        // The classic context-dependent grammar: a digit announcing how many elements
        // follow.
        let parser = digit().then_with(|d| take(d.to_digit(10).unwrap() as usize));
        let mut input = "3abcd";
        assert_eq!(parser.parse(&mut input), Ok("abc"));
        assert_eq!(input, "d");
    }

    #[test]
    fn or_restores_before_second_branch() {
        let parser = pin(seq("ab1")).to(1).or(pin(seq("ab2")).to(2));
        let mut input = "ab2!";
        assert_eq!(parser.parse(&mut input), Ok(2));
        assert_eq!(input, "!");
    }

    #[test]
    fn or_aggregates_both_errors() {
        let parser = pin(just('a')).or(just('b'));
        let mut input = "c";
        let err = parser.parse(&mut input).unwrap_err();
        assert_eq!(err.message(), "no alternative matched");
        assert_eq!(err.underlying().len(), 2);
        assert_eq!(input, "c");
    }

    #[test]
    fn or_not_never_fails() {
        let parser = pin(seq("ab")).or_not();
        let mut input = "ax";
        assert_eq!(parser.parse(&mut input), Ok(None));
        assert_eq!(input, "ax", "failed attempt must be restored");
        let mut input = "abx";
        assert_eq!(parser.parse(&mut input), Ok(Some(())));
        assert_eq!(input, "x");
    }

    #[test]
    fn not_rewind_duality() {
        let mut input = "abc";
        assert_eq!(pin(seq("ab")).rewind().parse(&mut input), Ok(()));
        assert!(pin(seq("ab")).not().parse(&mut input).is_err());
        assert_eq!(pin(seq("xy")).not().parse(&mut input), Ok(()));
        assert!(pin(seq("xy")).rewind().parse(&mut input).is_err());
        assert_eq!(input, "abc", "neither lookahead may consume");
    }

    #[test]
    fn rewind_is_idempotent() {
        let parser = pin(seq("abc")).rewind();
        let mut input = "abcdef";
        assert_eq!(parser.parse(&mut input), Ok(()));
        assert_eq!(parser.parse(&mut input), Ok(()));
        assert_eq!(input, "abcdef");
    }

    #[test]
    fn repeated_rolls_back_failed_final_attempt() {
        // "ab" repeats twice, then "ax" fails partway; the partial consumption of the
        // final attempt must not stand.
        let parser = pin(seq("ab")).repeated();
        let mut input = "ababax";
        assert_eq!(parser.parse(&mut input), Ok(vec![(), ()]));
        assert_eq!(input, "ax");
    }

    #[test]
    fn repeated_minimum_restores_to_start() {
        let parser = pin(seq("ab")).repeated().at_least(3);
        let mut input = "abab!";
        let err = parser.parse(&mut input).unwrap_err();
        assert_eq!(input, "abab!");
        assert_eq!(err.message(), "expected at least 3 repetitions, found 2");
        assert_eq!(err.underlying().len(), 1, "the blocking failure is attached");
    }

    #[test]
    fn repeated_bounds() {
        let parser = digit().repeated().at_most(2);
        let mut input = "1234";
        assert_eq!(parser.parse(&mut input), Ok(vec!['1', '2']));
        assert_eq!(input, "34");

        let parser = digit().repeated().exactly(4);
        let mut input = "1234rest";
        assert_eq!(parser.parse(&mut input), Ok(vec!['1', '2', '3', '4']));
        assert_eq!(input, "rest");
    }

    #[test]
    #[should_panic(expected = "maximum cannot be less than minimum")]
    fn repeated_rejects_inverted_bounds() {
        let _ = pin::<&str, _>(seq("a")).repeated().at_least(3).at_most(2);
    }

    #[test]
    fn separated_by_dangling_separator() {
        let parser = digit().separated_by(just(','));
        let mut input = "1,2,3,x";
        assert_eq!(parser.parse(&mut input), Ok(vec!['1', '2', '3']));
        assert_eq!(input, ",x", "the dangling separator is rolled back");
    }

    #[test]
    fn separated_by_trailing_and_leading() {
        let parser = digit().separated_by(just(',')).allow_trailing();
        let mut input = "1,2,]";
        assert_eq!(parser.parse(&mut input), Ok(vec!['1', '2']));
        assert_eq!(input, "]");

        let parser = digit().separated_by(just(',')).allow_leading();
        let mut input = ",1,2]";
        assert_eq!(parser.parse(&mut input), Ok(vec!['1', '2']));
        assert_eq!(input, "]");
    }

    #[test]
    fn separated_by_empty_list() {
        let parser = digit().separated_by(just(','));
        let mut input = "]";
        assert_eq!(parser.parse(&mut input), Ok(vec![]));
        assert_eq!(input, "]");
    }

    #[test]
    fn separated_by_minimum_restores_to_start() {
        let parser = digit().separated_by(just(',')).at_least(3);
        let mut input = "1,2]";
        assert!(parser.parse(&mut input).is_err());
        assert_eq!(input, "1,2]");
    }

    #[test]
    fn delimited_by_plumbs_inner_output() {
        let parser = digit().delimited_by(just('('), just(')'));
        let mut input = "(7)!";
        assert_eq!(parser.parse(&mut input), Ok('7'));
        assert_eq!(input, "!");
    }

    #[test]
    fn ignored_discards() {
        let mut input = "abc";
        assert_eq!(pin(seq("ab")).ignored().parse(&mut input), Ok(()));
        assert_eq!(input, "c");
    }
}
