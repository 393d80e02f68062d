#![doc = include_str!("../README.md")]
#![deny(missing_docs)]

pub mod combinator;
pub mod debug;
#[cfg(feature = "either")]
pub mod either;
pub mod error;
pub mod input;
pub mod primitive;
pub mod recursive;
pub mod span;

pub use crate::error::Error;

use std::cell::OnceCell;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::combinator::*;
use crate::debug::Traced;
use crate::error::{Located, UnexpectedMatch};
use crate::input::{Input, Tracking};
use crate::span::{Span, Spanned, WithSpan};

/// A trait implemented by parsers.
///
/// A parser reads elements off the front of an [`Input`] cursor and either produces an
/// output or fails with an [`Error`], leaving the cursor wherever its consumption
/// discipline says (see the [`combinator`] module docs for the leaf-versus-combinator
/// rollback split). Parsers are plain values: build them with the free functions in
/// [`primitive`], combine them with the methods below, run them as often as needed.
///
/// You cannot implement this trait yourself; use [`custom`](crate::primitive::custom)
/// for behaviour the built-in parsers cannot express.
pub trait Parser<I: Input> {
    /// The type of the value produced on success.
    type Output;

    /// Run this parser against the given cursor.
    ///
    /// On success the cursor has advanced past everything the parser consumed. On
    /// failure the cursor position depends on the parser: backtracking combinators
    /// restore it, leaves do not.
    fn parse(&self, input: &mut I) -> Result<Self::Output, Error>;

    /// Run this parser against an offset-tracking cursor, attaching the offset the
    /// parse started from to any failure.
    ///
    /// # Examples
    ///
    /// ```
    /// # use parsley::prelude::*;
    /// let word = take_while(|c: &char| c.is_alphabetic()).at_least(1);
    /// let mut input = Tracked::new("hello 123");
    /// word.parse_located(&mut input).unwrap();
    /// just(' ').parse_located(&mut input).unwrap();
    /// let err = word.parse_located(&mut input).unwrap_err();
    /// assert_eq!(err.offset(), 6);
    /// ```
    fn parse_located(&self, input: &mut I) -> Result<Self::Output, Located>
    where
        I: Tracking,
    {
        let start = input.offset();
        self.parse(input).map_err(|err| Located::at(start, err))
    }

    /// Run this parser against an offset-tracking cursor, pairing the output with the
    /// span of input it was parsed from, or the failure with its starting offset.
    ///
    /// # Examples
    ///
    /// ```
    /// # use parsley::prelude::*;
    /// let mut input = Tracked::new("abcdef");
    /// skip(2).parse(&mut input)?;
    /// let spanned = take(3).parse_spanned(&mut input).unwrap();
    /// assert_eq!(spanned.value, "cde");
    /// assert_eq!(spanned.span, Span::new(2, 5));
    /// # Ok::<(), parsley::Error>(())
    /// ```
    fn parse_spanned(&self, input: &mut I) -> Result<Spanned<Self::Output>, Located>
    where
        I: Tracking,
    {
        let start = input.offset();
        match self.parse(input) {
            Ok(value) => Ok(Spanned::new(value, Span::new(start, input.offset()))),
            Err(err) => Err(Located::at(start, err)),
        }
    }

    /// Map the output of this parser to another value.
    ///
    /// # Examples
    ///
    /// ```
    /// # use parsley::prelude::*;
    /// let digit = filter(|c: &char| c.is_ascii_digit()).boxed().map(|c| c as u8 - b'0');
    /// let mut input = "7";
    /// assert_eq!(digit.parse(&mut input), Ok(7));
    /// ```
    fn map<U, F: Fn(Self::Output) -> U>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
    {
        Map { parser: self, f }
    }

    /// Map the output of this parser to another value, with the possibility of
    /// failure.
    ///
    /// A rejection is an ordinary parse failure, but it does not undo the consumption
    /// of the underlying parser.
    ///
    /// # Examples
    ///
    /// ```
    /// # use parsley::prelude::*;
    /// let byte = take_while(|c: &char| c.is_ascii_digit())
    ///     .at_least(1)
    ///     .boxed()
    ///     .try_map(|s: &str| s.parse::<u8>().map_err(|e| Error::new(e.to_string())));
    /// let mut input = "255";
    /// assert_eq!(byte.parse(&mut input), Ok(255));
    /// ```
    fn try_map<U, F: Fn(Self::Output) -> Result<U, Error>>(self, f: F) -> TryMap<Self, F>
    where
        Self: Sized,
    {
        TryMap { parser: self, f }
    }

    /// Use the output of this parser to build the parser for what follows.
    ///
    /// This is how context-dependent formats (length-prefixed fields, version-switched
    /// layouts) are expressed. There is no backtracking across the two stages: once
    /// the first parser has succeeded, a failure of the built parser stands.
    ///
    /// # Examples
    ///
    /// ```
    /// # use parsley::prelude::*;
    /// // A length-prefixed field: one digit saying how many elements follow.
    /// let field = filter(|c: &char| c.is_ascii_digit())
    ///     .boxed()
    ///     .then_with(|d: char| take(d.to_digit(10).unwrap() as usize));
    /// let mut input = "4wxyz!";
    /// assert_eq!(field.parse(&mut input), Ok("wxyz"));
    /// assert_eq!(input, "!");
    /// ```
    fn then_with<Q: Parser<I>, F: Fn(Self::Output) -> Q>(self, f: F) -> ThenWith<Self, F>
    where
        Self: Sized,
    {
        ThenWith { parser: self, f }
    }

    /// Accept the output of this parser only if it satisfies the predicate; the
    /// failure message embeds the rejected value. Consumption stands on rejection.
    fn filter<F: Fn(&Self::Output) -> bool>(self, predicate: F) -> Filtered<Self, F>
    where
        Self: Sized,
    {
        Filtered {
            parser: self,
            predicate,
        }
    }

    /// Replace the output of this parser with a clone of the given value.
    fn to<O: Clone>(self, value: O) -> To<Self, O>
    where
        Self: Sized,
    {
        To {
            parser: self,
            value,
        }
    }

    /// Discard the output of this parser, producing `()` instead. Equivalent to
    /// `.to(())`.
    fn ignored(self) -> Ignored<Self>
    where
        Self: Sized,
    {
        self.to(())
    }

    /// Parse one thing and then another, producing both outputs as a pair.
    ///
    /// Failure of either side propagates without rollback; wrap the pair in an
    /// alternation if it must be atomic.
    ///
    /// # Examples
    ///
    /// ```
    /// # use parsley::prelude::*;
    /// let sign = just('-').boxed().or_not();
    /// let digits = take_while(|c: &char| c.is_ascii_digit()).at_least(1);
    /// let mut input = "-42";
    /// assert_eq!(sign.then(digits).parse(&mut input), Ok((Some('-'), "42")));
    /// ```
    fn then<Q: Parser<I>>(self, other: Q) -> Then<Self, Q>
    where
        Self: Sized,
    {
        Then {
            first: self,
            second: other,
        }
    }

    /// Parse one thing and then another, keeping only the second output.
    fn ignore_then<Q: Parser<I>>(self, other: Q) -> IgnoreThen<Self, Q>
    where
        Self: Sized,
    {
        IgnoreThen {
            first: self,
            second: other,
        }
    }

    /// Parse one thing and then another, keeping only the first output.
    fn then_ignore<Q: Parser<I>>(self, other: Q) -> ThenIgnore<Self, Q>
    where
        Self: Sized,
    {
        ThenIgnore {
            first: self,
            second: other,
        }
    }

    /// Parse this pattern between two delimiters, keeping only its own output.
    ///
    /// # Examples
    ///
    /// ```
    /// # use parsley::prelude::*;
    /// let body = take_while(|c: &char| *c != ']').boxed();
    /// let mut input = "[abc]";
    /// assert_eq!(body.delimited_by(just('['), just(']')).parse(&mut input), Ok("abc"));
    /// ```
    fn delimited_by<L: Parser<I>, R: Parser<I>>(self, open: L, close: R) -> DelimitedBy<Self, L, R>
    where
        Self: Sized,
    {
        DelimitedBy {
            parser: self,
            open,
            close,
        }
    }

    /// Try this parser, and on failure restore the cursor and try another.
    ///
    /// The restore happens no matter how much the failed branch consumed, so
    /// alternatives always start from the same position; if both fail, the cursor ends
    /// where it began and the error aggregates both branch errors. For more than two
    /// alternatives, prefer [`choice`](crate::primitive::choice).
    ///
    /// # Examples
    ///
    /// ```
    /// # use parsley::prelude::*;
    /// let boolean = seq("true").boxed().to(true).or(seq("false").boxed().to(false));
    /// let mut input = "false";
    /// assert_eq!(boolean.parse(&mut input), Ok(false));
    /// assert!(input.is_empty());
    /// ```
    fn or<Q: Parser<I, Output = Self::Output>>(self, other: Q) -> Or<Self, Q>
    where
        Self: Sized,
    {
        Or {
            first: self,
            second: other,
        }
    }

    /// Try this parser, and on failure restore the cursor and succeed with `None`.
    fn or_not(self) -> OrNot<Self>
    where
        Self: Sized,
    {
        OrNot { parser: self }
    }

    /// Negative lookahead: succeed with `()` only if this parser fails here. The
    /// cursor never moves, in either outcome.
    ///
    /// # Examples
    ///
    /// ```
    /// # use parsley::prelude::*;
    /// // Comment text: anything up to the closing marker.
    /// let text = seq("-->").boxed().not().ignore_then(any()).repeated();
    /// let mut input = "ab-->cd";
    /// assert_eq!(text.parse(&mut input), Ok(vec!['a', 'b']));
    /// assert_eq!(input, "-->cd");
    /// ```
    fn not(self) -> Not<Self>
    where
        Self: Sized,
    {
        Not { parser: self }
    }

    /// Positive lookahead: run this parser and expose its result, but always restore
    /// the cursor afterwards, success or failure.
    fn rewind(self) -> Rewind<Self>
    where
        Self: Sized,
    {
        Rewind { parser: self }
    }

    /// Parse this pattern zero or more times, collecting the outputs.
    ///
    /// Repetition is greedy and stops at the first failed attempt, rolling that
    /// attempt's partial consumption back. Constrain the count with
    /// [`at_least`](Repeated::at_least), [`at_most`](Repeated::at_most) and
    /// [`exactly`](Repeated::exactly); a violated minimum restores the cursor to
    /// where the repetition began.
    ///
    /// The repeated pattern must consume input when it matches, otherwise the
    /// repetition never terminates.
    ///
    /// # Examples
    ///
    /// ```
    /// # use parsley::prelude::*;
    /// let flags = just('-').boxed().ignore_then(any()).repeated();
    /// let mut input = "-v-q file";
    /// assert_eq!(flags.parse(&mut input), Ok(vec!['v', 'q']));
    /// assert_eq!(input, " file");
    /// ```
    fn repeated(self) -> Repeated<Self>
    where
        Self: Sized,
    {
        Repeated {
            parser: self,
            at_least: 0,
            at_most: None,
        }
    }

    /// Parse this pattern zero or more times, with the given separator between
    /// occurrences, collecting the outputs.
    ///
    /// A separator not followed by an item (a dangling separator) is rolled back and
    /// left unconsumed, unless [`allow_trailing`](SeparatedBy::allow_trailing) is set.
    ///
    /// # Examples
    ///
    /// ```
    /// # use parsley::prelude::*;
    /// let digit = filter(|c: &char| c.is_ascii_digit()).boxed();
    /// let mut input = "1,2,3";
    /// assert_eq!(digit.separated_by(just(',')).parse(&mut input), Ok(vec!['1', '2', '3']));
    /// assert!(input.is_empty());
    /// ```
    fn separated_by<S: Parser<I>>(self, separator: S) -> SeparatedBy<Self, S>
    where
        Self: Sized,
    {
        SeparatedBy {
            parser: self,
            separator,
            at_least: 0,
            at_most: None,
            allow_leading: false,
            allow_trailing: false,
        }
    }

    /// Pair the output with the [`Span`] of input it was parsed from. Requires an
    /// offset-tracking cursor such as [`Tracked`](crate::input::Tracked).
    fn with_span(self) -> WithSpan<Self>
    where
        Self: Sized,
        I: Tracking,
    {
        WithSpan { parser: self }
    }

    /// Log entry, success and failure of this parser through [`tracing`], at TRACE
    /// level, under the given name. Has no effect on the parse itself.
    fn traced(self, name: &'static str) -> Traced<Self>
    where
        Self: Sized,
    {
        Traced { parser: self, name }
    }

    /// Box this parser, erasing its type.
    ///
    /// The box is reference-counted, so cloning it shares the underlying parser
    /// rather than duplicating it. Useful for storing differently-shaped grammars in
    /// one place or keeping signatures readable.
    fn boxed<'a>(self) -> BoxedParser<'a, I, Self::Output>
    where
        Self: Sized + 'a,
    {
        BoxedParser(Rc::new(self))
    }
}

impl<I: Input, P: Parser<I> + ?Sized> Parser<I> for &P {
    type Output = P::Output;

    fn parse(&self, input: &mut I) -> Result<Self::Output, Error> {
        (**self).parse(input)
    }
}

impl<I: Input, P: Parser<I> + ?Sized> Parser<I> for Box<P> {
    type Output = P::Output;

    fn parse(&self, input: &mut I) -> Result<Self::Output, Error> {
        (**self).parse(input)
    }
}

impl<I: Input, P: Parser<I> + ?Sized> Parser<I> for Rc<P> {
    type Output = P::Output;

    fn parse(&self, input: &mut I) -> Result<Self::Output, Error> {
        (**self).parse(input)
    }
}

/// A parser that may or may not be there.
///
/// `None` consumes nothing and succeeds with `None`; `Some(p)` runs `p` and wraps its
/// output. This is conditional presence decided when the grammar is *built*, as
/// opposed to [`Parser::or_not`], which decides per input.
impl<I: Input, P: Parser<I>> Parser<I> for Option<P> {
    type Output = Option<P::Output>;

    fn parse(&self, input: &mut I) -> Result<Self::Output, Error> {
        match self {
            Some(parser) => parser.parse(input).map(Some),
            None => Ok(None),
        }
    }
}

/// See [`Parser::boxed`].
pub struct BoxedParser<'a, I: Input, O>(Rc<dyn Parser<I, Output = O> + 'a>);

impl<'a, I: Input, O> Clone for BoxedParser<'a, I, O> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<'a, I: Input, O> Parser<I> for BoxedParser<'a, I, O> {
    type Output = O;

    fn parse(&self, input: &mut I) -> Result<O, Error> {
        self.0.parse(input)
    }
}

/// Commonly used functions and types.
pub mod prelude {
    pub use super::error::{Context, Error, Located, UnexpectedMatch};
    pub use super::input::{Input, Tracked, Tracking};
    pub use super::primitive::{
        any, choice, custom, empty, end, fail, filter, group, just, rest, seq, skip, take,
        take_through, take_until, take_while,
    };
    pub use super::recursive::{lazy, recursive, Lazy, Recursive};
    pub use super::span::{Span, Spanned};
    pub use super::{BoxedParser, Parser};
}

/// Test-only identity helper: its `impl Parser<I>` return type carries the input
/// type so chains of combinator calls have `I` pinned for inference.
#[cfg(test)]
pub(crate) fn pin<I, P>(parser: P) -> impl Parser<I, Output = P::Output> + Copy
where
    I: Input,
    P: Parser<I> + Copy,
{
    parser
}

#[cfg(test)]
mod tests {
    use crate::pin;
    use crate::prelude::*;

    fn digit() -> impl Parser<&'static str, Output = u32> + Copy {
        pin(filter(|c: &char| c.is_ascii_digit())).map(|c| c as u32 - '0' as u32)
    }

    #[test]
    fn greedy_prefix_scenario() {
        let mut input = "123abc";
        let parsed = take_while(|c: &char| c.is_ascii_digit()).parse(&mut input);
        assert_eq!(parsed, Ok("123"));
        assert_eq!(input, "abc");
    }

    #[test]
    fn literal_mismatch_scenario() {
        // Bare, the mismatch stands where it happened; wrapped, it is restored.
        let mut input = "HTTQ";
        assert!(seq("HTTP").parse(&mut input).is_err());
        assert_eq!(input, "Q");

        let mut input = "HTTQ";
        assert_eq!(pin(seq("HTTP")).or_not().parse(&mut input), Ok(None));
        assert_eq!(input, "HTTQ");
    }

    #[test]
    fn boolean_alternation_scenario() {
        let boolean = choice((pin(seq("true")).to(true), pin(seq("false")).to(false)));
        let mut input = "false";
        assert_eq!(boolean.parse(&mut input), Ok(false));
        assert!(input.is_empty());
    }

    #[test]
    fn separated_digits_scenario() {
        let mut input = "1,2,3";
        let parsed = digit().separated_by(just(',')).parse(&mut input);
        assert_eq!(parsed, Ok(vec![1, 2, 3]));
        assert!(input.is_empty());
    }

    #[test]
    fn separated_minimum_on_empty_scenario() {
        let mut input = "";
        let parsed = digit().separated_by(just(',')).at_least(1).parse(&mut input);
        assert!(parsed.is_err());
    }

    #[test]
    fn comment_text_scenario() {
        let text = pin(seq("-->")).not().ignore_then(any()).repeated();
        let mut input = "ab-->cd";
        assert_eq!(text.parse(&mut input), Ok(vec!['a', 'b']));
        assert_eq!(input, "-->cd");
    }

    #[test]
    fn choice_atomicity_property() {
        // The first branch shares a long prefix with the input before failing; the
        // cursor the second branch sees must be as if the first never ran.
        let parser = choice((pin(seq("integer")).to(0), pin(seq("interface")).to(1)));
        let mut input = "interface x";
        assert_eq!(parser.parse(&mut input), Ok(1));
        assert_eq!(input, " x");
    }

    #[test]
    fn rewind_matches_raw_parse() {
        let parser = pin(seq("ab")).then(any());
        let mut peeked = "abc";
        let mut raw = "abc";
        assert_eq!(parser.rewind().parse(&mut peeked), parser.parse(&mut raw));
        assert_eq!(peeked, "abc");

        let mut peeked = "aX";
        let mut raw = "aX";
        assert_eq!(
            parser.rewind().parse(&mut peeked),
            parser.parse(&mut raw),
            "rewind must expose the same result the raw parse produces",
        );
        assert_eq!(peeked, "aX");
    }

    #[test]
    fn aggregation_is_complete_and_ordered() {
        let parser = choice((
            pin(seq("alpha")).ignored(),
            pin(seq("beta")).ignored(),
            pin(seq("gamma")).ignored(),
            pin(seq("delta")).ignored(),
        ));
        let mut input = "omega";
        let err = parser.parse(&mut input).unwrap_err();
        assert_eq!(err.message(), "no alternative matched");
        let expectations: Vec<_> = err
            .underlying()
            .iter()
            .map(|under| under.message().to_string())
            .collect();
        assert_eq!(expectations.len(), 4);
        assert!(expectations[0].contains("alpha"));
        assert!(expectations[3].contains("delta"));
    }

    #[test]
    fn round_trip_identifier_list() {
        let ident = pin(take_while(|c: &char| c.is_ascii_alphanumeric()).at_least(1));
        let parser = ident.separated_by(just(',')).at_least(1);
        let print = |names: &[&str]| names.join(",");

        let values = vec!["width", "height", "x2"];
        let printed = print(&values);
        let mut input = printed.as_str();
        assert_eq!(parser.parse(&mut input), Ok(values.clone()));
        assert!(input.is_empty());

        // And back again: printing the parse of a printed value is the identity.
        let mut input = printed.as_str();
        assert_eq!(print(&parser.parse(&mut input).unwrap()), printed);
    }

    #[test]
    fn leaf_rollback_asymmetry() {
        // Adversarial mix: a leaf that consumed partway sits under a combinator that
        // restores, which sits under another leaf that does not.
        let inner = pin(seq("ab")).then(seq("cd")).or_not();
        let outer = pin(seq("xy")).ignore_then(inner);

        // The inner `seq("cd")` fails after `seq("ab")` consumed; `or_not` restores
        // both, but the outer `seq("xy")` consumption stands.
        let mut input = "xyabce";
        assert_eq!(outer.parse(&mut input), Ok(None));
        assert_eq!(input, "abce");
    }

    #[test]
    fn then_does_not_roll_back() {
        let parser = pin(just('a')).then(just('b'));
        let mut input = "ax";
        assert!(parser.parse(&mut input).is_err());
        assert_eq!(input, "x", "sequencing must not restore the first half");
    }

    #[test]
    fn works_over_token_slices() {
        #[derive(Clone, Debug, PartialEq)]
        enum Token {
            Ident(&'static str),
            Comma,
        }

        let tokens = [
            Token::Ident("a"),
            Token::Comma,
            Token::Ident("b"),
        ];
        let ident = pin(filter(|t: &Token| matches!(t, Token::Ident(_))));
        let parser = ident.separated_by(just(Token::Comma));
        let mut input: &[Token] = &tokens;
        let parsed = parser.parse(&mut input).unwrap();
        assert_eq!(parsed, [Token::Ident("a"), Token::Ident("b")]);
        assert!(input.is_empty());
    }

    #[test]
    fn boxed_parsers_share_and_compose() {
        let word = take_while(|c: &char| c.is_ascii_alphabetic()).at_least(1).boxed();
        let twice = word.clone().then_ignore(just(' ')).then(word);

        let mut input = "hello world";
        assert_eq!(twice.parse(&mut input), Ok(("hello", "world")));
    }

    #[test]
    fn optional_parser_at_build_time() {
        fn line(eat_terminator: bool) -> impl Parser<&'static str, Output = &'static str> {
            let terminator = if eat_terminator { Some(just(';')) } else { None };
            pin(take_until(";")).then_ignore(terminator)
        }

        let mut input = "abc;";
        assert_eq!(line(true).parse(&mut input), Ok("abc"));
        assert!(input.is_empty());

        let mut input = "abc;";
        assert_eq!(line(false).parse(&mut input), Ok("abc"));
        assert_eq!(input, ";", "an absent parser consumes nothing");
    }

    #[test]
    fn located_failures_report_start_offset() {
        let line = pin(take_while(|c: &char| c.is_ascii_alphabetic()).at_least(1))
            .separated_by(just(' '))
            .then_ignore(end());

        let mut input = Tracked::new("one two 3");
        let err = line.parse_located(&mut input).unwrap_err();
        // The list stops before "3" and `end` objects from where parsing halted.
        assert_eq!(err.offset(), 0);
        assert!(err.error().message().contains("end of input"));
    }

    #[test]
    fn spanned_success() {
        let word = take_while(|c: &char| c.is_ascii_alphabetic()).at_least(1);
        let mut input = Tracked::new("abc def");
        let first = word.parse_spanned(&mut input).unwrap();
        assert_eq!((first.value, first.span), ("abc", Span::new(0, 3)));
        just(' ').parse(&mut input).unwrap();
        let second = word.parse_spanned(&mut input).unwrap();
        assert_eq!((second.value, second.span), ("def", Span::new(4, 7)));
    }
}
