//! Input cursors and the contract consumable sequences must satisfy.

use super::*;

/// A consumable sequence of elements, used as the cursor a parse operates on.
///
/// An `Input` is a *position* into an immutable sequence: consuming a prefix advances an
/// index or pointer, it never copies element data. Cloning an `Input` captures the current
/// position in O(1), and assigning a clone back restores it. This is the backtracking
/// contract that combinators such as [`Parser::or`](crate::Parser::or) rely on.
///
/// Backings for which cloning or prefix-removal is not O(1) (linked lists, ropes) should
/// not implement this trait.
///
/// # Examples
///
/// ```
/// # use parsley::prelude::*;
/// let mut input = "hello";
/// assert_eq!(input.first(), Some('h'));
/// assert_eq!(input.bump(), 'h');
/// assert_eq!(input, "ello");
///
/// let saved = input;
/// input.bump_by(4);
/// assert!(input.is_empty());
/// input = saved; // O(1) restore
/// assert_eq!(input, "ello");
/// ```
pub trait Input: Clone {
    /// The element type this input yields.
    type Token: Clone;
    /// The zero-copy sub-sequence type returned by [`Input::slice_until`].
    type Slice;

    /// Whether any elements remain. Always O(1).
    fn is_empty(&self) -> bool;

    /// The number of remaining elements, or `None` if that is not O(1)-knowable (as for
    /// `&str`, where counting chars would require a traversal).
    fn len(&self) -> Option<usize>;

    /// Peek at the next element without consuming it.
    fn first(&self) -> Option<Self::Token>;

    /// Consume and return the next element.
    ///
    /// # Panics
    ///
    /// Panics if the input is empty. Callers must check [`Input::is_empty`] first; an
    /// empty `bump` is a misuse of the cursor, not a recoverable parse failure.
    fn bump(&mut self) -> Self::Token;

    /// Consume the next `n` elements.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `n` elements remain.
    fn bump_by(&mut self, n: usize) {
        for _ in 0..n {
            self.bump();
        }
    }

    /// The prefix consumed between `self` and `rest`, where `rest` is a later state of
    /// the same input, as a zero-copy sub-sequence.
    fn slice_until(&self, rest: &Self) -> Self::Slice;
}

impl<'a, T: Clone> Input for &'a [T] {
    type Token = T;
    type Slice = &'a [T];

    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }

    fn len(&self) -> Option<usize> {
        Some((**self).len())
    }

    fn first(&self) -> Option<T> {
        (**self).first().cloned()
    }

    fn bump(&mut self) -> T {
        let (first, rest) = self
            .split_first()
            .expect("`bump` called on an empty input");
        *self = rest;
        first.clone()
    }

    fn bump_by(&mut self, n: usize) {
        assert!(
            n <= (**self).len(),
            "`bump_by({})` called with only {} elements remaining",
            n,
            (**self).len(),
        );
        *self = &self[n..];
    }

    fn slice_until(&self, rest: &Self) -> &'a [T] {
        let taken = (**self).len() - (**rest).len();
        let whole: &'a [T] = self;
        &whole[..taken]
    }
}

impl<'a> Input for &'a str {
    type Token = char;
    type Slice = &'a str;

    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }

    // Counting chars is O(n), so strings report an unknown length.
    fn len(&self) -> Option<usize> {
        None
    }

    fn first(&self) -> Option<char> {
        self.chars().next()
    }

    fn bump(&mut self) -> char {
        let c = self
            .chars()
            .next()
            .expect("`bump` called on an empty input");
        *self = &self[c.len_utf8()..];
        c
    }

    fn slice_until(&self, rest: &Self) -> &'a str {
        let taken = (**self).len() - (**rest).len();
        let whole: &'a str = self;
        &whole[..taken]
    }
}

#[cfg(feature = "bytes")]
impl Input for bytes::Bytes {
    type Token = u8;
    type Slice = bytes::Bytes;

    fn is_empty(&self) -> bool {
        AsRef::<[u8]>::as_ref(self).is_empty()
    }

    fn len(&self) -> Option<usize> {
        Some(AsRef::<[u8]>::as_ref(self).len())
    }

    fn first(&self) -> Option<u8> {
        AsRef::<[u8]>::as_ref(self).first().copied()
    }

    fn bump(&mut self) -> u8 {
        assert!(
            !AsRef::<[u8]>::as_ref(self).is_empty(),
            "`bump` called on an empty input"
        );
        let b = self[0];
        bytes::Buf::advance(self, 1);
        b
    }

    fn bump_by(&mut self, n: usize) {
        assert!(
            n <= AsRef::<[u8]>::as_ref(self).len(),
            "`bump_by({})` called with only {} elements remaining",
            n,
            AsRef::<[u8]>::as_ref(self).len(),
        );
        bytes::Buf::advance(self, n);
    }

    fn slice_until(&self, rest: &Self) -> bytes::Bytes {
        let taken = AsRef::<[u8]>::as_ref(self).len() - AsRef::<[u8]>::as_ref(rest).len();
        self.slice(..taken)
    }
}

/// An [`Input`] that knows its absolute position, required by the location-tracking
/// parse entry points and [`Parser::with_span`](crate::Parser::with_span).
pub trait Tracking: Input {
    /// The number of elements consumed since the start of the parse.
    fn offset(&self) -> usize;
}

/// An [`Input`] wrapper that maintains a running element offset, enabling
/// [`Parser::parse_located`](crate::Parser::parse_located),
/// [`Parser::parse_spanned`](crate::Parser::parse_spanned) and
/// [`Parser::with_span`](crate::Parser::with_span).
///
/// Offsets count *tokens*: bytes for byte inputs, chars for `&str`.
///
/// # Examples
///
/// ```
/// # use parsley::prelude::*;
/// let mut input = Tracked::new("abc");
/// input.bump();
/// input.bump();
/// assert_eq!(input.offset(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tracked<I> {
    input: I,
    offset: usize,
}

impl<I: Input> Tracked<I> {
    /// Wrap an input, starting the offset at zero.
    pub fn new(input: I) -> Self {
        Self { input, offset: 0 }
    }

    /// A reference to the wrapped input.
    pub fn inner(&self) -> &I {
        &self.input
    }

    /// Unwrap, discarding the offset.
    pub fn into_inner(self) -> I {
        self.input
    }
}

impl<I: Input> Input for Tracked<I> {
    type Token = I::Token;
    type Slice = I::Slice;

    fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    fn len(&self) -> Option<usize> {
        self.input.len()
    }

    fn first(&self) -> Option<I::Token> {
        self.input.first()
    }

    fn bump(&mut self) -> I::Token {
        let token = self.input.bump();
        self.offset += 1;
        token
    }

    fn bump_by(&mut self, n: usize) {
        self.input.bump_by(n);
        self.offset += n;
    }

    fn slice_until(&self, rest: &Self) -> I::Slice {
        self.input.slice_until(&rest.input)
    }
}

impl<I: Input> Tracking for Tracked<I> {
    fn offset(&self) -> usize {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_cursor() {
        let mut input: &[u8] = b"hello";
        assert_eq!(Input::len(&input), Some(5));
        assert_eq!(Input::first(&input), Some(b'h'));
        assert_eq!(input.bump(), b'h');
        input.bump_by(2);
        assert_eq!(input, b"lo");
    }

    #[test]
    fn slice_until_is_zero_copy() {
        let full: &[u8] = b"hello";
        let mut input = full;
        input.bump_by(3);
        let taken = full.slice_until(&input);
        assert_eq!(taken, b"hel");
        assert_eq!(taken.as_ptr(), full.as_ptr());
    }

    #[test]
    fn str_cursor_is_char_based() {
        let mut input = "éxy";
        assert_eq!(input.first(), Some('é'));
        assert_eq!(input.bump(), 'é');
        assert_eq!(input, "xy");
        assert_eq!(Input::len(&input), None);
    }

    #[test]
    fn str_slice_until() {
        let full = "héllo";
        let mut input = full;
        input.bump_by(2);
        assert_eq!(full.slice_until(&input), "hé");
        assert_eq!(input, "llo");
    }

    #[test]
    fn restore_is_structural() {
        let mut input = "abc";
        let saved = input;
        input.bump_by(3);
        assert!(input.is_empty());
        input = saved;
        assert_eq!(input, "abc");
    }

    #[test]
    fn tracked_offsets() {
        let mut input = Tracked::new("abcd");
        input.bump();
        input.bump_by(2);
        assert_eq!(input.offset(), 3);
        assert_eq!(*input.inner(), "d");
    }

    #[test]
    #[should_panic(expected = "empty input")]
    fn bump_on_empty_traps() {
        let mut input = "";
        input.bump();
    }

    #[test]
    #[should_panic(expected = "elements remaining")]
    fn bump_by_past_end_traps() {
        let mut input: &[u8] = b"ab";
        input.bump_by(3);
    }

    #[cfg(feature = "bytes")]
    #[test]
    fn bytes_cursor() {
        let full = bytes::Bytes::from_static(b"hello");
        let mut input = full.clone();
        assert_eq!(input.bump(), b'h');
        input.bump_by(2);
        assert_eq!(full.slice_until(&input), bytes::Bytes::from_static(b"hel"));
    }
}
