//! Utilities for tracing a parse as it runs.

use super::*;

/// See [`Parser::traced`].
#[derive(Copy, Clone)]
pub struct Traced<P> {
    pub(crate) parser: P,
    pub(crate) name: &'static str,
}

impl<I, P> Parser<I> for Traced<P>
where
    I: Input,
    P: Parser<I>,
{
    type Output = P::Output;

    fn parse(&self, input: &mut I) -> Result<P::Output, Error> {
        let span = tracing::trace_span!("parse", parser = self.name);
        let _guard = span.enter();
        tracing::trace!(remaining = ?input.len(), "entering");
        match self.parser.parse(input) {
            Ok(out) => {
                tracing::trace!(remaining = ?input.len(), "matched");
                Ok(out)
            }
            Err(err) => {
                tracing::trace!(error = %err, "failed");
                Err(err)
            }
        }
    }
}
