//! Whole-buffer fallback for codecs without native streaming support.

use crate::codec::Coder;
use crate::{Exchange, Status, UnipressResult};

/// Stages input across `process` calls and runs the codec's one-shot
/// [`transform`](Coder::transform) when the stream is finished, draining the
/// result through the ordinary buffer exchange. Whole-buffer codecs thereby
/// satisfy the same incremental contract as streaming ones, at the cost of
/// holding the payload in memory.
#[derive(Default)]
pub(crate) struct BufferedFallback {
    staged: Vec<u8>,
    result: Vec<u8>,
    drained: usize,
    transformed: bool,
}

impl BufferedFallback {
    /// Swallows all pending input. A whole-buffer codec cannot produce
    /// anything until it has seen the entire payload, so this never writes.
    pub fn process(&mut self, io: &mut Exchange) -> UnipressResult<Status> {
        let n = io.input().len();
        self.staged.extend_from_slice(io.input());
        io.consume(n);
        Ok(Status::Ok)
    }

    /// Runs the one-shot transform on the first finish call, then emits as
    /// much of the result as the output side will take.
    pub fn finish(&mut self, coder: &mut dyn Coder, io: &mut Exchange) -> UnipressResult<Status> {
        // Input may still arrive together with the finish call.
        self.process(io)?;
        if !self.transformed {
            self.result = coder.transform(&self.staged)?;
            self.transformed = true;
            self.staged = Vec::new();
        }
        let n = io.emit(&self.result[self.drained..]);
        self.drained += n;
        if self.drained == self.result.len() {
            Ok(Status::Ok)
        } else {
            Ok(Status::Processing)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Capability;
    use enumset::EnumSet;

    /// Reverses the whole payload; transformable only in one piece.
    struct Reverser;

    impl Coder for Reverser {
        fn name(&self) -> &'static str {
            "reverse"
        }

        fn capabilities(&self) -> EnumSet<Capability> {
            EnumSet::empty()
        }

        fn transform(&mut self, input: &[u8]) -> UnipressResult<Vec<u8>> {
            Ok(input.iter().rev().copied().collect())
        }
    }

    #[test]
    fn stages_then_drains() {
        let mut fallback = BufferedFallback::default();
        let mut coder = Reverser;

        let mut out = [0u8; 2];
        let mut io = Exchange::new(b"abcde", &mut out);
        assert_eq!(fallback.process(&mut io).unwrap(), Status::Ok);
        assert_eq!(io.consumed(), 5);
        assert_eq!(io.produced(), 0);
        drop(io);

        // First finish transforms and fills the whole (small) output window.
        let mut io = Exchange::new(&[], &mut out);
        assert_eq!(fallback.finish(&mut coder, &mut io).unwrap(), Status::Processing);
        assert_eq!(io.produced(), 2);
        drop(io);
        assert_eq!(out, *b"ed");

        let mut big = [0u8; 8];
        let mut io = Exchange::new(&[], &mut big);
        assert_eq!(fallback.finish(&mut coder, &mut io).unwrap(), Status::Ok);
        assert_eq!(io.produced(), 3);
        drop(io);
        assert_eq!(&big[..3], b"cba");
    }
}
