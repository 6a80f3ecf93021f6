//! The buffer pair one driver call works over.

/// Borrowed views of the caller's input and output buffers for the duration
/// of a single driver call.
///
/// Coders consume from the front of the input and append to the output
/// through this type only, so the engine can account for exactly how much
/// was moved. The unread and unwritten remainders never grow within a call.
pub struct Exchange<'a> {
    input: &'a [u8],
    output: &'a mut [u8],
    read: usize,
    written: usize,
}

impl<'a> Exchange<'a> {
    pub(crate) fn new(input: &'a [u8], output: &'a mut [u8]) -> Self {
        Self {
            input,
            output,
            read: 0,
            written: 0,
        }
    }

    /// The unconsumed remainder of the input buffer.
    pub fn input(&self) -> &[u8] {
        &self.input[self.read..]
    }

    /// The unwritten remainder of the output buffer.
    pub fn output(&mut self) -> &mut [u8] {
        &mut self.output[self.written..]
    }

    /// Both remainders at once, for codecs that hand separate source and
    /// destination views to an underlying library.
    pub fn parts(&mut self) -> (&[u8], &mut [u8]) {
        (&self.input[self.read..], &mut self.output[self.written..])
    }

    /// Marks `n` bytes of input as consumed.
    pub fn consume(&mut self, n: usize) {
        assert!(
            n <= self.input.len() - self.read,
            "attempted to consume past end of input"
        );
        self.read += n;
    }

    /// Marks `n` bytes of output as produced.
    pub fn produce(&mut self, n: usize) {
        assert!(
            n <= self.output.len() - self.written,
            "attempted to produce past end of output"
        );
        self.written += n;
    }

    /// Copies as much of `data` as fits into the output remainder, returning
    /// how many bytes were copied.
    pub fn emit(&mut self, data: &[u8]) -> usize {
        let n = data.len().min(self.output.len() - self.written);
        self.output[self.written..self.written + n].copy_from_slice(&data[..n]);
        self.written += n;
        n
    }

    pub fn consumed(&self) -> usize {
        self.read
    }

    pub fn produced(&self) -> usize {
        self.written
    }

    pub fn input_is_empty(&self) -> bool {
        self.read == self.input.len()
    }

    pub fn output_is_full(&self) -> bool {
        self.written == self.output.len()
    }
}
