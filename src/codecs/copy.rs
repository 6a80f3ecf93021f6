//! The identity codec.

use enumset::EnumSet;

use crate::codec::{Capability, Codec, Coder};
use crate::options::CodecOptions;
use crate::{Direction, Exchange, Status, UnipressResult};

/// Output is input, byte for byte. Useful wherever a codec is required but
/// nothing should change, and as the simplest fully streaming plugin.
pub struct CopyCodec;

impl Codec for CopyCodec {
    fn name(&self) -> &str {
        "copy"
    }

    fn create(
        &self,
        _direction: Direction,
        _options: Option<&CodecOptions>,
    ) -> UnipressResult<Box<dyn Coder>> {
        Ok(Box::new(CopyCoder))
    }
}

struct CopyCoder;

impl Coder for CopyCoder {
    fn name(&self) -> &'static str {
        "copy"
    }

    fn capabilities(&self) -> EnumSet<Capability> {
        Capability::Process | Capability::Flush | Capability::Finish
    }

    fn process(&mut self, io: &mut Exchange) -> UnipressResult<Status> {
        let (src, dst) = io.parts();
        let n = src.len().min(dst.len());
        dst[..n].copy_from_slice(&src[..n]);
        io.consume(n);
        io.produce(n);
        if io.input_is_empty() {
            Ok(Status::Ok)
        } else {
            Ok(Status::Processing)
        }
    }

    fn flush(&mut self, _io: &mut Exchange) -> UnipressResult<Status> {
        // Nothing is ever held back.
        Ok(Status::Ok)
    }

    fn finish(&mut self, io: &mut Exchange) -> UnipressResult<Status> {
        self.process(io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Stream, StreamState};

    #[test]
    fn copies_across_small_windows() {
        let mut stream = Stream::new(&CopyCodec, Direction::Compress, None).unwrap();
        let data = b"0123456789";
        let mut out = Vec::new();
        let mut window = [0u8; 3];
        loop {
            let consumed = stream.total_in() as usize;
            let before = stream.total_out() as usize;
            let status = stream.process(&data[consumed..], &mut window).unwrap();
            out.extend_from_slice(&window[..stream.total_out() as usize - before]);
            if status == Status::Ok {
                break;
            }
        }
        assert_eq!(out, data);
        assert_eq!(stream.total_in(), stream.total_out());

        assert_eq!(stream.finish(&[], &mut window).unwrap(), Status::Ok);
        assert_eq!(stream.state(), StreamState::Finished);
    }
}
