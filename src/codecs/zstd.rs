//! Streaming Zstandard through `zstd_safe`'s context API.

use enumset::EnumSet;
use zstd::zstd_safe::{get_error_name, CParameter, CStream, DStream, InBuffer, OutBuffer, SafeResult};

use crate::codec::{Capability, Codec, Coder};
use crate::options::CodecOptions;
use crate::{Direction, Exchange, Status, UnipressError, UnipressResult};

/// Zstandard. Fully streaming in both directions; compression additionally
/// supports flushing at block boundaries.
///
/// Options: `level`, a compression level within
/// [`zstd::compression_level_range`].
pub struct ZstdCodec;

impl Codec for ZstdCodec {
    fn name(&self) -> &str {
        "zstd"
    }

    fn validate_option(&self, key: &str, value: &str) -> UnipressResult<()> {
        match key {
            "level" => {
                let range = zstd::compression_level_range();
                match value.parse::<i32>() {
                    Ok(level) if range.contains(&level) => Ok(()),
                    _ => Err(UnipressError::BadOption {
                        codec: self.name().into(),
                        key: key.into(),
                        reason: format!("expected an integer in {range:?}"),
                    }),
                }
            }
            _ => Err(UnipressError::BadOption {
                codec: self.name().into(),
                key: key.into(),
                reason: "unknown option".into(),
            }),
        }
    }

    fn create(
        &self,
        direction: Direction,
        options: Option<&CodecOptions>,
    ) -> UnipressResult<Box<dyn Coder>> {
        match direction {
            Direction::Compress => {
                let level = match options.and_then(|o| o.get("level")) {
                    Some(value) => value.parse().map_err(|_| UnipressError::BadOption {
                        codec: self.name().into(),
                        key: "level".into(),
                        reason: format!("not an integer: {value:?}"),
                    })?,
                    None => zstd::DEFAULT_COMPRESSION_LEVEL,
                };
                Ok(Box::new(ZstdEncoder::new(level)?))
            }
            Direction::Decompress => Ok(Box::new(ZstdDecoder::new())),
        }
    }
}

fn handle_error(res: SafeResult) -> UnipressResult<usize> {
    match res {
        Ok(n) => Ok(n),
        Err(code) => Err(UnipressError::Codec(get_error_name(code).into())),
    }
}

struct ZstdEncoder {
    c: CStream<'static>,
}

impl ZstdEncoder {
    fn new(level: i32) -> UnipressResult<Self> {
        let mut c = CStream::create();
        handle_error(c.set_parameter(CParameter::CompressionLevel(level)))?;
        Ok(Self { c })
    }
}

impl Coder for ZstdEncoder {
    fn name(&self) -> &'static str {
        "zstd"
    }

    fn capabilities(&self) -> EnumSet<Capability> {
        Capability::Process | Capability::Flush | Capability::Finish
    }

    fn process(&mut self, io: &mut Exchange) -> UnipressResult<Status> {
        let (src, dst) = io.parts();
        let mut input = InBuffer::around(src);
        let mut output = OutBuffer::around(dst);
        handle_error(self.c.compress_stream(&mut output, &mut input))?;
        let consumed = input.pos;
        let produced = output.pos();
        io.consume(consumed);
        io.produce(produced);
        if io.input_is_empty() {
            Ok(Status::Ok)
        } else {
            Ok(Status::Processing)
        }
    }

    fn flush(&mut self, io: &mut Exchange) -> UnipressResult<Status> {
        let mut output = OutBuffer::around(io.output());
        let remaining = handle_error(self.c.flush_stream(&mut output))?;
        let produced = output.pos();
        io.produce(produced);
        if remaining == 0 {
            Ok(Status::Ok)
        } else {
            Ok(Status::Processing)
        }
    }

    fn finish(&mut self, io: &mut Exchange) -> UnipressResult<Status> {
        // Input may still arrive together with the finish call.
        if !io.input_is_empty() {
            if let Status::Processing = self.process(io)? {
                return Ok(Status::Processing);
            }
        }
        let mut output = OutBuffer::around(io.output());
        let remaining = handle_error(self.c.end_stream(&mut output))?;
        let produced = output.pos();
        io.produce(produced);
        if remaining == 0 {
            Ok(Status::Ok)
        } else {
            Ok(Status::Processing)
        }
    }
}

struct ZstdDecoder {
    c: DStream<'static>,
}

impl ZstdDecoder {
    fn new() -> Self {
        Self {
            c: DStream::create(),
        }
    }
}

impl Coder for ZstdDecoder {
    fn name(&self) -> &'static str {
        "zstd"
    }

    // Decompression has nothing to flush.
    fn capabilities(&self) -> EnumSet<Capability> {
        Capability::Process | Capability::Finish
    }

    fn process(&mut self, io: &mut Exchange) -> UnipressResult<Status> {
        let (src, dst) = io.parts();
        let mut input = InBuffer::around(src);
        let mut output = OutBuffer::around(dst);
        let hint = handle_error(self.c.decompress_stream(&mut output, &mut input))?;
        let consumed = input.pos;
        let produced = output.pos();
        io.consume(consumed);
        io.produce(produced);
        if hint == 0 {
            // The frame is complete; any input past it is not ours.
            Ok(Status::EndOfStream)
        } else if io.input_is_empty() {
            Ok(Status::Ok)
        } else {
            Ok(Status::Processing)
        }
    }

    fn finish(&mut self, io: &mut Exchange) -> UnipressResult<Status> {
        match self.process(io)? {
            Status::EndOfStream => Ok(Status::Ok),
            Status::Processing => Ok(Status::Processing),
            // All input consumed but the frame never ended.
            Status::Ok => Err(UnipressError::Codec("incomplete zstd frame".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compress_to_vec, decompress_to_vec};
    use assert_matches::assert_matches;
    use std::sync::Arc;

    #[test]
    fn round_trips_through_the_engine() {
        let data: Vec<u8> = (0..10_000u32).flat_map(|n| n.to_le_bytes()).collect();
        let pressed = compress_to_vec(&ZstdCodec, &data, None).unwrap();
        assert!(pressed.len() < data.len());
        let restored = decompress_to_vec(&ZstdCodec, &pressed, None).unwrap();
        assert_eq!(restored, data);
    }

    #[test]
    fn level_option_is_honored() {
        let data = vec![7u8; 1 << 16];
        let options = Arc::new(CodecOptions::from_pairs(&ZstdCodec, [("level", "19")]).unwrap());
        let pressed = compress_to_vec(&ZstdCodec, &data, Some(options)).unwrap();
        let restored = decompress_to_vec(&ZstdCodec, &pressed, None).unwrap();
        assert_eq!(restored, data);
    }

    #[test]
    fn bad_level_is_rejected_at_build_time() {
        assert_matches!(
            CodecOptions::from_pairs(&ZstdCodec, [("level", "a lot")]),
            Err(UnipressError::BadOption { key, .. }) => assert_eq!(key, "level")
        );
        assert_matches!(
            CodecOptions::from_pairs(&ZstdCodec, [("level", "9999")]),
            Err(UnipressError::BadOption { .. })
        );
    }

    #[test]
    fn truncated_frame_fails_to_finish() {
        let pressed = compress_to_vec(&ZstdCodec, b"some reasonable payload", None).unwrap();
        let err = decompress_to_vec(&ZstdCodec, &pressed[..pressed.len() - 1], None).unwrap_err();
        assert_matches!(err, UnipressError::Codec(_));
    }
}
