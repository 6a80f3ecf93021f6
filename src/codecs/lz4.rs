//! LZ4 block compression via `lz4_flex`.

use enumset::EnumSet;
use lz4_flex::block::{compress_prepend_size, decompress_size_prepended};

use crate::codec::{Capability, Codec, Coder};
use crate::options::CodecOptions;
use crate::{Direction, UnipressError, UnipressResult};

/// LZ4 in the block format, which prepends the decompressed size and
/// therefore needs the whole payload at once. The codec advertises no
/// streaming capabilities; the engine's staging fallback collects input
/// until finish and drains the one-shot result incrementally.
pub struct Lz4Codec;

impl Codec for Lz4Codec {
    fn name(&self) -> &str {
        "lz4"
    }

    fn create(
        &self,
        direction: Direction,
        _options: Option<&CodecOptions>,
    ) -> UnipressResult<Box<dyn Coder>> {
        Ok(Box::new(Lz4Block { direction }))
    }
}

struct Lz4Block {
    direction: Direction,
}

impl Coder for Lz4Block {
    fn name(&self) -> &'static str {
        "lz4"
    }

    fn capabilities(&self) -> EnumSet<Capability> {
        EnumSet::empty()
    }

    fn transform(&mut self, input: &[u8]) -> UnipressResult<Vec<u8>> {
        match self.direction {
            Direction::Compress => Ok(compress_prepend_size(input)),
            Direction::Decompress => decompress_size_prepended(input)
                .map_err(|err| UnipressError::Codec(err.to_string())),
        }
    }
}
