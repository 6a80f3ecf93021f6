//! One-shot conveniences for callers with a whole payload in hand.

use std::sync::Arc;

use crate::codec::Codec;
use crate::options::CodecOptions;
use crate::{Direction, Status, Stream, UnipressResult};

// Output window for each drive of the stream; results grow past this fine.
const WINDOW: usize = 64 * 1024;

/// Compresses all of `data` with `codec`, collecting the result.
pub fn compress_to_vec(
    codec: &dyn Codec,
    data: &[u8],
    options: Option<Arc<CodecOptions>>,
) -> UnipressResult<Vec<u8>> {
    run_to_vec(codec, Direction::Compress, data, options)
}

/// Decompresses all of `data` with `codec`, collecting the result.
pub fn decompress_to_vec(
    codec: &dyn Codec,
    data: &[u8],
    options: Option<Arc<CodecOptions>>,
) -> UnipressResult<Vec<u8>> {
    run_to_vec(codec, Direction::Decompress, data, options)
}

fn run_to_vec(
    codec: &dyn Codec,
    direction: Direction,
    data: &[u8],
    options: Option<Arc<CodecOptions>>,
) -> UnipressResult<Vec<u8>> {
    let mut stream = Stream::new(codec, direction, options)?;
    let mut out = Vec::new();
    let mut window = vec![0u8; WINDOW];
    loop {
        let remaining = &data[stream.total_in() as usize..];
        let before = stream.total_out();
        let status = stream.finish(remaining, &mut window)?;
        let produced = (stream.total_out() - before) as usize;
        out.extend_from_slice(&window[..produced]);
        match status {
            Status::Processing => continue,
            Status::Ok | Status::EndOfStream => return Ok(out),
        }
    }
}
