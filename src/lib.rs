//! A codec-agnostic engine for incremental compression and decompression.
//!
//! Compression libraries disagree about nearly everything: how contexts are
//! created, how partial progress is reported, whether flushing exists, and
//! whether the whole payload must be in memory at once. This crate puts one
//! uniform buffer-exchange protocol in front of all of them. Callers hand a
//! [`Stream`] bounded input and output slices, as often as they like and as
//! small as they like, and the stream reports exactly how much progress was
//! made and what to do next.
//!
//! Codecs plug in through the [`Codec`]/[`Coder`] traits and advertise which
//! of the three operations (process, flush, finish) they implement; the
//! engine routes around the gaps, falling back to an internal staging buffer
//! for codecs that can only transform whole payloads.
//!
//! ```
//! use unipress::{CodecRegistry, Direction, Status, Stream};
//!
//! # fn main() -> unipress::UnipressResult<()> {
//! let registry = CodecRegistry::with_default_codecs();
//! let codec = registry.resolve("copy")?;
//! let mut stream = Stream::new(codec.as_ref(), Direction::Compress, None)?;
//!
//! let mut out = [0u8; 16];
//! assert_eq!(stream.process(b"hello", &mut out)?, Status::Ok);
//! assert_eq!(stream.finish(&[], &mut out)?, Status::Ok);
//! assert_eq!(&out[..stream.total_out() as usize], b"hello");
//! # Ok(())
//! # }
//! ```

mod adapter;
pub mod codec;
pub mod codecs;
mod exchange;
mod oneshot;
pub mod options;
pub mod registry;
pub mod stream;

pub use codec::{Capability, Codec, Coder};
pub use exchange::Exchange;
pub use oneshot::{compress_to_vec, decompress_to_vec};
pub use options::CodecOptions;
pub use registry::CodecRegistry;
pub use stream::{Operation, Stream, StreamState};

/// Which way a stream transforms bytes. Fixed when the stream is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Compress,
    Decompress,
}

/// Progress report from a driver operation that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The operation completed and all input was consumed. Drain the output
    /// buffer, then continue with new input.
    Ok,
    /// Partial progress; the output buffer filled up first. Drain it and
    /// repeat the call at the same or a higher operation.
    Processing,
    /// The end of the encoded stream was reached; nothing further will be
    /// produced. Decompression only.
    EndOfStream,
}

/// Everything that can go wrong resolving codecs, building options, and
/// driving streams.
#[derive(Debug, thiserror::Error)]
pub enum UnipressError {
    /// The codec does not implement the requested operation. Not retryable;
    /// flushing in particular is optional per codec.
    #[error("codec {codec:?} does not support {operation}")]
    Unsupported {
        codec: String,
        operation: Operation,
    },

    /// The stream has already advanced past the requested operation. A
    /// repeated or out-of-order request is a caller bug, not a transient
    /// condition.
    #[error("stream is already {state:?}; {requested} cannot run now")]
    StaleOperation {
        state: StreamState,
        requested: Operation,
    },

    /// The caller supplied no output capacity in a situation where the codec
    /// needed to write. The stream cannot continue and should be dropped.
    #[error("no room for required output")]
    BufferFull,

    /// No codec with this name is registered.
    #[error("unknown codec {0:?}")]
    UnknownCodec(String),

    /// An option key/value pair was rejected while building a
    /// [`CodecOptions`] snapshot.
    #[error("bad value for option {key:?} of codec {codec:?}: {reason}")]
    BadOption {
        codec: String,
        key: String,
        reason: String,
    },

    /// A failure reported by the codec itself, passed through verbatim.
    /// Whether a retry can succeed is up to the codec's own contract.
    #[error("codec failure: {0}")]
    Codec(String),
}

pub type UnipressResult<T> = Result<T, UnipressError>;
