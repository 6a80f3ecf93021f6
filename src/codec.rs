//! The plugin boundary: codecs, and the per-stream coders they create.

use enumset::{EnumSet, EnumSetType};

use crate::options::CodecOptions;
use crate::stream::Operation;
use crate::{Direction, Exchange, Status, UnipressError, UnipressResult};

/// One optional streaming operation a coder may implement.
#[derive(EnumSetType, Debug)]
pub enum Capability {
    Process,
    Flush,
    Finish,
}

/// A registered compression scheme.
///
/// Implementations are stateless factories; all per-stream state lives in
/// the [`Coder`] they create. One codec value is typically shared (behind an
/// `Arc`) by a registry and any number of concurrent streams.
pub trait Codec: Send + Sync {
    /// The name this codec is registered and resolved under.
    fn name(&self) -> &str;

    /// Validates one option pair. The default rejects every key; codecs
    /// override this for the options they understand.
    fn validate_option(&self, key: &str, value: &str) -> UnipressResult<()> {
        let _ = value;
        Err(UnipressError::BadOption {
            codec: self.name().into(),
            key: key.into(),
            reason: "unknown option".into(),
        })
    }

    /// Creates the per-stream coder for one transform in the given
    /// direction. May fail, e.g. for a direction the codec cannot do.
    fn create(
        &self,
        direction: Direction,
        options: Option<&CodecOptions>,
    ) -> UnipressResult<Box<dyn Coder>>;
}

impl std::fmt::Debug for dyn Codec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Codec").field(&self.name()).finish()
    }
}

/// The per-stream side of a codec: owns whatever context the underlying
/// library needs, and implements the operations advertised by
/// [`capabilities`](Coder::capabilities).
///
/// Streaming entry points move bytes through the [`Exchange`] and report
/// [`Status::Ok`] when all input was consumed, [`Status::Processing`] when
/// the caller must drain output and call again, or [`Status::EndOfStream`]
/// when the end of an encoded stream was reached. The engine never invokes
/// an entry point the coder did not advertise, so the defaults are plain
/// rejections.
pub trait Coder: Send {
    fn name(&self) -> &'static str;

    /// The set of streaming operations this coder implements.
    fn capabilities(&self) -> EnumSet<Capability>;

    fn process(&mut self, io: &mut Exchange) -> UnipressResult<Status> {
        let _ = io;
        Err(UnipressError::Unsupported {
            codec: self.name().into(),
            operation: Operation::Process,
        })
    }

    fn flush(&mut self, io: &mut Exchange) -> UnipressResult<Status> {
        let _ = io;
        Err(UnipressError::Unsupported {
            codec: self.name().into(),
            operation: Operation::Flush,
        })
    }

    fn finish(&mut self, io: &mut Exchange) -> UnipressResult<Status> {
        let _ = io;
        Err(UnipressError::Unsupported {
            codec: self.name().into(),
            operation: Operation::Finish,
        })
    }

    /// Whole-buffer entry point for codecs with no streaming support. The
    /// engine stages input across calls and hands the complete payload here
    /// when the stream is finished.
    fn transform(&mut self, input: &[u8]) -> UnipressResult<Vec<u8>> {
        let _ = input;
        Err(UnipressError::Unsupported {
            codec: self.name().into(),
            operation: Operation::Finish,
        })
    }
}
