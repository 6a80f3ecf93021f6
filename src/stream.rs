//! Streams: one in-progress transform, driven a buffer exchange at a time.
//!
//! A [`Stream`] does not perform any I/O on its own. Callers bring their own
//! buffers, as small as they like, and drive the stream with
//! [`process`](Stream::process), [`flush`](Stream::flush), and
//! [`finish`](Stream::finish) until it reports completion:
//!
//! ```
//! use unipress::{CodecRegistry, Direction, Status, Stream};
//!
//! # fn main() -> unipress::UnipressResult<()> {
//! let registry = CodecRegistry::with_default_codecs();
//! let mut stream = Stream::new(
//!     registry.resolve("copy")?.as_ref(),
//!     Direction::Compress,
//!     None,
//! )?;
//!
//! let data = b"driven in pieces";
//! let mut out = Vec::new();
//! let mut window = [0u8; 4];
//! loop {
//!     let consumed = stream.total_in() as usize;
//!     let before = stream.total_out() as usize;
//!     let status = stream.finish(&data[consumed..], &mut window)?;
//!     out.extend_from_slice(&window[..stream.total_out() as usize - before]);
//!     if status != Status::Processing {
//!         break;
//!     }
//! }
//! assert_eq!(out, data);
//! # Ok(())
//! # }
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use enumset::EnumSet;
use log::{trace, warn};

use crate::adapter::BufferedFallback;
use crate::codec::{Capability, Codec, Coder};
use crate::options::CodecOptions;
use crate::{Direction, Exchange, Status, UnipressError, UnipressResult};

/// The escalating request levels a stream can be driven at.
///
/// Levels are totally ordered. Within one call the engine may escalate from
/// a lower level to a higher one (a finish on a fresh stream first drains
/// process), but a stream never moves back down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Operation {
    Process,
    Flush,
    Finish,
}

impl Operation {
    /// The state recorded when this level reports partial progress.
    fn running_state(self) -> StreamState {
        match self {
            Operation::Process => StreamState::Running,
            Operation::Flush => StreamState::Flushing,
            Operation::Finish => StreamState::Finishing,
        }
    }

    fn next(self) -> Option<Operation> {
        match self {
            Operation::Process => Some(Operation::Flush),
            Operation::Flush => Some(Operation::Finish),
            Operation::Finish => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Process => "process",
            Operation::Flush => "flush",
            Operation::Finish => "finish",
        })
    }
}

/// Where a stream is in its life, ordered from least to most progressed.
///
/// The state moves forward monotonically across calls. If an operation
/// completed cleanly the stream settles back on [`Idle`](StreamState::Idle)
/// ready for the next level; an interrupted operation parks it on the
/// matching in-progress state until the caller drains output and repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StreamState {
    /// No operation is underway; the last one (if any) completed cleanly.
    Idle,
    /// A process call reported partial progress and must be repeated.
    Running,
    /// A flush call reported partial progress and must be repeated.
    Flushing,
    /// A finish call reported partial progress and must be repeated.
    Finishing,
    /// The stream reached its end. Only dropping it is useful now.
    Finished,
}

/// One in-progress compression or decompression.
///
/// Created for a specific codec and direction, driven through the three
/// escalating operations, and torn down by dropping it, which is valid
/// from any state, including after an error left the stream unusable.
pub struct Stream {
    direction: Direction,
    state: StreamState,
    total_in: u64,
    total_out: u64,
    codec: String,
    capabilities: EnumSet<Capability>,
    coder: Box<dyn Coder>,
    options: Option<Arc<CodecOptions>>,
    fallback: Option<BufferedFallback>,
    user_data: Option<Box<dyn Any + Send>>,
}

impl Stream {
    /// Creates a stream that drives `codec` in the given direction.
    ///
    /// The options snapshot, if supplied, should have been validated for the
    /// same codec; it is retained (shared) until the stream is dropped.
    pub fn new(
        codec: &dyn Codec,
        direction: Direction,
        options: Option<Arc<CodecOptions>>,
    ) -> UnipressResult<Self> {
        let coder = codec.create(direction, options.as_deref())?;
        let capabilities = coder.capabilities();
        Ok(Self {
            direction,
            state: StreamState::Idle,
            total_in: 0,
            total_out: 0,
            codec: codec.name().to_owned(),
            capabilities,
            coder,
            options,
            fallback: None,
            user_data: None,
        })
    }

    #[cfg(test)]
    pub(crate) fn with_coder(coder: Box<dyn Coder>, direction: Direction) -> Self {
        let capabilities = coder.capabilities();
        Self {
            direction,
            state: StreamState::Idle,
            total_in: 0,
            total_out: 0,
            codec: coder.name().to_owned(),
            capabilities,
            coder,
            options: None,
            fallback: None,
            user_data: None,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Total bytes of input consumed over the stream's whole life. Updated
    /// on every call, including failed ones, by exactly the amount the call
    /// actually consumed.
    pub fn total_in(&self) -> u64 {
        self.total_in
    }

    /// Total bytes of output produced over the stream's whole life. Same
    /// update rule as [`total_in`](Stream::total_in).
    pub fn total_out(&self) -> u64 {
        self.total_out
    }

    /// The name of the codec this stream was created with.
    pub fn codec(&self) -> &str {
        &self.codec
    }

    /// The streaming operations the underlying coder advertised.
    pub fn capabilities(&self) -> EnumSet<Capability> {
        self.capabilities
    }

    /// The options snapshot this stream retains, if any.
    pub fn options(&self) -> Option<&Arc<CodecOptions>> {
        self.options.as_ref()
    }

    /// Attaches an opaque payload, returning the previous one. The payload
    /// is dropped with the stream unless taken back first; the engine never
    /// looks at it.
    pub fn set_user_data(&mut self, data: Box<dyn Any + Send>) -> Option<Box<dyn Any + Send>> {
        self.user_data.replace(data)
    }

    pub fn user_data(&self) -> Option<&(dyn Any + Send)> {
        self.user_data.as_deref()
    }

    pub fn take_user_data(&mut self) -> Option<Box<dyn Any + Send>> {
        self.user_data.take()
    }

    /// Processes as much input as the codec can.
    ///
    /// Call repeatedly, feeding the unconsumed remainder of the input and a
    /// drained output buffer each time. [`Status::Ok`] means all input was
    /// consumed; [`Status::Processing`] means the output buffer filled up
    /// first; [`Status::EndOfStream`] means a decompression stream found its
    /// end and must not be processed further.
    pub fn process(&mut self, input: &[u8], output: &mut [u8]) -> UnipressResult<Status> {
        self.run(input, output, Operation::Process)
    }

    /// Forces out anything the codec has consumed but not yet emitted,
    /// where the codec supports flushing. Does not end the stream.
    pub fn flush(&mut self, input: &[u8], output: &mut [u8]) -> UnipressResult<Status> {
        self.run(input, output, Operation::Flush)
    }

    /// Ends the stream, draining whatever the codec still holds. Pending
    /// input is processed first, so a finish on a fresh stream is a complete
    /// transform in itself. After [`Status::Ok`] the stream is
    /// [`Finished`](StreamState::Finished) and can only be dropped.
    pub fn finish(&mut self, input: &[u8], output: &mut [u8]) -> UnipressResult<Status> {
        self.run(input, output, Operation::Finish)
    }

    fn run(
        &mut self,
        input: &[u8],
        output: &mut [u8],
        requested: Operation,
    ) -> UnipressResult<Status> {
        // Flush support is optional per codec; reject an explicit flush up
        // front rather than silently doing nothing.
        if requested == Operation::Flush && !self.capabilities.contains(Capability::Flush) {
            return Err(UnipressError::Unsupported {
                codec: self.codec.clone(),
                operation: Operation::Flush,
            });
        }

        // A request below the stream's progress point is a caller protocol
        // error, not something a retry can fix.
        let blocked = match requested {
            Operation::Process => self.state > StreamState::Running,
            Operation::Flush => self.state > StreamState::Flushing,
            Operation::Finish => self.state > StreamState::Finishing,
        };
        if blocked {
            return Err(UnipressError::StaleOperation {
                state: self.state,
                requested,
            });
        }

        let mut current = match self.state {
            StreamState::Idle | StreamState::Running => Operation::Process,
            StreamState::Flushing => Operation::Flush,
            StreamState::Finishing => Operation::Finish,
            // Already excluded above: every request level is below Finished.
            StreamState::Finished => {
                return Err(UnipressError::StaleOperation {
                    state: self.state,
                    requested,
                })
            }
        };
        if current > requested {
            return Err(UnipressError::StaleOperation {
                state: self.state,
                requested,
            });
        }

        trace!(
            "{requested} on {:?} {:?} stream in state {:?}",
            self.codec,
            self.direction,
            self.state
        );

        // Some libraries report "no space" for a zero-length output buffer
        // without looking at the stream at all. Hand those calls a private
        // one-byte buffer instead; if anything lands in it, the caller's
        // real buffer was too small and the stream cannot continue.
        let mut scratch = [0u8; 1];
        let probing = output.is_empty();
        let mut io = if probing {
            Exchange::new(input, &mut scratch)
        } else {
            Exchange::new(input, output)
        };

        let mut result;
        loop {
            result = match current {
                Operation::Process => {
                    if io.input_is_empty() && self.state == StreamState::Idle {
                        // Nothing buffered, nothing new: trivially complete.
                        Ok(Status::Ok)
                    } else if self.capabilities.contains(Capability::Process) {
                        self.coder.process(&mut io)
                    } else {
                        self.fallback
                            .get_or_insert_with(Default::default)
                            .process(&mut io)
                    }
                }
                Operation::Flush => {
                    if current == requested {
                        self.coder.flush(&mut io)
                    } else {
                        // Never flush speculatively on the way to a finish;
                        // some algorithms emit larger output after a
                        // mid-stream flush.
                        Ok(Status::Ok)
                    }
                }
                Operation::Finish => {
                    let finish_result = if self.capabilities.contains(Capability::Finish) {
                        self.coder.finish(&mut io)
                    } else if !self.capabilities.contains(Capability::Process) {
                        // Whole-buffer codecs route process through the
                        // staging fallback, so their finish does too.
                        self.fallback
                            .get_or_insert_with(Default::default)
                            .finish(self.coder.as_mut(), &mut io)
                    } else {
                        Err(UnipressError::Unsupported {
                            codec: self.codec.clone(),
                            operation: Operation::Finish,
                        })
                    };
                    // Coders may legitimately report either at the end of a
                    // finish.
                    match finish_result {
                        Ok(Status::EndOfStream) => Ok(Status::Ok),
                        other => other,
                    }
                }
            };

            if probing && io.output_is_full() {
                warn!(
                    "codec {:?} needed output space but the caller provided none",
                    self.codec
                );
                result = Err(UnipressError::BufferFull);
            }

            match &result {
                Ok(Status::Processing) => {
                    self.state = current.running_state();
                    break;
                }
                Ok(Status::EndOfStream) => {
                    self.state = StreamState::Finished;
                    break;
                }
                Ok(Status::Ok) if current == Operation::Finish => {
                    self.state = StreamState::Finished;
                    break;
                }
                Ok(Status::Ok) => {
                    self.state = StreamState::Idle;
                    match current.next() {
                        Some(next) if next <= requested => current = next,
                        _ => break,
                    }
                }
                // The state keeps whatever the last cleanly completed level
                // left behind.
                Err(_) => break,
            }
        }

        // Totals always reflect real work, even when the call failed partway
        // through. The probe byte is not caller-visible output.
        self.total_in += io.consumed() as u64;
        if !probing {
            self.total_out += io.produced() as u64;
        }

        result
    }
}

impl fmt::Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("codec", &self.codec)
            .field("direction", &self.direction)
            .field("state", &self.state)
            .field("total_in", &self.total_in)
            .field("total_out", &self.total_out)
            .finish_non_exhaustive()
    }
}
