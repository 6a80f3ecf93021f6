//! Codec plugins shipped with the crate.

pub mod copy;

#[cfg(feature = "lz4")]
pub mod lz4;

#[cfg(feature = "zstd")]
pub mod zstd;

pub use copy::CopyCodec;

#[cfg(feature = "lz4")]
pub use lz4::Lz4Codec;

#[cfg(feature = "zstd")]
pub use zstd::ZstdCodec;
