//! Codec lookup.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use crate::codec::Codec;
use crate::{UnipressError, UnipressResult};

/// Maps codec names to plugins.
///
/// Callers build one (or start from
/// [`with_default_codecs`](CodecRegistry::with_default_codecs)) and pass it
/// wherever codecs are resolved; there is deliberately no process-wide
/// registry, which keeps tests free to register fakes.
#[derive(Default, Clone)]
pub struct CodecRegistry {
    codecs: HashMap<String, Arc<dyn Codec>>,
}

impl CodecRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Default::default()
    }

    /// A registry with every codec this crate ships built in.
    pub fn with_default_codecs() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(crate::codecs::CopyCodec));
        #[cfg(feature = "zstd")]
        registry.register(Arc::new(crate::codecs::ZstdCodec));
        #[cfg(feature = "lz4")]
        registry.register(Arc::new(crate::codecs::Lz4Codec));
        registry
    }

    /// Registers a plugin, replacing any previous codec with the same name.
    pub fn register(&mut self, codec: Arc<dyn Codec>) {
        debug!("registering codec {:?}", codec.name());
        self.codecs.insert(codec.name().to_owned(), codec);
    }

    /// Resolves a codec by name. A miss is reported as
    /// [`UnipressError::UnknownCodec`], distinct from any option validation
    /// failure.
    pub fn resolve(&self, name: &str) -> UnipressResult<&Arc<dyn Codec>> {
        self.codecs
            .get(name)
            .ok_or_else(|| UnipressError::UnknownCodec(name.into()))
    }

    /// The names of all registered codecs, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.codecs.keys().map(String::as_str)
    }
}
