//! Immutable per-stream codec configuration.

use std::collections::BTreeMap;

use crate::codec::Codec;
use crate::UnipressResult;

/// A validated, immutable snapshot of codec settings.
///
/// Built once through [`CodecOptions::from_pairs`] and then typically shared
/// between streams behind an [`Arc`](std::sync::Arc). Streams never mutate
/// the snapshot; dropping the last holder releases it.
#[derive(Debug, Clone)]
pub struct CodecOptions {
    codec: String,
    values: BTreeMap<String, String>,
}

impl CodecOptions {
    /// Validates `pairs` against `codec` and builds the snapshot.
    ///
    /// Every pair is checked through [`Codec::validate_option`]; the first
    /// rejected pair fails the whole build. A later duplicate key replaces
    /// an earlier one.
    pub fn from_pairs<K, V>(
        codec: &dyn Codec,
        pairs: impl IntoIterator<Item = (K, V)>,
    ) -> UnipressResult<Self>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut values = BTreeMap::new();
        for (key, value) in pairs {
            let (key, value) = (key.into(), value.into());
            codec.validate_option(&key, &value)?;
            values.insert(key, value);
        }
        Ok(Self {
            codec: codec.name().to_owned(),
            values,
        })
    }

    /// The name of the codec these options were validated against.
    pub fn codec(&self) -> &str {
        &self.codec
    }

    /// Looks up a single option value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
