//! Dictionary-wide configuration.
//!
//! All knobs that the legacy layer kept as process globals live here as an
//! explicit, immutable struct handed to [`DataDict`](crate::DataDict) at
//! construction time.

use crate::metatype::MetaType;

/// Configuration for parsing and type resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Metatype returned when a native type is absent from every mapping
    /// table. `N` is the historical default.
    pub fallback_metatype: MetaType,

    /// Character-column length above which `C` is promoted to `X` during
    /// forward metatype resolution. `None` means the threshold was never
    /// set, in which case 250 is used.
    pub blob_size: Option<u32>,

    /// In strict mode, recoverable spec problems (duplicate field names,
    /// unrecognized attribute tokens) become errors instead of logged
    /// warnings.
    pub strict: bool,

    /// Optional schema used to qualify table names as `schema.table`.
    pub schema: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fallback_metatype: MetaType::N,
            blob_size: Some(100),
            strict: false,
            schema: None,
        }
    }
}

impl Config {
    /// Effective `C` → `X` promotion threshold.
    #[must_use]
    pub fn blob_threshold(&self) -> u32 {
        self.blob_size.unwrap_or(250)
    }
}
