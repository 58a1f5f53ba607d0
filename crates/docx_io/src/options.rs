//! Build and read configuration

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Compression applied to every ZIP entry of a build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Compression {
    #[default]
    Deflated,
    Stored,
}

impl Compression {
    pub(crate) fn method(self) -> zip::CompressionMethod {
        match self {
            Compression::Deflated => zip::CompressionMethod::Deflated,
            Compression::Stored => zip::CompressionMethod::Stored,
        }
    }
}

/// Options for writing a package
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildOptions {
    pub compression: Compression,
    /// Clock for created/modified when the document leaves them unset.
    /// `None` uses the current time.
    pub timestamp: Option<DateTime<Utc>>,
    /// Write effective (style-resolved) properties on every run and
    /// paragraph instead of only the explicit ones
    pub flatten_styles: bool,
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_flatten_styles(mut self, flatten: bool) -> Self {
        self.flatten_styles = flatten;
        self
    }

    /// W3CDTF rendering of the build clock
    pub(crate) fn timestamp_string(&self) -> String {
        self.timestamp
            .unwrap_or_else(Utc::now)
            .format("%Y-%m-%dT%H:%M:%SZ")
            .to_string()
    }
}

/// Options for reading a package
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReadOptions {
    /// Fail on a malformed optional part instead of skipping it
    pub strict_optional_parts: bool,
}

impl ReadOptions {
    pub fn strict() -> Self {
        Self {
            strict_optional_parts: true,
        }
    }
}
