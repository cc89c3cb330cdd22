//! Vault options.

use serde::{Deserialize, Serialize};

/// Options for sealing vault blobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// Append an HMAC-SHA256 tag to every blob written.
    ///
    /// Off by default, which keeps the three-segment format readable by
    /// older clients. Untagged blobs are read either way.
    pub authenticate: bool,
}
