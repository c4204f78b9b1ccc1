use std::fmt;
use std::path::Path;

use crate::error::ConfigurationError;

/// Location of the mnemonic, relative to the working directory.
pub const SECRET_PATH: &str = ".secret";

/// Mnemonic phrase the deployer wallet is derived from.
pub struct Secret(String);

impl Secret {
    pub fn read(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigurationError::SecretRead {
            path: path.to_path_buf(),
            source,
        })?;
        let phrase = raw.trim();
        if phrase.is_empty() {
            return Err(ConfigurationError::SecretEmpty {
                path: path.to_path_buf(),
            });
        }
        Ok(Secret(phrase.to_string()))
    }

    pub fn phrase(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}
