//! Bot authentication token
//!
//! The token is read once at startup from a local secret file. It must
//! never be logged and never appear in any notification, so the wrapper
//! type redacts itself in `Debug` output and deliberately has no `Display`
//! implementation.

use std::fmt;
use std::path::{Path, PathBuf};

/// Bot authentication token
#[derive(Clone)]
pub struct BotToken(String);

impl BotToken {
    /// Wrap a raw token string
    ///
    /// # Errors
    /// Returns `TokenError::Empty` if the token is blank after trimming.
    pub fn new(raw: impl Into<String>) -> Result<Self, TokenError> {
        let token = raw.into().trim().to_string();
        if token.is_empty() {
            return Err(TokenError::Empty);
        }
        Ok(Self(token))
    }

    /// Read the token from a secret file
    pub fn from_file(path: &Path) -> Result<Self, TokenError> {
        let raw = std::fs::read_to_string(path).map_err(|source| TokenError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(raw)
    }

    /// Get the raw token value for use in authentication headers
    ///
    /// Call sites are expected to keep the value out of logs.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BotToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BotToken(***)")
    }
}

/// Token loading errors
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token file {path} could not be read")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("token is empty")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_trims_whitespace() {
        let token = BotToken::new("  abc.def.ghi\n").unwrap();
        assert_eq!(token.expose(), "abc.def.ghi");
    }

    #[test]
    fn test_empty_token_rejected() {
        assert!(matches!(BotToken::new("   \n"), Err(TokenError::Empty)));
    }

    #[test]
    fn test_debug_is_redacted() {
        let token = BotToken::new("supersecret").unwrap();
        let debug = format!("{token:?}");
        assert_eq!(debug, "BotToken(***)");
        assert!(!debug.contains("supersecret"));
    }

    #[test]
    fn test_missing_file() {
        let err = BotToken::from_file(Path::new("/definitely/not/here/.token")).unwrap_err();
        assert!(matches!(err, TokenError::Unreadable { .. }));
    }
}
