use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Number of characters kept at each end when a secret is displayed.
const MASK_VISIBLE_CHARS: usize = 4;

/// Secret string that zeroes its memory on drop.
///
/// Client secrets, authorization codes and tokens are all held in this wrapper.
/// `Debug` never shows the value and `Display` only shows a masked form, so a
/// secret can go through `tracing` fields without leaking.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecureString(String);

impl SecureString {
    /// Creates a new secure string from the provided value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the secret value.
    ///
    /// Keep the returned reference short-lived.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the value is empty or only whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Consumes the wrapper and returns the inner value.
    ///
    /// The caller becomes responsible for the secure handling of the returned `String`.
    pub fn into_string(mut self) -> String {
        std::mem::take(&mut self.0)
    }

    fn masked(&self) -> String {
        let count = self.0.chars().count();
        if count <= MASK_VISIBLE_CHARS * 2 {
            return "***".to_string();
        }
        let head = self.0.chars().take(MASK_VISIBLE_CHARS).collect::<String>();
        let tail = self
            .0
            .chars()
            .skip(count - MASK_VISIBLE_CHARS)
            .collect::<String>();
        format!("{head}...{tail}")
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

impl From<String> for SecureString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SecureString {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
