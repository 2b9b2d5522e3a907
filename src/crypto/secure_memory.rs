//! Secret text held in memory
//!
//! Session tokens, passwords and device secrets are held in [`SecureString`].
//! The buffer is wiped on drop, formatting never shows the contents, and
//! equality runs in time independent of where the inputs differ.

use std::fmt;
use std::ops::Deref;

use zeroize::{Zeroize, ZeroizeOnDrop};

#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecureString(String);

impl SecureString {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Empty or whitespace only
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl PartialEq for SecureString {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (self.0.as_bytes(), other.0.as_bytes());
        if a.len() != b.len() {
            return false;
        }
        a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
    }
}

impl Eq for SecureString {}

impl Deref for SecureString {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SecureString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for SecureString {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SecureString {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecureString(<{} bytes>)", self.0.len())
    }
}

impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("********")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contents_and_blankness() {
        let s = SecureString::new("tok-A");
        assert_eq!(s.as_str(), "tok-A");
        assert_eq!(s.len(), 5);
        assert!(!s.is_blank());
        assert!(SecureString::from("   ").is_blank());
    }

    #[test]
    fn test_formatting_hides_contents() {
        let s = SecureString::new("secret-token");
        assert!(!format!("{:?}", s).contains("secret"));
        assert_eq!(s.to_string(), "********");
    }

    #[test]
    fn test_equality() {
        assert_eq!(SecureString::new("abc"), SecureString::from("abc"));
        assert_ne!(SecureString::new("abc"), SecureString::new("abd"));
        assert_ne!(SecureString::new("abc"), SecureString::new("abcd"));
    }

    #[test]
    fn test_zeroize_clears_buffer() {
        let mut s = SecureString::new("secret");
        s.zeroize();
        assert!(s.is_empty());
    }
}
