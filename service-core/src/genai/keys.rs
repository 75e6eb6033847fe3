//! Credential rotation for the generative backend.

use secrecy::{ExposeSecret, SecretString};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::GenAiError;

/// Cycles through a fixed, ordered set of API credentials.
///
/// The set is validated once at construction; rotation itself is
/// infallible. The cursor is atomic so concurrent requests each get a
/// distinct position instead of racing on a shared index. A failing
/// credential is never skipped or marked bad; it simply comes around
/// again on the next wrap.
#[derive(Debug)]
pub struct KeyRotator {
    keys: Vec<SecretString>,
    cursor: AtomicUsize,
}

impl KeyRotator {
    /// Build from the configured key list. Blank entries are discarded;
    /// an empty result is a configuration error, surfaced here rather
    /// than on the first call.
    pub fn new(keys: Vec<String>) -> Result<Self, GenAiError> {
        let keys: Vec<SecretString> = keys
            .into_iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .map(SecretString::new)
            .collect();

        if keys.is_empty() {
            return Err(GenAiError::Configuration(
                "no usable API keys configured".to_string(),
            ));
        }

        Ok(Self {
            keys,
            cursor: AtomicUsize::new(0),
        })
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Next credential in configured order, wrapping after the last.
    /// Returns `None` only for an empty set, which construction forbids;
    /// callers map that to [`GenAiError::NoCredentials`].
    pub fn try_next(&self) -> Option<&SecretString> {
        if self.keys.is_empty() {
            return None;
        }
        let idx = self.cursor.fetch_add(1, Ordering::Relaxed) % self.keys.len();
        Some(&self.keys[idx])
    }
}

/// Last four characters of a credential, for diagnostic logs that must
/// not expose the secret itself.
pub fn redacted_suffix(credential: &SecretString) -> String {
    let raw = credential.expose_secret();
    let tail: String = raw
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("...{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exposed(rotator: &KeyRotator) -> String {
        rotator
            .try_next()
            .map(|k| k.expose_secret().clone())
            .unwrap_or_default()
    }

    #[test]
    fn rotates_in_configured_order_and_wraps() {
        let rotator = KeyRotator::new(vec![
            "key-a".to_string(),
            "key-b".to_string(),
            "key-c".to_string(),
        ])
        .unwrap();

        assert_eq!(exposed(&rotator), "key-a");
        assert_eq!(exposed(&rotator), "key-b");
        assert_eq!(exposed(&rotator), "key-c");
        // (k+1)th call equals the first again
        assert_eq!(exposed(&rotator), "key-a");
    }

    #[test]
    fn each_credential_returned_exactly_once_per_wrap() {
        let keys: Vec<String> = (0..5).map(|i| format!("key-{}", i)).collect();
        let rotator = KeyRotator::new(keys.clone()).unwrap();

        let mut seen: Vec<String> = (0..5).map(|_| exposed(&rotator)).collect();
        seen.sort();
        assert_eq!(seen, keys);
    }

    #[test]
    fn blank_entries_are_discarded() {
        let rotator =
            KeyRotator::new(vec!["  ".to_string(), "real".to_string(), String::new()]).unwrap();
        assert_eq!(rotator.len(), 1);
        assert_eq!(exposed(&rotator), "real");
    }

    #[test]
    fn empty_configuration_fails_at_construction() {
        let err = KeyRotator::new(vec![]).unwrap_err();
        assert!(matches!(err, GenAiError::Configuration(_)));

        let err = KeyRotator::new(vec![" ".to_string(), String::new()]).unwrap_err();
        assert!(matches!(err, GenAiError::Configuration(_)));
    }

    #[test]
    fn redacted_suffix_keeps_only_last_four() {
        let key = SecretString::new("AIzaSyExample1234".to_string());
        assert_eq!(redacted_suffix(&key), "...1234");

        let short = SecretString::new("ab".to_string());
        assert_eq!(redacted_suffix(&short), "...ab");
    }
}
