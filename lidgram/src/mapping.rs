use std::collections::HashMap;
use std::io::Read;

use serde::Deserialize;

use crate::errors::{LidgramError, Result};

/// Read-only lookup from language code to class ID.
///
/// The on-disk form is a JSON object such as `{"en": 0, "fr": 1}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct LanguageMapping {
    ids: HashMap<String, u32>,
}

impl LanguageMapping {
    /// Loads a mapping from a JSON reader.
    ///
    /// # Errors
    ///
    /// [`LidgramError::InvalidConfig`] will be returned if the data is not a JSON object of
    /// non-negative integers that fit in 32 bits.
    pub fn from_reader<R>(rdr: R) -> Result<Self>
    where
        R: Read,
    {
        serde_json::from_reader(rdr)
            .map_err(|e| LidgramError::invalid_config("mapping", e.to_string()))
    }

    /// Loads a mapping from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| LidgramError::invalid_config("mapping", e.to_string()))
    }

    /// Gets the class ID of a language code.
    pub fn class_id(&self, code: &str) -> Option<u32> {
        self.ids.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.ids.iter().map(|(code, &id)| (code.as_str(), id))
    }
}

impl FromIterator<(String, u32)> for LanguageMapping {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (String, u32)>,
    {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let m = LanguageMapping::from_json(r#"{"en": 0, "fr": 1, "ja": 7}"#).unwrap();

        assert_eq!(3, m.len());
        assert_eq!(Some(0), m.class_id("en"));
        assert_eq!(Some(7), m.class_id("ja"));
        assert_eq!(None, m.class_id("de"));
    }

    #[test]
    fn test_from_reader() {
        let m = LanguageMapping::from_reader(&br#"{"eng": 12}"#[..]).unwrap();

        assert_eq!(Some(12), m.class_id("eng"));
    }

    #[test]
    fn test_negative_id() {
        let m = LanguageMapping::from_json(r#"{"en": -1}"#);

        assert!(matches!(m, Err(LidgramError::InvalidConfig(_))));
    }

    #[test]
    fn test_not_an_object() {
        let m = LanguageMapping::from_json(r#"["en", "fr"]"#);

        assert!(matches!(m, Err(LidgramError::InvalidConfig(_))));
    }

    #[test]
    fn test_non_integer_id() {
        let m = LanguageMapping::from_json(r#"{"en": "0"}"#);

        assert!(matches!(m, Err(LidgramError::InvalidConfig(_))));
    }

    #[test]
    fn test_from_iter() {
        let m: LanguageMapping = [("en".to_string(), 0), ("fr".to_string(), 1)]
            .into_iter()
            .collect();

        assert_eq!(Some(1), m.class_id("fr"));
        let mut pairs: Vec<_> = m.iter().collect();
        pairs.sort_unstable();
        assert_eq!(vec![("en", 0), ("fr", 1)], pairs);
    }
}
