//! Tailoring payload readers
//!
//! A [`TailoringReader`] turns the `%%CollationBin` payload into the
//! non-rule parts of a [`Tailoring`]. The loader owns no payload format;
//! [`JsonSettingsReader`] is the reader used by the bundled tools and tests,
//! reading a JSON object of settings overrides.

use crate::tailoring::{
    AlternateHandling, BinaryData, CaseFirst, MaxVariable, Settings, Strength, Tailoring,
};
use serde::Deserialize;
use thiserror::Error;

/// Payload decoding failure
#[derive(Error, Debug)]
pub enum ReadError {
    /// The data bundle has no payload at all
    #[error("tailoring payload missing")]
    MissingPayload,

    #[error("tailoring payload is empty")]
    Empty,

    #[error("malformed tailoring payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid tailoring payload: {0}")]
    Invalid(String),
}

/// Deserializer for tailoring payloads
pub trait TailoringReader: Send + Sync {
    /// Populate `target.settings` and `target.data` from `payload`.
    ///
    /// `root` is available for shared base tables. On error `target` must
    /// be treated as garbage; the loader discards it.
    fn read(&self, root: &Tailoring, payload: &[u8], target: &mut Tailoring) -> Result<(), ReadError>;
}

/// Overrides accepted by [`JsonSettingsReader`]
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsOverrides {
    strength: Option<Strength>,
    alternate: Option<AlternateHandling>,
    case_first: Option<CaseFirst>,
    max_variable: Option<MaxVariable>,
    backwards_secondary: Option<bool>,
    case_level: Option<bool>,
    numeric: Option<bool>,
    reorder: Option<Vec<String>>,
}

impl SettingsOverrides {
    fn apply(self, settings: &mut Settings) {
        if let Some(strength) = self.strength {
            settings.strength = strength;
        }
        if let Some(alternate) = self.alternate {
            settings.alternate = alternate;
        }
        if let Some(case_first) = self.case_first {
            settings.case_first = case_first;
        }
        if let Some(max_variable) = self.max_variable {
            settings.max_variable = max_variable;
        }
        if let Some(backwards) = self.backwards_secondary {
            settings.backwards_secondary = backwards;
        }
        if let Some(case_level) = self.case_level {
            settings.case_level = case_level;
        }
        if let Some(numeric) = self.numeric {
            settings.numeric = numeric;
        }
        if let Some(codes) = self.reorder {
            settings.reorder_codes = codes;
        }
    }
}

/// Reorder codes: ISO 15924 script codes plus the special group names
fn validate_reorder_code(code: &str) -> Result<(), ReadError> {
    const GROUPS: [&str; 6] = ["space", "punct", "symbol", "currency", "digit", "others"];

    let is_script = code.len() == 4 && code.chars().all(|c| c.is_ascii_alphabetic());
    if is_script || GROUPS.contains(&code) {
        Ok(())
    } else {
        Err(ReadError::Invalid(format!("unknown reorder code {:?}", code)))
    }
}

/// Reads a UTF-8 JSON object of settings overrides
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSettingsReader;

impl TailoringReader for JsonSettingsReader {
    fn read(&self, _root: &Tailoring, payload: &[u8], target: &mut Tailoring) -> Result<(), ReadError> {
        if payload.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(ReadError::Empty);
        }

        let overrides: SettingsOverrides = serde_json::from_slice(payload)?;
        if let Some(codes) = &overrides.reorder {
            for code in codes {
                validate_reorder_code(code)?;
            }
        }

        let mut settings = target.settings.clone();
        overrides.apply(&mut settings);

        target.settings = settings;
        target.data = BinaryData::new(payload);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colltail_common::Locale;

    fn target() -> (Tailoring, Tailoring) {
        let root = Tailoring::root(Settings::default(), None);
        let seeded = Tailoring::seeded_from(&root, Locale::new("sv").unwrap());
        (root, seeded)
    }

    #[test]
    fn test_empty_object_keeps_seeded_settings() {
        let (root, mut t) = target();
        JsonSettingsReader.read(&root, b"{}", &mut t).unwrap();
        assert_eq!(t.settings, root.settings);
        assert_eq!(t.data.as_bytes(), b"{}");
    }

    #[test]
    fn test_overrides_applied() {
        let (root, mut t) = target();
        let payload = br#"{"strength": "primary", "alternate": "shifted", "numeric": true, "reorder": ["Grek", "digit"]}"#;
        JsonSettingsReader.read(&root, payload, &mut t).unwrap();

        assert_eq!(t.settings.strength, Strength::Primary);
        assert_eq!(t.settings.alternate, AlternateHandling::Shifted);
        assert!(t.settings.numeric);
        assert_eq!(t.settings.reorder_codes, vec!["Grek", "digit"]);
        assert_eq!(t.settings.case_first, CaseFirst::Off);
    }

    #[test]
    fn test_empty_payload_rejected() {
        let (root, mut t) = target();
        assert!(matches!(JsonSettingsReader.read(&root, b"", &mut t), Err(ReadError::Empty)));
        assert!(matches!(JsonSettingsReader.read(&root, b"  \n", &mut t), Err(ReadError::Empty)));
    }

    #[test]
    fn test_malformed_payload_leaves_target_untouched() {
        let (root, mut t) = target();
        let before = t.clone();
        let result = JsonSettingsReader.read(&root, b"{\"strength\": \"loud\"}", &mut t);
        assert!(matches!(result, Err(ReadError::Json(_))));
        assert_eq!(t, before);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let (root, mut t) = target();
        let result = JsonSettingsReader.read(&root, b"{\"colour\": 1}", &mut t);
        assert!(matches!(result, Err(ReadError::Json(_))));
    }

    #[test]
    fn test_bad_reorder_code_rejected() {
        let (root, mut t) = target();
        let result = JsonSettingsReader.read(&root, br#"{"reorder": ["Greek"]}"#, &mut t);
        assert!(matches!(result, Err(ReadError::Invalid(_))));
    }
}
