//! Locale identifiers with keywords
//!
//! A `Locale` is a base tag (`language[_Script][_REGION][_variant]`) plus an
//! ordered set of keyword/value pairs, written in the `@key=value;key=value`
//! form (`zh_Hant@collation=stroke`). Values are immutable: every
//! modifying operation returns a new `Locale`.
//!
//! The root locale has an empty base tag and is displayed as `root`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Keyword selecting the collation type (`@collation=pinyin`)
pub const COLLATION_KEYWORD: &str = "collation";

/// Display/parse name of the root locale
const ROOT_NAME: &str = "root";

/// Locale identifier: base tag plus keywords
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale {
    base: String,
    keywords: BTreeMap<String, String>,
}

impl Locale {
    /// The root locale (empty base, no keywords)
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a locale from a base tag with no keywords.
    ///
    /// `-` separators are normalized to `_`; `root` maps to the root locale.
    pub fn new(base: &str) -> Result<Self> {
        let base = normalize_base(base)?;
        Ok(Self {
            base,
            keywords: BTreeMap::new(),
        })
    }

    /// Base tag without keywords (empty for root)
    pub fn base_name(&self) -> &str {
        &self.base
    }

    /// This locale with all keywords removed
    pub fn base_locale(&self) -> Locale {
        Locale {
            base: self.base.clone(),
            keywords: BTreeMap::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.base.is_empty()
    }

    /// Value of a keyword, if set
    pub fn keyword(&self, key: &str) -> Option<&str> {
        self.keywords.get(&key.to_ascii_lowercase()).map(String::as_str)
    }

    /// All keywords in key order
    pub fn keywords(&self) -> impl Iterator<Item = (&str, &str)> {
        self.keywords.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns a copy of this locale with `key` set to `value`.
    ///
    /// An empty value removes the keyword.
    pub fn with_keyword(&self, key: &str, value: &str) -> Locale {
        let mut next = self.clone();
        let key = key.to_ascii_lowercase();
        if value.is_empty() {
            next.keywords.remove(&key);
        } else {
            next.keywords.insert(key, value.to_string());
        }
        next
    }

    /// Returns a copy of this locale without `key`
    pub fn without_keyword(&self, key: &str) -> Locale {
        self.with_keyword(key, "")
    }

    /// Parent in the truncation chain (`zh_Hant_TW` → `zh_Hant` → `zh` → root).
    ///
    /// Keywords are dropped. Root has no parent.
    pub fn parent(&self) -> Option<Locale> {
        if self.is_root() {
            return None;
        }
        let base = match self.base.rfind('_') {
            Some(idx) => self.base[..idx].to_string(),
            None => String::new(),
        };
        Some(Locale {
            base,
            keywords: BTreeMap::new(),
        })
    }

    /// Base locales from this one up to and including root
    pub fn fallback_chain(&self) -> Vec<Locale> {
        let mut chain = vec![self.base_locale()];
        let mut current = self.base_locale();
        while let Some(parent) = current.parent() {
            chain.push(parent.clone());
            current = parent;
        }
        chain
    }
}

fn normalize_base(base: &str) -> Result<String> {
    let base = base.trim();
    if base.is_empty() || base.eq_ignore_ascii_case(ROOT_NAME) {
        return Ok(String::new());
    }
    let normalized = base.replace('-', "_");
    if normalized.starts_with('_')
        || normalized.ends_with('_')
        || normalized.contains("__")
        || !normalized.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(Error::Parse(format!("invalid locale base tag: {:?}", base)));
    }
    Ok(normalized)
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (base, keyword_part) = match s.split_once('@') {
            Some((base, rest)) => (base, Some(rest)),
            None => (s, None),
        };

        let mut locale = Locale::new(base)?;

        if let Some(rest) = keyword_part {
            for pair in rest.split(';').filter(|p| !p.trim().is_empty()) {
                let (key, value) = pair.split_once('=').ok_or_else(|| {
                    Error::Parse(format!("keyword without value in locale {:?}: {:?}", s, pair))
                })?;
                let key = key.trim();
                if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric()) {
                    return Err(Error::Parse(format!("invalid keyword name in locale {:?}", s)));
                }
                locale = locale.with_keyword(key, value.trim());
            }
        }

        Ok(locale)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str(ROOT_NAME)?;
        } else {
            f.write_str(&self.base)?;
        }
        let mut sep = '@';
        for (key, value) in &self.keywords {
            write!(f, "{}{}={}", sep, key, value)?;
            sep = ';';
        }
        Ok(())
    }
}

impl TryFrom<String> for Locale {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_and_keywords() {
        let locale: Locale = "zh_Hant@collation=stroke;numbers=latn".parse().unwrap();
        assert_eq!(locale.base_name(), "zh_Hant");
        assert_eq!(locale.keyword("collation"), Some("stroke"));
        assert_eq!(locale.keyword("Numbers"), Some("latn"));
        assert_eq!(locale.to_string(), "zh_Hant@collation=stroke;numbers=latn");
    }

    #[test]
    fn test_root_forms() {
        assert!(Locale::root().is_root());
        assert_eq!("root".parse::<Locale>().unwrap(), Locale::root());
        assert_eq!("".parse::<Locale>().unwrap(), Locale::root());
        assert_eq!(Locale::root().to_string(), "root");
    }

    #[test]
    fn test_hyphen_normalized() {
        let locale: Locale = "de-AT".parse().unwrap();
        assert_eq!(locale.base_name(), "de_AT");
    }

    #[test]
    fn test_invalid_locales_rejected() {
        assert!("zh__TW".parse::<Locale>().is_err());
        assert!("_zh".parse::<Locale>().is_err());
        assert!("zh@collation".parse::<Locale>().is_err());
        assert!("zh TW".parse::<Locale>().is_err());
    }

    #[test]
    fn test_with_keyword_returns_new_value() {
        let base = Locale::new("sv").unwrap();
        let tagged = base.with_keyword("collation", "search");

        assert_eq!(base.keyword("collation"), None);
        assert_eq!(tagged.keyword("collation"), Some("search"));
        assert_eq!(tagged.without_keyword("collation"), base);
    }

    #[test]
    fn test_parent_chain() {
        let locale: Locale = "zh_Hant_TW@collation=stroke".parse().unwrap();
        let chain: Vec<String> = locale.fallback_chain().iter().map(|l| l.to_string()).collect();
        assert_eq!(chain, vec!["zh_Hant_TW", "zh_Hant", "zh", "root"]);
        assert_eq!(Locale::root().parent(), None);
    }

    #[test]
    fn test_keywords_affect_equality() {
        let plain = Locale::new("zh").unwrap();
        let tagged = plain.with_keyword("collation", "pinyin");
        assert_ne!(plain, tagged);
        assert_eq!(tagged.base_locale(), plain);
    }
}
