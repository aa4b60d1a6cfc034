//! Catalog tags with the reserved-prefix routing resolved at load time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::CatalogError;

/// A tag as written in the catalog, e.g. `"Resist:Frost"` or `"fiery"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Tag {
    Resist(String),
    Weak(String),
    Ability(String),
    Trigger(String),
    Generic(String),
}

const PREFIXES: [(&str, fn(String) -> Tag); 4] = [
    ("Resist:", Tag::Resist),
    ("Weak:", Tag::Weak),
    ("Ability:", Tag::Ability),
    ("Trigger:", Tag::Trigger),
];

impl FromStr for Tag {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(CatalogError::BadTag("empty tag".into()));
        }
        for (prefix, make) in PREFIXES {
            if let Some(rest) = s.strip_prefix(prefix) {
                let rest = rest.trim();
                if rest.is_empty() {
                    return Err(CatalogError::BadTag(format!("`{s}` has no value after its prefix")));
                }
                return Ok(make(rest.to_string()));
            }
        }
        Ok(Tag::Generic(s.to_string()))
    }
}

impl TryFrom<String> for Tag {
    type Error = CatalogError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> Self {
        tag.to_string()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Resist(v) => write!(f, "Resist:{v}"),
            Tag::Weak(v) => write!(f, "Weak:{v}"),
            Tag::Ability(v) => write!(f, "Ability:{v}"),
            Tag::Trigger(v) => write!(f, "Trigger:{v}"),
            Tag::Generic(v) => f.write_str(v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_routing() {
        assert_eq!("Resist:Frost".parse::<Tag>().unwrap(), Tag::Resist("Frost".into()));
        assert_eq!("Weak: Aquatic".parse::<Tag>().unwrap(), Tag::Weak("Aquatic".into()));
        assert_eq!("Ability:Stone Skin".parse::<Tag>().unwrap(), Tag::Ability("Stone Skin".into()));
        assert_eq!("Trigger:Full Moon".parse::<Tag>().unwrap(), Tag::Trigger("Full Moon".into()));
        assert_eq!("heavy".parse::<Tag>().unwrap(), Tag::Generic("heavy".into()));
    }

    #[test]
    fn test_empty_payload_rejected() {
        assert!("Resist:".parse::<Tag>().is_err());
        assert!("Ability:   ".parse::<Tag>().is_err());
        assert!("".parse::<Tag>().is_err());
    }

    #[test]
    fn test_serde_keeps_catalog_spelling() {
        let tags: Vec<Tag> = serde_json::from_str(r#"["Weak:Mineral", "fiery"]"#).unwrap();
        assert_eq!(tags[0], Tag::Weak("Mineral".into()));
        assert_eq!(serde_json::to_string(&tags).unwrap(), r#"["Weak:Mineral","fiery"]"#);

        let bad: Result<Vec<Tag>, _> = serde_json::from_str(r#"["Trigger:"]"#);
        assert!(bad.is_err());
    }
}
