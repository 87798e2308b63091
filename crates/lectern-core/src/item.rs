//! Extracted literary items and document licensing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// What kind of span an item is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Quote,
    Verse,
    Code,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quote => "quote",
            Self::Verse => "verse",
            Self::Code => "code",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "quote" => Ok(Self::Quote),
            "verse" => Ok(Self::Verse),
            "code" => Ok(Self::Code),
            other => Err(Error::Internal(format!("unknown item type: {other}"))),
        }
    }
}

/// A typed span produced by one analysis run.
///
/// `position` is the run-local acceptance counter, so items from the same
/// page keep the order in which the generators accepted them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedItem {
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub content: String,
    /// 1-indexed page the item came from.
    pub page_number: u32,
    pub position: u32,
}

/// Distribution license of an ingested document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum License {
    #[serde(rename = "public-domain")]
    PublicDomain,
    #[serde(rename = "CC")]
    CreativeCommons,
    #[serde(rename = "copyrighted")]
    Copyrighted,
}

impl License {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PublicDomain => "public-domain",
            Self::CreativeCommons => "CC",
            Self::Copyrighted => "copyrighted",
        }
    }

    /// Open-distribution documents are analyzed automatically on ingestion.
    pub fn is_open_distribution(&self) -> bool {
        matches!(self, Self::PublicDomain | Self::CreativeCommons)
    }
}

impl fmt::Display for License {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for License {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public-domain" => Ok(Self::PublicDomain),
            "CC" | "cc" => Ok(Self::CreativeCommons),
            "copyrighted" => Ok(Self::Copyrighted),
            other => Err(Error::Config(format!(
                "unknown license '{other}' (expected public-domain, CC or copyrighted)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_serializes_with_wire_names() {
        let item = ExtractedItem {
            kind: ItemKind::Verse,
            content: "The sun rises in the east.".to_string(),
            page_number: 3,
            position: 7,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "verse");
        assert_eq!(json["pageNumber"], 3);
        assert_eq!(json["position"], 7);
    }

    #[test]
    fn test_license_open_distribution() {
        assert!("public-domain".parse::<License>().unwrap().is_open_distribution());
        assert!("CC".parse::<License>().unwrap().is_open_distribution());
        assert!(!"copyrighted".parse::<License>().unwrap().is_open_distribution());
        assert!("proprietary".parse::<License>().is_err());
    }

    #[test]
    fn test_item_kind_round_trips_through_str() {
        for kind in [ItemKind::Quote, ItemKind::Verse, ItemKind::Code] {
            assert_eq!(kind.as_str().parse::<ItemKind>().unwrap(), kind);
        }
    }
}
