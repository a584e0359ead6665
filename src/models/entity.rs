//! Entity and mention classifications attached to tokens.

use serde::{Deserialize, Serialize};

/// Coarse semantic category of a mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityType {
    Per,
    Org,
    Loc,
    Fac,
    Event,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Per => "PER",
            Self::Org => "ORG",
            Self::Loc => "LOC",
            Self::Fac => "FAC",
            Self::Event => "EVENT",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Surface form of a mention: a proper name or a descriptive noun phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MentionType {
    Name,
    Nom,
}

impl MentionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "NAME",
            Self::Nom => "NOM",
        }
    }
}

impl std::fmt::Display for MentionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&EntityType::Loc).unwrap(), "\"LOC\"");
        assert_eq!(serde_json::to_string(&MentionType::Nom).unwrap(), "\"NOM\"");
        let parsed: EntityType = serde_json::from_str("\"EVENT\"").unwrap();
        assert_eq!(parsed, EntityType::Event);
    }

    #[test]
    fn test_display_matches_serde() {
        for et in [
            EntityType::Per,
            EntityType::Org,
            EntityType::Loc,
            EntityType::Fac,
            EntityType::Event,
        ] {
            let json = serde_json::to_string(&et).unwrap();
            assert_eq!(json, format!("\"{}\"", et));
        }
    }
}
