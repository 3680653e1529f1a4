//! Typed relation edges between memories.

use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use super::memory_node::MemoryNode;
use crate::error::{RmcError, RmcResult};

/// Kind of a directed relation between two memories.
///
/// Tags serialize in upper case (`CAUSES`) for storage compatibility and
/// parse case-insensitively.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationType {
    /// Source memory causes the target.
    Causes,
    /// Source memory supports the target.
    Supports,
    /// Source memory has an impact on the target.
    Impacts,
    /// Source memory contradicts the target.
    Contradicts,
}

impl RelationType {
    /// All core relation types, in declaration order.
    pub fn all() -> Vec<RelationType> {
        Self::iter().collect()
    }

    /// Storage tag of this relation type.
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// Parse a storage tag, rejecting unknown tags with a validation error.
    pub fn parse(tag: &str) -> RmcResult<Self> {
        tag.trim()
            .parse()
            .map_err(|_| RmcError::unknown_relation_type(tag))
    }

    /// Whether causal chains may follow this edge.
    pub fn is_causal(&self) -> bool {
        matches!(self, Self::Causes | Self::Impacts)
    }
}

impl<'de> Deserialize<'de> for RelationType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Self::parse(&tag).map_err(serde::de::Error::custom)
    }
}

/// A directed, weighted edge between two memories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationEdge {
    /// Source memory ID.
    pub source: String,
    /// Target memory ID.
    pub target: String,
    /// Relation kind.
    #[serde(rename = "type")]
    pub relation_type: RelationType,
    /// Strength of the relation (0-1).
    pub strength: f32,
    /// Why the relation was recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl RelationEdge {
    /// Create a new edge.
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        relation_type: RelationType,
        strength: f32,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            relation_type,
            strength,
            reason: None,
        }
    }

    /// Attach a reason.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Identity of the edge within one expansion run.
    pub fn key(&self) -> (&str, &str, RelationType) {
        (&self.source, &self.target, self.relation_type)
    }
}

/// An outgoing edge together with its resolved target memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    /// The edge leading to the neighbor.
    pub edge: RelationEdge,
    /// The memory at the edge target.
    pub node: MemoryNode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_type_tags() {
        assert_eq!(RelationType::Causes.as_str(), "CAUSES");
        assert_eq!(RelationType::Contradicts.to_string(), "CONTRADICTS");
        assert_eq!(RelationType::all().len(), 4);
    }

    #[test]
    fn test_relation_type_parse_is_case_insensitive() {
        assert_eq!(RelationType::parse("supports").unwrap(), RelationType::Supports);
        assert_eq!(RelationType::parse(" IMPACTS ").unwrap(), RelationType::Impacts);
    }

    #[test]
    fn test_relation_type_parse_rejects_unknown() {
        let err = RelationType::parse("CAUSED_BY").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_edge_serializes_type_tag() {
        let edge = RelationEdge::new("a", "b", RelationType::Causes, 0.9).with_reason("test");
        let json = serde_json::to_value(&edge).unwrap();
        assert_eq!(json["type"], "CAUSES");
        assert_eq!(json["reason"], "test");
    }

    #[test]
    fn test_deserialize_accepts_any_case() {
        let types: Vec<RelationType> =
            serde_json::from_str(r#"["causes", "Supports", "IMPACTS"]"#).unwrap();
        assert_eq!(
            types,
            vec![RelationType::Causes, RelationType::Supports, RelationType::Impacts]
        );

        let unknown: Result<RelationType, _> = serde_json::from_str(r#""caused_by""#);
        assert!(unknown.unwrap_err().to_string().contains("Unknown relation type"));
    }

    #[test]
    fn test_causal_types() {
        assert!(RelationType::Causes.is_causal());
        assert!(RelationType::Impacts.is_causal());
        assert!(!RelationType::Supports.is_causal());
        assert!(!RelationType::Contradicts.is_causal());
    }
}
