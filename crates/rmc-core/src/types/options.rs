//! Per-call retrieval options and their normalization.

use serde::{Deserialize, Serialize};

use super::relation::RelationType;
use crate::error::{RmcError, RmcResult};

/// Default values applied to unset retrieval options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalDefaults {
    /// Default BFS depth.
    pub max_depth: usize,
    /// Default confidence floor for vector matches.
    pub min_confidence: f32,
    /// Whether inference paths are mined by default.
    pub include_inference_paths: bool,
}

impl Default for RetrievalDefaults {
    fn default() -> Self {
        Self {
            max_depth: 2,
            min_confidence: 0.5,
            include_inference_paths: true,
        }
    }
}

/// Options a caller passes to `retrieve`. Unset fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalOptions {
    /// Maximum BFS depth from the direct matches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
    /// Relation types the expansion may follow.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation_types: Option<Vec<RelationType>>,
    /// Allow-list of agent IDs for direct matches. Empty means no filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_filter: Option<Vec<String>>,
    /// Whether to mine inference paths.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_inference_paths: Option<bool>,
    /// Confidence floor for direct matches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_confidence: Option<f32>,
}

impl RetrievalOptions {
    /// Create options with every field unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Set the relation types to follow.
    pub fn with_relation_types(mut self, types: impl IntoIterator<Item = RelationType>) -> Self {
        self.relation_types = Some(types.into_iter().collect());
        self
    }

    /// Restrict direct matches to these agents.
    pub fn with_agent_filter<S: Into<String>>(mut self, agents: impl IntoIterator<Item = S>) -> Self {
        self.agent_filter = Some(agents.into_iter().map(Into::into).collect());
        self
    }

    /// Enable or disable inference path mining.
    pub fn with_inference_paths(mut self, include: bool) -> Self {
        self.include_inference_paths = Some(include);
        self
    }

    /// Set the confidence floor.
    pub fn with_min_confidence(mut self, min_confidence: f32) -> Self {
        self.min_confidence = Some(min_confidence);
        self
    }

    /// Fill unset fields from `defaults` and validate the result.
    ///
    /// Runs before any I/O so malformed options never reach a store.
    pub fn normalize(
        &self,
        defaults: &RetrievalDefaults,
        max_depth_limit: usize,
    ) -> RmcResult<NormalizedOptions> {
        let max_depth = self.max_depth.unwrap_or(defaults.max_depth);
        if max_depth > max_depth_limit {
            return Err(RmcError::out_of_range(
                "max_depth",
                max_depth,
                format!("at most {}", max_depth_limit),
            ));
        }

        let min_confidence = self.min_confidence.unwrap_or(defaults.min_confidence);
        if !min_confidence.is_finite() || !(0.0..=1.0).contains(&min_confidence) {
            return Err(RmcError::out_of_range(
                "min_confidence",
                min_confidence,
                "between 0.0 and 1.0",
            ));
        }

        let mut relation_types = match &self.relation_types {
            Some(types) if types.is_empty() => {
                return Err(RmcError::validation_with_suggestion(
                    "relation_types must not be empty",
                    "Leave relation_types unset to follow all relation types",
                ));
            }
            Some(types) => types.clone(),
            None => RelationType::all(),
        };
        relation_types.sort();
        relation_types.dedup();

        let agent_filter = self.agent_filter.clone().unwrap_or_default();
        if agent_filter.iter().any(|a| a.trim().is_empty()) {
            return Err(RmcError::validation("agent_filter contains a blank agent id"));
        }

        Ok(NormalizedOptions {
            max_depth,
            relation_types,
            agent_filter,
            include_inference_paths: self
                .include_inference_paths
                .unwrap_or(defaults.include_inference_paths),
            min_confidence,
        })
    }
}

/// Retrieval options with every default applied.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedOptions {
    pub max_depth: usize,
    /// Sorted and deduplicated.
    pub relation_types: Vec<RelationType>,
    /// Empty means every agent.
    pub agent_filter: Vec<String>,
    pub include_inference_paths: bool,
    pub min_confidence: f32,
}

impl NormalizedOptions {
    /// Whether the expansion may follow edges of this type.
    pub fn allows(&self, relation_type: RelationType) -> bool {
        self.relation_types.contains(&relation_type)
    }
}

impl Default for NormalizedOptions {
    fn default() -> Self {
        Self {
            max_depth: 2,
            relation_types: RelationType::all(),
            agent_filter: Vec::new(),
            include_inference_paths: true,
            min_confidence: 0.5,
        }
    }
}
