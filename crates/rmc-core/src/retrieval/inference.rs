//! Inference path mining over an expanded graph.
//!
//! Pure functions: the miners only read the finished [`GraphContext`], so
//! they need no synchronization and always produce the same output for the
//! same graph.

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use ordered_float::OrderedFloat;

use crate::types::{
    GraphContext, InferencePath, MemoryNode, PathType, RelationEdge, RelationType,
};

/// Hop cap for causal chains.
pub const MAX_CAUSAL_HOPS: usize = 3;

/// Hop cap for support chains.
pub const MAX_SUPPORT_HOPS: usize = 2;

/// Characters of content shown per node in path descriptions.
const PREVIEW_CHARS: usize = 60;

/// Mine every inference path reachable from `seeds`, highest confidence first.
pub fn find_paths(seeds: &[MemoryNode], graph: &GraphContext) -> Vec<InferencePath> {
    let mut paths = Vec::new();
    paths.extend(chains(
        seeds,
        graph,
        |t| t.is_causal(),
        MAX_CAUSAL_HOPS,
        PathType::CausalChain,
    ));
    paths.extend(contradictions(graph));
    paths.extend(chains(
        seeds,
        graph,
        |t| t == RelationType::Supports,
        MAX_SUPPORT_HOPS,
        PathType::MultiHopSupport,
    ));

    // Stable: ties keep miner order.
    paths.sort_by_key(|p| Reverse(OrderedFloat(p.confidence)));
    paths
}

/// A partial DFS path. The branch's own nodes double as its visited set.
#[derive(Clone)]
struct Branch<'g> {
    nodes: Vec<&'g MemoryNode>,
    edges: Vec<&'g RelationEdge>,
}

impl Branch<'_> {
    fn tail(&self) -> &str {
        self.nodes.last().map(|n| n.id.as_str()).unwrap_or_default()
    }

    fn visits(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }
}

/// Depth-first chain search from each seed along edges accepted by `follow`.
///
/// Each terminal branch (dead end, cycle, or hop cap) with at least two
/// nodes becomes a path. Sibling branches may share nodes; a single path
/// never repeats one.
fn chains(
    seeds: &[MemoryNode],
    graph: &GraphContext,
    follow: impl Fn(RelationType) -> bool,
    max_hops: usize,
    path_type: PathType,
) -> Vec<InferencePath> {
    let nodes: HashMap<&str, &MemoryNode> =
        graph.memories.iter().map(|m| (m.id.as_str(), m)).collect();
    let mut adjacency: HashMap<&str, Vec<&RelationEdge>> = HashMap::new();
    for edge in graph.relations.iter().filter(|e| follow(e.relation_type)) {
        adjacency.entry(edge.source.as_str()).or_default().push(edge);
    }

    let mut paths = Vec::new();
    let mut started = HashSet::new();

    for seed in seeds {
        if !started.insert(seed.id.as_str()) {
            continue;
        }
        let Some(start) = nodes.get(seed.id.as_str()) else {
            continue;
        };

        let mut stack = vec![Branch {
            nodes: vec![*start],
            edges: Vec::new(),
        }];

        while let Some(branch) = stack.pop() {
            let extensions: Vec<(&RelationEdge, &MemoryNode)> = if branch.edges.len() < max_hops {
                adjacency
                    .get(branch.tail())
                    .into_iter()
                    .flatten()
                    .filter_map(|edge| nodes.get(edge.target.as_str()).map(|n| (*edge, *n)))
                    .filter(|(_, node)| !branch.visits(&node.id))
                    .collect()
            } else {
                Vec::new()
            };

            if extensions.is_empty() {
                if branch.nodes.len() >= 2 {
                    paths.push(build_path(path_type, branch));
                }
                continue;
            }

            // Reverse push so the first edge is explored first.
            for (edge, node) in extensions.into_iter().rev() {
                let mut next = branch.clone();
                next.edges.push(edge);
                next.nodes.push(node);
                stack.push(next);
            }
        }
    }

    paths
}

/// One two-node path per CONTRADICTS edge, scored by the edge strength.
fn contradictions(graph: &GraphContext) -> Vec<InferencePath> {
    graph
        .relations_of(RelationType::Contradicts)
        .filter_map(|edge| {
            let source = graph.node(&edge.source)?;
            let target = graph.node(&edge.target)?;
            Some(InferencePath {
                path_type: PathType::ContradictionResolution,
                description: format!(
                    "Contradiction: \"{}\" conflicts with \"{}\"",
                    source.preview(PREVIEW_CHARS),
                    target.preview(PREVIEW_CHARS)
                ),
                confidence: clamp_unit(edge.strength),
                nodes: vec![source.clone(), target.clone()],
                edges: vec![edge.clone()],
            })
        })
        .collect()
}

fn build_path(path_type: PathType, branch: Branch<'_>) -> InferencePath {
    let label = match path_type {
        PathType::CausalChain => "Causal chain",
        PathType::MultiHopSupport => "Support chain",
        PathType::ContradictionResolution => "Contradiction",
        PathType::TemporalSequence => "Sequence",
    };
    let steps: Vec<String> = branch.nodes.iter().map(|n| n.preview(PREVIEW_CHARS)).collect();

    InferencePath {
        path_type,
        description: format!("{}: {}", label, steps.join(" → ")),
        confidence: chain_confidence(&branch.nodes, &branch.edges),
        nodes: branch.nodes.into_iter().cloned().collect(),
        edges: branch.edges.into_iter().cloned().collect(),
    }
}

/// Mean of the average node confidence and the average edge strength.
fn chain_confidence(nodes: &[&MemoryNode], edges: &[&RelationEdge]) -> f32 {
    let mean = |values: Vec<f32>| {
        if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<f32>() / values.len() as f32
        }
    };
    let node_avg = mean(nodes.iter().map(|n| clamp_unit(n.confidence)).collect());
    let edge_avg = mean(edges.iter().map(|e| clamp_unit(e.strength)).collect());
    clamp_unit((node_avg + edge_avg) / 2.0)
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, confidence: f32) -> MemoryNode {
        MemoryNode::new(id, id, "agent", confidence)
    }

    fn graph(ids: &[&str], edges: &[(&str, &str, RelationType, f32)]) -> GraphContext {
        GraphContext {
            memories: ids.iter().map(|id| node(id, 0.8)).collect(),
            relations: edges
                .iter()
                .map(|(s, t, r, w)| RelationEdge::new(*s, *t, *r, *w))
                .collect(),
        }
    }

    fn of_type(paths: &[InferencePath], path_type: PathType) -> Vec<Vec<&str>> {
        paths
            .iter()
            .filter(|p| p.path_type == path_type)
            .map(|p| p.node_ids())
            .collect()
    }

    #[test]
    fn test_linear_causal_chain() {
        let g = graph(
            &["A", "B", "C"],
            &[
                ("A", "B", RelationType::Causes, 0.9),
                ("B", "C", RelationType::Causes, 0.9),
            ],
        );

        let paths = find_paths(&[node("A", 0.8)], &g);

        assert_eq!(of_type(&paths, PathType::CausalChain), vec![vec!["A", "B", "C"]]);
        let chain = &paths[0];
        assert_eq!(chain.description, "Causal chain: A → B → C");
        assert!((chain.confidence - 0.85).abs() < 1e-6);
    }

    #[test]
    fn test_causal_chain_is_capped_at_three_hops() {
        let g = graph(
            &["A", "B", "C", "D", "E"],
            &[
                ("A", "B", RelationType::Causes, 0.9),
                ("B", "C", RelationType::Impacts, 0.9),
                ("C", "D", RelationType::Causes, 0.9),
                ("D", "E", RelationType::Causes, 0.9),
            ],
        );

        let paths = find_paths(&[node("A", 0.8)], &g);

        assert_eq!(
            of_type(&paths, PathType::CausalChain),
            vec![vec!["A", "B", "C", "D"]]
        );
        assert!(paths.iter().all(|p| p.hops() <= MAX_CAUSAL_HOPS));
    }

    #[test]
    fn test_sibling_branches_share_nodes_but_paths_have_no_cycles() {
        // A -> B -> D, A -> C -> D, D -> A
        let g = graph(
            &["A", "B", "C", "D"],
            &[
                ("A", "B", RelationType::Causes, 0.5),
                ("A", "C", RelationType::Causes, 0.5),
                ("B", "D", RelationType::Causes, 0.5),
                ("C", "D", RelationType::Causes, 0.5),
                ("D", "A", RelationType::Causes, 0.5),
            ],
        );

        let found = find_paths(&[node("A", 0.8)], &g);
        let chains = of_type(&found, PathType::CausalChain);

        assert_eq!(chains, vec![vec!["A", "B", "D"], vec!["A", "C", "D"]]);
        for chain in &chains {
            let unique: HashSet<_> = chain.iter().collect();
            assert_eq!(unique.len(), chain.len());
        }
    }

    #[test]
    fn test_contradiction_pair_uses_edge_strength() {
        let g = graph(&["A", "B"], &[("A", "B", RelationType::Contradicts, 0.8)]);

        let paths = find_paths(&[node("A", 0.8)], &g);

        assert_eq!(paths.len(), 1);
        let path = &paths[0];
        assert_eq!(path.path_type, PathType::ContradictionResolution);
        assert_eq!(path.nodes.len(), 2);
        assert_eq!(path.edges.len(), 1);
        assert!((path.confidence - 0.8).abs() < 1e-6);
        assert_eq!(path.description, "Contradiction: \"A\" conflicts with \"B\"");
    }

    #[test]
    fn test_support_chain_is_capped_at_two_hops() {
        let g = graph(
            &["A", "B", "C", "D"],
            &[
                ("A", "B", RelationType::Supports, 0.6),
                ("B", "C", RelationType::Supports, 0.6),
                ("C", "D", RelationType::Supports, 0.6),
            ],
        );

        let paths = find_paths(&[node("A", 0.8)], &g);

        assert_eq!(
            of_type(&paths, PathType::MultiHopSupport),
            vec![vec!["A", "B", "C"]]
        );
        assert_eq!(paths[0].description, "Support chain: A → B → C");
    }

    #[test]
    fn test_single_node_branches_are_dropped() {
        let g = graph(&["A"], &[]);
        assert!(find_paths(&[node("A", 0.8)], &g).is_empty());
    }

    #[test]
    fn test_paths_sorted_by_confidence_and_in_range() {
        let g = graph(
            &["A", "B", "C"],
            &[
                ("A", "B", RelationType::Supports, 0.2),
                ("A", "C", RelationType::Contradicts, 1.7),
                ("A", "C", RelationType::Causes, 0.9),
            ],
        );

        let paths = find_paths(&[node("A", 0.8)], &g);

        assert_eq!(paths.len(), 3);
        assert_eq!(paths[0].path_type, PathType::ContradictionResolution);
        assert!((paths[0].confidence - 1.0).abs() < f32::EPSILON);
        assert!(paths
            .windows(2)
            .all(|w| w[0].confidence >= w[1].confidence));
        assert!(paths.iter().all(|p| (0.0..=1.0).contains(&p.confidence)));
    }

    #[test]
    fn test_long_content_is_previewed() {
        let long = "x".repeat(100);
        let g = GraphContext {
            memories: vec![MemoryNode::new("A", long, "agent", 0.8), node("B", 0.8)],
            relations: vec![RelationEdge::new("A", "B", RelationType::Causes, 0.9)],
        };

        let paths = find_paths(&[node("A", 0.8)], &g);

        assert!(paths[0].description.contains(&format!("{}…", "x".repeat(60))));
    }
}
