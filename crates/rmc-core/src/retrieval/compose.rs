//! Result composition.

use crate::types::{GraphContext, InferencePath, MemoryNode, RetrievalResult};

/// Assemble the final result and its summary line.
pub fn compose(
    direct_matches: Vec<MemoryNode>,
    related_context: GraphContext,
    inference_paths: Vec<InferencePath>,
) -> RetrievalResult {
    let summary = summarize(
        direct_matches.len(),
        related_context.len(),
        inference_paths.len(),
    );
    RetrievalResult {
        direct_matches,
        related_context,
        inference_paths,
        summary,
    }
}

fn summarize(direct: usize, context: usize, paths: usize) -> String {
    let mut summary = format!("Retrieved {} direct matches", direct);
    if context > direct {
        summary.push_str(&format!(", expanded to {} related memories", context));
    }
    if paths > 0 {
        summary.push_str(&format!(", found {} inference paths", paths));
    }
    summary
}
