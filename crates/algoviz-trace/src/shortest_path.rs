//! Settle-order replay of single-source shortest distances.

use crate::format::amount;
use crate::payload::ShortestPathResult;
use crate::step::{Step, StepKind, StepPayload, Trace};

/// One `settle` step per reachable vertex, nearest first.
///
/// Unreachable vertices (null distances) are left out.
pub fn generate_shortest_path_trace(result: &ShortestPathResult) -> Trace {
    let source = result.source.to_string();
    let steps = result
        .reachable()
        .into_iter()
        .enumerate()
        .map(|(index, (vertex, distance))| {
            Step::new(
                StepKind::Settle,
                index,
                StepPayload::Distance {
                    source: source.clone(),
                    vertex: vertex.to_string(),
                    distance,
                },
                format!(
                    "Distancia mínima desde Centro {source} hasta Centro {vertex}: {}",
                    amount(distance)
                ),
            )
        })
        .collect();
    Trace::new(steps)
}
