//! Presentation replay of a minimum spanning tree construction.
//!
//! The edge list comes from the computation service already in construction
//! order. Nothing here checks that it is acyclic or minimal.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::format::amount;
use crate::payload::MstEdge;
use crate::step::{Step, StepKind, StepPayload, Trace};

/// Algorithm whose construction order the edges follow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MstAlgorithm {
    #[default]
    Kruskal,
    Prim,
}

impl MstAlgorithm {
    /// How each edge addition is justified under this algorithm.
    pub fn rationale(&self) -> &'static str {
        match self {
            MstAlgorithm::Kruskal => {
                "Se agrega la arista si no forma ciclo con las ya seleccionadas."
            }
            MstAlgorithm::Prim => {
                "Se selecciona la arista de menor peso conectada a un vértice no visitado."
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MstAlgorithm::Kruskal => "Kruskal",
            MstAlgorithm::Prim => "Prim",
        }
    }
}

impl fmt::Display for MstAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One `add-edge` step per edge, in input order, with a running weight.
pub fn generate_mst_trace(edges: &[MstEdge], algorithm: MstAlgorithm) -> Trace {
    let rationale = algorithm.rationale();
    let mut cumulative = 0.0;

    let steps = edges
        .iter()
        .enumerate()
        .map(|(index, edge)| {
            cumulative += edge.weight;
            Step::new(
                StepKind::AddEdge,
                index,
                StepPayload::Edge {
                    from: edge.from.to_string(),
                    to: edge.to.to_string(),
                    weight: edge.weight,
                    cumulative,
                },
                format!(
                    "Agregar ruta {} → {} (peso {}). {rationale}",
                    edge.from_display(),
                    edge.to_display(),
                    amount(edge.weight)
                ),
            )
        })
        .collect();

    Trace::new(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn edges() -> Vec<MstEdge> {
        vec![
            MstEdge::new("A", "B", 1.0),
            MstEdge::new("B", "C", 2.0),
            MstEdge::new("A", "D", 4.0),
        ]
    }

    #[test]
    fn one_step_per_edge_in_order() {
        let trace = generate_mst_trace(&edges(), MstAlgorithm::Kruskal);

        assert_eq!(trace.len(), 3);
        let order: Vec<(String, String)> = trace
            .iter()
            .map(|s| match &s.payload {
                StepPayload::Edge { from, to, .. } => (from.clone(), to.clone()),
                other => panic!("unexpected payload {other:?}"),
            })
            .collect();
        assert_eq!(
            order,
            vec![
                ("A".to_string(), "B".to_string()),
                ("B".to_string(), "C".to_string()),
                ("A".to_string(), "D".to_string()),
            ]
        );
        assert_eq!(trace.last().and_then(Step::cumulative), Some(7.0));
    }

    #[test]
    fn rationale_chosen_per_algorithm() {
        let kruskal = generate_mst_trace(&edges(), MstAlgorithm::Kruskal);
        let prim = generate_mst_trace(&edges(), MstAlgorithm::Prim);

        assert!(kruskal.iter().all(|s| s.message.contains("no forma ciclo")));
        assert!(prim.iter().all(|s| s.message.contains("no visitado")));
    }

    #[test]
    fn names_used_when_present() {
        let mut edge = MstEdge::new("1", "2", 3.0);
        edge.from_name = Some("Lima".into());
        let trace = generate_mst_trace(&[edge], MstAlgorithm::Prim);
        assert!(trace.steps()[0].message.starts_with("Agregar ruta Lima → Centro 2"));
    }

    #[test]
    fn no_edges_no_steps() {
        assert!(generate_mst_trace(&[], MstAlgorithm::Kruskal).is_empty());
    }

    proptest! {
        #[test]
        fn final_cumulative_is_weight_sum(weights in proptest::collection::vec(0u32..100, 0..30)) {
            let edges: Vec<MstEdge> = weights
                .iter()
                .enumerate()
                .map(|(i, &w)| MstEdge::new(&i.to_string(), &(i + 1).to_string(), f64::from(w)))
                .collect();
            let trace = generate_mst_trace(&edges, MstAlgorithm::Kruskal);

            prop_assert_eq!(trace.len(), edges.len());
            let total: f64 = edges.iter().map(|e| e.weight).sum();
            prop_assert_eq!(trace.last().and_then(Step::cumulative).unwrap_or(0.0), total);
            for (position, step) in trace.iter().enumerate() {
                prop_assert_eq!(step.index, position);
            }
        }
    }
}
