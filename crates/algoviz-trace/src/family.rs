//! Dispatch from an algorithm family and a JSON payload to its trace.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::greedy::{self, AllocationRequest};
use crate::knapsack::{generate_dp_table_trace, generate_knapsack_trace};
use crate::mst::{generate_mst_trace, MstAlgorithm};
use crate::payload::{
    parse, BudgetDistributionResult, DpTable, FuelDistributionResult, KnapsackResult, MstEdge,
    MstResult, RecursionResult, ResultPayload, RouteMetric, ShortestPathResult,
};
use crate::recursion::{generate_metric_recursion_trace, recursion_steps};
use crate::shortest_path::generate_shortest_path_trace;
use crate::step::{check_steps, Trace};

/// Algorithm families that have a step trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TraceFamily {
    Recursion,
    GreedyFuel,
    GreedyBudget,
    MstKruskal,
    MstPrim,
    ShortestPath,
    Knapsack,
    DpTable,
}

impl TraceFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            TraceFamily::Recursion => "recursion",
            TraceFamily::GreedyFuel => "greedy-fuel",
            TraceFamily::GreedyBudget => "greedy-budget",
            TraceFamily::MstKruskal => "mst-kruskal",
            TraceFamily::MstPrim => "mst-prim",
            TraceFamily::ShortestPath => "shortest-path",
            TraceFamily::Knapsack => "knapsack",
            TraceFamily::DpTable => "dp-table",
        }
    }
}

impl fmt::Display for TraceFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generate the trace for `family` from a service payload.
///
/// Malformed payloads degrade to an empty trace; the failure is logged.
pub fn generate_trace(family: TraceFamily, input: &Value) -> Trace {
    match try_generate_trace(family, input) {
        Ok(trace) => {
            tracing::debug!(%family, steps = trace.len(), "generated trace");
            trace
        }
        Err(err) => {
            tracing::warn!(%family, error = %err, "malformed payload, using empty trace");
            Trace::empty()
        }
    }
}

/// Generate the trace for `family`, reporting malformed payloads.
///
/// Besides the service's result shapes, a few bare inputs are accepted:
/// an array of numbers for recursion, an array of edges for MST, and
/// `{cantidadRequerida, tamanosDisponibles}` for fuel.
pub fn try_generate_trace(family: TraceFamily, input: &Value) -> Result<Trace> {
    let name = family.as_str();
    match family {
        TraceFamily::Recursion => {
            if input.is_array() {
                let segments: Vec<f64> = parse(name, input)?;
                check_steps(recursion_steps(segments.len() as u64))?;
                return Ok(generate_metric_recursion_trace(&segments, RouteMetric::Cost));
            }
            let result: RecursionResult = parse(name, input)?;
            let (metric, _) = result.metric()?;
            Ok(generate_metric_recursion_trace(&result.segments()?, metric))
        }
        TraceFamily::GreedyFuel => {
            if input.get("distribucion").is_some() {
                let result: FuelDistributionResult = parse(name, input)?;
                return greedy::generate_greedy_trace(result.required(), &result.sizes()?);
            }
            let request: AllocationRequest = parse(name, input)?;
            greedy::generate_greedy_trace(request.cantidad_requerida, &request.tamanos_disponibles)
        }
        TraceFamily::GreedyBudget => {
            let result: BudgetDistributionResult = parse(name, input)?;
            Ok(greedy::generate_budget_trace(&result.distribucion))
        }
        TraceFamily::MstKruskal | TraceFamily::MstPrim => {
            let algorithm = if family == TraceFamily::MstPrim {
                MstAlgorithm::Prim
            } else {
                MstAlgorithm::Kruskal
            };
            let edges: Vec<MstEdge> = if input.is_array() {
                parse(name, input)?
            } else {
                parse::<MstResult>(name, input)?.mst
            };
            Ok(generate_mst_trace(&edges, algorithm))
        }
        TraceFamily::ShortestPath => {
            let result: ShortestPathResult = parse(name, input)?;
            Ok(generate_shortest_path_trace(&result))
        }
        TraceFamily::Knapsack => {
            let result: KnapsackResult = parse(name, input)?;
            Ok(generate_knapsack_trace(&result))
        }
        TraceFamily::DpTable => {
            let table: DpTable = parse(name, input)?;
            Ok(generate_dp_table_trace(&table.tabla))
        }
    }
}

impl ResultPayload {
    /// The step trace this result replays as, if its family has one.
    pub fn trace(&self) -> Option<Trace> {
        match self {
            ResultPayload::Recursion(result) => {
                let (metric, _) = result.metric().ok()?;
                let segments = result.segments().ok()?;
                Some(generate_metric_recursion_trace(&segments, metric))
            }
            ResultPayload::GreedyFuel(result) => {
                let sizes = result.sizes().ok()?;
                greedy::generate_greedy_trace(result.required(), &sizes).ok()
            }
            ResultPayload::GreedyBudget(result) => {
                Some(greedy::generate_budget_trace(&result.distribucion))
            }
            ResultPayload::Mst { algorithm, result } => {
                Some(generate_mst_trace(&result.mst, *algorithm))
            }
            ResultPayload::ShortestPath(result) => Some(generate_shortest_path_trace(result)),
            ResultPayload::Knapsack(result) => Some(generate_knapsack_trace(result)),
            ResultPayload::Sorting(_)
            | ResultPayload::BinarySearch(_)
            | ResultPayload::KnapsackComparison(_)
            | ResultPayload::CombinedMetrics(_)
            | ResultPayload::PerformanceComparison(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::step::{StepKind, StepPayload, MAX_STEPS};
    use serde_json::json;

    #[test]
    fn recursion_from_bare_array() {
        let trace = generate_trace(TraceFamily::Recursion, &json!([1.0, 2.0, 3.0]));
        assert_eq!(trace.len(), 7);
    }

    #[test]
    fn recursion_from_result_payload() {
        let trace = generate_trace(
            TraceFamily::Recursion,
            &json!({ "distanciaTotal": 90.0, "numeroTramos": 3, "tiempoEjecucionNanosegundos": 10 }),
        );
        assert_eq!(trace.count(StepKind::Call), 3);
    }

    #[test]
    fn fuel_from_request_and_result() {
        let request = json!({ "cantidadRequerida": 17, "tamanosDisponibles": [1, 5, 10] });
        assert_eq!(generate_trace(TraceFamily::GreedyFuel, &request).len(), 4);

        let result = json!({
            "distribucion": { "10": 1, "5": 1, "1": 2 },
            "totalDistribuido": 17,
            "cantidadBidonesUsados": 4
        });
        assert_eq!(generate_trace(TraceFamily::GreedyFuel, &result).len(), 4);
    }

    #[test]
    fn oversized_payloads_degrade_to_empty() {
        let segments = json!({ "costoTotal": 10.0, "numeroTramos": 1u64 << 44 });
        assert!(generate_trace(TraceFamily::Recursion, &segments).is_empty());
        assert!(matches!(
            try_generate_trace(TraceFamily::Recursion, &segments),
            Err(Error::TooLarge { .. })
        ));

        let fuel = json!({ "cantidadRequerida": 3_000_000, "tamanosDisponibles": [1] });
        assert!(generate_trace(TraceFamily::GreedyFuel, &fuel).is_empty());

        let fuel_result = json!({
            "distribucion": { "1": 1 },
            "totalDistribuido": 1_000_000_000_000u64,
            "cantidadBidonesUsados": 1
        });
        assert!(generate_trace(TraceFamily::GreedyFuel, &fuel_result).is_empty());

        let bare = Value::from(vec![1.0; MAX_STEPS]);
        assert!(generate_trace(TraceFamily::Recursion, &bare).is_empty());
    }

    #[test]
    fn budget_steps_follow_funding_order_in_json() {
        let payload: Value = serde_json::from_str(
            r#"{"distribucion":{"Zeta":100.0,"Alfa":50.0,"Media":25.0},"presupuestoAsignado":175.0,"presupuestoRestante":0.0}"#,
        )
        .unwrap();
        let trace = generate_trace(TraceFamily::GreedyBudget, &payload);

        let projects: Vec<&str> = trace
            .iter()
            .map(|step| match &step.payload {
                StepPayload::Assignment { project, .. } => project.as_str(),
                other => panic!("unexpected payload {other:?}"),
            })
            .collect();
        assert_eq!(projects, vec!["Zeta", "Alfa", "Media"]);
    }

    #[test]
    fn mst_missing_edges_degrades_to_empty() {
        let payload = json!({ "costoTotal": 10.0, "numeroAristas": 2, "complejidad": "O(E log E)" });

        assert!(generate_trace(TraceFamily::MstKruskal, &payload).is_empty());
        assert!(try_generate_trace(TraceFamily::MstKruskal, &payload).is_err());
    }

    #[test]
    fn prim_family_uses_prim_rationale() {
        let edges = json!([{ "from": 0, "to": 1, "weight": 2 }]);
        let trace = generate_trace(TraceFamily::MstPrim, &edges);
        assert!(trace.steps()[0].message.contains("no visitado"));
    }

    #[test]
    fn wrong_shapes_never_panic() {
        let junk = [json!(null), json!("text"), json!(42), json!({ "x": [] })];
        let families = [
            TraceFamily::Recursion,
            TraceFamily::GreedyFuel,
            TraceFamily::GreedyBudget,
            TraceFamily::MstKruskal,
            TraceFamily::MstPrim,
            TraceFamily::ShortestPath,
            TraceFamily::Knapsack,
            TraceFamily::DpTable,
        ];
        for family in families {
            for input in &junk {
                assert!(generate_trace(family, input).is_empty(), "{family} on {input}");
            }
        }
    }

    #[test]
    fn dp_table_accepts_either_key() {
        let a = generate_trace(TraceFamily::DpTable, &json!({ "tabla": [[0, 0], [0, 3]] }));
        let b = generate_trace(TraceFamily::DpTable, &json!({ "tablaDP": [[0, 0], [0, 3]] }));
        assert_eq!(a.len(), 2);
        assert_eq!(a, b);
    }

    #[test]
    fn payload_trace_only_for_traced_kinds() {
        use crate::payload::ResultKind;

        let sorting = ResultPayload::from_value(
            ResultKind::Sorting,
            &json!({ "centrosOrdenados": [], "algoritmo": "MergeSort", "complejidad": "O(n log n)" }),
        )
        .unwrap();
        assert!(sorting.trace().is_none());

        let budget = ResultPayload::from_value(
            ResultKind::GreedyBudget,
            &json!({ "distribucion": { "P1": 10.0 }, "presupuestoAsignado": 10.0, "presupuestoRestante": 0.0 }),
        )
        .unwrap();
        assert_eq!(budget.trace().map(|t| t.len()), Some(1));
    }
}
