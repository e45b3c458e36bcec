//! Algorithm Step Traces
//!
//! Turns the result payloads of a remote algorithm-computation service into
//! ordered, replayable step traces.
//!
//! # Families
//!
//! - **Recursion**: call, base and return frames of a linear recursion
//! - **Greedy**: one step per container used, or per project funded
//! - **MST**: edges in construction order with a running weight
//! - **Shortest path**: vertices settled nearest first
//! - **Knapsack**: selected projects, and the DP table row by row
//!
//! Traces describe what the service already decided. Nothing here re-runs
//! or validates the algorithms.
//!
//! # Usage
//!
//! ```ignore
//! let trace = generate_trace(TraceFamily::GreedyFuel, &json!({
//!     "cantidadRequerida": 17,
//!     "tamanosDisponibles": [10, 5, 1]
//! }));
//! assert_eq!(trace.len(), 4);
//! ```

mod error;
mod family;
pub mod format;
mod greedy;
mod knapsack;
mod mst;
mod payload;
mod recursion;
mod shortest_path;
mod step;

pub use error::{Error, Result};
pub use family::{generate_trace, try_generate_trace, TraceFamily};
pub use greedy::{
    allocate, generate_budget_trace, generate_greedy_trace, AllocationRequest, GreedyAllocation,
};
pub use knapsack::{generate_dp_table_trace, generate_knapsack_trace};
pub use mst::{generate_mst_trace, MstAlgorithm};
pub use payload::{
    BinarySearchResult, BudgetDistributionResult, Center, CombinedMetricsResult, DpTable,
    FuelDistributionResult, KnapsackComparison, KnapsackResult, KnapsackSummary, Label, MstEdge,
    MstResult, PerformanceComparison, Project, RecursionResult, ResultKind, ResultPayload,
    RouteMetric, ShortestPathResult, SortResult, TimedRun, DEFAULT_SEGMENTS,
};
pub use recursion::{generate_metric_recursion_trace, generate_recursion_trace};
pub use shortest_path::generate_shortest_path_trace;
pub use step::{Step, StepKind, StepPayload, Trace, MAX_STEPS};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn recursion_trace_shape() {
        let trace = generate_recursion_trace(&[10.0, 20.0, 30.0]);

        assert_eq!(trace.len(), 7);
        assert_eq!(trace.count(StepKind::Call), 3);
        assert_eq!(trace.count(StepKind::Base), 1);
        assert_eq!(trace.count(StepKind::Return), 3);
        assert_eq!(trace.steps()[3].kind, StepKind::Base);
        assert_eq!(trace.last().and_then(Step::cumulative), Some(60.0));
    }

    #[test]
    fn traces_serialize_as_step_arrays() {
        let trace = generate_trace(
            TraceFamily::MstKruskal,
            &json!([{ "from": "A", "to": "B", "weight": 3 }]),
        );

        let value = serde_json::to_value(&trace).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["kind"], "add-edge");
        assert_eq!(value[0]["payload"]["family"], "edge");
    }
}
