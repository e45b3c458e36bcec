//! Greedy largest-first allocation traces.
//!
//! Fuel is handed out in fixed-size containers (bidones). The greedy rule
//! always takes the largest container that still fits in what is left, and
//! the trace records every single container used.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::format::amount;
use crate::step::{check_steps, Step, StepKind, StepPayload, Trace};

/// A bare allocation request: target amount and container sizes on offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationRequest {
    pub cantidad_requerida: u64,
    pub tamanos_disponibles: Vec<u64>,
}

/// Outcome of replaying a greedy allocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GreedyAllocation {
    pub required: u64,
    /// `(denomination, units)` in the order they were consumed
    pub usage: Vec<(u64, u64)>,
    pub distributed: u64,
    pub trace: Trace,
}

impl GreedyAllocation {
    /// Part of the target no denomination could cover.
    pub fn remainder(&self) -> u64 {
        self.required - self.distributed
    }

    /// Total number of containers used.
    pub fn units(&self) -> u64 {
        self.usage.iter().map(|(_, units)| units).sum()
    }
}

/// Replay the greedy allocation of `required` over `denominations`.
///
/// The caller's slice is not reordered; zero-sized denominations are
/// ignored. Every container becomes a step, so a target needing more than
/// [`MAX_STEPS`](crate::MAX_STEPS) containers is rejected up front.
pub fn allocate(required: u64, denominations: &[u64]) -> Result<GreedyAllocation> {
    let mut sorted: Vec<u64> = denominations.iter().copied().filter(|&d| d > 0).collect();
    sorted.sort_unstable_by(|a, b| b.cmp(a));

    let mut left = required;
    let mut containers: u64 = 0;
    for &denomination in &sorted {
        containers = containers.saturating_add(left / denomination);
        left %= denomination;
    }
    check_steps(containers)?;

    let mut remaining = required;
    let mut distributed = 0;
    let mut usage = Vec::new();
    let mut steps = Vec::new();

    for (index, &denomination) in sorted.iter().enumerate() {
        if remaining == 0 {
            break;
        }

        let units = remaining / denomination;
        for _ in 0..units {
            remaining -= denomination;
            distributed += denomination;
            let sequence = steps.len() + 1;
            steps.push(Step::new(
                StepKind::Allocate,
                index,
                StepPayload::Allocation {
                    denomination,
                    cumulative: distributed,
                    sequence,
                },
                format!(
                    "Paso {sequence}: usar bidón de {denomination}L, total acumulado {distributed}L"
                ),
            ));
        }

        if units > 0 {
            usage.push((denomination, units));
        }
    }

    Ok(GreedyAllocation {
        required,
        usage,
        distributed,
        trace: Trace::new(steps),
    })
}

/// Trace the greedy allocation of `required` over `denominations`.
pub fn generate_greedy_trace(required: u64, denominations: &[u64]) -> Result<Trace> {
    allocate(required, denominations).map(|allocation| allocation.trace)
}

/// Trace a budget distribution in the order projects were funded.
pub fn generate_budget_trace(distribution: &IndexMap<String, f64>) -> Trace {
    let mut cumulative = 0.0;
    let steps = distribution
        .iter()
        .enumerate()
        .map(|(index, (project, &assigned))| {
            cumulative += assigned;
            Step::new(
                StepKind::Assign,
                index,
                StepPayload::Assignment {
                    project: project.clone(),
                    amount: assigned,
                    cumulative,
                },
                format!(
                    "Asignar ${} a {project} según su ratio beneficio/costo (total asignado ${})",
                    amount(assigned),
                    amount(cumulative)
                ),
            )
        })
        .collect();
    Trace::new(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::step::MAX_STEPS;
    use proptest::prelude::*;

    fn allocations(trace: &Trace) -> Vec<(u64, u64, usize)> {
        trace
            .iter()
            .map(|s| match s.payload {
                StepPayload::Allocation {
                    denomination,
                    cumulative,
                    sequence,
                } => (denomination, cumulative, sequence),
                ref other => panic!("unexpected payload {other:?}"),
            })
            .collect()
    }

    #[test]
    fn seventeen_over_ten_five_one() {
        let allocation = allocate(17, &[10, 5, 1]).unwrap();

        assert_eq!(
            allocations(&allocation.trace),
            vec![(10, 10, 1), (5, 15, 2), (1, 16, 3), (1, 17, 4)]
        );
        assert_eq!(allocation.remainder(), 0);
        assert_eq!(allocation.usage, vec![(10, 1), (5, 1), (1, 2)]);
        assert_eq!(allocation.units(), 4);
    }

    #[test]
    fn unrepresentable_target_reports_remainder() {
        let allocation = allocate(7, &[5, 3]).unwrap();

        assert_eq!(allocations(&allocation.trace), vec![(5, 5, 1)]);
        assert_eq!(allocation.distributed, 5);
        assert_eq!(allocation.remainder(), 2);
    }

    #[test]
    fn unsorted_input_is_not_mutated() {
        let sizes = vec![1, 20, 5, 50];
        let trace = generate_greedy_trace(87, &sizes).unwrap();

        assert_eq!(sizes, vec![1, 20, 5, 50]);
        let used: Vec<u64> = allocations(&trace).iter().map(|a| a.0).collect();
        assert_eq!(used, vec![50, 20, 5, 5, 5, 1, 1]);
    }

    #[test]
    fn zero_sizes_and_zero_target() {
        assert!(generate_greedy_trace(10, &[0]).unwrap().is_empty());
        assert!(generate_greedy_trace(0, &[5, 1]).unwrap().is_empty());
        assert!(generate_greedy_trace(10, &[]).unwrap().is_empty());
    }

    #[test]
    fn budget_trace_keeps_payload_order() {
        let mut distribution = IndexMap::new();
        distribution.insert("Ruta Norte".to_string(), 400.0);
        distribution.insert("Almacén".to_string(), 250.5);

        let trace = generate_budget_trace(&distribution);
        assert_eq!(trace.len(), 2);
        assert!(matches!(
            &trace.steps()[1].payload,
            StepPayload::Assignment { project, cumulative, .. }
                if project == "Almacén" && *cumulative == 650.5
        ));
    }

    #[test]
    fn container_count_is_bounded() {
        let at_limit = allocate(MAX_STEPS as u64, &[1]).unwrap();
        assert_eq!(at_limit.trace.len(), MAX_STEPS);

        assert!(matches!(
            allocate(MAX_STEPS as u64 + 1, &[1]),
            Err(Error::TooLarge { needed, .. }) if needed == MAX_STEPS as u64 + 1
        ));
        // large targets are fine when big containers cover them
        assert_eq!(allocate(1_000_000_000, &[1_000_000]).unwrap().units(), 1_000);
        assert!(allocate(u64::MAX, &[1, 2, 3]).is_err());
    }

    proptest! {
        #[test]
        fn cumulative_matches_running_sum(
            required in 0u64..500,
            sizes in proptest::collection::vec(0u64..60, 0..6),
        ) {
            let allocation = allocate(required, &sizes).unwrap();
            let mut running = 0;
            for (position, (denomination, cumulative, sequence)) in
                allocations(&allocation.trace).into_iter().enumerate()
            {
                running += denomination;
                prop_assert_eq!(cumulative, running);
                prop_assert_eq!(sequence, position + 1);
            }
            prop_assert_eq!(allocation.distributed, running);
            prop_assert!(allocation.distributed <= required);
            prop_assert_eq!(allocation.units() as usize, allocation.trace.len());
        }
    }
}
