//! Call/return trace for a naive linear recursion over route segments.
//!
//! The modeled function is
//!
//! ```text
//! f(i) = 0                    if i >= n
//! f(i) = tramo[i] + f(i + 1)  otherwise
//! ```
//!
//! The trace lists the `n` descending calls, the base case, then the `n`
//! returns in reverse index order. Frames are built iteratively so long
//! inputs never grow the native stack.

use crate::format::amount;
use crate::payload::RouteMetric;
use crate::step::{Step, StepKind, StepPayload, Trace};

/// Innermost frames kept in a step's call stack; deeper stacks are elided.
const STACK_FRAMES_SHOWN: usize = 12;

/// Steps a recursion over `segments` segments produces.
pub(crate) fn recursion_steps(segments: u64) -> u64 {
    segments.saturating_mul(2).saturating_add(1)
}

/// Call stack text at `depth` frames, outermost first.
fn call_stack(name: &str, depth: usize) -> String {
    let first = depth.saturating_sub(STACK_FRAMES_SHOWN);
    let mut stack = String::new();
    if first > 0 {
        stack.push_str(" → …");
    }
    for level in first..depth {
        stack.push_str(&format!(" → {name}({level})"));
    }
    stack
}

/// Trace the recursive total of route segment costs.
pub fn generate_recursion_trace(segments: &[f64]) -> Trace {
    generate_metric_recursion_trace(segments, RouteMetric::Cost)
}

/// Trace the recursive total of a route metric.
///
/// The metric only selects the function name shown in call stacks.
pub fn generate_metric_recursion_trace(segments: &[f64], metric: RouteMetric) -> Trace {
    let n = segments.len();
    let name = metric.function_name();
    let mut steps = Vec::with_capacity(2 * n + 1);

    let mut sum = 0.0;
    for (index, &cost) in segments.iter().enumerate() {
        steps.push(Step::new(
            StepKind::Call,
            index,
            StepPayload::Recursion {
                cost: Some(cost),
                sum,
                call_stack: call_stack(name, index + 1),
            },
            format!("Llamada recursiva: suma tramo[{index}] = {}", amount(cost)),
        ));
        sum += cost;
    }

    steps.push(Step::new(
        StepKind::Base,
        n,
        StepPayload::Recursion {
            cost: None,
            sum,
            call_stack: call_stack(name, n),
        },
        format!("Caso base alcanzado: index == {n}, retornando 0"),
    ));

    let mut returned = 0.0;
    for index in (0..n).rev() {
        let cost = segments[index];
        let deeper = returned;
        returned += cost;
        steps.push(Step::new(
            StepKind::Return,
            index,
            StepPayload::Recursion {
                cost: Some(cost),
                sum: returned,
                call_stack: call_stack(name, index),
            },
            format!(
                "Retornando: {} ({} + resultado del siguiente = {})",
                amount(returned),
                amount(cost),
                amount(deeper)
            ),
        ));
    }

    Trace::new(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn call_stack(step: &Step) -> &str {
        match &step.payload {
            StepPayload::Recursion { call_stack, .. } => call_stack,
            other => panic!("unexpected payload {other:?}"),
        }
    }

    fn sum(step: &Step) -> f64 {
        match &step.payload {
            StepPayload::Recursion { sum, .. } => *sum,
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn empty_input_is_single_base() {
        let trace = generate_recursion_trace(&[]);

        assert_eq!(trace.len(), 1);
        let base = &trace.steps()[0];
        assert_eq!(base.kind, StepKind::Base);
        assert_eq!(sum(base), 0.0);
        assert_eq!(call_stack(base), "");
    }

    #[test]
    fn three_segments_layout() {
        let trace = generate_recursion_trace(&[10.0, 20.0, 30.0]);
        let kinds: Vec<_> = trace.iter().map(|s| s.kind).collect();
        let indices: Vec<_> = trace.iter().map(|s| s.index).collect();

        use StepKind::*;
        assert_eq!(kinds, vec![Call, Call, Call, Base, Return, Return, Return]);
        assert_eq!(indices, vec![0, 1, 2, 3, 2, 1, 0]);

        let sums: Vec<_> = trace.iter().map(sum).collect();
        assert_eq!(sums, vec![0.0, 10.0, 30.0, 60.0, 30.0, 50.0, 60.0]);
    }

    #[test]
    fn call_stack_grows_and_unwinds() {
        let trace = generate_recursion_trace(&[1.0, 2.0]);
        let steps = trace.steps();

        assert_eq!(call_stack(&steps[0]), " → calcularCostoTotal(0)");
        assert_eq!(
            call_stack(&steps[1]),
            " → calcularCostoTotal(0) → calcularCostoTotal(1)"
        );
        // base keeps the deepest stack
        assert_eq!(call_stack(&steps[2]), call_stack(&steps[1]));
        // return at level 1 shows the stack before level 1 was entered
        assert_eq!(call_stack(&steps[3]), call_stack(&steps[0]));
        assert_eq!(call_stack(&steps[4]), "");
    }

    #[test]
    fn base_step_has_no_cost() {
        let trace = generate_recursion_trace(&[5.0]);
        let base = trace.iter().find(|s| s.kind == StepKind::Base).unwrap();
        assert!(matches!(base.payload, StepPayload::Recursion { cost: None, .. }));
        assert_eq!(base.message, "Caso base alcanzado: index == 1, retornando 0");
    }

    #[test]
    fn distance_metric_names_function() {
        let trace = generate_metric_recursion_trace(&[3.0], RouteMetric::Distance);
        assert_eq!(call_stack(&trace.steps()[0]), " → calcularDistanciaTotal(0)");
    }

    #[test]
    fn deep_call_stacks_keep_innermost_frames() {
        let segments = vec![1.0; 40];
        let trace = generate_recursion_trace(&segments);
        let deepest = call_stack(&trace.steps()[39]);

        assert!(deepest.starts_with(" → … → calcularCostoTotal(28)"));
        assert!(deepest.ends_with("calcularCostoTotal(39)"));
        assert_eq!(deepest.matches("calcularCostoTotal").count(), STACK_FRAMES_SHOWN);
    }

    #[test]
    fn input_is_left_untouched() {
        let segments = vec![3.0, 1.0, 2.0];
        let _ = generate_recursion_trace(&segments);
        assert_eq!(segments, vec![3.0, 1.0, 2.0]);
    }

    proptest! {
        #[test]
        fn trace_is_correctly_nested(values in proptest::collection::vec(0u32..1000, 0..40)) {
            let segments: Vec<f64> = values.iter().map(|&v| f64::from(v)).collect();
            let n = segments.len();
            let trace = generate_recursion_trace(&segments);

            prop_assert_eq!(trace.len(), 2 * n + 1);
            prop_assert_eq!(trace.count(StepKind::Call), n);
            prop_assert_eq!(trace.count(StepKind::Base), 1);
            prop_assert_eq!(trace.count(StepKind::Return), n);

            let mut depth: i64 = 0;
            let mut open = Vec::new();
            for (position, step) in trace.iter().enumerate() {
                match step.kind {
                    StepKind::Call => {
                        depth += 1;
                        open.push(step.index);
                    }
                    StepKind::Return => {
                        prop_assert_eq!(open.pop(), Some(step.index));
                        depth -= 1;
                    }
                    StepKind::Base => prop_assert_eq!(depth as usize, n),
                    _ => prop_assert!(false, "unexpected kind {:?}", step.kind),
                }
                if position + 1 < trace.len() && n > 0 {
                    prop_assert!(depth > 0);
                }
            }
            prop_assert_eq!(depth, 0);

            let total: f64 = segments.iter().sum();
            prop_assert_eq!(trace.last().map(sum), Some(total));
        }
    }
}
