//! Steps and traces: the replayable record of how an algorithm progressed.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Tag describing what happened at a step.
///
/// The meaning depends on the algorithm family that produced the trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepKind {
    /// A recursive call descended one level
    Call,
    /// A recursive call returned its partial result
    Return,
    /// The recursion reached its base case
    Base,
    /// One unit of a denomination was consumed
    Allocate,
    /// A budget amount was assigned to a project
    Assign,
    /// An edge was added to the spanning tree
    AddEdge,
    /// A vertex's shortest distance was settled
    Settle,
    /// A project was selected by the knapsack solution
    Select,
    /// A DP table row was filled
    FillRow,
}

impl StepKind {
    /// Stable lowercase tag, as used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::Call => "call",
            StepKind::Return => "return",
            StepKind::Base => "base",
            StepKind::Allocate => "allocate",
            StepKind::Assign => "assign",
            StepKind::AddEdge => "add-edge",
            StepKind::Settle => "settle",
            StepKind::Select => "select",
            StepKind::FillRow => "fill-row",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Family-specific data carried by a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "kebab-case")]
pub enum StepPayload {
    /// Linear recursion over route segments.
    Recursion {
        /// Segment value handled at this level; absent on the base case
        cost: Option<f64>,
        /// Sum before the call (`call`) or the partial result (`base`, `return`)
        sum: f64,
        /// Call frames active at this step, e.g. ` → calcularCostoTotal(0)`
        call_stack: String,
    },

    /// Greedy largest-first denomination allocation.
    Allocation {
        denomination: u64,
        /// Total distributed after this unit
        cumulative: u64,
        /// 1-based position across the whole trace
        sequence: usize,
    },

    /// Greedy budget assignment.
    Assignment {
        project: String,
        amount: f64,
        cumulative: f64,
    },

    /// Spanning tree edge addition.
    Edge {
        from: String,
        to: String,
        weight: f64,
        cumulative: f64,
    },

    /// Shortest-path distance from the source.
    Distance {
        source: String,
        vertex: String,
        distance: f64,
    },

    /// Knapsack project selection.
    Selection {
        project: String,
        cost: Option<f64>,
        benefit: Option<f64>,
        cumulative_cost: f64,
        cumulative_benefit: f64,
    },

    /// One row of a dynamic-programming table.
    TableRow { row: Vec<f64> },
}

/// One discrete, renderable moment in a trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub kind: StepKind,
    /// Position within the processed sequence (array index, edge index, ...)
    pub index: usize,
    pub payload: StepPayload,
    /// Human-readable description authored by the generator
    pub message: String,
}

impl Step {
    /// Build a step from its parts.
    pub fn new(kind: StepKind, index: usize, payload: StepPayload, message: impl Into<String>) -> Self {
        Self {
            kind,
            index,
            payload,
            message: message.into(),
        }
    }

    /// Running total the step reports, when its family has one.
    pub fn cumulative(&self) -> Option<f64> {
        match &self.payload {
            StepPayload::Recursion { sum, .. } => Some(*sum),
            StepPayload::Allocation { cumulative, .. } => Some(*cumulative as f64),
            StepPayload::Assignment { cumulative, .. } => Some(*cumulative),
            StepPayload::Edge { cumulative, .. } => Some(*cumulative),
            StepPayload::Selection { cumulative_benefit, .. } => Some(*cumulative_benefit),
            StepPayload::Distance { .. } | StepPayload::TableRow { .. } => None,
        }
    }
}

/// Upper bound on the steps a single trace may hold.
///
/// Payload numbers such as a segment count or a fuel target expand into
/// one step per unit, so they are checked against this before anything is
/// allocated.
pub const MAX_STEPS: usize = 10_000;

/// Fail with [`Error::TooLarge`] when `needed` steps exceed [`MAX_STEPS`].
pub(crate) fn check_steps(needed: u64) -> Result<()> {
    if needed > MAX_STEPS as u64 {
        return Err(Error::TooLarge {
            needed,
            limit: MAX_STEPS,
        });
    }
    Ok(())
}

/// Ordered, immutable sequence of steps.
///
/// Cloning a trace shares the underlying steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trace(Arc<[Step]>);

impl Trace {
    /// Wrap an ordered list of steps.
    pub fn new(steps: Vec<Step>) -> Self {
        Self(Arc::from(steps))
    }

    /// A trace with no steps.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the trace has no steps.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Step at `position`, if any.
    pub fn get(&self, position: usize) -> Option<&Step> {
        self.0.get(position)
    }

    /// All steps in order.
    pub fn steps(&self) -> &[Step] {
        &self.0
    }

    /// Iterate over the steps in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.0.iter()
    }

    /// Number of steps with the given kind.
    pub fn count(&self, kind: StepKind) -> usize {
        self.0.iter().filter(|s| s.kind == kind).count()
    }

    /// Last step, if any.
    pub fn last(&self) -> Option<&Step> {
        self.0.last()
    }
}

impl Default for Trace {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Vec<Step>> for Trace {
    fn from(steps: Vec<Step>) -> Self {
        Self::new(steps)
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
