//! Frame rendering: one step in, one display-ready frame out.
//!
//! Rendering is stateless. Where a frame ends up is decided by a
//! [`RenderTarget`], so the playback controller never touches a surface
//! directly.

use std::fmt::Write as _;
use std::sync::{Arc, Mutex, PoisonError};

use algoviz_trace::format::amount;
use algoviz_trace::{Step, StepKind, StepPayload, Trace};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::diagram::escape;
use crate::error::RenderError;

/// Text shown when there is nothing to render.
pub const PLACEHOLDER: &str = "Sin datos";

/// One labelled value inside a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailRow {
    pub label: String,
    pub value: String,
    /// Running totals are highlighted
    pub highlight: bool,
}

impl DetailRow {
    fn plain(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
            highlight: false,
        }
    }

    fn highlighted(label: &str, value: impl Into<String>) -> Self {
        Self {
            highlight: true,
            ..Self::plain(label, value)
        }
    }
}

/// Display-ready view of a single step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// `Paso k de n`, empty on the placeholder
    pub indicator: String,
    pub position: usize,
    pub total: usize,
    pub kind: Option<StepKind>,
    pub message: String,
    pub details: Vec<DetailRow>,
    pub call_stack: Option<String>,
}

impl Frame {
    /// The "no data" frame.
    pub fn placeholder() -> Self {
        Self {
            indicator: String::new(),
            position: 0,
            total: 0,
            kind: None,
            message: PLACEHOLDER.to_string(),
            details: Vec::new(),
            call_stack: None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.kind.is_none()
    }

    /// Detail row with the given label, if present.
    pub fn detail(&self, label: &str) -> Option<&DetailRow> {
        self.details.iter().find(|row| row.label == label)
    }

    /// Plain-text rendering, one line per element.
    pub fn to_text(&self) -> String {
        if self.is_placeholder() {
            return self.message.clone();
        }

        let mut out = String::new();
        let _ = writeln!(out, "{}", self.indicator);
        let _ = writeln!(out, "{}", self.message);
        for row in &self.details {
            let marker = if row.highlight { "*" } else { " " };
            let _ = writeln!(out, "{marker} {}: {}", row.label, row.value);
        }
        if let Some(stack) = &self.call_stack {
            let _ = writeln!(out, "  Pila de llamadas: {stack}");
        }
        out.truncate(out.trim_end().len());
        out
    }

    /// HTML fragment for the step panel.
    pub fn to_html(&self) -> String {
        if self.is_placeholder() {
            return format!(
                r#"<div class="viz-frame viz-placeholder">{}</div>"#,
                escape(&self.message)
            );
        }

        let kind = self.kind.map(|k| k.as_str()).unwrap_or_default();
        let mut html = format!(r#"<div class="viz-frame" data-kind="{kind}">"#);
        let _ = write!(
            html,
            r#"<div class="step-indicator">{}</div><div class="step-message">{}</div>"#,
            escape(&self.indicator),
            escape(&self.message)
        );
        if !self.details.is_empty() {
            html.push_str(r#"<dl class="step-details">"#);
            for row in &self.details {
                let class = if row.highlight { r#" class="highlight""# } else { "" };
                let _ = write!(
                    html,
                    "<dt>{}</dt><dd{class}>{}</dd>",
                    escape(&row.label),
                    escape(&row.value)
                );
            }
            html.push_str("</dl>");
        }
        if let Some(stack) = &self.call_stack {
            let _ = write!(html, r#"<pre class="call-stack">{}</pre>"#, escape(stack));
        }
        html.push_str("</div>");
        html
    }
}

/// Render the step at `position` of a `total`-step trace.
pub fn render(step: &Step, position: usize, total: usize) -> Frame {
    let details = match &step.payload {
        StepPayload::Recursion { cost, sum, .. } => {
            let mut rows = vec![DetailRow::plain("Índice", step.index.to_string())];
            if let Some(cost) = cost {
                rows.push(DetailRow::plain("Costo del tramo", amount(*cost)));
            }
            rows.push(DetailRow::highlighted("Suma acumulada", amount(*sum)));
            rows
        }
        StepPayload::Allocation {
            denomination,
            cumulative,
            sequence,
        } => vec![
            DetailRow::plain("Bidón", format!("{denomination}L")),
            DetailRow::plain("Unidad", sequence.to_string()),
            DetailRow::highlighted("Total acumulado", format!("{cumulative}L")),
        ],
        StepPayload::Assignment {
            project,
            amount: assigned,
            cumulative,
        } => vec![
            DetailRow::plain("Proyecto", project.as_str()),
            DetailRow::plain("Monto asignado", format!("${}", amount(*assigned))),
            DetailRow::highlighted("Total asignado", format!("${}", amount(*cumulative))),
        ],
        StepPayload::Edge {
            from,
            to,
            weight,
            cumulative,
        } => vec![
            DetailRow::plain("Ruta", format!("{from} → {to}")),
            DetailRow::plain("Peso", amount(*weight)),
            DetailRow::highlighted("Costo acumulado", amount(*cumulative)),
        ],
        StepPayload::Distance {
            source,
            vertex,
            distance,
        } => vec![
            DetailRow::plain("Origen", source.as_str()),
            DetailRow::plain("Destino", vertex.as_str()),
            DetailRow::highlighted("Distancia", amount(*distance)),
        ],
        StepPayload::Selection {
            project,
            cost,
            benefit,
            cumulative_cost,
            cumulative_benefit,
        } => {
            let mut rows = vec![DetailRow::plain("Proyecto", project.as_str())];
            if let Some(cost) = cost {
                rows.push(DetailRow::plain("Costo", format!("${}", amount(*cost))));
            }
            if let Some(benefit) = benefit {
                rows.push(DetailRow::plain("Beneficio", format!("${}", amount(*benefit))));
            }
            rows.push(DetailRow::highlighted(
                "Beneficio acumulado",
                format!("${}", amount(*cumulative_benefit)),
            ));
            rows.push(DetailRow::plain(
                "Costo acumulado",
                format!("${}", amount(*cumulative_cost)),
            ));
            rows
        }
        StepPayload::TableRow { row } => {
            let values: Vec<String> = row.iter().map(|v| amount(*v)).collect();
            let best = row.iter().copied().fold(0.0, f64::max);
            vec![
                DetailRow::plain("Fila", step.index.to_string()),
                DetailRow::plain("Valores", values.join(" | ")),
                DetailRow::highlighted("Mejor beneficio", amount(best)),
            ]
        }
    };

    let call_stack = match &step.payload {
        StepPayload::Recursion { call_stack, .. } if call_stack.trim().is_empty() => {
            Some("inicio".to_string())
        }
        StepPayload::Recursion { call_stack, .. } => Some(call_stack.trim_start().to_string()),
        _ => None,
    };

    Frame {
        indicator: format!("Paso {} de {}", position + 1, total),
        position,
        total,
        kind: Some(step.kind),
        message: step.message.clone(),
        details,
        call_stack,
    }
}

/// Render `trace[position]`, or the placeholder when there is no such step.
pub fn render_at(trace: &Trace, position: usize) -> Frame {
    match trace.get(position) {
        Some(step) => render(step, position, trace.len()),
        None => Frame::placeholder(),
    }
}

/// Where rendered frames are presented.
pub trait RenderTarget: Send {
    fn present(&mut self, frame: Frame) -> Result<(), RenderError>;
}

/// In-memory target that keeps every frame it is given.
///
/// Clones share the same frame list, so a test can keep one handle while
/// the controller owns another.
#[derive(Debug, Clone, Default)]
pub struct FrameRecorder {
    frames: Arc<Mutex<Vec<Frame>>>,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all frames presented so far.
    pub fn frames(&self) -> Vec<Frame> {
        self.lock().clone()
    }

    pub fn last(&self) -> Option<Frame> {
        self.lock().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Frame>> {
        self.frames.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RenderTarget for FrameRecorder {
    fn present(&mut self, frame: Frame) -> Result<(), RenderError> {
        self.lock().push(frame);
        Ok(())
    }
}

/// Fans frames out to every subscribed client.
///
/// The most recent frame is kept so late subscribers can catch up.
#[derive(Debug, Clone)]
pub struct BroadcastTarget {
    sender: broadcast::Sender<Frame>,
    latest: Arc<Mutex<Option<Frame>>>,
}

impl BroadcastTarget {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            latest: Arc::new(Mutex::new(None)),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Frame> {
        self.sender.subscribe()
    }

    /// Last frame presented, whether or not anyone received it.
    pub fn latest(&self) -> Option<Frame> {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl RenderTarget for BroadcastTarget {
    fn present(&mut self, frame: Frame) -> Result<(), RenderError> {
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = Some(frame.clone());
        self.sender
            .send(frame)
            .map(|_| ())
            .map_err(|_| RenderError::TargetNotFound("no connected viewers".into()))
    }
}
