//! Algorithm Result Visualization
//!
//! Step-by-step playback of algorithm traces, plus static diagrams and
//! explanations for the results they came from.
//!
//! # Architecture
//!
//! - **Playback**: steps through a trace on a timer, cancellable at any time
//! - **Render**: turns one step into a display-ready frame for a target
//! - **Diagram**: circle-layout graphs and DP tables, drawn in one pass
//! - **Explain**: headline, stats, steps and notes for a result payload
//! - **Server**: REST controls and a WebSocket that streams frames
//!
//! # Usage
//!
//! ```ignore
//! let recorder = FrameRecorder::new();
//! let playback = PlaybackController::new(recorder.clone())?;
//! playback.load(generate_recursion_trace(&[10.0, 20.0, 30.0]));
//! playback.play();
//! ```

mod config;
mod diagram;
mod error;
mod explain;
mod playback;
mod render;
mod server;

pub use config::{VisConfig, DEFAULT_MAX_SPEED_MS, DEFAULT_MIN_SPEED_MS, DEFAULT_SPEED_MS};
pub use diagram::{
    circle_layout, escape, render_dp_table, render_graph_progress_svg, render_graph_svg,
    GraphStyle, Point,
};
pub use error::{Error, RenderError, Result};
pub use explain::{explain, explain_value, Explanation, ExplanationStep, Headline, Stat};
pub use playback::{PlaybackController, PlaybackState, PlaybackStatus};
pub use render::{
    render, render_at, BroadcastTarget, DetailRow, Frame, FrameRecorder, RenderTarget, PLACEHOLDER,
};
pub use server::{ExplainResponse, VisServer, VisualizeResponse};
