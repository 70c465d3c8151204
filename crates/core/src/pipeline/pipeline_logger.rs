use std::collections::HashMap;
use std::time::Instant;

use crate::pipeline::pipeline_stage::PipelineStage;

/// Request-scoped observer for pipeline orchestration events.
///
/// Decouples the use cases from where events end up (the `log` crate,
/// a test recorder, nothing at all).
pub trait PipelineLogger: Send {
    /// Record a state transition.
    fn stage(&mut self, stage: PipelineStage);

    /// Record how long one external call took.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-request summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn stage(&mut self, _stage: PipelineStage) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Forwards events to the `log` crate, tagged with the request label,
/// and keeps the stage trail and per-call timings for a summary.
pub struct LogPipelineLogger {
    label: String,
    stages: Vec<PipelineStage>,
    timings: HashMap<String, Vec<f64>>,
    start_time: Instant,
    messages: Vec<String>,
}

impl LogPipelineLogger {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            stages: Vec::new(),
            timings: HashMap::new(),
            start_time: Instant::now(),
            messages: Vec::new(),
        }
    }

    /// Every stage entered so far, in order.
    pub fn stages(&self) -> &[PipelineStage] {
        &self.stages
    }

    pub fn current_stage(&self) -> Option<PipelineStage> {
        self.stages.last().copied()
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }

    /// Returns the formatted summary string, or `None` if nothing was timed.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let outcome = self
            .current_stage()
            .map_or("unknown", PipelineStage::as_str);
        let mut lines = vec![format!(
            "[{}] {outcome} in {:.1}s:",
            self.label,
            elapsed_ms / 1000.0
        )];

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let total_ms: f64 = self.timings[stage].iter().sum();
            lines.push(format!("  {stage:10}: {total_ms:7.0}ms"));
        }

        Some(lines.join("\n"))
    }
}

impl PipelineLogger for LogPipelineLogger {
    fn stage(&mut self, stage: PipelineStage) {
        log::debug!("[{}] -> {stage}", self.label);
        self.stages.push(stage);
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn info(&mut self, message: &str) {
        self.messages.push(message.to_string());
        log::info!("[{}] {message}", self.label);
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("{text}");
        }
    }
}
