use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub enum Event {
    RunStarted {
        run_id: Uuid,
        steps: usize,
    },
    RunFinished {
        run_id: Uuid,
        status: u16,
    },
    CallStarted {
        run_id: Uuid,
        index: usize,
        method: String,
        url: String,
    },
    CallFinished {
        run_id: Uuid,
        index: usize,
        status: u16,
    },
    VariableBound {
        run_id: Uuid,
        index: usize,
        name: String,
    },
    StepFailed {
        run_id: Uuid,
        index: Option<usize>,
        status: u16,
        reason: String,
    },
}

impl Event {
    pub fn kind(&self) -> &'static str {
        match self {
            Event::RunStarted { .. } => "run.started",
            Event::RunFinished { .. } => "run.finished",
            Event::CallStarted { .. } => "call.started",
            Event::CallFinished { .. } => "call.finished",
            Event::VariableBound { .. } => "variable.bound",
            Event::StepFailed { .. } => "step.failed",
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        let kind = self.kind();
        match self {
            Event::RunStarted { run_id, steps } => {
                json!({ "type": kind, "run_id": run_id.to_string(), "steps": steps })
            }
            Event::RunFinished { run_id, status } => {
                json!({ "type": kind, "run_id": run_id.to_string(), "status": status })
            }
            Event::CallStarted { run_id, index, method, url } => {
                json!({ "type": kind, "run_id": run_id.to_string(), "index": index, "method": method, "url": url })
            }
            Event::CallFinished { run_id, index, status } => {
                json!({ "type": kind, "run_id": run_id.to_string(), "index": index, "status": status })
            }
            Event::VariableBound { run_id, index, name } => {
                json!({ "type": kind, "run_id": run_id.to_string(), "index": index, "name": name })
            }
            Event::StepFailed { run_id, index, status, reason } => {
                json!({ "type": kind, "run_id": run_id.to_string(), "index": index, "status": status, "reason": reason })
            }
        }
    }
}

#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: Event);
}

pub struct CompositeEventSink {
    sinks: Vec<Box<dyn EventSink>>,
}

impl Default for CompositeEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl CompositeEventSink {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn add(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }
}

#[async_trait]
impl EventSink for CompositeEventSink {
    async fn emit(&self, event: Event) {
        for sink in &self.sinks {
            sink.emit(event.clone()).await;
        }
    }
}

/// One JSON object per line on stdout.
pub struct StdoutEventSink;

#[async_trait]
impl EventSink for StdoutEventSink {
    async fn emit(&self, event: Event) {
        println!("{}", serde_json::to_string(&event.to_json()).unwrap_or_default());
    }
}

/// Forwards events to the `log` facade, levelled by severity.
pub struct LogEventSink;

#[async_trait]
impl EventSink for LogEventSink {
    async fn emit(&self, event: Event) {
        let level = match &event {
            Event::StepFailed { status, .. } if *status >= 500 => log::Level::Error,
            Event::StepFailed { .. } => log::Level::Warn,
            Event::RunStarted { .. } | Event::RunFinished { .. } => log::Level::Info,
            _ => log::Level::Debug,
        };
        log::log!(target: "composite_exec::events", level, "{}", event.to_json());
    }
}

pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event: Event) {}
}
