use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::{Id, Subscriber};
use tracing_subscriber::{Layer, layer::Context, registry::LookupSpan};

/// Span name prefix of the pipeline stages that get timed.
pub const STAGE_PREFIX: &str = "folio.";

/// One closed stage span.
#[derive(Debug, Clone, Serialize)]
pub struct StageTiming {
    pub name: String,
    #[serde(rename = "parent", skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(rename = "duration_ms", serialize_with = "as_millis")]
    pub duration: Duration,
    pub fields: HashMap<String, serde_json::Value>,
}

fn as_millis<S: serde::Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64() * 1000.0)
}

/// Shared storage for stage timings, in the order the stages finished.
#[derive(Debug, Clone, Default)]
pub struct StageTimings {
    records: Arc<RwLock<Vec<StageTiming>>>,
}

impl StageTimings {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded stages, in completion order.
    pub fn records(&self) -> Vec<StageTiming> {
        self.records.read().map(|r| r.clone()).unwrap_or_default()
    }

    /// Total time spent in stages called `name`.
    pub fn total(&self, name: &str) -> Duration {
        self.records
            .read()
            .map(|r| r.iter().filter(|t| t.name == name).map(|t| t.duration).sum())
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut records) = self.records.write() {
            records.clear();
        }
    }

    fn push(&self, timing: StageTiming) {
        if let Ok(mut records) = self.records.write() {
            records.push(timing);
        }
    }

    /// Render a two-column table of stage names and durations.
    pub fn render(&self) -> String {
        let records = self.records();
        let width = records.iter().map(|r| r.name.len()).max().unwrap_or(0).max("stage".len());
        let mut out = format!("{:<width$}  {:>10}\n", "stage", "ms");
        for record in &records {
            let _ = writeln!(
                out,
                "{:<width$}  {:>10.1}",
                record.name,
                record.duration.as_secs_f64() * 1000.0
            );
        }
        out
    }
}

/// A tracing layer that records how long each `folio.*` span was open.
pub struct StageTimingLayer {
    storage: StageTimings,
}

impl StageTimingLayer {
    pub fn new(storage: StageTimings) -> Self {
        Self { storage }
    }
}

#[derive(Clone)]
struct SpanFields(HashMap<String, serde_json::Value>);

struct Opened(Instant);

impl<S> Layer<S> for StageTimingLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &tracing::span::Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        if !attrs.metadata().name().starts_with(STAGE_PREFIX) {
            return;
        }
        let Some(span) = ctx.span(id) else { return };
        let mut visitor = JsonVisitor::default();
        attrs.record(&mut visitor);

        let mut extensions = span.extensions_mut();
        extensions.insert(Opened(Instant::now()));
        extensions.insert(SpanFields(visitor.0));
    }

    fn on_record(&self, id: &Id, values: &tracing::span::Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else { return };
        let mut extensions = span.extensions_mut();
        if let Some(fields) = extensions.get_mut::<SpanFields>() {
            let mut visitor = JsonVisitor::default();
            values.record(&mut visitor);
            fields.0.extend(visitor.0);
        }
    }

    fn on_close(&self, id: Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(&id) else { return };
        let extensions = span.extensions();
        let Some(Opened(opened)) = extensions.get::<Opened>() else { return };

        let parent = span
            .scope()
            .skip(1)
            .map(|s| s.name())
            .find(|name| name.starts_with(STAGE_PREFIX))
            .map(str::to_string);

        self.storage.push(StageTiming {
            name: span.name().to_string(),
            parent,
            duration: opened.elapsed(),
            fields: extensions.get::<SpanFields>().map(|f| f.0.clone()).unwrap_or_default(),
        });
    }
}

#[derive(Default)]
struct JsonVisitor(HashMap<String, serde_json::Value>);

impl tracing::field::Visit for JsonVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.insert(field.name().to_string(), serde_json::Value::String(format!("{:?}", value)));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.insert(field.name().to_string(), serde_json::Value::String(value.to_string()));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.insert(field.name().to_string(), serde_json::Value::Bool(value));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }
}
