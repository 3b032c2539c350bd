#![forbid(unsafe_code)]

//! Structured logging emitted by the stack.
//!
//! A capture layer records every event and span so tests can assert on
//! messages and fields without a real subscriber.

use core::time::Duration;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use toastline::{MemorySurface, RenderSurface, StackAttributes, StackConfig, ToastOptions};
use toastline::{NodeAttributes, ToastId, ToastStack};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    message: String,
    fields: HashMap<String, String>,
}

#[derive(Default)]
struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
    spans: Arc<Mutex<Vec<String>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for EventCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        self.spans
            .lock()
            .unwrap()
            .push(attrs.metadata().name().to_string());
    }

    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let mut fields: HashMap<String, String> = visitor.0.into_iter().collect();
        let message = fields.remove("message").unwrap_or_default();
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message,
            fields,
        });
    }
}

struct Captured {
    events: Vec<CapturedEvent>,
    spans: Vec<String>,
}

impl Captured {
    fn messages(&self) -> Vec<&str> {
        self.events.iter().map(|e| e.message.as_str()).collect()
    }

    fn find(&self, message: &str) -> Option<&CapturedEvent> {
        self.events.iter().find(|e| e.message == message)
    }
}

fn capture(f: impl FnOnce()) -> Captured {
    let layer = EventCapture::default();
    let events = Arc::clone(&layer.events);
    let spans = Arc::clone(&layer.spans);
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    let events = events.lock().unwrap().clone();
    let spans = spans.lock().unwrap().clone();
    Captured { events, spans }
}

#[test]
fn lifecycle_is_logged() {
    let captured = capture(|| {
        let stack = ToastStack::with_config(MemorySurface::new(), StackConfig::default());
        let toast = stack.success("Saved", ToastOptions::default());
        stack.advance(Duration::from_millis(4200));
        assert!(!toast.is_alive());
    });

    let messages = captured.messages();
    for expected in [
        "toast stack initialized",
        "toast shown",
        "toast mounted",
        "armed removal timer",
        "toast removed",
        "toast evicted",
    ] {
        assert!(messages.contains(&expected), "missing {expected:?} in {messages:?}");
    }

    let shown = captured.find("toast shown").unwrap();
    assert_eq!(shown.level, tracing::Level::DEBUG);
    assert_eq!(shown.fields.get("kind").map(String::as_str), Some("Success"));

    let removed = captured.find("toast removed").unwrap();
    assert_eq!(removed.fields.get("reason").map(String::as_str), Some("Timeout"));

    assert!(captured.spans.iter().any(|s| s == "toast_stack.advance"));
}

#[test]
fn double_init_logs_reattach() {
    let captured = capture(|| {
        let stack = ToastStack::with_config(MemorySurface::new(), StackConfig::default());
        stack.init(StackConfig::default());
    });
    assert!(
        captured
            .find("toast stack already initialized; re-attached")
            .is_some()
    );
}

/// Surface that attaches nodes but cannot measure them.
#[derive(Default)]
struct BlindSurface {
    nodes: Vec<ToastId>,
}

impl RenderSurface for BlindSurface {
    fn has_stack(&self) -> bool {
        false
    }
    fn create_stack(&mut self, _attrs: &StackAttributes) {}
    fn update_stack(&mut self, _attrs: &StackAttributes) {}
    fn mount(&mut self, node: &NodeAttributes) {
        self.nodes.push(node.id.clone());
    }
    fn update(&mut self, _node: &NodeAttributes) {}
    fn measure_height(&self, _id: &ToastId) -> Option<f64> {
        None
    }
    fn detach(&mut self, id: &ToastId) {
        self.nodes.retain(|n| n != id);
    }
    fn contains(&self, id: &ToastId) -> bool {
        self.nodes.contains(id)
    }
}

#[test]
fn missing_measurement_warns_and_stacks_flat() {
    let captured = capture(|| {
        let stack = ToastStack::with_config(BlindSurface::default(), StackConfig::default());
        let toast = stack.show("a", ToastOptions::default());
        stack.frame();
        let record = stack.snapshot(toast.id()).unwrap();
        assert!(record.state.mounted);
        assert_eq!(record.measured_height(), Some(0.0));
    });

    let warning = captured
        .find("surface returned no height; stacking with zero height")
        .unwrap();
    assert_eq!(warning.level, tracing::Level::WARN);
}
