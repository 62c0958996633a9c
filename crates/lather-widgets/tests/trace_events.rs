#![forbid(unsafe_code)]
#![cfg(feature = "tracing")]

//! Widget lifecycle events are visible to a tracing subscriber.

use std::sync::{Arc, Mutex};

use lather_core::dom::Document;
use lather_core::html::{Html, el};
use lather_widgets::{PanelOptions, ToastKind, UiContext};
use tracing::Subscriber;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};
use web_time::Duration;

#[derive(Clone, Default)]
struct MessageCapture {
    messages: Arc<Mutex<Vec<String>>>,
}

impl<S> Layer<S> for MessageCapture
where
    S: Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        struct V(Option<String>);
        impl tracing::field::Visit for V {
            fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
                if field.name() == "message" {
                    self.0 = Some(format!("{value:?}"));
                }
            }
        }
        let mut v = V(None);
        event.record(&mut v);
        if let Some(message) = v.0 {
            self.messages.lock().expect("capture lock").push(message);
        }
    }
}

#[test]
fn panel_and_toast_lifecycle_emit_debug_events() {
    let capture = MessageCapture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());

    tracing::subscriber::with_default(subscriber, || {
        let doc = Document::from_html(&Html::fragment([
            el("main").id("main-content"),
            el("aside").id("fatPanel").child(el("h2").text("Olive")),
        ]));
        let mut ui = UiContext::new(doc);
        ui.open_panel("fatPanel", "fatPanelOverlay", PanelOptions::default());
        ui.close_current_panel();
        ui.show_toast("Saved", ToastKind::Success, Duration::from_millis(100));
        ui.advance(Duration::from_millis(400));
    });

    let messages = capture.messages.lock().expect("capture lock");
    for expected in ["panel.open", "panel.close", "toast.show", "toast.hide", "toast.detach"] {
        assert!(
            messages.iter().any(|m| m == expected),
            "missing {expected} in {messages:?}"
        );
    }
}
