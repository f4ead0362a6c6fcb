//! Example: Drive one tap through the activation service and print what the
//! panel is asked to do.
//!
//! Run with: cargo run -p tapsearch-activation --example tap_search

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tapsearch_activation::{
    ActivationConfig, ActivationService, Collaborators, LiteralResolver, PanelDriver,
    SearchTermDisplay,
};
use tapsearch_context::{SurroundingText, SurroundingTextError, SurroundingTextProvider};
use tapsearch_events::TracingEventBus;
use tapsearch_gesture::StateChangeReason;
use tapsearch_selection::{GestureEvent, GestureKind, Position, TapMetadata};
use tokio_util::sync::CancellationToken;

const PAGE: &str = "The Eiffel Tower was completed in Paris in 1889.";

#[derive(Default)]
struct PrintingPanel {
    showing: AtomicBool,
}

impl PanelDriver for PrintingPanel {
    fn show_long_press(&self) {
        self.showing.store(true, Ordering::SeqCst);
        println!("panel: show (long press)");
    }

    fn show_tap_ui(&self) {
        self.showing.store(true, Ordering::SeqCst);
        println!("panel: show (tap)");
    }

    fn hide(&self, reason: StateChangeReason) {
        self.showing.store(false, Ordering::SeqCst);
        println!("panel: hide ({reason})");
    }

    fn set_search_term(&self, display: &SearchTermDisplay) {
        println!(
            "panel: search for {:?} (literal: {})",
            display.display_text, display.is_literal
        );
    }

    fn is_showing(&self) -> bool {
        self.showing.load(Ordering::SeqCst)
    }

    fn is_peeking(&self) -> bool {
        false
    }
}

/// Serves a fixed page with the caret on "Paris".
struct StaticPage;

#[async_trait]
impl SurroundingTextProvider for StaticPage {
    async fn request(&self) -> Result<SurroundingText, SurroundingTextError> {
        let offset = PAGE.find("Paris").map_or(0, |i| PAGE[..i].chars().count() + 2);
        Ok(SurroundingText::new("UTF-8", PAGE, offset, offset).with_content_language("en"))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("tapsearch_activation=debug,tapsearch_events=debug")
        .init();

    println!("=== Tap search example ===");
    println!("Page: {PAGE}\n");

    let cancel = CancellationToken::new();
    let collaborators = Collaborators {
        panel: Arc::new(PrintingPanel::default()),
        surrounding_text: Arc::new(StaticPage),
        ranker: None,
        events: Arc::new(TracingEventBus),
    };
    let service = ActivationService::new(
        ActivationConfig::default(),
        collaborators,
        Arc::new(LiteralResolver),
        cancel.clone(),
    )?;
    let (handle, task) = service.spawn();

    handle
        .gesture(GestureEvent::new(
            GestureKind::Tap,
            Position::new(220.0, 140.0),
            1_000_000_000,
        ))
        .await?;
    handle
        .unhandled_tap(TapMetadata {
            font_size_dips: 16.0,
            text_run_length: PAGE.chars().count(),
            tap_duration_ms: 110,
            in_editable: false,
        })
        .await?;

    tokio::time::sleep(Duration::from_millis(200)).await;
    let status = handle.status().await?;
    println!(
        "\nstate: {} | selection: {:?}",
        status.state, status.selected_text
    );

    handle
        .gesture(GestureEvent::new(
            GestureKind::ScrollStart,
            Position::new(0.0, 0.0),
            3_000_000_000,
        ))
        .await?;
    tokio::time::sleep(Duration::from_millis(50)).await;
    println!("state after scroll: {}", handle.status().await?.state);

    cancel.cancel();
    task.await?;
    println!("\nDone.");
    Ok(())
}
