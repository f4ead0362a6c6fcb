mod support;

use support::{
    gesture, paris_page, tap_metadata, Harness, PanelCall, ScriptedProvider, ScriptedRanker,
    ScriptedResolver,
};
use tapsearch_activation::{ActivationConfig, PendingWork, ResolvedSearchTerm};
use tapsearch_context::SurroundingText;
use tapsearch_events::{event_names, StaleResultEvent, StateChangedEvent, SuppressedEvent};
use tapsearch_gesture::{InternalState, StateChangeReason};
use tapsearch_heuristics::{outcome_names, FeatureValue, HeuristicKind, RankerVerdict};
use tapsearch_selection::{GestureKind, SelectionChange, TapMetadata};

use InternalState::*;

fn paris_resolution() -> ResolvedSearchTerm {
    ResolvedSearchTerm {
        search_term: "Paris".into(),
        display_text: "Paris".into(),
        caption: Some("Capital of France".into()),
        ..ResolvedSearchTerm::default()
    }
}

fn last_reason(h: &Harness) -> Option<StateChangeReason> {
    h.events
        .payloads_for::<StateChangedEvent>(event_names::STATE_CHANGED)
        .last()
        .map(|e| e.reason)
}

/// Tap on "Paris" and run the pipeline until the panel shows.
fn show_paris(h: &mut Harness) {
    h.tap(120.0, 300.0, 1_000);
    assert!(h.drive().is_empty());
    assert_eq!(h.coordinator.state(), ShowingTapSearch);
}

#[test]
fn test_tap_on_word_shows_resolved_search() {
    let mut h = Harness::build(
        ActivationConfig::default(),
        ScriptedProvider::new(paris_page(9)),
        ScriptedResolver::returning(paris_resolution()),
        None,
    );

    h.tap(120.0, 300.0, 1_000);
    assert_eq!(h.coordinator.state(), GatheringSurroundings);
    assert!(h.coordinator.sequence_id().is_some());

    assert!(h.drive().is_empty());
    assert_eq!(h.coordinator.state(), ShowingTapSearch);
    assert_eq!(h.coordinator.tracker().selected_text(), "Paris");
    assert_eq!(
        h.visited(),
        vec![
            TapRecognized,
            TapGestureCommit,
            GatheringSurroundings,
            DecidingSuppression,
            StartShowingTapUi,
            ShowFullTapUi,
            Resolving,
            ShowingTapSearch,
        ]
    );

    let requests = h.resolver.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].selected_text, "Paris");
    assert_eq!(requests[0].surrounding_text, "I love Paris in spring");
    assert_eq!((requests[0].selection_start, requests[0].selection_end), (7, 12));

    let calls = h.panel.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0], PanelCall::ShowTapUi);
    match &calls[1] {
        PanelCall::SetSearchTerm(display) => {
            assert!(display.is_literal);
            assert_eq!(display.search_term, "Paris");
        }
        other => panic!("expected literal search term, got {other:?}"),
    }
    let shown = h.panel.last_search_term().unwrap();
    assert!(!shown.is_literal);
    assert_eq!(shown.caption.as_deref(), Some("Capital of France"));
    assert!(h.panel.hides().is_empty());
}

#[test]
fn test_short_word_tap_is_suppressed() {
    let mut config = ActivationConfig::default();
    config.heuristics.short_word_enabled = true;
    let page = SurroundingText::new("UTF-8", "I saw a cat", 6, 6);
    let mut h = Harness::build(
        config,
        ScriptedProvider::new(page),
        ScriptedResolver::default(),
        None,
    );

    h.tap(50.0, 80.0, 1_000);
    assert!(h.drive().is_empty());

    assert_eq!(h.coordinator.state(), Idle);
    assert_eq!(last_reason(&h), Some(StateChangeReason::TapSuppressed));
    assert!(!h.visited().contains(&StartShowingTapUi));
    assert!(h.panel.calls().is_empty());
    assert!(h.resolver.requests().is_empty());

    let suppressed = h
        .events
        .payloads_for::<SuppressedEvent>(event_names::SUPPRESSED);
    assert_eq!(suppressed.len(), 1);
    assert_eq!(suppressed[0].heuristics, vec![HeuristicKind::ShortWord]);
    assert!(h.coordinator.last_decision().unwrap().is_suppressed());
}

#[test]
fn test_second_tap_after_selection_cleared_keeps_panel_open() {
    let mut h = Harness::new(ActivationConfig::default());
    show_paris(&mut h);

    // The page clears the old selection between the tap and its report.
    h.coordinator
        .handle_gesture(&gesture(GestureKind::Tap, 126.0, 302.0, 1_800));
    h.coordinator
        .handle_gesture(&gesture(GestureKind::SelectionCleared, 126.0, 302.0, 1_810));
    assert_eq!(h.coordinator.state(), WaitingForTapNearPrevious);
    let near_previous = h.drive();
    assert_eq!(near_previous.len(), 1);

    h.coordinator.handle_unhandled_tap(tap_metadata());
    assert_eq!(h.coordinator.state(), WaitingForTapOnTapSelection);
    let tap_on_tap = h.drive();
    assert_eq!(tap_on_tap.len(), 1);

    h.coordinator.on_timer_elapsed(tap_on_tap[0]);
    assert!(h.drive().is_empty());
    assert_eq!(h.coordinator.state(), ShowingTapSearch);

    // The first window's timer fires late and must not reset anything.
    h.coordinator.on_timer_elapsed(near_previous[0]);
    assert_eq!(h.coordinator.state(), ShowingTapSearch);
    assert_eq!(
        h.events
            .payloads_for::<StaleResultEvent>(event_names::STALE_RESULT)
            .len(),
        1
    );

    assert!(h.panel.hides().is_empty());
    assert_eq!(h.panel.count(&PanelCall::ShowTapUi), 2);
    assert!(h.coordinator.tracker().previous_tap_selection_visible());
}

#[test]
fn test_unreachable_resolver_falls_back_to_literal_search() {
    let mut h = Harness::build(
        ActivationConfig::default(),
        ScriptedProvider::new(paris_page(9)),
        ScriptedResolver::returning(ResolvedSearchTerm::unavailable()),
        None,
    );
    show_paris(&mut h);

    let shown = h.panel.last_search_term().unwrap();
    assert!(shown.is_literal);
    assert_eq!(shown.search_term, "Paris");
    assert_eq!(shown.display_text, "Paris");
    assert_eq!(shown.caption, None);
    assert_eq!(shown.entity_id, None);
    assert!(shown.status.is_some());
}

#[test]
fn test_second_tap_overrides_ranker_suppression() {
    let mut config = ActivationConfig::default();
    config.heuristics.second_tap_override_enabled = true;
    let mut h = Harness::build(
        config,
        ScriptedProvider::new(paris_page(9)),
        ScriptedResolver::default(),
        Some(ScriptedRanker::new(RankerVerdict::Suppress)),
    );

    h.tap(100.0, 100.0, 1_000);
    assert!(h.drive().is_empty());
    assert_eq!(h.coordinator.state(), Idle);
    assert_eq!(
        h.coordinator.last_decision().map(|d| d.was_suppressed_by_ranking()),
        Some(true)
    );
    assert!(h.coordinator.tracker().last_tap().is_some());

    h.tap(105.0, 100.0, 1_500);
    assert!(h.drive().is_empty());
    assert_eq!(h.coordinator.state(), ShowingTapSearch);
    assert!(matches!(
        h.coordinator.last_decision(),
        Some(tapsearch_heuristics::SuppressionDecision::ShowOverridingRanking)
    ));

    let suppressed = h
        .events
        .payloads_for::<SuppressedEvent>(event_names::SUPPRESSED);
    assert_eq!(suppressed.len(), 1);
    assert_eq!(suppressed[0].ranker_verdict, Some(RankerVerdict::Suppress));
}

#[test]
fn test_ranker_suppression_stands_without_second_tap() {
    let mut config = ActivationConfig::default();
    config.heuristics.second_tap_override_enabled = true;
    let mut h = Harness::build(
        config,
        ScriptedProvider::new(paris_page(9)),
        ScriptedResolver::default(),
        Some(ScriptedRanker::new(RankerVerdict::Suppress)),
    );

    h.tap(100.0, 100.0, 1_000);
    h.drive();
    // Too far away to count as a second tap.
    h.tap(400.0, 100.0, 1_500);
    h.drive();

    assert_eq!(h.coordinator.state(), Idle);
    assert!(h.panel.calls().is_empty());
}

#[test]
fn test_reset_while_gathering_drops_late_surrounding_text() {
    let mut h = Harness::new(ActivationConfig::default());
    h.tap(120.0, 300.0, 1_000);

    let work = h.coordinator.take_pending_work();
    assert_eq!(work.len(), 1);
    let ticket = work[0].ticket();
    assert!(matches!(work[0], PendingWork::RequestSurroundingText { .. }));

    h.coordinator.reset(StateChangeReason::BasePageTap);
    assert_eq!(h.coordinator.state(), Idle);
    assert!(h.coordinator.sequence_id().is_none());

    h.coordinator.on_surrounding_text(ticket, Ok(paris_page(9)));
    assert_eq!(h.coordinator.state(), Idle);
    assert!(h.coordinator.context().is_none());
    assert_eq!(h.coordinator.tracker().selected_text(), "");
    assert!(h.coordinator.take_pending_work().is_empty());

    let stale = h
        .events
        .payloads_for::<StaleResultEvent>(event_names::STALE_RESULT);
    assert_eq!(stale.len(), 1);
    assert_eq!(stale[0].issued_for, GatheringSurroundings);
    assert_eq!(stale[0].current, Idle);
}

#[test]
fn test_result_for_earlier_sequence_in_same_state_is_dropped() {
    let mut h = Harness::new(ActivationConfig::default());

    h.tap(120.0, 300.0, 1_000);
    let first = h.coordinator.take_pending_work()[0].ticket();
    h.coordinator.reset(StateChangeReason::BasePageTap);

    h.tap(120.0, 300.0, 2_000);
    let second = h.coordinator.take_pending_work()[0].ticket();
    assert_eq!(first.state(), second.state());
    assert_ne!(first, second);

    h.coordinator.on_surrounding_text(first, Ok(paris_page(9)));
    assert_eq!(h.coordinator.state(), GatheringSurroundings);
    assert!(h.coordinator.is_still_working_on(GatheringSurroundings));

    h.coordinator.on_surrounding_text(second, Ok(paris_page(9)));
    assert_ne!(h.coordinator.state(), GatheringSurroundings);
}

#[test]
fn test_unavailable_provider_resets_with_no_base_content() {
    let mut h = Harness::build(
        ActivationConfig::default(),
        ScriptedProvider::unavailable(),
        ScriptedResolver::default(),
        None,
    );

    h.tap(120.0, 300.0, 1_000);
    assert_eq!(h.coordinator.state(), Idle);
    assert_eq!(last_reason(&h), Some(StateChangeReason::NoBaseContent));
    assert!(h.coordinator.take_pending_work().is_empty());
}

#[test]
fn test_empty_surrounding_text_resets_with_no_base_content() {
    let mut h = Harness::build(
        ActivationConfig::default(),
        ScriptedProvider::new(SurroundingText::new("UTF-8", "", 0, 0)),
        ScriptedResolver::default(),
        None,
    );

    h.tap(120.0, 300.0, 1_000);
    h.drive();
    assert_eq!(h.coordinator.state(), Idle);
    assert_eq!(last_reason(&h), Some(StateChangeReason::NoBaseContent));
    assert!(h.panel.calls().is_empty());
}

#[test]
fn test_tap_between_words_is_invalid() {
    let mut h = Harness::build(
        ActivationConfig::default(),
        ScriptedProvider::new(SurroundingText::new("UTF-8", "Paris   is", 6, 6)),
        ScriptedResolver::default(),
        None,
    );

    h.tap(120.0, 300.0, 1_000);
    h.drive();
    assert_eq!(h.coordinator.state(), Idle);
    assert_eq!(last_reason(&h), Some(StateChangeReason::InvalidSelection));
}

#[test]
fn test_resolution_expands_selection_and_sets_language() {
    let page = SurroundingText::new("UTF-8", "Senator Barack Obama spoke", 17, 17);
    let resolved = ResolvedSearchTerm {
        search_term: "Barack Obama".into(),
        display_text: "Barack Obama".into(),
        selection_start_adjust: -7,
        detected_language: Some("en".into()),
        ..ResolvedSearchTerm::default()
    };
    let mut h = Harness::build(
        ActivationConfig::default(),
        ScriptedProvider::new(page),
        ScriptedResolver::returning(resolved),
        None,
    );

    h.tap(120.0, 300.0, 1_000);
    h.drive();

    assert_eq!(h.coordinator.state(), ShowingTapSearch);
    assert_eq!(h.coordinator.tracker().selected_text(), "Barack Obama");
    let context = h.coordinator.context().unwrap();
    assert_eq!((context.selection_start(), context.selection_end()), (8, 20));
    assert_eq!(context.detected_language(), Some("en"));
}

#[test]
fn test_long_press_shows_panel_with_selection() {
    let mut h = Harness::new(ActivationConfig::default());

    h.coordinator
        .handle_gesture(&gesture(GestureKind::LongPress, 40.0, 40.0, 1_000));
    h.coordinator
        .handle_selection_changed(SelectionChange::new("Eiffel Tower", 20, 32));
    assert_eq!(h.coordinator.state(), Idle);

    h.coordinator
        .handle_gesture(&gesture(GestureKind::SelectionHandlesShown, 40.0, 40.0, 1_050));
    assert_eq!(h.coordinator.state(), GatheringSurroundings);
    assert!(h.drive().is_empty());

    assert_eq!(h.coordinator.state(), ShowingLongPress);
    assert!(!h.visited().contains(&DecidingSuppression));
    assert_eq!(h.panel.calls()[0], PanelCall::ShowLongPress);
    assert_eq!(h.panel.last_search_term().unwrap().search_term, "Eiffel Tower");

    // Dragging a handle updates the term in place.
    h.coordinator
        .handle_selection_changed(SelectionChange::new("Eiffel Tower Paris", 20, 38));
    assert_eq!(h.coordinator.state(), ShowingLongPress);
    assert_eq!(
        h.panel.last_search_term().unwrap().search_term,
        "Eiffel Tower Paris"
    );
}

#[test]
fn test_long_press_forgets_previous_tap() {
    let mut h = Harness::new(ActivationConfig::default());
    show_paris(&mut h);
    assert!(h.coordinator.tracker().last_tap().is_some());

    h.coordinator
        .handle_gesture(&gesture(GestureKind::LongPress, 40.0, 40.0, 5_000));
    assert!(h.coordinator.tracker().last_tap().is_none());
}

#[test]
fn test_scroll_dismisses_tap_search() {
    let mut h = Harness::new(ActivationConfig::default());
    show_paris(&mut h);

    h.coordinator
        .handle_gesture(&gesture(GestureKind::ScrollStart, 0.0, 0.0, 3_000));
    assert_eq!(h.coordinator.state(), Idle);
    assert_eq!(h.panel.hides(), vec![StateChangeReason::BasePageScroll]);
    assert!(h.coordinator.context().is_none());
}

#[test]
fn test_selection_cleared_without_second_tap_closes_panel() {
    let mut h = Harness::new(ActivationConfig::default());
    show_paris(&mut h);

    h.coordinator
        .handle_gesture(&gesture(GestureKind::SelectionCleared, 0.0, 0.0, 3_000));
    let timers = h.drive();
    assert_eq!(timers.len(), 1);
    h.coordinator.on_timer_elapsed(timers[0]);

    assert_eq!(h.coordinator.state(), Idle);
    assert_eq!(h.panel.hides(), vec![StateChangeReason::SelectionCleared]);
}

#[test]
fn test_selection_cleared_while_idle_is_ignored() {
    let mut h = Harness::new(ActivationConfig::default());
    h.coordinator
        .handle_gesture(&gesture(GestureKind::SelectionCleared, 0.0, 0.0, 3_000));
    assert_eq!(h.coordinator.state(), Idle);
    assert!(h.visited().is_empty());
}

#[test]
fn test_tap_on_editable_closes_panel() {
    let mut h = Harness::new(ActivationConfig::default());
    show_paris(&mut h);

    h.coordinator
        .handle_gesture(&gesture(GestureKind::Tap, 10.0, 10.0, 4_000));
    h.coordinator.handle_unhandled_tap(TapMetadata {
        in_editable: true,
        ..tap_metadata()
    });
    assert_eq!(h.coordinator.state(), Idle);
    assert_eq!(h.panel.hides(), vec![StateChangeReason::BasePageTap]);
}

#[test]
fn test_reset_is_idempotent() {
    let mut h = Harness::new(ActivationConfig::default());
    show_paris(&mut h);

    h.coordinator.reset(StateChangeReason::BasePageTap);
    let events = h.events.len();
    h.coordinator.reset(StateChangeReason::BasePageTap);

    assert_eq!(h.coordinator.state(), Idle);
    assert_eq!(h.events.len(), events);
    assert_eq!(h.panel.hides().len(), 1);
}

#[test]
fn test_teardown_forgets_tap_history() {
    let mut h = Harness::new(ActivationConfig::default());
    show_paris(&mut h);

    h.coordinator.teardown();
    assert_eq!(h.coordinator.state(), Undefined);
    assert!(h.coordinator.tracker().last_tap().is_none());
    assert_eq!(h.panel.hides(), vec![StateChangeReason::Teardown]);
}

#[test]
fn test_ranker_outcome_logged_when_sequence_ends() {
    let mut h = Harness::build(
        ActivationConfig::default(),
        ScriptedProvider::new(paris_page(9)),
        ScriptedResolver::default(),
        Some(ScriptedRanker::new(RankerVerdict::Show)),
    );
    show_paris(&mut h);

    let ranker = h.ranker.clone().unwrap();
    assert!(!ranker.features().is_empty());
    assert!(ranker.outcomes().is_empty());

    h.coordinator.reset(StateChangeReason::BasePageTap);
    assert_eq!(
        ranker.outcomes(),
        vec![(
            outcome_names::WAS_PANEL_OPENED.to_string(),
            FeatureValue::Bool(true)
        )]
    );
    assert_eq!(ranker.resets(), 1);
}

#[test]
fn test_ranking_disabled_skips_ranker() {
    let config = ActivationConfig {
        ranking_enabled: false,
        ..ActivationConfig::default()
    };
    let mut h = Harness::build(
        config,
        ScriptedProvider::new(paris_page(9)),
        ScriptedResolver::default(),
        Some(ScriptedRanker::new(RankerVerdict::Suppress)),
    );
    show_paris(&mut h);

    let ranker = h.ranker.clone().unwrap();
    assert!(ranker.features().is_empty());
}

#[test]
fn test_resolve_disabled_shows_literal_only() {
    let config = ActivationConfig {
        resolve_enabled: false,
        ..ActivationConfig::default()
    };
    let mut h = Harness::new(config);
    show_paris(&mut h);

    assert!(!h.visited().contains(&Resolving));
    assert!(h.resolver.requests().is_empty());
    assert!(h.panel.last_search_term().unwrap().is_literal);
}

#[test]
fn test_wait_after_tap_delays_showing() {
    let mut config = ActivationConfig::default();
    config.timing.wait_after_tap_delay_ms = 50;
    let mut h = Harness::new(config);

    h.tap(120.0, 300.0, 1_000);
    let timers = h.drive();
    assert_eq!(timers.len(), 1);
    assert_eq!(h.coordinator.state(), StartShowingTapUi);
    assert!(h.panel.calls().is_empty());

    h.coordinator.on_timer_elapsed(timers[0]);
    h.drive_all();
    assert_eq!(h.coordinator.state(), ShowingTapSearch);
}

#[test]
fn test_tap_on_tap_selection_with_text_first_becomes_long_press() {
    let mut h = Harness::new(ActivationConfig::default());
    show_paris(&mut h);

    h.tap(120.0, 300.0, 1_500);
    assert_eq!(h.coordinator.state(), WaitingForTapOnTapSelection);
    let window = h.drive();
    assert_eq!(window.len(), 1);

    h.coordinator
        .handle_selection_changed(SelectionChange::new("Paris", 7, 12));
    h.coordinator
        .handle_gesture(&gesture(GestureKind::SelectionHandlesShown, 120.0, 300.0, 1_520));
    assert_eq!(h.coordinator.state(), GatheringSurroundings);
    assert!(h.drive().is_empty());

    // The tap window closes after the upgrade and must not commit the tap.
    h.coordinator.on_timer_elapsed(window[0]);

    assert_eq!(h.coordinator.state(), ShowingLongPress);
    assert!(h.panel.hides().is_empty());
    assert_eq!(h.panel.count(&PanelCall::ShowLongPress), 1);
    assert_eq!(h.panel.last_search_term().unwrap().search_term, "Paris");
}

#[test]
fn test_tap_on_tap_selection_with_handles_first_becomes_long_press() {
    let mut h = Harness::new(ActivationConfig::default());
    show_paris(&mut h);

    h.tap(120.0, 300.0, 1_500);
    let window = h.drive();
    assert_eq!(window.len(), 1);

    h.coordinator
        .handle_gesture(&gesture(GestureKind::SelectionHandlesShown, 120.0, 300.0, 1_520));
    assert!(h.coordinator.tracker().is_awaiting_long_press_text());

    // The window closes before the selected text shows up.
    h.coordinator.on_timer_elapsed(window[0]);
    assert_eq!(h.coordinator.state(), TapGestureCommit);
    assert!(h.panel.hides().is_empty());

    h.coordinator
        .handle_selection_changed(SelectionChange::new("Paris", 7, 12));
    assert_eq!(h.coordinator.state(), GatheringSurroundings);
    h.drive_all();

    assert_eq!(h.coordinator.state(), ShowingLongPress);
    assert!(h.panel.hides().is_empty());
    assert_eq!(h.panel.count(&PanelCall::ShowLongPress), 1);
    assert_eq!(h.coordinator.tracker().selected_text(), "Paris");
}

#[test]
fn test_missing_ranker_ends_sequence() {
    let mut h = Harness::build(
        ActivationConfig::default(),
        ScriptedProvider::new(paris_page(9)),
        ScriptedResolver::default(),
        Some(ScriptedRanker::new(RankerVerdict::Show)),
    );
    h.tap(120.0, 300.0, 1_000);

    let gather = h.coordinator.take_pending_work()[0].ticket();
    h.coordinator.on_surrounding_text(gather, Ok(paris_page(9)));
    assert_eq!(h.coordinator.state(), DecidingSuppression);

    let work = h.coordinator.take_pending_work();
    let PendingWork::RunPrediction { ticket } = work[0] else {
        panic!("expected a prediction request, got {work:?}");
    };
    h.coordinator.on_ranking_unavailable(ticket);

    assert_eq!(h.coordinator.state(), Idle);
    assert_eq!(last_reason(&h), Some(StateChangeReason::Unknown));
    assert!(h.panel.calls().is_empty());
    assert!(h.coordinator.take_pending_work().is_empty());
}
