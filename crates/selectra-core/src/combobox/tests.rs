use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::*;

fn langs() -> Vec<ComboOption> {
    vec![
        ComboOption::new("go", "Go"),
        ComboOption::new("rust", "Rust"),
        ComboOption::new("ruby", "Ruby"),
        ComboOption::new("cobol", "COBOL").disabled(),
    ]
}

fn creatable() -> ComboboxConfig {
    ComboboxConfig {
        creatable: true,
        ..ComboboxConfig::default()
    }
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Open the widget, type `text` and let the debounce settle.
fn typed(combo: &mut Combobox, t0: Instant, text: &str) -> Instant {
    combo.open(t0);
    combo.set_search_text(text, t0);
    let settled = t0 + combo.config().debounce();
    combo.tick(settled);
    settled
}

struct Handler {
    result: Result<Option<String>, CreationError>,
    calls: Mutex<Vec<String>>,
}

impl Handler {
    fn new(result: Result<Option<String>, CreationError>) -> Self {
        Self {
            result,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CreateHandler for Handler {
    async fn create_option(&self, text: &str) -> Result<Option<String>, CreationError> {
        self.calls.lock().unwrap().push(text.to_string());
        self.result.clone()
    }
}

// ── Filtering ──────────────────────────────────────

#[test]
fn filters_after_quiet_period_only() {
    let t0 = Instant::now();
    let mut combo = Combobox::new(ComboboxConfig::default(), langs(), Binding::default());
    combo.open(t0);
    combo.set_search_text("ru", t0);

    assert!(combo.is_loading_options());
    assert_eq!(combo.filtered().len(), 4);
    combo.tick(t0 + ms(999));
    assert_eq!(combo.filtered().len(), 4);

    combo.tick(t0 + ms(1000));
    assert!(!combo.is_loading_options());
    let labels: Vec<_> = combo.visible().map(|(_, o)| o.label.as_str()).collect();
    assert_eq!(labels, vec!["Rust", "Ruby"]);
}

#[test]
fn scenario_a_ru_leaves_rust() {
    let t0 = Instant::now();
    let options = vec![ComboOption::new("go", "Go"), ComboOption::new("rust", "Rust")];
    let mut combo = Combobox::new(ComboboxConfig::default(), options, Binding::default());
    typed(&mut combo, t0, "ru");
    let visible: Vec<_> = combo.visible().map(|(_, o)| o.clone()).collect();
    assert_eq!(visible, vec![ComboOption::new("rust", "Rust")]);
}

#[test]
fn later_keystroke_restarts_debounce() {
    let t0 = Instant::now();
    let mut combo = Combobox::new(ComboboxConfig::default(), langs(), Binding::default());
    combo.open(t0);
    combo.input_char('g', t0);
    combo.input_char('o', t0 + ms(600));

    combo.tick(t0 + ms(1000));
    assert!(combo.is_loading_options());
    assert_eq!(combo.filtered().query(), "");

    combo.tick(t0 + ms(1600));
    assert_eq!(combo.filtered().query(), "go");
    assert_eq!(combo.filtered().len(), 1);
}

#[test]
fn zero_debounce_filters_immediately() {
    let t0 = Instant::now();
    let config = ComboboxConfig {
        debounce_ms: 0,
        ..ComboboxConfig::default()
    };
    let mut combo = Combobox::new(config, langs(), Binding::default());
    combo.open(t0);
    combo.input_char('b', t0);
    assert!(!combo.is_loading_options());
    assert_eq!(combo.filtered().len(), 2);
}

#[test]
fn closing_cancels_pending_debounce() {
    let t0 = Instant::now();
    let mut combo = Combobox::new(ComboboxConfig::default(), langs(), Binding::default());
    combo.open(t0);
    combo.set_search_text("zz", t0);
    combo.close();

    assert!(!combo.is_loading_options());
    assert_eq!(combo.search_text(), "");
    assert_eq!(combo.next_deadline(), None);

    combo.open(t0 + ms(10));
    assert_eq!(combo.filtered().len(), 4);
}

#[test]
fn not_searchable_ignores_typing() {
    let t0 = Instant::now();
    let config = ComboboxConfig {
        searchable: false,
        ..ComboboxConfig::default()
    };
    let mut combo = Combobox::new(config, langs(), Binding::default());
    combo.open(t0);
    combo.input_char('x', t0);
    assert_eq!(combo.search_text(), "");
    combo.tick(t0 + ms(500));
    assert!(!combo.is_search_focused());
}

#[test]
fn typing_while_closed_is_ignored() {
    let t0 = Instant::now();
    let mut combo = Combobox::new(ComboboxConfig::default(), langs(), Binding::default());
    combo.input_char('g', t0);
    assert_eq!(combo.search_text(), "");
    assert!(!combo.is_loading_options());
}

// ── Navigation ─────────────────────────────────────

#[test]
fn keys_ignored_while_closed() {
    let mut combo = Combobox::new(ComboboxConfig::default(), langs(), Binding::default());
    assert_eq!(combo.handle_key(Key::ArrowDown), KeyOutcome::Ignored);
    assert_eq!(combo.highlighted(), None);
}

#[test]
fn arrows_wrap_and_other_keys_pass_through() {
    let t0 = Instant::now();
    let mut combo = Combobox::new(ComboboxConfig::default(), langs(), Binding::default());
    combo.open(t0);

    assert_eq!(combo.handle_key(Key::ArrowUp), KeyOutcome::Handled);
    assert_eq!(combo.highlighted(), Some(3));
    combo.handle_key(Key::ArrowDown);
    assert_eq!(combo.highlighted(), Some(0));
    assert_eq!(combo.handle_key(Key::Other), KeyOutcome::Ignored);
}

#[test]
fn down_presses_cycle_through_filtered_rows() {
    let t0 = Instant::now();
    let mut combo = Combobox::new(ComboboxConfig::default(), langs(), Binding::default());
    typed(&mut combo, t0, "r");
    let len = combo.filtered().len();
    assert_eq!(len, 2);

    let seen: Vec<_> = (0..len * 3)
        .map(|_| {
            combo.handle_key(Key::ArrowDown);
            combo.highlighted().unwrap()
        })
        .collect();
    assert_eq!(seen, vec![0, 1, 0, 1, 0, 1]);
}

#[test]
fn enter_without_highlight_is_noop() {
    let t0 = Instant::now();
    let mut combo = Combobox::new(ComboboxConfig::default(), langs(), Binding::default());
    combo.open(t0);
    assert_eq!(combo.handle_key(Key::Enter), KeyOutcome::Ignored);
    assert!(combo.is_open());
}

#[test]
fn enter_selects_highlighted_and_closes() {
    let t0 = Instant::now();
    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = changes.clone();
    let mut combo = Combobox::new(ComboboxConfig::default(), langs(), Binding::default())
        .on_change(move |v| sink.borrow_mut().push(v.map(str::to_string)));

    typed(&mut combo, t0, "ru");
    combo.handle_key(Key::ArrowDown);
    combo.handle_key(Key::ArrowDown);
    assert_eq!(combo.handle_key(Key::Enter), KeyOutcome::Handled);

    assert!(!combo.is_open());
    assert_eq!(combo.selected_value(), Some("ruby"));
    assert_eq!(combo.selected_label(), "Ruby");
    assert_eq!(*changes.borrow(), vec![Some("ruby".to_string())]);
}

#[test]
fn highlight_is_cleared_when_filter_shrinks_past_it() {
    let t0 = Instant::now();
    let mut combo = Combobox::new(ComboboxConfig::default(), langs(), Binding::default());
    combo.open(t0);
    combo.handle_key(Key::ArrowUp);
    assert_eq!(combo.highlighted(), Some(3));

    combo.set_search_text("go", t0);
    combo.tick(t0 + ms(1000));
    assert_eq!(combo.highlighted(), None);
    assert_eq!(combo.handle_key(Key::Enter), KeyOutcome::Ignored);
}

#[test]
fn highlight_stays_valid_under_random_walk() {
    let t0 = Instant::now();
    let mut combo = Combobox::new(ComboboxConfig::default(), langs(), Binding::default());
    combo.open(t0);
    let queries = ["", "r", "ru", "rust", "", "o", "zig", "b"];
    let mut now = t0;
    for (step, query) in queries.iter().cycle().take(40).enumerate() {
        match step % 3 {
            0 => combo.handle_key(Key::ArrowDown),
            1 => combo.handle_key(Key::ArrowUp),
            _ => KeyOutcome::Ignored,
        };
        combo.set_search_text(query, now);
        now += ms(1000);
        combo.tick(now);
        if let Some(i) = combo.highlighted() {
            assert!(i < combo.filtered().len(), "stale highlight {i} at step {step}");
        }
    }
}

#[test]
fn replacing_options_revalidates_highlight() {
    let t0 = Instant::now();
    let mut combo = Combobox::new(ComboboxConfig::default(), langs(), Binding::default());
    combo.open(t0);
    combo.handle_key(Key::ArrowUp);
    combo.set_options(vec![ComboOption::new("go", "Go")]);
    assert_eq!(combo.filtered().len(), 1);
    assert_eq!(combo.highlighted(), None);
}

#[test]
fn replacing_options_keeps_applied_query() {
    let t0 = Instant::now();
    let mut combo = Combobox::new(ComboboxConfig::default(), langs(), Binding::default());
    typed(&mut combo, t0, "ru");
    let mut next = langs();
    next.push(ComboOption::new("rune", "Runescript"));
    combo.set_options(next);
    assert_eq!(combo.filtered().len(), 3);
}

#[test]
fn highlight_scrolls_nearest_edge_smoothly() {
    let t0 = Instant::now();
    let config = ComboboxConfig {
        max_visible_rows: 2,
        ..ComboboxConfig::default()
    };
    let mut combo = Combobox::new(config, langs(), Binding::default());
    combo.open(t0);
    combo.handle_key(Key::ArrowUp);
    assert_eq!(combo.viewport().target(), 2);
    assert_eq!(combo.viewport().offset(), 0);

    combo.tick(t0 + ms(10));
    combo.tick(t0 + ms(20));
    assert_eq!(combo.viewport().offset(), 2);

    // Row 2 is already visible: no movement.
    combo.handle_key(Key::ArrowUp);
    assert_eq!(combo.viewport().target(), 2);
    combo.handle_key(Key::ArrowUp);
    assert_eq!(combo.viewport().target(), 1);
}

#[test]
fn hover_highlights_row() {
    let t0 = Instant::now();
    let mut combo = Combobox::new(ComboboxConfig::default(), langs(), Binding::default());
    combo.open(t0);
    combo.hover(2);
    assert_eq!(combo.highlighted_option().map(|o| o.value.as_str()), Some("ruby"));
    combo.hover(99);
    assert_eq!(combo.highlighted(), None);
}

// ── Open / close ───────────────────────────────────

#[test]
fn toggle_and_outside_click() {
    let t0 = Instant::now();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    let mut combo = Combobox::new(ComboboxConfig::default(), langs(), Binding::default())
        .on_open_change(move |open| sink.borrow_mut().push(open));

    combo.toggle(t0);
    assert!(combo.is_open());
    combo.click_outside();
    assert!(!combo.is_open());
    combo.click_outside();
    combo.toggle(t0);
    combo.toggle(t0);
    assert_eq!(*events.borrow(), vec![true, false, true, false]);
}

#[test]
fn focus_moves_to_search_after_delay() {
    let t0 = Instant::now();
    let mut combo = Combobox::new(ComboboxConfig::default(), langs(), Binding::default());
    combo.open(t0);
    assert!(!combo.is_search_focused());
    combo.tick(t0 + ms(99));
    assert!(!combo.is_search_focused());
    combo.tick(t0 + ms(100));
    assert!(combo.is_search_focused());
}

#[test]
fn focus_timer_dies_with_close() {
    let t0 = Instant::now();
    let mut combo = Combobox::new(ComboboxConfig::default(), langs(), Binding::default());
    combo.open(t0);
    combo.close();
    combo.tick(t0 + ms(500));
    assert!(!combo.is_search_focused());
}

#[test]
fn initial_open_flag() {
    let config = ComboboxConfig {
        initial_open: true,
        ..ComboboxConfig::default()
    };
    let mut combo = Combobox::new(config, langs(), Binding::default());
    assert!(combo.is_open());
    assert!(!combo.is_search_focused());

    let t0 = Instant::now();
    combo.tick(t0);
    assert_eq!(combo.next_deadline(), Some(t0 + ms(100)));
    assert!(!combo.is_search_focused());
    combo.tick(t0 + ms(100));
    assert!(combo.is_search_focused());
}

#[test]
fn initial_open_closed_before_first_tick_never_focuses() {
    let config = ComboboxConfig {
        initial_open: true,
        ..ComboboxConfig::default()
    };
    let mut combo = Combobox::new(config, langs(), Binding::default());
    combo.close();
    let t0 = Instant::now();
    combo.tick(t0);
    assert_eq!(combo.next_deadline(), None);
    combo.tick(t0 + ms(100));
    assert!(!combo.is_search_focused());
}

#[test]
fn disabled_widget_suppresses_interaction() {
    let t0 = Instant::now();
    let config = ComboboxConfig {
        disabled: true,
        initial_open: true,
        ..ComboboxConfig::default()
    };
    let mut combo = Combobox::new(config, langs(), Binding::uncontrolled(Some("go")));
    assert!(!combo.is_open());
    combo.toggle(t0);
    assert!(!combo.is_open());
    assert!(!combo.select("rust"));
    assert_eq!(combo.selected_value(), Some("go"));
}

#[test]
fn dispose_cancels_everything() {
    let t0 = Instant::now();
    let mut combo = Combobox::new(creatable(), langs(), Binding::default());
    typed(&mut combo, t0, "Zig");
    let request = combo.begin_create().unwrap();
    combo.set_search_text("Zi", t0);
    combo.dispose();

    assert_eq!(combo.next_deadline(), None);
    assert!(!combo.tick(t0 + ms(5000)));
    assert!(!combo.is_creating());
    combo.open(t0);
    assert!(!combo.is_open());
    // A late result is handed back untouched.
    assert_eq!(combo.finish_create(request.id, Ok(None)), Ok(()));
}

#[test]
fn dispose_cancels_pending_focus() {
    let t0 = Instant::now();
    let mut combo = Combobox::new(ComboboxConfig::default(), langs(), Binding::default());
    combo.open(t0);
    assert_eq!(combo.next_deadline(), Some(t0 + ms(100)));
    combo.dispose();

    assert_eq!(combo.next_deadline(), None);
    assert!(!combo.tick(t0 + ms(100)));
    assert!(!combo.is_search_focused());
}

// ── Selection ──────────────────────────────────────

#[test]
fn placeholder_when_unset_or_unknown() {
    let combo = Combobox::new(ComboboxConfig::default(), langs(), Binding::default());
    assert_eq!(combo.selected_label(), "Select an option");
    let combo = Combobox::new(ComboboxConfig::default(), langs(), Binding::uncontrolled(Some("zig")));
    assert_eq!(combo.selected_label(), "Select an option");
    assert!(!combo.has_selection_label());
}

#[test]
fn uncontrolled_default_seeds_value() {
    let combo = Combobox::new(ComboboxConfig::default(), langs(), Binding::uncontrolled(Some("go")));
    assert_eq!(combo.selected_label(), "Go");
}

#[test]
fn scenario_e_controlled_select_only_notifies() {
    let t0 = Instant::now();
    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = changes.clone();
    let mut combo = Combobox::new(ComboboxConfig::default(), langs(), Binding::controlled(Some("go")))
        .on_change(move |v| sink.borrow_mut().push(v.map(str::to_string)));

    combo.open(t0);
    assert!(combo.select("rust"));
    assert!(!combo.is_open());
    assert_eq!(combo.selected_value(), Some("go"));
    assert_eq!(combo.selected_label(), "Go");
    assert_eq!(*changes.borrow(), vec![Some("rust".to_string())]);

    combo.set_controlled_value(Some("rust")).unwrap();
    assert_eq!(combo.selected_label(), "Rust");
}

#[test]
fn supplying_value_to_uncontrolled_is_misuse() {
    let mut combo = Combobox::new(ComboboxConfig::default(), langs(), Binding::default());
    assert_eq!(combo.set_controlled_value(Some("go")), Err(MisuseError::NotControlled));
}

#[test]
fn disabled_option_cannot_be_committed() {
    let t0 = Instant::now();
    let mut combo = Combobox::new(ComboboxConfig::default(), langs(), Binding::default());
    combo.open(t0);
    combo.handle_key(Key::ArrowUp);
    assert_eq!(combo.highlighted_option().map(|o| o.value.as_str()), Some("cobol"));
    assert_eq!(combo.handle_key(Key::Enter), KeyOutcome::Handled);
    assert!(combo.is_open());
    assert_eq!(combo.selected_value(), None);
}

#[test]
fn clear_selection_requires_clearable() {
    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = changes.clone();
    let mut combo = Combobox::new(ComboboxConfig::default(), langs(), Binding::uncontrolled(Some("go")));
    assert!(!combo.clear_selection());

    let config = ComboboxConfig {
        clearable: true,
        ..ComboboxConfig::default()
    };
    let mut combo = Combobox::new(config, langs(), Binding::uncontrolled(Some("go")))
        .on_change(move |v| sink.borrow_mut().push(v.map(str::to_string)));
    assert!(combo.clear_selection());
    assert_eq!(combo.selected_value(), None);
    assert!(!combo.clear_selection());
    assert_eq!(*changes.borrow(), vec![None]);
}

// ── Creation ───────────────────────────────────────

#[test]
fn scenario_b_no_affordance_without_creatable() {
    let t0 = Instant::now();
    let mut combo = Combobox::new(ComboboxConfig::default(), langs(), Binding::default());
    typed(&mut combo, t0, "Zig");
    assert!(combo.filtered().is_empty());
    assert!(!combo.shows_create_affordance());
    assert!(combo.begin_create().is_none());
}

#[test]
fn no_affordance_for_empty_text_or_while_loading() {
    let t0 = Instant::now();
    let mut combo = Combobox::new(creatable(), vec![], Binding::default());
    combo.open(t0);
    assert!(combo.filtered().is_empty());
    assert!(!combo.shows_create_affordance());

    combo.set_search_text("Zig", t0);
    assert!(!combo.shows_create_affordance());
    combo.tick(t0 + ms(1000));
    assert!(combo.shows_create_affordance());
}

#[test]
fn scenario_c_create_success_clears_and_closes() {
    let t0 = Instant::now();
    let requested = Rc::new(RefCell::new(Vec::new()));
    let sink = requested.clone();
    let mut combo = Combobox::new(creatable(), langs(), Binding::default())
        .on_create_requested(move |text| sink.borrow_mut().push(text.to_string()));
    typed(&mut combo, t0, "Zig");
    assert!(combo.shows_create_affordance());

    let request = combo.begin_create().unwrap();
    assert_eq!(request.text, "Zig");
    assert!(combo.is_creating());
    assert!(combo.begin_create().is_none(), "second request while pending");

    combo.finish_create(request.id, Ok(None)).unwrap();
    assert!(!combo.is_open());
    assert_eq!(combo.search_text(), "");
    assert!(!combo.is_creating());
    assert_eq!(*requested.borrow(), vec!["Zig".to_string()]);
}

#[test]
fn scenario_d_create_failure_keeps_state() {
    let t0 = Instant::now();
    let mut combo = Combobox::new(creatable(), langs(), Binding::default());
    typed(&mut combo, t0, "Zig");

    let request = combo.begin_create().unwrap();
    let err = combo
        .finish_create(request.id, Err(CreationError::rejected("Zig", "offline")))
        .unwrap_err();
    assert_eq!(err.text(), "Zig");
    assert!(combo.is_open());
    assert_eq!(combo.search_text(), "Zig");

    // Retry is allowed.
    assert!(combo.begin_create().is_some());
}

#[test]
fn created_value_becomes_selection() {
    let t0 = Instant::now();
    let mut combo = Combobox::new(creatable(), langs(), Binding::default());
    typed(&mut combo, t0, "Zig");
    let request = combo.begin_create().unwrap();
    combo.finish_create(request.id, Ok(Some("zig".into()))).unwrap();
    assert_eq!(combo.selected_value(), Some("zig"));

    // Label shows once the owner extends the candidate set.
    assert_eq!(combo.selected_label(), "Select an option");
    let mut next = langs();
    next.push(ComboOption::new("zig", "Zig"));
    combo.set_options(next);
    assert_eq!(combo.selected_label(), "Zig");
}

#[tokio::test]
async fn create_with_handler_success() {
    let t0 = Instant::now();
    let handler = Handler::new(Ok(None));
    let mut combo = Combobox::new(creatable(), langs(), Binding::default());
    typed(&mut combo, t0, "Zig");

    assert_eq!(combo.create_with(&handler).await, Ok(true));
    assert!(!combo.is_open());
    assert_eq!(*handler.calls.lock().unwrap(), vec!["Zig".to_string()]);
}

#[tokio::test]
async fn create_with_handler_rejection_propagates() {
    let t0 = Instant::now();
    let handler = Handler::new(Err(CreationError::rejected("Zig", "exists")));
    let mut combo = Combobox::new(creatable(), langs(), Binding::default());
    typed(&mut combo, t0, "Zig");

    let err = combo.create_with(&handler).await.unwrap_err();
    assert!(matches!(err, CreationError::Rejected { .. }));
    assert!(combo.is_open());
    assert_eq!(combo.search_text(), "Zig");
    assert!(!combo.is_creating());
}

#[tokio::test]
async fn create_with_skips_when_preconditions_fail() {
    let handler = Handler::new(Ok(None));
    let mut combo = Combobox::new(creatable(), langs(), Binding::default());
    assert_eq!(combo.create_with(&handler).await, Ok(false));
    assert!(handler.calls.lock().unwrap().is_empty());
}
