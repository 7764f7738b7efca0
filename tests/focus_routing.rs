use std::time::{Duration, Instant};

use termassign::focus::{FocusRouter, FocusState, RoutingError, DEFAULT_BLUR_DEBOUNCE_MS};
use termassign::parser::parse_problem;
use termassign::registry::{FieldHandle, FieldRegistry};

#[derive(Debug, Default)]
struct RecordingHandle {
    inserted: Vec<String>,
    focus_calls: usize,
}

impl FieldHandle for RecordingHandle {
    fn insert_token(&mut self, token: &str) {
        self.inserted.push(token.to_string());
    }

    fn take_focus(&mut self) {
        self.focus_calls += 1;
    }
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn setup(steps: usize) -> (FocusRouter, FieldRegistry<RecordingHandle>) {
    let body: String = (1..=steps)
        .map(|i| format!("<ProblemStep><Statement>S{}</Statement></ProblemStep>", i))
        .collect();
    let problem = parse_problem(&format!("<Problem><Steps>{}</Steps></Problem>", body)).unwrap();

    let mut router = FocusRouter::default();
    let mut fields = FieldRegistry::new();
    fields.seed(&problem, &mut router);
    for step in 1..=steps {
        fields.register_handle(step, RecordingHandle::default()).unwrap();
    }
    (router, fields)
}

#[test]
fn test_default_debounce() {
    let router = FocusRouter::default();
    assert_eq!(router.debounce(), ms(DEFAULT_BLUR_DEBOUNCE_MS));
    assert_eq!(router.state(), FocusState::Idle);
    assert_eq!(router.pending_deadline(), None);
}

#[test]
fn test_focus_moves_between_fields() {
    let (mut router, _) = setup(2);
    router.field_focused(1);
    assert_eq!(router.state(), FocusState::Active(1));
    router.field_focused(2);
    assert_eq!(router.state(), FocusState::Active(2));
    assert_eq!(router.active_step(), Some(2));
}

#[test]
fn test_blur_hides_only_after_debounce() {
    let (mut router, _) = setup(1);
    let t0 = Instant::now();
    router.field_focused(1);
    router.field_blurred(1, t0);

    assert_eq!(router.pending_deadline(), Some(t0 + ms(150)));
    assert_eq!(router.poll(t0 + ms(149)), None);
    assert_eq!(router.state(), FocusState::Active(1));

    assert_eq!(router.poll(t0 + ms(150)), Some(FocusState::Idle));
    assert_eq!(router.state(), FocusState::Idle);
    assert_eq!(router.pending_deadline(), None);
}

#[test]
fn test_refocus_within_window_cancels_hide() {
    let (mut router, _) = setup(2);
    let t0 = Instant::now();
    router.field_focused(1);
    router.field_blurred(1, t0);
    router.field_focused(2);

    assert_eq!(router.poll(t0 + ms(1000)), None);
    assert_eq!(router.state(), FocusState::Active(2));
}

#[test]
fn test_palette_pointer_down_cancels_hide() {
    let (mut router, _) = setup(1);
    let t0 = Instant::now();
    router.field_focused(1);
    router.field_blurred(1, t0);
    router.palette_pointer_down();

    assert_eq!(router.poll(t0 + ms(500)), None);
    assert_eq!(router.state(), FocusState::Active(1));
}

#[test]
fn test_blur_from_inactive_field_is_ignored() {
    let (mut router, _) = setup(2);
    let t0 = Instant::now();
    router.field_focused(2);
    router.field_blurred(1, t0);

    assert_eq!(router.pending_deadline(), None);
    assert_eq!(router.poll(t0 + ms(500)), None);
    assert_eq!(router.state(), FocusState::Active(2));
}

#[test]
fn test_second_blur_replaces_deadline() {
    let (mut router, _) = setup(1);
    let t0 = Instant::now();
    router.field_focused(1);
    router.field_blurred(1, t0);
    router.field_blurred(1, t0 + ms(100));

    assert_eq!(router.pending_deadline(), Some(t0 + ms(250)));
    assert_eq!(router.poll(t0 + ms(200)), None);
    assert_eq!(router.poll(t0 + ms(250)), Some(FocusState::Idle));
}

#[test]
fn test_token_goes_to_active_field_and_refocuses() {
    let (mut router, mut fields) = setup(3);
    let t0 = Instant::now();
    router.field_focused(2);
    router.field_blurred(2, t0);

    let step = router.palette_token_selected(r"\frac", &mut fields).unwrap();
    assert_eq!(step, 2);

    let handle = fields.handle(2).unwrap();
    assert_eq!(handle.inserted, vec![r"\frac".to_string()]);
    assert_eq!(handle.focus_calls, 1);
    assert!(fields.handle(1).unwrap().inserted.is_empty());
    assert!(fields.handle(3).unwrap().inserted.is_empty());

    // The pending hide was consumed by the selection
    assert_eq!(router.poll(t0 + ms(1000)), None);
    assert_eq!(router.state(), FocusState::Active(2));
}

#[test]
fn test_token_with_no_active_field_is_dropped() {
    let (mut router, mut fields) = setup(2);
    assert_eq!(
        router.palette_token_selected(r"\pi", &mut fields),
        Err(RoutingError::NoActiveField)
    );
    for step in 1..=2 {
        assert!(fields.handle(step).unwrap().inserted.is_empty());
    }
}

#[test]
fn test_token_after_hide_is_dropped() {
    let (mut router, mut fields) = setup(1);
    let t0 = Instant::now();
    router.field_focused(1);
    router.field_blurred(1, t0);
    router.poll(t0 + ms(150));

    assert_eq!(
        router.palette_token_selected(r"\pi", &mut fields),
        Err(RoutingError::NoActiveField)
    );
    assert!(fields.handle(1).unwrap().inserted.is_empty());
}

#[test]
fn test_token_for_unmounted_field_is_dropped() {
    let problem = parse_problem(
        "<Problem><Steps><ProblemStep/><ProblemStep/></Steps></Problem>",
    )
    .unwrap();
    let mut router = FocusRouter::default();
    let mut fields: FieldRegistry<RecordingHandle> = FieldRegistry::new();
    fields.seed(&problem, &mut router);
    fields.register_handle(1, RecordingHandle::default()).unwrap();

    router.field_focused(2);
    assert_eq!(
        router.palette_token_selected(r"\pi", &mut fields),
        Err(RoutingError::MissingHandle(2))
    );
}

#[test]
fn test_reload_resets_focus_and_pending_blur() {
    let (mut router, mut fields) = setup(2);
    let t0 = Instant::now();
    router.field_focused(2);
    router.field_blurred(2, t0);

    let problem = parse_problem("<Problem><Steps><ProblemStep/></Steps></Problem>").unwrap();
    fields.seed(&problem, &mut router);

    assert_eq!(router.state(), FocusState::Idle);
    assert_eq!(router.pending_deadline(), None);
    assert_eq!(fields.len(), 1);
    assert!(fields.handle(1).is_none());
}

#[test]
fn test_custom_debounce_window() {
    let mut router = FocusRouter::new(ms(400));
    let t0 = Instant::now();
    router.field_focused(1);
    router.field_blurred(1, t0);

    assert_eq!(router.poll(t0 + ms(399)), None);
    assert_eq!(router.poll(t0 + ms(400)), Some(FocusState::Idle));
}
