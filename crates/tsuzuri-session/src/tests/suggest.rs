use std::cell::RefCell;
use std::rc::Rc;

use tsuzuri_core::config::Config;

use super::super::action::EventModifiers;
use super::super::state::InputState;
use super::super::InputSession;
use super::*;

const CTRL: EventModifiers = EventModifiers {
    control: true,
    command: false,
    option: false,
    shift: false,
};

fn suggestion_session() -> (InputSession<MockProvider>, Rc<RefCell<String>>) {
    let mut config = Config::default();
    config.suggestions_enabled = true;
    let context = Rc::new(RefCell::new(String::new()));
    let session = InputSession::new(
        MockProvider::new(),
        config,
        Box::new(FixedContext(context.clone())),
    );
    (session, context)
}

#[test]
fn test_replace_suggestion_round_trip() {
    let (mut session, context) = suggestion_session();
    let mut host = MockHost::default();
    *context.borrow_mut() = "本日の天気は".to_owned();

    type_text(&mut session, &mut host, "kyouha");
    let outcome = session.handle_event(&key_with(0x01, "s", CTRL), &mut host);
    let request = outcome.suggestion_request.expect("suggestion request");
    assert_eq!(request.prompt, "本日の天気は");
    assert_eq!(request.target, "kyouha");
    assert_eq!(request.generation, 1);
    assert_eq!(*session.state(), InputState::ReplaceSuggestion);
    assert!(!session.suggestion_panel_visible());

    assert!(session.receive_suggestions(1, vec!["今日は晴れ".to_owned()]));
    assert!(session.suggestion_panel_visible());

    session.handle_event(&key(DOWN, ""), &mut host);
    assert_eq!(host.current_marked().concatenated(), "今日は晴れ");

    session.handle_event(&key(ENTER, "\r"), &mut host);
    assert_eq!(host.committed(), "今日は晴れ");
    assert_eq!(*session.state(), InputState::Inactive);
    assert!(!session.suggestion_panel_visible());
}

#[test]
fn test_stale_generation_is_dropped() {
    let (mut session, _context) = suggestion_session();
    let mut host = MockHost::default();

    type_text(&mut session, &mut host, "kyou");
    session.handle_event(&key_with(0x01, "s", CTRL), &mut host);
    // A second request bumps the generation.
    session.handle_event(&key_with(0x01, "s", CTRL), &mut host);

    assert!(!session.receive_suggestions(1, vec!["古い".to_owned()]));
    assert!(session.receive_suggestions(2, vec!["新しい".to_owned()]));
}

#[test]
fn test_suggestions_ignored_outside_panel_state() {
    let (mut session, _context) = suggestion_session();
    let mut host = MockHost::default();

    type_text(&mut session, &mut host, "kyou");
    session.handle_event(&key_with(0x01, "s", CTRL), &mut host);
    // Escape returns to composing; late results must not surface.
    session.handle_event(&key(ESCAPE, "\u{1b}"), &mut host);
    assert_eq!(*session.state(), InputState::Composing);
    assert!(!session.receive_suggestions(1, vec!["遅い".to_owned()]));
}

#[test]
fn test_suggest_key_disabled_without_config() {
    let mut session = make_session(Config::default());
    let mut host = MockHost::default();

    type_text(&mut session, &mut host, "kyou");
    let outcome = session.handle_event(&key_with(0x01, "s", CTRL), &mut host);
    assert!(!outcome.handled);
    assert_eq!(*session.state(), InputState::Composing);
}

#[test]
fn test_predictive_suggestion_seeds_continuation() {
    let (mut session, _context) = suggestion_session();
    let mut host = MockHost::default();

    let outcome = session.handle_event(&key_with(0x01, "s", CTRL), &mut host);
    let request = outcome.suggestion_request.expect("suggestion request");
    assert_eq!(request.target, "つづき");
    assert_eq!(*session.state(), InputState::ReplaceSuggestion);
}

#[test]
fn test_typing_leaves_suggestion_panel() {
    let (mut session, _context) = suggestion_session();
    let mut host = MockHost::default();

    type_text(&mut session, &mut host, "kyou");
    session.handle_event(&key_with(0x01, "s", CTRL), &mut host);
    session.receive_suggestions(1, vec!["候補".to_owned()]);

    type_text(&mut session, &mut host, "h");
    assert_eq!(*session.state(), InputState::Composing);
    assert!(!session.suggestion_panel_visible());
}
