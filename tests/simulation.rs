//! Scripted sessions against the simulated overview, the way the `--test`
//! binary runs them

use pretty_assertions::assert_eq;
use serde_json::Value;

use overview_nav::test_mode::{TestCommand, TestModeConfig, TestResponse, TestSession};

fn session(windows: usize) -> TestSession {
    TestSession::new(TestModeConfig {
        windows,
        ..TestModeConfig::default()
    })
}

fn run(session: &mut TestSession, line: &str) -> TestResponse {
    let command = TestCommand::parse(line).unwrap_or_else(|e| panic!("{line}: {e}"));
    let response = session.execute(command);
    if let TestResponse::Error { message } = &response {
        panic!("{line} failed: {message}");
    }
    response
}

fn script(session: &mut TestSession, lines: &[&str]) {
    for line in lines {
        run(session, line);
    }
}

fn state(session: &mut TestSession) -> Value {
    serde_json::to_value(run(session, "state")).expect("state serializes")
}

#[test]
fn test_close_waits_for_the_reposition() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = session(4);
    script(&mut session, &["show", "Left"]);

    let before = state(&mut session);
    assert_eq!(before["selection"]["state"], "active_selected");
    assert_eq!(before["overview"]["highlighted"], 3);

    run(&mut session, "Delete");
    let during = state(&mut session);
    assert_eq!(during["selection"]["blocked"], true);
    assert_eq!(during["selection"]["refresh_pending"], true);
    assert_eq!(during["overview"]["windows"].as_array().map(Vec::len), Some(3));

    // keys are dropped until the thumbnails settled
    run(&mut session, "Up");
    assert_eq!(state(&mut session)["overview"]["highlighted"], Value::Null);

    run(&mut session, "wait 350");
    let after = state(&mut session);
    assert_eq!(after["selection"]["blocked"], false);
    assert_eq!(after["selection"]["state"], "active_unselected");
    assert_eq!(after["overview"]["timeouts"], 0);

    run(&mut session, "Up");
    assert_ne!(state(&mut session)["overview"]["highlighted"], Value::Null);
    Ok(())
}

#[test]
fn test_workspace_switch_and_new_window() {
    let mut session = session(2);
    script(&mut session, &["show", "Page_Down"]);

    let switched = state(&mut session);
    assert_eq!(switched["overview"]["active_workspace"], 1);
    assert_eq!(switched["selection"]["current"], Value::Null);

    let TestResponse::WindowOpened { id } = run(&mut session, "open") else {
        panic!("open must report the new window");
    };
    script(&mut session, &["wait 350", "Right"]);
    assert_eq!(
        state(&mut session)["overview"]["highlighted"],
        Value::from(id.get())
    );
}

#[test]
fn test_pointer_motion_ends_selection() {
    let mut session = session(3);
    script(&mut session, &["show", "move 100 100", "Right", "move 102 102"]);
    assert_eq!(state(&mut session)["selection"]["state"], "active_selected");

    run(&mut session, "move 400 100");
    let after = state(&mut session);
    assert_eq!(after["selection"]["state"], "active_unselected");
    assert_eq!(after["overview"]["highlighted"], Value::Null);
}

#[test]
fn test_flags_and_focus_hint_in_state() {
    let mut session = session(4);
    run(&mut session, "show");
    let shown = state(&mut session);
    assert_eq!(
        shown["selection"]["flags"],
        serde_json::json!(["ready", "up_to_date"])
    );
    assert_eq!(shown["overview"]["focus_hints"], serde_json::json!([4]));

    run(&mut session, "drag begin");
    let dragging = state(&mut session);
    assert_eq!(dragging["selection"]["blocked"], true);
    assert_eq!(
        dragging["selection"]["flags"],
        serde_json::json!(["ready", "up_to_date", "in_drag"])
    );
}

#[test]
fn test_activation_hides_and_detaches() {
    let mut session = session(4);
    script(&mut session, &["show", "Up", "Return"]);

    let hidden = state(&mut session);
    assert_eq!(hidden["overview"]["visible"], false);
    assert_eq!(hidden["overview"]["focus"], 2);
    assert_eq!(hidden["overview"]["subscriptions"], 0);
    assert_eq!(hidden["selection"]["attached"], false);

    // showing again attaches a new controller
    run(&mut session, "show");
    assert_eq!(state(&mut session)["selection"]["attached"], true);
}

#[test]
fn test_quit_releases_the_controller() {
    let mut session = session(1);
    run(&mut session, "show");
    assert!(matches!(run(&mut session, "quit"), TestResponse::Bye));
    assert!(session.controller().is_none());
    assert_eq!(session.overview().borrow().subscription_count(), 0);
}

#[test]
fn test_errors_are_reported_not_fatal() {
    let mut session = session(1);
    run(&mut session, "show");
    let response = session.execute(TestCommand::Show);
    assert!(matches!(response, TestResponse::Error { .. }));
    let response = session.execute(TestCommand::CloseWindow { id: 42 });
    assert!(matches!(response, TestResponse::Error { .. }));
    assert_eq!(state(&mut session)["selection"]["attached"], true);
}

#[test]
fn test_render_marks_focus_and_highlight() {
    let mut session = session(4);
    run(&mut session, "show");
    let TestResponse::Ascii { ascii } = run(&mut session, "render") else {
        panic!("render must answer with ASCII");
    };
    assert!(ascii.contains("4 [F]"));

    run(&mut session, "Left");
    let TestResponse::Ascii { ascii } = run(&mut session, "render") else {
        panic!("render must answer with ASCII");
    };
    assert!(ascii.contains("3 [*]"));
    assert!(ascii.contains("4 [F]"));
}
