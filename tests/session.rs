use std::time::Duration;

use tapcalc::calculator::Action;
use tapcalc::config::Config;
use tapcalc::keys::actions_for_keys;
use tapcalc::session::Session;

fn config(long_press_ms: u64) -> Config {
    Config {
        long_press_ms,
        ..Config::default()
    }
}

#[test]
fn applies_actions_in_order() {
    let session = Session::spawn(&Config::default()).unwrap();
    for action in actions_for_keys("12+7") {
        session.apply(action).unwrap();
    }
    let display = session.apply(Action::Enter).unwrap();
    assert_eq!(display.result_text, "19");

    let snapshot = session.snapshot().unwrap();
    assert_eq!(snapshot.buffer, "19");
    assert_eq!(snapshot.last_result, Some(19.0));
    assert!(snapshot.just_evaluated);
    session.shutdown();
}

#[test]
fn set_expr_forces_buffer() {
    let session = Session::spawn(&Config::default()).unwrap();
    let display = session.set_expr("2*(3+4)").unwrap();
    assert_eq!(display.expression_text, "2*(3+4)");
    assert_eq!(display.result_text, "14");
}

#[test]
fn short_press_clears_on_release() {
    let session = Session::spawn(&config(10_000)).unwrap();
    session.set_expr("5+5").unwrap();
    session.press_clear().unwrap();
    let display = session.release_clear().unwrap();
    assert_eq!(display.result_text, "0");
    assert_eq!(session.snapshot().unwrap().buffer, "");
    assert!(session.updates().is_empty());
}

#[test]
fn long_press_clears_without_release() {
    let session = Session::spawn(&config(20)).unwrap();
    session.set_expr("9*9").unwrap();
    session.apply(Action::Enter).unwrap();
    session.press_clear().unwrap();

    let update = session
        .updates()
        .recv_timeout(Duration::from_secs(5))
        .expect("long press should fire");
    assert_eq!(update.result_text, "0");
    assert_eq!(session.snapshot().unwrap().last_result, None);

    // The release after a fired long press changes nothing.
    session.set_expr("1+1").unwrap();
    let display = session.release_clear().unwrap();
    assert_eq!(display.expression_text, "1+1");
}

#[test]
fn cancelled_press_does_nothing() {
    let session = Session::spawn(&config(20)).unwrap();
    session.set_expr("4").unwrap();
    session.press_clear().unwrap();
    session.cancel_clear().unwrap();

    assert!(
        session
            .updates()
            .recv_timeout(Duration::from_millis(100))
            .is_err()
    );
    assert_eq!(session.snapshot().unwrap().buffer, "4");
}

#[test]
fn handle_reports_closed_session() {
    let session = Session::spawn(&Config::default()).unwrap();
    let updates = session.updates().clone();
    session.shutdown();
    assert!(updates.recv_timeout(Duration::from_millis(10)).is_err());
}
