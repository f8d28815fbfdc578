//! Registry behavior against a scripted fake session, so the
//! focus/unfocus ordering is observable without a browser.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use webharness::{Error, ManagedSession, Result, SessionRegistry};

type CallLog = Arc<Mutex<Vec<String>>>;

struct FakeSession {
    name: String,
    log: CallLog,
    fail_close: bool,
}

impl FakeSession {
    fn new(name: &str, log: &CallLog) -> Self {
        Self {
            name: name.to_string(),
            log: Arc::clone(log),
            fail_close: false,
        }
    }

    fn failing_close(name: &str, log: &CallLog) -> Self {
        Self {
            fail_close: true,
            ..Self::new(name, log)
        }
    }

    fn record(&self, event: &str) {
        self.log
            .lock()
            .unwrap()
            .push(format!("{} {}", event, self.name));
    }
}

#[async_trait]
impl ManagedSession for FakeSession {
    async fn focus(&self) -> Result<()> {
        self.record("focus");
        Ok(())
    }

    async fn unfocus(&self) -> Result<()> {
        self.record("unfocus");
        Ok(())
    }

    async fn close(self) -> Result<()> {
        self.record("close");
        if self.fail_close {
            return Err(std::io::Error::other("browser went away").into());
        }
        Ok(())
    }
}

fn registry() -> SessionRegistry<FakeSession> {
    SessionRegistry::new(Duration::from_millis(1))
}

#[tokio::test]
async fn first_insert_becomes_active() {
    let log = CallLog::default();
    let mut sessions = registry();
    sessions.insert("a", FakeSession::new("a", &log)).unwrap();
    sessions.insert("b", FakeSession::new("b", &log)).unwrap();

    assert_eq!(sessions.active_name(), Some("a"));
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions.get("b").unwrap().name, "b");
    // Registration alone never touches any window.
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_name_is_rejected() {
    let log = CallLog::default();
    let mut sessions = registry();
    sessions.insert("a", FakeSession::new("a", &log)).unwrap();

    let err = sessions.insert("a", FakeSession::new("a", &log)).unwrap_err();
    assert!(matches!(err, Error::DuplicateSession(name) if name == "a"));
    assert_eq!(sessions.len(), 1);
}

#[tokio::test]
async fn switch_unfocuses_current_then_focuses_target() {
    let log = CallLog::default();
    let mut sessions = registry();
    sessions.insert("a", FakeSession::new("a", &log)).unwrap();
    sessions.insert("b", FakeSession::new("b", &log)).unwrap();

    sessions.switch_to("b").await.unwrap();

    assert_eq!(*log.lock().unwrap(), vec!["unfocus a", "focus b"]);
    assert_eq!(sessions.active_name(), Some("b"));
}

#[tokio::test]
async fn switch_to_active_session_is_a_noop() {
    let log = CallLog::default();
    let mut sessions = registry();
    sessions.insert("a", FakeSession::new("a", &log)).unwrap();

    sessions.switch_to("a").await.unwrap();

    assert!(log.lock().unwrap().is_empty());
    assert_eq!(sessions.active_name(), Some("a"));
}

#[tokio::test]
async fn switch_to_unknown_session_leaves_windows_alone() {
    let log = CallLog::default();
    let mut sessions = registry();
    sessions.insert("a", FakeSession::new("a", &log)).unwrap();

    let err = sessions.switch_to("ghost").await.unwrap_err();

    assert!(matches!(err, Error::UnknownSession(name) if name == "ghost"));
    assert!(log.lock().unwrap().is_empty());
    assert_eq!(sessions.active_name(), Some("a"));
}

#[tokio::test]
async fn close_all_continues_past_failures() {
    let log = CallLog::default();
    let mut sessions = registry();
    sessions
        .insert("a", FakeSession::failing_close("a", &log))
        .unwrap();
    sessions.insert("b", FakeSession::new("b", &log)).unwrap();

    sessions.close_all().await;

    let events = log.lock().unwrap();
    assert!(events.contains(&"close a".to_string()));
    assert!(events.contains(&"close b".to_string()));
    assert!(sessions.is_empty());
    assert!(sessions.active_name().is_none());
}
