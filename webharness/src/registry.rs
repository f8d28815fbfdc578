use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

/// What the registry needs from a session: bring its window forward,
/// push it back, and shut it down. [`crate::Session`] implements this
/// over a live WebDriver; tests implement it over a call log.
#[async_trait]
pub trait ManagedSession: Send {
    async fn focus(&self) -> Result<()>;
    async fn unfocus(&self) -> Result<()>;
    async fn close(self) -> Result<()>;
}

/// Named sessions with one marked active. Switching unfocuses the
/// current session, waits for the window manager to settle, then
/// focuses the target, so recordings show the window being switched to.
pub struct SessionRegistry<S: ManagedSession> {
    sessions: HashMap<String, S>,
    active: Option<String>,
    settle: Duration,
}

impl<S: ManagedSession> SessionRegistry<S> {
    pub fn new(settle: Duration) -> Self {
        Self {
            sessions: HashMap::new(),
            active: None,
            settle,
        }
    }

    /// Register a session under `name`. The first session registered
    /// becomes the active one.
    pub fn insert(&mut self, name: &str, session: S) -> Result<()> {
        if self.sessions.contains_key(name) {
            return Err(Error::DuplicateSession(name.to_string()));
        }
        self.sessions.insert(name.to_string(), session);
        if self.active.is_none() {
            self.active = Some(name.to_string());
        }
        tracing::debug!(name, "session registered");
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&S> {
        self.sessions
            .get(name)
            .ok_or_else(|| Error::UnknownSession(name.to_string()))
    }

    pub fn active(&self) -> Option<&S> {
        self.active.as_deref().and_then(|name| self.sessions.get(name))
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Make `name` the active session. Switching to the session that is
    /// already active does nothing; switching to an unknown name fails
    /// before any window is touched.
    pub async fn switch_to(&mut self, name: &str) -> Result<()> {
        if !self.sessions.contains_key(name) {
            return Err(Error::UnknownSession(name.to_string()));
        }
        if self.active.as_deref() == Some(name) {
            return Ok(());
        }
        if let Some(current) = self.active.as_deref() {
            if let Some(session) = self.sessions.get(current) {
                session.unfocus().await?;
            }
            tokio::time::sleep(self.settle).await;
        }
        match self.sessions.get(name) {
            Some(target) => {
                target.focus().await?;
                tracing::debug!(from = ?self.active, to = name, "session switched");
                self.active = Some(name.to_string());
                Ok(())
            }
            None => Err(Error::UnknownSession(name.to_string())),
        }
    }

    /// Close every session, logging failures rather than stopping on
    /// them so one stuck browser cannot strand the rest.
    pub async fn close_all(&mut self) {
        self.active = None;
        for (name, session) in self.sessions.drain() {
            if let Err(error) = session.close().await {
                tracing::warn!(name = %name, %error, "session did not close cleanly");
            }
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
