use crate::error::{Error, Result};
use crate::session::Session;
use thirtyfour::WindowHandle;

/// Ways to pick a window within one browser session.
#[derive(Clone, Debug)]
pub enum WindowTarget {
    /// A handle previously returned by the driver.
    Handle(WindowHandle),
    /// Substring matched against each window's title first, then its URL.
    Name(String),
    /// Position in the driver's window list. Negative counts from the
    /// end, so `-1` is the most recently opened window.
    Index(i64),
}

impl Session {
    /// Switch the driver to the window selected by `target`.
    pub async fn switch_window(&self, target: &WindowTarget) -> Result<()> {
        match target {
            WindowTarget::Handle(handle) => {
                self.driver().switch_to_window(handle.clone()).await?;
                Ok(())
            }
            WindowTarget::Name(name) => self.switch_window_named(name).await,
            WindowTarget::Index(index) => self.switch_window_index(*index).await,
        }
    }

    /// Walk the open windows and stop on the first whose title or URL
    /// contains `name`. The walk has to switch into each candidate
    /// because title and URL are only readable on the current window.
    pub async fn switch_window_named(&self, name: &str) -> Result<()> {
        for handle in self.driver().windows().await? {
            self.driver().switch_to_window(handle).await?;
            if self.driver().title().await?.contains(name) {
                return Ok(());
            }
            if self.driver().current_url().await?.as_str().contains(name) {
                return Ok(());
            }
        }
        Err(Error::WindowNotFound(name.to_string()))
    }

    /// Switch to the window at `index` in the driver's window list.
    pub async fn switch_window_index(&self, index: i64) -> Result<()> {
        let handles = self.driver().windows().await?;
        let resolved = resolve_index(index, handles.len()).ok_or_else(|| {
            Error::WindowNotFound(format!("index {} ({} windows open)", index, handles.len()))
        })?;
        self.driver().switch_to_window(handles[resolved].clone()).await?;
        Ok(())
    }
}

fn resolve_index(index: i64, len: usize) -> Option<usize> {
    let resolved = if index < 0 { len as i64 + index } else { index };
    if resolved < 0 || resolved >= len as i64 {
        None
    } else {
        Some(resolved as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_indices_are_bounds_checked() {
        assert_eq!(resolve_index(0, 3), Some(0));
        assert_eq!(resolve_index(2, 3), Some(2));
        assert_eq!(resolve_index(3, 3), None);
    }

    #[test]
    fn negative_indices_count_from_the_end() {
        assert_eq!(resolve_index(-1, 3), Some(2));
        assert_eq!(resolve_index(-3, 3), Some(0));
        assert_eq!(resolve_index(-4, 3), None);
    }

    #[test]
    fn empty_window_list_matches_nothing() {
        assert_eq!(resolve_index(0, 0), None);
        assert_eq!(resolve_index(-1, 0), None);
    }
}
