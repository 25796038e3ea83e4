// Session state - transient values that live and die with the process

/// Scroll memory for the sidebar. A link click records the sidebar's
/// offset here; the next attach consumes it. Reading always clears the
/// slot, so a remembered value is applied at most once.
pub struct SessionState {
    sidebar_scroll: Option<f32>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            sidebar_scroll: None,
        }
    }

    pub fn remember_sidebar_scroll(&mut self, offset: f32) {
        self.sidebar_scroll = Some(offset);
    }

    /// Read-then-delete. Returns the remembered offset, leaving the slot
    /// empty either way.
    pub fn take_sidebar_scroll(&mut self) -> Option<f32> {
        self.sidebar_scroll.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_memory_is_consumed_once() {
        let mut session = SessionState::new();
        assert_eq!(session.take_sidebar_scroll(), None);

        session.remember_sidebar_scroll(142.5);
        assert_eq!(session.take_sidebar_scroll(), Some(142.5));
        assert_eq!(session.take_sidebar_scroll(), None);
    }

    #[test]
    fn later_clicks_overwrite_the_remembered_offset() {
        let mut session = SessionState::new();
        session.remember_sidebar_scroll(10.0);
        session.remember_sidebar_scroll(88.0);
        assert_eq!(session.take_sidebar_scroll(), Some(88.0));
        assert_eq!(session.take_sidebar_scroll(), None);
    }
}
