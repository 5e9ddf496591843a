//! Observer hooks for the embedding UI

use std::cell::RefCell;
use std::rc::Rc;

/// Notifications emitted by [`HopTree`](crate::HopTree).
///
/// All methods default to no-ops.
pub trait Listener {
    /// A path change completed (`path` is the `/`-joined form of `names`)
    fn path_changed(&mut self, _path: &str, _names: &[String]) {}

    /// Pointer entered the label of `name`
    fn mouse_enter(&mut self, _name: &str) {}

    /// Pointer left the label of `name`
    fn mouse_leave(&mut self, _name: &str) {}
}

impl Listener for () {}

/// Event captured by [`EventLog`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HopEvent {
    /// Completed path change
    PathChanged(String),
    /// Hover started
    MouseEnter(String),
    /// Hover ended
    MouseLeave(String),
}

/// Listener that appends every notification to a shared log
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<HopEvent>>>,
}

impl EventLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the events seen so far
    pub fn events(&self) -> Vec<HopEvent> {
        self.events.borrow().clone()
    }

    /// Paths announced so far
    pub fn paths(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                HopEvent::PathChanged(path) => Some(path.clone()),
                _ => None,
            })
            .collect()
    }

    /// Drain the log
    pub fn take(&self) -> Vec<HopEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }
}

impl Listener for EventLog {
    fn path_changed(&mut self, path: &str, _names: &[String]) {
        self.events
            .borrow_mut()
            .push(HopEvent::PathChanged(path.to_string()));
    }

    fn mouse_enter(&mut self, name: &str) {
        self.events
            .borrow_mut()
            .push(HopEvent::MouseEnter(name.to_string()));
    }

    fn mouse_leave(&mut self, name: &str) {
        self.events
            .borrow_mut()
            .push(HopEvent::MouseLeave(name.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_one_log() {
        let log = EventLog::new();
        let mut handle = log.clone();
        handle.path_changed("Root/a", &["Root".into(), "a".into()]);
        handle.mouse_enter("a");

        assert_eq!(log.paths(), vec!["Root/a".to_string()]);
        assert_eq!(log.take().len(), 2);
        assert!(log.events().is_empty());
    }
}
