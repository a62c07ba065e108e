//! Host environment bindings: viewport geometry, keyboard input and the
//! document-level side effects components are allowed to install.
//!
//! Document effects are handed out as guards. Dropping a guard releases the
//! effect, so a component that is torn down can never leak a listener or
//! leave the page scroll-locked.

use std::{cell::RefCell, rc::Rc};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Other,
}

/// Kinds of document-level listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerKind {
    Keydown,
    Resize,
}

#[derive(Debug, Default)]
struct DocumentState {
    scroll_locks: usize,
    keydown_listeners: usize,
    resize_listeners: usize,
}

impl DocumentState {
    fn listeners(&self, kind: ListenerKind) -> usize {
        match kind {
            ListenerKind::Keydown => self.keydown_listeners,
            ListenerKind::Resize => self.resize_listeners,
        }
    }

    fn listeners_mut(&mut self, kind: ListenerKind) -> &mut usize {
        match kind {
            ListenerKind::Keydown => &mut self.keydown_listeners,
            ListenerKind::Resize => &mut self.resize_listeners,
        }
    }
}

/// Shared handle to the page-wide state. Cloning yields another handle to the
/// same document.
#[derive(Debug, Clone, Default)]
pub struct Document {
    state: Rc<RefCell<DocumentState>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.state.borrow().scroll_locks > 0
    }

    pub fn listener_count(&self, kind: ListenerKind) -> usize {
        self.state.borrow().listeners(kind)
    }

    /// Disables body scrolling until the returned guard is dropped.
    pub fn lock_scroll(&self) -> ScrollLock {
        self.state.borrow_mut().scroll_locks += 1;
        ScrollLock {
            state: Rc::clone(&self.state),
        }
    }

    pub fn add_listener(&self, kind: ListenerKind) -> ListenerGuard {
        *self.state.borrow_mut().listeners_mut(kind) += 1;
        ListenerGuard {
            kind,
            state: Rc::clone(&self.state),
        }
    }
}

#[derive(Debug)]
pub struct ScrollLock {
    state: Rc<RefCell<DocumentState>>,
}

impl Drop for ScrollLock {
    fn drop(&mut self) {
        let mut state = self.state.borrow_mut();
        state.scroll_locks = state.scroll_locks.saturating_sub(1);
    }
}

#[derive(Debug)]
pub struct ListenerGuard {
    kind: ListenerKind,
    state: Rc<RefCell<DocumentState>>,
}

impl ListenerGuard {
    pub fn kind(&self) -> ListenerKind {
        self.kind
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        let mut state = self.state.borrow_mut();
        let count = state.listeners_mut(self.kind);
        *count = count.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guards_release_on_drop() {
        let document = Document::new();
        {
            let _lock = document.lock_scroll();
            let listener = document.add_listener(ListenerKind::Keydown);
            assert!(document.is_scroll_locked());
            assert_eq!(listener.kind(), ListenerKind::Keydown);
            assert_eq!(document.listener_count(ListenerKind::Keydown), 1);
            assert_eq!(document.listener_count(ListenerKind::Resize), 0);
        }
        assert!(!document.is_scroll_locked());
        assert_eq!(document.listener_count(ListenerKind::Keydown), 0);
    }

    #[test]
    fn nested_scroll_locks_stack() {
        let document = Document::new();
        let outer = document.lock_scroll();
        let inner = document.clone().lock_scroll();
        drop(outer);
        assert!(document.is_scroll_locked());
        drop(inner);
        assert!(!document.is_scroll_locked());
    }

    #[test]
    fn viewport_clamps_negative_sizes() {
        let viewport = Viewport::new(-10.0, 300.0);
        assert_eq!(viewport.width, 0.0);
        assert_eq!(viewport.height, 300.0);
    }
}
