//! Completion signals
//!
//! The runtime is a single logical thread, so completion is a shared flag
//! polled between ticks rather than an async future. A `CompletionSource`
//! settles the signal; any number of `Completion` handles observe it.
//! Aggregate signals (`Completion::all`) settle once every child has, which
//! is how `fire_event` reports that all touched runs reached done.

use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug)]
enum Node {
    /// Not yet settled
    Pending,
    /// Settled successfully
    Resolved,
    /// Settled by cancellation/rejection
    Cancelled,
    /// Settles when every child settles
    All(Vec<Completion>),
    /// Forwards to another signal (deferred binding)
    Linked(Completion),
}

/// Read-only handle to a completion signal
#[derive(Debug, Clone)]
pub struct Completion {
    inner: Rc<RefCell<Node>>,
}

impl Completion {
    /// An already-resolved signal (e.g. a firing that matched nothing)
    pub fn resolved() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Node::Resolved)),
        }
    }

    /// An already-cancelled signal (e.g. a failed external operation)
    pub fn cancelled() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Node::Cancelled)),
        }
    }

    /// A signal that settles once every child has settled
    ///
    /// An empty child list is already resolved.
    pub fn all(children: Vec<Completion>) -> Self {
        if children.is_empty() {
            return Self::resolved();
        }
        Self {
            inner: Rc::new(RefCell::new(Node::All(children))),
        }
    }

    /// Whether the signal has settled, by resolution or cancellation
    pub fn is_settled(&self) -> bool {
        match &*self.inner.borrow() {
            Node::Pending => false,
            Node::Resolved | Node::Cancelled => true,
            Node::All(children) => children.iter().all(|c| c.is_settled()),
            Node::Linked(other) => other.is_settled(),
        }
    }

    /// Whether the signal settled successfully
    pub fn is_resolved(&self) -> bool {
        match &*self.inner.borrow() {
            Node::Pending | Node::Cancelled => false,
            Node::Resolved => true,
            Node::All(children) => children.iter().all(|c| c.is_resolved()),
            Node::Linked(other) => other.is_resolved(),
        }
    }

    /// Whether the signal settled by cancellation
    pub fn is_cancelled(&self) -> bool {
        self.is_settled() && !self.is_resolved()
    }
}

/// Write side of a completion signal
#[derive(Debug, Clone)]
pub struct CompletionSource {
    inner: Rc<RefCell<Node>>,
}

impl CompletionSource {
    /// Create a new pending source
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Node::Pending)),
        }
    }

    /// Get a read handle to this signal
    pub fn completion(&self) -> Completion {
        Completion {
            inner: Rc::clone(&self.inner),
        }
    }

    /// Settle successfully; no effect if already settled or linked
    pub fn resolve(&self) {
        let mut node = self.inner.borrow_mut();
        if matches!(*node, Node::Pending) {
            *node = Node::Resolved;
        }
    }

    /// Settle by cancellation; no effect if already settled or linked
    pub fn cancel(&self) {
        let mut node = self.inner.borrow_mut();
        if matches!(*node, Node::Pending) {
            *node = Node::Cancelled;
        }
    }

    /// Forward this signal to another one
    ///
    /// Used when the signal is handed out before the operation it tracks
    /// exists (a script's deferred broadcast, a sound not yet started).
    pub fn link(&self, target: Completion) {
        let mut node = self.inner.borrow_mut();
        if matches!(*node, Node::Pending) {
            *node = Node::Linked(target);
        }
    }
}

impl Default for CompletionSource {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve() {
        let source = CompletionSource::new();
        let signal = source.completion();
        assert!(!signal.is_settled());

        source.resolve();
        assert!(signal.is_resolved());
        assert!(!signal.is_cancelled());
    }

    #[test]
    fn test_cancel() {
        let source = CompletionSource::new();
        let signal = source.completion();
        source.cancel();
        assert!(signal.is_settled());
        assert!(signal.is_cancelled());

        // Cancellation is final
        source.resolve();
        assert!(signal.is_cancelled());
    }

    #[test]
    fn test_all_settles_when_every_child_does() {
        let a = CompletionSource::new();
        let b = CompletionSource::new();
        let both = Completion::all(vec![a.completion(), b.completion()]);

        a.resolve();
        assert!(!both.is_settled());
        b.resolve();
        assert!(both.is_resolved());
    }

    #[test]
    fn test_all_empty_is_resolved() {
        assert!(Completion::all(Vec::new()).is_resolved());
    }

    #[test]
    fn test_link_forwards() {
        let source = CompletionSource::new();
        let signal = source.completion();

        let inner = CompletionSource::new();
        source.link(inner.completion());
        assert!(!signal.is_settled());

        inner.resolve();
        assert!(signal.is_resolved());
    }
}
