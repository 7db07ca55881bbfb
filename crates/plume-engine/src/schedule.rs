//! One-shot scene actions run after the next successful tick.

use std::collections::VecDeque;
use std::fmt;

use crate::registry::SceneRegistry;

type Action = Box<dyn FnOnce(&mut SceneRegistry)>;

/// FIFO of deferred scene edits.
///
/// Actions queued during a tick (or between ticks) run once, in queue
/// order, after the next update succeeds. Anything an action queues while
/// running waits for the following tick.
#[derive(Default)]
pub struct DeferredQueue {
    actions: VecDeque<Action>,
}

impl fmt::Debug for DeferredQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredQueue")
            .field("pending", &self.actions.len())
            .finish()
    }
}

impl DeferredQueue {
    /// Empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `action` for the next successful tick.
    pub fn execute_in_next_update(&mut self, action: impl FnOnce(&mut SceneRegistry) + 'static) {
        self.actions.push_back(Box::new(action));
    }

    /// Run every action queued so far, oldest first. Returns how many ran.
    pub fn drain(&mut self, registry: &mut SceneRegistry) -> usize {
        let batch = std::mem::take(&mut self.actions);
        let ran = batch.len();
        for action in batch {
            action(registry);
        }
        ran
    }

    /// Actions waiting for the next tick.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
