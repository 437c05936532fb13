//! Change notifications for collaborators such as a timeline or a map layer.

use std::fmt;
use std::sync::Arc;

use crate::resource::Resource;

/// A batch of resources that entered or left the index.
#[derive(Debug)]
pub enum ResourceEvent<P> {
    Added(Vec<Arc<Resource<P>>>),
    Removed(Vec<Arc<Resource<P>>>),
}

impl<P> ResourceEvent<P> {
    pub fn resources(&self) -> &[Arc<Resource<P>>] {
        match self {
            ResourceEvent::Added(r) | ResourceEvent::Removed(r) => r,
        }
    }

    pub fn is_added(&self) -> bool {
        matches!(self, ResourceEvent::Added(_))
    }
}

/// Callback invoked for every change batch.
pub type ResourceListener<P> = Box<dyn FnMut(&ResourceEvent<P>)>;

/// Handle returned by [`Listeners::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Ordered listener registry.
///
/// Listeners are called synchronously in registration order.
pub struct Listeners<P> {
    entries: Vec<(ListenerId, ResourceListener<P>)>,
    next_id: u64,
}

impl<P> Default for Listeners<P> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }
}

impl<P> fmt::Debug for Listeners<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}

impl<P> Listeners<P> {
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&ResourceEvent<P>) + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(listener)));
        id
    }

    /// Returns false if `id` was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn emit(&mut self, event: &ResourceEvent<P>) {
        for (_, listener) in self.entries.iter_mut() {
            listener(event);
        }
    }
}
