use std::fmt;

/// Notification delivered to listeners when a named property changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyChange {
    pub property: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&PropertyChange)>;

/// Embedded change-notification helper.
///
/// Types that want to be observable own one of these and delegate to it
/// instead of inheriting the behavior.
#[derive(Default)]
pub struct PropertyObservers {
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl PropertyObservers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&PropertyChange) + 'static,
    {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Stores `value` into `field` and notifies when it differs from the
    /// current value. Returns whether the field changed.
    pub fn set_property<T: PartialEq>(
        &mut self,
        field: &mut T,
        value: T,
        property: &'static str,
    ) -> bool {
        if *field == value {
            return false;
        }

        *field = value;
        self.notify_changed(property);
        true
    }

    pub fn notify_changed(&mut self, property: &'static str) {
        let change = PropertyChange { property };
        for (_, listener) in self.listeners.iter_mut() {
            listener(&change);
        }
    }
}

impl fmt::Debug for PropertyObservers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyObservers")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Uniform subscription surface for anything that embeds [`PropertyObservers`].
pub trait Observable {
    fn observers_mut(&mut self) -> &mut PropertyObservers;

    fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&PropertyChange) + 'static,
        Self: Sized,
    {
        self.observers_mut().subscribe(listener)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers_mut().unsubscribe(id)
    }
}
