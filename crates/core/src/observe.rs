use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

type Callback<T> = Rc<RefCell<dyn FnMut(&T)>>;

struct Slots<T> {
    next_id: u64,
    entries: Vec<(u64, Callback<T>)>,
    /// Set while a delivery pass is running.
    notifying: bool,
    /// Values published from inside a callback, delivered after the
    /// running pass.
    queued: VecDeque<T>,
}

impl<T> Slots<T> {
    fn lookup(&self, id: u64) -> Option<Callback<T>> {
        self.entries
            .iter()
            .find(|(i, _)| *i == id)
            .map(|(_, cb)| Rc::clone(cb))
    }
}

/// Single-threaded listener list.
///
/// Notification never holds a borrow while a callback runs, so listeners
/// may subscribe, unsubscribe, or trigger further notifications from
/// inside their callback. A notification raised during delivery is queued
/// and goes out to every listener once the running pass is over, so each
/// listener sees values in publication order and the last value it gets is
/// the newest one.
pub struct Subscribers<T: 'static> {
    slots: Rc<RefCell<Slots<T>>>,
}

impl<T: 'static> Subscribers<T> {
    pub fn new() -> Self {
        Self {
            slots: Rc::new(RefCell::new(Slots {
                next_id: 0,
                entries: Vec::new(),
                notifying: false,
                queued: VecDeque::new(),
            })),
        }
    }

    /// Register `callback`. It stays registered until the returned
    /// [`Subscription`] is dropped.
    pub fn subscribe(&self, callback: impl FnMut(&T) + 'static) -> Subscription {
        let id = {
            let mut slots = self.slots.borrow_mut();
            let id = slots.next_id;
            slots.next_id += 1;
            let callback: Callback<T> = Rc::new(RefCell::new(callback));
            slots.entries.push((id, callback));
            id
        };

        let weak: Weak<RefCell<Slots<T>>> = Rc::downgrade(&self.slots);
        Subscription::new(move || {
            let Some(slots) = weak.upgrade() else {
                return;
            };
            let removed = {
                let mut slots = slots.borrow_mut();
                let pos = slots.entries.iter().position(|(i, _)| *i == id);
                pos.map(|pos| slots.entries.remove(pos))
            };
            // The callback may own other subscriptions; drop it unborrowed.
            drop(removed);
        })
    }

    /// Call every registered listener with `value`, in subscription order.
    ///
    /// From inside a callback of this list the value is queued and this
    /// returns at once.
    pub fn notify(&self, value: &T)
    where
        T: Clone,
    {
        {
            let mut slots = self.slots.borrow_mut();
            if slots.notifying {
                log::trace!("notify during delivery, queueing");
                slots.queued.push_back(value.clone());
                return;
            }
            slots.notifying = true;
        }

        self.deliver(value);
        loop {
            let next = self.slots.borrow_mut().queued.pop_front();
            match next {
                Some(v) => self.deliver(&v),
                None => break,
            }
        }

        self.slots.borrow_mut().notifying = false;
    }

    fn deliver(&self, value: &T) {
        let ids: Vec<u64> = self.slots.borrow().entries.iter().map(|(id, _)| *id).collect();
        for id in ids {
            // Look the listener up again: an earlier callback may have
            // dropped its subscription.
            let Some(callback) = self.slots.borrow().lookup(id) else {
                continue;
            };
            let Ok(mut f) = callback.try_borrow_mut() else {
                log::warn!("listener {id} is already running, skipped");
                continue;
            };
            (&mut *f)(value);
        }
    }

    pub fn len(&self) -> usize {
        self.slots.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: 'static> Clone for Subscribers<T> {
    fn clone(&self) -> Self {
        Self {
            slots: Rc::clone(&self.slots),
        }
    }
}

impl<T: 'static> Default for Subscribers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> fmt::Debug for Subscribers<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers").field("len", &self.len()).finish()
    }
}

/// Registration handle. Dropping it unregisters the listener.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    detach: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub(crate) fn new(detach: impl FnOnce() + 'static) -> Self {
        Self {
            detach: Some(Box::new(detach)),
        }
    }

    /// Unregister now. Equivalent to dropping the handle.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.detach.is_some())
            .finish()
    }
}
