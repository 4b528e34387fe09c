// Copyright 2020 Zachary Stewart
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Change notification for renderers.
//!
//! Every public operation that mutates the editor emits at most one notification, after
//! the mutation has been fully applied. The payload says which parts of the state moved;
//! observers are free to ignore it and re-read everything.
use std::fmt;

use enumflags2::BitFlags;

/// Parts of the editor state that a notification covers.
#[derive(BitFlags, Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u8)]
pub enum Change {
    /// The anchorage was resized.
    Dimensions = 0b0001,
    /// The vessel inventory was replaced or a vessel changed shape.
    Fleet = 0b0010,
    /// Placements were committed or released.
    Placements = 0b0100,
    /// The drag session started, ended or was updated.
    Drag = 0b1000,
}

/// Handle returned by [`Observers::subscribe`], used to unsubscribe.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Subscription(u64);

type Callback<S> = Box<dyn FnMut(&S, BitFlags<Change>)>;

/// Registry of change observers of a state of type `S`.
pub struct Observers<S> {
    next: u64,
    callbacks: Vec<(Subscription, Callback<S>)>,
}

impl<S> Observers<S> {
    pub fn new() -> Self {
        Self {
            next: 0,
            callbacks: Vec::new(),
        }
    }

    /// Register a callback. Callbacks run in subscription order.
    pub fn subscribe<F>(&mut self, callback: F) -> Subscription
    where
        F: FnMut(&S, BitFlags<Change>) + 'static,
    {
        let subscription = Subscription(self.next);
        self.next += 1;
        self.callbacks.push((subscription, Box::new(callback)));
        subscription
    }

    /// Remove a callback. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(s, _)| *s != subscription);
        self.callbacks.len() != before
    }

    /// Invoke every callback with the given state. Does nothing for an empty change set.
    pub fn emit(&mut self, state: &S, changes: BitFlags<Change>) {
        if changes.is_empty() {
            return;
        }
        for (_, callback) in self.callbacks.iter_mut() {
            callback(state, changes);
        }
    }
}

impl<S> Default for Observers<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for Observers<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Observers")
            .field("subscriptions", &self.callbacks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;

    #[test]
    fn callbacks_receive_changes() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut observers = Observers::<u32>::new();
        let sink = Rc::clone(&seen);
        observers.subscribe(move |state, changes| sink.borrow_mut().push((*state, changes)));

        observers.emit(&7, Change::Placements | Change::Drag);
        observers.emit(&8, BitFlags::empty());

        assert_eq!(
            *seen.borrow(),
            vec![(7, Change::Placements | Change::Drag)]
        );
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let count = Rc::new(RefCell::new(0));
        let mut observers = Observers::<()>::new();
        let sink = Rc::clone(&count);
        let sub = observers.subscribe(move |_, _| *sink.borrow_mut() += 1);
        observers.emit(&(), Change::Fleet.into());
        assert!(observers.unsubscribe(sub));
        assert!(!observers.unsubscribe(sub));
        observers.emit(&(), Change::Fleet.into());
        assert_eq!(*count.borrow(), 1);
    }
}
