use std::collections::HashMap;

use serde_json::Value;
use tokio::sync::watch;

/// Named reactive value cells populated by client replies.
///
/// Each slot is backed by a `watch` channel: readers get the latest value, subscribers are
/// woken on every delivery, including repeated deliveries of the same value.
#[derive(Default)]
pub struct InputSlots {
    slots: HashMap<String, watch::Sender<Option<Value>>>,
}

impl InputSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current content of `name`, `None` if nothing was ever delivered there.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.slots.get(name).and_then(|tx| tx.borrow().clone())
    }

    /// Delivers `value` to `name`; `None` records that the key was absent on the client.
    pub fn set(&mut self, name: &str, value: Option<Value>) {
        match self.slots.get(name) {
            Some(tx) => {
                tx.send_replace(value);
            }
            None => {
                let (tx, _) = watch::channel(value);
                self.slots.insert(name.to_string(), tx);
            }
        }
    }

    /// Observes `name`; the receiver is notified on each later delivery.
    pub fn subscribe(&mut self, name: &str) -> watch::Receiver<Option<Value>> {
        self.slots
            .entry(name.to_string())
            .or_insert_with(|| watch::channel(None).0)
            .subscribe()
    }

    /// Drops every slot named `<prefix>_...`, closing their subscriptions.
    ///
    /// Returns how many slots were dropped.
    pub fn evict_namespace(&mut self, prefix: &str) -> usize {
        let namespace = format!("{}_", prefix);
        let before = self.slots.len();
        self.slots.retain(|name, _| !name.starts_with(&namespace));
        before - self.slots.len()
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.slots.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
