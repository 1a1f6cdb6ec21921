use crate::bus::Subscription;
use crate::models::Channel;

/// Subscriptions opened by one component instance, at most one per channel.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    entries: Vec<(Channel, Subscription)>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Disposes whatever is registered for `channel`, then opens the
    /// replacement, if any.
    pub fn register(&mut self, channel: Channel, open: impl FnOnce() -> Option<Subscription>) {
        self.remove(channel);
        if let Some(subscription) = open() {
            self.entries.push((channel, subscription));
        }
    }

    pub fn remove(&mut self, channel: Channel) -> bool {
        let Some(index) = self.entries.iter().position(|(c, _)| *c == channel) else {
            return false;
        };
        let (_, mut subscription) = self.entries.remove(index);
        subscription.dispose();
        true
    }

    pub fn is_registered(&self, channel: Channel) -> bool {
        self.entries.iter().any(|(c, _)| *c == channel)
    }

    pub fn channels(&self) -> Vec<Channel> {
        self.entries.iter().map(|(c, _)| *c).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dispose_all(&mut self) {
        for (_, mut subscription) in self.entries.drain(..) {
            subscription.dispose();
        }
    }
}
