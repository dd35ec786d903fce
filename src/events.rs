//! Strength change notifications
//!
//! Every evaluation publishes its score to all subscribers, in subscription
//! order, synchronously.

#[cfg(feature = "async")]
use tokio::sync::broadcast;

/// Buffered scores per async subscriber before the oldest are dropped.
#[cfg(feature = "async")]
pub const EVENT_CHANNEL_CAPACITY: usize = 16;

type Subscriber = Box<dyn FnMut(f64) + Send>;

/// Multi-subscriber sink for strength changes.
pub struct StrengthEvents {
    subscribers: Vec<Subscriber>,
    #[cfg(feature = "async")]
    channel: broadcast::Sender<f64>,
}

impl Default for StrengthEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl StrengthEvents {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            #[cfg(feature = "async")]
            channel: broadcast::channel(EVENT_CHANNEL_CAPACITY).0,
        }
    }

    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(f64) + Send + 'static,
    {
        self.subscribers.push(Box::new(callback));
    }

    /// Returns a receiver for async consumers.
    ///
    /// Slow receivers lag and lose the oldest scores rather than block the meter.
    #[cfg(feature = "async")]
    pub fn subscribe_channel(&self) -> broadcast::Receiver<f64> {
        self.channel.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        let count = self.subscribers.len();
        #[cfg(feature = "async")]
        let count = count + self.channel.receiver_count();
        count
    }

    pub fn emit(&mut self, score: f64) {
        for subscriber in self.subscribers.iter_mut() {
            subscriber(score);
        }

        #[cfg(feature = "async")]
        if let Err(_e) = self.channel.send(score) {
            #[cfg(feature = "tracing")]
            tracing::debug!("No async subscriber for strength {}: {}", score, _e);
        }
    }
}
