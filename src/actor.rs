use std::time::Duration;

use tokio::sync::mpsc::error::SendError;
use tokio::sync::mpsc::{
    UnboundedReceiver, UnboundedSender, WeakUnboundedSender, unbounded_channel,
};
use tracing::Span;

pub mod coordinator;

pub struct Sender<Event>(UnboundedSender<(Span, Event)>);
pub type Receiver<Event> = UnboundedReceiver<(Span, Event)>;

/// A sender that does not keep the channel open.
#[derive(Debug)]
pub struct WeakSender<Event>(WeakUnboundedSender<(Span, Event)>);

pub fn channel<Event>() -> (Sender<Event>, Receiver<Event>) {
    let (tx, rx) = unbounded_channel();
    (Sender(tx), rx)
}

impl<Event> Sender<Event> {
    pub fn send(&self, event: Event) {
        // Most of the time we can ignore send errors, they just indicate the
        // coordinator is shutting down.
        _ = self.try_send(event)
    }

    pub fn try_send(&self, event: Event) -> Result<(), SendError<(Span, Event)>> {
        self.0.send((Span::current(), event))
    }

    pub fn downgrade(&self) -> WeakSender<Event> { WeakSender(self.0.downgrade()) }
}

impl<Event> Clone for Sender<Event> {
    fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<Event> WeakSender<Event> {
    pub fn upgrade(&self) -> Option<Sender<Event>> { self.0.upgrade().map(Sender) }
}

impl<Event> Clone for WeakSender<Event> {
    fn clone(&self) -> Self { Self(self.0.clone()) }
}

/// Sends `event` after `delay` from a spawned task. The pending task keeps
/// the channel open until it fires. Must be called within a tokio runtime.
pub fn send_after<Event: Send + 'static>(tx: Sender<Event>, delay: Duration, event: Event) {
    let span = Span::current();
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        _ = tx.0.send((span, event));
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_after_delivers_in_order() {
        let (tx, mut rx) = channel();
        send_after(tx.clone(), Duration::from_millis(20), 2);
        send_after(tx.clone(), Duration::from_millis(1), 1);
        drop(tx);

        let (_, first) = rx.recv().await.unwrap();
        let (_, second) = rx.recv().await.unwrap();
        assert_eq!((first, second), (1, 2));
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn weak_sender_does_not_keep_channel_open() {
        let (tx, mut rx) = channel::<u32>();
        let weak = tx.downgrade();
        weak.upgrade().unwrap().send(7);
        drop(tx);

        assert_eq!(rx.recv().await.unwrap().1, 7);
        assert!(rx.recv().await.is_none());
        assert!(weak.upgrade().is_none());
    }
}
