//! Progress Publisher
//! Fans sync events out to every current subscriber over a tokio broadcast
//! channel. Publishing never waits on subscribers; a subscriber that falls
//! more than the channel capacity behind observes a lag error on receive.

use log::{debug, trace};
use tokio::sync::broadcast;

use crate::domain::synchronization::value_objects::sync_event::SyncEvent;

#[derive(Debug, Clone)]
pub struct ProgressPublisher {
    event_tx: broadcast::Sender<SyncEvent>,
}

impl ProgressPublisher {
    pub fn new(capacity: usize) -> Self {
        let (event_tx, _) = broadcast::channel::<SyncEvent>(capacity);
        Self { event_tx }
    }

    /// Returns how many subscribers the event was handed to.
    pub fn publish(&self, event: SyncEvent) -> usize {
        trace!("Publishing {:?}", event);
        match self.event_tx.send(event) {
            Ok(n_subscribers) => n_subscribers,
            Err(broadcast::error::SendError(event)) => {
                debug!(
                    "No subscriber for {} event of request {}",
                    event.category(),
                    event.request_id()
                );
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.event_tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::domain::synchronization::value_objects::{
        category::SyncCategory, stage_outcome::StageOutcome,
    };

    fn forms_event(count: u32) -> SyncEvent {
        SyncEvent::stage_completed(
            Uuid::new_v4(),
            SyncCategory::Forms,
            &StageOutcome::success(count),
        )
    }

    #[test]
    fn publishing_without_subscribers_is_not_an_error() {
        let publisher = ProgressPublisher::new(4);
        assert_eq!(publisher.publish(forms_event(1)), 0);
    }

    #[tokio::test]
    async fn every_subscriber_receives_events_in_order() {
        let publisher = ProgressPublisher::new(8);
        let mut first = publisher.subscribe();
        let mut second = publisher.subscribe();

        let a = forms_event(1);
        let b = forms_event(2);
        assert_eq!(publisher.publish(a.clone()), 2);
        assert_eq!(publisher.publish(b.clone()), 2);

        for rx in [&mut first, &mut second] {
            assert_eq!(rx.recv().await.unwrap(), a);
            assert_eq!(rx.recv().await.unwrap(), b);
        }
    }

    #[tokio::test]
    async fn late_subscribers_only_see_later_events() {
        let publisher = ProgressPublisher::new(8);
        let _early = publisher.subscribe();
        publisher.publish(forms_event(1));

        let mut late = publisher.subscribe();
        let later = forms_event(2);
        publisher.publish(later.clone());
        assert_eq!(late.recv().await.unwrap(), later);
    }
}
