use tokio_stream::StreamExt;

use crate::app::{
    errors::DbError,
    store::{
        interface::change_feed::ChangeFeedInterface,
        models::{ChannelEvent, ChannelStatus},
        ChangeFeed,
    },
};

/// The open channel of one room visit
///
/// Doubles as the cancellation handle: unsubscribing drops the feed, which leaves the channel.
/// Unsubscribing more than once is a no-op, and dropping the handle unsubscribes.
pub struct RoomSubscription {
    room_id: String,
    presence_key: String,
    feed: Option<ChangeFeed>,
}

impl RoomSubscription {
    pub async fn open<S: ChangeFeedInterface>(
        store: &S,
        room_id: &str,
        presence_key: &str,
    ) -> Result<Self, DbError> {
        let feed = store.subscribe(room_id, presence_key).await?;
        tracing::info!(room_id, presence_key, "Opened room channel");

        Ok(Self {
            room_id: room_id.to_string(),
            presence_key: presence_key.to_string(),
            feed: Some(feed),
        })
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn presence_key(&self) -> &str {
        &self.presence_key
    }

    pub fn is_active(&self) -> bool {
        self.feed.is_some()
    }

    /// Returns whether a channel was actually closed by this call
    pub fn unsubscribe(&mut self) -> bool {
        match self.feed.take() {
            Some(feed) => {
                drop(feed);
                tracing::info!(room_id = %self.room_id, "Cleaning up room channel");
                true
            }
            None => false,
        }
    }

    /// Leave presence and wait for it to be announced, then unsubscribe
    pub async fn close<S: ChangeFeedInterface>(&mut self, store: &S) -> bool {
        if !self.is_active() {
            return false;
        }

        if let Err(error) = store.leave(&self.room_id, &self.presence_key).await {
            tracing::warn!(room_id = %self.room_id, ?error, "Presence leave failed");
        }
        self.unsubscribe()
    }

    /// Next event of the channel, never resolves once unsubscribed
    ///
    /// When the feed ends on its own a single `Closed` status is reported.
    pub async fn next(&mut self) -> ChannelEvent {
        let Some(feed) = self.feed.as_mut() else {
            return std::future::pending().await;
        };

        let next = feed.next().await;
        match next {
            Some(event) => event,
            None => {
                self.feed = None;
                tracing::warn!(room_id = %self.room_id, "Room channel ended");
                ChannelEvent::Status(ChannelStatus::Closed)
            }
        }
    }
}

impl Drop for RoomSubscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::app::store::{
        interface::room::RoomInterface,
        models::{PresenceEvent, Room},
        MemoryStore,
    };

    #[tokio::test]
    async fn unsubscribe_is_idempotent() {
        let store = MemoryStore::default();
        store
            .insert_room(Room::new("abc123".to_string(), "Ada".to_string()))
            .await
            .unwrap();

        let mut subscription = RoomSubscription::open(&store, "abc123", "client_a")
            .await
            .unwrap();
        assert_eq!(
            subscription.next().await,
            ChannelEvent::Status(ChannelStatus::Subscribed)
        );

        assert!(subscription.unsubscribe());
        assert!(!subscription.unsubscribe());
        assert!(!subscription.is_active());
        assert!(store.present("abc123").is_empty());
        drop(subscription);
    }

    #[tokio::test]
    async fn dropping_the_handle_leaves_the_channel() {
        let store = MemoryStore::default();
        store
            .insert_room(Room::new("abc123".to_string(), "Ada".to_string()))
            .await
            .unwrap();

        let subscription = RoomSubscription::open(&store, "abc123", "client_a")
            .await
            .unwrap();
        assert_eq!(store.present("abc123"), vec!["client_a"]);

        drop(subscription);
        assert!(store.present("abc123").is_empty());
    }

    #[tokio::test]
    async fn closing_announces_the_leave_once() {
        let store = MemoryStore::default();
        store
            .insert_room(Room::new("abc123".to_string(), "Ada".to_string()))
            .await
            .unwrap();

        let mut watcher = RoomSubscription::open(&store, "abc123", "watcher_a")
            .await
            .unwrap();
        let mut subscription = RoomSubscription::open(&store, "abc123", "client_a")
            .await
            .unwrap();

        assert!(subscription.close(&store).await);
        assert!(!subscription.close(&store).await);
        assert_eq!(store.present("abc123"), vec!["watcher_a"]);

        let mut leaves = vec![];
        while let Ok(event) = tokio::time::timeout(Duration::from_millis(50), watcher.next()).await
        {
            if let ChannelEvent::Presence(PresenceEvent::Leave { key }) = event {
                leaves.push(key);
            }
        }
        assert_eq!(leaves, vec!["client_a"]);
    }
}
