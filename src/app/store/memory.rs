use std::{
    collections::{BTreeSet, HashMap},
    sync::{Arc, Mutex, MutexGuard},
};

use tokio::sync::broadcast;
use tokio_stream::{wrappers::BroadcastStream, StreamExt};

use crate::app::{
    errors::DbError,
    store::{
        interface::{change_feed::ChangeFeedInterface, room::RoomInterface},
        models::{ChannelEvent, ChannelStatus, PresenceEvent, Room, RoomChange, RoomPatch},
        ChangeFeed, StorageInterface, StorageResult,
    },
};

const FEED_CAPACITY: usize = 64;

#[derive(Default)]
struct MemoryState {
    rooms: HashMap<String, Room>,
    feeds: HashMap<String, broadcast::Sender<ChannelEvent>>,
    presence: HashMap<String, BTreeSet<String>>,
}

impl MemoryState {
    fn feed(&mut self, room_id: &str) -> broadcast::Sender<ChannelEvent> {
        self.feeds
            .entry(room_id.to_string())
            .or_insert_with(|| broadcast::channel(FEED_CAPACITY).0)
            .clone()
    }

    /// Deliver to current subscribers, nobody listening is not an error
    fn publish(&mut self, room_id: &str, event: ChannelEvent) {
        if let Some(sender) = self.feeds.get(room_id) {
            let _ = sender.send(event);
        }
    }

    fn presence_keys(&self, room_id: &str) -> Vec<String> {
        self.presence
            .get(room_id)
            .map(|keys| keys.iter().cloned().collect())
            .unwrap_or_default()
    }
}

/// Rooms table and change feed kept inside this process
///
/// Clones share the same rows and channels
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        // A poisoned lock only means another holder panicked, the rows are still consistent
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn room_count(&self) -> usize {
        self.lock().rooms.len()
    }

    /// Presence keys currently joined to the channel of a room
    pub fn present(&self, room_id: &str) -> Vec<String> {
        self.lock().presence_keys(room_id)
    }

    fn remove_presence(&self, room_id: &str, presence_key: &str) {
        let mut state = self.lock();
        let removed = state
            .presence
            .get_mut(room_id)
            .map(|keys| keys.remove(presence_key))
            .unwrap_or(false);

        if removed {
            log::info!("presence_leave room_id={room_id} key={presence_key}");
            state.publish(
                room_id,
                ChannelEvent::Presence(PresenceEvent::Leave {
                    key: presence_key.to_string(),
                }),
            );
        }
    }
}

impl StorageInterface for MemoryStore {}

impl RoomInterface for MemoryStore {
    async fn insert_room(&self, room: Room) -> StorageResult<Room> {
        let mut state = self.lock();
        if state.rooms.contains_key(&room.id) {
            return Err(DbError::DuplicateValue);
        }

        state.rooms.insert(room.id.clone(), room.clone());
        state.publish(&room.id, ChannelEvent::Change(RoomChange::inserted(room.clone())));
        Ok(room)
    }

    async fn find_room(&self, room_id: &str) -> StorageResult<Room> {
        self.lock()
            .rooms
            .get(room_id)
            .cloned()
            .ok_or(DbError::NotFound)
    }

    async fn update_room(&self, room_id: &str, patch: RoomPatch) -> StorageResult<Room> {
        let mut state = self.lock();
        let room = state.rooms.get_mut(room_id).ok_or(DbError::NotFound)?;

        let old = room.clone();
        room.apply(&patch);
        let new = room.clone();

        state.publish(room_id, ChannelEvent::Change(RoomChange::updated(old, new.clone())));
        Ok(new)
    }

    async fn delete_room(&self, room_id: &str) -> StorageResult<()> {
        let mut state = self.lock();
        let old = state.rooms.remove(room_id).ok_or(DbError::NotFound)?;
        state.publish(room_id, ChannelEvent::Change(RoomChange::deleted(old)));

        // Open feeds keep their receivers, later subscribers start from a fresh channel
        state.feeds.remove(room_id);
        state.presence.remove(room_id);
        Ok(())
    }
}

/// Leaves the presence set of a room when the feed holding it is dropped
struct PresenceGuard {
    store: MemoryStore,
    room_id: String,
    presence_key: String,
}

impl Drop for PresenceGuard {
    fn drop(&mut self) {
        self.store.remove_presence(&self.room_id, &self.presence_key);
    }
}

impl ChangeFeedInterface for MemoryStore {
    async fn subscribe(&self, room_id: &str, presence_key: &str) -> StorageResult<ChangeFeed> {
        let receiver = {
            let mut state = self.lock();
            let receiver = state.feed(room_id).subscribe();

            state
                .presence
                .entry(room_id.to_string())
                .or_default()
                .insert(presence_key.to_string());

            let keys = state.presence_keys(room_id);
            state.publish(
                room_id,
                ChannelEvent::Presence(PresenceEvent::Join {
                    key: presence_key.to_string(),
                }),
            );
            state.publish(room_id, ChannelEvent::Presence(PresenceEvent::Sync { keys }));
            receiver
        };

        log::info!("presence_join room_id={room_id} key={presence_key}");

        let guard = PresenceGuard {
            store: self.clone(),
            room_id: room_id.to_string(),
            presence_key: presence_key.to_string(),
        };

        let log_room_id = room_id.to_string();
        let events = BroadcastStream::new(receiver).filter_map(move |received| {
            // Keeps the presence entry alive for as long as the stream is
            let _presence = &guard;
            match received {
                Ok(event) => Some(event),
                Err(lagged) => {
                    log::warn!("room_id={log_room_id} dropped events: {lagged:?}");
                    None
                }
            }
        });

        let subscribed = tokio_stream::iter([ChannelEvent::Status(ChannelStatus::Subscribed)]);
        Ok(Box::pin(subscribed.chain(events)))
    }

    async fn leave(&self, room_id: &str, presence_key: &str) -> StorageResult<()> {
        self.remove_presence(room_id, presence_key);
        Ok(())
    }
}
