use crate::app::{
    errors::DbError,
    store::interface::{change_feed::ChangeFeedInterface, room::RoomInterface},
    types::{StoreBackend, StoreConfig},
};

pub mod interface;
pub mod memory;
pub mod models;
pub mod redis_client;

pub use interface::StorageInterface;
pub use memory::MemoryStore;
pub use redis_client::RedisClient;

pub type StorageResult<T> = Result<T, DbError>;

/// A stream of events for a single room channel
///
/// Dropping the stream leaves the channel
pub type ChangeFeed =
    std::pin::Pin<Box<dyn tokio_stream::Stream<Item = models::ChannelEvent> + Send>>;

/// The store backend selected at startup
#[derive(Clone)]
pub enum Store {
    Memory(MemoryStore),
    Redis(RedisClient),
}

impl Store {
    pub async fn connect(config: &StoreConfig) -> StorageResult<Self> {
        match config.backend {
            StoreBackend::Memory => {
                log::info!("Using the in memory store");
                Ok(Self::Memory(MemoryStore::default()))
            }
            StoreBackend::Redis => {
                let redis_config = config.redis.clone().unwrap_or_default();
                log::info!(
                    "Connecting to redis at {}:{}",
                    redis_config.host,
                    redis_config.port
                );
                let client = redis_client::create_redis_client(redis_config).await?;
                Ok(Self::Redis(client))
            }
        }
    }
}

impl StorageInterface for Store {}

impl RoomInterface for Store {
    async fn insert_room(&self, room: models::Room) -> StorageResult<models::Room> {
        match self {
            Store::Memory(store) => store.insert_room(room).await,
            Store::Redis(store) => store.insert_room(room).await,
        }
    }

    async fn find_room(&self, room_id: &str) -> StorageResult<models::Room> {
        match self {
            Store::Memory(store) => store.find_room(room_id).await,
            Store::Redis(store) => store.find_room(room_id).await,
        }
    }

    async fn update_room(
        &self,
        room_id: &str,
        patch: models::RoomPatch,
    ) -> StorageResult<models::Room> {
        match self {
            Store::Memory(store) => store.update_room(room_id, patch).await,
            Store::Redis(store) => store.update_room(room_id, patch).await,
        }
    }

    async fn delete_room(&self, room_id: &str) -> StorageResult<()> {
        match self {
            Store::Memory(store) => store.delete_room(room_id).await,
            Store::Redis(store) => store.delete_room(room_id).await,
        }
    }
}

impl ChangeFeedInterface for Store {
    async fn subscribe(&self, room_id: &str, presence_key: &str) -> StorageResult<ChangeFeed> {
        match self {
            Store::Memory(store) => store.subscribe(room_id, presence_key).await,
            Store::Redis(store) => store.subscribe(room_id, presence_key).await,
        }
    }

    async fn leave(&self, room_id: &str, presence_key: &str) -> StorageResult<()> {
        match self {
            Store::Memory(store) => store.leave(room_id, presence_key).await,
            Store::Redis(store) => store.leave(room_id, presence_key).await,
        }
    }
}
