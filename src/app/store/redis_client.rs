use fred::{
    interfaces::{ClientLike, KeysInterface, PubsubInterface, SetsInterface},
    types::SetOptions,
};
use tokio_stream::{wrappers::BroadcastStream, StreamExt};

use super::{
    interface::{change_feed::ChangeFeedInterface, room::RoomInterface},
    models, ChangeFeed, StorageInterface,
};
use crate::app::{errors, types::RedisConfig};

#[derive(Clone)]
pub struct RedisClient {
    client: fred::clients::RedisClient,
    config: fred::types::RedisConfig,
}

impl RedisClient {
    pub fn new(inner_client: fred::clients::RedisClient, config: fred::types::RedisConfig) -> Self {
        Self {
            client: inner_client,
            config,
        }
    }
}

type DbResult<T> = Result<T, errors::DbError>;

fn room_key(room_id: &str) -> String {
    format!("room:{room_id}")
}

/// Set of presence keys currently joined to the channel of a room
fn presence_key_set(room_id: &str) -> String {
    format!("presence:{room_id}")
}

fn room_channel(room_id: &str) -> String {
    format!("wordsprint:room:{room_id}")
}

impl RedisClient {
    pub async fn get_and_deserialize<
        K: Into<fred::types::RedisKey> + Send,
        V: serde::de::DeserializeOwned,
    >(
        &self,
        key: K,
    ) -> DbResult<V> {
        let get_command_result = self.client.get::<Option<String>, _>(key).await;

        match get_command_result {
            Ok(value_string_optional) => match value_string_optional {
                Some(value_string) => match serde_json::from_str::<V>(&value_string) {
                    Ok(value) => Ok(value),
                    Err(deserialize_error) => {
                        log::error!("{deserialize_error:?}");
                        Err(errors::DbError::ParsingFailure)
                    }
                },
                None => Err(errors::DbError::NotFound),
            },
            Err(error) => Err(errors::DbError::Others(error)),
        }
    }

    /// Set the key, only when it does not exist yet if `only_new` is passed
    pub async fn serialize_and_set<K: Into<fred::types::RedisKey> + Send, V: serde::Serialize>(
        &self,
        key: K,
        value: V,
        only_new: bool,
    ) -> DbResult<V> {
        let serialized_value = match serde_json::to_string(&value) {
            Ok(serialized_value) => serialized_value,
            Err(serialization_error) => {
                log::error!("serialization_error {serialization_error:?}");
                return Err(errors::DbError::ParsingFailure);
            }
        };

        let set_options = only_new.then_some(SetOptions::NX);

        match self
            .client
            .set::<Option<String>, _, _>(key, serialized_value, None, set_options, false)
            .await
        {
            Ok(Some(_)) => Ok(value),
            // NX refused to overwrite an existing key
            Ok(None) => Err(errors::DbError::DuplicateValue),
            Err(error) => Err(errors::DbError::Others(error)),
        }
    }

    async fn publish_event(&self, room_id: &str, event: &models::ChannelEvent) {
        let message = match serde_json::to_string(event) {
            Ok(message) => message,
            Err(serialization_error) => {
                log::error!("serialization_error {serialization_error:?}");
                return;
            }
        };

        // Subscribers that miss a change are not retried
        if let Err(publish_error) = self
            .client
            .publish::<i64, _, _>(room_channel(room_id), message)
            .await
        {
            log::error!("room_id={room_id} publish_error={publish_error:?}");
        }
    }

    /// A second connection, subscribed connections cannot issue regular commands
    async fn new_subscriber(&self) -> DbResult<fred::clients::RedisClient> {
        let subscriber = fred::clients::RedisClient::new(self.config.clone(), None, None, None);
        subscriber.connect();
        subscriber.wait_for_connect().await?;
        Ok(subscriber)
    }
}

pub async fn create_redis_client(redis_config: RedisConfig) -> DbResult<RedisClient> {
    let config = fred::types::RedisConfig {
        server: fred::types::ServerConfig::Centralized {
            server: fred::types::Server {
                host: redis_config.host.into(),
                port: redis_config.port,
            },
        },
        username: redis_config.username,
        password: redis_config.password,
        ..fred::types::RedisConfig::default()
    };

    let client = fred::clients::RedisClient::new(config.clone(), None, None, None);

    // connect to the server, returning a handle to a task that drives the connection
    client.connect();

    // wait for the client to connect
    client.wait_for_connect().await?;

    Ok(RedisClient::new(client, config))
}

impl StorageInterface for RedisClient {}

impl RoomInterface for RedisClient {
    async fn insert_room(&self, room: models::Room) -> DbResult<models::Room> {
        let room = self.serialize_and_set(room_key(&room.id), room, true).await?;
        self.publish_event(
            &room.id,
            &models::ChannelEvent::Change(models::RoomChange::inserted(room.clone())),
        )
        .await;
        Ok(room)
    }

    async fn find_room(&self, room_id: &str) -> DbResult<models::Room> {
        self.get_and_deserialize(room_key(room_id)).await
    }

    async fn update_room(
        &self,
        room_id: &str,
        patch: models::RoomPatch,
    ) -> DbResult<models::Room> {
        let old = self.find_room(room_id).await?;
        let mut new = old.clone();
        new.apply(&patch);

        let new = self.serialize_and_set(room_key(room_id), new, false).await?;
        self.publish_event(
            room_id,
            &models::ChannelEvent::Change(models::RoomChange::updated(old, new.clone())),
        )
        .await;
        Ok(new)
    }

    async fn delete_room(&self, room_id: &str) -> DbResult<()> {
        let old = self.find_room(room_id).await?;
        let deleted = self.client.del::<i64, _>(room_key(room_id)).await?;
        if deleted == 0 {
            return Err(errors::DbError::NotFound);
        }
        let _: i64 = self.client.del(presence_key_set(room_id)).await?;

        self.publish_event(
            room_id,
            &models::ChannelEvent::Change(models::RoomChange::deleted(old)),
        )
        .await;
        Ok(())
    }
}

/// Leaves presence and closes the subscriber connection once the feed is dropped
///
/// Runs on a spawned task, a runtime shutting down can cut it short. Awaiting
/// [`ChangeFeedInterface::leave`] first makes the leave reliable.
struct FeedGuard {
    publisher: RedisClient,
    subscriber: fred::clients::RedisClient,
    room_id: String,
    presence_key: String,
}

impl Drop for FeedGuard {
    fn drop(&mut self) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return;
        };

        let publisher = self.publisher.clone();
        let subscriber = self.subscriber.clone();
        let room_id = std::mem::take(&mut self.room_id);
        let key = std::mem::take(&mut self.presence_key);

        runtime.spawn(async move {
            if let Err(leave_error) = publisher.leave(&room_id, &key).await {
                log::warn!("room_id={room_id} key={key} leave_error={leave_error:?}");
            }
            if let Err(quit_error) = subscriber.quit().await {
                log::warn!("room_id={room_id} quit_error={quit_error:?}");
            }
        });
    }
}

impl ChangeFeedInterface for RedisClient {
    async fn subscribe(&self, room_id: &str, presence_key: &str) -> DbResult<ChangeFeed> {
        let channel = room_channel(room_id);
        let subscriber = self.new_subscriber().await?;

        // The receiver has to exist before the subscription so no message is missed
        let messages = subscriber.on_message();
        let _: () = subscriber.subscribe(channel.clone()).await?;

        // From here on dropping the guard undoes the join
        let guard = FeedGuard {
            publisher: self.clone(),
            subscriber,
            room_id: room_id.to_string(),
            presence_key: presence_key.to_string(),
        };

        let _: i64 = self
            .client
            .sadd(presence_key_set(room_id), presence_key)
            .await?;
        log::info!("presence_join room_id={room_id} key={presence_key}");

        self.publish_event(
            room_id,
            &models::ChannelEvent::Presence(models::PresenceEvent::Join {
                key: presence_key.to_string(),
            }),
        )
        .await;

        let mut keys: Vec<String> = self.client.smembers(presence_key_set(room_id)).await?;
        keys.sort();
        self.publish_event(
            room_id,
            &models::ChannelEvent::Presence(models::PresenceEvent::Sync { keys }),
        )
        .await;

        let events = BroadcastStream::new(messages).filter_map(move |received| {
            let guard = &guard;
            let message = match received {
                Ok(message) => message,
                Err(lagged) => {
                    log::warn!("room_id={} dropped events: {lagged:?}", guard.room_id);
                    return None;
                }
            };

            if &*message.channel != channel.as_str() {
                return None;
            }

            let payload = message.value.as_string()?;
            match serde_json::from_str::<models::ChannelEvent>(&payload) {
                Ok(event) => Some(event),
                Err(parse_error) => {
                    log::error!("room_id={} parse_error={parse_error:?}", guard.room_id);
                    Some(models::ChannelEvent::Status(models::ChannelStatus::Error(
                        "Received a malformed room update".to_string(),
                    )))
                }
            }
        });

        let subscribed = tokio_stream::iter([models::ChannelEvent::Status(
            models::ChannelStatus::Subscribed,
        )]);
        Ok(Box::pin(subscribed.chain(events)))
    }

    async fn leave(&self, room_id: &str, presence_key: &str) -> DbResult<()> {
        let removed: i64 = self
            .client
            .srem(presence_key_set(room_id), presence_key)
            .await?;
        if removed == 0 {
            return Ok(());
        }

        log::info!("presence_leave room_id={room_id} key={presence_key}");
        self.publish_event(
            room_id,
            &models::ChannelEvent::Presence(models::PresenceEvent::Leave {
                key: presence_key.to_string(),
            }),
        )
        .await;
        Ok(())
    }
}
