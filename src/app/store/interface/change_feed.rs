use std::future::Future;

use crate::app::store::{ChangeFeed, StorageResult};

/// Push based notifications for a single room
pub trait ChangeFeedInterface {
    /// Join the channel of a room, announcing `presence_key` to the other members
    ///
    /// The first event of the feed is always a connection status event
    fn subscribe(
        &self,
        room_id: &str,
        presence_key: &str,
    ) -> impl Future<Output = StorageResult<ChangeFeed>> + Send;

    /// Drop `presence_key` from the room and announce it, a key that already left is a no-op
    ///
    /// Dropping the feed leaves as well, this is the variant that can be awaited
    fn leave(
        &self,
        room_id: &str,
        presence_key: &str,
    ) -> impl Future<Output = StorageResult<()>> + Send;
}
