use std::future::Future;

use crate::app::store::{models, StorageResult};

/// Row level access to the rooms table
///
/// Every write is an unconditional overwrite of the fields it names
pub trait RoomInterface {
    fn insert_room(
        &self,
        room: models::Room,
    ) -> impl Future<Output = StorageResult<models::Room>> + Send;

    fn find_room(&self, room_id: &str)
        -> impl Future<Output = StorageResult<models::Room>> + Send;

    /// Apply the patch to the stored row and return the new row
    fn update_room(
        &self,
        room_id: &str,
        patch: models::RoomPatch,
    ) -> impl Future<Output = StorageResult<models::Room>> + Send;

    fn delete_room(&self, room_id: &str) -> impl Future<Output = StorageResult<()>> + Send;
}
