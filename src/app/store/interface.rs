pub mod change_feed;
pub mod room;

pub trait StorageInterface:
    room::RoomInterface + change_feed::ChangeFeedInterface + Clone + Send + Sync + 'static
{
}
