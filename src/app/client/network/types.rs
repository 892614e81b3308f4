use crate::app::{client::actions::Answers, client::types::Notification, store::models::Room};

#[derive(Debug, PartialEq, Eq, Clone, PartialOrd)]
pub enum UserEvent {
    /// The display name to prefill, stored from an earlier run or freshly suggested
    StoredName(String),
    Notice(Notification),
    RoomEntered {
        room: Room,
        player_name: String,
    },
    RoomUpdated(Room),
    RoomClosed,
    TimeLeft(u32),
    Celebration(bool),
    AnswersAccepted,
    LeftRoom,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    CreateRoom { player_name: String },
    JoinRoom { player_name: String, room_id: String },
    StartGame,
    SubmitAnswers(Answers),
    LeaveRoom,
    Quit,
}
