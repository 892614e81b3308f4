use super::network::types::Request;
use super::types::{LobbyMessage, RoomMessage};

impl LobbyMessage {
    /// The store request behind a lobby message, if any
    pub fn into_request(self) -> Option<Request> {
        match self {
            LobbyMessage::FieldChange => None,
            LobbyMessage::CreateRoom { player_name } => Some(Request::CreateRoom { player_name }),
            LobbyMessage::JoinRoom {
                player_name,
                room_id,
            } => Some(Request::JoinRoom {
                player_name,
                room_id,
            }),
        }
    }
}

impl RoomMessage {
    pub fn into_request(self) -> Option<Request> {
        match self {
            RoomMessage::DraftChange => None,
            RoomMessage::StartGame => Some(Request::StartGame),
            RoomMessage::SubmitAnswers(answers) => Some(Request::SubmitAnswers(answers)),
            RoomMessage::LeaveRoom => Some(Request::LeaveRoom),
        }
    }
}
