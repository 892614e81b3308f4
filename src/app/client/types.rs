use crate::app::{errors::RoomError, store::models::Room};

use super::actions::Answers;

// Let's define the messages handled by our app. NOTE: it must derive `PartialEq`
#[derive(Debug, PartialEq)]
pub enum Msg {
    AppClose,
    ReDraw,
    BottomBarUpdate,
    Lobby(LobbyMessage),
    Room(RoomMessage),
    StateUpdate(AppStateUpdate),
}

#[derive(Debug, PartialEq)]
pub enum LobbyMessage {
    /// Typing in one of the lobby fields
    FieldChange,
    CreateRoom { player_name: String },
    JoinRoom { player_name: String, room_id: String },
}

#[derive(Debug, PartialEq)]
pub enum RoomMessage {
    DraftChange,
    StartGame,
    SubmitAnswers(Answers),
    LeaveRoom,
}

// Let's define the component ids for our application
#[derive(Debug, Eq, PartialEq, Clone, Hash)]
pub enum Id {
    Lobby,
    RoomScreen,
    Roster,
    Help,
    BottomBar,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Lobby,
    Room,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// A transient message for the bottom bar
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd)]
pub struct Notification {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl From<&RoomError> for Notification {
    fn from(error: &RoomError) -> Self {
        Self::error(error.to_string())
    }
}

/// Updates to the app state that are triggered by network events
#[derive(Debug, PartialEq)]
pub enum AppStateUpdate {
    PlayerName(String),
    RoomEntered { room_id: String, player_name: String },
    RoomLeft,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub screen: Screen,
    pub player_name: Option<String>,
    pub room_id: Option<String>,
}

impl AppState {
    pub fn apply_update(self, update: AppStateUpdate) -> Self {
        match update {
            AppStateUpdate::PlayerName(player_name) => Self {
                player_name: Some(player_name),
                ..self
            },
            AppStateUpdate::RoomEntered {
                room_id,
                player_name,
            } => Self {
                screen: Screen::Room,
                player_name: Some(player_name),
                room_id: Some(room_id),
            },
            AppStateUpdate::RoomLeft => Self {
                screen: Screen::Lobby,
                room_id: None,
                ..self
            },
        }
    }
}

/// The room as the room screen last received it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomState {
    pub room: Option<Room>,
    pub player_name: String,
    pub time_left: u32,
    pub celebrating: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entering_and_leaving_switches_screens() {
        let state = AppState::default()
            .apply_update(AppStateUpdate::PlayerName("Ada".to_string()))
            .apply_update(AppStateUpdate::RoomEntered {
                room_id: "abc123".to_string(),
                player_name: "Ada".to_string(),
            });
        assert_eq!(state.screen, Screen::Room);
        assert_eq!(state.room_id.as_deref(), Some("abc123"));

        let state = state.apply_update(AppStateUpdate::RoomLeft);
        assert_eq!(state.screen, Screen::Lobby);
        assert_eq!(state.room_id, None);
        assert_eq!(state.player_name.as_deref(), Some("Ada"));
    }

    #[test]
    fn room_errors_become_error_notices() {
        let notice = Notification::from(&RoomError::NotEnoughPlayers);
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, "Need at least 2 players to start the game");
    }
}
