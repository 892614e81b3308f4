use crate::app::types;

#[derive(serde::Deserialize, serde::Serialize, Clone, Debug, PartialEq, Eq, PartialOrd)]
pub struct Player {
    pub name: String,
    pub score: u32,
}

impl Player {
    pub fn new(name: String) -> Self {
        Self { name, score: 0 }
    }
}

#[derive(
    serde::Deserialize, serde::Serialize, Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd,
)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    #[default]
    Waiting,
    Playing,
    Finished,
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoomStatus::Waiting => write!(f, "waiting"),
            RoomStatus::Playing => write!(f, "playing"),
            RoomStatus::Finished => write!(f, "finished"),
        }
    }
}

fn first_round() -> u32 {
    1
}

/// One row of the rooms table
#[derive(serde::Deserialize, serde::Serialize, Clone, Debug, PartialEq, Eq, PartialOrd)]
pub struct Room {
    pub id: String,
    pub host: String,
    pub players: Vec<Player>,
    #[serde(default)]
    pub status: RoomStatus,
    #[serde(default)]
    pub current_letter: Option<char>,
    #[serde(default = "first_round")]
    pub current_round: u32,
}

impl Room {
    /// A fresh room in the waiting state, with the creator as its only player and host
    pub fn new(id: String, host: String) -> Self {
        Self {
            id,
            players: vec![Player::new(host.clone())],
            host,
            status: RoomStatus::Waiting,
            current_letter: None,
            current_round: first_round(),
        }
    }

    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|player| player.name == name)
    }

    pub fn is_host(&self, name: &str) -> bool {
        self.host == name
    }

    pub fn can_start(&self) -> bool {
        self.players.len() >= types::MIN_PLAYERS_TO_START
    }

    /// Overwrite the fields present in the patch
    pub fn apply(&mut self, patch: &RoomPatch) {
        if let Some(host) = &patch.host {
            self.host.clone_from(host);
        }
        if let Some(players) = &patch.players {
            self.players.clone_from(players);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(current_letter) = patch.current_letter {
            self.current_letter = current_letter;
        }
        if let Some(current_round) = patch.current_round {
            self.current_round = current_round;
        }
    }
}

/// A partial update of a room row; `None` leaves the field untouched
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoomPatch {
    pub host: Option<String>,
    pub players: Option<Vec<Player>>,
    pub status: Option<RoomStatus>,
    /// `Some(None)` clears the letter
    pub current_letter: Option<Option<char>>,
    pub current_round: Option<u32>,
}

impl RoomPatch {
    pub fn players(players: Vec<Player>) -> Self {
        Self {
            players: Some(players),
            ..Self::default()
        }
    }

    pub fn status(status: RoomStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn with_host(mut self, host: String) -> Self {
        self.host = Some(host);
        self
    }

    pub fn with_letter(mut self, letter: Option<char>) -> Self {
        self.current_letter = Some(letter);
        self
    }

    pub fn with_round(mut self, round: u32) -> Self {
        self.current_round = Some(round);
        self
    }

    pub fn with_status(mut self, status: RoomStatus) -> Self {
        self.status = Some(status);
        self
    }
}

#[derive(serde::Deserialize, serde::Serialize, Copy, Clone, Debug, PartialEq, Eq, PartialOrd)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// A row level change, with the row image before and after the write
#[derive(serde::Deserialize, serde::Serialize, Clone, Debug, PartialEq, Eq, PartialOrd)]
pub struct RoomChange {
    pub kind: ChangeKind,
    pub old: Option<Room>,
    pub new: Option<Room>,
}

impl RoomChange {
    pub fn inserted(room: Room) -> Self {
        Self {
            kind: ChangeKind::Insert,
            old: None,
            new: Some(room),
        }
    }

    pub fn updated(old: Room, new: Room) -> Self {
        Self {
            kind: ChangeKind::Update,
            old: Some(old),
            new: Some(new),
        }
    }

    pub fn deleted(old: Room) -> Self {
        Self {
            kind: ChangeKind::Delete,
            old: Some(old),
            new: None,
        }
    }
}

#[derive(serde::Deserialize, serde::Serialize, Clone, Debug, PartialEq, Eq, PartialOrd)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum PresenceEvent {
    Join { key: String },
    Leave { key: String },
    Sync { keys: Vec<String> },
}

#[derive(serde::Deserialize, serde::Serialize, Clone, Debug, PartialEq, Eq, PartialOrd)]
#[serde(rename_all = "lowercase")]
pub enum ChannelStatus {
    Subscribed,
    Error(String),
    Closed,
}

/// Everything that can arrive on a room channel
#[derive(serde::Deserialize, serde::Serialize, Clone, Debug, PartialEq, Eq, PartialOrd)]
#[serde(tag = "type", content = "payload", rename_all = "lowercase")]
pub enum ChannelEvent {
    Status(ChannelStatus),
    Change(RoomChange),
    Presence(PresenceEvent),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_json_matches_the_table_layout() {
        let mut room = Room::new("abc123".to_string(), "Ada".to_string());
        room.status = RoomStatus::Playing;
        room.current_letter = Some('Q');

        let json = serde_json::to_value(&room).unwrap();
        assert_eq!(json["status"], "playing");
        assert_eq!(json["current_letter"], "Q");
        assert_eq!(json["current_round"], 1);
        assert_eq!(json["players"][0]["score"], 0);
    }

    #[test]
    fn missing_optional_columns_take_defaults() {
        let room: Room = serde_json::from_str(
            r#"{"id":"abc123","host":"Ada","players":[{"name":"Ada","score":0}]}"#,
        )
        .unwrap();

        assert_eq!(room.status, RoomStatus::Waiting);
        assert_eq!(room.current_letter, None);
        assert_eq!(room.current_round, 1);
    }

    #[test]
    fn patch_only_touches_named_fields() {
        let mut room = Room::new("abc123".to_string(), "Ada".to_string());
        room.current_letter = Some('K');

        room.apply(&RoomPatch::status(RoomStatus::Finished));
        assert_eq!(room.status, RoomStatus::Finished);
        assert_eq!(room.current_letter, Some('K'));
        assert_eq!(room.host, "Ada");

        room.apply(&RoomPatch::default().with_letter(None).with_round(1));
        assert_eq!(room.current_letter, None);
    }
}
