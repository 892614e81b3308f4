//! What the room screen shows, computed from the snapshot alone

use crate::app::store::models::{Room, RoomStatus};

/// Render seconds as `m:ss`
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterRow {
    pub name: String,
    pub score: u32,
    pub is_host: bool,
    pub is_you: bool,
}

impl RosterRow {
    pub fn label(&self) -> String {
        let mut label = self.name.clone();
        if self.is_host {
            label.push_str(" [host]");
        }
        if self.is_you {
            label.push_str(" (you)");
        }
        label
    }
}

/// The controls and text visible on the room screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomView {
    pub room_id: String,
    pub status: RoomStatus,
    pub letter: Option<char>,
    pub timer: String,
    pub roster: Vec<RosterRow>,
    pub show_start: bool,
    pub show_answers: bool,
    pub show_celebration: bool,
}

impl RoomView {
    pub fn new(room: &Room, player_name: &str, time_left: u32, celebrating: bool) -> Self {
        let roster = room
            .players
            .iter()
            .map(|player| RosterRow {
                name: player.name.clone(),
                score: player.score,
                is_host: room.is_host(&player.name),
                is_you: player.name == player_name,
            })
            .collect();

        let playing = room.status == RoomStatus::Playing;

        Self {
            room_id: room.id.clone(),
            status: room.status,
            letter: room.current_letter.filter(|_| playing),
            timer: format_time(time_left),
            roster,
            show_start: room.is_host(player_name) && room.status == RoomStatus::Waiting,
            show_answers: playing,
            show_celebration: celebrating,
        }
    }

    pub fn headline(&self) -> String {
        match (self.status, self.letter) {
            (RoomStatus::Playing, Some(letter)) => {
                format!("Letter: {letter}    Time left: {}", self.timer)
            }
            (RoomStatus::Playing, None) => format!("Time left: {}", self.timer),
            (RoomStatus::Waiting, _) if self.show_start => {
                "Waiting for players, press Ctrl+S to start".to_string()
            }
            (RoomStatus::Waiting, _) => "Waiting for the host to start the game".to_string(),
            (RoomStatus::Finished, _) => "Game finished!".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::store::models::Player;

    fn room() -> Room {
        let mut room = Room::new("abc123".to_string(), "Ada".to_string());
        room.players.push(Player {
            name: "Grace".to_string(),
            score: 8,
        });
        room
    }

    #[test]
    fn time_is_minutes_and_padded_seconds() {
        assert_eq!(format_time(120), "2:00");
        assert_eq!(format_time(65), "1:05");
        assert_eq!(format_time(9), "0:09");
        assert_eq!(format_time(0), "0:00");
    }

    #[test]
    fn start_is_for_the_waiting_host_only() {
        let waiting = room();
        assert!(RoomView::new(&waiting, "Ada", 120, false).show_start);
        assert!(!RoomView::new(&waiting, "Grace", 120, false).show_start);

        let mut playing = room();
        playing.status = RoomStatus::Playing;
        assert!(!RoomView::new(&playing, "Ada", 120, false).show_start);
    }

    #[test]
    fn answers_and_letter_show_while_playing() {
        let mut playing = room();
        playing.status = RoomStatus::Playing;
        playing.current_letter = Some('R');

        let view = RoomView::new(&playing, "Grace", 61, false);
        assert!(view.show_answers);
        assert_eq!(view.letter, Some('R'));
        assert_eq!(view.headline(), "Letter: R    Time left: 1:01");

        playing.status = RoomStatus::Finished;
        let view = RoomView::new(&playing, "Grace", 0, true);
        assert!(!view.show_answers);
        assert_eq!(view.letter, None);
        assert!(view.show_celebration);
    }

    #[test]
    fn roster_marks_host_and_self() {
        let view = RoomView::new(&room(), "Grace", 120, false);

        assert_eq!(view.roster[0].label(), "Ada [host]");
        assert_eq!(view.roster[1].label(), "Grace (you)");
        assert_eq!(view.roster[1].score, 8);
    }
}
