use tui_realm_stdlib::{Paragraph, Table};
use tuirealm::{
    command::{Cmd, CmdResult},
    props::{Alignment, Color, TextSpan},
    Component, Event, MockComponent,
};

use super::{rounded_borders, Msg, UserEvent};
use crate::app::{
    client::view::{RoomView, RosterRow},
    store::models::Room,
};

/// Players of the current room with their scores
#[derive(Default)]
pub struct Roster {
    room: Option<Room>,
    player_name: String,
}

fn roster_table(room_id: &str, rows: Vec<RosterRow>) -> Table {
    let rows = rows
        .into_iter()
        .map(|row| {
            let color = if row.is_you { Color::Yellow } else { Color::Reset };
            vec![
                TextSpan::new(row.label()).fg(color),
                TextSpan::new(row.score.to_string()),
            ]
        })
        .collect::<Vec<_>>();

    Table::default()
        .title(format!("Room {room_id}"), Alignment::Left)
        .borders(rounded_borders(Color::Gray))
        .headers(&["Player", "Score"])
        .widths(&[75, 25])
        .table(rows)
}

impl MockComponent for Roster {
    fn view(&mut self, frame: &mut tuirealm::Frame, area: tuirealm::tui::prelude::Rect) {
        match &self.room {
            Some(room) => {
                let view = RoomView::new(room, &self.player_name, 0, false);
                roster_table(&view.room_id, view.roster).view(frame, area)
            }
            None => Paragraph::default()
                .text(&[TextSpan::from("Join a room to see its players")])
                .alignment(Alignment::Center)
                .borders(rounded_borders(Color::Gray))
                .view(frame, area),
        }
    }

    fn query(&self, _: tuirealm::Attribute) -> Option<tuirealm::AttrValue> {
        None
    }

    fn attr(&mut self, _: tuirealm::Attribute, _: tuirealm::AttrValue) {}

    fn state(&self) -> tuirealm::State {
        tuirealm::State::None
    }

    fn perform(&mut self, _: Cmd) -> CmdResult {
        CmdResult::None
    }
}

impl Component<Msg, UserEvent> for Roster {
    fn on(&mut self, event: Event<UserEvent>) -> Option<Msg> {
        match event {
            Event::User(UserEvent::RoomEntered { room, player_name }) => {
                self.room = Some(room);
                self.player_name = player_name;
                Some(Msg::ReDraw)
            }
            Event::User(UserEvent::RoomUpdated(room)) => {
                self.room = Some(room);
                Some(Msg::ReDraw)
            }
            Event::User(UserEvent::RoomClosed | UserEvent::LeftRoom) => {
                self.room = None;
                Some(Msg::ReDraw)
            }
            _ => None,
        }
    }
}
