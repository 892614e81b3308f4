use tui_realm_stdlib::{Input, Paragraph};
use tuirealm::{
    command::{Cmd, CmdResult, Direction},
    event::{Key, KeyEvent, KeyModifiers},
    props::{Alignment, Color, InputType, TextSpan},
    tui::layout as tui_layout,
    AttrValue, Attribute, Component, Event, MockComponent, State,
};

use super::{input_value, rounded_borders, set_focus, Msg, UserEvent};
use crate::app::client::{
    actions::{Answers, Category},
    types::{AppStateUpdate, RoomMessage, RoomState},
    view::RoomView,
};

/// The room a player is in: status, timer and the answer draft
pub struct RoomScreen {
    state: RoomState,
    draft: Vec<Input>,
    selected: usize,
    focused: bool,
}

fn answer_input(category: Category) -> Input {
    Input::default()
        .title(category.label(), Alignment::Left)
        .input_type(InputType::Text)
        .borders(rounded_borders(Color::Gray))
}

fn blank_draft() -> Vec<Input> {
    Category::ALL.into_iter().map(answer_input).collect()
}

impl Default for RoomScreen {
    fn default() -> Self {
        Self {
            state: RoomState::default(),
            draft: blank_draft(),
            selected: 0,
            focused: false,
        }
    }
}

impl RoomScreen {
    fn room_view(&self) -> Option<RoomView> {
        self.state.room.as_ref().map(|room| {
            RoomView::new(
                room,
                &self.state.player_name,
                self.state.time_left,
                self.state.celebrating,
            )
        })
    }

    fn answers(&self) -> Answers {
        Category::ALL
            .into_iter()
            .zip(&self.draft)
            .fold(Answers::default(), |answers, (category, input)| {
                answers.with(category, input_value(input))
            })
    }

    fn clear_draft(&mut self) {
        self.draft = blank_draft();
        self.selected = 0;
        self.refresh_focus();
    }

    fn refresh_focus(&mut self) {
        let answering = self.focused && self.room_view().is_some_and(|view| view.show_answers);
        for (index, input) in self.draft.iter_mut().enumerate() {
            set_focus(input, answering && index == self.selected);
        }
    }

    fn select(&mut self, index: usize) -> Option<Msg> {
        self.selected = index % self.draft.len();
        self.refresh_focus();
        Some(Msg::Room(RoomMessage::DraftChange))
    }

    fn on_user_event(&mut self, event: UserEvent) -> Option<Msg> {
        match event {
            UserEvent::RoomEntered { room, player_name } => {
                let room_id = room.id.clone();
                self.state = RoomState {
                    room: Some(room),
                    player_name: player_name.clone(),
                    ..RoomState::default()
                };
                self.clear_draft();
                Some(Msg::StateUpdate(AppStateUpdate::RoomEntered {
                    room_id,
                    player_name,
                }))
            }
            UserEvent::RoomUpdated(room) => {
                self.state.room = Some(room);
                self.refresh_focus();
                Some(Msg::ReDraw)
            }
            UserEvent::TimeLeft(time_left) => {
                self.state.time_left = time_left;
                Some(Msg::ReDraw)
            }
            UserEvent::Celebration(celebrating) => {
                self.state.celebrating = celebrating;
                Some(Msg::ReDraw)
            }
            UserEvent::AnswersAccepted => {
                self.clear_draft();
                Some(Msg::ReDraw)
            }
            UserEvent::RoomClosed | UserEvent::LeftRoom => {
                self.state = RoomState::default();
                self.clear_draft();
                Some(Msg::StateUpdate(AppStateUpdate::RoomLeft))
            }
            UserEvent::StoredName(_) | UserEvent::Notice(_) => None,
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> Option<Msg> {
        let view = self.room_view()?;

        let cmd = match key {
            KeyEvent { code: Key::Esc, .. } => return Some(Msg::AppClose),
            KeyEvent {
                code: Key::Char('l'),
                modifiers: KeyModifiers::CONTROL,
            } => return Some(Msg::Room(RoomMessage::LeaveRoom)),
            KeyEvent {
                code: Key::Char('s'),
                modifiers: KeyModifiers::CONTROL,
            } if view.show_start => return Some(Msg::Room(RoomMessage::StartGame)),
            _ if !view.show_answers => return None,
            KeyEvent {
                code: Key::Tab | Key::Down,
                ..
            } => return self.select(self.selected + 1),
            KeyEvent {
                code: Key::BackTab | Key::Up,
                ..
            } => return self.select(self.selected + self.draft.len() - 1),
            KeyEvent {
                code: Key::Enter, ..
            } => return Some(Msg::Room(RoomMessage::SubmitAnswers(self.answers()))),
            KeyEvent {
                code: Key::Left, ..
            } => Cmd::Move(Direction::Left),
            KeyEvent {
                code: Key::Right, ..
            } => Cmd::Move(Direction::Right),
            KeyEvent {
                code: Key::Backspace,
                ..
            } => Cmd::Delete,
            KeyEvent {
                code: Key::Delete, ..
            } => Cmd::Cancel,
            KeyEvent {
                code: Key::Char(character),
                modifiers,
            } if !modifiers.contains(KeyModifiers::CONTROL) => Cmd::Type(character),
            _ => return None,
        };

        match self.draft.get_mut(self.selected)?.perform(cmd) {
            CmdResult::Changed(_) => Some(Msg::Room(RoomMessage::DraftChange)),
            _ => None,
        }
    }
}

impl MockComponent for RoomScreen {
    fn view(&mut self, frame: &mut tuirealm::Frame, area: tuirealm::tui::prelude::Rect) {
        let Some(view) = self.room_view() else {
            Paragraph::default()
                .text(&[TextSpan::from("You are not in a room")])
                .alignment(Alignment::Center)
                .borders(rounded_borders(Color::Gray))
                .view(frame, area);
            return;
        };

        let mut constraints = vec![tui_layout::Constraint::Length(3)];
        if view.show_celebration {
            constraints.push(tui_layout::Constraint::Length(3));
        }
        if view.show_answers {
            constraints.extend(self.draft.iter().map(|_| tui_layout::Constraint::Length(3)));
        }
        constraints.push(tui_layout::Constraint::Min(1));

        let chunks = tui_layout::Layout::default()
            .direction(tui_layout::Direction::Vertical)
            .margin(1)
            .constraints(constraints)
            .split(area);
        let mut chunks = chunks.iter().copied();

        if let Some(chunk) = chunks.next() {
            Paragraph::default()
                .title(format!("Room {}", view.room_id), Alignment::Left)
                .text(&[TextSpan::new(view.headline()).bold()])
                .borders(rounded_borders(Color::Gray))
                .view(frame, chunk);
        }

        if view.show_celebration {
            if let Some(chunk) = chunks.next() {
                Paragraph::default()
                    .text(&[TextSpan::from("Round over! Well played everyone")
                        .fg(Color::Yellow)
                        .bold()])
                    .alignment(Alignment::Center)
                    .borders(rounded_borders(Color::Yellow))
                    .view(frame, chunk);
            }
        }

        if view.show_answers {
            for input in self.draft.iter_mut() {
                if let Some(chunk) = chunks.next() {
                    input.view(frame, chunk);
                }
            }
        }

        if let Some(chunk) = chunks.next() {
            let mut controls = vec![];
            if view.show_start {
                controls.push("Ctrl+S start game");
            }
            if view.show_answers {
                controls.push("Tab next category");
                controls.push("Enter submit answers");
            }
            controls.push("Ctrl+L leave room");

            Paragraph::default()
                .text(&[TextSpan::new(controls.join("  |  ")).fg(Color::Gray)])
                .alignment(Alignment::Center)
                .view(frame, chunk);
        }
    }

    fn query(&self, attr: Attribute) -> Option<AttrValue> {
        match attr {
            Attribute::Focus => Some(AttrValue::Flag(self.focused)),
            _ => None,
        }
    }

    fn attr(&mut self, attr: Attribute, value: AttrValue) {
        if let (Attribute::Focus, AttrValue::Flag(focused)) = (attr, value) {
            self.focused = focused;
            self.refresh_focus();
        }
    }

    fn state(&self) -> State {
        State::None
    }

    fn perform(&mut self, _: Cmd) -> CmdResult {
        CmdResult::None
    }
}

impl Component<Msg, UserEvent> for RoomScreen {
    fn on(&mut self, event: Event<UserEvent>) -> Option<Msg> {
        match event {
            Event::User(user_event) => self.on_user_event(user_event),
            Event::Keyboard(key) if self.focused => self.on_key(key),
            _ => None,
        }
    }
}
