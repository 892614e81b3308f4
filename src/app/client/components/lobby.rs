use tui_realm_stdlib::{Input, Paragraph, Radio};
use tuirealm::{
    command::{Cmd, CmdResult, Direction},
    event::{Key, KeyEvent, KeyModifiers},
    props::{Alignment, Color, InputType, TextSpan},
    tui::layout as tui_layout,
    AttrValue, Attribute, Component, Event, MockComponent, State, StateValue,
};

use super::{input_value, rounded_borders, set_focus, Msg, UserEvent};
use crate::app::{
    client::types::{AppStateUpdate, LobbyMessage},
    types::ROOM_ID_LENGTH,
};

const MAX_NAME_LENGTH: usize = 24;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum LobbyField {
    #[default]
    Name,
    RoomCode,
    Action,
}

impl LobbyField {
    fn next(self) -> Self {
        match self {
            LobbyField::Name => LobbyField::RoomCode,
            LobbyField::RoomCode => LobbyField::Action,
            LobbyField::Action => LobbyField::Name,
        }
    }

    fn previous(self) -> Self {
        match self {
            LobbyField::Name => LobbyField::Action,
            LobbyField::RoomCode => LobbyField::Name,
            LobbyField::Action => LobbyField::RoomCode,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LobbyAction {
    CreateRoom,
    JoinRoom,
}

impl LobbyAction {
    const ALL: [LobbyAction; 2] = [LobbyAction::CreateRoom, LobbyAction::JoinRoom];

    fn from_choice(choice: usize) -> Self {
        match choice {
            1 => Self::JoinRoom,
            _ => Self::CreateRoom,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            LobbyAction::CreateRoom => "Create Room",
            LobbyAction::JoinRoom => "Join Room",
        }
    }

    fn helper_text(&self) -> &'static str {
        match self {
            LobbyAction::CreateRoom => "Create a private room and share its code with your friends",
            LobbyAction::JoinRoom => "Join a friend's room with the code they shared",
        }
    }
}

/// Name and room code entry, the first screen
pub struct Lobby {
    name_input: Input,
    code_input: Input,
    actions: Radio,
    helper_label: Paragraph,
    field: LobbyField,
    focused: bool,
}

fn name_input(value: &str) -> Input {
    Input::default()
        .title("Your name", Alignment::Left)
        .input_type(InputType::Text)
        .input_len(MAX_NAME_LENGTH)
        .value(value)
}

fn code_input() -> Input {
    Input::default()
        .title("Room code (to join)", Alignment::Left)
        .input_type(InputType::Text)
        .input_len(ROOM_ID_LENGTH)
}

fn helper_label(action: LobbyAction) -> Paragraph {
    Paragraph::default()
        .text(&[TextSpan::from(action.helper_text())])
        .wrap(true)
        .borders(rounded_borders(Color::Gray))
}

impl Default for Lobby {
    fn default() -> Self {
        let choices = LobbyAction::ALL
            .iter()
            .map(LobbyAction::label)
            .collect::<Vec<_>>();

        let actions = Radio::default()
            .choices(&choices)
            .title("What next?", Alignment::Left);

        let mut lobby = Self {
            name_input: name_input(""),
            code_input: code_input(),
            actions,
            helper_label: helper_label(LobbyAction::CreateRoom),
            field: LobbyField::default(),
            focused: false,
        };
        lobby.refresh_focus();
        lobby
    }
}

impl Lobby {
    fn action(&self) -> LobbyAction {
        match self.actions.state() {
            State::One(StateValue::Usize(choice)) => LobbyAction::from_choice(choice),
            _ => LobbyAction::CreateRoom,
        }
    }

    /// Highlight the field being edited
    fn refresh_focus(&mut self) {
        let current = self.focused.then_some(self.field);

        set_focus(&mut self.name_input, current == Some(LobbyField::Name));
        set_focus(&mut self.code_input, current == Some(LobbyField::RoomCode));
        set_focus(&mut self.actions, current == Some(LobbyField::Action));
    }

    fn move_to(&mut self, field: LobbyField) -> Option<Msg> {
        self.field = field;
        self.refresh_focus();
        Some(Msg::Lobby(LobbyMessage::FieldChange))
    }

    fn selection(&self) -> LobbyMessage {
        let player_name = input_value(&self.name_input);
        match self.action() {
            LobbyAction::CreateRoom => LobbyMessage::CreateRoom { player_name },
            LobbyAction::JoinRoom => LobbyMessage::JoinRoom {
                player_name,
                room_id: input_value(&self.code_input),
            },
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> Option<Msg> {
        let cmd = match key {
            KeyEvent { code: Key::Esc, .. } => return Some(Msg::AppClose),
            KeyEvent {
                code: Key::Tab | Key::Down,
                ..
            } => return self.move_to(self.field.next()),
            KeyEvent {
                code: Key::BackTab | Key::Up,
                ..
            } => return self.move_to(self.field.previous()),
            KeyEvent {
                code: Key::Left, ..
            } => Cmd::Move(Direction::Left),
            KeyEvent {
                code: Key::Right, ..
            } => Cmd::Move(Direction::Right),
            KeyEvent {
                code: Key::Enter, ..
            } => Cmd::Submit,
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
            _ => Cmd::None,
        };

        match self.field {
            LobbyField::Name | LobbyField::RoomCode => {
                let input = if self.field == LobbyField::Name {
                    &mut self.name_input
                } else {
                    &mut self.code_input
                };

                match input.perform(cmd) {
                    CmdResult::Changed(_) => Some(Msg::Lobby(LobbyMessage::FieldChange)),
                    // Enter in a text field moves on to the next one
                    CmdResult::Submit(_) => self.move_to(self.field.next()),
                    _ => None,
                }
            }
            LobbyField::Action => match self.actions.perform(cmd) {
                CmdResult::Changed(_) => {
                    self.helper_label = helper_label(self.action());
                    Some(Msg::Lobby(LobbyMessage::FieldChange))
                }
                CmdResult::Submit(_) => Some(Msg::Lobby(self.selection())),
                _ => None,
            },
        }
    }
}

impl MockComponent for Lobby {
    fn view(&mut self, frame: &mut tuirealm::Frame, area: tuirealm::tui::prelude::Rect) {
        let chunks = tui_layout::Layout::default()
            .direction(tui_layout::Direction::Vertical)
            .margin(1)
            .constraints([
                tui_layout::Constraint::Length(3),
                tui_layout::Constraint::Length(3),
                tui_layout::Constraint::Length(3),
                tui_layout::Constraint::Min(3),
            ])
            .split(area);

        self.name_input.view(frame, chunks[0]);
        self.code_input.view(frame, chunks[1]);
        self.actions.view(frame, chunks[2]);
        self.helper_label.view(frame, chunks[3]);
    }

    fn query(&self, attr: Attribute) -> Option<AttrValue> {
        match attr {
            Attribute::Focus => Some(AttrValue::Flag(self.focused)),
            attr => self.actions.query(attr),
        }
    }

    fn attr(&mut self, attr: Attribute, value: AttrValue) {
        match (attr, value) {
            (Attribute::Focus, AttrValue::Flag(focused)) => {
                self.focused = focused;
                self.refresh_focus();
            }
            (attr, value) => self.actions.attr(attr, value),
        }
    }

    fn state(&self) -> State {
        self.actions.state()
    }

    fn perform(&mut self, cmd: Cmd) -> CmdResult {
        self.actions.perform(cmd)
    }
}

impl Component<Msg, UserEvent> for Lobby {
    fn on(&mut self, event: Event<UserEvent>) -> Option<Msg> {
        match event {
            Event::User(UserEvent::StoredName(player_name)) => {
                self.name_input = name_input(&player_name);
                self.refresh_focus();
                Some(Msg::StateUpdate(AppStateUpdate::PlayerName(player_name)))
            }
            Event::Keyboard(key) if self.focused => self.on_key(key),
            _ => None,
        }
    }
}
