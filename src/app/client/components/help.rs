use tui_realm_stdlib::Table;
use tuirealm::{
    props::{Alignment, TextSpan},
    Component, MockComponent,
};

use super::{rounded_borders, Msg, UserEvent};

#[derive(MockComponent)]
pub struct Help {
    component: Table,
}

impl Default for Help {
    fn default() -> Self {
        let component = Table::default()
            .title("Keys", Alignment::Center)
            .borders(rounded_borders(tuirealm::props::Color::Gray))
            .widths(&[45, 55])
            .table(vec![
                vec![TextSpan::from("Tab"), TextSpan::from("Next field")],
                vec![TextSpan::from("Enter"), TextSpan::from("Select / Submit")],
                vec![TextSpan::from("Ctrl+S"), TextSpan::from("Start game")],
                vec![TextSpan::from("Ctrl+L"), TextSpan::from("Leave room")],
                vec![TextSpan::from("Esc"), TextSpan::from("Quit")],
            ]);

        Self { component }
    }
}

impl Component<Msg, UserEvent> for Help {
    fn on(&mut self, _: tuirealm::Event<UserEvent>) -> Option<Msg> {
        None
    }
}
