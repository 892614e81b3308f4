pub mod bottom_bar;
pub mod help;
pub mod lobby;
pub mod room_screen;
pub mod roster;

use tuirealm::{
    props::{BorderType, Borders, Color},
    AttrValue, Attribute, MockComponent,
};

/// All the components must implement methods on these two types, so re export them
pub use super::network::types::UserEvent;
pub use super::types::Msg;

pub(crate) fn rounded_borders(color: Color) -> Borders {
    Borders::default().modifiers(BorderType::Rounded).color(color)
}

fn focus_color(focused: bool) -> Color {
    if focused {
        Color::Green
    } else {
        Color::Gray
    }
}

/// Move the cursor and the highlighted border to or away from a widget
pub(crate) fn set_focus(component: &mut dyn MockComponent, focused: bool) {
    component.attr(Attribute::Focus, AttrValue::Flag(focused));
    component.attr(
        Attribute::Borders,
        AttrValue::Borders(rounded_borders(focus_color(focused))),
    );
}

/// Text typed so far into an input field
pub(crate) fn input_value(input: &tui_realm_stdlib::Input) -> String {
    use tuirealm::{State, StateValue};

    match input.state() {
        State::One(StateValue::String(value)) => value,
        _ => String::new(),
    }
}
