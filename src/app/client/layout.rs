/// Divide the screen real estate into various chunks, each with one specific purpose
// ┌──────────────────────────────────────────────────────────────────────────────┐
// │ ┌──────────────────┐ ┌─────────────────────────────────────────────────────┐ │
// │ │                  │ │                                                     │ │
// │ │      Roster      │ │                                                     │ │
// │ │                  │ │                                                     │ │
// │ │                  │ │              Lobby / Room screen                    │ │
// │ └──────────────────┘ │                                                     │ │
// │ ┌──────────────────┐ │                                                     │ │
// │ │       Help       │ │                                                     │ │
// │ └──────────────────┘ └─────────────────────────────────────────────────────┘ │
// │ ┌──────────────────────────────────────────────────────────────────────────┐ │
// │ │                              Bottom bar                                  │ │
// │ └──────────────────────────────────────────────────────────────────────────┘ │
// └──────────────────────────────────────────────────────────────────────────────┘
use tuirealm::tui::layout::{Constraint, Direction, Layout, Rect};

pub struct CustomLayout {
    pub action_area: Rect,
    pub roster: Rect,
    pub help: Rect,
    pub bottom_bar: Rect,
}

impl CustomLayout {
    pub fn new(main_screen_area: Rect) -> Self {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints(
                [
                    Constraint::Min(10),   // Action area
                    Constraint::Length(3), // Bottom bar
                ]
                .as_ref(),
            )
            .split(main_screen_area);

        let middle_parts = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
            .split(main_chunks[0]);

        let side_split = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(middle_parts[0]);

        Self {
            action_area: middle_parts[1],
            roster: side_split[0],
            help: side_split[1],
            bottom_bar: main_chunks[1],
        }
    }
}
