use tui_realm_stdlib::Paragraph;
use tuirealm::{
    props::{Alignment, Color, TextSpan},
    Component, Event, MockComponent,
};

use super::{rounded_borders, Msg, UserEvent};
use crate::app::client::types::{NoticeLevel, Notification};

/// Seconds a notification stays visible
const NOTICE_TTL: u8 = 4;

const IDLE_TEXT: &str = "Welcome to WordSprint";

/// Shows the latest notification, then falls back to the idle text
#[derive(MockComponent)]
pub struct BottomBar {
    component: Paragraph,
    ttl: u8,
}

fn notice_paragraph(text: &str, color: Color) -> Paragraph {
    Paragraph::default()
        .text(&[TextSpan::from(text).fg(color)])
        .alignment(Alignment::Center)
        .borders(rounded_borders(Color::Gray))
}

impl Default for BottomBar {
    fn default() -> Self {
        Self {
            component: notice_paragraph(IDLE_TEXT, Color::Reset),
            ttl: 0,
        }
    }
}

impl BottomBar {
    fn show(&mut self, notice: &Notification) {
        let color = match notice.level {
            NoticeLevel::Success => Color::Green,
            NoticeLevel::Info => Color::Cyan,
            NoticeLevel::Error => Color::Red,
        };
        self.component = notice_paragraph(&notice.message, color);
        self.ttl = NOTICE_TTL;
    }
}

impl Component<Msg, UserEvent> for BottomBar {
    fn on(&mut self, event: Event<UserEvent>) -> Option<Msg> {
        match event {
            Event::User(UserEvent::Notice(notice)) => {
                self.show(&notice);
                Some(Msg::BottomBarUpdate)
            }
            Event::Tick if self.ttl > 0 => {
                self.ttl -= 1;
                if self.ttl == 0 {
                    self.component = notice_paragraph(IDLE_TEXT, Color::Reset);
                }
                Some(Msg::BottomBarUpdate)
            }
            _ => None,
        }
    }
}
