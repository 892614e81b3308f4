use crate::app::store::models::{Room, RoomChange, RoomStatus};

/// Side effects requested by a change event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// A round just began, tell the player and restart the local clock
    GameStarted,
    /// The round just ended, show the celebration
    Celebrate,
    /// The row was deleted
    RoomClosed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reduction {
    pub room: Option<Room>,
    pub effects: Vec<Effect>,
}

/// Fold a change event into the local snapshot
///
/// The new row image always replaces the snapshot. The status before the write is read from
/// the old image when the feed sends one, otherwise from the previous snapshot.
pub fn reduce(previous: Option<&Room>, change: &RoomChange) -> Reduction {
    let Some(new) = change.new.as_ref() else {
        return Reduction {
            room: None,
            effects: vec![Effect::RoomClosed],
        };
    };

    let before = change
        .old
        .as_ref()
        .or(previous)
        .map(|room| room.status);

    let mut effects = vec![];
    if before != Some(RoomStatus::Playing) && new.status == RoomStatus::Playing {
        effects.push(Effect::GameStarted);
    } else if new.status == RoomStatus::Finished && before != Some(RoomStatus::Finished) {
        effects.push(Effect::Celebrate);
    }

    Reduction {
        room: Some(new.clone()),
        effects,
    }
}
