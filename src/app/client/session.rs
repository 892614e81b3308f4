//! One visit of a player to a room
//!
//! A session owns the local snapshot of the room, the room channel and the round timer.
//! Change events are folded in with [`reduce`]; writes go through [`actions`]. The snapshot
//! is only ever replaced by what the change feed delivers.

use std::time::Duration;

use tokio::time::{self, Instant};

use super::{
    actions::{self, Answers, LeaveOutcome},
    reducer::{reduce, Effect},
    subscription::RoomSubscription,
    timer::{RoundTimer, Tick},
    types::Notification,
};
use crate::app::{
    errors::{Operation, ResultExtApp, RoomError},
    store::{
        models::{ChannelEvent, ChannelStatus, PresenceEvent, Room},
        StorageInterface,
    },
    types,
};

/// What woke the session up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionSignal {
    Channel(ChannelEvent),
    Tick(Tick),
    CelebrationOver,
}

/// Changes the view has to reflect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    Room(Option<Room>),
    TimeLeft(u32),
    Celebration(bool),
    Notice(Notification),
}

pub struct RoomSession<S> {
    store: S,
    room_id: String,
    player_name: String,
    presence_key: String,
    room: Option<Room>,
    subscription: RoomSubscription,
    timer: RoundTimer,
    celebration_ends: Option<Instant>,
    live: bool,
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

impl<S> RoomSession<S> {
    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn presence_key(&self) -> &str {
        &self.presence_key
    }

    pub fn room(&self) -> Option<&Room> {
        self.room.as_ref()
    }

    pub fn time_left(&self) -> u32 {
        self.timer.remaining()
    }

    pub fn is_timer_running(&self) -> bool {
        self.timer.is_active()
    }

    pub fn is_celebrating(&self) -> bool {
        self.celebration_ends.is_some()
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_active()
    }

    /// Stop reacting to the room, safe to call any number of times
    pub fn close(&mut self) {
        if self.live {
            tracing::info!(room_id = %self.room_id, "Closing room session");
        }
        self.live = false;
        self.subscription.unsubscribe();
        self.timer.cancel();
        self.celebration_ends = None;
    }
}

impl<S: StorageInterface> RoomSession<S> {
    /// Fetch the room, then open its channel
    pub async fn enter(
        store: S,
        room_id: &str,
        player_name: &str,
        presence_key: &str,
    ) -> Result<Self, RoomError> {
        let room = store.find_room(room_id).await.to_not_found(
            RoomError::RoomNotFound {
                room_id: room_id.to_string(),
            },
            Operation::FetchRoom,
        )?;
        tracing::info!(room_id, player_name, status = %room.status, "Initial room data");

        let subscription = RoomSubscription::open(&store, room_id, presence_key)
            .await
            .during(Operation::Subscribe)?;

        let mut timer = RoundTimer::new(types::ROUND_DURATION_SECS);
        timer.sync(room.status);

        Ok(Self {
            store,
            room_id: room_id.to_string(),
            player_name: player_name.to_string(),
            presence_key: presence_key.to_string(),
            room: Some(room),
            subscription,
            timer,
            celebration_ends: None,
            live: true,
        })
    }

    /// Wait for the next channel event, timer tick or end of celebration
    pub async fn next_signal(&mut self) -> SessionSignal {
        tokio::select! {
            event = self.subscription.next() => SessionSignal::Channel(event),
            tick = self.timer.tick() => SessionSignal::Tick(tick),
            _ = wait_until(self.celebration_ends) => SessionSignal::CelebrationOver,
        }
    }

    pub async fn handle(&mut self, signal: SessionSignal) -> Vec<SessionUpdate> {
        match signal {
            SessionSignal::Channel(event) => self.apply(event),
            SessionSignal::Tick(tick) => self.on_tick(tick).await,
            SessionSignal::CelebrationOver => {
                self.celebration_ends = None;
                vec![SessionUpdate::Celebration(false)]
            }
        }
    }

    /// Fold one channel event into the session
    pub fn apply(&mut self, event: ChannelEvent) -> Vec<SessionUpdate> {
        if !self.live {
            tracing::debug!(room_id = %self.room_id, ?event, "Ignoring event for a closed session");
            return vec![];
        }

        match event {
            ChannelEvent::Status(ChannelStatus::Subscribed) => {
                tracing::info!(room_id = %self.room_id, "Successfully subscribed to room updates");
                vec![]
            }
            ChannelEvent::Status(ChannelStatus::Error(reason)) => {
                tracing::error!(room_id = %self.room_id, reason, "Channel subscription error");
                vec![SessionUpdate::Notice(Notification::error(
                    Operation::Subscribe.failure_message(),
                ))]
            }
            ChannelEvent::Status(ChannelStatus::Closed) => {
                vec![SessionUpdate::Notice(Notification::error(
                    Operation::Subscribe.failure_message(),
                ))]
            }
            ChannelEvent::Presence(presence) => {
                match presence {
                    PresenceEvent::Join { key } => tracing::info!(key, "Player joined"),
                    PresenceEvent::Leave { key } => tracing::info!(key, "Player left"),
                    PresenceEvent::Sync { keys } => tracing::info!(?keys, "Presence sync"),
                }
                vec![]
            }
            ChannelEvent::Change(change) => {
                tracing::info!(room_id = %self.room_id, kind = ?change.kind, "Received room update");
                let reduction = reduce(self.room.as_ref(), &change);
                self.room = reduction.room.clone();

                let mut updates = vec![SessionUpdate::Room(reduction.room)];
                for effect in reduction.effects {
                    match effect {
                        Effect::GameStarted => {
                            tracing::info!(room_id = %self.room_id, "Game started!");
                            self.timer.reset(types::ROUND_DURATION_SECS);
                            updates.push(SessionUpdate::TimeLeft(types::ROUND_DURATION_SECS));
                            updates.push(SessionUpdate::Notice(Notification::success(
                                "Game started!",
                            )));
                        }
                        Effect::Celebrate => {
                            tracing::info!(room_id = %self.room_id, "Game finished!");
                            self.celebration_ends = Some(
                                Instant::now() + Duration::from_secs(types::CELEBRATION_SECS),
                            );
                            updates.push(SessionUpdate::Celebration(true));
                        }
                        Effect::RoomClosed => {
                            updates.push(SessionUpdate::Notice(Notification::info(
                                "The room was closed",
                            )));
                        }
                    }
                }

                match &self.room {
                    Some(room) => self.timer.sync(room.status),
                    // Nothing left to watch
                    None => self.close(),
                }
                updates
            }
        }
    }

    async fn on_tick(&mut self, tick: Tick) -> Vec<SessionUpdate> {
        match tick {
            Tick::Remaining(time_left) => vec![SessionUpdate::TimeLeft(time_left)],
            Tick::Expired => {
                let mut updates = vec![SessionUpdate::TimeLeft(0)];
                if self.room.is_none() {
                    return updates;
                }

                // The finished row arrives through the change feed like any other write
                match actions::end_round(&self.store, &self.room_id).await {
                    Ok(_) => updates.push(SessionUpdate::Notice(Notification::success(
                        "Time's up! Game finished.",
                    ))),
                    Err(error) => {
                        tracing::error!(?error, "Error ending game");
                        updates.push(SessionUpdate::Notice(Notification::from(&error)));
                    }
                }
                updates
            }
        }
    }

    fn current(&self) -> Result<&Room, RoomError> {
        self.room.as_ref().ok_or_else(|| RoomError::RoomNotFound {
            room_id: self.room_id.clone(),
        })
    }

    pub async fn start_game(&self) -> Result<Room, RoomError> {
        let room = self.current()?;
        actions::start_game(&self.store, room, &self.player_name).await
    }

    pub async fn submit_answers(&self, answers: &Answers) -> Result<Room, RoomError> {
        let room = self.current()?;
        actions::submit_answers(&self.store, room, &self.player_name, answers).await
    }

    /// Close the session and wait until the other players were told about the leave
    pub async fn disconnect(&mut self) {
        self.subscription.close(&self.store).await;
        self.close();
    }

    /// Leave the room; the session is closed once the write went through
    pub async fn leave(&mut self) -> Result<LeaveOutcome, RoomError> {
        let room = self.current()?.clone();
        let outcome = actions::leave_room(&self.store, &room, &self.player_name).await?;
        tracing::info!(room_id = %self.room_id, "Successfully left room");
        self.disconnect().await;
        Ok(outcome)
    }

    /// Play on under a new display name
    ///
    /// The roster entry, and the host when it was this player, are rewritten first. The old
    /// channel is then left before a new one is opened, so the other players see this client
    /// leave and join again. A rejected name leaves the session as it was, any store failure
    /// closes it.
    pub async fn rename(&mut self, new_name: &str) -> Result<(), RoomError> {
        let room = self.current()?.clone();
        let renamed =
            match actions::rename_player(&self.store, &room, &self.player_name, new_name).await {
                Ok(_) => {
                    self.player_name = new_name.trim().to_string();
                    self.subscription.close(&self.store).await;
                    self.reopen().await
                }
                Err(error) => Err(error),
            };

        if let Err(error) = &renamed {
            if !error.is_validation() {
                tracing::error!(room_id = %self.room_id, ?error, "Lost the room while renaming");
                self.close();
            }
        }
        renamed
    }

    async fn reopen(&mut self) -> Result<(), RoomError> {
        let room = self.store.find_room(&self.room_id).await.to_not_found(
            RoomError::RoomNotFound {
                room_id: self.room_id.clone(),
            },
            Operation::FetchRoom,
        )?;
        self.subscription =
            RoomSubscription::open(&self.store, &self.room_id, &self.presence_key)
                .await
                .during(Operation::Subscribe)?;

        self.timer.sync(room.status);
        self.room = Some(room);
        Ok(())
    }
}

impl<S> Drop for RoomSession<S> {
    fn drop(&mut self) {
        self.close();
    }
}
