use std::{
    collections::VecDeque,
    ops::ControlFlow,
    sync::{Arc, Mutex},
};

pub mod types;

use tokio::sync::mpsc::UnboundedReceiver;
use tuirealm::listener::{ListenerResult, Poll};

use crate::app::{
    store::Store,
    types::{ClientConfig, LocalStorage},
    utils,
};

use super::{
    actions,
    session::{RoomSession, SessionSignal, SessionUpdate},
    types::Notification,
};
use types::{Request, UserEvent};

const NETWORK_MESSAGE_QUEUE_CAPACITY: usize = 10;

/// Runs every store operation away from the UI thread and queues the results as user events
#[derive(Clone)]
pub struct NetworkClient {
    messages: Arc<Mutex<VecDeque<UserEvent>>>,
}

impl Default for NetworkClient {
    fn default() -> Self {
        Self {
            messages: Arc::new(Mutex::new(VecDeque::with_capacity(
                NETWORK_MESSAGE_QUEUE_CAPACITY,
            ))),
        }
    }
}

/// Whatever the network loop woke up for
enum Step {
    Request(Option<Request>),
    Signal(SessionSignal),
}

/// Everything the requests of one client share
struct Context {
    store: Store,
    presence_key: String,
    local_storage: String,
    session: Option<RoomSession<Store>>,
}

impl NetworkClient {
    #[tokio::main]
    pub async fn start_network_client(
        &mut self,
        mut requests: UnboundedReceiver<Request>,
        config: ClientConfig,
        preferred_name: Option<String>,
    ) {
        let store = match Store::connect(&config.store).await {
            Ok(store) => store,
            Err(error) => {
                tracing::error!(?error, "Connection to the store failed");
                self.push_user_event(UserEvent::Notice(Notification::error(format!(
                    "Connection to the store failed: {error}"
                ))));
                return;
            }
        };

        // A returning player gets the name they used last time
        let stored_name = utils::read_local_storage::<LocalStorage>(&config.local_storage)
            .await
            .and_then(|local_storage| local_storage.player_name);
        let player_name = preferred_name
            .or(stored_name)
            .unwrap_or_else(utils::generate_name);
        self.push_user_event(UserEvent::StoredName(player_name));

        let mut context = Context {
            store,
            presence_key: utils::generate_time_ordered_id("client"),
            local_storage: config.local_storage,
            session: None,
        };

        loop {
            let step = match context.session.as_mut() {
                Some(session) => tokio::select! {
                    request = requests.recv() => Step::Request(request),
                    signal = session.next_signal() => Step::Signal(signal),
                },
                None => Step::Request(requests.recv().await),
            };

            match step {
                Step::Request(Some(request)) => {
                    if self.handle_request(request, &mut context).await.is_break() {
                        break;
                    }
                }
                Step::Request(None) => break,
                Step::Signal(signal) => self.handle_signal(signal, &mut context).await,
            }
        }

        // The runtime goes away with this function, the leave has to be out before that
        if let Some(mut session) = context.session.take() {
            session.disconnect().await;
        }
        tracing::info!("Network client stopped");
    }

    async fn handle_request(&self, request: Request, context: &mut Context) -> ControlFlow<()> {
        tracing::debug!(?request, "Handling request");
        match request {
            Request::Quit => return ControlFlow::Break(()),
            Request::CreateRoom { player_name } => {
                let player_name = player_name.trim();
                match actions::create_room(&context.store, player_name).await {
                    Ok(room) => {
                        self.remember_name(context, player_name).await;
                        self.enter_room(context, &room.id, player_name).await;
                    }
                    Err(error) => self.push_notice(Notification::from(&error)),
                }
            }
            Request::JoinRoom {
                player_name,
                room_id,
            } => {
                let player_name = player_name.trim();
                match actions::join_room(&context.store, player_name, &room_id).await {
                    Ok(room) => {
                        self.remember_name(context, player_name).await;
                        self.enter_room(context, &room.id, player_name).await;
                    }
                    Err(error) => self.push_notice(Notification::from(&error)),
                }
            }
            Request::StartGame => {
                let Some(session) = context.session.as_ref() else {
                    return ControlFlow::Continue(());
                };
                if let Err(error) = session.start_game().await {
                    self.push_notice(Notification::from(&error));
                }
            }
            Request::SubmitAnswers(answers) => {
                let Some(session) = context.session.as_ref() else {
                    return ControlFlow::Continue(());
                };
                match session.submit_answers(&answers).await {
                    Ok(_) => {
                        self.push_user_event(UserEvent::AnswersAccepted);
                        self.push_notice(Notification::success("Answers submitted!"));
                    }
                    Err(error) => self.push_notice(Notification::from(&error)),
                }
            }
            Request::LeaveRoom => {
                let Some(session) = context.session.as_mut() else {
                    return ControlFlow::Continue(());
                };
                match session.leave().await {
                    Ok(_) => {
                        context.session = None;
                        self.push_user_event(UserEvent::LeftRoom);
                    }
                    Err(error) => self.push_notice(Notification::from(&error)),
                }
            }
        }
        ControlFlow::Continue(())
    }

    async fn handle_signal(&self, signal: SessionSignal, context: &mut Context) {
        let Some(session) = context.session.as_mut() else {
            return;
        };

        for update in session.handle(signal).await {
            let event = match update {
                SessionUpdate::Room(Some(room)) => UserEvent::RoomUpdated(room),
                SessionUpdate::Room(None) => UserEvent::RoomClosed,
                SessionUpdate::TimeLeft(time_left) => UserEvent::TimeLeft(time_left),
                SessionUpdate::Celebration(active) => UserEvent::Celebration(active),
                SessionUpdate::Notice(notice) => UserEvent::Notice(notice),
            };
            self.push_user_event(event);
        }

        // Nothing left to watch once the row is gone
        if session.room().is_none() {
            context.session = None;
        }
    }

    async fn enter_room(&self, context: &mut Context, room_id: &str, player_name: &str) {
        // One channel per visit, the previous one is gone before the next opens
        if let Some(mut previous) = context.session.take() {
            previous.disconnect().await;
        }

        let entered = RoomSession::enter(
            context.store.clone(),
            room_id,
            player_name,
            &context.presence_key,
        )
        .await;

        match entered {
            Ok(session) => {
                if let Some(room) = session.room().cloned() {
                    self.push_user_event(UserEvent::RoomEntered {
                        room,
                        player_name: player_name.to_string(),
                    });
                    self.push_user_event(UserEvent::TimeLeft(session.time_left()));
                }
                context.session = Some(session);
            }
            Err(error) => self.push_notice(Notification::from(&error)),
        }
    }

    async fn remember_name(&self, context: &Context, player_name: &str) {
        let local_storage = LocalStorage::new(player_name.to_string());
        if let Err(error) = utils::write_local_storage(&context.local_storage, local_storage).await
        {
            tracing::warn!(?error, "Could not persist the player name");
        }
    }

    fn push_notice(&self, notice: Notification) {
        self.push_user_event(UserEvent::Notice(notice))
    }

    fn push_user_event(&self, event: UserEvent) {
        tracing::info!(push_user_event=?event);
        match self.messages.lock() {
            Ok(mut messages) => messages.push_back(event),
            Err(poisoned) => poisoned.into_inner().push_back(event),
        }
    }
}

impl Poll<UserEvent> for NetworkClient {
    fn poll(&mut self) -> ListenerResult<Option<tuirealm::Event<UserEvent>>> {
        let event = match self.messages.lock() {
            Ok(mut messages) => messages.pop_front(),
            Err(poisoned) => poisoned.into_inner().pop_front(),
        };
        Ok(event.map(tuirealm::Event::User))
    }
}
