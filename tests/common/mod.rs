#![allow(dead_code)]

use std::time::Duration;

use wordsprint::app::{
    client::{
        actions,
        session::{RoomSession, SessionUpdate},
    },
    store::{models::Room, MemoryStore, StorageInterface},
};

/// Longer than a whole round, so only a stuck session trips it
const QUIET_AFTER: Duration = Duration::from_secs(600);

/// Feed signals into the session until one of its updates matches
pub async fn drive_until<S, F>(session: &mut RoomSession<S>, mut done: F) -> Vec<SessionUpdate>
where
    S: StorageInterface,
    F: FnMut(&SessionUpdate) -> bool,
{
    let mut seen = vec![];
    loop {
        let signal = tokio::time::timeout(QUIET_AFTER, session.next_signal())
            .await
            .expect("session went quiet");
        let updates = session.handle(signal).await;
        let finished = updates.iter().any(&mut done);
        seen.extend(updates);
        if finished {
            return seen;
        }
    }
}

/// Everything the session reports until nothing happens for a while
pub async fn drain<S: StorageInterface>(session: &mut RoomSession<S>) -> Vec<SessionUpdate> {
    let mut seen = vec![];
    while let Ok(signal) = tokio::time::timeout(QUIET_AFTER, session.next_signal()).await {
        seen.extend(session.handle(signal).await);
    }
    seen
}

pub fn is_room_update(update: &SessionUpdate) -> bool {
    matches!(update, SessionUpdate::Room(_))
}

pub fn notices(updates: &[SessionUpdate]) -> Vec<String> {
    updates
        .iter()
        .filter_map(|update| match update {
            SessionUpdate::Notice(notice) => Some(notice.message.clone()),
            _ => None,
        })
        .collect()
}

pub fn count<F: Fn(&SessionUpdate) -> bool>(updates: &[SessionUpdate], matches: F) -> usize {
    updates.iter().filter(|update| matches(update)).count()
}

/// Ada hosts, Grace joined; both sessions have seen the full roster
pub async fn room_of_two(
    store: &MemoryStore,
) -> (Room, RoomSession<MemoryStore>, RoomSession<MemoryStore>) {
    let room = actions::create_room(store, "Ada").await.unwrap();
    let mut ada = RoomSession::enter(store.clone(), &room.id, "Ada", "client_ada")
        .await
        .unwrap();

    actions::join_room(store, "Grace", &room.id).await.unwrap();
    drive_until(&mut ada, |update| {
        matches!(update, SessionUpdate::Room(Some(room)) if room.players.len() == 2)
    })
    .await;

    let grace = RoomSession::enter(store.clone(), &room.id, "Grace", "client_grace")
        .await
        .unwrap();
    assert_eq!(grace.room().map(|room| room.players.len()), Some(2));

    (room, ada, grace)
}

/// Host starts the round and both sessions observe it
pub async fn start_round(ada: &mut RoomSession<MemoryStore>, grace: &mut RoomSession<MemoryStore>) {
    ada.start_game().await.unwrap();
    for session in [ada, grace] {
        drive_until(session, |update| {
            matches!(update, SessionUpdate::Room(Some(room)) if room.current_letter.is_some())
        })
        .await;
    }
}
