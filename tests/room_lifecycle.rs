mod common;

use common::{drive_until, is_room_update, notices, room_of_two, start_round};
use wordsprint::app::{
    client::{
        actions::{self, Answers, Category, LeaveOutcome},
        session::{RoomSession, SessionUpdate},
    },
    errors::RoomError,
    store::{
        interface::room::RoomInterface,
        models::{RoomPatch, RoomStatus},
        MemoryStore,
    },
};

fn full_answers() -> Answers {
    Answers::default()
        .with(Category::Animal, "Marmot")
        .with(Category::Country, "Malta")
        .with(Category::Food, "Mango")
        .with(Category::Name, "Mia")
}

#[tokio::test(start_paused = true)]
async fn entering_a_missing_room_fails() {
    let store = MemoryStore::default();

    let entered = RoomSession::enter(store.clone(), "nope00", "Ada", "client_ada").await;

    assert!(matches!(entered, Err(RoomError::RoomNotFound { .. })));
    assert!(store.present("nope00").is_empty());
}

#[tokio::test(start_paused = true)]
async fn starting_resets_every_clock() {
    let store = MemoryStore::default();
    let (room, mut ada, mut grace) = room_of_two(&store).await;
    assert_eq!(room.status, RoomStatus::Waiting);

    ada.start_game().await.unwrap();

    for session in [&mut ada, &mut grace] {
        let updates = drive_until(&mut *session, |update| {
            matches!(update, SessionUpdate::Room(Some(room)) if room.status == RoomStatus::Playing)
        })
        .await;

        assert!(updates.contains(&SessionUpdate::TimeLeft(120)));
        assert_eq!(notices(&updates), vec!["Game started!"]);
        assert!(session.is_timer_running());

        let letter = session.room().and_then(|room| room.current_letter).unwrap();
        assert!(letter.is_ascii_uppercase());
    }
}

#[tokio::test(start_paused = true)]
async fn only_the_host_may_start() {
    let store = MemoryStore::default();
    let (room, _ada, grace) = room_of_two(&store).await;

    assert!(matches!(grace.start_game().await, Err(RoomError::NotHost)));
    assert_eq!(
        store.find_room(&room.id).await.unwrap().status,
        RoomStatus::Waiting
    );
}

#[tokio::test(start_paused = true)]
async fn submitted_scores_reach_other_players() {
    let store = MemoryStore::default();
    let (room, mut ada, mut grace) = room_of_two(&store).await;
    start_round(&mut ada, &mut grace).await;

    grace.submit_answers(&full_answers()).await.unwrap();

    drive_until(&mut ada, |update| {
        matches!(update, SessionUpdate::Room(Some(room)) if room.players[1].score == 4)
    })
    .await;

    let seen = ada.room().unwrap();
    assert_eq!(seen.players[0].score, 0);
    assert_eq!(seen.status, RoomStatus::Playing);
    assert_eq!(seen, &store.find_room(&room.id).await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn blank_answers_never_write() {
    let store = MemoryStore::default();
    let (room, mut ada, mut grace) = room_of_two(&store).await;
    start_round(&mut ada, &mut grace).await;

    let before = store.find_room(&room.id).await.unwrap();
    let partial = full_answers().with(Category::Food, "   ");

    assert!(matches!(
        grace.submit_answers(&partial).await,
        Err(RoomError::BlankAnswers)
    ));
    assert_eq!(store.find_room(&room.id).await.unwrap().players, before.players);
}

#[tokio::test(start_paused = true)]
async fn host_leaving_hands_over_and_resets() {
    let store = MemoryStore::default();
    let (room, mut ada, mut grace) = room_of_two(&store).await;
    start_round(&mut ada, &mut grace).await;

    let outcome = ada.leave().await.unwrap();
    assert!(matches!(outcome, LeaveOutcome::Updated(_)));
    assert!(!ada.is_live());
    assert!(!ada.is_subscribed());

    drive_until(&mut grace, |update| {
        matches!(update, SessionUpdate::Room(Some(room)) if room.players.len() == 1)
    })
    .await;

    let seen = grace.room().unwrap();
    assert_eq!(seen.host, "Grace");
    assert_eq!(seen.status, RoomStatus::Waiting);
    assert_eq!(seen.current_letter, None);
    assert_eq!(seen.current_round, 1);
    assert!(!grace.is_timer_running());
    assert_eq!(store.present(&room.id), vec!["client_grace"]);
}

#[tokio::test(start_paused = true)]
async fn guest_leaving_keeps_the_round_going() {
    let store = MemoryStore::default();
    let (room, mut ada, mut grace) = room_of_two(&store).await;
    start_round(&mut ada, &mut grace).await;
    let letter = ada.room().and_then(|room| room.current_letter);

    grace.leave().await.unwrap();

    drive_until(&mut ada, |update| {
        matches!(update, SessionUpdate::Room(Some(room)) if room.players.len() == 1)
    })
    .await;

    let seen = ada.room().unwrap();
    assert_eq!(seen.host, "Ada");
    assert_eq!(seen.status, RoomStatus::Playing);
    assert_eq!(seen.current_letter, letter);
    assert!(ada.is_timer_running());
    assert_eq!(store.find_room(&room.id).await.unwrap(), *seen);
}

#[tokio::test(start_paused = true)]
async fn last_player_out_deletes_the_room() {
    let store = MemoryStore::default();
    let room = actions::create_room(&store, "Ada").await.unwrap();
    let mut ada = RoomSession::enter(store.clone(), &room.id, "Ada", "client_ada")
        .await
        .unwrap();

    assert_eq!(ada.leave().await.unwrap(), LeaveOutcome::Deleted);

    assert_eq!(store.room_count(), 0);
    assert!(store.find_room(&room.id).await.unwrap_err().is_not_found());
    assert!(matches!(
        actions::join_room(&store, "Grace", &room.id).await,
        Err(RoomError::RoomNotFound { .. })
    ));
    assert!(store.present(&room.id).is_empty());
}

#[tokio::test(start_paused = true)]
async fn a_deleted_row_clears_the_snapshot() {
    let store = MemoryStore::default();
    let (room, mut ada, _grace) = room_of_two(&store).await;

    store.delete_room(&room.id).await.unwrap();

    let updates = drive_until(&mut ada, is_room_update).await;
    assert!(updates.contains(&SessionUpdate::Room(None)));
    assert_eq!(notices(&updates), vec!["The room was closed"]);
    assert_eq!(ada.room(), None);
    assert!(!ada.is_live());
    assert!(!ada.is_subscribed());
    assert!(matches!(
        ada.start_game().await,
        Err(RoomError::RoomNotFound { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn entering_a_running_round_starts_the_clock() {
    let store = MemoryStore::default();
    let room = actions::create_room(&store, "Ada").await.unwrap();
    store
        .update_room(
            &room.id,
            RoomPatch::status(RoomStatus::Playing).with_letter(Some('T')),
        )
        .await
        .unwrap();

    let late = RoomSession::enter(store.clone(), &room.id, "Grace", "client_grace")
        .await
        .unwrap();

    assert!(late.is_timer_running());
    assert_eq!(late.time_left(), 120);
}
