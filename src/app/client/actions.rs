//! Writes issued by a client against the rooms table
//!
//! The client performing a write computes the next row itself, nothing on the store side
//! validates it. List valued fields are written back whole, so two clients writing
//! `players` at the same time can overwrite each other.

use std::collections::BTreeMap;

use crate::app::{
    errors::{Operation, ResultExtApp, RoomError},
    store::{
        interface::room::RoomInterface,
        models::{Player, Room, RoomPatch, RoomStatus},
    },
    utils,
};

/// The fixed answer categories of every round
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Animal,
    Country,
    Food,
    Name,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Animal,
        Category::Country,
        Category::Food,
        Category::Name,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Animal => "Animal",
            Category::Country => "Country",
            Category::Food => "Food",
            Category::Name => "Name",
        }
    }
}

/// The answers typed by a player for the current round
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd)]
pub struct Answers {
    entries: BTreeMap<Category, String>,
}

impl Answers {
    pub fn set(&mut self, category: Category, answer: impl Into<String>) {
        self.entries.insert(category, answer.into());
    }

    pub fn with(mut self, category: Category, answer: impl Into<String>) -> Self {
        self.set(category, answer);
        self
    }

    pub fn get(&self, category: Category) -> Option<&str> {
        self.entries.get(&category).map(String::as_str)
    }

    /// Every category has a non blank answer
    pub fn is_complete(&self) -> bool {
        Category::ALL.iter().all(|category| {
            self.get(*category)
                .is_some_and(|answer| !answer.trim().is_empty())
        })
    }

    /// Number of categories with a non blank answer
    pub fn filled(&self) -> u32 {
        self.entries
            .values()
            .filter(|answer| !answer.trim().is_empty())
            .count() as u32
    }
}

/// Result of a player leaving a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// The leaver was the last player, the row is gone
    Deleted,
    Updated(Room),
}

fn required(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

pub async fn create_room<S: RoomInterface>(store: &S, player_name: &str) -> Result<Room, RoomError> {
    let player_name = required(player_name).ok_or(RoomError::MissingName)?;

    let room = Room::new(utils::generate_room_id(), player_name.to_string());
    tracing::info!(room_id = %room.id, player_name, "Creating room");

    store.insert_room(room).await.during(Operation::CreateRoom)
}

pub async fn join_room<S: RoomInterface>(
    store: &S,
    player_name: &str,
    room_code: &str,
) -> Result<Room, RoomError> {
    let (Some(player_name), Some(room_code)) = (required(player_name), required(room_code)) else {
        return Err(RoomError::MissingFields);
    };

    let room = store.find_room(room_code).await.to_not_found(
        RoomError::RoomNotFound {
            room_id: room_code.to_string(),
        },
        Operation::JoinRoom,
    )?;

    let mut players = room.players;
    players.push(Player::new(player_name.to_string()));
    tracing::info!(room_id = room_code, player_name, players = players.len(), "Joining room");

    store
        .update_room(room_code, RoomPatch::players(players))
        .await
        .to_not_found(
            RoomError::RoomNotFound {
                room_id: room_code.to_string(),
            },
            Operation::JoinRoom,
        )
}

pub async fn start_game<S: RoomInterface>(
    store: &S,
    room: &Room,
    player_name: &str,
) -> Result<Room, RoomError> {
    if !room.is_host(player_name) {
        return Err(RoomError::NotHost);
    }

    if !room.can_start() {
        return Err(RoomError::NotEnoughPlayers);
    }

    let letter = utils::random_letter();
    tracing::info!(room_id = %room.id, %letter, "Starting game");

    let patch = RoomPatch::status(RoomStatus::Playing)
        .with_letter(Some(letter))
        .with_round(1);

    store
        .update_room(&room.id, patch)
        .await
        .during(Operation::StartGame)
}

pub async fn submit_answers<S: RoomInterface>(
    store: &S,
    room: &Room,
    player_name: &str,
    answers: &Answers,
) -> Result<Room, RoomError> {
    if room.status != RoomStatus::Playing {
        return Err(RoomError::NotPlaying);
    }

    if !answers.is_complete() {
        return Err(RoomError::BlankAnswers);
    }

    if room.player(player_name).is_none() {
        return Err(RoomError::NotInRoom {
            player_name: player_name.to_string(),
        });
    }

    let points = answers.filled();
    let players = room
        .players
        .iter()
        .map(|player| {
            if player.name == player_name {
                Player {
                    name: player.name.clone(),
                    score: player.score.saturating_add(points),
                }
            } else {
                player.clone()
            }
        })
        .collect::<Vec<_>>();

    tracing::info!(room_id = %room.id, player_name, points, "Submitting answers");

    store
        .update_room(&room.id, RoomPatch::players(players))
        .await
        .during(Operation::SubmitAnswers)
}

pub async fn leave_room<S: RoomInterface>(
    store: &S,
    room: &Room,
    player_name: &str,
) -> Result<LeaveOutcome, RoomError> {
    let remaining = room
        .players
        .iter()
        .filter(|player| player.name != player_name)
        .cloned()
        .collect::<Vec<_>>();

    let Some(first_remaining) = remaining.first() else {
        tracing::info!(room_id = %room.id, "No players left, deleting room");
        store
            .delete_room(&room.id)
            .await
            .during(Operation::LeaveRoom)?;
        return Ok(LeaveOutcome::Deleted);
    };

    let patch = if room.is_host(player_name) {
        // Reset the game when the host walks out
        RoomPatch::players(remaining.clone())
            .with_host(first_remaining.name.clone())
            .with_status(RoomStatus::Waiting)
            .with_letter(None)
            .with_round(1)
    } else {
        RoomPatch::players(remaining.clone()).with_host(room.host.clone())
    };

    tracing::info!(room_id = %room.id, player_name, "Leaving room");

    store
        .update_room(&room.id, patch)
        .await
        .during(Operation::LeaveRoom)
        .map(LeaveOutcome::Updated)
}

/// Rewrite the roster entry of a player, and the host when it was them, under a new name
pub async fn rename_player<S: RoomInterface>(
    store: &S,
    room: &Room,
    player_name: &str,
    new_name: &str,
) -> Result<Room, RoomError> {
    let new_name = required(new_name).ok_or(RoomError::MissingName)?;

    if room.player(player_name).is_none() {
        return Err(RoomError::NotInRoom {
            player_name: player_name.to_string(),
        });
    }

    if room.player(new_name).is_some() {
        return Err(RoomError::NameTaken {
            player_name: new_name.to_string(),
        });
    }

    let players = room
        .players
        .iter()
        .map(|player| {
            if player.name == player_name {
                Player {
                    name: new_name.to_string(),
                    score: player.score,
                }
            } else {
                player.clone()
            }
        })
        .collect::<Vec<_>>();

    let mut patch = RoomPatch::players(players);
    if room.is_host(player_name) {
        patch = patch.with_host(new_name.to_string());
    }

    tracing::info!(room_id = %room.id, player_name, new_name, "Renaming player");

    store
        .update_room(&room.id, patch)
        .await
        .to_not_found(
            RoomError::RoomNotFound {
                room_id: room.id.clone(),
            },
            Operation::RenamePlayer,
        )
}

/// Fired when the local clock runs out; every client may fire it, they all write the same state
pub async fn end_round<S: RoomInterface>(store: &S, room_id: &str) -> Result<Room, RoomError> {
    tracing::info!(room_id, "Ending round");
    store
        .update_room(room_id, RoomPatch::status(RoomStatus::Finished))
        .await
        .during(Operation::EndRound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::store::MemoryStore;

    fn full_answers() -> Answers {
        Answers::default()
            .with(Category::Animal, "Bear")
            .with(Category::Country, "Brazil")
            .with(Category::Food, "Bread")
            .with(Category::Name, "Bob")
    }

    async fn room_with(store: &MemoryStore, names: &[&str]) -> Room {
        let mut room = create_room(store, names[0]).await.unwrap();
        for name in &names[1..] {
            room = join_room(store, name, &room.id).await.unwrap();
        }
        room
    }

    #[tokio::test]
    async fn create_room_makes_the_creator_host() {
        let store = MemoryStore::default();
        let room = create_room(&store, "Ada").await.unwrap();

        assert_eq!(room.status, RoomStatus::Waiting);
        assert_eq!(room.players, vec![Player::new("Ada".to_string())]);
        assert_eq!(room.host, "Ada");
        assert_eq!(store.find_room(&room.id).await.unwrap(), room);
    }

    #[tokio::test]
    async fn blank_names_never_reach_the_store() {
        let store = MemoryStore::default();

        assert!(matches!(
            create_room(&store, "   ").await,
            Err(RoomError::MissingName)
        ));
        assert!(matches!(
            join_room(&store, "Ada", " ").await,
            Err(RoomError::MissingFields)
        ));
        assert_eq!(store.room_count(), 0);
    }

    #[tokio::test]
    async fn joining_an_unknown_room_is_not_found() {
        let store = MemoryStore::default();
        let error = join_room(&store, "Ada", "nope42").await.unwrap_err();

        assert!(error.is_not_found());
    }

    #[tokio::test]
    async fn joining_appends_to_the_roster() {
        let store = MemoryStore::default();
        let room = room_with(&store, &["Ada", "Grace", "Linus"]).await;

        let names = room
            .players
            .iter()
            .map(|player| player.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Ada", "Grace", "Linus"]);
        assert_eq!(room.host, "Ada");
    }

    #[tokio::test]
    async fn only_the_host_starts_with_enough_players() {
        let store = MemoryStore::default();
        let alone = create_room(&store, "Ada").await.unwrap();
        assert!(matches!(
            start_game(&store, &alone, "Ada").await,
            Err(RoomError::NotEnoughPlayers)
        ));

        let room = room_with(&store, &["Bea", "Cy"]).await;
        assert!(matches!(
            start_game(&store, &room, "Cy").await,
            Err(RoomError::NotHost)
        ));

        let started = start_game(&store, &room, "Bea").await.unwrap();
        assert_eq!(started.status, RoomStatus::Playing);
        assert_eq!(started.current_round, 1);
        assert!(started
            .current_letter
            .is_some_and(|letter| letter.is_ascii_uppercase()));
    }

    #[tokio::test]
    async fn submitting_needs_every_category() {
        let store = MemoryStore::default();
        let room = room_with(&store, &["Ada", "Grace"]).await;
        let room = start_game(&store, &room, "Ada").await.unwrap();

        let partial = full_answers().with(Category::Food, "  ");
        assert!(matches!(
            submit_answers(&store, &room, "Grace", &partial).await,
            Err(RoomError::BlankAnswers)
        ));

        let missing = Answers::default().with(Category::Animal, "Bear");
        assert!(matches!(
            submit_answers(&store, &room, "Grace", &missing).await,
            Err(RoomError::BlankAnswers)
        ));

        assert_eq!(store.find_room(&room.id).await.unwrap().players, room.players);
    }

    #[tokio::test]
    async fn submitting_scores_only_the_submitter() {
        let store = MemoryStore::default();
        let room = room_with(&store, &["Ada", "Grace"]).await;
        let room = start_game(&store, &room, "Ada").await.unwrap();

        let room = submit_answers(&store, &room, "Grace", &full_answers())
            .await
            .unwrap();

        assert_eq!(room.player("Grace").unwrap().score, 4);
        assert_eq!(room.player("Ada").unwrap().score, 0);
    }

    #[tokio::test]
    async fn submitting_outside_a_round_is_rejected() {
        let store = MemoryStore::default();
        let room = room_with(&store, &["Ada", "Grace"]).await;

        assert!(matches!(
            submit_answers(&store, &room, "Ada", &full_answers()).await,
            Err(RoomError::NotPlaying)
        ));
    }

    #[tokio::test]
    async fn strangers_cannot_submit() {
        let store = MemoryStore::default();
        let room = room_with(&store, &["Ada", "Grace"]).await;
        let room = start_game(&store, &room, "Ada").await.unwrap();

        let error = submit_answers(&store, &room, "Mallory", &full_answers())
            .await
            .unwrap_err();

        assert!(matches!(error, RoomError::NotInRoom { ref player_name } if player_name == "Mallory"));
        assert!(error.is_validation());
        assert_eq!(store.find_room(&room.id).await.unwrap().players, room.players);
    }

    #[tokio::test]
    async fn scores_stop_at_the_ceiling() {
        let store = MemoryStore::default();
        let room = room_with(&store, &["Ada", "Grace"]).await;
        let room = start_game(&store, &room, "Ada").await.unwrap();

        let mut players = room.players.clone();
        players[1].score = u32::MAX - 1;
        let room = store
            .update_room(&room.id, RoomPatch::players(players))
            .await
            .unwrap();

        let room = submit_answers(&store, &room, "Grace", &full_answers())
            .await
            .unwrap();
        assert_eq!(room.player("Grace").unwrap().score, u32::MAX);
    }

    #[tokio::test]
    async fn renaming_the_host_moves_the_host_entry() {
        let store = MemoryStore::default();
        let room = room_with(&store, &["Ada", "Grace"]).await;
        let room = submit_answers(
            &store,
            &start_game(&store, &room, "Ada").await.unwrap(),
            "Ada",
            &full_answers(),
        )
        .await
        .unwrap();

        let room = rename_player(&store, &room, "Ada", "  Ada Lovelace ")
            .await
            .unwrap();

        assert_eq!(room.host, "Ada Lovelace");
        assert_eq!(room.players[0].name, "Ada Lovelace");
        assert_eq!(room.players[0].score, 4);
        assert_eq!(room.players[1].name, "Grace");
        assert_eq!(store.find_room(&room.id).await.unwrap(), room);
    }

    #[tokio::test]
    async fn renaming_a_guest_keeps_the_host() {
        let store = MemoryStore::default();
        let room = room_with(&store, &["Ada", "Grace"]).await;

        let room = rename_player(&store, &room, "Grace", "Hopper").await.unwrap();

        assert_eq!(room.host, "Ada");
        assert_eq!(room.players[1].name, "Hopper");
    }

    #[tokio::test]
    async fn renaming_refuses_taken_or_blank_names() {
        let store = MemoryStore::default();
        let room = room_with(&store, &["Ada", "Grace"]).await;

        assert!(matches!(
            rename_player(&store, &room, "Ada", "Grace").await,
            Err(RoomError::NameTaken { .. })
        ));
        assert!(matches!(
            rename_player(&store, &room, "Ada", " ").await,
            Err(RoomError::MissingName)
        ));
        assert!(matches!(
            rename_player(&store, &room, "Mallory", "Eve").await,
            Err(RoomError::NotInRoom { .. })
        ));
        assert_eq!(store.find_room(&room.id).await.unwrap(), room);
    }

    #[tokio::test]
    async fn last_player_leaving_deletes_the_room() {
        let store = MemoryStore::default();
        let room = create_room(&store, "Ada").await.unwrap();

        let outcome = leave_room(&store, &room, "Ada").await.unwrap();
        assert_eq!(outcome, LeaveOutcome::Deleted);
        assert!(store.find_room(&room.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn host_leaving_resets_the_game() {
        let store = MemoryStore::default();
        let room = room_with(&store, &["Ada", "Grace", "Linus"]).await;
        let room = start_game(&store, &room, "Ada").await.unwrap();

        let LeaveOutcome::Updated(room) = leave_room(&store, &room, "Ada").await.unwrap() else {
            panic!("room should survive");
        };

        assert_eq!(room.host, "Grace");
        assert_eq!(room.status, RoomStatus::Waiting);
        assert_eq!(room.current_letter, None);
        assert_eq!(room.current_round, 1);
        assert_eq!(room.players.len(), 2);
    }

    #[tokio::test]
    async fn guest_leaving_keeps_the_round_going() {
        let store = MemoryStore::default();
        let room = room_with(&store, &["Ada", "Grace", "Linus"]).await;
        let room = start_game(&store, &room, "Ada").await.unwrap();
        let letter = room.current_letter;

        let LeaveOutcome::Updated(room) = leave_room(&store, &room, "Linus").await.unwrap() else {
            panic!("room should survive");
        };

        assert_eq!(room.host, "Ada");
        assert_eq!(room.status, RoomStatus::Playing);
        assert_eq!(room.current_letter, letter);
    }

    #[tokio::test]
    async fn ending_a_round_twice_converges() {
        let store = MemoryStore::default();
        let room = room_with(&store, &["Ada", "Grace"]).await;
        let room = start_game(&store, &room, "Ada").await.unwrap();

        let first = end_round(&store, &room.id).await.unwrap();
        let second = end_round(&store, &room.id).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(second.status, RoomStatus::Finished);
    }

    #[test]
    fn answers_count_only_filled_categories() {
        let answers = Answers::default()
            .with(Category::Animal, "Bear")
            .with(Category::Food, " ");

        assert_eq!(answers.filled(), 1);
        assert!(!answers.is_complete());
        assert_eq!(full_answers().filled(), 4);
        assert!(full_answers().is_complete());
    }
}
