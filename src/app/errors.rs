use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("The requested resource was not found")]
    NotFound,
    #[error("The value already exists")]
    DuplicateValue,
    #[error("Failed to parse value")]
    ParsingFailure,
    #[error("The change feed for this room is no longer available")]
    FeedUnavailable,
    #[error("Unknown Database error")]
    Others(#[from] fred::error::RedisError),
}

impl DbError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound)
    }
}

/// The remote operation that was being performed when the store failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateRoom,
    JoinRoom,
    StartGame,
    SubmitAnswers,
    LeaveRoom,
    EndRound,
    FetchRoom,
    Subscribe,
    RenamePlayer,
}

impl Operation {
    pub fn failure_message(&self) -> &'static str {
        match self {
            Operation::CreateRoom => "Failed to create room",
            Operation::JoinRoom => "Failed to join room",
            Operation::StartGame => "Failed to start game. Please try again.",
            Operation::SubmitAnswers => "Failed to submit answers. Please try again.",
            Operation::LeaveRoom => "Failed to leave room. Please try again.",
            Operation::EndRound => "Failed to end game",
            Operation::FetchRoom => "Failed to connect to room",
            Operation::Subscribe => "Failed to connect to room updates",
            Operation::RenamePlayer => "Failed to change your name",
        }
    }
}

/// Everything that can go wrong while acting on a room, as shown to the player
#[derive(Error, Debug)]
pub enum RoomError {
    #[error("Room not found")]
    RoomNotFound { room_id: String },
    #[error("Please enter your name")]
    MissingName,
    #[error("Please fill in all fields")]
    MissingFields,
    #[error("Only the host can start the game")]
    NotHost,
    #[error("Need at least 2 players to start the game")]
    NotEnoughPlayers,
    #[error("Game is not in progress")]
    NotPlaying,
    #[error("Please fill in all categories")]
    BlankAnswers,
    #[error("{player_name} is not a player in this room")]
    NotInRoom { player_name: String },
    #[error("{player_name} is already taken in this room")]
    NameTaken { player_name: String },
    #[error("{}", .operation.failure_message())]
    Store {
        operation: Operation,
        #[source]
        source: DbError,
    },
}

impl RoomError {
    /// Validation failures are caught before any write is attempted
    pub fn is_validation(&self) -> bool {
        !matches!(
            self,
            RoomError::Store { .. } | RoomError::RoomNotFound { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RoomError::RoomNotFound { .. })
    }
}

pub trait ResultExtApp<T> {
    /// Map a missing row to the given error, every other failure to a store error
    fn to_not_found(self, not_found: RoomError, operation: Operation) -> Result<T, RoomError>;

    /// Attach the operation that was running to a store failure
    fn during(self, operation: Operation) -> Result<T, RoomError>;
}

impl<T> ResultExtApp<T> for Result<T, DbError> {
    fn to_not_found(self, not_found: RoomError, operation: Operation) -> Result<T, RoomError> {
        match self {
            Ok(value) => Ok(value),
            Err(DbError::NotFound) => Err(not_found),
            Err(source) => Err(RoomError::Store { operation, source }),
        }
    }

    fn during(self, operation: Operation) -> Result<T, RoomError> {
        self.map_err(|source| {
            log::error!("db_error={source:?} operation={operation:?}");
            RoomError::Store { operation, source }
        })
    }
}

/// Failures that stop the client before the terminal UI is up
#[derive(Error, Debug)]
pub enum BootError {
    #[error("Failed to read the client configuration")]
    Config,
    #[error("Failed to install the log subscriber")]
    Logging,
    #[error("Failed to set up the terminal")]
    Terminal,
    #[error("Failed to start the network client")]
    Network,
    #[error("Failed to connect to the store")]
    Store,
}
