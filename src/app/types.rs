/// Length of one round, in seconds
pub const ROUND_DURATION_SECS: u32 = 120;

/// How long the end of round celebration stays on screen
pub const CELEBRATION_SECS: u64 = 5;

/// Minimum number of players before the host can start
pub const MIN_PLAYERS_TO_START: usize = 2;

pub const ROOM_ID_LENGTH: usize = 6;

pub const DEFAULT_LOCAL_STORAGE: &str = "~/.local/state/wordsprint.toml";

#[derive(serde::Deserialize, Debug, Clone)]
pub struct ClientConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default = "default_local_storage")]
    pub local_storage: String,
}

fn default_local_storage() -> String {
    DEFAULT_LOCAL_STORAGE.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            local_storage: default_local_storage(),
        }
    }
}

#[derive(serde::Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    #[default]
    Redis,
}

#[derive(serde::Deserialize, Debug, Clone, Default)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    pub redis: Option<RedisConfig>,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct RedisConfig {
    pub username: Option<String>,
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
}

/// Deault impl to connect to redis running locally
impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            username: None,
            host: "127.0.0.1".to_string(),
            port: 6379,
            password: None,
        }
    }
}

/// Data kept on this machine between sessions
#[derive(serde::Deserialize, serde::Serialize, Debug, Default, PartialEq, Eq)]
pub struct LocalStorage {
    pub player_name: Option<String>,
}

impl LocalStorage {
    pub fn new(player_name: String) -> Self {
        Self {
            player_name: Some(player_name),
        }
    }
}
