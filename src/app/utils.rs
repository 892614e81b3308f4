use rand::Rng;
use tokio::{fs, io::AsyncWriteExt};

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

use super::types;

/// Alphabet used for room codes, same as the url safe nanoid alphabet
const ROOM_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

const LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

pub fn read_config<'a, T>(file_name: &str, env_prefix: Option<&str>) -> Result<T, ConfigError>
where
    T: Deserialize<'a>,
{
    let mut config_builder = Config::builder()
        .add_source(File::new(file_name, FileFormat::Toml).required(false));

    if let Some(env_prefix) = env_prefix {
        config_builder = config_builder.add_source(
            Environment::with_prefix(env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );
    }

    config_builder.build()?.try_deserialize()
}

fn replace_home_dir(file_name: &str) -> String {
    expand_home(file_name, std::env::var("HOME").ok().as_deref())
}

/// Swap a `~` component for `home`, left untouched when there is no home directory
fn expand_home(file_name: &str, home: Option<&str>) -> String {
    let path_buf = std::path::PathBuf::from(file_name);
    path_buf
        .iter()
        .map(|dir| {
            if dir == "~" {
                home.unwrap_or("~").to_string()
            } else {
                dir.to_string_lossy().into_owned()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
        // Joining the root component yields a doubled separator
        .replacen("//", "/", 1)
}

/// Read a file from local storage
///
/// Return `None` if file is not present or cannot be parsed
pub async fn read_local_storage<T>(file_name: &str) -> Option<T>
where
    T: serde::de::DeserializeOwned,
{
    let file_name = replace_home_dir(file_name);
    let file_contents = fs::read_to_string(&file_name).await.ok()?;

    match toml::from_str::<T>(&file_contents) {
        Ok(value) => Some(value),
        Err(parse_error) => {
            tracing::warn!(?parse_error, file_name, "Ignoring invalid local storage");
            None
        }
    }
}

/// Write the given data to file in local storage
///
/// Create the file, and its parent directories, if it does not exist
pub async fn write_local_storage<T>(file_name: &str, data: T) -> std::io::Result<()>
where
    T: serde::Serialize,
{
    let file_name = replace_home_dir(file_name);
    let file_contents = toml::to_string(&data)
        .map_err(|error| std::io::Error::new(std::io::ErrorKind::InvalidData, error))?;

    if let Some(parent) = std::path::Path::new(&file_name).parent() {
        fs::create_dir_all(parent).await?;
    }

    let mut file = fs::File::create(file_name).await?;
    file.write_all(file_contents.as_bytes()).await?;
    file.flush().await
}

/// A short room code that players can share
pub fn generate_room_id() -> String {
    let mut rng = rand::thread_rng();
    (0..types::ROOM_ID_LENGTH)
        .map(|_| char::from(ROOM_ID_ALPHABET[rng.gen_range(0..ROOM_ID_ALPHABET.len())]))
        .collect()
}

/// Uniformly random uppercase letter for a new round
pub fn random_letter() -> char {
    let mut rng = rand::thread_rng();
    char::from(LETTERS[rng.gen_range(0..LETTERS.len())])
}

pub fn generate_time_ordered_id(prefix: &str) -> String {
    format!("{prefix}_{}", uuid::Uuid::now_v7().as_simple())
}

pub fn generate_name() -> String {
    let random_name_generator = rnglib::RNG::from(&rnglib::Language::Fantasy);
    random_name_generator.generate_name()
}
