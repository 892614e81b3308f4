use clap::Parser;
use error_stack::ResultExt;

use wordsprint::app::{
    client::subscription::RoomSubscription,
    errors::BootError,
    store::{
        models::{ChannelEvent, ChannelStatus, PresenceEvent},
        Store,
    },
    types::{ClientConfig, StoreBackend},
    utils,
};

#[derive(clap::Parser, Debug)]
#[command(version, about = "Log every event published for a room", long_about = None)]
struct WatchArgs {
    /// Code of the room to watch
    room_id: String,
    /// Client configuration file, the same one the game reads
    #[arg(short, long, default_value = "config/client.toml")]
    config: String,
}

#[tokio::main]
pub async fn main() -> error_stack::Result<(), BootError> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_target(true)
        .init();

    let args = WatchArgs::parse();
    let config = utils::read_config::<ClientConfig>(&args.config, Some("WORDSPRINT"))
        .change_context(BootError::Config)
        .attach_printable_lazy(|| format!("config file: {}", args.config))?;

    if config.store.backend == StoreBackend::Memory {
        log::warn!("The memory store is private to this process, no events will arrive");
    }

    let store = Store::connect(&config.store)
        .await
        .change_context(BootError::Store)?;

    let presence_key = utils::generate_time_ordered_id("watcher");
    let mut subscription = RoomSubscription::open(&store, &args.room_id, &presence_key)
        .await
        .change_context(BootError::Store)
        .attach_printable_lazy(|| format!("room id: {}", args.room_id))?;

    log::info!("Watching room {} as {presence_key}", args.room_id);

    loop {
        tokio::select! {
            event = subscription.next() => match event {
                ChannelEvent::Change(change) => match &change.new {
                    Some(room) => log::info!(
                        "{:?} status={} letter={:?} host={} players={:?}",
                        change.kind,
                        room.status,
                        room.current_letter,
                        room.host,
                        room.players
                    ),
                    None => {
                        log::info!("Room {} was deleted", args.room_id);
                        break;
                    }
                },
                ChannelEvent::Presence(PresenceEvent::Join { key }) => log::info!("{key} joined"),
                ChannelEvent::Presence(PresenceEvent::Leave { key }) => log::info!("{key} left"),
                ChannelEvent::Presence(PresenceEvent::Sync { keys }) => {
                    log::info!("Present: {keys:?}")
                }
                ChannelEvent::Status(ChannelStatus::Closed) => {
                    log::warn!("The room channel was closed");
                    break;
                }
                ChannelEvent::Status(status) => log::info!("Channel status {status:?}"),
            },
            _ = tokio::signal::ctrl_c() => {
                log::info!("Interrupted");
                break;
            }
        }
    }

    subscription.close(&store).await;
    Ok(())
}
