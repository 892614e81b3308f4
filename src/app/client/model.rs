/// This file contains the application model
use std::time::Duration;

use error_stack::{Report, ResultExt};
use tokio::sync::mpsc;
use tuirealm::terminal::TerminalBridge;
use tuirealm::{
    Application, AttrValue, Attribute, EventListenerCfg, Sub, SubClause, SubEventClause, Update,
};

use crate::app::{
    client::{
        components,
        types::{self, AppStateUpdate, Id, Msg, Screen},
    },
    errors::BootError,
    types::ClientConfig,
};

use super::{
    layout,
    network::{
        types::{Request, UserEvent},
        NetworkClient,
    },
};

pub struct Model {
    /// Application
    pub app: Application<Id, Msg, UserEvent>,
    /// Requests for the network client
    pub network_channel: mpsc::UnboundedSender<Request>,
    /// Indicates that the application must quit
    pub quit: bool,
    /// Tells whether to redraw interface
    pub redraw: bool,
    /// Used to draw to terminal
    pub terminal: TerminalBridge,
    /// State of the application
    pub state: types::AppState,
    /// In order to safely close any open connections
    pub network_join_handler: Option<std::thread::JoinHandle<()>>,
}

#[derive(clap::Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct ClientArgs {
    /// Display name to use instead of the one stored in ~/.local/state/wordsprint.toml
    #[arg(short, long)]
    pub name: Option<String>,
    /// Keep every room in this process, nothing is shared with other players
    #[arg(long, default_value_t = false)]
    pub offline: bool,
    /// Client configuration file
    #[arg(short, long, default_value = "config/client.toml")]
    pub config: String,
}

/// Subscribe to every event while not focused, the focused component gets them anyway
fn unless_focused(id: Id) -> Vec<Sub<Id, UserEvent>> {
    vec![Sub::new(
        SubEventClause::Any,
        SubClause::Not(Box::new(SubClause::HasAttrValue(
            id,
            Attribute::Focus,
            AttrValue::Flag(true),
        ))),
    )]
}

fn always() -> Vec<Sub<Id, UserEvent>> {
    vec![Sub::new(SubEventClause::Any, SubClause::Always)]
}

impl Model {
    pub fn new(mut config: ClientConfig, args: ClientArgs) -> error_stack::Result<Self, BootError> {
        if args.offline {
            config.store.backend = crate::app::types::StoreBackend::Memory;
        }

        let terminal = TerminalBridge::new().map_err(|error| {
            Report::new(BootError::Terminal).attach_printable(format!("{error:?}"))
        })?;

        let (network_sender, network_receiver) = mpsc::unbounded_channel::<Request>();

        // start the network client
        let mut network_client = NetworkClient::default();
        let cloned_network_client = network_client.clone();
        let preferred_name = args.name;

        let join_handler = std::thread::Builder::new()
            .name("network".to_string())
            .spawn(move || {
                network_client.start_network_client(network_receiver, config, preferred_name)
            })
            .change_context(BootError::Network)?;

        let app = Self::init_app(cloned_network_client).map_err(|error| {
            Report::new(BootError::Terminal).attach_printable(format!("{error:?}"))
        })?;

        Ok(Self {
            app,
            network_channel: network_sender,
            quit: false,
            redraw: true,
            terminal,
            state: types::AppState::default(),
            network_join_handler: Some(join_handler),
        })
    }
}

impl Model {
    pub fn view(&mut self) {
        let screen = self.state.screen;
        let drawn = self.terminal.raw_mut().draw(|f| {
            let custom_layout = layout::CustomLayout::new(f.size());

            match screen {
                Screen::Lobby => self.app.view(&Id::Lobby, f, custom_layout.action_area),
                Screen::Room => self.app.view(&Id::RoomScreen, f, custom_layout.action_area),
            }
            self.app.view(&Id::Roster, f, custom_layout.roster);
            self.app.view(&Id::Help, f, custom_layout.help);
            self.app.view(&Id::BottomBar, f, custom_layout.bottom_bar);
        });

        if let Err(error) = drawn {
            tracing::error!(?error, "Failed to draw the interface");
        }
    }

    fn init_app(
        network_client: NetworkClient,
    ) -> Result<Application<Id, Msg, UserEvent>, tuirealm::ApplicationError> {
        let mut app: Application<Id, Msg, UserEvent> = Application::init(
            EventListenerCfg::default()
                .default_input_listener(Duration::from_millis(20))
                .port(Box::new(network_client), Duration::from_millis(10))
                .poll_timeout(Duration::from_millis(10))
                .tick_interval(Duration::from_secs(1)),
        );

        app.mount(
            Id::Lobby,
            Box::<components::lobby::Lobby>::default(),
            unless_focused(Id::Lobby),
        )?;

        app.mount(
            Id::RoomScreen,
            Box::<components::room_screen::RoomScreen>::default(),
            unless_focused(Id::RoomScreen),
        )?;

        app.mount(
            Id::Roster,
            Box::<components::roster::Roster>::default(),
            always(),
        )?;

        app.mount(
            Id::BottomBar,
            Box::<components::bottom_bar::BottomBar>::default(),
            always(),
        )?;

        app.mount(
            Id::Help,
            Box::<components::help::Help>::default(),
            Vec::default(),
        )?;

        // Activate the lobby
        app.active(&Id::Lobby)?;
        Ok(app)
    }

    fn send(&mut self, request: Request) {
        if let Err(error) = self.network_channel.send(request) {
            tracing::error!(?error, "Network client is gone");
        }
    }

    fn focus(&mut self, id: Id) {
        if let Err(error) = self.app.active(&id) {
            tracing::error!(?error, ?id, "Failed to focus component");
        }
    }

    fn close(&mut self) {
        self.quit = true;
        self.send(Request::Quit);
        if let Some(network_join_handler) = self.network_join_handler.take() {
            if network_join_handler.join().is_err() {
                tracing::error!("Network client panicked");
            }
        }
    }
}

impl Update<Msg> for Model {
    fn update(&mut self, msg: Option<Msg>) -> Option<Msg> {
        if let Some(msg) = msg {
            self.redraw = true;
            match msg {
                Msg::AppClose => {
                    self.close();
                    None
                }
                Msg::BottomBarUpdate | Msg::ReDraw => None,
                Msg::Lobby(lobby_message) => {
                    if let Some(request) = lobby_message.into_request() {
                        self.send(request);
                    }
                    None
                }
                Msg::Room(room_message) => {
                    if let Some(request) = room_message.into_request() {
                        self.send(request);
                    }
                    None
                }
                Msg::StateUpdate(state_update) => {
                    match &state_update {
                        AppStateUpdate::PlayerName(_) => {}
                        AppStateUpdate::RoomEntered { .. } => self.focus(Id::RoomScreen),
                        AppStateUpdate::RoomLeft => self.focus(Id::Lobby),
                    }
                    let new_state = self.state.clone().apply_update(state_update);
                    self.state = new_state;

                    None
                }
            }
        } else {
            None
        }
    }
}
