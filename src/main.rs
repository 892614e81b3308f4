use clap::Parser;
use error_stack::ResultExt;
use tuirealm::{PollStrategy, Update};

use wordsprint::app::{
    client::model::{ClientArgs, Model},
    errors::BootError,
    types::ClientConfig,
    utils,
};

/// Stdout belongs to the terminal UI, so logs go to a file
#[cfg(feature = "client_logs")]
fn init_logs() -> error_stack::Result<(), BootError> {
    let log_file = std::fs::File::create("wordsprint.log")
        .change_context(BootError::Logging)
        .attach_printable("log file: wordsprint.log")?;

    tracing_subscriber::fmt()
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .try_init()
        .map_err(|error| {
            error_stack::Report::new(BootError::Logging).attach_printable(error.to_string())
        })
}

fn main() -> error_stack::Result<(), BootError> {
    let args = ClientArgs::parse();

    #[cfg(feature = "client_logs")]
    init_logs()?;

    let config = utils::read_config::<ClientConfig>(&args.config, Some("WORDSPRINT"))
        .change_context(BootError::Config)
        .attach_printable_lazy(|| format!("config file: {}", args.config))?;
    tracing::info!(backend = ?config.store.backend, "Starting client");

    // Setup model
    let mut model = Model::new(config, args)?;
    // Enter alternate screen
    let _ = model.terminal.enter_alternate_screen();
    let _ = model.terminal.enable_raw_mode();
    // Main loop
    // NOTE: loop until quit; quit is set in update if AppClose is received
    while !model.quit {
        // Tick
        match model.app.tick(PollStrategy::Once) {
            Err(error) => tracing::error!(?error, "Application tick failed"),
            Ok(messages) if !messages.is_empty() => {
                // NOTE: redraw if at least one msg has been processed
                model.redraw = true;
                for msg in messages.into_iter() {
                    let mut msg = Some(msg);
                    while msg.is_some() {
                        msg = model.update(msg);
                    }
                }
            }
            _ => {}
        }
        // Redraw
        if model.redraw {
            model.view();
            model.redraw = false;
        }
    }
    // Terminate terminal
    let _ = model.terminal.leave_alternate_screen();
    let _ = model.terminal.disable_raw_mode();
    let _ = model.terminal.clear_screen();

    Ok(())
}
