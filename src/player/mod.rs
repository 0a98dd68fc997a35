//! Terminal player screen.

pub mod app;
pub mod audio;
pub mod timer_dialog;
pub mod ui;

use log::{info, warn};
use std::error::Error;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::session::{SessionController, TimerDuration};
use crate::user::UserStore;

pub fn run(
    sound: &str,
    volume: Option<f32>,
    timer: Option<TimerDuration>,
) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    app::init_logging(&config)?;
    info!("Starting SoundNest player for '{sound}'");

    let backend = audio::RodioBackend::new(config.sounds_path())?;
    let mut session = SessionController::new(backend, Catalog::builtin());

    // Without a user record there is nobody to record plays against
    match UserStore::open_default() {
        Ok(store) => match store.load() {
            Ok(Some(user)) => session = session.with_recorder(Box::new(store), user.name),
            Ok(None) => info!("No user record, recently played will not be saved"),
            Err(e) => warn!("Could not read user record: {e}"),
        },
        Err(e) => warn!("Could not locate user record: {e}"),
    }

    session.set_volume(volume.unwrap_or(config.default_volume));

    let mut app = app::App::new(session);
    app.open(sound);
    if let Some(duration) = timer {
        app.session.arm_timer(duration.total_seconds());
    }

    app::run(app)
}
