//! Player screen state and control flow.
//!
//! The app owns the session controller for as long as the screen is open. It
//! translates key presses into controller commands, pumps the controller once
//! per frame, and turns reported conditions into a transient status line. It
//! holds no playback state of its own.

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{info, warn};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    error::Error,
    io,
    time::{Duration, Instant},
};

use super::timer_dialog::TimerDialog;
use super::ui;
use crate::config::Config;
use crate::constants::{PLACEHOLDER_TITLE, VOLUME_STEP};
use crate::error::PlayerError;
use crate::session::{AudioBackend, SessionController, TimerDuration};

const STATUS_TTL: Duration = Duration::from_secs(3);
const DEFAULT_PICKER_MINUTES: u64 = 30;

pub struct App<B: AudioBackend> {
    pub session: SessionController<B>,
    pub should_quit: bool,
    pub title: String,
    pub timer_dialog: Option<TimerDialog>,
    pub status_message: Option<String>,
    status_timer: Option<Instant>,
}

impl<B: AudioBackend> App<B> {
    pub fn new(session: SessionController<B>) -> Self {
        Self {
            session,
            should_quit: false,
            title: PLACEHOLDER_TITLE.to_string(),
            timer_dialog: None,
            status_message: None,
            status_timer: None,
        }
    }

    /// Open the screen on a route parameter. An unknown sound leaves the title
    /// blank and explains why in the status line.
    pub fn open(&mut self, route_param: &str) {
        match self.session.select_track(route_param) {
            Ok(()) => {
                self.title = self
                    .session
                    .active_entry()
                    .map(|e| e.title.clone())
                    .unwrap_or_default();
            }
            Err(e) => {
                self.title = PLACEHOLDER_TITLE.to_string();
                let hint = self
                    .session
                    .catalog()
                    .suggest(route_param)
                    .map(|s| format!(" Did you mean {s}?"))
                    .unwrap_or_default();
                self.set_status(format!("{e}.{hint}"));
            }
        }
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
        self.status_timer = Some(Instant::now());
    }

    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    pub fn tick_at(&mut self, now: Instant) {
        self.session.tick_at(now);

        for notice in self.session.drain_notices() {
            let message = match &notice {
                PlayerError::ResourceLoad { .. } => format!("{notice}. Press space to retry."),
                _ => notice.to_string(),
            };
            self.set_status(message);
        }

        if let Some(since) = self.status_timer
            && now.saturating_duration_since(since) > STATUS_TTL
        {
            self.status_message = None;
            self.status_timer.take();
        }
    }

    pub fn change_volume(&mut self, delta: f32) {
        let volume = self.session.volume() + delta;
        // Keep the slider on the step grid
        let snapped = (volume / VOLUME_STEP).round() * VOLUME_STEP;
        self.session.set_volume(snapped);
    }

    pub fn open_timer_dialog(&mut self) {
        let initial = if self.session.timer_armed() {
            TimerDuration::from_seconds(self.session.timer_remaining())
        } else {
            TimerDuration::new(0, DEFAULT_PICKER_MINUTES, 0)
        };
        self.timer_dialog = Some(TimerDialog::new(initial));
    }

    pub fn confirm_timer(&mut self) {
        if let Some(dialog) = self.timer_dialog.take() {
            let seconds = dialog.total_seconds();
            self.session.arm_timer(seconds);
            if seconds == 0 {
                self.set_status("Sleep timer off".to_string());
            } else {
                self.set_status(format!("Stopping in {}", dialog.duration));
            }
        }
    }

    pub fn cancel_timer(&mut self) {
        if self.session.timer_armed() {
            self.session.cancel_timer();
            self.set_status("Sleep timer cancelled".to_string());
        }
    }

    /// Leave the screen. The session is torn down before the loop exits.
    pub fn back(&mut self) {
        self.session.teardown();
        self.should_quit = true;
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        if self.timer_dialog.is_some() {
            self.handle_timer_dialog_keys(key);
        } else {
            self.handle_player_keys(key);
        }
    }

    fn handle_player_keys(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('b') | KeyCode::Esc => self.back(),
            KeyCode::Char(' ') => self.session.toggle_playback(),
            KeyCode::Left | KeyCode::Char('-') => self.change_volume(-VOLUME_STEP),
            KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('=') => {
                self.change_volume(VOLUME_STEP)
            }
            KeyCode::Char('t') => self.open_timer_dialog(),
            KeyCode::Char('c') => self.cancel_timer(),
            _ => {}
        }
    }

    fn handle_timer_dialog_keys(&mut self, key: KeyEvent) {
        let Some(dialog) = self.timer_dialog.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Enter => self.confirm_timer(),
            KeyCode::Esc => self.timer_dialog = None,
            KeyCode::Tab | KeyCode::Right => dialog.focus_next(),
            KeyCode::BackTab | KeyCode::Left => dialog.focus_prev(),
            KeyCode::Up | KeyCode::Char('k') => dialog.adjust(1),
            KeyCode::Down | KeyCode::Char('j') => dialog.adjust(-1),
            KeyCode::Backspace | KeyCode::Delete => dialog.clear_field(),
            KeyCode::Char(c) => {
                if let Some(digit) = c.to_digit(10) {
                    dialog.push_digit(digit);
                }
            }
            _ => {}
        }
    }
}

pub fn run<B: AudioBackend>(mut app: App<B>) -> Result<(), Box<dyn Error>> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Release audio before handing the terminal back
    app.session.teardown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &res {
        warn!("Player exited with error: {e}");
    }
    info!("Player closed");
    res
}

fn run_app<T: ratatui::backend::Backend, B: AudioBackend>(
    terminal: &mut Terminal<T>,
    app: &mut App<B>,
) -> Result<(), Box<dyn Error>> {
    loop {
        app.tick();

        terminal.draw(|f| ui::draw(f, app))?;

        // Poll for events with a short timeout to allow continuous rendering
        if event::poll(Duration::from_millis(50))?
            && let Event::Key(key) = event::read()?
        {
            app.handle_key(key);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

pub fn init_logging(config: &Config) -> Result<(), Box<dyn Error>> {
    use simplelog::{CombinedLogger, WriteLogger};
    use std::fs::File;

    let log_file = config.log_path();
    CombinedLogger::init(vec![WriteLogger::new(
        config.level_filter(),
        simplelog::Config::default(),
        File::create(&log_file)?,
    )])?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::session::SessionState;
    use crate::session::testing::{FakeBackend, FakeControl};
    use crossterm::event::KeyModifiers;

    fn app() -> (App<FakeBackend>, FakeControl) {
        let (backend, control) = FakeBackend::new();
        let session = SessionController::new(backend, Catalog::builtin());
        (App::new(session), control)
    }

    fn press(app: &mut App<FakeBackend>, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_new_app_initial_state() {
        let (app, _control) = app();

        assert!(!app.should_quit);
        assert_eq!(app.title, PLACEHOLDER_TITLE);
        assert!(app.timer_dialog.is_none());
        assert!(app.status_message.is_none());
        assert_eq!(app.session.state(), SessionState::Idle);
    }

    #[test]
    fn test_open_known_sound() {
        let (mut app, control) = app();
        app.open("Bonfire");
        control.complete_all();
        app.tick();

        assert_eq!(app.title, "Fire");
        assert_eq!(app.session.state(), SessionState::Playing);
    }

    #[test]
    fn test_open_unknown_sound_blank_title() {
        let (mut app, _control) = app();
        app.open("wave");

        assert_eq!(app.title, PLACEHOLDER_TITLE);
        assert_eq!(app.session.state(), SessionState::Idle);
        let status = app.status_message.clone().unwrap();
        assert!(status.contains("'wave'"));
        assert!(status.contains("Did you mean Waves?"));
    }

    #[test]
    fn test_space_toggles() {
        let (mut app, control) = app();
        app.open("Rain");
        control.complete_all();
        app.tick();

        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.session.state(), SessionState::Paused);
        assert_eq!(control.live_count(), 0);

        press(&mut app, KeyCode::Char(' '));
        control.complete_all();
        app.tick();
        assert_eq!(app.session.state(), SessionState::Playing);
    }

    #[test]
    fn test_volume_keys_step_and_clamp() {
        let (mut app, _control) = app();

        press(&mut app, KeyCode::Right);
        assert!((app.session.volume() - 0.55).abs() < 1e-6);
        press(&mut app, KeyCode::Char('-'));
        press(&mut app, KeyCode::Left);
        assert!((app.session.volume() - 0.45).abs() < 1e-6);

        for _ in 0..30 {
            press(&mut app, KeyCode::Char('+'));
        }
        assert_eq!(app.session.volume(), 1.0);
    }

    #[test]
    fn test_back_tears_down() {
        for code in [KeyCode::Char('q'), KeyCode::Char('b'), KeyCode::Esc] {
            let (mut app, control) = app();
            app.open("Rain");
            control.complete_all();
            app.tick();

            press(&mut app, code);
            assert!(app.should_quit);
            assert_eq!(control.live_count(), 0);
            assert_eq!(app.session.state(), SessionState::Idle);
        }
    }

    #[test]
    fn test_timer_dialog_arms_timer() {
        let (mut app, control) = app();
        app.open("Rain");
        control.complete_all();
        app.tick();

        press(&mut app, KeyCode::Char('t'));
        assert!(app.timer_dialog.is_some());

        // Keys go to the dialog while it is open
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Char('5'));
        press(&mut app, KeyCode::Enter);

        assert!(app.timer_dialog.is_none());
        assert!(app.session.timer_armed());
        assert!(app.session.timer_remaining() <= 5 * 60);
        assert!(app.session.timer_remaining() > 4 * 60);
    }

    #[test]
    fn test_timer_dialog_escape_leaves_timer_alone() {
        let (mut app, _control) = app();

        press(&mut app, KeyCode::Char('t'));
        press(&mut app, KeyCode::Esc);

        assert!(app.timer_dialog.is_none());
        assert!(!app.session.timer_armed());
        assert!(!app.should_quit);
    }

    #[test]
    fn test_cancel_key_disarms() {
        let (mut app, _control) = app();
        app.session.arm_timer(60);

        press(&mut app, KeyCode::Char('c'));
        assert!(!app.session.timer_armed());
        assert_eq!(app.status_message.as_deref(), Some("Sleep timer cancelled"));
    }

    #[test]
    fn test_timer_expiry_pauses() {
        let (mut app, control) = app();
        app.open("Rain");
        control.complete_all();
        app.tick();

        let start = Instant::now();
        app.session.arm_timer_at(5, start);
        app.tick_at(start + Duration::from_secs(5));

        assert!(!app.session.is_playing());
        assert_eq!(control.live_count(), 0);
    }

    #[test]
    fn test_load_failure_shows_status() {
        let (mut app, control) = app();
        app.open("Waves");
        control.fail_next("bad header");
        app.tick();

        let status = app.status_message.clone().unwrap();
        assert!(status.contains("Could not load 'Waves'"));
        assert!(status.contains("retry"));
    }

    #[test]
    fn test_status_expires() {
        let (mut app, _control) = app();
        app.set_status("hello".to_string());

        let later = Instant::now() + STATUS_TTL + Duration::from_millis(10);
        app.tick_at(later);
        assert!(app.status_message.is_none());
    }
}
