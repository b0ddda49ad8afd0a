use std::path::PathBuf;
use std::time::{Duration, Instant};

use rand::rngs::SmallRng;

use crate::config::Config;
use crate::problem::ProblemSet;
use crate::problem::loader::LoadError;
use crate::session::board::{DropTarget, Zone};
use crate::session::certificate::Certificate;
use crate::session::evaluator::CheckOutcome;
use crate::session::state::SessionState;
use crate::store::json_store::{self, JsonStore};
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

const MAX_NAME_CHARS: usize = 40;
const STATUS_TTL: Duration = Duration::from_secs(5);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    NamePrompt,
    Board,
    Certificate,
}

/// Trimmed name, or the placeholder when nothing usable was typed.
pub fn resolve_name(input: &str, placeholder: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        placeholder.to_string()
    } else {
        trimmed.to_string()
    }
}

pub struct App {
    pub screen: AppScreen,
    pub session: SessionState,
    pub config: Config,
    pub theme: &'static Theme,
    pub store: Option<JsonStore>,
    pub user_name: Option<String>,
    /// One-shot message shown over everything until a key is pressed.
    pub alert: Option<String>,
    pub name_input: LineInput,
    pub focus: Zone,
    /// Cursor per column; a value equal to the column length is the end slot.
    cursors: [usize; 2],
    pub certificate: Option<Certificate>,
    pub status: Option<(String, Instant)>,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        config: Config,
        store: Option<JsonStore>,
        loaded: Result<ProblemSet, LoadError>,
        rng: SmallRng,
    ) -> Self {
        let loaded_theme = Theme::load(&config.theme).unwrap_or_else(|| {
            tracing::warn!(
                theme = %config.theme,
                available = ?Theme::available_themes(),
                "unknown theme, using default"
            );
            Theme::default()
        });
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));

        let (problems, alert) = match loaded {
            Ok(set) => (set, None),
            Err(err) => {
                tracing::error!(%err, "failed to load problems");
                (ProblemSet::default(), Some(format!("Failed to load problems: {err}")))
            }
        };

        let user_name = store.as_ref().and_then(|s| s.load_user_name());
        let screen = if user_name.is_some() {
            AppScreen::Board
        } else {
            AppScreen::NamePrompt
        };

        let mut app = Self {
            screen,
            session: SessionState::with_rng(problems, rng),
            config,
            theme,
            store,
            user_name,
            alert,
            name_input: LineInput::new("", MAX_NAME_CHARS),
            focus: Zone::Available,
            cursors: [0, 0],
            certificate: None,
            status: None,
            should_quit: false,
        };
        app.refresh();
        app
    }

    pub fn display_name(&self) -> &str {
        self.user_name
            .as_deref()
            .unwrap_or(&self.config.placeholder_name)
    }

    pub fn set_status(&mut self, message: String) {
        self.status = Some((message, Instant::now()));
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status.as_ref().map(|(msg, _)| msg.as_str())
    }

    pub fn expire_status(&mut self) {
        if self
            .status
            .as_ref()
            .is_some_and(|(_, at)| at.elapsed() > STATUS_TTL)
        {
            self.status = None;
        }
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Accept whatever is in the name field. Never rejects input.
    pub fn submit_name(&mut self) {
        let name = resolve_name(self.name_input.value(), &self.config.placeholder_name);
        if let Some(ref store) = self.store {
            if let Err(err) = store.save_user_name(&name) {
                tracing::warn!(%err, "could not persist user name");
            }
        }
        tracing::info!(name = %name, "user name set");
        self.user_name = Some(name);
        self.name_input.clear();
        self.screen = AppScreen::Board;
        self.refresh();
    }

    fn zone_slot(zone: Zone) -> usize {
        match zone {
            Zone::Available => 0,
            Zone::Solution => 1,
        }
    }

    pub fn cursor(&self, zone: Zone) -> usize {
        self.cursors[Self::zone_slot(zone)]
    }

    fn set_cursor(&mut self, zone: Zone, value: usize) {
        let max = self.session.board().zone(zone).len();
        self.cursors[Self::zone_slot(zone)] = value.min(max);
    }

    fn clamp_cursors(&mut self) {
        for zone in [Zone::Available, Zone::Solution] {
            self.set_cursor(zone, self.cursor(zone));
        }
    }

    pub fn cursor_up(&mut self) {
        let zone = self.focus;
        self.set_cursor(zone, self.cursor(zone).saturating_sub(1));
    }

    pub fn cursor_down(&mut self) {
        let zone = self.focus;
        self.set_cursor(zone, self.cursor(zone) + 1);
    }

    pub fn focus_zone(&mut self, zone: Zone) {
        self.focus = zone;
        self.clamp_cursors();
    }

    pub fn toggle_focus(&mut self) {
        self.focus_zone(self.focus.other());
    }

    /// Pick up the highlighted block, or drop the carried one at the cursor.
    pub fn activate(&mut self) {
        if !self.session.has_problems() {
            return;
        }
        let zone = self.focus;
        let cursor = self.cursor(zone);
        let on_block = cursor < self.session.board().zone(zone).len();

        if self.session.drag().is_some() {
            let target = if on_block {
                DropTarget::Block { zone, index: cursor }
            } else {
                DropTarget::End(zone)
            };
            self.session.drop_on(target);
            self.clamp_cursors();
        } else if on_block {
            self.session.start_drag(zone, cursor);
        }
    }

    pub fn cancel_drag(&mut self) {
        self.session.cancel_drag();
    }

    /// Send the highlighted block to the end of the other column.
    pub fn send_highlighted(&mut self, from: Zone) {
        if self.session.drag().is_some() {
            return;
        }
        let cursor = self.cursor(from);
        if self.session.send_to_other(from, cursor) {
            self.clamp_cursors();
        }
    }

    pub fn check(&mut self) {
        if self.session.drag().is_some() {
            self.session.cancel_drag();
        }
        match self.session.check_solution() {
            CheckOutcome::Solved { all_solved: true } => self.enter_certificate(),
            CheckOutcome::Solved { .. } | CheckOutcome::NotQuite { .. } => self.clamp_cursors(),
            CheckOutcome::NoProblem => {}
        }
    }

    pub fn next_problem(&mut self) {
        if self.session.go_next() {
            self.reset_cursors();
            self.refresh();
        }
    }

    pub fn prev_problem(&mut self) {
        if self.session.go_prev() {
            self.reset_cursors();
            self.refresh();
        }
    }

    fn reset_cursors(&mut self) {
        self.cursors = [0, 0];
        self.focus = Zone::Available;
    }

    /// Re-evaluate the session-level state after a render-worthy change.
    fn refresh(&mut self) {
        if self.screen == AppScreen::Board && self.session.is_all_solved() {
            self.enter_certificate();
        }
    }

    fn enter_certificate(&mut self) {
        let certificate = Certificate::issue_today(self.display_name(), &self.config.instructor);
        tracing::info!(name = %certificate.name, date = %certificate.long_date(), "all problems solved");
        self.certificate = Some(certificate);
        self.screen = AppScreen::Certificate;
    }

    /// Save a text copy of the certificate; the path is reported in the status line.
    pub fn save_certificate_copy(&mut self) -> Option<PathBuf> {
        let certificate = self.certificate.as_ref()?;
        let dir = PathBuf::from(&self.config.certificate_dir);
        match json_store::save_certificate(&dir, certificate) {
            Ok(path) => {
                tracing::info!(path = %path.display(), "certificate saved");
                self.set_status(format!("Saved a copy to {}", path.display()));
                Some(path)
            }
            Err(err) => {
                tracing::warn!(%err, "could not save certificate");
                self.set_status(format!("Could not save certificate: {err}"));
                None
            }
        }
    }
}
