mod app;
mod config;
mod event;
mod generator;
mod problem;
mod session;
mod store;
mod telemetry;
mod ui;

use std::io::{self, Write};
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use crossterm::cursor::MoveTo;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
    enable_raw_mode,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};

use app::{App, AppScreen};
use config::Config;
use event::{AppEvent, EventHandler};
use generator::{ConceptFlag, GeneratorSpec};
use problem::loader::LoadError;
use session::board::Zone;
use session::state::Feedback;
use store::json_store::JsonStore;
use ui::components::alert::Alert;
use ui::components::block_column::BlockColumn;
use ui::components::certificate_view::CertificateView;
use ui::components::name_prompt::NamePrompt;
use ui::components::progress_bar::ProgressBar;
use ui::layout::{BoardLayout, centered_rect, pack_hint_lines, wrapped_line_count};

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

#[derive(Parser)]
#[command(
    name = "parsons",
    version,
    about = "Parsons problems in the terminal: put the code blocks in order"
)]
struct Cli {
    #[arg(short, long, help = "Problem set URL or path (default batch1.json)")]
    specification: Option<String>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Seed for block shuffling")]
    seed: Option<u64>,

    #[arg(long, help = "Forget the stored name and ask again")]
    reset_name: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Build a request URL for the problem-generation service
    Generate {
        #[arg(short, long, default_value = "python")]
        language: String,

        #[arg(
            short,
            long = "concept",
            value_name = "DIFFICULTY:NAME[=true|false]",
            help = "Concept to include, repeatable"
        )]
        concepts: Vec<String>,

        #[arg(short, long, default_value_t = 5)]
        num_problems: u32,

        #[arg(long, help = "Service base URL (overrides config)")]
        base_url: Option<String>,

        #[arg(long, help = "Request the problems and print the response")]
        fetch: bool,

        #[arg(long, help = "Start the exercise with the generated problems", conflicts_with = "fetch")]
        play: bool,
    },
}

fn main() -> Result<()> {
    telemetry::init_tracing();
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_else(|err| {
        tracing::warn!(%err, path = %Config::config_path().display(), "bad config, using defaults");
        Config::default()
    });
    if !Config::config_path().exists() {
        if let Err(err) = config.save() {
            tracing::warn!(%err, "could not write default config");
        }
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if let Some(specification) = cli.specification {
        config.specification = specification;
    }
    config.validate();

    if let Some(Command::Generate {
        language,
        concepts,
        num_problems,
        base_url,
        fetch,
        play,
    }) = cli.command
    {
        let flags = concepts
            .iter()
            .map(|c| ConceptFlag::parse(c))
            .collect::<Result<Vec<_>, _>>()?;
        let spec = GeneratorSpec::new(&language, num_problems).with_concepts(flags);
        let base = base_url.unwrap_or_else(|| config.generator_base_url.clone());
        let url = spec.request_url(&base)?;
        println!("API URL: {url}");

        if fetch {
            match generator::fetch_generated(&url, config.fetch_timeout()) {
                Ok(body) => println!("{body}"),
                Err(err) => {
                    tracing::warn!(%err, "generation request failed");
                    match err {
                        LoadError::Status { .. } => println!("Error: Server error"),
                        other => println!("Error: {other}"),
                    }
                }
            }
            return Ok(());
        }
        if !play {
            return Ok(());
        }
        config.specification = url;
    }

    run_exercise(config, cli.seed, cli.reset_name)
}

fn run_exercise(config: Config, seed: Option<u64>, reset_name: bool) -> Result<()> {
    let store = match JsonStore::new() {
        Ok(store) => Some(store),
        Err(err) => {
            tracing::warn!(%err, "no data directory; the name will not be remembered");
            None
        }
    };
    if reset_name {
        if let Some(ref store) = store {
            store.clear_user_name()?;
        }
    }

    // Loading gates everything else.
    let loaded = problem::loader::load_problem_set(&config.specification, config.fetch_timeout());
    let rng = seed
        .map(SmallRng::seed_from_u64)
        .unwrap_or_else(SmallRng::from_entropy);
    let mut app = App::new(config, store, loaded, rng);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(250));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(error = ?err, "exercise aborted");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Tui, app: &mut App, events: &EventHandler) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => {
                let wants_print = app.alert.is_none()
                    && app.screen == AppScreen::Certificate
                    && key.code == KeyCode::Char('p');
                if wants_print {
                    print_certificate(terminal, app, events)?;
                } else {
                    handle_key(app, key);
                }
            }
            AppEvent::Tick => app.expire_status(),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Show only the certificate on the plain terminal screen, save a copy, and
/// bring the exercise back once the user is done.
fn print_certificate(terminal: &mut Tui, app: &mut App, events: &EventHandler) -> Result<()> {
    let Some(certificate) = app.certificate.clone() else {
        return Ok(());
    };
    let width = terminal.size()?.width.clamp(40, 72) as usize;

    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        Clear(ClearType::All),
        MoveTo(0, 0)
    )?;
    let saved = app.save_certificate_copy();
    {
        let mut out = io::stdout();
        out.write_all(certificate.to_text(width).replace('\n', "\r\n").as_bytes())?;
        if let Some(path) = saved {
            write!(out, "\r\nSaved to {}\r\n", path.display())?;
        }
        write!(out, "\r\n[Enter] Back to parsons\r\n")?;
        out.flush()?;
    }

    loop {
        let key = events.next_key()?;
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q')) {
            break;
        }
    }

    execute!(terminal.backend_mut(), EnterAlternateScreen)?;
    terminal.clear()?;
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    if app.alert.is_some() {
        app.dismiss_alert();
        return;
    }

    match app.screen {
        AppScreen::NamePrompt => handle_name_key(app, key),
        AppScreen::Board => handle_board_key(app, key),
        AppScreen::Certificate => handle_certificate_key(app, key),
    }
}

fn handle_name_key(app: &mut App, key: KeyEvent) {
    use ui::line_input::InputResult;

    match app.name_input.handle(key) {
        InputResult::Submit => app.submit_name(),
        InputResult::Cancel | InputResult::Continue => {}
    }
}

fn handle_board_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Esc => app.cancel_drag(),
        KeyCode::Up | KeyCode::Char('k') => app.cursor_up(),
        KeyCode::Down | KeyCode::Char('j') => app.cursor_down(),
        KeyCode::Left | KeyCode::Char('h') => app.focus_zone(Zone::Available),
        KeyCode::Right | KeyCode::Char('l') => app.focus_zone(Zone::Solution),
        KeyCode::Tab | KeyCode::BackTab => app.toggle_focus(),
        KeyCode::Enter | KeyCode::Char(' ') => app.activate(),
        KeyCode::Char('a') => app.send_highlighted(Zone::Available),
        KeyCode::Char('r') => app.send_highlighted(Zone::Solution),
        KeyCode::Char('c') => app.check(),
        KeyCode::Char('n') => app.next_problem(),
        KeyCode::Char('p') => app.prev_problem(),
        _ => {}
    }
}

fn handle_certificate_key(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
        app.should_quit = true;
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::NamePrompt => {
            // The first problem stays hidden until a name is chosen.
            let header = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(0)])
                .split(area)[0];
            render_header(frame, app, header);
            let popup = centered_rect(50, 40, area);
            frame.render_widget(
                NamePrompt::new(&app.name_input, &app.config.placeholder_name, app.theme),
                popup,
            );
        }
        AppScreen::Board => render_board(frame, app),
        AppScreen::Certificate => render_certificate(frame, app),
    }

    if let Some(ref message) = app.alert {
        let popup = centered_rect(60, 30, area);
        frame.render_widget(Alert::new(message, app.theme), popup);
    }
}

fn render_board(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let session = &app.session;
    let problem = session.current_problem();

    let prompt_text = problem.map_or("No problems loaded.", |p| p.prompt.as_str());
    let prompt_lines = wrapped_line_count(prompt_text, area.width.saturating_sub(2) as usize);

    let hints: &[&str] = if session.has_problems() {
        &[
            "[\u{2191}\u{2193}] Move",
            "[\u{2190}\u{2192}/Tab] Column",
            "[Space] Pick up/drop",
            "[a/r] Add/return",
            "[Esc] Cancel",
            "[c] Check",
            "[p/n] Prev/next",
            "[q] Quit",
        ]
    } else {
        &["[q] Quit"]
    };
    let footer_lines = pack_hint_lines(hints, area.width as usize);
    let layout = BoardLayout::new(area, prompt_lines as u16, footer_lines.len() as u16);

    render_header(frame, app, layout.header);

    // Prompt
    let prompt = Paragraph::new(Span::styled(
        prompt_text,
        Style::default()
            .fg(colors.fg())
            .add_modifier(Modifier::BOLD),
    ))
    .wrap(Wrap { trim: false })
    .block(
        Block::bordered()
            .title(" Task ")
            .border_style(Style::default().fg(colors.border())),
    );
    frame.render_widget(prompt, layout.prompt);

    // Columns
    let board = session.board();
    let drag = session.drag();
    let carrying = drag.is_some();
    let interactive = app.screen == AppScreen::Board && session.has_problems();
    for (zone, rect) in [
        (Zone::Available, layout.available),
        (Zone::Solution, layout.solution),
    ] {
        let dragged = drag.filter(|d| d.from == zone).map(|d| d.index);
        let column = BlockColumn::new(zone, board.zone(zone), app.theme)
            .cursor(app.cursor(zone), interactive && app.focus == zone)
            .drag(dragged, carrying);
        frame.render_widget(column, rect);
    }

    // Feedback and navigation
    let nav = session.nav();
    let enabled = |on: bool| {
        if on {
            Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.muted())
        }
    };
    let mut status = vec![Span::styled(" [p] \u{25c0} Prev ", enabled(nav.prev_enabled))];
    if nav.next_visible {
        status.push(Span::styled(" [n] Next \u{25b6} ", enabled(nav.next_enabled)));
    }
    status.push(Span::raw("  "));
    match session.feedback() {
        Some(feedback) => {
            let color = match feedback {
                Feedback::Correct => colors.success(),
                Feedback::NotQuite => colors.error(),
            };
            status.push(Span::styled(
                feedback.message(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ));
        }
        None => {
            if let Some(message) = app.status_message() {
                status.push(Span::styled(message, Style::default().fg(colors.warning())));
            }
        }
    }
    let status_bar = Paragraph::new(Line::from(status)).block(
        Block::bordered().border_style(Style::default().fg(colors.border())),
    );
    frame.render_widget(status_bar, layout.status);

    let footer = Paragraph::new(
        footer_lines
            .into_iter()
            .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.muted()))))
            .collect::<Vec<_>>(),
    );
    frame.render_widget(footer, layout.footer);
}

/// Title, position, name and the "k/n solved" bar.
fn render_header(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let colors = &app.theme.colors;
    let session = &app.session;
    let header_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
        .split(area);
    let position = if session.has_problems() {
        format!(
            " Problem {} of {} ",
            session.current_index() + 1,
            session.problems().len()
        )
    } else {
        String::new()
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " parsons ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            position,
            Style::default().fg(colors.accent()).bg(colors.header_bg()),
        ),
        Span::styled(
            format!("| {} ", app.display_name()),
            Style::default().fg(colors.muted()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, header_rows[0]);
    frame.render_widget(
        ProgressBar::new(session.solved_count(), session.problems().len(), app.theme),
        header_rows[1],
    );
}

fn render_certificate(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    if let Some(ref certificate) = app.certificate {
        let card = centered_rect(70, 70, rows[0]);
        frame.render_widget(CertificateView::new(certificate, app.theme), card);
    }

    let status = app.status_message().unwrap_or("");
    frame.render_widget(
        Paragraph::new(Span::styled(status, Style::default().fg(colors.warning()))),
        rows[1],
    );
    frame.render_widget(
        Paragraph::new(Span::styled(
            "  [p] Print certificate  [q] Quit",
            Style::default().fg(colors.accent()),
        )),
        rows[2],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{Block as CodeBlock, Problem, ProblemSet};
    use ratatui::backend::TestBackend;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buf = terminal.backend().buffer();
        (0..buf.area.height)
            .map(|y| {
                (0..buf.area.width)
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn first_run_app() -> App {
        let set = ProblemSet {
            problems: vec![Problem {
                prompt: "Sort the widgets".to_string(),
                blocks: vec![CodeBlock::correct("widgets.sort()")],
                distractors: vec![CodeBlock::distractor("widgets.shuffle()")],
            }],
        };
        App::new(Config::default(), None, Ok(set), SmallRng::seed_from_u64(1))
    }

    #[test]
    fn test_name_prompt_hides_first_problem_until_submitted() {
        let mut app = first_run_app();
        assert_eq!(app.screen, AppScreen::NamePrompt);

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("What is your name?"));
        assert!(!text.contains("Sort the widgets"));
        assert!(!text.contains("widgets.sort()"));
        assert!(!text.contains("widgets.shuffle()"));

        app.submit_name();
        terminal.draw(|frame| render(frame, &app)).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("Sort the widgets"));
        assert!(text.contains("widgets.sort()"));
        assert!(text.contains("widgets.shuffle()"));
    }
}
