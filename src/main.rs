use std::io;
use std::time::{Duration, Instant};

use chrono::Utc;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use matchup_terminal::sample;
use matchup_terminal::state::{AppState, Category, FIELDS, recency_label};

struct App {
    state: AppState,
    should_quit: bool,
}

impl App {
    fn new() -> Self {
        let mut state = AppState::new();
        state.push_log("[INFO] Welcome to Matchup Terminal");
        Self {
            state,
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.editing {
            match key.code {
                KeyCode::Enter => self.state.commit_edit(),
                KeyCode::Esc => self.state.cancel_edit(),
                KeyCode::Backspace => self.state.backspace(),
                KeyCode::Char(c) => self.state.input_char(c),
                _ => {}
            }
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Esc => self.state.help_overlay = false,
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Enter => self.state.begin_edit(),
            KeyCode::Char(' ') => self.state.cycle_selected(),
            KeyCode::Char('a') => match self.state.selected_field().category() {
                Some(category) => self.state.submit_category(category),
                None => self
                    .state
                    .push_log("[INFO] Select a score row to add matches"),
            },
            KeyCode::Char('r') => self.state.run_prediction(),
            KeyCode::Char('s') => {
                let scenario = sample::sample_scenario(self.state.sport);
                self.state.load_scenario(scenario);
            }
            KeyCode::Char('d') => {
                let scenario = sample::random_scenario(self.state.sport, &mut rand::thread_rng());
                self.state.load_scenario(scenario);
            }
            KeyCode::Char('c') => self.state.request_clear(),
            _ => {}
        }
    }
}

fn main() -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new();
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.size());

    let header =
        Paragraph::new(header_text(&app.state)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(46), Constraint::Min(30)])
        .split(chunks[1]);

    render_form(frame, body[0], &app.state);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Min(8)])
        .split(body[1]);
    render_matches(frame, right[0], &app.state);
    render_results(frame, right[1], &app.state);

    let footer =
        Paragraph::new(footer_text(&app.state)).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let title = format!(
        "MATCHUP TERMINAL | {} | {} vs {} | {} matches entered",
        state.sport.label(),
        state.team1_label(),
        state.team2_label(),
        state.store.total_matches()
    );
    let line1 = format!("  _/\\_  {title}");
    let line2 = " (o  o)".to_string();
    format!("{line1}\n{line2}")
}

fn footer_text(state: &AppState) -> String {
    let hints = if state.editing {
        "Enter Commit | Esc Cancel | Backspace Delete".to_string()
    } else {
        "j/k Move | Enter Edit | Space Cycle | a Add scores | r Predict | s Sample | d Demo | c Clear | ? Help | q Quit"
            .to_string()
    };
    let last_log = state.logs.back().cloned().unwrap_or_default();
    format!("{hints}\n{last_log}")
}

fn render_form(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().borders(Borders::ALL).title("Setup");
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    let visible = inner.height as usize;
    let (start, end) = visible_range(state.selected, FIELDS.len(), visible);

    for (row, idx) in (start..end).enumerate() {
        let field = FIELDS[idx];
        let selected = idx == state.selected;
        let row_area = Rect {
            x: inner.x,
            y: inner.y + row as u16,
            width: inner.width,
            height: 1,
        };

        let style = if selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };

        let mut value = state.field_value(field);
        if selected && state.editing {
            value.push('_');
        }
        let marker = if field.is_cycle() { "~" } else { " " };
        let text = format!("{marker}{:<24} {value}", state.field_label(field));
        frame.render_widget(Paragraph::new(text).style(style), row_area);
    }
}

fn render_matches(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().borders(Borders::ALL).title("Match Data");
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    if state.store.is_empty() {
        let empty = Paragraph::new("No matches added yet")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let team1 = state.team1_label();
    let team2 = state.team2_label();
    let now = Utc::now();
    let mut lines: Vec<Line> = Vec::new();
    let sections = [
        (Category::H2h, "Head-to-Head".to_string(), team1.clone(), team2.clone()),
        (Category::Team1, format!("Recent Form: {team1}"), team1.clone(), "Opponent".to_string()),
        (Category::Team2, format!("Recent Form: {team2}"), "Opponent".to_string(), team2.clone()),
    ];
    for (category, heading, left, right) in sections {
        let records = state.store.records(category);
        if records.is_empty() {
            continue;
        }
        lines.push(Line::styled(
            format!("{heading} ({})", records.len()),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        for record in records {
            lines.push(Line::raw(format!(
                "  {left} {} - {} {right}  {}  {}",
                fmt_score(record.team1_score),
                fmt_score(record.team2_score),
                record.outcome.label(&team1, &team2),
                recency_label(record.timestamp, now),
            )));
        }
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_results(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().borders(Borders::ALL).title("Prediction");
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    let Some(prediction) = &state.last_prediction else {
        let empty = Paragraph::new("Press r to run a prediction")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    };

    let team1 = state.team1_label();
    let team2 = state.team2_label();
    let probs = &prediction.probabilities;

    let mut lines = vec![
        Line::styled(
            format!(
                "{team1} {} - {} {team2}   (confidence {:.1}%)",
                prediction.team1_score,
                prediction.team2_score,
                probs.confidence()
            ),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::raw(format!(
            "{team1} {:.1}% | Draw {:.1}% | {team2} {:.1}%",
            probs.team1, probs.draw, probs.team2
        )),
        Line::raw(format!(
            "Projected total {:.2} | margin {:+.2}",
            prediction.projected_total, prediction.projected_margin
        )),
    ];

    if let Some(ou) = &prediction.over_under {
        lines.push(Line::raw(format!(
            "Total: {} ({:.1}% over)  EV {:+.2} flat / {:+.2} priced",
            ou.recommendation, ou.prob_over, ou.ev_without_odds, ou.ev_with_odds
        )));
    }
    if let Some(spread) = &prediction.spread {
        lines.push(Line::raw(format!(
            "Spread: {} ({:.1}% cover)  EV {:+.2} flat / {:+.2} priced",
            spread.recommendation,
            spread.prob_cover,
            spread.ev_without_odds,
            spread.ev_with_odds
        )));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let width = area.width.min(56);
    let height = area.height.min(15);
    let overlay = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };
    frame.render_widget(Clear, overlay);

    let text = "j/k or arrows   move between fields\n\
                Enter           edit the field (Enter again commits)\n\
                Space           cycle sport/importance/location/favorite\n\
                a               add the focused category's score lists\n\
                r               run the prediction\n\
                s               load the sample matchup for this sport\n\
                d               load a randomized demo matchup\n\
                c               clear all match data (press twice)\n\
                q               quit\n\n\
                Scores are comma separated, e.g. 2,1,0. The\n\
                two lists of a category pair up match by match.";
    let help = Paragraph::new(text).block(Block::default().borders(Borders::ALL).title("Help"));
    frame.render_widget(help, overlay);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if visible == 0 || total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }
    let half = visible / 2;
    let start = selected.saturating_sub(half).min(total - visible);
    (start, start + visible)
}

fn fmt_score(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v}")
    }
}
