use currency_converter::amount::format_rate;
use currency_converter::{AmountRow, ConverterError, Session, SessionStatus, Side};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    SourceAmount,
    SourceCurrency,
    TargetAmount,
    TargetCurrency,
}

impl Focus {
    pub fn next(&self) -> Self {
        match self {
            Focus::SourceAmount => Focus::SourceCurrency,
            Focus::SourceCurrency => Focus::TargetAmount,
            Focus::TargetAmount => Focus::TargetCurrency,
            Focus::TargetCurrency => Focus::SourceAmount,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Focus::SourceAmount => Focus::TargetCurrency,
            Focus::SourceCurrency => Focus::SourceAmount,
            Focus::TargetAmount => Focus::SourceCurrency,
            Focus::TargetCurrency => Focus::TargetAmount,
        }
    }

    pub fn side(&self) -> Side {
        match self {
            Focus::SourceAmount | Focus::SourceCurrency => Side::Source,
            Focus::TargetAmount | Focus::TargetCurrency => Side::Target,
        }
    }

    pub fn is_amount(&self) -> bool {
        matches!(self, Focus::SourceAmount | Focus::TargetAmount)
    }
}

pub struct App {
    pub status: SessionStatus,
    pub focus: Focus,
    pub message: Option<String>,
}

impl App {
    pub fn new(status: SessionStatus) -> Self {
        // Surface a problem with the default pair right away
        let message = status
            .session()
            .and_then(|s| s.state().last_error())
            .map(|e| e.to_string());

        Self {
            status,
            focus: Focus::SourceAmount,
            message,
        }
    }

    pub fn next_focus(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn previous_focus(&mut self) {
        self.focus = self.focus.previous();
    }

    fn apply(&mut self, change: impl FnOnce(&mut Session) -> Result<(), ConverterError>) {
        if let Some(session) = self.status.session_mut() {
            self.message = change(session).err().map(|e| e.to_string());
        }
    }

    /// Typing extends the field the user last typed into.
    /// The first keystroke in the derived field replaces its rounded text.
    pub fn type_char(&mut self, c: char) {
        if !self.focus.is_amount() || !(c.is_ascii_digit() || c == '.') {
            return;
        }

        let side = self.focus.side();
        self.apply(|session| {
            let row = session.row(side);
            let mut text = if row.is_authoritative(session.state()) {
                row.amount
            } else {
                String::new()
            };
            text.push(c);
            session.edit(side, text)
        });
    }

    pub fn backspace(&mut self) {
        if !self.focus.is_amount() {
            return;
        }

        let side = self.focus.side();
        self.apply(|session| {
            let mut text = session.row(side).amount;
            text.pop();
            session.edit(side, text)
        });
    }

    pub fn clear_amount(&mut self) {
        if !self.focus.is_amount() {
            return;
        }

        let side = self.focus.side();
        self.apply(|session| session.edit(side, ""));
    }

    pub fn cycle_currency(&mut self, step: isize) {
        if self.focus.is_amount() {
            return;
        }

        let side = self.focus.side();
        self.apply(|session| session.cycle_currency(side, step));
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(())
                }
                KeyCode::Tab => app.next_focus(),
                KeyCode::BackTab => app.previous_focus(),
                KeyCode::Down | KeyCode::Char('j') => app.cycle_currency(1),
                KeyCode::Up | KeyCode::Char('k') => app.cycle_currency(-1),
                KeyCode::Backspace => app.backspace(),
                KeyCode::Delete => app.clear_amount(),
                KeyCode::Char(c) => app.type_char(c),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Converter rows
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match &app.status {
        SessionStatus::Ready(session) => render_converter(f, chunks[1], app, session),
        SessionStatus::Failed(err) => render_load_error(f, chunks[1], err),
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        " 💱 Currency Converter ",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];

    if let Some(session) = app.status.session() {
        if let Some(rates) = session.rates() {
            spans.push(Span::raw(" │ Base: "));
            spans.push(Span::styled(
                rates.base.to_string(),
                Style::default().fg(Color::Yellow),
            ));

            let as_of = rates
                .as_of()
                .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
                .unwrap_or_else(|| "unknown".to_string());
            spans.push(Span::raw(" │ Rates as of: "));
            spans.push(Span::styled(as_of, Style::default().fg(Color::White)));
        }

        spans.push(Span::raw(" │ Loaded: "));
        spans.push(Span::styled(
            session.loaded_at().format("%H:%M:%S").to_string(),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn render_converter(f: &mut Frame, area: Rect, app: &App, session: &Session) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Source row
            Constraint::Length(3), // Target row
            Constraint::Length(3), // Rate line
            Constraint::Min(0),
        ])
        .split(area);

    render_row(f, chunks[0], app, session, &session.row(Side::Source));
    render_row(f, chunks[1], app, session, &session.row(Side::Target));
    render_rate_line(f, chunks[2], session);
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    }
}

fn render_row(f: &mut Frame, area: Rect, app: &App, session: &Session, row: &AmountRow) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let (amount_focus, currency_focus) = match row.side {
        Side::Source => (Focus::SourceAmount, Focus::SourceCurrency),
        Side::Target => (Focus::TargetAmount, Focus::TargetCurrency),
    };

    // Typed field in green, derived field dimmed
    let amount_style = if row.is_authoritative(session.state()) {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Gray)
    };

    let mut amount_spans = vec![Span::styled(format!(" {}", row.amount), amount_style)];
    if app.focus == amount_focus {
        amount_spans.push(Span::styled("▏", Style::default().fg(Color::Yellow)));
    }

    let amount = Paragraph::new(Line::from(amount_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(focus_style(app.focus == amount_focus))
            .title(format!(" {} amount ", row.side.label())),
    );
    f.render_widget(amount, chunks[0]);

    let currency_text = match row.selected_currency {
        Some(code) => Line::from(vec![
            Span::styled(
                format!(" {} ", code),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(row.display_name().unwrap_or("")),
        ]),
        None => Line::from(Span::styled(
            " (no currency)",
            Style::default().fg(Color::DarkGray),
        )),
    };

    let currency = Paragraph::new(currency_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(focus_style(app.focus == currency_focus))
            .title(format!(" {} currency ({} available) ", row.side.label(), row.catalog.len())),
    );
    f.render_widget(currency, chunks[1]);
}

fn render_rate_line(f: &mut Frame, area: Rect, session: &Session) {
    let state = session.state();

    let line = match (state.source_code(), state.target_code(), state.current_rate()) {
        (Some(source), Some(target), Some(rate)) => Line::from(vec![
            Span::raw(format!("  1 {} = ", source)),
            Span::styled(format_rate(rate), Style::default().fg(Color::Yellow)),
            Span::raw(format!(" {}", target)),
        ]),
        _ => Line::from(Span::styled(
            "  Rate unavailable",
            Style::default().fg(Color::Red),
        )),
    };

    f.render_widget(Paragraph::new(line), area);
}

fn load_error_hint(err: &ConverterError) -> &'static str {
    if err.is_terminal() {
        "  Check that the rates server is running, then restart."
    } else {
        "  The loaded data cannot be used for conversion."
    }
}

fn render_load_error(f: &mut Frame, area: Rect, err: &ConverterError) {
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Could not load currency data",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::raw(format!("  {}", err))),
        Line::from(""),
        Line::from(Span::styled(
            load_error_hint(err),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )),
    ];

    let panel = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title(" Error "),
    );

    f.render_widget(panel, area);
}

const KEY_HINTS: &str = concat!(
    " Tab: next field │ ↑/↓: change currency │ 0-9 .: type amount",
    " │ Backspace/Del: edit │ q: quit"
);

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let line = match (&app.message, &app.status) {
        (Some(message), _) => Line::from(Span::styled(
            format!(" ⚠ {}", message),
            Style::default().fg(Color::Red),
        )),
        (None, SessionStatus::Failed(_)) => Line::from(Span::styled(
            " q: quit",
            Style::default().fg(Color::DarkGray),
        )),
        (None, SessionStatus::Ready(_)) => Line::from(Span::styled(
            KEY_HINTS,
            Style::default().fg(Color::DarkGray),
        )),
    };

    let status = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );

    f.render_widget(status, area);
}
