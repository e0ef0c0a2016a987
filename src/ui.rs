use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use currency_basics::app::{HomeAction, HomeScreen, APP_TITLE, LOADING_LABEL};
use currency_basics::currency::CurrencyCategory;
use currency_basics::list_view::{CurrencyListView, CLEAR_SYMBOL, SEARCH_PLACEHOLDER};
use currency_basics::CurrencyFeed;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use std::io;
use tokio::runtime::Runtime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App<F> {
    pub home: HomeScreen<F>,
    pub selected_button: usize,
    /// Keystrokes go to the modal's search box
    pub search_focused: bool,
}

impl<F: CurrencyFeed> App<F> {
    pub fn new(home: HomeScreen<F>) -> Self {
        Self {
            home,
            selected_button: 0,
            search_focused: false,
        }
    }

    fn next_button(&mut self) {
        self.selected_button = (self.selected_button + 1) % HomeAction::BUTTONS.len();
    }

    fn previous_button(&mut self) {
        self.selected_button = match self.selected_button {
            0 => HomeAction::BUTTONS.len() - 1,
            i => i - 1,
        };
    }

    fn press(&mut self, action: HomeAction) {
        self.home.request(action);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Flow::Quit;
        }

        // Any key dismisses an open notice
        if self.home.notice().is_some() {
            self.home.dismiss_notice();
            return Flow::Continue;
        }

        if self.home.modal().is_some() {
            self.handle_modal_key(key);
            return Flow::Continue;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Flow::Quit,
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => self.next_button(),
            KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => self.previous_button(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.press(HomeAction::BUTTONS[self.selected_button]);
            }
            KeyCode::Char(c @ '1'..='5') => {
                let index = c as usize - '1' as usize;
                self.selected_button = index;
                self.press(HomeAction::BUTTONS[index]);
            }
            KeyCode::Char('r') => self.press(HomeAction::RefreshStatus),
            _ => {}
        }

        Flow::Continue
    }

    fn handle_modal_key(&mut self, key: KeyEvent) {
        let focused = self.search_focused;
        let Some(view) = self.home.modal_mut() else {
            return;
        };

        match key.code {
            KeyCode::Down => view.next(),
            KeyCode::Up => view.previous(),
            KeyCode::PageDown => view.page_down(),
            KeyCode::PageUp => view.page_up(),
            KeyCode::Char(c) if focused => view.push_char(c),
            KeyCode::Backspace if focused => view.pop_char(),
            KeyCode::Enter | KeyCode::Tab if focused => self.search_focused = false,
            // The clear button
            KeyCode::Esc if view.show_clear_button() => {
                view.clear_search();
                self.search_focused = false;
            }
            KeyCode::Char('/') | KeyCode::Char('s') => {
                view.focus_search();
                self.search_focused = true;
            }
            KeyCode::Char('x') => view.clear_search(),
            KeyCode::Char('j') => view.next(),
            KeyCode::Char('k') => view.previous(),
            KeyCode::Home => view.first(),
            KeyCode::End => view.last(),
            KeyCode::Esc | KeyCode::Char('q') => {
                self.home.close_modal();
                self.search_focused = false;
            }
            _ => {}
        }
    }
}

pub fn run_ui<F: CurrencyFeed>(app: &mut App<F>, runtime: &Runtime) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app, runtime);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.map_err(Into::into)
}

fn run_app<B: ratatui::backend::Backend, F: CurrencyFeed>(
    terminal: &mut Terminal<B>,
    app: &mut App<F>,
    runtime: &Runtime,
) -> io::Result<()> {
    runtime.block_on(app.home.check_server_status());

    loop {
        terminal.draw(|f| ui(f, app))?;

        // The frame above showed the loading state; now do the work
        if app.home.is_loading() {
            runtime.block_on(app.home.run_pending());
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.handle_key(key) == Flow::Quit {
                return Ok(());
            }
        }
    }
}

fn ui<F: CurrencyFeed>(f: &mut Frame, app: &App<F>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Title + status
            Constraint::Min(0),    // Buttons
            Constraint::Length(3), // Key hints
        ])
        .split(f.size());

    render_header(f, chunks[0], app);
    render_buttons(f, chunks[1], app);
    render_status_bar(f, chunks[2], app);

    if let Some(view) = app.home.modal() {
        render_list_modal(f, centered_rect(80, 85, f.size()), view, app.search_focused);
    }

    if let Some(notice) = app.home.notice() {
        let area = centered_rect(50, 30, f.size());
        let color = if notice.is_error { Color::Red } else { Color::Green };

        let popup = Paragraph::new(vec![
            Line::from(""),
            Line::from(notice.message.as_str()),
            Line::from(""),
            Line::from(Span::styled(
                "Press any key",
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            )),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(format!(" {} ", notice.title)),
        );

        f.render_widget(Clear, area);
        f.render_widget(popup, area);
    }
}

fn render_header<F: CurrencyFeed>(f: &mut Frame, area: Rect, app: &App<F>) {
    let server_color = match app.home.server_status() {
        currency_basics::ServerStatus::Online => Color::Green,
        currency_basics::ServerStatus::Offline => Color::Red,
        currency_basics::ServerStatus::Checking => Color::Yellow,
    };

    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            APP_TITLE,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(app.home.status_line(), Style::default().fg(server_color))),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn button_color(action: HomeAction) -> Color {
    match action {
        HomeAction::ClearDatabase => Color::Red,
        HomeAction::InsertData => Color::Green,
        HomeAction::ShowList(CurrencyCategory::Crypto) => Color::Blue,
        HomeAction::ShowList(CurrencyCategory::Fiat) => Color::Yellow,
        HomeAction::ShowList(CurrencyCategory::All) => Color::Magenta,
        HomeAction::RefreshStatus => Color::Cyan,
    }
}

fn render_buttons<F: CurrencyFeed>(f: &mut Frame, area: Rect, app: &App<F>) {
    let loading = app.home.is_loading();
    let mut lines = vec![Line::from("")];

    for (i, action) in HomeAction::BUTTONS.iter().enumerate() {
        let label = if loading { LOADING_LABEL } else { action.label() };
        let color = if loading { Color::DarkGray } else { button_color(*action) };

        let style = if i == app.selected_button {
            Style::default()
                .fg(Color::Black)
                .bg(color)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color)
        };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", i + 1), Style::default().fg(Color::Yellow)),
            Span::styled(format!("  {:<20}", label), style),
        ]));
        lines.push(Line::from(""));
    }

    let buttons = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" Actions "));

    f.render_widget(buttons, area);
}

fn render_status_bar<F: CurrencyFeed>(f: &mut Frame, area: Rect, app: &App<F>) {
    let mut spans = vec![];

    let hints: &[(&str, &str)] = if app.home.modal().is_some() {
        if app.search_focused {
            &[("type", " Search"), ("Enter", " Done"), ("Esc", " Clear")]
        } else {
            &[
                ("/", " Search"),
                ("↑/↓", " Nav"),
                ("x", " Clear"),
                ("Esc", " Back"),
            ]
        }
    } else {
        &[
            ("↑/↓", " Select"),
            ("Enter", " Press"),
            ("1-5", " Shortcut"),
            ("r", " Refresh"),
            ("q", " Quit"),
        ]
    };

    for (i, (key, text)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" | "));
        }
        spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(*text));
    }

    let status_bar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn render_list_modal(f: &mut Frame, area: Rect, view: &CurrencyListView, search_focused: bool) {
    f.render_widget(Clear, area);

    let outer = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", view.title()));
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(inner);

    render_search_box(f, chunks[0], view, search_focused);

    match view.empty_state() {
        Some(empty) => {
            let message = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    empty.headline(),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(empty.hint(), Style::default().fg(Color::DarkGray))),
            ])
            .alignment(Alignment::Center);

            f.render_widget(message, chunks[1]);
        }
        None => render_currency_table(f, chunks[1], view),
    }
}

fn render_search_box(f: &mut Frame, area: Rect, view: &CurrencyListView, focused: bool) {
    let mut spans = if view.query().is_empty() {
        vec![Span::styled(SEARCH_PLACEHOLDER, Style::default().fg(Color::DarkGray))]
    } else {
        vec![Span::raw(view.query().to_string())]
    };

    if focused {
        spans.push(Span::styled("▏", Style::default().fg(Color::Yellow)));
    }

    let mut chunks = vec![area];
    if view.show_clear_button() {
        chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(5)])
            .split(area)
            .to_vec();
    }

    let border = if focused { Color::Yellow } else { Color::Gray };
    let input = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(border)));
    f.render_widget(input, chunks[0]);

    if let Some(&clear_area) = chunks.get(1) {
        let clear = Paragraph::new(CLEAR_SYMBOL)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(clear, clear_area);
    }
}

fn render_currency_table(f: &mut Frame, area: Rect, view: &CurrencyListView) {
    let header_cells = ["Name", "Symbol", "Code"].iter().map(|h| {
        Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = view.filtered().iter().map(|record| {
        Row::new(vec![
            Cell::from(truncate(&record.name, 40)),
            Cell::from(truncate(&record.symbol, 10)).style(Style::default().fg(Color::Cyan)),
            Cell::from(record.code.clone().unwrap_or_default()),
        ])
        .height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(42),
            Constraint::Length(12),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::TOP)
            .title(format!(" {}/{} ", view.filtered().len(), view.records().len())),
    )
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    let mut state = TableState::default();
    state.select(view.selected());
    f.render_stateful_widget(table, area, &mut state);
}

/// Rectangle centered in `area`, sized in percent
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use currency_basics::{
        ApiError, CurrencyCatalog, CurrencyRecord, CurrencySource, SnapshotStore,
    };

    struct StaticFeed;

    #[async_trait]
    impl CurrencyFeed for StaticFeed {
        async fn fetch_catalog(&self) -> std::result::Result<CurrencyCatalog, ApiError> {
            Ok(CurrencyCatalog::new(
                vec![
                    CurrencyRecord::new("BTC", "Bitcoin", "BTC"),
                    CurrencyRecord::new("BCH", "Bitcoin Cash", "BCH"),
                    CurrencyRecord::new("ETH", "Ethereum", "ETH"),
                ],
                vec![CurrencyRecord::new("USD", "US Dollar", "$").with_code("USD")],
            ))
        }

        async fn is_available(&self) -> bool {
            true
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn create_test_app() -> (App<StaticFeed>, Runtime) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let source = CurrencySource::open(SnapshotStore::open_in_memory().unwrap(), StaticFeed).unwrap();
        (App::new(HomeScreen::new(source)), runtime)
    }

    #[test]
    fn test_button_navigation_wraps() {
        let (mut app, _runtime) = create_test_app();

        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.selected_button, HomeAction::BUTTONS.len() - 1);
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.selected_button, 0);
    }

    #[test]
    fn test_insert_then_search_flow() {
        let (mut app, runtime) = create_test_app();

        // Insert Data
        app.handle_key(key(KeyCode::Char('2')));
        assert!(app.home.is_loading());
        runtime.block_on(app.home.run_pending());
        assert_eq!(app.home.database_count(), 4);

        // Dismiss the notice, open the purchasable list
        app.handle_key(key(KeyCode::Char('z')));
        app.handle_key(key(KeyCode::Char('5')));
        runtime.block_on(app.home.run_pending());
        assert!(app.home.modal().is_some());

        // Focus search and type
        app.handle_key(key(KeyCode::Char('/')));
        for c in "bit".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        let view = app.home.modal().unwrap();
        assert_eq!(view.query(), "bit");
        assert_eq!(view.filtered().len(), 2);

        // Esc is the clear button while the search is in use
        app.handle_key(key(KeyCode::Esc));
        let view = app.home.modal().unwrap();
        assert_eq!(view.query(), "");
        assert_eq!(view.filtered().len(), 4);
        assert!(!app.search_focused);

        // Esc again closes the modal
        app.handle_key(key(KeyCode::Esc));
        assert!(app.home.modal().is_none());
    }

    #[test]
    fn test_keys_ignored_while_loading() {
        let (mut app, runtime) = create_test_app();

        app.handle_key(key(KeyCode::Char('2')));
        app.handle_key(key(KeyCode::Char('1')));

        let notice = runtime.block_on(app.home.run_pending()).unwrap();
        assert_eq!(notice.title, "Data Inserted");
    }

    #[test]
    fn test_quit_keys() {
        let (mut app, _runtime) = create_test_app();

        assert_eq!(app.handle_key(key(KeyCode::Char('q'))), Flow::Quit);
        assert_eq!(
            app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Flow::Quit
        );
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("Bitcoin", 10), "Bitcoin");
        assert_eq!(truncate("€€€€€€€€", 5), "€€...");
    }
}
