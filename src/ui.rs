use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use mix_estimate::app::{App, CatalogRow, Focus, Notice, View};
use mix_estimate::content;
use mix_estimate::pricing::{format_amount, line_total};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

const TICK: Duration = Duration::from_millis(100);

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

    if let Err(err) = &res {
        tracing::error!(error = %err, "terminal UI stopped with an error");
    }

    Ok(res?)
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        app.tick();
        terminal.draw(|f| ui(f, app))?;

        // Poll so a finished export shows up without a keypress
        if !event::poll(TICK)? {
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if handle_key(app, key) {
            return Ok(());
        }
    }
}

/// Apply one key press; returns true when the UI should quit
fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    // Confirmation prompt takes every key while open
    if app.is_confirming_export() {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                app.confirm_export();
            }
            KeyCode::Char('n') | KeyCode::Esc => app.dismiss_export(),
            _ => {}
        }
        return false;
    }

    // So does the export notice
    if app.notice().is_some() {
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ') => app.dismiss_notice(),
            _ => {}
        }
        return false;
    }

    let home = app.view() == View::Home;
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.previous_view();
            } else {
                app.next_view();
            }
        }
        KeyCode::BackTab => app.previous_view(),
        KeyCode::Char('1') => app.set_view(View::Home),
        KeyCode::Char('2') => app.set_view(View::Portfolio),
        KeyCode::Char('3') => app.set_view(View::System),
        KeyCode::Char('4') => app.set_view(View::Guide),
        KeyCode::Char('e') => app.request_export(),
        KeyCode::Char('c') => app.clear(),
        KeyCode::Char('s') if home => app.toggle_focus(),
        KeyCode::Down | KeyCode::Char('j') if home => app.next_row(),
        KeyCode::Up | KeyCode::Char('k') if home => app.previous_row(),
        KeyCode::Enter | KeyCode::Char(' ') if home => app.activate(),
        KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Right if home => app.increment(),
        KeyCode::Char('-') | KeyCode::Left if home => app.decrement(),
        _ => {}
    }
    false
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.view() {
        View::Home => {
            let content_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Percentage(62), // Catalog
                    Constraint::Percentage(38), // Cart sidebar
                ])
                .split(chunks[1]);

            render_catalog(f, content_chunks[0], app);
            render_cart(f, content_chunks[1], app);
        }
        View::Portfolio => render_portfolio(f, chunks[1]),
        View::System => render_system(f, chunks[1]),
        View::Guide => render_guide(f, chunks[1]),
    }

    render_status_bar(f, chunks[2], app);

    if app.is_confirming_export() {
        render_confirmation(f, f.size());
    } else if let Some(notice) = app.notice() {
        render_notice(f, f.size(), notice);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let totals = app.totals();

    let mut tab_spans = vec![Span::styled(
        format!(" {} ", app.brand()),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )];
    tab_spans.push(Span::raw("  "));

    for (i, view) in View::ALL.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *view == app.view() {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(format!("{} {}", i + 1, view.title()), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("{} TRKS", totals.total_tracks),
        Style::default().fg(Color::Cyan),
    ));
    tab_spans.push(Span::raw("  "));
    tab_spans.push(Span::styled(
        format!("₩{}", format_amount(totals.total)),
        Style::default().fg(Color::Green),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn render_catalog(f: &mut Frame, area: Rect, app: &App) {
    let header_cells = ["", "Service", "Unit", "Price", "Qty"].iter().map(|h| {
        Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    });
    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let cart = app.cart();
    let rows = app.rows().into_iter().map(|row| match app.entry_for(row) {
        Some(entry) => {
            let quantity = cart.quantity_of(&entry.id);
            let marker = match row {
                CatalogRow::Base(_) if quantity > 0 => "◉",
                CatalogRow::Base(_) => "○",
                _ if quantity > 0 => "+",
                _ => " ",
            };
            let (price, qty) = if entry.is_included() {
                ("INCLUDED".to_string(), "-".to_string())
            } else {
                (format!("₩{}", format_amount(entry.price)), quantity.to_string())
            };
            let color = if quantity > 0 { Color::White } else { Color::Gray };

            Row::new(vec![
                Cell::from(marker).style(Style::default().fg(Color::Green)),
                Cell::from(truncate(&entry.name, 30)).style(Style::default().fg(color)),
                Cell::from(entry.unit.clone()),
                Cell::from(price),
                Cell::from(qty),
            ])
        }
        None => {
            let commercial = &app.catalog().commercial;
            let active = cart.is_commercial();
            Row::new(vec![
                Cell::from(if active { "$" } else { " " }).style(Style::default().fg(Color::Magenta)),
                Cell::from(commercial.name.clone()).style(Style::default().fg(Color::Magenta)),
                Cell::from(commercial.unit.clone()),
                Cell::from("x5.0 / x10.0"),
                Cell::from(if active { "ON" } else { "OFF" }),
            ])
        }
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(2),
            Constraint::Length(32),
            Constraint::Length(12),
            Constraint::Length(14),
            Constraint::Length(5),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Services & Options "),
    )
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    let mut state = TableState::default();
    state.select((app.focus() == Focus::Catalog).then_some(app.cursor()));
    f.render_stateful_widget(table, area, &mut state);

    // Description of the highlighted row, drawn over the table's bottom
    if let Some(row) = app.selected_row() {
        let (description, features) = match app.entry_for(row) {
            Some(entry) => (entry.description.clone(), entry.features.join(" · ")),
            None => (app.catalog().commercial.description.clone(), String::new()),
        };
        let height = 5.min(area.height.saturating_sub(2));
        let detail_area = Rect {
            x: area.x + 1,
            y: area.y + area.height.saturating_sub(height + 1),
            width: area.width.saturating_sub(2),
            height,
        };
        let mut lines: Vec<Line> = description
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(Color::DarkGray))))
            .collect();
        if !features.is_empty() {
            lines.push(Line::from(Span::styled(
                features,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            )));
        }
        f.render_widget(Clear, detail_area);
        f.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::TOP)),
            detail_area,
        );
    }
}

fn render_cart(f: &mut Frame, area: Rect, app: &App) {
    let cart = app.cart();
    let catalog = app.catalog();

    let focused = app.focus() == Focus::Cart;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused { Color::Green } else { Color::Yellow }))
        .title(if focused { " Estimate (editing) " } else { " Estimate " });

    if cart.is_empty() && !cart.is_commercial() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "  YOUR CART IS EMPTY",
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD),
            )),
        ])
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let totals = app.totals();
    let mut body = vec![Line::from("")];

    for (i, line) in cart.lines().iter().enumerate() {
        let name = catalog
            .get(&line.entry_id)
            .map(|e| e.name.as_str())
            .unwrap_or(line.entry_id.as_str());
        let selected = focused && i == app.cart_cursor();
        let name_style = if selected {
            Style::default().fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        body.push(Line::from(vec![
            Span::raw(if selected { "→ " } else { "  " }),
            Span::styled(truncate(name, 22), name_style),
            Span::styled("  [-] ", Style::default().fg(Color::DarkGray)),
            Span::styled(line.quantity.to_string(), Style::default().fg(Color::Cyan)),
            Span::styled(" [+]", Style::default().fg(Color::DarkGray)),
        ]));
        body.push(Line::from(vec![
            Span::raw("    "),
            Span::styled(
                format!("₩{}", format_amount(line_total(catalog, line))),
                Style::default().fg(Color::Gray),
            ),
        ]));
    }

    if cart.is_commercial() {
        body.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(
                catalog.commercial.name.clone(),
                Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}", catalog.commercial.unit),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
        body.push(Line::from(vec![
            Span::raw("    "),
            Span::styled(
                format!("+₩{}", format_amount(totals.commercial_surcharge)),
                Style::default().fg(Color::Magenta),
            ),
        ]));
    }

    body.push(Line::from(""));
    body.push(Line::from("  ─────────────────────────────"));
    body.push(Line::from(vec![
        Span::styled("  Total Tracks: ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw(format!("{} TRKS", totals.total_tracks)),
    ]));
    body.push(Line::from(vec![
        Span::styled("  Total: ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("₩{}", format_amount(totals.total)),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
    ]));
    body.push(Line::from(Span::styled(
        "  VAT included",
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
    )));
    body.push(Line::from(""));

    let export_line = if app.is_exporting() {
        Span::styled(
            "  ⏳ Generating PDF...",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled("  [e] Download PDF Estimate", Style::default().fg(Color::Yellow))
    };
    body.push(Line::from(export_line));
    body.push(Line::from(Span::styled("  [c] Clear All", Style::default().fg(Color::DarkGray))));

    f.render_widget(Paragraph::new(body).block(block), area);
}

fn section_lines(sections: &[content::Section]) -> Vec<Line<'static>> {
    let mut lines = vec![];
    for section in sections {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", section.title),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )));
        for item in section.items {
            lines.push(Line::from(vec![
                Span::styled("   • ", Style::default().fg(Color::DarkGray)),
                Span::raw(*item),
            ]));
        }
    }
    lines
}

fn intro_line(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        format!("  {}", text),
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
    ))
}

fn render_portfolio(f: &mut Frame, area: Rect) {
    let mut lines = vec![Line::from(""), intro_line(content::PORTFOLIO_INTRO)];
    lines.extend(section_lines(content::PORTFOLIO));

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Credits & Works "),
    );
    f.render_widget(paragraph, area);
}

fn render_system(f: &mut Frame, area: Rect) {
    let mut lines = vec![Line::from(""), intro_line(content::SYSTEM_INTRO), Line::from("")];
    for row in content::SYSTEM {
        for (i, value) in row.values.iter().enumerate() {
            let label = if i == 0 { row.label } else { "" };
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {:<12}", label),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                Span::raw(*value),
            ]));
        }
        lines.push(Line::from(""));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" System - Environment "),
    );
    f.render_widget(paragraph, area);
}

fn render_guide(f: &mut Frame, area: Rect) {
    let mut lines = vec![Line::from(""), intro_line(content::GUIDE_INTRO)];
    lines.extend(section_lines(content::GUIDE));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  REFUND POLICY",
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    )));
    lines.push(Line::from(Span::styled(
        format!("   {}", content::REFUND_NOTE),
        Style::default().fg(Color::Red),
    )));
    for (stage, refund) in content::REFUND_POLICY {
        lines.push(Line::from(vec![
            Span::raw(format!("   {:<22}", stage)),
            Span::styled(*refund, Style::default().fg(Color::Green)),
        ]));
    }

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Guide - Policies & File Guidelines "),
    );
    f.render_widget(paragraph, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut status_spans = vec![Span::styled(
        format!(" {} ", app.view().title()),
        Style::default().fg(Color::Cyan),
    )];

    if app.is_exporting() {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(
            "Generating PDF...",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
    }

    status_spans.push(Span::raw(" | "));
    status_spans.push(Span::styled("Tab/1-4", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" View | "));
    if app.view() == View::Home {
        status_spans.push(Span::styled("↑/↓", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" Nav | "));
        status_spans.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" Select | "));
        status_spans.push(Span::styled("+/-", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" Qty | "));
        status_spans.push(Span::styled("s", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(match app.focus() {
            Focus::Catalog => " Edit Cart | ",
            Focus::Cart => " Back to Menu | ",
        }));
    }
    status_spans.push(Span::styled("e", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Export | "));
    status_spans.push(Span::styled("c", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Clear | "));
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn render_confirmation(f: &mut Frame, area: Rect) {
    let popup = centered(area, 60, 9);
    let body = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", content::EXPORT_CONFIRMATION),
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("y", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" Yes, I have read it    "),
            Span::styled("n", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw(" Keep reading the guide"),
        ]),
    ];

    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(body).wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(" Guideline Check "),
        ),
        popup,
    );
}

fn render_notice(f: &mut Frame, area: Rect, notice: &Notice) {
    let popup = centered(area, 70, 7);
    let (title, color, message) = match notice {
        Notice::Saved(path) => (" Estimate Saved ", Color::Green, path.display().to_string()),
        Notice::Failed(err) => (
            " Export Failed ",
            Color::Red,
            format!("An error occurred while downloading the estimate: {}", err),
        ),
    };

    let body = vec![
        Line::from(""),
        Line::from(format!("  {}", message)),
        Line::from(""),
        Line::from(Span::styled(
            "  Press Esc or Enter to close",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )),
    ];

    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(body).wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(title),
        ),
        popup,
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
