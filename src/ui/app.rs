use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

use crate::models::{Recommendation, RunReport};

fn recommendation_color(recommendation: Recommendation) -> Color {
    match recommendation {
        Recommendation::Buy => Color::Green,
        Recommendation::Neutral => Color::Yellow,
        Recommendation::Avoid => Color::Red,
    }
}

/// Interactive ranking view: table on the left, close chart of the selected symbol on the right
pub struct RankingApp {
    report: RunReport,
    table_state: TableState,
    pub should_quit: bool,
}

impl RankingApp {
    pub fn new(report: RunReport) -> Self {
        let mut table_state = TableState::default();
        if !report.results.is_empty() {
            table_state.select(Some(0));
        }
        Self {
            report,
            table_state,
            should_quit: false,
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.table_state.selected()
    }

    pub fn draw(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),    // Content
                Constraint::Length(3), // Status bar
            ])
            .split(f.area());

        let content = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[0]);

        self.render_table(f, content[0]);
        self.render_chart(f, content[1]);
        self.render_status_bar(f, chunks[1]);
    }

    fn render_table(&mut self, f: &mut Frame, area: Rect) {
        let header = Row::new(["#", "Symbol", "Super", "Tech", "Sent", "Recommendation"])
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

        let rows: Vec<Row> = self
            .report
            .results
            .iter()
            .enumerate()
            .map(|(i, r)| {
                Row::new(vec![
                    Cell::from((i + 1).to_string()),
                    Cell::from(r.symbol.clone()),
                    Cell::from(format!("{:.5}", r.super_score)),
                    Cell::from(format!("{:.5}", r.technical_score)),
                    Cell::from(format!("{:.3}", r.sentiment)),
                    Cell::from(r.recommendation.label())
                        .style(Style::default().fg(recommendation_color(r.recommendation))),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(4),
            Constraint::Length(8),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Length(7),
            Constraint::Min(14),
        ];

        let title = format!(
            "📊 Ranking ({} scored, {} skipped)",
            self.report.scored_count(),
            self.report.skipped_count()
        );
        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
            .highlight_symbol("> ");

        f.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn render_chart(&self, f: &mut Frame, area: Rect) {
        let Some(series) = self.selected().and_then(|i| self.report.series.get(i)) else {
            let empty = Paragraph::new("No symbol selected")
                .block(Block::default().borders(Borders::ALL).title("📈 Chart"));
            f.render_widget(empty, area);
            return;
        };

        let data: Vec<(f64, f64)> = series
            .points()
            .iter()
            .enumerate()
            .map(|(i, p)| (i as f64, p.close))
            .collect();

        let (min, max) = data
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, c)| (lo.min(*c), hi.max(*c)));
        let (min, max) = if min.is_finite() && max.is_finite() { (min, max) } else { (0.0, 1.0) };
        let pad = ((max - min) * 0.05).max(0.01);

        let dataset = Dataset::default()
            .name(series.symbol().to_string())
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&data);

        let first = series.points().first().map(|p| p.timestamp.format("%m-%d %H:%M").to_string());
        let last = series.points().last().map(|p| p.timestamp.format("%m-%d %H:%M").to_string());

        let chart = Chart::new(vec![dataset])
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("📈 Chart: {}", series.symbol())),
            )
            .x_axis(
                Axis::default()
                    .bounds([0.0, (data.len().max(2) - 1) as f64])
                    .labels(vec![
                        Span::raw(first.unwrap_or_default()),
                        Span::raw(last.unwrap_or_default()),
                    ]),
            )
            .y_axis(
                Axis::default()
                    .bounds([min - pad, max + pad])
                    .labels(vec![
                        Span::raw(format!("{:.2}", min)),
                        Span::raw(format!("{:.2}", max)),
                    ]),
            );

        f.render_widget(chart, area);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let status_text = vec![Line::from(vec![
            Span::styled("↑/↓", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::styled(" to select • ", Style::default().fg(Color::Gray)),
            Span::styled("Q", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::styled(" to quit", Style::default().fg(Color::Gray)),
        ])];

        let paragraph = Paragraph::new(status_text)
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(Color::White));

        f.render_widget(paragraph, area);
    }

    pub fn handle_key_event(&mut self, key: KeyCode) {
        let len = self.report.results.len();
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Down | KeyCode::Char('j') if len > 0 => {
                let next = self.selected().map_or(0, |i| (i + 1).min(len - 1));
                self.table_state.select(Some(next));
            }
            KeyCode::Up | KeyCode::Char('k') if len > 0 => {
                let prev = self.selected().map_or(0, |i| i.saturating_sub(1));
                self.table_state.select(Some(prev));
            }
            KeyCode::Home if len > 0 => self.table_state.select(Some(0)),
            KeyCode::End if len > 0 => self.table_state.select(Some(len - 1)),
            _ => {}
        }
    }
}

/// Run the interactive ranking view until the user quits
pub fn run_app(report: RunReport) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let mut app = RankingApp::new(report);

    // Main application loop
    let result = loop {
        if let Err(e) = terminal.draw(|f| app.draw(f)) {
            break Err(e.into());
        }

        match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                app.handle_key_event(key.code);
                if app.should_quit {
                    break Ok(());
                }
            }
            Ok(_) => {}
            Err(e) => break Err(e.into()),
        }
    };

    // Cleanup terminal
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    result
}
