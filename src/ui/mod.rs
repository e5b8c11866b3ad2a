//! Main UI layout and rendering.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::sort::sort_rows;

pub mod components;

pub use components::*;

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Row order is re-derived from the raw rows on every frame
    let sorted = sort_rows(&app.rows, app.table.sort_column, app.table.sort_order);

    // Main layout: [toolbar] [table] [pagination] [status]
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Toolbar
            Constraint::Min(7),    // Table
            Constraint::Length(1), // Pagination
            Constraint::Length(1), // Status
        ])
        .split(area);

    app.layout.toolbar = main_chunks[0];
    app.layout.table_area = main_chunks[1];
    app.layout.pagination_area = main_chunks[2];

    render_toolbar(frame, main_chunks[0], app);

    app.layout.table = render_table(
        frame,
        main_chunks[1],
        &sorted,
        &mut app.table,
        app.loading,
    );

    app.layout.pagination = render_pagination(frame, main_chunks[2], sorted.len(), &app.table);

    render_status(frame, main_chunks[3], app);

    // Render the filter dialog if open
    if app.dialog.open {
        app.layout.dialog = render_filter_dialog(
            frame,
            area,
            &app.dialog,
            &app.filter,
            &app.authors,
            &app.genres,
            &app.years,
        );
    }

    // Render help overlay if active
    if app.show_help {
        render_help(frame, area);
    }

    // Render error message if present
    if let Some(error) = &app.error_message {
        render_error(frame, area, error);
    }
}

/// Render the toolbar: the title (or selection count) on the left and
/// the context affordance on the right. The delete affordance shown
/// while rows are selected is intentionally not wired to anything.
fn render_toolbar(frame: &mut Frame, area: Rect, app: &mut App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("songs-tui")
        .border_style(Style::default().fg(Color::Blue));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let selected = app.table.selected.len();

    let (left_text, left_style) = if selected > 0 {
        (
            format!("{selected} selected"),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        (
            String::from("Songs"),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    };

    let (right_text, right_style) = if selected > 0 {
        (
            String::from(" Delete "),
            Style::default().fg(Color::Red),
        )
    } else {
        (
            String::from(" [f] Filter list "),
            Style::default().fg(Color::Cyan),
        )
    };

    let left_width = left_text.width() as u16;
    let right_width = right_text.width() as u16;
    let pad = inner
        .width
        .saturating_sub(left_width)
        .saturating_sub(right_width) as usize;

    let line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(pad)),
        Span::styled(right_text, right_style),
    ]);
    frame.render_widget(Paragraph::new(line), inner);

    // The right-hand affordance is clickable only in its filter form
    app.layout.filter_button = if selected > 0 {
        Rect::default()
    } else {
        Rect::new(
            inner.x + inner.width.saturating_sub(right_width),
            inner.y,
            right_width,
            1,
        )
    };
}

/// Render the status line: density preset, loading indicator, key hints.
fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let dense_marker = if app.table.dense { "[x]" } else { "[ ]" };

    let mut spans = vec![
        Span::styled(
            format!(" {dense_marker} Dense padding"),
            Style::default().fg(Color::Gray),
        ),
        Span::styled("  d to toggle", Style::default().fg(Color::DarkGray)),
    ];

    if app.loading {
        spans.push(Span::styled(
            "   Loading...",
            Style::default().fg(Color::Yellow),
        ));
    }

    spans.push(Span::styled(
        "   ? for help",
        Style::default().fg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the help overlay.
fn render_help(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Table",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from("  j/k or ↑/↓    Move cursor"),
        Line::from("  g/G           Jump to top/bottom of page"),
        Line::from("  Space/Enter   Toggle row selection"),
        Line::from("  a             Select/deselect all rows"),
        Line::from("  1-5           Sort by column (again to reverse)"),
        Line::from("  h/l or ←/→    Previous/next page"),
        Line::from("  r             Cycle rows per page (5..100, All)"),
        Line::from("  d             Toggle dense padding"),
        Line::from(""),
        Line::from(Span::styled(
            "Filters",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from("  f             Open the filter dialog"),
        Line::from("  Tab/Shift+Tab Switch filter field"),
        Line::from("  j/k           Change filter value (All clears)"),
        Line::from("  Enter         Apply filters and close"),
        Line::from("  Esc           Close without reloading"),
        Line::from(""),
        Line::from(Span::styled(
            "Other",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from("  R             Refresh from the server"),
        Line::from("  x             Clear error message"),
        Line::from("  q             Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc or ? to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Help")
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, popup_area);
}

/// Render an error message overlay. The table keeps showing the last
/// successfully loaded rows behind it.
fn render_error(frame: &mut Frame, area: Rect, message: &str) {
    let popup_area = centered_rect(60, 20, area);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Error")
        .border_style(Style::default().fg(Color::Red));

    let paragraph = Paragraph::new(format!("{message}\n\nPress x to dismiss"))
        .style(Style::default().fg(Color::Red))
        .block(block)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, popup_area);
}

/// Create a centered rectangle.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
