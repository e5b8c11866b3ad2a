//! Modal filter dialog with author, genre and release-year criteria.
//!
//! The dialog owns only its open flag and field focus; the selection
//! itself lives in the parent app and changes are forwarded immediately
//! through the action channel.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::client::models::{Author, FilterSelection, Genre};

/// The three filter criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterField {
    #[default]
    Author,
    Genre,
    Year,
}

impl FilterField {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Author => "Author",
            Self::Genre => "Genre",
            Self::Year => "Release year",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Author => Self::Genre,
            Self::Genre => Self::Year,
            Self::Year => Self::Author,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Author => Self::Year,
            Self::Genre => Self::Author,
            Self::Year => Self::Genre,
        }
    }
}

/// Filter dialog state.
#[derive(Debug, Default)]
pub struct FilterDialogState {
    /// Whether the dialog is open
    pub open: bool,

    /// Focused field
    pub focus: FilterField,
}

impl FilterDialogState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self) {
        self.open = true;
        self.focus = FilterField::Author;
    }

    pub fn close(&mut self) {
        self.open = false;
    }
}

/// Step an optional criterion through its option ring. Index 0 is the
/// "All" sentinel (`None`); the remaining indices map onto `values`.
pub fn step_option<T: Clone + PartialEq>(current: &mut Option<T>, values: &[T], delta: isize) {
    let len = (values.len() + 1) as isize;
    let index = match current {
        None => 0,
        Some(v) => values
            .iter()
            .position(|x| x == v)
            .map(|i| i as isize + 1)
            .unwrap_or(0),
    };
    let next = (index + delta).rem_euclid(len) as usize;
    *current = if next == 0 {
        None
    } else {
        Some(values[next - 1].clone())
    };
}

/// Render the filter dialog and return its area so the caller can treat
/// clicks outside it as backdrop clicks.
pub fn render_filter_dialog(
    frame: &mut Frame,
    area: Rect,
    state: &FilterDialogState,
    selection: &FilterSelection,
    authors: &[Author],
    genres: &[Genre],
    years: &[i32],
) -> Rect {
    let popup_width = 66u16.min(area.width.saturating_sub(4));
    let popup_height = 18u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Choose Filters ")
        .border_style(Style::default().fg(Color::Yellow));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // Select columns
            Constraint::Length(3), // Help bar
        ])
        .split(inner);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(chunks[0]);

    let author_labels: Vec<String> = authors.iter().map(|a| a.fullname.clone()).collect();
    let author_index = selection
        .author_id
        .as_ref()
        .and_then(|id| authors.iter().position(|a| &a.id == id))
        .map(|i| i + 1)
        .unwrap_or(0);
    render_select_column(
        frame,
        columns[0],
        FilterField::Author.title(),
        &author_labels,
        author_index,
        state.focus == FilterField::Author,
    );

    let genre_labels: Vec<String> = genres.iter().map(|g| g.name.clone()).collect();
    let genre_index = selection
        .genre_id
        .as_ref()
        .and_then(|id| genres.iter().position(|g| &g.id == id))
        .map(|i| i + 1)
        .unwrap_or(0);
    render_select_column(
        frame,
        columns[1],
        FilterField::Genre.title(),
        &genre_labels,
        genre_index,
        state.focus == FilterField::Genre,
    );

    let year_labels: Vec<String> = years.iter().map(|y| y.to_string()).collect();
    let year_index = selection
        .year
        .and_then(|year| years.iter().position(|&y| y == year))
        .map(|i| i + 1)
        .unwrap_or(0);
    render_select_column(
        frame,
        columns[2],
        FilterField::Year.title(),
        &year_labels,
        year_index,
        state.focus == FilterField::Year,
    );

    let help = Paragraph::new(Line::from(vec![
        Span::styled(" Enter ", Style::default().fg(Color::Yellow)),
        Span::raw("Ok  "),
        Span::styled(" j/k ", Style::default().fg(Color::Cyan)),
        Span::raw("Value  "),
        Span::styled(" Tab ", Style::default().fg(Color::Cyan)),
        Span::raw("Field  "),
        Span::styled(" Esc ", Style::default().fg(Color::Yellow)),
        Span::raw("Cancel"),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, chunks[1]);

    popup_area
}

/// One select column: the "All" sentinel followed by the option labels,
/// with a dot marking the active value.
fn render_select_column(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    labels: &[String],
    active_index: usize,
    focused: bool,
) {
    let border_color = if focused {
        Color::Yellow
    } else {
        Color::DarkGray
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {title} "))
        .border_style(Style::default().fg(border_color));

    let mut items: Vec<ListItem> = vec![ListItem::new(Line::from(vec![
        Span::styled(
            if active_index == 0 { "● " } else { "  " },
            Style::default().fg(Color::Green),
        ),
        Span::styled("All", Style::default().fg(Color::DarkGray)),
    ]))];

    for (i, label) in labels.iter().enumerate() {
        let is_active = active_index == i + 1;
        items.push(ListItem::new(Line::from(vec![
            Span::styled(
                if is_active { "● " } else { "  " },
                Style::default().fg(Color::Green),
            ),
            Span::styled(
                label.clone(),
                if is_active {
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                },
            ),
        ])));
    }

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let mut list_state = ListState::default();
    list_state.select(Some(active_index));
    frame.render_stateful_widget(list, area, &mut list_state);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_from_all_selects_first_value() {
        let values = vec![String::from("A1"), String::from("A2")];
        let mut current: Option<String> = None;

        step_option(&mut current, &values, 1);
        assert_eq!(current.as_deref(), Some("A1"));
    }

    #[test]
    fn test_step_wraps_back_to_all() {
        let values = vec![String::from("A1"), String::from("A2")];
        let mut current = Some(String::from("A2"));

        step_option(&mut current, &values, 1);
        assert_eq!(current, None);
    }

    #[test]
    fn test_step_backwards_from_all_selects_last_value() {
        let values = vec![2021, 2022];
        let mut current: Option<i32> = None;

        step_option(&mut current, &values, -1);
        assert_eq!(current, Some(2022));
    }

    #[test]
    fn test_step_with_no_values_stays_on_all() {
        let values: Vec<i32> = Vec::new();
        let mut current: Option<i32> = None;

        step_option(&mut current, &values, 1);
        assert_eq!(current, None);
    }

    #[test]
    fn test_unknown_value_steps_from_sentinel() {
        // A stale id no longer present in the reference list behaves as
        // if "All" were active.
        let values = vec![String::from("A1")];
        let mut current = Some(String::from("gone"));

        step_option(&mut current, &values, 1);
        assert_eq!(current.as_deref(), Some("A1"));
    }

    #[test]
    fn test_field_cycle_covers_all_fields() {
        let mut field = FilterField::Author;
        field = field.next();
        assert_eq!(field, FilterField::Genre);
        field = field.next();
        assert_eq!(field, FilterField::Year);
        field = field.next();
        assert_eq!(field, FilterField::Author);
        assert_eq!(field.prev(), FilterField::Year);
    }

    #[test]
    fn test_reopen_resets_focus_to_first_field() {
        let mut state = FilterDialogState::new();
        state.open();
        state.focus = FilterField::Year;
        state.close();
        assert!(!state.open);

        state.open();
        assert_eq!(state.focus, FilterField::Author);
    }
}
