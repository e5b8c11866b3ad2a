//! Songs table component: sort controls, row selection, pagination, and
//! the density toggle.

use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::action::{SortColumn, SortOrder};
use crate::client::models::SongRow;

/// Rows-per-page options; the last entry shows everything on one page.
pub const ROWS_PER_PAGE_OPTIONS: [usize; 6] = [5, 10, 25, 50, 100, ROWS_PER_PAGE_ALL];

/// Sentinel page size for the "All" option.
pub const ROWS_PER_PAGE_ALL: usize = 10_000_000_000;

/// Terminal lines occupied by one body row in each density preset.
pub const ROW_HEIGHT_DENSE: u16 = 1;
pub const ROW_HEIGHT_NORMAL: u16 = 2;

/// Transient view state for the songs table.
#[derive(Debug, Clone)]
pub struct TableViewState {
    /// Active sort column
    pub sort_column: SortColumn,

    /// Sort direction
    pub sort_order: SortOrder,

    /// Current page (zero-based)
    pub page: usize,

    /// Page size
    pub rows_per_page: usize,

    /// Dense (compact row) mode
    pub dense: bool,

    /// Selected rows, keyed by song id
    pub selected: Vec<i64>,

    /// Cursor position within the visible page
    pub cursor: Option<usize>,
}

impl Default for TableViewState {
    fn default() -> Self {
        Self {
            sort_column: SortColumn::default(),
            sort_order: SortOrder::default(),
            page: 0,
            rows_per_page: ROWS_PER_PAGE_OPTIONS[0],
            dense: false,
            selected: Vec::new(),
            cursor: None,
        }
    }
}

impl TableViewState {
    pub fn new(dense: bool, rows_per_page: usize) -> Self {
        Self {
            dense,
            rows_per_page: rows_per_page.max(1),
            ..Self::default()
        }
    }

    /// Handle a sort request: toggle direction on the active column,
    /// otherwise switch to the requested column ascending.
    pub fn request_sort(&mut self, column: SortColumn) {
        if self.sort_column == column {
            self.sort_order = self.sort_order.toggle();
        } else {
            self.sort_column = column;
            self.sort_order = SortOrder::Asc;
        }
    }

    /// Toggle a row's membership in the selection set.
    pub fn toggle_row(&mut self, id: i64) {
        match self.selected.iter().position(|&s| s == id) {
            Some(idx) => {
                self.selected.remove(idx);
            }
            None => self.selected.push(id),
        }
    }

    pub fn is_selected(&self, id: i64) -> bool {
        self.selected.contains(&id)
    }

    /// Toggle every given row in or out of the selection set: select all
    /// when not everything is selected yet, clear otherwise.
    pub fn select_all(&mut self, ids: &[i64]) {
        if !ids.is_empty() && self.selected.len() == ids.len() {
            self.selected.clear();
        } else {
            self.selected = ids.to_vec();
        }
    }

    /// Advance to the next rows-per-page option; resets to page zero.
    pub fn cycle_rows_per_page(&mut self) {
        let next = match ROWS_PER_PAGE_OPTIONS
            .iter()
            .position(|&o| o == self.rows_per_page)
        {
            Some(i) => ROWS_PER_PAGE_OPTIONS[(i + 1) % ROWS_PER_PAGE_OPTIONS.len()],
            None => ROWS_PER_PAGE_OPTIONS[0],
        };
        self.rows_per_page = next;
        self.page = 0;
        self.cursor = None;
    }

    /// Zero-based index of the last page for the given row count.
    pub fn last_page(&self, row_count: usize) -> usize {
        row_count.saturating_sub(1) / self.rows_per_page
    }

    /// Clamp the current page to the row count.
    pub fn clamp_page(&mut self, row_count: usize) {
        self.page = self.page.min(self.last_page(row_count));
    }

    pub fn next_page(&mut self, row_count: usize) {
        if self.page < self.last_page(row_count) {
            self.page += 1;
            self.cursor = None;
        }
    }

    pub fn prev_page(&mut self) {
        if self.page > 0 {
            self.page -= 1;
            self.cursor = None;
        }
    }

    /// Half-open slice bounds of the visible page.
    pub fn page_bounds(&self, row_count: usize) -> (usize, usize) {
        let start = self
            .page
            .saturating_mul(self.rows_per_page)
            .min(row_count);
        let end = start.saturating_add(self.rows_per_page).min(row_count);
        (start, end)
    }

    /// Number of missing rows on a short last page, padded to avoid a
    /// layout jump.
    pub fn empty_rows(&self, row_count: usize) -> usize {
        if self.page == 0 {
            return 0;
        }
        (self.page + 1)
            .saturating_mul(self.rows_per_page)
            .saturating_sub(row_count)
    }

    /// Lines per body row in the current density preset.
    pub fn row_height(&self) -> u16 {
        if self.dense {
            ROW_HEIGHT_DENSE
        } else {
            ROW_HEIGHT_NORMAL
        }
    }

    pub fn cursor_up(&mut self) {
        self.cursor = match self.cursor {
            Some(0) | None => Some(0),
            Some(i) => Some(i - 1),
        };
    }

    pub fn cursor_down(&mut self, visible_len: usize) {
        if visible_len == 0 {
            self.cursor = None;
            return;
        }
        self.cursor = match self.cursor {
            None => Some(0),
            Some(i) => Some((i + 1).min(visible_len - 1)),
        };
    }

    /// Reset the cursor after the row set or page changed.
    pub fn reset_cursor(&mut self, visible_len: usize) {
        self.cursor = if visible_len == 0 { None } else { Some(0) };
    }
}

/// Geometry recorded during rendering, used for mouse hit-testing.
#[derive(Debug, Default, Clone)]
pub struct TableGeometry {
    /// Header row area
    pub header: Rect,
    /// Body rows area (below the header)
    pub body: Rect,
    /// Resolved column widths, left to right
    pub column_widths: [u16; 6],
    /// Lines per body row, including spacing
    pub row_stride: u16,
}

/// Resolve column widths for the table's inner width: fixed checkbox,
/// year and duration columns, the three text columns share the rest.
pub fn column_widths(total: u16) -> [u16; 6] {
    const CHECKBOX: u16 = 4;
    const YEAR: u16 = 12;
    const DURATION: u16 = 9;
    const SPACING: u16 = 5;

    let remaining = total.saturating_sub(CHECKBOX + YEAR + DURATION + SPACING);
    let author = remaining * 30 / 100;
    let genre = remaining * 25 / 100;
    let title = remaining.saturating_sub(author + genre);

    [CHECKBOX, author, title, genre, YEAR, DURATION]
}

/// Truncate a string to a display width, appending an ellipsis.
fn truncate(text: &str, max_width: u16) -> String {
    let max_width = max_width as usize;
    if text.width() <= max_width {
        return text.to_string();
    }

    let mut out = String::new();
    let mut width = 0;
    for c in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if width + w + 1 > max_width {
            break;
        }
        out.push(c);
        width += w;
    }
    out.push('…');
    out
}

/// Render the songs table (header, visible page, padding rows) and
/// return the geometry needed for mouse hit-testing.
pub fn render_table(
    frame: &mut Frame,
    area: Rect,
    rows: &[SongRow],
    state: &mut TableViewState,
    loading: bool,
) -> TableGeometry {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Songs")
        .border_style(Style::default().fg(Color::Blue));

    let inner = block.inner(area);

    if rows.is_empty() && loading {
        let paragraph = Paragraph::new("Loading...")
            .style(Style::default().fg(Color::Yellow))
            .block(block);
        frame.render_widget(paragraph, area);
        return TableGeometry::default();
    }

    let widths = column_widths(inner.width);
    let (start, end) = state.page_bounds(rows.len());
    let visible = &rows[start..end];
    let row_margin = state.row_height() - 1;

    // Header: checkbox state plus one sortable label per column
    let all_selected = !rows.is_empty() && state.selected.len() == rows.len();
    let header_checkbox = if all_selected {
        "[x]"
    } else if !state.selected.is_empty() {
        "[-]"
    } else {
        "[ ]"
    };

    let mut header_cells: Vec<Cell> = vec![Cell::from(header_checkbox)
        .style(Style::default().fg(Color::Gray))];
    for column in SortColumn::all() {
        let label = if *column == state.sort_column {
            format!("{} {}", column.title(), state.sort_order.arrow())
        } else {
            column.title().to_string()
        };
        let style = if *column == state.sort_column {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        };
        let line = if column.numeric() {
            Line::from(label).alignment(Alignment::Right)
        } else {
            Line::from(label)
        };
        header_cells.push(Cell::from(line).style(style));
    }
    let header = Row::new(header_cells).height(1).bottom_margin(1);

    // Body rows for the visible page
    let mut body_rows: Vec<Row> = visible
        .iter()
        .map(|song| {
            let checked = state.is_selected(song.id);
            let checkbox = if checked { "[x]" } else { "[ ]" };

            let (text_style, dim_style) = if checked {
                (
                    Style::default().fg(Color::Yellow),
                    Style::default().fg(Color::Yellow),
                )
            } else {
                (
                    Style::default().fg(Color::White),
                    Style::default().fg(Color::DarkGray),
                )
            };

            Row::new(vec![
                Cell::from(checkbox).style(dim_style),
                Cell::from(truncate(&song.author, widths[1])).style(text_style),
                Cell::from(truncate(&song.title, widths[2])).style(text_style),
                Cell::from(truncate(&song.genre, widths[3])).style(text_style),
                Cell::from(song.year.to_string()).style(dim_style),
                Cell::from(Line::from(song.duration_string()).alignment(Alignment::Right))
                    .style(dim_style),
            ])
            .height(1)
            .bottom_margin(row_margin)
        })
        .collect();

    // Pad a short last page so the table keeps its height
    let empty = state.empty_rows(rows.len());
    if empty > 0 {
        let height = (empty as u16).saturating_mul(state.row_height());
        body_rows.push(Row::new(vec![Cell::from("")]).height(height));
    }

    let table = Table::new(body_rows, widths.map(Constraint::Length))
        .header(header)
        .column_spacing(1)
        .block(block)
        .row_highlight_style(Style::default().bg(Color::DarkGray));

    let mut table_state = TableState::default();
    table_state.select(state.cursor);
    frame.render_stateful_widget(table, area, &mut table_state);
    state.cursor = table_state.selected();

    TableGeometry {
        header: Rect {
            x: inner.x,
            y: inner.y,
            width: inner.width,
            height: 1,
        },
        body: Rect {
            x: inner.x,
            y: inner.y + 2,
            width: inner.width,
            height: inner.height.saturating_sub(2),
        },
        column_widths: widths,
        row_stride: state.row_height(),
    }
}

/// Geometry of the pagination bar controls.
#[derive(Debug, Default, Clone)]
pub struct PaginationGeometry {
    /// "Rows per page" label (click cycles the option ring)
    pub rows_per_page: Rect,
    /// Previous-page arrow
    pub prev: Rect,
    /// Next-page arrow
    pub next: Rect,
}

/// Render the pagination bar, right-aligned: rows-per-page option, the
/// visible range, and the page arrows.
pub fn render_pagination(
    frame: &mut Frame,
    area: Rect,
    row_count: usize,
    state: &TableViewState,
) -> PaginationGeometry {
    let size_label = if state.rows_per_page == ROWS_PER_PAGE_ALL {
        String::from("All")
    } else {
        state.rows_per_page.to_string()
    };
    let rpp_text = format!("Rows per page: {size_label}");

    let (start, end) = state.page_bounds(row_count);
    let range_text = if row_count == 0 {
        String::from("0–0 of 0")
    } else {
        format!("{}–{} of {}", start + 1, end, row_count)
    };

    let prev_text = "◀";
    let next_text = "▶";
    let gap = "   ";

    let line = format!("{rpp_text}{gap}{range_text}{gap}{prev_text}  {next_text}");
    let total_width = line.width() as u16;
    let x0 = area.x + area.width.saturating_sub(total_width);

    let prev_enabled = state.page > 0;
    let next_enabled = state.page < state.last_page(row_count) && row_count > 0;

    let spans = vec![
        Span::styled(rpp_text.clone(), Style::default().fg(Color::Gray)),
        Span::raw(gap),
        Span::styled(range_text.clone(), Style::default().fg(Color::Gray)),
        Span::raw(gap),
        Span::styled(
            prev_text,
            Style::default().fg(if prev_enabled {
                Color::White
            } else {
                Color::DarkGray
            }),
        ),
        Span::raw("  "),
        Span::styled(
            next_text,
            Style::default().fg(if next_enabled {
                Color::White
            } else {
                Color::DarkGray
            }),
        ),
    ];

    let paragraph = Paragraph::new(Line::from(spans)).alignment(Alignment::Right);
    frame.render_widget(paragraph, area);

    let rpp_width = rpp_text.width() as u16;
    let range_width = range_text.width() as u16;
    let gap_width = gap.width() as u16;

    let prev_x = x0 + rpp_width + gap_width + range_width + gap_width;
    let next_x = prev_x + 3;

    PaginationGeometry {
        rows_per_page: Rect::new(x0, area.y, rpp_width, 1),
        prev: Rect::new(prev_x, area.y, 1, 1),
        next: Rect::new(next_x, area.y, 1, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: usize) -> Vec<SongRow> {
        (0..n)
            .map(|i| SongRow {
                id: i as i64 + 1,
                author: format!("Author {i}"),
                title: format!("Song {i}"),
                genre: String::from("Rock"),
                year: 2000 + i as i32,
                duration: 100 + i as i32,
            })
            .collect()
    }

    #[test]
    fn test_twelve_songs_page_size_five() {
        let rows = rows(12);
        let mut state = TableViewState::new(false, 5);

        assert_eq!(state.page_bounds(rows.len()), (0, 5));

        state.next_page(rows.len());
        assert_eq!(state.page_bounds(rows.len()), (5, 10));
        assert_eq!(state.empty_rows(rows.len()), 0);

        state.next_page(rows.len());
        assert_eq!(state.page_bounds(rows.len()), (10, 12));
        assert_eq!(state.empty_rows(rows.len()), 3);

        // Already on the last page
        state.next_page(rows.len());
        assert_eq!(state.page, 2);
    }

    #[test]
    fn test_pages_reconstruct_row_list_exactly() {
        let rows = rows(23);
        let mut state = TableViewState::new(false, 10);

        let mut seen: Vec<i64> = Vec::new();
        loop {
            let (start, end) = state.page_bounds(rows.len());
            seen.extend(rows[start..end].iter().map(|r| r.id));
            if state.page == state.last_page(rows.len()) {
                break;
            }
            state.next_page(rows.len());
        }

        let expected: Vec<i64> = rows.iter().map(|r| r.id).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_selection_toggle_is_involution() {
        let mut state = TableViewState::default();
        let before = state.selected.clone();

        state.toggle_row(42);
        assert!(state.is_selected(42));
        state.toggle_row(42);
        assert_eq!(state.selected, before);
    }

    #[test]
    fn test_toggle_removes_from_any_position() {
        let mut state = TableViewState::default();
        for id in [1, 2, 3, 4] {
            state.toggle_row(id);
        }

        state.toggle_row(1); // first
        state.toggle_row(4); // last
        state.toggle_row(3); // middle
        assert_eq!(state.selected, vec![2]);
    }

    #[test]
    fn test_select_all_toggles() {
        let ids = [1i64, 2, 3];
        let mut state = TableViewState::default();

        state.select_all(&ids);
        assert_eq!(state.selected, vec![1, 2, 3]);

        state.select_all(&ids);
        assert!(state.selected.is_empty());

        // Partial selection: select-all completes rather than clears
        state.toggle_row(2);
        state.select_all(&ids);
        assert_eq!(state.selected, vec![1, 2, 3]);
    }

    #[test]
    fn test_rows_per_page_change_resets_page() {
        let mut state = TableViewState::new(false, 5);
        state.page = 2;

        state.cycle_rows_per_page();
        assert_eq!(state.rows_per_page, 10);
        assert_eq!(state.page, 0);
    }

    #[test]
    fn test_rows_per_page_ring_wraps_through_all() {
        let mut state = TableViewState::new(false, 100);
        state.cycle_rows_per_page();
        assert_eq!(state.rows_per_page, ROWS_PER_PAGE_ALL);
        state.cycle_rows_per_page();
        assert_eq!(state.rows_per_page, 5);
    }

    #[test]
    fn test_all_sentinel_shows_everything_on_one_page() {
        let rows = rows(137);
        let mut state = TableViewState::new(false, ROWS_PER_PAGE_ALL);

        assert_eq!(state.page_bounds(rows.len()), (0, 137));
        assert_eq!(state.last_page(rows.len()), 0);
        state.next_page(rows.len());
        assert_eq!(state.page, 0);
    }

    #[test]
    fn test_page_clamps_when_rows_shrink() {
        let mut state = TableViewState::new(false, 5);
        state.page = 4;

        state.clamp_page(7);
        assert_eq!(state.page, 1);

        state.clamp_page(0);
        assert_eq!(state.page, 0);
    }

    #[test]
    fn test_sort_request_toggles_and_switches() {
        let mut state = TableViewState::default();
        assert_eq!(state.sort_column, SortColumn::Author);
        assert_eq!(state.sort_order, SortOrder::Asc);

        state.request_sort(SortColumn::Author);
        assert_eq!(state.sort_order, SortOrder::Desc);

        state.request_sort(SortColumn::Year);
        assert_eq!(state.sort_column, SortColumn::Year);
        assert_eq!(state.sort_order, SortOrder::Asc);
    }

    #[test]
    fn test_row_height_presets() {
        let mut state = TableViewState::new(false, 5);
        assert_eq!(state.row_height(), ROW_HEIGHT_NORMAL);
        state.dense = true;
        assert_eq!(state.row_height(), ROW_HEIGHT_DENSE);
    }

    #[test]
    fn test_truncate_respects_width() {
        assert_eq!(truncate("short", 10), "short");
        let cut = truncate("a very long song title", 10);
        assert!(cut.width() <= 10);
        assert!(cut.ends_with('…'));
    }
}
