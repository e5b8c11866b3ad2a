//! Main application state and logic.

use color_eyre::Result;
use ratatui::layout::{Position, Rect};
use tokio::sync::mpsc;

use crate::action::{Action, SortColumn};
use crate::client::models::{Author, FilterSelection, Genre, SongRow};
use crate::client::CatalogClient;
use crate::config::Config;
use crate::sort::sort_rows;
use crate::ui::{
    step_option, FilterDialogState, FilterField, PaginationGeometry, TableGeometry, TableViewState,
};

/// UI layout areas for mouse click detection.
#[derive(Debug, Default, Clone)]
pub struct UiLayout {
    /// Toolbar area
    pub toolbar: Rect,
    /// Filter affordance within the toolbar (zero-sized while rows are
    /// selected and the dead delete affordance is shown instead)
    pub filter_button: Rect,
    /// Table area including borders
    pub table_area: Rect,
    /// Table geometry (header, body, column widths)
    pub table: TableGeometry,
    /// Pagination bar area
    pub pagination_area: Rect,
    /// Pagination control geometry
    pub pagination: PaginationGeometry,
    /// Filter dialog area (when open)
    pub dialog: Rect,
}

/// Main application state.
pub struct App {
    /// Whether the app should quit
    pub should_quit: bool,

    /// Configuration
    pub config: Config,

    /// API client
    pub client: Option<CatalogClient>,

    /// Canonical song rows, fully replaced on every successful fetch
    pub rows: Vec<SongRow>,

    /// Author reference data for the filter dialog
    pub authors: Vec<Author>,

    /// Genre reference data for the filter dialog
    pub genres: Vec<Genre>,

    /// Release years seen in the catalogue, for the year select
    pub years: Vec<i32>,

    /// Current filter criteria
    pub filter: FilterSelection,

    /// Filter dialog state
    pub dialog: FilterDialogState,

    /// Table view state
    pub table: TableViewState,

    /// A songs fetch is in flight
    pub loading: bool,

    /// Help overlay visible
    pub show_help: bool,

    /// Error message to display
    pub error_message: Option<String>,

    /// Action sender for async operations
    pub action_tx: mpsc::UnboundedSender<Action>,

    /// UI layout areas for mouse detection
    pub layout: UiLayout,

    /// Sequence number of the latest issued songs fetch; responses
    /// carrying an older number are discarded so the last user intent
    /// wins when fetches overlap
    songs_seq: u64,
}

impl App {
    /// Create a new application instance.
    pub fn new(config: Config, action_tx: mpsc::UnboundedSender<Action>) -> Self {
        let table = TableViewState::new(config.ui.dense, config.ui.rows_per_page);
        Self {
            should_quit: false,
            config,
            client: None,
            rows: Vec::new(),
            authors: Vec::new(),
            genres: Vec::new(),
            years: Vec::new(),
            filter: FilterSelection::default(),
            dialog: FilterDialogState::new(),
            table,
            loading: false,
            show_help: false,
            error_message: None,
            action_tx,
            layout: UiLayout::default(),
            songs_seq: 0,
        }
    }

    /// Initialize the application: connect the client and issue the
    /// three unfiltered fetches (songs, authors, genres).
    pub fn init(&mut self) {
        if self.config.is_valid() {
            self.client = Some(CatalogClient::new(&self.config.server.url));
            tracing::info!("Using catalogue service at {}", self.config.server.url);

            self.load_reference_data();
            self.load_songs();
        } else {
            self.error_message = Some(String::from(
                "Invalid configuration. Please configure a server URL.",
            ));
        }
    }

    /// Handle an action and update state.
    pub fn handle_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.should_quit = true;
            }

            Action::Tick => {}

            Action::Resize(_, _) => {
                // Layout is re-derived on the next draw
            }

            // Table navigation
            Action::CursorUp => {
                self.table.cursor_up();
            }

            Action::CursorDown => {
                let len = self.visible_len();
                self.table.cursor_down(len);
            }

            Action::JumpToTop => {
                if self.visible_len() > 0 {
                    self.table.cursor = Some(0);
                }
            }

            Action::JumpToBottom => {
                let len = self.visible_len();
                if len > 0 {
                    self.table.cursor = Some(len - 1);
                }
            }

            Action::NextPage => {
                self.table.next_page(self.rows.len());
            }

            Action::PrevPage => {
                self.table.prev_page();
            }

            Action::CycleRowsPerPage => {
                self.table.cycle_rows_per_page();
            }

            // Sorting
            Action::SortBy(column) => {
                self.table.request_sort(column);
            }

            // Selection
            Action::ToggleSelect => {
                if let Some(cursor) = self.table.cursor {
                    self.toggle_visible_row(cursor);
                }
            }

            Action::ToggleSelectAll => {
                let ids: Vec<i64> = self.rows.iter().map(|r| r.id).collect();
                self.table.select_all(&ids);
            }

            // Display
            Action::ToggleDense => {
                self.table.dense = !self.table.dense;
            }

            // Filter dialog
            Action::OpenFilter => {
                self.dialog.open();
            }

            Action::CancelFilter => {
                // Close without reloading; the selection stays as it is
                self.dialog.close();
            }

            Action::ConfirmFilter => {
                self.dialog.close();
                self.load_filtered_songs();
            }

            Action::FilterFieldNext => {
                self.dialog.focus = self.dialog.focus.next();
            }

            Action::FilterFieldPrev => {
                self.dialog.focus = self.dialog.focus.prev();
            }

            Action::FilterValueNext => {
                self.step_filter_value(1);
            }

            Action::FilterValuePrev => {
                self.step_filter_value(-1);
            }

            // Mouse
            Action::MouseClick(x, y) => {
                self.handle_mouse_click(x, y);
            }

            // Data loading
            Action::Refresh => {
                self.load_reference_data();
                if self.filter.is_empty() {
                    self.load_songs();
                } else {
                    self.load_filtered_songs();
                }
            }

            Action::SongsLoaded { seq, rows } => {
                if seq != self.songs_seq {
                    tracing::debug!(seq, latest = self.songs_seq, "discarding stale songs fetch");
                    return Ok(());
                }
                self.loading = false;
                self.merge_years(&rows);
                self.rows = rows;
                self.table.clamp_page(self.rows.len());
                let len = self.visible_len();
                self.table.reset_cursor(len);
            }

            Action::AuthorsLoaded(authors) => {
                self.authors = authors;
            }

            Action::GenresLoaded(genres) => {
                self.genres = genres;
            }

            // Overlays
            Action::ShowHelp => {
                self.show_help = true;
            }

            Action::HideHelp => {
                self.show_help = false;
            }

            // Errors
            Action::Error(msg) => {
                // Keep the previously loaded rows on screen
                self.loading = false;
                self.error_message = Some(msg);
            }

            Action::ClearError => {
                self.error_message = None;
            }

            Action::None => {}
        }

        Ok(())
    }

    /// Number of rows on the visible page.
    fn visible_len(&self) -> usize {
        let (start, end) = self.table.page_bounds(self.rows.len());
        end - start
    }

    /// Toggle selection of a row by its index within the visible page.
    fn toggle_visible_row(&mut self, index: usize) {
        let sorted = sort_rows(&self.rows, self.table.sort_column, self.table.sort_order);
        let (start, end) = self.table.page_bounds(sorted.len());
        if start + index >= end {
            return;
        }
        if let Some(row) = sorted.get(start + index) {
            self.table.toggle_row(row.id);
            self.table.cursor = Some(index);
        }
    }

    /// Step the focused filter field through its option ring. Any change
    /// to a non-empty selection immediately issues a filtered fetch.
    fn step_filter_value(&mut self, delta: isize) {
        match self.dialog.focus {
            FilterField::Author => {
                let ids: Vec<String> = self.authors.iter().map(|a| a.id.clone()).collect();
                step_option(&mut self.filter.author_id, &ids, delta);
            }
            FilterField::Genre => {
                let ids: Vec<String> = self.genres.iter().map(|g| g.id.clone()).collect();
                step_option(&mut self.filter.genre_id, &ids, delta);
            }
            FilterField::Year => {
                step_option(&mut self.filter.year, &self.years, delta);
            }
        }

        if !self.filter.is_empty() {
            self.load_filtered_songs();
        }
    }

    /// Allocate the sequence number for the next songs fetch.
    fn next_songs_seq(&mut self) -> u64 {
        self.songs_seq += 1;
        self.songs_seq
    }

    /// Fetch the unfiltered catalogue in a background task.
    fn load_songs(&mut self) {
        let Some(client) = self.client.clone() else {
            return;
        };
        let seq = self.next_songs_seq();
        let tx = self.action_tx.clone();
        self.loading = true;

        tokio::spawn(async move {
            match client.get_songs().await {
                Ok(rows) => {
                    let _ = tx.send(Action::SongsLoaded { seq, rows });
                }
                Err(e) => {
                    tracing::error!("Failed to load songs: {e}");
                    let _ = tx.send(Action::Error(format!("Failed to load songs: {e}")));
                }
            }
        });
    }

    /// Fetch songs matching the current filter in a background task.
    fn load_filtered_songs(&mut self) {
        let Some(client) = self.client.clone() else {
            return;
        };
        let seq = self.next_songs_seq();
        let selection = self.filter.clone();
        let tx = self.action_tx.clone();
        self.loading = true;

        tokio::spawn(async move {
            match client.get_filtered_songs(&selection).await {
                Ok(rows) => {
                    let _ = tx.send(Action::SongsLoaded { seq, rows });
                }
                Err(e) => {
                    tracing::error!("Failed to load filtered songs: {e}");
                    let _ = tx.send(Action::Error(format!("Failed to load filtered songs: {e}")));
                }
            }
        });
    }

    /// Fetch the dialog's reference lists in background tasks.
    fn load_reference_data(&mut self) {
        let Some(client) = self.client.clone() else {
            return;
        };

        let authors_client = client.clone();
        let authors_tx = self.action_tx.clone();
        tokio::spawn(async move {
            match authors_client.get_authors().await {
                Ok(authors) => {
                    let _ = authors_tx.send(Action::AuthorsLoaded(authors));
                }
                Err(e) => {
                    tracing::error!("Failed to load authors: {e}");
                    let _ = authors_tx.send(Action::Error(format!("Failed to load authors: {e}")));
                }
            }
        });

        let genres_tx = self.action_tx.clone();
        tokio::spawn(async move {
            match client.get_genres().await {
                Ok(genres) => {
                    let _ = genres_tx.send(Action::GenresLoaded(genres));
                }
                Err(e) => {
                    tracing::error!("Failed to load genres: {e}");
                    let _ = genres_tx.send(Action::Error(format!("Failed to load genres: {e}")));
                }
            }
        });
    }

    /// Record the release years present in a fetched row set for the
    /// dialog's year select.
    fn merge_years(&mut self, rows: &[SongRow]) {
        for row in rows {
            if !self.years.contains(&row.year) {
                self.years.push(row.year);
            }
        }
        self.years.sort_unstable();
    }

    /// Resolve a mouse click against the recorded layout.
    fn handle_mouse_click(&mut self, x: u16, y: u16) {
        let position = Position { x, y };

        if self.show_help {
            return;
        }

        if self.dialog.open {
            // A click outside the dialog is the backdrop click and never
            // dismisses it; the fields themselves are keyboard-driven
            return;
        }

        if self.layout.filter_button.contains(position) {
            self.dialog.open();
        } else if self.layout.table.header.contains(position) {
            match self.header_column_at(x) {
                Some(0) => {
                    let ids: Vec<i64> = self.rows.iter().map(|r| r.id).collect();
                    self.table.select_all(&ids);
                }
                Some(col) => {
                    if let Some(column) = SortColumn::all().get(col - 1) {
                        self.table.request_sort(*column);
                    }
                }
                None => {}
            }
        } else if self.layout.table.body.contains(position) {
            let stride = self.layout.table.row_stride.max(1);
            let index = ((y - self.layout.table.body.y) / stride) as usize;
            if index < self.visible_len() {
                self.toggle_visible_row(index);
            }
        } else if self.layout.pagination.prev.contains(position) {
            self.table.prev_page();
        } else if self.layout.pagination.next.contains(position) {
            self.table.next_page(self.rows.len());
        } else if self.layout.pagination.rows_per_page.contains(position) {
            self.table.cycle_rows_per_page();
        }
    }

    /// Which table column a header click at `x` falls into.
    fn header_column_at(&self, x: u16) -> Option<usize> {
        let geometry = &self.layout.table;
        let mut pos = geometry.header.x;
        for (i, width) in geometry.column_widths.iter().enumerate() {
            if x >= pos && x < pos + width {
                return Some(i);
            }
            pos += width + 1; // column spacing
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::SortOrder;

    fn test_app() -> App {
        let (tx, _rx) = mpsc::unbounded_channel();
        App::new(Config::default(), tx)
    }

    fn rows(n: usize) -> Vec<SongRow> {
        (0..n)
            .map(|i| SongRow {
                id: i as i64 + 1,
                author: format!("Author {i}"),
                title: format!("Song {i}"),
                genre: String::from("Rock"),
                year: 2020 + (i % 3) as i32,
                duration: 100 + i as i32,
            })
            .collect()
    }

    #[test]
    fn test_stale_songs_response_is_discarded() {
        let mut app = test_app();

        // Two fetches issued; the first resolves last
        let first = app.next_songs_seq();
        let second = app.next_songs_seq();

        app.handle_action(Action::SongsLoaded {
            seq: second,
            rows: rows(3),
        })
        .unwrap();
        assert_eq!(app.rows.len(), 3);

        app.handle_action(Action::SongsLoaded {
            seq: first,
            rows: rows(10),
        })
        .unwrap();
        assert_eq!(app.rows.len(), 3, "stale response must not replace rows");
    }

    #[test]
    fn test_rows_are_replaced_wholesale() {
        let mut app = test_app();

        let seq = app.next_songs_seq();
        app.handle_action(Action::SongsLoaded {
            seq,
            rows: rows(12),
        })
        .unwrap();

        let seq = app.next_songs_seq();
        app.handle_action(Action::SongsLoaded { seq, rows: rows(4) })
            .unwrap();
        assert_eq!(app.rows.len(), 4);
    }

    #[test]
    fn test_page_clamped_after_row_set_shrinks() {
        let mut app = test_app();
        app.table.rows_per_page = 5;

        let seq = app.next_songs_seq();
        app.handle_action(Action::SongsLoaded {
            seq,
            rows: rows(12),
        })
        .unwrap();
        app.handle_action(Action::NextPage).unwrap();
        app.handle_action(Action::NextPage).unwrap();
        assert_eq!(app.table.page, 2);

        let seq = app.next_songs_seq();
        app.handle_action(Action::SongsLoaded { seq, rows: rows(4) })
            .unwrap();
        assert_eq!(app.table.page, 0);
    }

    #[test]
    fn test_error_keeps_stale_rows() {
        let mut app = test_app();

        let seq = app.next_songs_seq();
        app.handle_action(Action::SongsLoaded { seq, rows: rows(5) })
            .unwrap();

        app.handle_action(Action::Error(String::from("connection refused")))
            .unwrap();
        assert_eq!(app.rows.len(), 5);
        assert!(app.error_message.is_some());
        assert!(!app.loading);
    }

    #[test]
    fn test_confirm_closes_dialog_and_cancel_keeps_selection() {
        let mut app = test_app();
        app.authors = vec![Author {
            id: String::from("A1"),
            fullname: String::from("Nina Simone"),
        }];

        app.handle_action(Action::OpenFilter).unwrap();
        assert!(app.dialog.open);

        app.handle_action(Action::FilterValueNext).unwrap();
        assert_eq!(app.filter.author_id.as_deref(), Some("A1"));

        app.handle_action(Action::CancelFilter).unwrap();
        assert!(!app.dialog.open);
        assert_eq!(app.filter.author_id.as_deref(), Some("A1"));

        app.handle_action(Action::OpenFilter).unwrap();
        app.handle_action(Action::ConfirmFilter).unwrap();
        assert!(!app.dialog.open);
    }

    #[test]
    fn test_backdrop_click_leaves_dialog_open() {
        let mut app = test_app();
        app.handle_action(Action::OpenFilter).unwrap();
        app.layout.dialog = Rect::new(20, 5, 40, 12);

        // Well outside the dialog area
        app.handle_action(Action::MouseClick(0, 0)).unwrap();
        assert!(app.dialog.open);
    }

    #[test]
    fn test_selection_toggle_by_cursor_is_involution() {
        let mut app = test_app();
        let seq = app.next_songs_seq();
        app.handle_action(Action::SongsLoaded { seq, rows: rows(6) })
            .unwrap();

        app.handle_action(Action::CursorDown).unwrap();
        app.handle_action(Action::ToggleSelect).unwrap();
        assert_eq!(app.table.selected.len(), 1);

        app.handle_action(Action::ToggleSelect).unwrap();
        assert!(app.table.selected.is_empty());
    }

    #[test]
    fn test_select_all_covers_full_row_set_not_just_page() {
        let mut app = test_app();
        app.table.rows_per_page = 5;
        let seq = app.next_songs_seq();
        app.handle_action(Action::SongsLoaded {
            seq,
            rows: rows(12),
        })
        .unwrap();

        app.handle_action(Action::ToggleSelectAll).unwrap();
        assert_eq!(app.table.selected.len(), 12);

        app.handle_action(Action::ToggleSelectAll).unwrap();
        assert!(app.table.selected.is_empty());
    }

    #[test]
    fn test_sort_actions_toggle_direction() {
        let mut app = test_app();

        app.handle_action(Action::SortBy(SortColumn::Year)).unwrap();
        assert_eq!(app.table.sort_column, SortColumn::Year);
        assert_eq!(app.table.sort_order, SortOrder::Asc);

        app.handle_action(Action::SortBy(SortColumn::Year)).unwrap();
        assert_eq!(app.table.sort_order, SortOrder::Desc);
    }

    #[test]
    fn test_years_merged_from_loaded_rows() {
        let mut app = test_app();
        let seq = app.next_songs_seq();
        app.handle_action(Action::SongsLoaded { seq, rows: rows(6) })
            .unwrap();

        assert_eq!(app.years, vec![2020, 2021, 2022]);
    }
}
