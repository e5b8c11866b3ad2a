//! Application actions/events that drive state changes.

use crate::client::models::{Author, Genre, SongRow};

/// Actions that can be dispatched to update application state.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Application lifecycle
    Quit,
    Tick,
    Resize(u16, u16),

    // Table navigation
    CursorUp,
    CursorDown,
    JumpToTop,
    JumpToBottom,
    NextPage,
    PrevPage,
    CycleRowsPerPage,

    // Sorting
    SortBy(SortColumn),

    // Selection
    ToggleSelect,
    ToggleSelectAll,

    // Display
    ToggleDense,

    // Filter dialog
    OpenFilter,
    CancelFilter,
    ConfirmFilter,
    FilterFieldNext,
    FilterFieldPrev,
    FilterValueNext,
    FilterValuePrev,

    // Mouse
    MouseClick(u16, u16),

    // Data loading
    Refresh,

    // API responses (sent from spawned fetch tasks)
    SongsLoaded { seq: u64, rows: Vec<SongRow> },
    AuthorsLoaded(Vec<Author>),
    GenresLoaded(Vec<Genre>),

    // Overlays
    ShowHelp,
    HideHelp,

    // Errors
    Error(String),
    ClearError,

    // No-op
    None,
}

/// Sortable table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    #[default]
    Author,
    Title,
    Genre,
    Year,
    Duration,
}

impl SortColumn {
    pub fn all() -> &'static [SortColumn] {
        &[
            SortColumn::Author,
            SortColumn::Title,
            SortColumn::Genre,
            SortColumn::Year,
            SortColumn::Duration,
        ]
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Author => "Author",
            Self::Title => "Song",
            Self::Genre => "Genre",
            Self::Year => "Release Year",
            Self::Duration => "Duration",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Author => 0,
            Self::Title => 1,
            Self::Genre => 2,
            Self::Year => 3,
            Self::Duration => 4,
        }
    }

    /// Whether the column holds numeric values (rendered right-aligned).
    pub fn numeric(&self) -> bool {
        matches!(self, Self::Duration)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Flip the direction.
    pub fn toggle(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Self::Asc => "▲",
            Self::Desc => "▼",
        }
    }
}
