//! Catalogue service wire models.

use serde::{Deserialize, Serialize, Serializer};

/// Author reference data.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Author {
    pub id: String,
    pub fullname: String,
}

/// Genre reference data.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Genre {
    pub id: String,
    pub name: String,
}

/// Song as returned by the service.
///
/// The author and genre fields arrive as nested objects on the unfiltered
/// path and as flat strings on the filtered path; both shapes deserialize
/// here and normalize into [`SongRow`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSong {
    pub id: i64,
    pub author: NameField,
    pub genre: NameField,
    pub title: String,
    pub year_of_release: i32,
    pub duration: i32,
}

/// A display name that is either nested in a reference object or flat.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NameField {
    Nested(NameRef),
    Flat(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct NameRef {
    #[serde(default)]
    pub fullname: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl NameField {
    /// Flatten to the display string.
    pub fn into_name(self) -> String {
        match self {
            Self::Flat(name) => name,
            Self::Nested(r) => r.fullname.or(r.name).unwrap_or_default(),
        }
    }
}

/// Canonical row shape used everywhere past the client boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct SongRow {
    pub id: i64,
    pub author: String,
    pub title: String,
    pub genre: String,
    pub year: i32,
    pub duration: i32,
}

impl From<WireSong> for SongRow {
    fn from(song: WireSong) -> Self {
        Self {
            id: song.id,
            author: song.author.into_name(),
            title: song.title,
            genre: song.genre.into_name(),
            year: song.year_of_release,
            duration: song.duration,
        }
    }
}

impl SongRow {
    /// Get a display-friendly duration string (e.g., "3:45").
    pub fn duration_string(&self) -> String {
        let mins = self.duration / 60;
        let secs = self.duration % 60;
        format!("{mins}:{secs:02}")
    }
}

/// Current filter criteria. `None` is the "All" sentinel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSelection {
    pub author_id: Option<String>,
    pub genre_id: Option<String>,
    pub year: Option<i32>,
}

impl FilterSelection {
    /// True when every criterion is unconstrained.
    pub fn is_empty(&self) -> bool {
        self.author_id.is_none() && self.genre_id.is_none() && self.year.is_none()
    }
}

/// JSON body for the filtered songs query. Unset criteria serialize as
/// empty strings, which the service treats as unconstrained.
#[derive(Debug, Serialize)]
pub struct FilterRequest {
    pub author_id: String,
    pub genre_id: String,
    #[serde(rename = "yearOfRelease")]
    pub year_of_release: YearOfRelease,
}

/// A release year criterion: a number when set, `""` when not.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum YearOfRelease {
    Year(i32),
    Unset,
}

impl Serialize for YearOfRelease {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Year(year) => serializer.serialize_i32(*year),
            Self::Unset => serializer.serialize_str(""),
        }
    }
}

impl From<&FilterSelection> for FilterRequest {
    fn from(selection: &FilterSelection) -> Self {
        Self {
            author_id: selection.author_id.clone().unwrap_or_default(),
            genre_id: selection.genre_id.clone().unwrap_or_default(),
            year_of_release: match selection.year {
                Some(year) => YearOfRelease::Year(year),
                None => YearOfRelease::Unset,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_song_shape_normalizes() {
        let json = r#"{
            "id": 7,
            "author": {"fullname": "Nina Simone"},
            "genre": {"name": "Jazz"},
            "title": "Feeling Good",
            "yearOfRelease": 1965,
            "duration": 177
        }"#;
        let song: WireSong = serde_json::from_str(json).unwrap();
        let row = SongRow::from(song);

        assert_eq!(row.id, 7);
        assert_eq!(row.author, "Nina Simone");
        assert_eq!(row.genre, "Jazz");
        assert_eq!(row.year, 1965);
    }

    #[test]
    fn test_flat_song_shape_normalizes_to_same_row() {
        let json = r#"{
            "id": 7,
            "author": "Nina Simone",
            "genre": "Jazz",
            "title": "Feeling Good",
            "yearOfRelease": 1965,
            "duration": 177
        }"#;
        let song: WireSong = serde_json::from_str(json).unwrap();
        let row = SongRow::from(song);

        assert_eq!(row.author, "Nina Simone");
        assert_eq!(row.genre, "Jazz");
        assert_eq!(row.title, "Feeling Good");
    }

    #[test]
    fn test_filter_body_with_only_author_set() {
        let selection = FilterSelection {
            author_id: Some(String::from("A1")),
            genre_id: None,
            year: None,
        };
        let body = serde_json::to_value(FilterRequest::from(&selection)).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "author_id": "A1",
                "genre_id": "",
                "yearOfRelease": ""
            })
        );
    }

    #[test]
    fn test_filter_body_with_all_criteria_set() {
        let selection = FilterSelection {
            author_id: Some(String::from("A2")),
            genre_id: Some(String::from("G5")),
            year: Some(2021),
        };
        let body = serde_json::to_value(FilterRequest::from(&selection)).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "author_id": "A2",
                "genre_id": "G5",
                "yearOfRelease": 2021
            })
        );
    }

    #[test]
    fn test_empty_selection_serializes_all_sentinels() {
        let body = serde_json::to_value(FilterRequest::from(&FilterSelection::default())).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "author_id": "",
                "genre_id": "",
                "yearOfRelease": ""
            })
        );
    }

    #[test]
    fn test_duration_string() {
        let mut row = SongRow {
            id: 1,
            author: String::new(),
            title: String::new(),
            genre: String::new(),
            year: 2020,
            duration: 225,
        };
        assert_eq!(row.duration_string(), "3:45");

        row.duration = 59;
        assert_eq!(row.duration_string(), "0:59");
    }
}
