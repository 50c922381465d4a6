use crate::search::Searchable;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaylistId(pub String);

impl PlaylistId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A server-side playlist as listed by `getPlaylists`.
///
/// Two playlists are the same playlist when their ids match, whatever the
/// other fields say.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: PlaylistId,
    pub name: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub song_count: u32,
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub cover_art: Option<String>,
}

impl Playlist {
    pub fn new(id: &str, name: &str, comment: &str, owner: &str) -> Self {
        Self {
            id: PlaylistId::new(id),
            name: name.to_string(),
            comment: comment.to_string(),
            owner: owner.to_string(),
            public: false,
            song_count: 0,
            duration: 0,
            cover_art: None,
        }
    }
}

impl PartialEq for Playlist {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Playlist {}

impl Hash for Playlist {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Searchable for Playlist {
    fn search_fields(&self) -> [&str; 3] {
        [&self.name, &self.comment, &self.owner]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedPlaylistsPage {
    #[serde(default)]
    pub search_text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub source: Option<PathBuf>,
    #[serde(default)]
    pub playlists_page: SavedPlaylistsPage,
}
