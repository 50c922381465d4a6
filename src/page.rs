use crate::cache::{CacheState, LoadHandle, LocalSearchCache, RemoteCollection};
use crate::model::{Playlist, PlaylistId, SavedPlaylistsPage};
use tracing::debug;

pub const COLUMNS: [&str; 4] = ["Name", "Description", "Owner", "Track Count"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Playlists,
    Playlist(PlaylistId),
    Artist(String),
    Album(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistRow {
    pub id: PlaylistId,
    pub name: String,
    pub description: String,
    pub owner: String,
    pub track_count: String,
}

impl PlaylistRow {
    fn from_playlist(playlist: &Playlist) -> Self {
        Self {
            id: playlist.id.clone(),
            name: playlist.name.clone(),
            description: playlist.comment.clone(),
            owner: playlist.owner.clone(),
            track_count: playlist.song_count.to_string(),
        }
    }

    pub fn cells(&self) -> [&str; 4] {
        [&self.name, &self.description, &self.owner, &self.track_count]
    }
}

/// Browsable list of every playlist on the server, filtered locally.
///
/// Whenever a fresh snapshot lands the current search text is applied to
/// it, so a page restored with a saved query comes up already filtered.
pub struct PlaylistsPage<S: RemoteCollection<Item = Playlist>> {
    cache: LocalSearchCache<S>,
    search_text: String,
    rows: Vec<PlaylistRow>,
    pub selected: usize,
    pending_loads: Vec<LoadHandle>,
}

impl<S: RemoteCollection<Item = Playlist>> PlaylistsPage<S> {
    pub fn new(source: S) -> Self {
        Self::with_cache(LocalSearchCache::new(source), "")
    }

    pub fn restore(saved: &SavedPlaylistsPage, source: S) -> Self {
        Self::with_cache(LocalSearchCache::new(source), &saved.search_text)
    }

    pub fn with_cache(cache: LocalSearchCache<S>, search_text: &str) -> Self {
        let mut page = Self {
            cache,
            search_text: search_text.to_string(),
            rows: Vec::new(),
            selected: 0,
            pending_loads: Vec::new(),
        };
        let handle = page.cache.load();
        page.pending_loads.push(handle);
        page
    }

    pub fn route(&self) -> Route {
        Route::Playlists
    }

    pub fn save(&self) -> SavedPlaylistsPage {
        SavedPlaylistsPage {
            search_text: self.search_text.clone(),
        }
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn rows(&self) -> &[PlaylistRow] {
        &self.rows
    }

    pub fn state(&self) -> CacheState {
        self.cache.state()
    }

    pub fn on_searched(&mut self, query: &str) {
        self.search_text = query.to_string();
        self.rows = self
            .cache
            .search(query)
            .iter()
            .map(PlaylistRow::from_playlist)
            .collect();
        self.clamp_selection();
    }

    /// Drains snapshot notifications and re-filters once if any arrived.
    pub fn pump_events(&mut self) -> bool {
        let mut replaced = false;
        while let Some(event) = self.cache.try_recv_event() {
            debug!(generation = event.generation, len = event.len, "playlists snapshot replaced");
            replaced = true;
        }
        self.pending_loads.retain(|handle| !handle.is_finished());

        if replaced {
            let query = self.search_text.clone();
            self.on_searched(&query);
        }
        replaced
    }

    pub fn reload(&mut self) {
        let handle = self.cache.reload();
        self.pending_loads.push(handle);
    }

    /// Blocks until every fetch this page started has finished.
    pub fn wait_for_load(&mut self) {
        for handle in self.pending_loads.drain(..) {
            handle.join();
        }
        self.pump_events();
    }

    pub fn select_next(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        self.selected = (self.selected + 1).min(self.rows.len() - 1);
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn activate_selected(&self) -> Option<Route> {
        self.rows
            .get(self.selected)
            .map(|row| Route::Playlist(row.id.clone()))
    }

    fn clamp_selection(&mut self) {
        if self.rows.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.rows.len() {
            self.selected = self.rows.len() - 1;
        }
    }
}
