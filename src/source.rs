use crate::cache::RemoteCollection;
use crate::error::FetchError;
use crate::model::Playlist;
use crate::search::Searchable;
use crate::subsonic;
use std::fs;
use std::path::PathBuf;

/// Serves the same collection on every fetch.
#[derive(Debug, Clone, Default)]
pub struct StaticSource<T> {
    items: Vec<T>,
}

impl<T> StaticSource<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T> RemoteCollection for StaticSource<T>
where
    T: Searchable + Clone + Send + Sync + 'static,
{
    type Item = T;

    fn fetch_all(&self) -> Result<Vec<T>, FetchError> {
        Ok(self.items.clone())
    }
}

/// Reads a saved `getPlaylists` response from disk, once per fetch.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RemoteCollection for JsonFileSource {
    type Item = Playlist;

    fn fetch_all(&self) -> Result<Vec<Playlist>, FetchError> {
        let raw = fs::read_to_string(&self.path).map_err(|err| {
            FetchError::Unreachable(format!("failed to read {}: {err}", self.path.display()))
        })?;
        subsonic::decode_playlists(&raw)
    }
}
