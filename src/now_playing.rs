use crate::page::Route;

/// What the player reports about the track it is playing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NowPlaying {
    pub track: String,
    pub artist: String,
    pub artist_id: Option<String>,
    pub album: String,
    pub album_id: Option<String>,
    pub cover_art: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Link {
    text: String,
    target: Option<String>,
    hidden: bool,
}

impl Link {
    fn hidden() -> Self {
        Self {
            text: String::new(),
            target: None,
            hidden: true,
        }
    }

    fn set(&mut self, text: &str, target: Option<&str>) {
        self.text = text.to_string();
        self.target = target.map(str::to_string);
        self.hidden = text.is_empty();
    }

    fn label(&self) -> Option<&str> {
        (!self.hidden).then_some(self.text.as_str())
    }
}

/// Track, artist and album of the current track plus its cover art id.
///
/// The artist and album links start hidden and stay hidden while their
/// text is empty; a hidden link cannot be tapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlayingCard {
    track_name: String,
    artist: Link,
    album: Link,
    cover_art: Option<String>,
}

impl Default for NowPlayingCard {
    fn default() -> Self {
        Self::new()
    }
}

impl NowPlayingCard {
    pub fn new() -> Self {
        Self {
            track_name: String::new(),
            artist: Link::hidden(),
            album: Link::hidden(),
            cover_art: None,
        }
    }

    pub fn update(&mut self, now: &NowPlaying) {
        self.track_name = now.track.clone();
        self.artist.set(&now.artist, now.artist_id.as_deref());
        self.album.set(&now.album, now.album_id.as_deref());
        self.cover_art = now.cover_art.clone();
    }

    pub fn track_name(&self) -> &str {
        &self.track_name
    }

    pub fn artist_label(&self) -> Option<&str> {
        self.artist.label()
    }

    pub fn album_label(&self) -> Option<&str> {
        self.album.label()
    }

    pub fn cover_art(&self) -> Option<&str> {
        self.cover_art.as_deref()
    }

    pub fn tap_artist(&self) -> Option<Route> {
        self.artist.label()?;
        self.artist.target.clone().map(Route::Artist)
    }

    pub fn tap_album(&self) -> Option<Route> {
        self.album.label()?;
        self.album.target.clone().map(Route::Album)
    }
}
