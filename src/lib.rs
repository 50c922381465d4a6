pub mod cache;
pub mod config;
pub mod error;
pub mod model;
pub mod now_playing;
pub mod page;
pub mod search;
pub mod source;
pub mod subsonic;
