use crate::error::FetchError;
use crate::model::Playlist;
use serde::Deserialize;

const STATUS_OK: &str = "ok";

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "subsonic-response")]
    response: Response,
}

#[derive(Debug, Deserialize)]
struct Response {
    status: String,
    #[serde(default)]
    error: Option<ServerError>,
    #[serde(default)]
    playlists: Option<PlaylistsBody>,
}

#[derive(Debug, Deserialize)]
struct ServerError {
    code: u32,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Default, Deserialize)]
struct PlaylistsBody {
    #[serde(default)]
    playlist: Vec<Playlist>,
}

/// Decodes the JSON body of a `getPlaylists` call.
///
/// Servers omit the `playlist` array entirely when the user has none, so a
/// missing array is an empty list rather than an error.
pub fn decode_playlists(raw: &str) -> Result<Vec<Playlist>, FetchError> {
    let envelope: Envelope =
        serde_json::from_str(raw).map_err(|err| FetchError::Malformed(err.to_string()))?;
    let response = envelope.response;

    if response.status != STATUS_OK {
        return Err(match response.error {
            Some(error) => FetchError::Server {
                code: error.code,
                message: error.message,
            },
            None => FetchError::Malformed(format!(
                "status {} without error details",
                response.status
            )),
        });
    }

    Ok(response.playlists.unwrap_or_default().playlist)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_playlist_listing() {
        let raw = r#"{
            "subsonic-response": {
                "status": "ok",
                "version": "1.16.1",
                "playlists": {
                    "playlist": [
                        {
                            "id": "800000003",
                            "name": "Road Trip",
                            "comment": "Summer songs",
                            "owner": "alice",
                            "public": true,
                            "songCount": 14,
                            "duration": 3120,
                            "created": "2023-03-01T10:00:00.000Z",
                            "coverArt": "pl-800000003"
                        },
                        { "id": "800000004", "name": "Chill", "owner": "bob" }
                    ]
                }
            }
        }"#;

        let playlists = decode_playlists(raw).expect("decode");
        assert_eq!(playlists.len(), 2);
        assert_eq!(playlists[0].id.as_str(), "800000003");
        assert_eq!(playlists[0].song_count, 14);
        assert_eq!(playlists[0].cover_art.as_deref(), Some("pl-800000003"));
        assert!(playlists[0].public);
        assert_eq!(playlists[1].comment, "");
        assert_eq!(playlists[1].song_count, 0);
    }

    #[test]
    fn missing_playlist_array_is_empty() {
        let raw = r#"{"subsonic-response":{"status":"ok","version":"1.16.1","playlists":{}}}"#;
        assert!(decode_playlists(raw).expect("decode").is_empty());

        let raw = r#"{"subsonic-response":{"status":"ok","version":"1.16.1"}}"#;
        assert!(decode_playlists(raw).expect("decode").is_empty());
    }

    #[test]
    fn failed_status_maps_to_server_error() {
        let raw = r#"{"subsonic-response":{"status":"failed","version":"1.16.1",
            "error":{"code":40,"message":"Wrong username or password"}}}"#;
        match decode_playlists(raw) {
            Err(FetchError::Server { code, message }) => {
                assert_eq!(code, 40);
                assert_eq!(message, "Wrong username or password");
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(
            decode_playlists("<html>502 Bad Gateway</html>"),
            Err(FetchError::Malformed(_))
        ));
        assert!(matches!(
            decode_playlists(r#"{"status":"ok"}"#),
            Err(FetchError::Malformed(_))
        ));
        assert!(matches!(
            decode_playlists(r#"{"subsonic-response":{"status":"failed"}}"#),
            Err(FetchError::Malformed(_))
        ));
    }
}
