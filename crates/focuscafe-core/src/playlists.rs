//! Saved links for the external music player.
//!
//! Only user-created playlists are persisted; the built-in ones are static.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::profile::Profile;

const SPOTIFY_HOST: &str = "open.spotify.com";

/// A user-created playlist link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: i64,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinPlaylist {
    pub id: &'static str,
    pub name: &'static str,
    pub url: &'static str,
}

pub static BUILTIN_PLAYLISTS: [BuiltinPlaylist; 3] = [
    BuiltinPlaylist {
        id: "lofi",
        name: "Lofi Girl",
        url: "https://open.spotify.com/embed/playlist/0vvXsWCC9xrXsKd4FyS8kM",
    },
    BuiltinPlaylist {
        id: "piano",
        name: "Peaceful Piano",
        url: "https://open.spotify.com/embed/playlist/37i9dQZF1DX4sWSpwq3LiO",
    },
    BuiltinPlaylist {
        id: "alpha",
        name: "Alpha Waves",
        url: "https://open.spotify.com/embed/playlist/5XBZaWeBRk5QBL5BdI3D2A",
    },
];

/// A playlist as shown in the picker, built-in or custom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaylistEntry<'a> {
    pub id: String,
    pub name: &'a str,
    pub url: &'a str,
    pub custom: bool,
}

/// Rewrite Spotify share links into their embeddable form.
///
/// `https://open.spotify.com/playlist/x?si=y` becomes
/// `https://open.spotify.com/embed/playlist/x`. Anything else is returned
/// trimmed but otherwise untouched.
pub fn embed_url(link: &str) -> String {
    let link = link.trim();
    let Ok(mut url) = Url::parse(link) else {
        return link.to_string();
    };
    if url.host_str() != Some(SPOTIFY_HOST) {
        return link.to_string();
    }
    if !url.path().starts_with("/embed/") {
        let path = format!("/embed{}", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    url.to_string()
}

/// Id for a new custom playlist: the creation time in milliseconds, bumped
/// past the newest saved id so ids stay unique and increasing.
pub fn next_id(profile: &Profile, now_ms: i64) -> i64 {
    match profile.playlists().iter().map(|p| p.id).max() {
        Some(newest) if newest >= now_ms => newest.saturating_add(1),
        _ => now_ms,
    }
}

/// Save a custom playlist. Empty names or links are rejected.
pub fn save(profile: &mut Profile, name: &str, link: &str, id: i64) -> Option<Playlist> {
    let name = name.trim();
    if name.is_empty() || link.trim().is_empty() {
        return None;
    }
    let playlist = Playlist {
        id,
        name: name.to_string(),
        url: embed_url(link),
    };
    profile.playlists_mut().push(playlist.clone());
    Some(playlist)
}

/// Remove a custom playlist by id. Returns whether anything was removed.
pub fn remove(profile: &mut Profile, id: i64) -> bool {
    let list = profile.playlists_mut();
    let before = list.len();
    list.retain(|p| p.id != id);
    list.len() != before
}

/// Drop every custom playlist. Returns how many were removed.
pub fn clear(profile: &mut Profile) -> usize {
    let list = profile.playlists_mut();
    let removed = list.len();
    list.clear();
    removed
}

/// Built-ins first, then the user's playlists in creation order.
pub fn all(profile: &Profile) -> Vec<PlaylistEntry<'_>> {
    let builtin = BUILTIN_PLAYLISTS.iter().map(|p| PlaylistEntry {
        id: p.id.to_string(),
        name: p.name,
        url: p.url,
        custom: false,
    });
    let custom = profile.playlists().iter().map(|p| PlaylistEntry {
        id: p.id.to_string(),
        name: &p.name,
        url: &p.url,
        custom: true,
    });
    builtin.chain(custom).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spotify_links_become_embeds() {
        assert_eq!(
            embed_url("https://open.spotify.com/playlist/abc123?si=xyz"),
            "https://open.spotify.com/embed/playlist/abc123"
        );
        assert_eq!(
            embed_url(" https://open.spotify.com/embed/album/q1?si=1 "),
            "https://open.spotify.com/embed/album/q1"
        );
    }

    #[test]
    fn other_links_pass_through() {
        assert_eq!(
            embed_url("https://www.youtube.com/watch?v=jfKfPfyJRdk"),
            "https://www.youtube.com/watch?v=jfKfPfyJRdk"
        );
        assert_eq!(embed_url("not a url"), "not a url");
    }

    #[test]
    fn save_remove_clear() {
        let mut profile = Profile::default();
        assert!(save(&mut profile, "", "https://x.test", 1).is_none());
        assert!(save(&mut profile, "Mix", "  ", 1).is_none());

        let saved = save(&mut profile, " Deep ", "https://open.spotify.com/playlist/p1", 7).unwrap();
        assert_eq!(saved.name, "Deep");
        assert_eq!(saved.url, "https://open.spotify.com/embed/playlist/p1");
        save(&mut profile, "Other", "https://x.test/a", 8).unwrap();

        assert!(remove(&mut profile, 7));
        assert!(!remove(&mut profile, 7));
        assert_eq!(profile.playlists().len(), 1);
        assert_eq!(clear(&mut profile), 1);
        assert!(profile.playlists().is_empty());
    }

    #[test]
    fn ids_follow_the_clock_and_never_repeat() {
        let mut profile = Profile::default();
        assert_eq!(next_id(&profile, 1_000), 1_000);
        save(&mut profile, "A", "https://x.test/a", 1_000).unwrap();
        assert_eq!(next_id(&profile, 1_000), 1_001);
        assert_eq!(next_id(&profile, 900), 1_001);
        assert_eq!(next_id(&profile, 5_000), 5_000);
    }

    #[test]
    fn listing_puts_builtins_first() {
        let mut profile = Profile::default();
        save(&mut profile, "Mine", "https://x.test/m", 42).unwrap();
        let entries = all(&profile);
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].id, "lofi");
        assert!(!entries[0].custom);
        assert_eq!(entries[3].id, "42");
        assert!(entries[3].custom);
    }
}
