#![warn(missing_docs)]
#![deny(
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications
)]

//!
//! # mpris-client
//!
//! `mpris_client` is a small blocking client for MPRIS2-compatible media players over D-Bus.
//!
//! This would mostly apply to the Linux-ecosystem which is a heavy user of D-Bus.
//!
//! ## Getting started
//!
//! ```rust,no_run
//! use mpris_client::PlayerFinder;
//!
//! # fn main() -> mpris_client::Result<()> {
//! let finder = PlayerFinder::new()?;
//! for name in finder.list_names()? {
//!     let player = finder.player(name);
//!     println!("{}: {:?}", player.identity()?, player.get_playback_status()?);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Every method on [`Player`] is one blocking round-trip; nothing is cached. Times are `f64`
//! seconds; the bus uses integer microseconds and [`time`] converts between the two.
//!
//! Look at the demos under `demos/` for more.

mod bus;
mod connection;
mod error;
mod find;
mod metadata;
mod player;
mod proxies;
mod signal;
pub mod time;
mod value;

#[cfg(test)]
mod testing;

pub use bus::{Bus, MethodCall};
pub use connection::{connect, BusType};
pub use error::{Error, InvalidLoopStatus, Result};
pub use find::{list_players, PlayerFinder};
pub use metadata::{Metadata, TrackID, LENGTH_KEY, TRACK_ID_KEY};
pub use player::Player;
pub use signal::PropertiesChanged;
pub use value::{Value, ValueKind};

/// Object path every MPRIS2 player exposes.
pub const MPRIS2_PATH: &str = "/org/mpris/MediaPlayer2";

/// Root interface (`Identity`, `Raise`, `Quit`). Also the prefix of every player's bus name.
pub const BASE_INTERFACE: &str = "org.mpris.MediaPlayer2";

/// Playback control interface.
pub const PLAYER_INTERFACE: &str = "org.mpris.MediaPlayer2.Player";

/// Track list interface. Not used by `Player` yet.
pub const TRACK_LIST_INTERFACE: &str = "org.mpris.MediaPlayer2.TrackList";

/// Playlists interface. Not used by `Player` yet.
pub const PLAYLISTS_INTERFACE: &str = "org.mpris.MediaPlayer2.Playlists";

/// Standard D-Bus interface used for all property reads and writes.
pub const PROPERTIES_INTERFACE: &str = "org.freedesktop.DBus.Properties";

/// Member name of the property change signal.
pub const PROPERTIES_CHANGED: &str = "PropertiesChanged";

/// A Player's playback status.
///
/// See: [MPRIS2 specification about
/// `Playback_Status`](https://specifications.freedesktop.org/mpris-spec/latest/Player_Interface.html#Enum:Playback_Status)
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlaybackStatus {
    /// A track is currently playing.
    Playing,

    /// A track is currently paused.
    Paused,

    /// There is no track currently playing.
    Stopped,

    /// The player sent a status outside the MPRIS2 set. The string is kept as sent.
    Other(String),
}

impl PlaybackStatus {
    /// The status as it appears on the bus.
    pub fn as_str(&self) -> &str {
        match self {
            PlaybackStatus::Playing => "Playing",
            PlaybackStatus::Paused => "Paused",
            PlaybackStatus::Stopped => "Stopped",
            PlaybackStatus::Other(other) => other,
        }
    }
}

impl From<String> for PlaybackStatus {
    fn from(string: String) -> Self {
        match string.as_str() {
            "Playing" => PlaybackStatus::Playing,
            "Paused" => PlaybackStatus::Paused,
            "Stopped" => PlaybackStatus::Stopped,
            _ => PlaybackStatus::Other(string),
        }
    }
}

impl<'a> From<&'a str> for PlaybackStatus {
    fn from(string: &'a str) -> Self {
        PlaybackStatus::from(String::from(string))
    }
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// A Player's looping status.
///
/// See: [MPRIS2 specification about
/// `Loop_Status`](https://specifications.freedesktop.org/mpris-spec/latest/Player_Interface.html#Enum:Loop_Status)
pub enum LoopStatus {
    /// The playback will stop when there are no more tracks to play
    None,

    /// The current track will start again from the begining once it has finished playing
    Track,

    /// The playback loops through a list of tracks
    Playlist,
}

impl std::str::FromStr for LoopStatus {
    type Err = InvalidLoopStatus;

    fn from_str(string: &str) -> std::result::Result<Self, Self::Err> {
        match string {
            "None" => Ok(LoopStatus::None),
            "Track" => Ok(LoopStatus::Track),
            "Playlist" => Ok(LoopStatus::Playlist),
            other => Err(InvalidLoopStatus(other.to_string())),
        }
    }
}

impl LoopStatus {
    /// The status as it appears on the bus.
    pub fn as_str(&self) -> &'static str {
        match *self {
            LoopStatus::None => "None",
            LoopStatus::Track => "Track",
            LoopStatus::Playlist => "Playlist",
        }
    }
}
