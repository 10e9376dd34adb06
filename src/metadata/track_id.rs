use std::fmt;
use std::ops::Deref;

use crate::value::Value;

/// Object path MPRIS uses to say "there is no current track".
pub(crate) const NO_TRACK: &str = "/org/mpris/MediaPlayer2/TrackList/NoTrack";

/// Represents [the MPRIS `Track_Id` type][track_id].
///
/// Players send this as an object path, although some send a plain string. Empty values and
/// the special `NoTrack` path are not track ids.
///
/// ```rust
/// use mpris_client::TrackID;
/// let id = TrackID::try_from("/org/mpris/MediaPlayer2/Track/1").unwrap();
/// assert_eq!(&*id, "/org/mpris/MediaPlayer2/Track/1");
/// assert!(TrackID::try_from("/org/mpris/MediaPlayer2/TrackList/NoTrack").is_err());
/// ```
///
/// [track_id]: https://specifications.freedesktop.org/mpris-spec/latest/Player_Interface.html#Simple-Type:Track_Id
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TrackID(String);

impl TrackID {
    /// Returns the track id as a value suitable for a `SetPosition` call.
    pub(crate) fn to_value(&self) -> Value {
        Value::ObjectPath(self.0.clone())
    }
}

impl TryFrom<&str> for TrackID {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if value.is_empty() || value == NO_TRACK {
            Err(())
        } else {
            Ok(TrackID(value.to_owned()))
        }
    }
}

impl TryFrom<&Value> for TrackID {
    type Error = ();

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value.as_str().ok_or(()).and_then(TrackID::try_from)
    }
}

impl Deref for TrackID {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for TrackID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
