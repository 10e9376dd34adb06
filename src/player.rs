use std::sync::mpsc::Sender;

use log::debug;
use zbus::blocking::Connection;

use super::{
    LoopStatus, PlaybackStatus, BASE_INTERFACE, MPRIS2_PATH, PLAYER_INTERFACE,
    PROPERTIES_INTERFACE,
};
use crate::bus::{Bus, MethodCall};
use crate::error::{Error, Result};
use crate::metadata::{Metadata, TrackID, LENGTH_KEY, TRACK_ID_KEY};
use crate::signal::PropertiesChanged;
use crate::time::{micros_to_seconds, seconds_to_micros, unsigned_micros_to_seconds};
use crate::value::{check_encodable, Value, ValueKind};

/// A MPRIS-compatible player.
///
/// You can query this player about the currently playing media, or control it. Creating a
/// `Player` does not talk to the bus; every method afterwards does exactly one call (except
/// `set_position`, which reads `Metadata` first) and nothing is cached.
///
/// **See:** [MPRIS2 MediaPlayer2.Player Specification][spec]
/// [spec]: <https://specifications.freedesktop.org/mpris-spec/latest/Player_Interface.html>
#[derive(Debug)]
pub struct Player<'a, B: Bus + ?Sized = Connection> {
    bus: &'a B,
    bus_name: String,
}

impl<'a, B: Bus + ?Sized> Player<'a, B> {
    /// Create a new `Player` for a bus name on a connection.
    ///
    /// The name is not checked; if no player answers on it, the first call will fail.
    pub fn new<S: Into<String>>(bus: &'a B, bus_name: S) -> Self {
        Player {
            bus,
            bus_name: bus_name.into(),
        }
    }

    /// Returns the player's D-Bus bus name.
    pub fn bus_name(&self) -> &str {
        &self.bus_name
    }

    /// Returns the connection this player talks through.
    pub fn bus(&self) -> &'a B {
        self.bus
    }

    /// Sends one call to the player's object. Errors are reported against `context`, which is
    /// the interface and member (or property) the caller was after.
    fn invoke(
        &self,
        context: (&str, &str),
        interface: &'static str,
        member: &'static str,
        args: Vec<Value>,
    ) -> Result<Option<Value>> {
        let (context_interface, context_member) = context;
        check_encodable(&args).map_err(|source| Error::Encode {
            interface: context_interface.to_owned(),
            member: context_member.to_owned(),
            source,
        })?;

        debug!(
            "Calling {}.{} on {} ({}.{})",
            interface, member, self.bus_name, context_interface, context_member
        );
        let call = MethodCall {
            destination: self.bus_name.clone(),
            path: MPRIS2_PATH,
            interface,
            member,
            args,
        };
        self.bus
            .call(&call)
            .map_err(|err| Error::from_call(context_interface, context_member, err))
    }

    fn call_method(
        &self,
        interface: &'static str,
        member: &'static str,
        args: Vec<Value>,
    ) -> Result<()> {
        self.invoke((interface, member), interface, member, args)
            .map(|_| ())
    }

    /// Reads a property through `org.freedesktop.DBus.Properties.Get`.
    ///
    /// # Errors
    ///
    /// * `Error::RemoteCall` if the player rejects the read (no such property, interface or
    ///   object).
    /// * `Error::Transport` if the connection fails.
    /// * `Error::AbsentValue` if the read succeeded without a value.
    pub fn get(&self, interface: &str, property: &str) -> Result<Value> {
        self.invoke(
            (interface, property),
            PROPERTIES_INTERFACE,
            "Get",
            vec![Value::from(interface), Value::from(property)],
        )?
        .ok_or_else(|| Error::absent(interface, property))
    }

    /// Writes a property through `org.freedesktop.DBus.Properties.Set`.
    ///
    /// The value is sent wrapped in a variant. Errors are the same as for `get`, plus
    /// `Error::Encode` if the value cannot be sent.
    pub fn set<V: Into<Value>>(&self, interface: &str, property: &str, value: V) -> Result<()> {
        self.invoke(
            (interface, property),
            PROPERTIES_INTERFACE,
            "Set",
            vec![
                Value::from(interface),
                Value::from(property),
                value.into().into_variant(),
            ],
        )
        .map(|_| ())
    }

    /// Reads a property of the `org.mpris.MediaPlayer2.Player` interface.
    pub fn get_player_property(&self, property: &str) -> Result<Value> {
        self.get(PLAYER_INTERFACE, property)
    }

    /// Writes a property of the `org.mpris.MediaPlayer2.Player` interface.
    pub fn set_player_property<V: Into<Value>>(&self, property: &str, value: V) -> Result<()> {
        self.set(PLAYER_INTERFACE, property, value)
    }

    fn get_string(&self, interface: &str, property: &str) -> Result<String> {
        match self.get(interface, property)? {
            Value::String(string) => Ok(string),
            other => Err(Error::decode(interface, property, "a string", other.kind())),
        }
    }

    fn get_bool(&self, interface: &str, property: &str) -> Result<bool> {
        match self.get(interface, property)? {
            Value::Bool(value) => Ok(value),
            other => Err(Error::decode(interface, property, "a boolean", other.kind())),
        }
    }

    fn get_f64(&self, interface: &str, property: &str) -> Result<f64> {
        match self.get(interface, property)? {
            Value::F64(value) => Ok(value),
            other => Err(Error::decode(interface, property, "a double", other.kind())),
        }
    }

    /// Returns the player's MPRIS `Identity`.
    ///
    /// This is usually the application's name, like `Spotify`.
    pub fn identity(&self) -> Result<String> {
        self.get_string(BASE_INTERFACE, "Identity")
    }

    /// Asks the player to bring its user interface to the front.
    ///
    /// See: [MPRIS2 specification about `Raise`](https://specifications.freedesktop.org/mpris-spec/latest/Media_Player.html#Method:Raise)
    pub fn raise(&self) -> Result<()> {
        self.call_method(BASE_INTERFACE, "Raise", Vec::new())
    }

    /// Asks the player to quit.
    ///
    /// See: [MPRIS2 specification about `Quit`](https://specifications.freedesktop.org/mpris-spec/latest/Media_Player.html#Method:Quit)
    pub fn quit(&self) -> Result<()> {
        self.call_method(BASE_INTERFACE, "Quit", Vec::new())
    }

    /// Queries the player to see if it can quit.
    pub fn can_quit(&self) -> Result<bool> {
        self.get_bool(BASE_INTERFACE, "CanQuit")
    }

    /// Queries the player to see if it can raise its user interface.
    pub fn can_raise(&self) -> Result<bool> {
        self.get_bool(BASE_INTERFACE, "CanRaise")
    }

    /// Query the player for current playback status.
    ///
    /// Statuses outside `Playing`, `Paused` and `Stopped` come back as
    /// `PlaybackStatus::Other` instead of failing.
    pub fn get_playback_status(&self) -> Result<PlaybackStatus> {
        self.get_string(PLAYER_INTERFACE, "PlaybackStatus")
            .map(PlaybackStatus::from)
    }

    /// Checks whether the player has a `LoopStatus` property at all.
    ///
    /// A player that rejects the read as an unknown property, or answers without a value, does
    /// not have one. Connection failures are still errors.
    pub fn has_loop_status(&self) -> Result<bool> {
        match self.get(PLAYER_INTERFACE, "LoopStatus") {
            Ok(_) => Ok(true),
            Err(ref err) if err.is_absent_value() || err.is_unknown_property() => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Query the player for the current loop status.
    ///
    /// Players without loop support fail this call; use `has_loop_status` to check first.
    ///
    /// See: [MPRIS2 specification about
    /// `LoopStatus`](https://specifications.freedesktop.org/mpris-spec/latest/Player_Interface.html#Property:LoopStatus)
    pub fn get_loop_status(&self) -> Result<LoopStatus> {
        let status = self.get_string(PLAYER_INTERFACE, "LoopStatus")?;
        status.parse().map_err(|err| {
            debug!("{} sent an invalid loop status: {}", self.bus_name, err);
            Error::decode(
                PLAYER_INTERFACE,
                "LoopStatus",
                "one of None, Track, Playlist",
                ValueKind::String,
            )
        })
    }

    /// Set the loop status of the player.
    ///
    /// See: [MPRIS2 specification about
    /// `LoopStatus`](https://specifications.freedesktop.org/mpris-spec/latest/Player_Interface.html#Property:LoopStatus)
    pub fn set_loop_status(&self, status: LoopStatus) -> Result<()> {
        self.set(PLAYER_INTERFACE, "LoopStatus", status.as_str())
    }

    /// Query player for the state of the "Shuffle" setting.
    ///
    /// See: [MPRIS2 specification about
    /// `Shuffle`](https://specifications.freedesktop.org/mpris-spec/latest/Player_Interface.html#Property:Shuffle)
    pub fn get_shuffle(&self) -> Result<bool> {
        self.get_bool(PLAYER_INTERFACE, "Shuffle")
    }

    /// Set the "Shuffle" setting of the player.
    pub fn set_shuffle(&self, state: bool) -> Result<()> {
        self.set(PLAYER_INTERFACE, "Shuffle", state)
    }

    /// Returns the player's MPRIS (playback) `rate` as a factor.
    ///
    /// 1.0 would mean normal rate, while 2.0 would mean twice the playback speed.
    pub fn get_rate(&self) -> Result<f64> {
        self.get_f64(PLAYER_INTERFACE, "Rate")
    }

    /// Set the playback rate of the player.
    pub fn set_rate(&self, rate: f64) -> Result<()> {
        self.set(PLAYER_INTERFACE, "Rate", rate)
    }

    /// Get the volume of the player.
    ///
    /// Volume should be between 0.0 and 1.0. Above 1.0 is possible, but not
    /// recommended.
    ///
    /// See: [MPRIS2 specification about
    /// `Volume`](https://specifications.freedesktop.org/mpris-spec/latest/Player_Interface.html#Property:Volume)
    pub fn get_volume(&self) -> Result<f64> {
        self.get_f64(PLAYER_INTERFACE, "Volume")
    }

    /// Set the volume of the player. The value is sent as is.
    pub fn set_volume(&self, volume: f64) -> Result<()> {
        self.set(PLAYER_INTERFACE, "Volume", volume)
    }

    /// Returns the player's position in the current track, in seconds.
    pub fn get_position(&self) -> Result<f64> {
        match self.get(PLAYER_INTERFACE, "Position")? {
            Value::I64(micros) => Ok(micros_to_seconds(micros)),
            Value::U64(micros) => Ok(unsigned_micros_to_seconds(micros)),
            other => Err(Error::decode(
                PLAYER_INTERFACE,
                "Position",
                "a 64-bit integer",
                other.kind(),
            )),
        }
    }

    /// Query the player for current metadata.
    ///
    /// See `Metadata` for more information about what is included here.
    pub fn get_metadata(&self) -> Result<Metadata> {
        match self.get(PLAYER_INTERFACE, "Metadata")? {
            Value::Map(values) => Ok(Metadata::from(values)),
            other => Err(Error::decode(
                PLAYER_INTERFACE,
                "Metadata",
                "a map of strings to variants",
                other.kind(),
            )),
        }
    }

    /// Returns the length of the current track in seconds, based on `mpris:length`.
    ///
    /// # Errors
    ///
    /// `Error::AbsentValue` if the metadata has no length and `Error::Decode` if the length is
    /// not a 64-bit integer, on top of the errors of `get_metadata`.
    pub fn get_length(&self) -> Result<f64> {
        let metadata = self.get_metadata()?;
        let key = metadata_key(LENGTH_KEY);
        match metadata.get(LENGTH_KEY) {
            Some(Value::I64(micros)) => Ok(micros_to_seconds(*micros)),
            Some(Value::U64(micros)) => Ok(unsigned_micros_to_seconds(*micros)),
            Some(other) => Err(Error::decode(
                PLAYER_INTERFACE,
                &key,
                "a signed or unsigned 64-bit integer",
                other.kind(),
            )),
            None => Err(Error::absent(PLAYER_INTERFACE, &key)),
        }
    }

    /// Sets the position of the current track, in seconds from its start.
    ///
    /// MPRIS needs the id of the track being positioned, so this reads `Metadata` first. If the
    /// track changes between that read and the `SetPosition` call, the player receives a stale
    /// track id and is expected to ignore the call.
    ///
    /// # Errors
    ///
    /// `Error::AbsentValue` if the metadata has no track id (or it is the `NoTrack` path),
    /// `Error::Decode` if the track id is not a path or string.
    pub fn set_position(&self, seconds: f64) -> Result<()> {
        let metadata = self.get_metadata()?;
        let key = metadata_key(TRACK_ID_KEY);
        let value = metadata
            .get(TRACK_ID_KEY)
            .ok_or_else(|| Error::absent(PLAYER_INTERFACE, &key))?;
        if value.as_str().is_none() {
            return Err(Error::decode(
                PLAYER_INTERFACE,
                &key,
                "an object path",
                value.kind(),
            ));
        }
        let track_id =
            TrackID::try_from(value).map_err(|_| Error::absent(PLAYER_INTERFACE, &key))?;

        self.set_track_position(&track_id, seconds)
    }

    /// Sets the position of the given track, in seconds from its start.
    ///
    /// See: [MPRIS2 specification about `SetPosition`](https://specifications.freedesktop.org/mpris-spec/latest/Player_Interface.html#Method:SetPosition)
    pub fn set_track_position(&self, track_id: &TrackID, seconds: f64) -> Result<()> {
        self.call_method(
            PLAYER_INTERFACE,
            "SetPosition",
            vec![track_id.to_value(), Value::I64(seconds_to_micros(seconds))],
        )
    }

    /// Send a `Next` signal to the player.
    ///
    /// See: [MPRIS2 specification about `Next`](https://specifications.freedesktop.org/mpris-spec/latest/Player_Interface.html#Method:Next)
    pub fn next(&self) -> Result<()> {
        self.call_method(PLAYER_INTERFACE, "Next", Vec::new())
    }

    /// Send a `Previous` signal to the player.
    ///
    /// See: [MPRIS2 specification about `Previous`](https://specifications.freedesktop.org/mpris-spec/latest/Player_Interface.html#Method:Previous)
    pub fn previous(&self) -> Result<()> {
        self.call_method(PLAYER_INTERFACE, "Previous", Vec::new())
    }

    /// Send a `Play` signal to the player.
    ///
    /// See: [MPRIS2 specification about `Play`](https://specifications.freedesktop.org/mpris-spec/latest/Player_Interface.html#Method:Play)
    pub fn play(&self) -> Result<()> {
        self.call_method(PLAYER_INTERFACE, "Play", Vec::new())
    }

    /// Send a `Pause` signal to the player.
    ///
    /// See: [MPRIS2 specification about `Pause`](https://specifications.freedesktop.org/mpris-spec/latest/Player_Interface.html#Method:Pause)
    pub fn pause(&self) -> Result<()> {
        self.call_method(PLAYER_INTERFACE, "Pause", Vec::new())
    }

    /// Send a `PlayPause` signal to the player.
    ///
    /// See: [MPRIS2 specification about `PlayPause`](https://specifications.freedesktop.org/mpris-spec/latest/Player_Interface.html#Method:PlayPause)
    pub fn play_pause(&self) -> Result<()> {
        self.call_method(PLAYER_INTERFACE, "PlayPause", Vec::new())
    }

    /// Send a `Stop` signal to the player.
    ///
    /// See: [MPRIS2 specification about `Stop`](https://specifications.freedesktop.org/mpris-spec/latest/Player_Interface.html#Method:Stop)
    pub fn stop(&self) -> Result<()> {
        self.call_method(PLAYER_INTERFACE, "Stop", Vec::new())
    }

    /// Seeks by `offset` seconds from the current position. Negative offsets seek backwards.
    ///
    /// See: [MPRIS2 specification about `Seek`](https://specifications.freedesktop.org/mpris-spec/latest/Player_Interface.html#Method:Seek)
    pub fn seek(&self, offset: f64) -> Result<()> {
        self.call_method(
            PLAYER_INTERFACE,
            "Seek",
            vec![Value::I64(seconds_to_micros(offset))],
        )
    }

    /// Asks the player to open and play the given URI.
    ///
    /// See: [MPRIS2 specification about `OpenUri`](https://specifications.freedesktop.org/mpris-spec/latest/Player_Interface.html#Method:OpenUri)
    pub fn open_uri(&self, uri: &str) -> Result<()> {
        self.call_method(PLAYER_INTERFACE, "OpenUri", vec![Value::from(uri)])
    }

    /// Queries the player to see if it can be controlled or not.
    ///
    /// See: [MPRIS2 specification about `CanControl`](https://specifications.freedesktop.org/mpris-spec/latest/Player_Interface.html#Property:CanControl)
    pub fn can_control(&self) -> Result<bool> {
        self.get_bool(PLAYER_INTERFACE, "CanControl")
    }

    /// Queries the player to see if it can go to next or not.
    pub fn can_go_next(&self) -> Result<bool> {
        self.get_bool(PLAYER_INTERFACE, "CanGoNext")
    }

    /// Queries the player to see if it can go to previous or not.
    pub fn can_go_previous(&self) -> Result<bool> {
        self.get_bool(PLAYER_INTERFACE, "CanGoPrevious")
    }

    /// Queries the player to see if it can play.
    pub fn can_play(&self) -> Result<bool> {
        self.get_bool(PLAYER_INTERFACE, "CanPlay")
    }

    /// Queries the player to see if it can pause.
    pub fn can_pause(&self) -> Result<bool> {
        self.get_bool(PLAYER_INTERFACE, "CanPause")
    }

    /// Queries the player to see if it can seek within the media.
    pub fn can_seek(&self) -> Result<bool> {
        self.get_bool(PLAYER_INTERFACE, "CanSeek")
    }

    /// Queries the player to see if it can stop.
    ///
    /// MPRIS2 defines [the `Stop` message to only work when the player can be controlled][stop], so that
    /// is the property used for this method.
    ///
    /// [stop]: https://specifications.freedesktop.org/mpris-spec/latest/Player_Interface.html#Method:Stop
    pub fn can_stop(&self) -> Result<bool> {
        self.can_control()
    }

    /// Sends a `Play` signal to the player, if the player indicates that it can play.
    ///
    /// Returns a boolean to show if the signal was sent or not.
    pub fn checked_play(&self) -> Result<bool> {
        if self.can_play()? {
            self.play().map(|_| true)
        } else {
            Ok(false)
        }
    }

    /// Sends a `Pause` signal to the player, if the player indicates that it can pause.
    ///
    /// Returns a boolean to show if the signal was sent or not.
    pub fn checked_pause(&self) -> Result<bool> {
        if self.can_pause()? {
            self.pause().map(|_| true)
        } else {
            Ok(false)
        }
    }

    /// Sends a `PlayPause` signal to the player, if the player indicates that it can pause.
    ///
    /// Returns a boolean to show if the signal was sent or not.
    pub fn checked_play_pause(&self) -> Result<bool> {
        if self.can_pause()? {
            self.play_pause().map(|_| true)
        } else {
            Ok(false)
        }
    }

    /// Sends a `Stop` signal to the player, if the player indicates that it can stop.
    ///
    /// Returns a boolean to show if the signal was sent or not.
    pub fn checked_stop(&self) -> Result<bool> {
        if self.can_stop()? {
            self.stop().map(|_| true)
        } else {
            Ok(false)
        }
    }

    /// Sends a `Next` signal to the player, if the player indicates that it can go to the next
    /// media.
    ///
    /// Returns a boolean to show if the signal was sent or not.
    pub fn checked_next(&self) -> Result<bool> {
        if self.can_go_next()? {
            self.next().map(|_| true)
        } else {
            Ok(false)
        }
    }

    /// Sends a `Previous` signal to the player, if the player indicates that it can go to a
    /// previous media.
    ///
    /// Returns a boolean to show if the signal was sent or not.
    pub fn checked_previous(&self) -> Result<bool> {
        if self.can_go_previous()? {
            self.previous().map(|_| true)
        } else {
            Ok(false)
        }
    }

    /// Seeks by `offset` seconds, if the player indicates that it can seek.
    ///
    /// Returns a boolean to show if the signal was sent or not.
    pub fn checked_seek(&self, offset: f64) -> Result<bool> {
        if self.can_seek()? {
            self.seek(offset).map(|_| true)
        } else {
            Ok(false)
        }
    }

    /// Delivers every `PropertiesChanged` signal from this player into `sender`.
    ///
    /// Signals are forwarded unfiltered, in the order the bus delivers them. Delivery stops when
    /// the player leaves the bus. A dropped receiver is only noticed on the next signal the
    /// player emits, so delivery stops at that point.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if the subscription could not be registered.
    pub fn subscribe(&self, sender: Sender<PropertiesChanged>) -> Result<()> {
        debug!("Subscribing to property changes of {}", self.bus_name);
        self.bus
            .subscribe(&self.bus_name, sender)
            .map_err(Error::Transport)
    }
}

fn metadata_key(key: &str) -> String {
    format!("Metadata[{}]", key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Failure, FakeBus};
    use std::collections::HashMap;
    use std::sync::mpsc;

    const VLC: &str = "org.mpris.MediaPlayer2.vlc";

    fn metadata_value(entries: Vec<(&str, Value)>) -> Value {
        Value::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key.to_owned(), value))
                .collect(),
        )
    }

    #[test]
    fn it_does_not_talk_to_the_bus_when_created() {
        let bus = FakeBus::new();
        let player = Player::new(&bus, "org.mpris.MediaPlayer2.does-not-exist");

        assert_eq!(player.bus_name(), "org.mpris.MediaPlayer2.does-not-exist");
        assert!(bus.calls().is_empty());
    }

    mod properties {
        use super::*;

        #[test]
        fn it_reads_properties_through_the_properties_interface() {
            let bus = FakeBus::new();
            bus.set_property(PLAYER_INTERFACE, "Volume", 0.5);
            let player = Player::new(&bus, VLC);

            assert_eq!(player.get(PLAYER_INTERFACE, "Volume").unwrap(), Value::F64(0.5));
            assert_eq!(
                bus.last_call(),
                Some(MethodCall {
                    destination: String::from(VLC),
                    path: "/org/mpris/MediaPlayer2",
                    interface: "org.freedesktop.DBus.Properties",
                    member: "Get",
                    args: vec![
                        Value::from("org.mpris.MediaPlayer2.Player"),
                        Value::from("Volume")
                    ],
                })
            );
        }

        #[test]
        fn it_always_sends_the_interface_when_setting() {
            let bus = FakeBus::new();
            let player = Player::new(&bus, VLC);

            player.set_volume(0.25).unwrap();

            let call = bus.last_call().unwrap();
            assert_eq!(call.member, "Set");
            assert_eq!(
                call.args,
                vec![
                    Value::from("org.mpris.MediaPlayer2.Player"),
                    Value::from("Volume"),
                    Value::F64(0.25).into_variant(),
                ]
            );
            assert_eq!(bus.property(PLAYER_INTERFACE, "Volume"), Some(Value::F64(0.25)));
        }

        #[test]
        fn it_reports_unknown_properties_as_remote_call_errors() {
            let bus = FakeBus::new();
            let player = Player::new(&bus, VLC);

            match player.get_player_property("Fullscreen") {
                Err(Error::RemoteCall {
                    interface, member, ..
                }) => {
                    assert_eq!(interface, PLAYER_INTERFACE);
                    assert_eq!(member, "Fullscreen");
                }
                other => panic!("Expected RemoteCall, got {:?}", other),
            }
        }

        #[test]
        fn it_reports_connection_failures_as_transport_errors() {
            let bus = FakeBus::new();
            bus.set_property(PLAYER_INTERFACE, "Volume", 0.5);
            bus.fail("Volume", Failure::Transport);
            let player = Player::new(&bus, VLC);

            assert!(matches!(player.get_volume(), Err(Error::Transport(_))));
            assert!(matches!(player.set_volume(1.0), Err(Error::Transport(_))));
        }

        #[test]
        fn it_reports_absent_values_instead_of_defaults() {
            let bus = FakeBus::new();
            bus.set_absent(PLAYER_INTERFACE, "Volume");
            bus.set_absent(PLAYER_INTERFACE, "Rate");
            bus.set_absent(PLAYER_INTERFACE, "Shuffle");
            bus.set_absent(PLAYER_INTERFACE, "Position");
            bus.set_absent(PLAYER_INTERFACE, "PlaybackStatus");
            bus.set_absent(PLAYER_INTERFACE, "Metadata");
            bus.set_absent(BASE_INTERFACE, "Identity");
            let player = Player::new(&bus, VLC);

            assert!(player.get_volume().unwrap_err().is_absent_value());
            assert!(player.get_rate().unwrap_err().is_absent_value());
            assert!(player.get_shuffle().unwrap_err().is_absent_value());
            assert!(player.get_position().unwrap_err().is_absent_value());
            assert!(player.get_playback_status().unwrap_err().is_absent_value());
            assert!(player.get_metadata().unwrap_err().is_absent_value());
            assert!(player.identity().unwrap_err().is_absent_value());
        }

        #[test]
        fn it_does_not_send_values_it_cannot_encode() {
            let bus = FakeBus::new();
            let player = Player::new(&bus, VLC);

            match player.set_player_property("Custom", Value::Unsupported) {
                Err(Error::Encode {
                    interface, member, ..
                }) => {
                    assert_eq!(interface, PLAYER_INTERFACE);
                    assert_eq!(member, "Custom");
                }
                other => panic!("Expected Encode, got {:?}", other),
            }
            assert!(bus.calls().is_empty());
        }

        #[test]
        fn it_tells_zero_volume_apart_from_absent_volume() {
            let bus = FakeBus::new();
            bus.set_property(PLAYER_INTERFACE, "Volume", 0.0);
            let player = Player::new(&bus, VLC);

            assert_eq!(player.get_volume().unwrap(), 0.0);
        }

        #[test]
        fn it_rejects_values_of_the_wrong_type() {
            let bus = FakeBus::new();
            bus.set_property(PLAYER_INTERFACE, "Volume", "loud");
            bus.set_property(PLAYER_INTERFACE, "Shuffle", 1u32);
            let player = Player::new(&bus, VLC);

            match player.get_volume() {
                Err(Error::Decode {
                    property, found, ..
                }) => {
                    assert_eq!(property, "Volume");
                    assert_eq!(found, ValueKind::String);
                }
                other => panic!("Expected Decode, got {:?}", other),
            }
            assert!(matches!(player.get_shuffle(), Err(Error::Decode { .. })));
        }

        #[test]
        fn it_rejects_replies_it_could_not_read() {
            let bus = FakeBus::new();
            bus.set_property(PLAYER_INTERFACE, "Volume", Value::Unsupported);
            let player = Player::new(&bus, VLC);

            match player.get_volume() {
                Err(Error::Decode { found, .. }) => assert_eq!(found, ValueKind::Unsupported),
                other => panic!("Expected Decode, got {:?}", other),
            }
        }

        #[test]
        fn it_reads_identity_and_simple_properties() {
            let bus = FakeBus::new();
            bus.set_property(BASE_INTERFACE, "Identity", "VLC media player");
            bus.set_property(PLAYER_INTERFACE, "Rate", 1.5);
            bus.set_property(PLAYER_INTERFACE, "Shuffle", true);
            let player = Player::new(&bus, VLC);

            assert_eq!(player.identity().unwrap(), "VLC media player");
            assert_eq!(player.get_rate().unwrap(), 1.5);
            assert!(player.get_shuffle().unwrap());
        }

        #[test]
        fn it_writes_shuffle_rate_and_loop_status() {
            let bus = FakeBus::new();
            let player = Player::new(&bus, VLC);

            player.set_shuffle(true).unwrap();
            player.set_rate(2.0).unwrap();
            player.set_loop_status(LoopStatus::Playlist).unwrap();

            assert_eq!(bus.property(PLAYER_INTERFACE, "Shuffle"), Some(Value::Bool(true)));
            assert_eq!(bus.property(PLAYER_INTERFACE, "Rate"), Some(Value::F64(2.0)));
            assert_eq!(
                bus.property(PLAYER_INTERFACE, "LoopStatus"),
                Some(Value::from("Playlist"))
            );
        }
    }

    mod playback_status {
        use super::*;

        #[test]
        fn it_decodes_known_statuses() {
            let bus = FakeBus::new();
            let player = Player::new(&bus, VLC);

            for (wire, expected) in [
                ("Playing", PlaybackStatus::Playing),
                ("Paused", PlaybackStatus::Paused),
                ("Stopped", PlaybackStatus::Stopped),
            ] {
                bus.set_property(PLAYER_INTERFACE, "PlaybackStatus", wire);
                assert_eq!(player.get_playback_status().unwrap(), expected);
            }
        }

        #[test]
        fn it_passes_unknown_statuses_through() {
            let bus = FakeBus::new();
            bus.set_property(PLAYER_INTERFACE, "PlaybackStatus", "Buffering");
            let player = Player::new(&bus, VLC);

            assert_eq!(
                player.get_playback_status().unwrap(),
                PlaybackStatus::Other(String::from("Buffering"))
            );
        }
    }

    mod loop_status {
        use super::*;

        #[test]
        fn it_probes_for_loop_status() {
            let bus = FakeBus::new();
            bus.set_property(PLAYER_INTERFACE, "LoopStatus", "Track");
            let player = Player::new(&bus, VLC);

            assert!(player.has_loop_status().unwrap());
            assert_eq!(player.get_loop_status().unwrap(), LoopStatus::Track);
        }

        #[test]
        fn it_reports_missing_loop_status_as_unsupported() {
            let bus = FakeBus::new();
            let player = Player::new(&bus, VLC);

            assert!(!player.has_loop_status().unwrap());
            assert!(matches!(
                player.get_loop_status(),
                Err(Error::RemoteCall { .. })
            ));
        }

        #[test]
        fn it_reports_absent_loop_status_without_a_default() {
            let bus = FakeBus::new();
            bus.set_absent(PLAYER_INTERFACE, "LoopStatus");
            let player = Player::new(&bus, VLC);

            assert!(!player.has_loop_status().unwrap());
            assert!(player.get_loop_status().unwrap_err().is_absent_value());
        }

        #[test]
        fn it_propagates_transport_errors_from_the_probe() {
            let bus = FakeBus::new();
            bus.fail("LoopStatus", Failure::Transport);
            let player = Player::new(&bus, VLC);

            assert!(matches!(player.has_loop_status(), Err(Error::Transport(_))));
        }

        #[test]
        fn it_rejects_invalid_loop_statuses() {
            let bus = FakeBus::new();
            bus.set_property(PLAYER_INTERFACE, "LoopStatus", "Forever");
            let player = Player::new(&bus, VLC);

            assert!(matches!(
                player.get_loop_status(),
                Err(Error::Decode { .. })
            ));
        }
    }

    mod time {
        use super::*;

        #[test]
        fn it_reads_position_in_seconds() {
            let bus = FakeBus::new();
            bus.set_property(PLAYER_INTERFACE, "Position", 90_500_000i64);
            let player = Player::new(&bus, VLC);

            assert_eq!(player.get_position().unwrap(), 90.5);
        }

        #[test]
        fn it_reads_length_from_signed_and_unsigned_integers() {
            let bus = FakeBus::new();
            let player = Player::new(&bus, VLC);

            bus.set_property(
                PLAYER_INTERFACE,
                "Metadata",
                metadata_value(vec![("mpris:length", Value::I64(245_000_000))]),
            );
            let signed = player.get_length().unwrap();

            bus.set_property(
                PLAYER_INTERFACE,
                "Metadata",
                metadata_value(vec![("mpris:length", Value::U64(245_000_000))]),
            );
            let unsigned = player.get_length().unwrap();

            assert_eq!(signed, 245.0);
            assert_eq!(signed, unsigned);
        }

        #[test]
        fn it_rejects_lengths_of_other_types() {
            let bus = FakeBus::new();
            bus.set_property(
                PLAYER_INTERFACE,
                "Metadata",
                metadata_value(vec![("mpris:length", Value::from("245"))]),
            );
            let player = Player::new(&bus, VLC);

            match player.get_length() {
                Err(Error::Decode {
                    property, found, ..
                }) => {
                    assert_eq!(property, "Metadata[mpris:length]");
                    assert_eq!(found, ValueKind::String);
                }
                other => panic!("Expected Decode, got {:?}", other),
            }

            bus.set_property(
                PLAYER_INTERFACE,
                "Metadata",
                metadata_value(vec![("mpris:length", Value::I32(245))]),
            );
            assert!(matches!(player.get_length(), Err(Error::Decode { .. })));
        }

        #[test]
        fn it_reports_missing_length() {
            let bus = FakeBus::new();
            bus.set_property(PLAYER_INTERFACE, "Metadata", metadata_value(vec![]));
            let player = Player::new(&bus, VLC);

            assert!(player.get_length().unwrap_err().is_absent_value());
        }

        #[test]
        fn it_sets_position_on_the_current_track() {
            let bus = FakeBus::new();
            bus.set_property(
                PLAYER_INTERFACE,
                "Metadata",
                metadata_value(vec![(
                    "mpris:trackid",
                    Value::ObjectPath(String::from("/org/videolan/vlc/playlist/7")),
                )]),
            );
            let player = Player::new(&bus, VLC);

            player.set_position(42.5).unwrap();

            let calls = bus.calls();
            assert_eq!(calls.len(), 2);
            assert_eq!(calls[0].member, "Get");
            assert_eq!(
                calls[1],
                MethodCall {
                    destination: String::from(VLC),
                    path: MPRIS2_PATH,
                    interface: PLAYER_INTERFACE,
                    member: "SetPosition",
                    args: vec![
                        Value::ObjectPath(String::from("/org/videolan/vlc/playlist/7")),
                        Value::I64(42_500_000),
                    ],
                }
            );
        }

        #[test]
        fn it_accepts_string_track_ids() {
            let bus = FakeBus::new();
            bus.set_property(
                PLAYER_INTERFACE,
                "Metadata",
                metadata_value(vec![("mpris:trackid", Value::from("/track/3"))]),
            );
            let player = Player::new(&bus, VLC);

            player.set_position(1.0).unwrap();

            assert_eq!(
                bus.last_call().unwrap().args,
                vec![
                    Value::ObjectPath(String::from("/track/3")),
                    Value::I64(1_000_000)
                ]
            );
        }

        #[test]
        fn it_refuses_to_set_position_without_a_track_id() {
            let bus = FakeBus::new();
            bus.set_property(
                PLAYER_INTERFACE,
                "Metadata",
                metadata_value(vec![("mpris:length", Value::I64(1))]),
            );
            let player = Player::new(&bus, VLC);

            assert!(player.set_position(10.0).unwrap_err().is_absent_value());

            bus.set_property(
                PLAYER_INTERFACE,
                "Metadata",
                metadata_value(vec![(
                    "mpris:trackid",
                    Value::ObjectPath(String::from("/org/mpris/MediaPlayer2/TrackList/NoTrack")),
                )]),
            );
            assert!(player.set_position(10.0).unwrap_err().is_absent_value());

            assert!(bus.calls().iter().all(|call| call.member == "Get"));
        }

        #[test]
        fn it_refuses_track_ids_of_other_types() {
            let bus = FakeBus::new();
            bus.set_property(
                PLAYER_INTERFACE,
                "Metadata",
                metadata_value(vec![("mpris:trackid", Value::I64(7))]),
            );
            let player = Player::new(&bus, VLC);

            assert!(matches!(
                player.set_position(10.0),
                Err(Error::Decode { .. })
            ));
        }

        #[test]
        fn it_refuses_track_ids_that_are_not_object_paths() {
            let bus = FakeBus::new();
            bus.set_property(
                PLAYER_INTERFACE,
                "Metadata",
                metadata_value(vec![("mpris:trackid", Value::from("track 7"))]),
            );
            let player = Player::new(&bus, VLC);

            assert!(matches!(
                player.set_position(10.0),
                Err(Error::Encode { .. })
            ));
            assert_eq!(bus.calls().len(), 1);
        }

        #[test]
        fn it_seeks_backwards_with_negative_offsets() {
            let bus = FakeBus::new();
            let player = Player::new(&bus, VLC);

            player.seek(-5.0).unwrap();
            player.seek(0.25).unwrap();

            let calls = bus.calls();
            assert_eq!(calls[0].member, "Seek");
            assert_eq!(calls[0].args, vec![Value::I64(-5_000_000)]);
            assert_eq!(calls[1].args, vec![Value::I64(250_000)]);
        }
    }

    mod metadata {
        use super::*;

        #[test]
        fn it_passes_metadata_through() {
            let bus = FakeBus::new();
            bus.set_property(
                PLAYER_INTERFACE,
                "Metadata",
                metadata_value(vec![
                    ("xesam:title", Value::from("Song 2")),
                    ("custom:key", Value::U8(9)),
                ]),
            );
            let player = Player::new(&bus, VLC);

            let metadata = player.get_metadata().unwrap();
            assert_eq!(metadata.title(), Some("Song 2"));
            assert_eq!(metadata.get("custom:key"), Some(&Value::U8(9)));
        }

        #[test]
        fn it_rejects_metadata_that_is_not_a_map() {
            let bus = FakeBus::new();
            bus.set_property(PLAYER_INTERFACE, "Metadata", "nope");
            let player = Player::new(&bus, VLC);

            assert!(matches!(
                player.get_metadata(),
                Err(Error::Decode { .. })
            ));
        }
    }

    mod controls {
        use super::*;

        #[test]
        fn it_sends_transport_controls() {
            let bus = FakeBus::new();
            let player = Player::new(&bus, VLC);

            player.next().unwrap();
            player.previous().unwrap();
            player.play().unwrap();
            player.pause().unwrap();
            player.play_pause().unwrap();
            player.stop().unwrap();
            player.open_uri("file:///tmp/song.ogg").unwrap();

            let members: Vec<&str> = bus.calls().iter().map(|call| call.member).collect();
            assert_eq!(
                members,
                vec!["Next", "Previous", "Play", "Pause", "PlayPause", "Stop", "OpenUri"]
            );
            assert!(bus
                .calls()
                .iter()
                .all(|call| call.interface == PLAYER_INTERFACE && call.path == MPRIS2_PATH));
            assert_eq!(
                bus.last_call().unwrap().args,
                vec![Value::from("file:///tmp/song.ogg")]
            );
        }

        #[test]
        fn it_sends_base_interface_methods() {
            let bus = FakeBus::new();
            let player = Player::new(&bus, VLC);

            player.raise().unwrap();
            player.quit().unwrap();

            let calls = bus.calls();
            assert_eq!(calls[0].interface, BASE_INTERFACE);
            assert_eq!(calls[0].member, "Raise");
            assert_eq!(calls[1].member, "Quit");
            assert!(calls.iter().all(|call| call.args.is_empty()));
        }

        #[test]
        fn it_propagates_rejected_calls() {
            let bus = FakeBus::new();
            bus.fail("Next", Failure::Rejected);
            let player = Player::new(&bus, VLC);

            match player.next() {
                Err(Error::RemoteCall {
                    interface, member, ..
                }) => {
                    assert_eq!(interface, PLAYER_INTERFACE);
                    assert_eq!(member, "Next");
                }
                other => panic!("Expected RemoteCall, got {:?}", other),
            }
        }

        #[test]
        fn it_only_sends_checked_controls_when_allowed() {
            let bus = FakeBus::new();
            bus.set_property(PLAYER_INTERFACE, "CanGoNext", false);
            bus.set_property(PLAYER_INTERFACE, "CanPause", true);
            let player = Player::new(&bus, VLC);

            assert!(!player.checked_next().unwrap());
            assert!(player.checked_play_pause().unwrap());

            let members: Vec<&str> = bus
                .calls()
                .iter()
                .filter(|call| call.interface == PLAYER_INTERFACE)
                .map(|call| call.member)
                .collect();
            assert_eq!(members, vec!["PlayPause"]);
        }

        #[test]
        fn it_uses_can_control_for_stopping() {
            let bus = FakeBus::new();
            bus.set_property(PLAYER_INTERFACE, "CanControl", false);
            let player = Player::new(&bus, VLC);

            assert!(!player.can_stop().unwrap());
            assert!(!player.checked_stop().unwrap());
        }
    }

    mod signals {
        use super::*;

        #[test]
        fn it_forwards_property_changes_unchanged() {
            let bus = FakeBus::new();
            let player = Player::new(&bus, VLC);
            let (sender, receiver) = mpsc::channel();

            player.subscribe(sender).unwrap();
            assert_eq!(bus.subscribed_services(), vec![VLC]);

            let mut changed = HashMap::new();
            changed.insert(String::from("Volume"), Value::F64(0.3));
            let signal = PropertiesChanged {
                sender: String::from(":1.42"),
                interface: String::from(PLAYER_INTERFACE),
                changed,
                invalidated: Vec::new(),
            };
            bus.emit(signal.clone());

            assert_eq!(receiver.recv().unwrap(), signal);
        }

        #[test]
        fn it_reports_subscription_failures_as_transport_errors() {
            let bus = FakeBus::new();
            bus.fail("subscribe", Failure::Rejected);
            let player = Player::new(&bus, VLC);
            let (sender, _receiver) = mpsc::channel();

            assert!(matches!(player.subscribe(sender), Err(Error::Transport(_))));
        }
    }
}
