use zbus::zvariant;

use crate::value::ValueKind;

/// D-Bus error names that a player replies with when it does not have a property.
const UNKNOWN_PROPERTY_ERRORS: &[&str] = &[
    "org.freedesktop.DBus.Error.UnknownProperty",
    "org.freedesktop.DBus.Error.UnknownInterface",
    "org.freedesktop.DBus.Error.InvalidArgs",
];

/// Errors returned when talking to a player.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The connection itself failed: the bus is unreachable, the connection was dropped or the
    /// bus address could not be used. Messages that could not be (de)serialized also end up
    /// here.
    #[error("D-Bus transport failed: {0}")]
    Transport(#[source] zbus::Error),

    /// The player (or the bus on its behalf) answered with an error, e.g. because the object,
    /// interface, property or method does not exist.
    #[error("{interface}.{member} failed: {source}")]
    RemoteCall {
        /// Interface that was targeted.
        interface: String,
        /// Method or property name.
        member: String,
        /// Error reply as reported by zbus.
        #[source]
        source: zbus::Error,
    },

    /// The player answered with a value of an unexpected type.
    #[error("{interface}.{property} should be {expected}, but was {found:?}")]
    Decode {
        /// Interface that was read.
        interface: String,
        /// Property (or metadata key) that was read.
        property: String,
        /// Human readable description of the expected type.
        expected: &'static str,
        /// Type tag of the received value.
        found: ValueKind,
    },

    /// The call succeeded but no value was returned.
    #[error("{interface}.{property} has no value")]
    AbsentValue {
        /// Interface that was read.
        interface: String,
        /// Property (or metadata key) that was read.
        property: String,
    },

    /// A call argument cannot be represented on the bus.
    #[error("could not encode arguments for {interface}.{member}: {source}")]
    Encode {
        /// Interface that was targeted.
        interface: String,
        /// Method or property name.
        member: String,
        /// Encoding error.
        #[source]
        source: zvariant::Error,
    },

    /// No MPRIS player is currently running on the bus.
    #[error("No player found")]
    NoPlayerFound,
}

/// Result alias used throughout this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Sorts a failed bus call into either `Error::RemoteCall` or `Error::Transport`.
    ///
    /// Only error replies from the other side are `RemoteCall`. Messages that fail to
    /// (de)serialize locally are `Transport`.
    pub(crate) fn from_call(interface: &str, member: &str, error: zbus::Error) -> Self {
        match error {
            zbus::Error::MethodError(..)
            | zbus::Error::FDO(_)
            | zbus::Error::InterfaceNotFound => Error::RemoteCall {
                interface: interface.to_owned(),
                member: member.to_owned(),
                source: error,
            },
            other => Error::Transport(other),
        }
    }

    pub(crate) fn absent(interface: &str, property: &str) -> Self {
        Error::AbsentValue {
            interface: interface.to_owned(),
            property: property.to_owned(),
        }
    }

    pub(crate) fn decode(
        interface: &str,
        property: &str,
        expected: &'static str,
        found: ValueKind,
    ) -> Self {
        Error::Decode {
            interface: interface.to_owned(),
            property: property.to_owned(),
            expected,
            found,
        }
    }

    /// Returns `true` if the player rejected a property read because it does not have that
    /// property (or the interface it belongs to).
    pub fn is_unknown_property(&self) -> bool {
        match self {
            Error::RemoteCall { source, .. } => is_unknown_property_error(source),
            _ => false,
        }
    }

    /// Returns `true` if this error is `Error::AbsentValue`.
    pub fn is_absent_value(&self) -> bool {
        matches!(self, Error::AbsentValue { .. })
    }
}

fn is_unknown_property_error(error: &zbus::Error) -> bool {
    match error {
        zbus::Error::MethodError(name, _, _) => UNKNOWN_PROPERTY_ERRORS.contains(&name.as_str()),
        zbus::Error::FDO(fdo) => matches!(
            **fdo,
            zbus::fdo::Error::UnknownProperty(_)
                | zbus::fdo::Error::UnknownInterface(_)
                | zbus::fdo::Error::InvalidArgs(_)
        ),
        zbus::Error::InterfaceNotFound => true,
        _ => false,
    }
}

/// `LoopStatus` had an invalid string value.
#[derive(Debug, thiserror::Error)]
#[error("LoopStatus must be one of None, Track, Playlist, but was {0}")]
pub struct InvalidLoopStatus(pub(crate) String);
