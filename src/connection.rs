use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use log::debug;
use zbus::blocking::{Connection, ConnectionBuilder};

use crate::error::{Error, Result};

/// Which bus to connect to.
///
/// MPRIS players register on the session bus, so that is the default.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BusType {
    /// The user's session bus (`DBUS_SESSION_BUS_ADDRESS`).
    #[default]
    Session,

    /// The system-wide bus.
    System,

    /// A bus at an explicit address, like `unix:path=/run/user/1000/bus`.
    Address(String),
}

impl FromStr for BusType {
    type Err = Infallible;

    /// `"session"` and `"system"` select those buses; anything else is taken as an address.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "session" => BusType::Session,
            "system" => BusType::System,
            address => BusType::Address(address.to_owned()),
        })
    }
}

impl fmt::Display for BusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusType::Session => f.write_str("session"),
            BusType::System => f.write_str("system"),
            BusType::Address(address) => f.write_str(address),
        }
    }
}

/// Opens a new blocking connection to the given bus.
///
/// Failures are reported as `Error::Transport`.
pub fn connect(bus_type: &BusType) -> Result<Connection> {
    debug!("Connecting to the {} bus", bus_type);
    let connection = match bus_type {
        BusType::Session => Connection::session(),
        BusType::System => Connection::system(),
        BusType::Address(address) => {
            ConnectionBuilder::address(address.as_str()).and_then(ConnectionBuilder::build)
        }
    };
    connection.map_err(Error::Transport)
}
