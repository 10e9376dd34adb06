use log::trace;
use zbus::blocking::Connection;

use crate::bus::Bus;
use crate::connection::{connect, BusType};
use crate::error::{Error, Result};
use crate::player::Player;
use crate::BASE_INTERFACE;

/// Lists the bus names of all MPRIS2 players on the bus.
///
/// A name counts as a player if it starts with `org.mpris.MediaPlayer2`; the player is not
/// asked whether it actually implements the interfaces. Names come back in the order the bus
/// lists them. An empty list means no player is running.
///
/// # Errors
///
/// Returns `Error::Transport` if the bus could not be asked.
pub fn list_players<B: Bus + ?Sized>(bus: &B) -> Result<Vec<String>> {
    let names = bus.list_names().map_err(Error::Transport)?;
    let players: Vec<String> = names
        .into_iter()
        .filter(|name| name.starts_with(BASE_INTERFACE))
        .collect();
    trace!("Found {} MPRIS2 player(s): {:?}", players.len(), players);
    Ok(players)
}

/// Used to find `Player`s running on a D-Bus connection.
#[derive(Debug)]
pub struct PlayerFinder<B = Connection> {
    connection: B,
}

impl PlayerFinder<Connection> {
    /// Creates a new `PlayerFinder` with a new session bus connection.
    ///
    /// Use `for_connection` if you want to provide the D-Bus connection yourself.
    pub fn new() -> Result<Self> {
        PlayerFinder::for_bus_type(&BusType::Session)
    }

    /// Creates a new `PlayerFinder` connected to the given bus.
    pub fn for_bus_type(bus_type: &BusType) -> Result<Self> {
        connect(bus_type).map(PlayerFinder::for_connection)
    }
}

impl<B: Bus> PlayerFinder<B> {
    /// Create a new `PlayerFinder` with the given connection.
    ///
    /// Use `new` if you want a new default connection rather than manually managing the D-Bus
    /// connection.
    pub fn for_connection(connection: B) -> Self {
        PlayerFinder { connection }
    }

    /// Returns the connection this finder uses.
    pub fn connection(&self) -> &B {
        &self.connection
    }

    /// Lists the bus names of all players. See [`list_players`].
    pub fn list_names(&self) -> Result<Vec<String>> {
        list_players(&self.connection)
    }

    /// Creates a `Player` for the given bus name on this finder's connection.
    ///
    /// The name does not have to come from `list_names`.
    pub fn player<S: Into<String>>(&self, bus_name: S) -> Player<'_, B> {
        Player::new(&self.connection, bus_name)
    }

    /// Find all available `Player`s in the connection.
    pub fn find_all(&self) -> Result<Vec<Player<'_, B>>> {
        Ok(self
            .list_names()?
            .into_iter()
            .map(|bus_name| self.player(bus_name))
            .collect())
    }

    /// Try to find the "active" player in the connection.
    ///
    /// MPRIS does not have the concept of "active" and all players are treated the same, even if
    /// only one of the players are currently playing something.
    ///
    /// **NOTE:** Currently this method is very naive and just returns the first player. This
    /// behavior can change later without a major version change, so don't rely on that behavior.
    pub fn find_active(&self) -> Result<Player<'_, B>> {
        self.list_names()?
            .into_iter()
            .next()
            .map(|bus_name| self.player(bus_name))
            .ok_or(Error::NoPlayerFound)
    }
}
