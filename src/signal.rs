use std::collections::HashMap;
use std::sync::mpsc::Sender;
use std::sync::Arc;

use log::{debug, warn};
use zbus::zvariant;
use zbus::{Message, MessageType};

use super::{MPRIS2_PATH, PROPERTIES_CHANGED, PROPERTIES_INTERFACE};
use crate::value::Value;

const DBUS_SERVICE: &str = "org.freedesktop.DBus";
const DBUS_PATH: &str = "/org/freedesktop/DBus";
const NAME_OWNER_CHANGED: &str = "NameOwnerChanged";

/// A raw `org.freedesktop.DBus.Properties.PropertiesChanged` notification from a player.
///
/// Nothing is filtered or interpreted; records arrive in the order the bus delivered them.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertiesChanged {
    /// Unique bus name of the emitting connection (something like `:1.1337`).
    pub sender: String,

    /// Interface whose properties changed, usually `org.mpris.MediaPlayer2.Player`.
    pub interface: String,

    /// Properties with their new values.
    pub changed: HashMap<String, Value>,

    /// Properties that changed but whose new value was not sent.
    pub invalidated: Vec<String>,
}

type PropertiesChangedBody<'a> = (
    String,
    HashMap<String, zvariant::Value<'a>>,
    Vec<String>,
);

impl PropertiesChanged {
    fn from_body(sender: String, body: PropertiesChangedBody<'_>) -> Self {
        let (interface, changed, invalidated) = body;
        PropertiesChanged {
            sender,
            interface,
            changed: changed
                .into_iter()
                .map(|(key, value)| (key, Value::from(value)))
                .collect(),
            invalidated,
        }
    }
}

/// Builds the match rule for property changes on a player object.
pub(crate) fn match_rule(service: &str) -> String {
    format!(
        "type='signal',sender='{}',path='{}',interface='{}',member='{}'",
        service, MPRIS2_PATH, PROPERTIES_INTERFACE, PROPERTIES_CHANGED
    )
}

/// Builds the match rule for the bus announcing that `service` changed owner.
pub(crate) fn owner_rule(service: &str) -> String {
    format!(
        "type='signal',sender='{0}',path='{1}',interface='{0}',member='{2}',arg0='{3}'",
        DBUS_SERVICE, DBUS_PATH, NAME_OWNER_CHANGED, service
    )
}

/// Returns true if a message is a `PropertiesChanged` signal sent by `owner` on the MPRIS2 path.
fn is_watched(owner: &str, sender: Option<&str>, path: Option<&str>, member: Option<&str>) -> bool {
    sender == Some(owner) && path == Some(MPRIS2_PATH) && member == Some(PROPERTIES_CHANGED)
}

fn decode(message: &Message, owner: &str) -> Option<PropertiesChanged> {
    if message.message_type() != MessageType::Signal {
        return None;
    }

    let header = message.header().ok()?;
    let sender = header.sender().ok().flatten().map(|name| name.to_string());
    let path = message.path().map(|path| path.to_string());
    let member = message.member().map(|member| member.to_string());

    if !is_watched(owner, sender.as_deref(), path.as_deref(), member.as_deref()) {
        return None;
    }

    match message.body::<PropertiesChangedBody<'_>>() {
        Ok(body) => Some(PropertiesChanged::from_body(owner.to_owned(), body)),
        Err(err) => {
            warn!("Ignoring malformed PropertiesChanged from {}: {}", owner, err);
            None
        }
    }
}

/// Returns true if `message` says that `owner` no longer holds `service`.
fn owner_lost(message: &Message, service: &str, owner: &str) -> bool {
    if message.message_type() != MessageType::Signal {
        return false;
    }
    let interface = message.interface().map(|interface| interface.to_string());
    let member = message.member().map(|member| member.to_string());
    if interface.as_deref() != Some(DBUS_SERVICE) || member.as_deref() != Some(NAME_OWNER_CHANGED)
    {
        return false;
    }

    match message.body::<(String, String, String)>() {
        Ok((name, old_owner, new_owner)) => {
            name == service && old_owner == owner && new_owner != owner
        }
        Err(_) => false,
    }
}

/// Forwards matching signals until the message stream ends.
///
/// Returns early once the player leaves the bus, and on the first send that finds the receiver
/// gone.
pub(crate) fn forward<I>(
    messages: I,
    service: &str,
    owner: &str,
    sender: &Sender<PropertiesChanged>,
) where
    I: IntoIterator<Item = zbus::Result<Arc<Message>>>,
{
    for message in messages {
        let message = match message {
            Ok(message) => message,
            Err(err) => {
                debug!("Skipping unreadable message while watching {}: {}", owner, err);
                continue;
            }
        };

        if owner_lost(&message, service, owner) {
            debug!("{} ({}) left the bus, stopping", service, owner);
            return;
        }

        if let Some(signal) = decode(&message, owner) {
            if sender.send(signal).is_err() {
                debug!("Receiver for {} was dropped, stopping", owner);
                return;
            }
        }
    }
    debug!("Message stream for {} ended", owner);
}
