use std::sync::mpsc::Sender;
use std::thread;

use log::debug;
use zbus::blocking::{Connection, MessageIterator};
use zbus::{zvariant, Message};

use crate::proxies::DBusProxyBlocking;
use crate::signal::{self, PropertiesChanged};
use crate::value::{build_body, Value};

/// A single blocking method invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    /// Bus name of the receiving player.
    pub destination: String,
    /// Object path on the receiver.
    pub path: &'static str,
    /// Interface of the method.
    pub interface: &'static str,
    /// Method name.
    pub member: &'static str,
    /// Positional arguments, in order.
    pub args: Vec<Value>,
}

/// The operations `Player` and `PlayerFinder` need from a bus connection.
///
/// Implemented for `zbus::blocking::Connection`. Implementations must be safe to call from
/// several handles sharing one connection; timeouts and cancellation are theirs to handle.
pub trait Bus {
    /// Lists every name currently registered on the bus, in the order the bus reports them.
    fn list_names(&self) -> zbus::Result<Vec<String>>;

    /// Issues one method call and blocks until the reply arrives.
    ///
    /// Returns the first value of the reply, or `None` if the reply carried no value.
    fn call(&self, call: &MethodCall) -> zbus::Result<Option<Value>>;

    /// Starts delivering `PropertiesChanged` signals emitted by `service` into `sender`.
    fn subscribe(&self, service: &str, sender: Sender<PropertiesChanged>) -> zbus::Result<()>;
}

impl<'a, B: Bus + ?Sized> Bus for &'a B {
    fn list_names(&self) -> zbus::Result<Vec<String>> {
        (**self).list_names()
    }

    fn call(&self, call: &MethodCall) -> zbus::Result<Option<Value>> {
        (**self).call(call)
    }

    fn subscribe(&self, service: &str, sender: Sender<PropertiesChanged>) -> zbus::Result<()> {
        (**self).subscribe(service, sender)
    }
}

impl Bus for Connection {
    fn list_names(&self) -> zbus::Result<Vec<String>> {
        DBusProxyBlocking::new(self)?.list_names()
    }

    fn call(&self, call: &MethodCall) -> zbus::Result<Option<Value>> {
        let reply = if call.args.is_empty() {
            self.call_method(
                Some(call.destination.as_str()),
                call.path,
                Some(call.interface),
                call.member,
                &(),
            )?
        } else {
            let body = build_body(&call.args)?;
            self.call_method(
                Some(call.destination.as_str()),
                call.path,
                Some(call.interface),
                call.member,
                &body,
            )?
        };

        decode_reply(&reply)
    }

    fn subscribe(&self, service: &str, sender: Sender<PropertiesChanged>) -> zbus::Result<()> {
        let dbus = DBusProxyBlocking::new(self)?;
        let owner = dbus.get_name_owner(service)?;

        // Must exist before the rules are added, or signals sent in between are lost.
        let messages = MessageIterator::from(self.clone());
        let rules = [signal::match_rule(service), signal::owner_rule(service)];
        for (added, rule) in rules.iter().enumerate() {
            if let Err(err) = dbus.add_match(rule) {
                remove_matches(&dbus, &rules[..added]);
                return Err(err);
            }
        }

        let connection = self.clone();
        let service = service.to_owned();
        thread::Builder::new()
            .name(format!("mpris-signals-{}", owner))
            .spawn(move || {
                signal::forward(messages, &service, &owner, &sender);
                match DBusProxyBlocking::new(&connection) {
                    Ok(dbus) => remove_matches(&dbus, &rules),
                    Err(err) => debug!("Could not remove match rules for {}: {}", service, err),
                }
            })
            .map_err(zbus::Error::from)?;

        Ok(())
    }
}

fn remove_matches(dbus: &DBusProxyBlocking<'_>, rules: &[String]) {
    for rule in rules {
        if let Err(err) = dbus.remove_match(rule) {
            debug!("Could not remove match rule {}: {}", rule, err);
        }
    }
}

/// Reads the first value of a method reply.
///
/// An empty reply is `None`. Replies that are not a single variant are not read and come back as
/// `Value::Unsupported`.
pub(crate) fn decode_reply(reply: &Message) -> zbus::Result<Option<Value>> {
    let header = reply.header()?;
    match header.signature()? {
        None => return Ok(None),
        Some(signature) if signature.as_str().is_empty() => return Ok(None),
        Some(signature) if signature.as_str() != "v" => {
            debug!("Reply has signature ({}), which is not read", signature.as_str());
            return Ok(Some(Value::Unsupported));
        }
        Some(_) => {}
    }

    let value: zvariant::Value<'_> = reply.body()?;
    Ok(Some(Value::from(value)))
}
