//! In-memory `Bus` used by unit tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::sync::mpsc::Sender;

use crate::bus::{Bus, MethodCall};
use crate::signal::PropertiesChanged;
use crate::value::Value;
use crate::PROPERTIES_INTERFACE;

/// How a call to the fake bus should fail.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Failure {
    /// The connection went away.
    Transport,
    /// The player answered with `org.freedesktop.DBus.Error.AccessDenied`.
    Rejected,
}

impl Failure {
    fn to_error(self) -> zbus::Error {
        match self {
            Failure::Transport => zbus::Error::Failure(String::from("connection closed")),
            Failure::Rejected => zbus::Error::FDO(Box::new(zbus::fdo::Error::AccessDenied(
                String::from("not allowed"),
            ))),
        }
    }
}

/// Serves property values from a map and records every call it receives.
///
/// A property that was never set answers with `UnknownProperty`; a property set to `None`
/// answers successfully without a value.
#[derive(Debug, Default)]
pub(crate) struct FakeBus {
    names: RefCell<Vec<String>>,
    list_names_fails: Cell<bool>,
    properties: RefCell<HashMap<(String, String), Option<Value>>>,
    failures: RefCell<HashMap<String, Failure>>,
    calls: RefCell<Vec<MethodCall>>,
    subscribers: RefCell<Vec<(String, Sender<PropertiesChanged>)>>,
}

impl FakeBus {
    pub(crate) fn new() -> Self {
        FakeBus::default()
    }

    pub(crate) fn set_names(&self, names: &[&str]) {
        *self.names.borrow_mut() = names.iter().map(|name| name.to_string()).collect();
    }

    pub(crate) fn fail_list_names(&self) {
        self.list_names_fails.set(true);
    }

    pub(crate) fn set_property<V: Into<Value>>(&self, interface: &str, property: &str, value: V) {
        self.properties.borrow_mut().insert(
            (interface.to_owned(), property.to_owned()),
            Some(value.into()),
        );
    }

    /// Makes reads of the property succeed without returning a value.
    pub(crate) fn set_absent(&self, interface: &str, property: &str) {
        self.properties
            .borrow_mut()
            .insert((interface.to_owned(), property.to_owned()), None);
    }

    pub(crate) fn property(&self, interface: &str, property: &str) -> Option<Value> {
        self.properties
            .borrow()
            .get(&(interface.to_owned(), property.to_owned()))
            .cloned()
            .flatten()
    }

    /// Makes every call of the given method, or every read and write of the given property,
    /// fail.
    pub(crate) fn fail(&self, member_or_property: &str, failure: Failure) {
        self.failures
            .borrow_mut()
            .insert(member_or_property.to_owned(), failure);
    }

    pub(crate) fn calls(&self) -> Vec<MethodCall> {
        self.calls.borrow().clone()
    }

    pub(crate) fn last_call(&self) -> Option<MethodCall> {
        self.calls.borrow().last().cloned()
    }

    pub(crate) fn emit(&self, signal: PropertiesChanged) {
        for (_, sender) in self.subscribers.borrow().iter() {
            let _ = sender.send(signal.clone());
        }
    }

    pub(crate) fn subscribed_services(&self) -> Vec<String> {
        self.subscribers
            .borrow()
            .iter()
            .map(|(service, _)| service.clone())
            .collect()
    }

    fn failure_for(&self, key: &str) -> Option<zbus::Error> {
        self.failures.borrow().get(key).map(|failure| failure.to_error())
    }

    fn property_call(&self, call: &MethodCall) -> zbus::Result<Option<Value>> {
        let interface = call.args.get(0).and_then(Value::as_str).unwrap_or_default();
        let property = call.args.get(1).and_then(Value::as_str).unwrap_or_default();
        if let Some(error) = self.failure_for(property) {
            return Err(error);
        }

        let key = (interface.to_owned(), property.to_owned());
        match call.member {
            "Get" => match self.properties.borrow().get(&key) {
                Some(value) => Ok(value.clone()),
                None => Err(zbus::Error::FDO(Box::new(
                    zbus::fdo::Error::UnknownProperty(format!("{}.{}", interface, property)),
                ))),
            },
            "Set" => {
                let value = match call.args.get(2) {
                    Some(Value::Variant(inner)) => (**inner).clone(),
                    Some(other) => other.clone(),
                    None => Value::Unsupported,
                };
                self.properties.borrow_mut().insert(key, Some(value));
                Ok(None)
            }
            other => Err(zbus::Error::FDO(Box::new(zbus::fdo::Error::UnknownMethod(
                other.to_owned(),
            )))),
        }
    }
}

impl Bus for FakeBus {
    fn list_names(&self) -> zbus::Result<Vec<String>> {
        if self.list_names_fails.get() {
            return Err(Failure::Transport.to_error());
        }
        Ok(self.names.borrow().clone())
    }

    fn call(&self, call: &MethodCall) -> zbus::Result<Option<Value>> {
        self.calls.borrow_mut().push(call.clone());

        if call.interface == PROPERTIES_INTERFACE {
            return self.property_call(call);
        }
        match self.failure_for(call.member) {
            Some(error) => Err(error),
            None => Ok(None),
        }
    }

    fn subscribe(&self, service: &str, sender: Sender<PropertiesChanged>) -> zbus::Result<()> {
        if let Some(error) = self.failure_for("subscribe") {
            return Err(error);
        }
        self.subscribers
            .borrow_mut()
            .push((service.to_owned(), sender));
        Ok(())
    }
}
