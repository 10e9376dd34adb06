use zbus::dbus_proxy;

#[dbus_proxy(
    interface = "org.freedesktop.DBus",
    default_service = "org.freedesktop.DBus",
    default_path = "/org/freedesktop/DBus"
)]
pub(crate) trait DBus {
    fn list_names(&self) -> zbus::Result<Vec<String>>;

    fn get_name_owner(&self, name: &str) -> zbus::Result<String>;

    fn add_match(&self, rule: &str) -> zbus::Result<()>;

    fn remove_match(&self, rule: &str) -> zbus::Result<()>;
}
