use mpris_client::{BusType, PlayerFinder};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let bus_type: BusType = std::env::args()
        .nth(1)
        .map(|arg| arg.parse())
        .transpose()?
        .unwrap_or_default();
    let finder = PlayerFinder::for_bus_type(&bus_type)?;

    for name in finder.list_names()? {
        let player = finder.player(name.as_str());
        match player.identity() {
            Ok(identity) => println!("{} ({})", identity, name),
            Err(error) => println!("{} (identity unavailable: {})", name, error),
        }
    }
    Ok(())
}
