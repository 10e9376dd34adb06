use mpris_client::PlayerFinder;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let finder = PlayerFinder::new()?;
    let player = match std::env::args().nth(1) {
        Some(name) => finder.player(name),
        None => finder.find_active()?,
    };

    if player.can_raise()? {
        player.raise()?;
        println!("Raised {}", player.bus_name());
    } else {
        println!("{} cannot be raised", player.bus_name());
    }
    Ok(())
}
