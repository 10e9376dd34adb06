use mpris_client::PlayerFinder;
use std::error::Error;
use std::sync::mpsc;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let finder = PlayerFinder::new()?;
    let player = finder.find_active()?;
    let (sender, receiver) = mpsc::channel();
    player.subscribe(sender)?;

    println!("Watching {}. Press Ctrl-C to stop.", player.bus_name());
    for change in receiver {
        println!("{} changed on {}:", change.interface, change.sender);
        for (property, value) in &change.changed {
            println!("\t{} = {:?}", property, value);
        }
        for property in &change.invalidated {
            println!("\t{} (invalidated)", property);
        }
    }
    Ok(())
}
