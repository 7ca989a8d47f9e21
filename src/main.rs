//! Workspace entry point: launches the NoteDeck desktop client.

fn main() {
    if let Err(err) = notedeck_gui::run() {
        eprintln!("notedeck error: {}", err);
        std::process::exit(1);
    }
}
