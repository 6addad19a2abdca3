use std::process::exit;

fn main() {
    if let Err(e) = gamedex::app::run_cli() {
        gamedex::console::error(&e);
        exit(1);
    }
}
