mod args;
mod cmd;
mod logger;
mod util;

fn main() {
    let result = logger::init()
        .and_then(|()| cmd::run(&mut lexopt::Parser::from_env()));
    if let Err(err) = result {
        // A benchmark worker's stderr becomes one entry in its parent's list
        // of failures, so it must stay on one line.
        if std::env::var("RUST_BACKTRACE").map_or(false, |v| v == "1") {
            eprintln!("{:?}", err);
        } else {
            eprintln!("{:#}", err);
        }
        std::process::exit(1);
    }
}
