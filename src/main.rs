use log::warn;
use std::env;

#[tokio::main]
async fn main() {
    env_logger::init();

    let raw_args: Vec<String> = env::args().collect();
    if raw_args.get(1).map(|s| s.as_str()) == Some("serve") {
        let port = parse_port(raw_args.get(2).map(|s| s.as_str()));
        if let Err(e) = reinvest::api::run_http_server(port).await {
            eprintln!("Server error: {e}");
            std::process::exit(1);
        }
        return;
    }

    if let Err(e) = reinvest::api::run_cli() {
        eprintln!("Error: {e}");
        std::process::exit(2);
    }
}

fn parse_port(arg: Option<&str>) -> u16 {
    match arg.map(|s| s.parse::<u16>()) {
        None => 8080,
        Some(Ok(port)) => port,
        Some(Err(e)) => {
            warn!("ignoring invalid port {:?} ({e}); using 8080", arg.unwrap_or_default());
            8080
        }
    }
}
