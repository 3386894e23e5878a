//! rockfish-ctl — command-line client for the Rockfish service.

use anyhow::Result;

mod cmd;

fn print_usage() {
    println!("Usage: rockfish-ctl <command>");
    println!();
    println!("Commands:");
    println!("  echo <text>               Round-trip a string through the service");
    println!("  intersect [tolerance]     Intersect two sample solids");
    println!("  polyline <x,y,z>... [--min-distance <d>]");
    println!("                            Build a polyline from points");
    println!("  mesh [--smooth]           Mesh a sample solid");
    println!("  set-server <host>         Probe a host and persist it as the server");
    println!("  config log <policy>       Persist the log policy (disabled|daily|weekly|monthly)");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        ["echo", rest @ ..] if !rest.is_empty() => cmd::echo::run(&rest.join(" ")).await,
        ["intersect", rest @ ..] => cmd::geometry::intersect(rest).await,
        ["polyline", rest @ ..] if !rest.is_empty() => cmd::geometry::polyline(rest).await,
        ["mesh", rest @ ..] => cmd::geometry::mesh(rest).await,
        ["set-server", host] => cmd::server::set_server(host).await,
        ["config", "log", policy] => cmd::server::set_log_policy(policy),
        ["help"] | ["--help"] | ["-h"] | [] => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {}", other.join(" "));
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}
