mod serve;

use anyhow::Result;
use console::style;

use crate::core::terminal;

fn print_help() {
    terminal::print_banner();

    println!(" {}", style("Commands").bold());
    println!(
        "   {}   Start the content pipeline daemon",
        style("serve").green()
    );
    println!("   {}    Show this help", style("help").green());
    println!();
    println!(
        " {} {} serve [--api-host <host>] [--api-port <port>]",
        style("Usage:").bold(),
        style("plume").green()
    );
    println!();
}

pub async fn run_main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        None | Some("serve") => serve::run(&args).await,
        Some("help") | Some("--help") | Some("-h") => {
            print_help();
            Ok(())
        }
        Some(other) => {
            terminal::print_error(&format!("Unknown command: {}", other));
            print_help();
            Ok(())
        }
    }
}
