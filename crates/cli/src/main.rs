use clap::Parser;
use packscan_cli::{Cli, run};

fn main() {
    let cli = Cli::parse();
    let _guard = packscan_core::logging::init_logging("cli", false);

    match run(&cli) {
        Ok(report) => {
            if cli.json {
                match serde_json::to_string_pretty(&report) {
                    Ok(json) => println!("{json}"),
                    Err(err) => {
                        eprintln!("error: failed to encode report: {err}");
                        std::process::exit(1);
                    }
                }
            } else {
                println!(
                    "loaded {} classes from {}",
                    report.classes.len(),
                    report.package
                );
                for class in &report.classes {
                    let marker = if class.initialized { "initialized" } else { "resolved" };
                    println!("  {} [{marker}]", class.name);
                }
            }
        }
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}
