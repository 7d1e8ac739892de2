use clap::Parser as ClapParser;
use std::process;

mod demos;

use demos::Demo;

#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Demo to run; runs all of them when omitted
    #[arg(value_enum, help = "Which usage demo to run")]
    demo: Option<Demo>,

    /// List the available demos and exit
    #[arg(long, help = "Print demo names with a short description")]
    list: bool,

    /// Raise log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_filter),
    )
    .format_timestamp(None)
    .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.list {
        for demo in Demo::ALL {
            println!("{:<12} {}", demo.name(), demo.describe());
        }
        return;
    }

    let selected = match cli.demo {
        Some(demo) => vec![demo],
        None => Demo::ALL.to_vec(),
    };

    for demo in selected {
        println!("== {} ==", demo.name());
        if let Err(err) = demos::run(demo) {
            eprintln!("Error running demo '{}': {}", demo.name(), err);
            process::exit(1);
        }
    }
}
