#![forbid(unsafe_code)]

//! reaqt BMI demo binary entry point.

use reaqt_demo::cli;
use tracing_subscriber::EnvFilter;

fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let opts = cli::Opts::parse();
    init_logging(&opts.log);

    match reaqt_demo::run(&opts) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("Demo failed: {e}");
            std::process::exit(1);
        }
    }
}
