/// Install the process-wide logger.
///
/// `--verbose` raises the default level to debug; `RUST_LOG` overrides both.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    // A second initialization (tests, embedding) keeps the first logger
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_secs()
        .try_init();
}

pub fn print_verbose(verbose: bool, msg: &str) {
    if verbose {
        println!("Verbose: {}", msg);
    }
}

pub fn log_warning(msg: &str) {
    eprintln!("Warning: {}", msg);
}
