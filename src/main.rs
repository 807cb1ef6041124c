use clap::Parser;
use idm_rest::cli::dispatcher::Dispatcher;
use idm_rest::cli::main_types::Cli;
use idm_rest::storage::config::Config;
use idm_rest::storage::credentials::Credentials;
use idm_rest::utils::logging;
use std::path::PathBuf;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    // Load Config
    let config_path = cli
        .config_dir
        .as_ref()
        .map(|dir| PathBuf::from(dir).join("config.toml"));

    let config = match Config::load(config_path.clone()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error loading config: {}", err);
            std::process::exit(1);
        }
    };

    // Determine the profile to use
    let profile_name = cli
        .profile
        .clone()
        .or(config.default_profile.clone())
        .unwrap_or_else(|| "default".to_string());

    logging::print_verbose(cli.verbose, &format!("Using profile: {}", profile_name));
    if let Some(config_dir) = &cli.config_dir {
        logging::print_verbose(cli.verbose, &format!("Using config directory: {}", config_dir));
    }

    // Load credentials; a keyring failure degrades to unauthenticated
    let credentials = match Credentials::load(&profile_name) {
        Ok(credentials) => credentials,
        Err(err) => {
            logging::log_warning(&format!("Could not read stored secret: {}", err));
            Credentials::new(profile_name.clone())
        }
    }
    .with_token(cli.token.clone());

    let mut dispatcher = Dispatcher::new(config, config_path, profile_name, credentials, cli.verbose);

    // Execute the command
    if let Err(e) = dispatcher.dispatch(cli.command) {
        eprintln!("{} {}", e.severity().emoji(), e.display_friendly());
        if let Some(hint) = e.troubleshooting_hint() {
            eprintln!("Hint: {}", hint);
        }
        std::process::exit(1);
    }
}
