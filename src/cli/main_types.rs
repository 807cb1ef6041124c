use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "idm-rest")]
#[command(about = "Command line interface for managing accounts and groups over provider REST APIs")]
#[command(version)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    #[arg(long, global = true)]
    pub config_dir: Option<String>,

    /// Bearer token, overrides the stored secret
    #[arg(long, global = true, env = "IDM_REST_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Authentication commands
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Account management
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Group management
    Group {
        #[command(subcommand)]
        command: GroupCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Store the secret of the profile in the OS keyring
    Login {
        /// Account name sent with the secret (HTTP basic)
        #[arg(long)]
        username: Option<String>,
    },
    /// Remove the stored secret
    Logout,
    /// Show authentication status
    Status,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the current configuration
    Show,
    /// Set configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },
}

/// Options shared by the search subcommands
#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Search term
    #[arg(long)]
    pub filter: Option<String>,
    /// Offset of the first result (requires --count)
    #[arg(long)]
    pub start: Option<u32>,
    /// Page size (requires --start)
    #[arg(long)]
    pub count: Option<u32>,
    /// Stop reading after this many results
    #[arg(long)]
    pub limit: Option<usize>,
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Search accounts
    Search(SearchArgs),
    /// Show one account
    Get {
        /// Account id (Keycloak) or user name (Jira)
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Count accounts
    Count {
        #[arg(long)]
        filter: Option<String>,
    },
    /// Delete an account
    Delete { id: String },
    /// Reset the password of an account (prompted)
    Password {
        id: String,
        /// Require a change at next login
        #[arg(long)]
        temporary: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum GroupCommands {
    /// Search groups
    Search(SearchArgs),
    /// Add an account to a group
    Assign { group: String, user: String },
    /// Remove an account from a group
    Revoke { group: String, user: String },
}
