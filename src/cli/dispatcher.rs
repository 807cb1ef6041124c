use crate::cli::main_types::{
    AuthCommands, Commands, ConfigCommands, GroupCommands, SearchArgs, UserCommands,
};
use crate::core::auth::SecretInput;
use crate::core::handler::ResultPage;
use crate::core::request::PageWindow;
use crate::core::services::auth_service::AuthService;
use crate::core::services::config_service::ConfigService;
use crate::core::services::directory_service::DirectoryService;
use crate::core::services::types::ListParams;
use crate::display::TableDisplay;
use crate::error::{AppError, CliError};
use crate::storage::config::Config;
use crate::storage::credentials::{AuthMode, Credentials};
use crate::utils::logging::print_verbose;
use serde::Serialize;
use std::path::PathBuf;

pub struct Dispatcher {
    config: ConfigService,
    config_path: Option<PathBuf>,
    profile_name: String,
    credentials: Credentials,
    verbose: bool,
}

impl Dispatcher {
    // Instance method for verbose logging
    fn log_verbose(&self, msg: &str) {
        print_verbose(self.verbose, msg);
    }

    pub fn new(
        config: Config,
        config_path: Option<PathBuf>,
        profile_name: String,
        credentials: Credentials,
        verbose: bool,
    ) -> Self {
        Self {
            config: ConfigService::new(config),
            config_path,
            profile_name,
            credentials,
            verbose,
        }
    }

    pub fn dispatch(&mut self, command: Commands) -> Result<(), AppError> {
        match command {
            Commands::Auth { command } => self.handle_auth_command(command),
            Commands::Config { command } => self.handle_config_command(command),
            Commands::User { command } => self.handle_user_command(command),
            Commands::Group { command } => self.handle_group_command(command),
        }
    }

    fn auth_service(&self) -> AuthService {
        let username = self
            .config
            .get_profile(&self.profile_name)
            .and_then(|profile| profile.username.clone());
        AuthService::new(self.credentials.clone(), username)
    }

    fn directory(&self) -> Result<DirectoryService, AppError> {
        let profile = self.config.require_profile(&self.profile_name)?;
        let authorization = self
            .auth_service()
            .require_authorization(self.config.config().profile_names())?;
        self.log_verbose(&format!(
            "Using {} at {}",
            profile.provider,
            profile.api_url()
        ));
        DirectoryService::connect(profile, Some(authorization))
    }

    fn handle_auth_command(&mut self, commands: AuthCommands) -> Result<(), AppError> {
        match commands {
            AuthCommands::Login { username } => {
                self.log_verbose("Attempting auth login command");
                self.config.require_profile(&self.profile_name)?;

                if let Some(username) = username {
                    self.config
                        .set_profile_field(&self.profile_name, "username", &username)?;
                    self.config.save_config(self.config_path.clone())?;
                }

                let input = SecretInput::collect("Secret: ")?;
                input.validate()?;
                self.auth_service().login(&input.secret)?;
                println!(
                    "✅ Secret stored for profile: {}",
                    self.profile_name
                );
                Ok(())
            }
            AuthCommands::Logout => {
                self.log_verbose("Attempting auth logout command");
                self.auth_service().logout()?;
                println!(
                    "✅ Successfully logged out from profile: {}",
                    self.profile_name
                );
                Ok(())
            }
            AuthCommands::Status => {
                self.log_verbose("Attempting auth status command");
                let status = self.auth_service().get_auth_status();

                println!("Authentication Status:");
                println!("=====================");
                println!("Profile: {}", status.profile_name);
                match status.auth_mode {
                    AuthMode::Token => println!("Authentication Mode: Bearer token"),
                    AuthMode::Stored => println!("Authentication Mode: Stored secret"),
                    AuthMode::None => {
                        println!("Authentication Mode: (none)");
                        println!("Run 'idm-rest auth login' to store a secret");
                    }
                }
                if let Some(username) = &status.username {
                    println!("Username: {}", username);
                }
                Ok(())
            }
        }
    }

    fn handle_config_command(&mut self, commands: ConfigCommands) -> Result<(), AppError> {
        match commands {
            ConfigCommands::Show => {
                self.log_verbose("Attempting config show command");

                println!("Current Configuration:");
                println!("=====================");

                match self.config.get_default_profile() {
                    Some(default_profile) => println!("Default Profile: {}", default_profile),
                    None => println!("Default Profile: (not set)"),
                }

                println!("\nProfiles:");
                let profiles = self.config.list_profiles();
                if profiles.is_empty() {
                    println!("  No profiles configured");
                }
                for (name, profile) in profiles {
                    let pagination = profile.pagination();
                    println!("  [{}]", name);
                    println!("    URL: {}", profile.url);
                    println!("    Provider: {}", profile.provider);
                    if let Some(realm) = &profile.realm {
                        println!("    Realm: {}", realm);
                    }
                    if let Some(username) = &profile.username {
                        println!("    Username: {}", username);
                    }
                    if let Some(timeout) = profile.timeout_seconds {
                        println!("    Timeout: {} seconds", timeout);
                    }
                    println!(
                        "    Parameters: start={} count={} filter={}",
                        pagination.start, pagination.count, pagination.filter
                    );
                }

                Ok(())
            }
            ConfigCommands::Set { key, value } => {
                self.log_verbose(&format!(
                    "Attempting config set - key: {}, value: {}",
                    key, value
                ));
                if key == "default-profile" {
                    self.config.set_default_profile(&value)?;
                } else {
                    self.config
                        .set_profile_field(&self.profile_name, &key, &value)?;
                }
                self.config.save_config(self.config_path.clone())?;
                println!("✅ {} = {} (profile: {})", key, value, self.profile_name);
                Ok(())
            }
        }
    }

    fn handle_user_command(&self, commands: UserCommands) -> Result<(), AppError> {
        match commands {
            UserCommands::Search(args) => {
                self.log_verbose(&format!("Attempting user search - {:?}", args));
                let params = list_params(&args)?;
                let page = self.directory()?.search_accounts(&params)?;
                if args.json {
                    println!("{}", page_json(&page)?);
                } else {
                    println!("{}", TableDisplay::new().render_accounts(&page));
                }
                Ok(())
            }
            UserCommands::Get { id, json } => {
                self.log_verbose(&format!("Attempting user get - {}", id));
                let account = self.directory()?.lookup_account(&id)?.ok_or_else(|| {
                    CliError::InvalidArguments(format!("Account '{}' does not exist", id))
                })?;
                if json {
                    println!("{}", to_json(&account)?);
                } else {
                    println!("{}", TableDisplay::new().render_account(&account));
                }
                Ok(())
            }
            UserCommands::Count { filter } => {
                self.log_verbose(&format!("Attempting user count - {:?}", filter));
                let count = self.directory()?.count_accounts(filter.as_deref())?;
                println!("{}", count);
                Ok(())
            }
            UserCommands::Delete { id } => {
                self.log_verbose(&format!("Attempting user delete - {}", id));
                self.directory()?.delete_account(&id)?;
                println!("✅ Deleted account {}", id);
                Ok(())
            }
            UserCommands::Password { id, temporary } => {
                self.log_verbose(&format!("Attempting user password - {}", id));
                let directory = self.directory()?;
                let input = SecretInput::collect_confirmed("New password: ")?;
                input.validate()?;
                directory.reset_password(&id, &input.secret, temporary)?;
                println!("✅ Password updated for {}", id);
                Ok(())
            }
        }
    }

    fn handle_group_command(&self, commands: GroupCommands) -> Result<(), AppError> {
        match commands {
            GroupCommands::Search(args) => {
                self.log_verbose(&format!("Attempting group search - {:?}", args));
                let params = list_params(&args)?;
                let page = self.directory()?.search_groups(&params)?;
                if args.json {
                    println!("{}", page_json(&page)?);
                } else {
                    println!("{}", TableDisplay::new().render_groups(&page));
                }
                Ok(())
            }
            GroupCommands::Assign { group, user } => {
                self.log_verbose(&format!("Attempting group assign - {} {}", group, user));
                self.directory()?.assign_group(&group, &user)?;
                println!("✅ Added {} to {}", user, group);
                Ok(())
            }
            GroupCommands::Revoke { group, user } => {
                self.log_verbose(&format!("Attempting group revoke - {} {}", group, user));
                self.directory()?.revoke_group(&group, &user)?;
                println!("✅ Removed {} from {}", user, group);
                Ok(())
            }
        }
    }
}

/// Validates the window before anything touches the network
fn list_params(args: &SearchArgs) -> Result<ListParams, AppError> {
    let page = PageWindow::from_parts(args.start, args.count)?;
    Ok(ListParams::new()
        .with_filter(args.filter.clone())
        .with_page(page)
        .with_limit(args.limit))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value).map_err(|e| {
        CliError::InvalidArguments(format!("Failed to render JSON: {}", e)).into()
    })
}

fn page_json<T: Serialize>(page: &ResultPage<T>) -> Result<String, AppError> {
    #[derive(Serialize)]
    struct PageView<'a, T> {
        total: i64,
        start: i64,
        items: i64,
        resources: &'a [T],
    }

    to_json(&PageView {
        total: page.total(),
        start: page.start(),
        items: page.items(),
        resources: page.resources(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::Account;
    use crate::core::provider::Provider;
    use crate::error::ConfigError;
    use crate::storage::config::Profile;
    use tempfile::tempdir;

    fn create_test_dispatcher(config_path: Option<PathBuf>) -> Dispatcher {
        let mut config = Config::default();
        config.default_profile = Some("test".to_string());
        let mut profile = Profile::new("http://127.0.0.1:9", Provider::Keycloak);
        profile.realm = Some("corp".to_string());
        config.set_profile("test".to_string(), profile);
        let creds = Credentials::new("test".to_string());
        Dispatcher::new(config, config_path, "test".to_string(), creds, true)
    }

    fn search_args(start: Option<u32>, count: Option<u32>) -> SearchArgs {
        SearchArgs {
            filter: None,
            start,
            count,
            limit: None,
            json: false,
        }
    }

    #[test]
    fn test_config_show() {
        let mut d = create_test_dispatcher(None);
        assert!(d.handle_config_command(ConfigCommands::Show).is_ok());
    }

    #[test]
    fn test_config_set_persists() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let path = temp_dir.path().join("config.toml");
        let mut d = create_test_dispatcher(Some(path.clone()));

        d.handle_config_command(ConfigCommands::Set {
            key: "username".to_string(),
            value: "admin".to_string(),
        })
        .expect("set succeeds");

        let saved = Config::load(Some(path)).expect("load");
        assert_eq!(
            saved.get_profile("test").and_then(|p| p.username.clone()),
            Some("admin".to_string())
        );
    }

    #[test]
    fn test_config_set_rejects_unknown_key() {
        let mut d = create_test_dispatcher(None);
        let result = d.handle_config_command(ConfigCommands::Set {
            key: "colour".to_string(),
            value: "blue".to_string(),
        });
        assert!(matches!(result, Err(AppError::Cli(CliError::InvalidArguments(_)))));
    }

    #[test]
    fn test_auth_status_and_logout() {
        let mut d = create_test_dispatcher(None);
        assert!(d.handle_auth_command(AuthCommands::Status).is_ok());
        assert!(d.handle_auth_command(AuthCommands::Logout).is_ok());
    }

    #[test]
    fn test_partial_window_rejected_before_request() {
        let d = create_test_dispatcher(None);
        let result = d.handle_user_command(UserCommands::Search(search_args(Some(0), None)));
        assert!(matches!(
            result,
            Err(AppError::Config(ConfigError::InvalidPagination {
                start: Some(0),
                count: None
            }))
        ));
    }

    #[test]
    fn test_search_requires_credentials() {
        let d = create_test_dispatcher(None);
        let result = d.handle_group_command(GroupCommands::Search(search_args(None, None)));
        assert!(matches!(result, Err(AppError::Cli(CliError::AuthRequired { .. }))));
    }

    #[test]
    fn test_unknown_profile() {
        let config = Config::default();
        let d = Dispatcher::new(
            config,
            None,
            "missing".to_string(),
            Credentials::new("missing".to_string()),
            false,
        );
        let result = d.handle_user_command(UserCommands::Delete {
            id: "x".to_string(),
        });
        assert!(matches!(
            result,
            Err(AppError::Config(ConfigError::ProfileNotFound { .. }))
        ));
    }

    #[test]
    fn test_page_json_shape() {
        let mut collector = crate::core::handler::ResultCollector::new();
        crate::core::handler::ResultHandler::total(&mut collector, 1);
        crate::core::handler::ResultHandler::resource(&mut collector, Account {
            username: "fred".to_string(),
            ..Account::default()
        });
        let json = page_json(&collector.finish()).expect("serializable");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["total"], 1);
        assert_eq!(value["start"], -1);
        assert_eq!(value["resources"][0]["username"], "fred");
    }
}
