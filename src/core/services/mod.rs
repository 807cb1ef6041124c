pub mod auth_service;
pub mod config_service;
pub mod directory_service;
pub mod types;
