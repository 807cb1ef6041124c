//! Storage layer for idm-rest
//!
//! Handles configuration management and credential storage.
//! Uses OS keyring for secure credential storage and TOML for configuration files.

use crate::error::StorageError;

pub mod config;
pub mod credentials;

type Result<T> = std::result::Result<T, StorageError>;
