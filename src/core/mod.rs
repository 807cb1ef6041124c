//! Protocol core: request model, streaming search, error translation and the
//! services built on top of them.

pub mod auth;
pub mod envelope;
pub mod error_parser;
pub mod handler;
pub mod operation;
pub mod provider;
pub mod request;
pub mod search;
pub mod services;
