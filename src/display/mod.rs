pub mod table;

pub use table::{TableDisplay, fit, summary};
