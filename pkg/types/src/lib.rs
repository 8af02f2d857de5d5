//! Request, validation and object-construction types for the limitrange plugin.

pub mod config;
pub mod error;
pub mod limitrange;
pub mod options;
pub mod output;
pub mod quantity;
pub mod validate;
