//! CLI command handlers.
//!
//! Commands:
//! - `obsmon status --date <D> [--masterframe] [selection]` - Per-night status table
//! - `obsmon paths --date <D> <selection>` - Resolved artifact paths
//! - `obsmon show --kind <KIND> --date <D> <selection>` - Print one artifact
//! - `obsmon images --date <D> <selection>` - List image files
//! - `obsmon comment add|list --date <D> <selection>` - Comment log

pub mod comment;
pub mod common;
pub mod inspect;
pub mod status;

pub use common::UnitSelector;
