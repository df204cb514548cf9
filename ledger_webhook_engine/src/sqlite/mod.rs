//! SQLite database module for the Ledger Webhook Engine.

mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
