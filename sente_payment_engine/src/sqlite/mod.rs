pub(crate) mod db;
mod sqlite_impl;

pub use sqlite_impl::{SqliteDatabase, INSUFFICIENT_FUNDS_AT_SETTLEMENT, ORCHESTRATION_TIMEOUT};
