mod config;

pub use self::config::{LedgerSettings, Settings};
