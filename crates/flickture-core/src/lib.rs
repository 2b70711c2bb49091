pub mod config;
pub mod credentials;
pub mod error;
pub mod navigation;
pub mod notify;
pub mod time_ago;
