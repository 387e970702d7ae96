pub mod cli;
pub mod client;
pub mod config;
pub mod formatter;
pub mod provider;

pub use client::NotifoxClient;
pub use config::NotifoxConfig;
pub use formatter::AlertFormatter;
pub use provider::AlertDispatcher;
