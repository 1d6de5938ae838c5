pub mod bootstrap;
pub mod config;
pub mod error;
pub mod init;
pub mod installer;
pub mod manifest;

pub use bootstrap::{run_setup, run_with_config};
pub use config::SetupConfig;
pub use error::SetupError;

pub(crate) fn logv(tag: &str, message: &str) {
    eprintln!("[{}] {}", tag, message);
    tracing::trace!(tag, "{message}");
}

pub(crate) fn logi(message: impl AsRef<str>) {
    logv("INFO", message.as_ref());
}

pub(crate) fn logok(message: impl AsRef<str>) {
    logv("OK", message.as_ref());
}

pub(crate) fn logw(message: impl AsRef<str>) {
    logv("WARN", message.as_ref());
}
