use thiserror::Error;

use reserva_core::client::{ApiError, LoginError, RegisterError};
use reserva_core::config::ConfigError;
use reserva_core::forms::FormError;
use reserva_core::shell::ShellError;
use reserva_core::store::StoreError;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{}", .0)]
    Custom(String),

    #[error("IO::{:?}: {}", .0, .0)]
    Io(#[from] std::io::Error),

    #[error("FlexiLogger::{:?}: {}", .0, .0)]
    FlexiLogger(#[from] flexi_logger::FlexiLoggerError),

    #[error("{}", .0)]
    Config(#[from] ConfigError),

    #[error("{}", .0)]
    Shell(#[from] ShellError),

    #[error("{}", .0)]
    Form(#[from] FormError),

    #[error("{}", .0)]
    Store(#[from] StoreError),

    /// Shown with the generic login message; the cause is logged separately.
    #[error("{}", .0.user_message())]
    Login(#[from] LoginError),

    #[error("{}", .0)]
    Register(#[from] RegisterError),

    /// A backend call failed; `.0` is the user-facing message for the action.
    #[error("{}", .0)]
    Api(&'static str, #[source] ApiError),
}
