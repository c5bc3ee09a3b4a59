//! Navigation shell: which screens are reachable right now.
//!
//! The shell holds a single logged-in flag. Logged out, only the Login and
//! Register screens exist; logged in, the Home stack does, with CreateSpace
//! added for admins.

use std::fmt;

use log::{debug, info, warn};
use thiserror::Error;

use crate::client::{ApiClient, LoginError};
use crate::store::StoreError;

/// A screen of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Login,
    Register,
    Home,
    Spaces,
    Reservations,
    CreateReservation,
    CreateSpace,
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Login => "Login",
            Screen::Register => "Register",
            Screen::Home => "Home",
            Screen::Spaces => "Spaces",
            Screen::Reservations => "Reservations",
            Screen::CreateReservation => "CreateReservation",
            Screen::CreateSpace => "CreateSpace",
        }
    }

    pub fn stack(&self) -> Stack {
        match self {
            Screen::Login | Screen::Register => Stack::Unauthenticated,
            _ => Stack::Authenticated,
        }
    }

    pub fn requires_admin(&self) -> bool {
        matches!(self, Screen::CreateSpace)
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The two screen stacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stack {
    Unauthenticated,
    Authenticated,
}

/// Navigation errors.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("{}", crate::messages::NOT_LOGGED_IN)]
    NotLoggedIn(Screen),

    #[error("Ya has iniciado sesión; cierra sesión para usar {0}")]
    AlreadyLoggedIn(Screen),

    #[error("{0} requiere permisos de administrador")]
    AdminOnly(Screen),
}

/// App shell driving navigation from the session state.
#[derive(Debug)]
pub struct Shell {
    client: ApiClient,
    logged_in: bool,
}

impl Shell {
    /// Check the stored token once and pick the starting stack.
    pub fn boot(client: ApiClient) -> Self {
        let session = client.session();
        let mut logged_in = session.is_token_valid();
        if !logged_in {
            logged_in = session.refresh_if_needed();
        }
        debug!("shell booted, logged_in={logged_in}");
        Self { client, logged_in }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    /// Admin gating reads the role claim; the backend still enforces it.
    pub fn is_admin(&self) -> bool {
        self.logged_in && self.client.session().is_admin()
    }

    pub fn stack(&self) -> Stack {
        if self.logged_in {
            Stack::Authenticated
        } else {
            Stack::Unauthenticated
        }
    }

    /// Screens reachable from the current stack, in menu order.
    pub fn screens(&self) -> Vec<Screen> {
        match self.stack() {
            Stack::Unauthenticated => vec![Screen::Login, Screen::Register],
            Stack::Authenticated => {
                let mut screens = vec![
                    Screen::Home,
                    Screen::Spaces,
                    Screen::CreateReservation,
                    Screen::Reservations,
                ];
                if self.is_admin() {
                    screens.push(Screen::CreateSpace);
                }
                screens
            }
        }
    }

    /// Enter `screen`, or explain why it is not reachable.
    pub fn enter(&self, screen: Screen) -> Result<Screen, ShellError> {
        match (screen.stack(), self.stack()) {
            (Stack::Authenticated, Stack::Unauthenticated) => {
                return Err(ShellError::NotLoggedIn(screen));
            }
            (Stack::Unauthenticated, Stack::Authenticated) => {
                return Err(ShellError::AlreadyLoggedIn(screen));
            }
            _ => {}
        }
        if screen.requires_admin() && !self.is_admin() {
            return Err(ShellError::AdminOnly(screen));
        }
        Ok(screen)
    }

    /// Admin-only action on a screen every user can see (e.g. editing a space).
    pub fn require_admin(&self, screen: Screen) -> Result<(), ShellError> {
        self.enter(screen)?;
        if !self.is_admin() {
            return Err(ShellError::AdminOnly(screen));
        }
        Ok(())
    }

    /// Log in and switch to the authenticated stack.
    ///
    /// The stack only switches when the issued token passes the same check
    /// `boot` applies.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), LoginError> {
        self.client.login(email, password).await?;
        self.logged_in = self.client.session().is_token_valid();
        if !self.logged_in {
            warn!("backend issued a token that fails the session check");
            return Err(LoginError::InvalidToken);
        }
        Ok(())
    }

    /// Clear the token and return to the unauthenticated stack.
    ///
    /// The stack switches even if the store fails to remove the token.
    pub fn logout(&mut self) -> Result<(), StoreError> {
        self.logged_in = false;
        let result = self.client.session().logout();
        info!("logged out");
        result
    }
}
