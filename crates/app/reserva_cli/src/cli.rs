use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand};

/// Sports-facility booking client.
#[derive(Parser, Debug)]
#[command(name = "reserva", version, about = "Sports-facility booking client")]
pub struct Cli {
    /// Backend base URL.
    #[arg(long, env = "BACKEND_URL", global = true)]
    pub backend_url: Option<String>,

    /// Storage file holding the session token.
    #[arg(long, env = "RESERVA_STORE_PATH", global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and store the session token.
    Login {
        /// Username, or a full email address.
        username: String,

        /// Password; read from stdin when omitted.
        #[arg(long)]
        password: Option<String>,
    },

    /// Create a regular user account.
    Register {
        /// Username; the institutional email is derived from it.
        username: String,

        /// National id document number.
        document: String,

        #[arg(long)]
        password: String,

        #[arg(long)]
        confirm_password: String,
    },

    /// Clear the stored session.
    Logout,

    /// Show the current session and reachable screens.
    Status,

    /// Facilities.
    #[command(subcommand)]
    Spaces(SpacesCommand),

    /// Your reservations.
    #[command(subcommand)]
    Reservations(ReservationsCommand),

    /// Print version
    Version,
}

#[derive(Subcommand, Debug)]
pub enum SpacesCommand {
    /// List facilities (inactive ones are shown to admins only).
    List,

    /// Create a facility (admin).
    Create(SpaceArgs),

    /// Update a facility (admin). Omitted fields keep their current value.
    Update {
        id: i64,

        #[command(flatten)]
        fields: SpaceUpdateArgs,
    },

    /// Delete a facility (admin).
    Delete {
        id: i64,

        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
pub struct SpaceArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub description: String,

    /// Non-digit characters are dropped.
    #[arg(long)]
    pub capacity: String,

    #[arg(long)]
    pub location: String,

    #[arg(long)]
    pub sport: String,

    /// Create the facility as inactive.
    #[arg(long)]
    pub inactive: bool,
}

#[derive(Args, Debug)]
pub struct SpaceUpdateArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub capacity: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    #[arg(long)]
    pub sport: Option<String>,

    /// Set the active flag.
    #[arg(long)]
    pub active: Option<bool>,
}

#[derive(Subcommand, Debug)]
pub enum ReservationsCommand {
    /// List your reservations, active ones first.
    List,

    /// Book a facility.
    Create {
        /// Facility id.
        #[arg(long)]
        space: i64,

        /// Date as YYYY-MM-DD.
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,

        /// Start time as HH:MM.
        #[arg(long, value_parser = parse_time)]
        start: NaiveTime,

        /// End time as HH:MM.
        #[arg(long, value_parser = parse_time)]
        end: NaiveTime,
    },

    /// Cancel one of your reservations.
    Cancel {
        id: i64,

        /// Confirm the cancellation.
        #[arg(long)]
        yes: bool,
    },
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|e| format!("expected HH:MM: {e}"))
}
