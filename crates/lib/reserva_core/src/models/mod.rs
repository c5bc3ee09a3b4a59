//! Wire models for the booking backend.
//!
//! Rust field names are English; `#[serde(rename)]` keeps the backend's
//! Spanish JSON names on the wire.

pub mod auth;
pub mod reservation;
pub mod space;

pub use auth::{LoginRequest, LoginResponse, RegisterRequest};
pub use reservation::{NewReservation, Reservation, ReservationStatus, TimeOfDay};
pub use space::{NewSpace, Space};
