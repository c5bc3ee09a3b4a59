//! Form validation and list shaping for the individual screens.
//!
//! Validation runs before any request is built: a form that fails here never
//! reaches the network.

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

use crate::messages;
use crate::models::auth::DEFAULT_ROLE;
use crate::models::{NewReservation, NewSpace, RegisterRequest, Reservation, Space};

/// Client-side validation failures. `Display` is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{}", messages::SPACE_FIELDS_REQUIRED)]
    MissingSpaceFields,

    #[error("La capacidad '{0}' no es un número válido")]
    InvalidCapacity(String),

    #[error("{}", messages::PASSWORD_MISMATCH)]
    PasswordMismatch,

    #[error("{}", messages::RESERVATION_FIELDS_REQUIRED)]
    MissingReservationFields,

    #[error("La hora de fin debe ser posterior a la hora de inicio")]
    InvalidTimeRange,

    #[error("No existe la reserva {0}")]
    UnknownReservation(i64),

    #[error("La reserva {0} no está activa")]
    ReservationNotActive(i64),
}

// =============================================================================
// Spaces
// =============================================================================

/// Create/update facility form. Fields hold raw user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpaceForm {
    pub name: String,
    pub description: String,
    capacity: String,
    pub location: String,
    pub sport: String,
    pub active: bool,
}

impl Default for SpaceForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            capacity: String::new(),
            location: String::new(),
            sport: String::new(),
            active: true,
        }
    }
}

impl SpaceForm {
    /// Active-by-default form from raw inputs.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        capacity: &str,
        location: impl Into<String>,
        sport: impl Into<String>,
    ) -> Self {
        let mut form = Self {
            name: name.into(),
            description: description.into(),
            location: location.into(),
            sport: sport.into(),
            ..Self::default()
        };
        form.set_capacity(capacity);
        form
    }

    /// Prefilled form for editing an existing facility.
    pub fn from_space(space: &Space) -> Self {
        Self {
            name: space.name.clone(),
            description: space.description.clone(),
            capacity: space.capacity.to_string(),
            location: space.location.clone(),
            sport: space.sport.clone(),
            active: space.active,
        }
    }

    /// Capacity input keeps digits only.
    pub fn set_capacity(&mut self, input: &str) {
        self.capacity = digits_only(input);
    }

    pub fn capacity(&self) -> &str {
        &self.capacity
    }

    /// Check that every field is filled and produce the request body.
    pub fn validate(&self) -> Result<NewSpace, FormError> {
        let required = [
            &self.name,
            &self.description,
            &self.capacity,
            &self.location,
            &self.sport,
        ];
        if required.iter().any(|f| f.trim().is_empty()) {
            return Err(FormError::MissingSpaceFields);
        }
        let capacity = self
            .capacity
            .parse::<u32>()
            .map_err(|_| FormError::InvalidCapacity(self.capacity.clone()))?;

        Ok(NewSpace {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            capacity,
            location: self.location.trim().to_string(),
            sport: self.sport.trim().to_string(),
            active: self.active,
        })
    }

    /// Validate and apply the form onto an existing facility, keeping its id.
    pub fn apply_to(&self, space: &Space) -> Result<Space, FormError> {
        let new = self.validate()?;
        Ok(Space {
            id: space.id,
            name: new.name,
            description: new.description,
            capacity: new.capacity,
            location: new.location,
            sport: new.sport,
            active: new.active,
        })
    }
}

fn digits_only(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Facilities a user may see: everything for admins, active ones otherwise.
pub fn visible_spaces(spaces: Vec<Space>, is_admin: bool) -> Vec<Space> {
    if is_admin {
        spaces
    } else {
        spaces.into_iter().filter(|s| s.active).collect()
    }
}

// =============================================================================
// Registration
// =============================================================================

/// Sign-up form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub username: String,
    pub document: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn validate(&self, email_domain: &str) -> Result<RegisterRequest, FormError> {
        if self.password != self.confirm_password {
            return Err(FormError::PasswordMismatch);
        }
        Ok(RegisterRequest {
            name: self.username.trim().to_string(),
            document: self.document.trim().to_string(),
            email: email_for(&self.username, email_domain),
            password: self.password.clone(),
            role: DEFAULT_ROLE.to_string(),
        })
    }
}

/// Login identifier: bare usernames get the institutional domain appended.
pub fn email_for(username: &str, domain: &str) -> String {
    let username = username.trim();
    if username.contains('@') {
        username.to_string()
    } else {
        format!("{username}@{}", domain.trim_start_matches('@'))
    }
}

// =============================================================================
// Reservations
// =============================================================================

/// Create-reservation form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationForm {
    pub space_id: Option<i64>,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl ReservationForm {
    /// `user_id` comes from the session; without it the form is incomplete.
    pub fn validate(&self, user_id: Option<i64>) -> Result<NewReservation, FormError> {
        let (Some(user_id), Some(space_id)) = (user_id, self.space_id.filter(|id| *id > 0))
        else {
            return Err(FormError::MissingReservationFields);
        };
        let start = crate::models::TimeOfDay::from(self.start);
        let end = crate::models::TimeOfDay::from(self.end);
        if (end.hour, end.minute) <= (start.hour, start.minute) {
            return Err(FormError::InvalidTimeRange);
        }
        Ok(NewReservation {
            user_id,
            space_id,
            date: self.date,
            start,
            end,
        })
    }
}

/// The reservation `id` among `reservations`, if it can still be cancelled.
pub fn cancellable(reservations: &[Reservation], id: i64) -> Result<&Reservation, FormError> {
    let reservation = reservations
        .iter()
        .find(|r| r.id == id)
        .ok_or(FormError::UnknownReservation(id))?;
    if !reservation.status.is_active() {
        return Err(FormError::ReservationNotActive(id));
    }
    Ok(reservation)
}

/// Active reservations first; order within each group is preserved.
pub fn sort_reservations(reservations: &mut [Reservation]) {
    reservations.sort_by_key(|r| !r.status.is_active());
}
