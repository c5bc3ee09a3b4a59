//! Reservations (`reserva`).

use std::fmt;

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Reservation lifecycle state. Cancelling is a status change, not a delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReservationStatus {
    Active,
    Cancelled,
    /// Any state this client does not know about, kept verbatim.
    Other(String),
}

impl ReservationStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "ACTIVA",
            Self::Cancelled => "CANCELADA",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for ReservationStatus {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("ACTIVA") || trimmed.eq_ignore_ascii_case("ACTIVE") {
            Self::Active
        } else if trimmed.eq_ignore_ascii_case("CANCELADA")
            || trimmed.eq_ignore_ascii_case("CANCELLED")
            || trimmed.eq_ignore_ascii_case("CANCELED")
        {
            Self::Cancelled
        } else {
            Self::Other(value)
        }
    }
}

impl From<ReservationStatus> for String {
    fn from(value: ReservationStatus) -> Self {
        match value {
            ReservationStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reservation as returned by `GET /reserva/usuario/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    #[serde(rename = "usuarioId")]
    pub user_id: i64,
    #[serde(rename = "espacioId")]
    pub space_id: i64,
    #[serde(rename = "espacioNombre", default)]
    pub space_name: String,
    /// Accepts `yyyy-MM-dd`, a date-time string, or a `[y, m, d]` array.
    #[serde(rename = "fechaReserva", deserialize_with = "lenient_date")]
    pub date: NaiveDate,
    /// `HH:MM[:SS]` as sent by the backend.
    #[serde(rename = "horaInicio")]
    pub start_time: String,
    #[serde(rename = "horaFin")]
    pub end_time: String,
    #[serde(rename = "estado")]
    pub status: ReservationStatus,
}

impl Reservation {
    /// `"HH:MM - HH:MM"`.
    pub fn time_range(&self) -> String {
        format!("{} - {}", hh_mm(&self.start_time), hh_mm(&self.end_time))
    }
}

fn lenient_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let date = match &value {
        Value::String(s) => {
            let s = s.trim();
            s.get(..10)
                .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
                .filter(|_| s.len() == 10 || s[10..].starts_with(['T', ' ']))
        }
        Value::Array(parts) => match parts.as_slice() {
            [y, m, d, ..] => match (y.as_i64(), m.as_u64(), d.as_u64()) {
                (Some(y), Some(m), Some(d)) => i32::try_from(y)
                    .ok()
                    .and_then(|y| NaiveDate::from_ymd_opt(y, m as u32, d as u32)),
                _ => None,
            },
            _ => None,
        },
        _ => None,
    };
    date.ok_or_else(|| serde::de::Error::custom(format!("invalid fechaReserva: {value}")))
}

fn hh_mm(raw: &str) -> &str {
    match raw.char_indices().nth(5) {
        Some((idx, _)) => &raw[..idx],
        None => raw,
    }
}

/// Time-of-day object the backend expects (`java.time.LocalTime` shape).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub nano: u32,
}

impl From<NaiveTime> for TimeOfDay {
    /// Seconds and nanoseconds are dropped; bookings are minute-grained.
    fn from(value: NaiveTime) -> Self {
        Self {
            hour: value.hour(),
            minute: value.minute(),
            second: 0,
            nano: 0,
        }
    }
}

/// Reservation creation body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewReservation {
    #[serde(rename = "usuarioId")]
    pub user_id: i64,
    #[serde(rename = "espacioId")]
    pub space_id: i64,
    /// Serialized as `yyyy-MM-dd`.
    #[serde(rename = "fechaReserva")]
    pub date: NaiveDate,
    #[serde(rename = "horaInicio")]
    pub start: TimeOfDay,
    #[serde(rename = "horaFin")]
    pub end: TimeOfDay,
}
