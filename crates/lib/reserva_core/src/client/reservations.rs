//! Reservation endpoints.

use log::info;
use reqwest::Method;

use super::{ApiClient, ApiError, decode_json};
use crate::forms::{ReservationForm, cancellable, sort_reservations};
use crate::models::{NewReservation, Reservation};

/// Collection path for creating reservations.
pub const RESERVATIONS_PATH: &str = "/reserva";

impl ApiClient {
    /// `GET /reserva/usuario/{userId}` in backend order.
    pub async fn list_reservations(&self, user_id: i64) -> Result<Vec<Reservation>, ApiError> {
        let request = self.request(Method::GET, &format!("/reserva/usuario/{user_id}"))?;
        let resp = self.send(request).await?;
        decode_json(resp).await
    }

    /// Reservations of the logged-in user, active ones first.
    pub async fn my_reservations(&self) -> Result<Vec<Reservation>, ApiError> {
        let user_id = self.session.user_id().ok_or(ApiError::NotAuthenticated)?;
        let mut reservations = self.list_reservations(user_id).await?;
        sort_reservations(&mut reservations);
        Ok(reservations)
    }

    /// `PUT /reserva/cancelar/{id}`.
    pub async fn cancel_reservation(&self, id: i64) -> Result<(), ApiError> {
        let request = self.request(Method::PUT, &format!("/reserva/cancelar/{id}"))?;
        self.send(request).await?;
        info!("cancelled reservation {id}");
        Ok(())
    }

    /// Cancel one of the logged-in user's reservations.
    ///
    /// Only active reservations are offered for cancelling, so the id is looked
    /// up in [`my_reservations`](Self::my_reservations) first.
    pub async fn cancel_my_reservation(&self, id: i64) -> Result<(), ApiError> {
        let reservations = self.my_reservations().await?;
        cancellable(&reservations, id)?;
        self.cancel_reservation(id).await
    }

    /// `POST /reserva` for the logged-in user.
    ///
    /// The user id comes from the session; without one the form is incomplete
    /// and no request is made.
    pub async fn create_reservation(
        &self,
        form: &ReservationForm,
    ) -> Result<NewReservation, ApiError> {
        let body = form.validate(self.session.user_id())?;
        let request = self.request(Method::POST, RESERVATIONS_PATH)?.json(&body);
        self.send(request).await?;
        info!(
            "created reservation for space {} on {}",
            body.space_id, body.date
        );
        Ok(body)
    }
}
