//! Facility endpoints.

use log::info;
use reqwest::Method;

use super::{ApiClient, ApiError, decode_json};
use crate::forms::SpaceForm;
use crate::models::{NewSpace, Space};

impl ApiClient {
    /// `GET /espacio`: every facility, active or not.
    pub async fn list_spaces(&self) -> Result<Vec<Space>, ApiError> {
        let resp = self.send(self.request(Method::GET, "/espacio")?).await?;
        decode_json(resp).await
    }

    /// `POST /espacio`. An incomplete form fails before any request is made.
    pub async fn create_space(&self, form: &SpaceForm) -> Result<NewSpace, ApiError> {
        let body = form.validate()?;
        let request = self.request(Method::POST, "/espacio")?.json(&body);
        self.send(request).await?;
        info!("created space '{}'", body.name);
        Ok(body)
    }

    /// `PUT /espacio/{id}` with the full facility body.
    pub async fn update_space(&self, space: &Space) -> Result<(), ApiError> {
        let request = self
            .request(Method::PUT, &format!("/espacio/{}", space.id))?
            .json(space);
        self.send(request).await?;
        info!("updated space {}", space.id);
        Ok(())
    }

    /// `DELETE /espacio/{id}`.
    pub async fn delete_space(&self, id: i64) -> Result<(), ApiError> {
        let request = self.request(Method::DELETE, &format!("/espacio/{id}"))?;
        self.send(request).await?;
        info!("deleted space {id}");
        Ok(())
    }
}
