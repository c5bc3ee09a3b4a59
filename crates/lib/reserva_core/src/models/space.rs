//! Sports facility (`espacio`).

use serde::{Deserialize, Serialize};

/// A bookable facility as returned by `GET /espacio`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    pub id: i64,
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: String,
    #[serde(rename = "capacidad", default)]
    pub capacity: u32,
    #[serde(rename = "ubicacion", default)]
    pub location: String,
    #[serde(rename = "deporte", default)]
    pub sport: String,
    #[serde(rename = "activo", default)]
    pub active: bool,
}

/// `POST /espacio` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewSpace {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "capacidad")]
    pub capacity: u32,
    #[serde(rename = "ubicacion")]
    pub location: String,
    #[serde(rename = "deporte")]
    pub sport: String,
    #[serde(rename = "activo")]
    pub active: bool,
}

impl Space {
    pub fn status_label(&self) -> &'static str {
        if self.active { "Activo" } else { "Inactivo" }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_backend_shape() {
        let space: Space = serde_json::from_value(json!({
            "id": 1,
            "nombre": "Cancha de Fútbol A",
            "descripcion": "Césped sintético",
            "capacidad": 22,
            "ubicacion": "Sector Norte",
            "deporte": "Fútbol",
            "activo": true
        }))
        .expect("decode");
        assert_eq!(space.name, "Cancha de Fútbol A");
        assert_eq!(space.capacity, 22);
        assert!(space.active);
        assert_eq!(space.status_label(), "Activo");
    }

    #[test]
    fn missing_optional_fields_default() {
        let space: Space = serde_json::from_value(json!({ "id": 2, "nombre": "Pista" }))
            .expect("decode");
        assert_eq!(space.description, "");
        assert!(!space.active);
        assert_eq!(space.status_label(), "Inactivo");
    }
}
