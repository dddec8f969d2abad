//! Car entity type

use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::form::{parse_text, unknown_field, EntityForm, FieldViolation, FormError, Slot};
use crate::core::identity::{EntityKind, Identified};

/// A car that documents are filed under
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub id: Option<i64>,

    #[serde(default)]
    pub model: Option<String>,
}

impl Identified for Car {
    fn key(&self) -> Option<i64> {
        self.id
    }
}

impl Entity for Car {
    const KIND: EntityKind = EntityKind::Car;
    type Form = CarForm;
}

/// Edit form for [`Car`]
#[derive(Debug, Clone, PartialEq)]
pub struct CarForm {
    pub id: Slot<Option<i64>>,
    pub model: Slot<Option<String>>,
}

impl EntityForm for CarForm {
    type Entity = Car;

    const FIELDS: &'static [&'static str] = &["id", "model"];

    fn build(seed: Option<&Car>) -> Self {
        let raw = seed.cloned().unwrap_or_default();
        Self {
            id: Slot::locked(raw.id).required(),
            model: Slot::editable(raw.model).required(),
        }
    }

    fn extract(&self) -> Car {
        Car {
            id: self.id.value(),
            model: self.model.value(),
        }
    }

    fn reset(&mut self, seed: &Car) {
        *self = Self::build(Some(seed));
    }

    fn set(&mut self, field: &str, raw: &str) -> Result<(), FormError> {
        match field {
            "id" => Err(FormError::ReadOnly("id")),
            "model" => self.model.set("model", parse_text(raw)),
            _ => Err(unknown_field(field, Self::FIELDS)),
        }
    }

    fn violations(&self) -> Vec<FieldViolation> {
        let mut violations = Vec::new();
        if self.model.is_missing() {
            violations.push(FieldViolation::required("model"));
        }
        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_car_form_requires_model() {
        let mut form = CarForm::build(None);
        assert_eq!(form.violations(), vec![FieldViolation::required("model")]);
        form.set("model", "Roadster").unwrap();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_car_id_is_locked() {
        let mut form = CarForm::build(Some(&Car {
            id: Some(3),
            model: None,
        }));
        assert_eq!(form.set("id", "4"), Err(FormError::ReadOnly("id")));
        assert_eq!(form.extract().id, Some(3));
    }

    #[test]
    fn test_car_json_shape() {
        let car: Car = serde_json::from_str(r#"{"id":5,"model":"Coupe","documents":null}"#).unwrap();
        assert_eq!(car.id, Some(5));
        assert_eq!(car.model.as_deref(), Some("Coupe"));
        assert_eq!(
            serde_json::to_value(Car::default()).unwrap(),
            serde_json::json!({"id": null, "model": null})
        );
    }
}
