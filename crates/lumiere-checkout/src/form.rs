//! # Shipping Form
//!
//! The editable shipping form and its two mutually exclusive selection
//! modes: copying a saved address in, or typing fields by hand. A manual
//! edit to any field drops the saved-address marker.

use serde::Serialize;
use ts_rs::TS;

use lumiere_core::order::shipping_summary;
use lumiere_core::validation::{validate_phone, validate_required};
use lumiere_core::{ShippingAddress, ValidationError};

// =============================================================================
// Shipping Field
// =============================================================================

/// The four required shipping fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum ShippingField {
    FullName,
    Phone,
    Street,
    City,
}

impl ShippingField {
    /// Field name as the frontend knows it.
    pub const fn name(&self) -> &'static str {
        match self {
            ShippingField::FullName => "fullName",
            ShippingField::Phone => "phone",
            ShippingField::Street => "street",
            ShippingField::City => "city",
        }
    }
}

// =============================================================================
// Shipping Form
// =============================================================================

/// Editable shipping form state.
#[derive(Debug, Clone, Default, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ShippingForm {
    pub full_name: String,
    pub phone: String,
    pub street: String,
    pub city: String,

    /// Id of the saved address the fields were copied from, if the
    /// customer has not edited them since.
    saved_address_id: Option<String>,
}

impl ShippingForm {
    /// Creates an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies a saved address into the form and records the selection.
    pub fn select_saved(&mut self, address: &ShippingAddress) {
        self.full_name = address.full_name.clone();
        self.phone = address.phone.clone();
        self.street = address.street.clone();
        self.city = address.city.clone();
        self.saved_address_id = Some(address.id.clone());
    }

    /// Overwrites one field by hand.
    ///
    /// Editing and selecting-a-saved-address are mutually exclusive: any
    /// manual edit clears the saved-address marker.
    pub fn set(&mut self, field: ShippingField, value: impl Into<String>) {
        let value = value.into();
        match field {
            ShippingField::FullName => self.full_name = value,
            ShippingField::Phone => self.phone = value,
            ShippingField::Street => self.street = value,
            ShippingField::City => self.city = value,
        }
        self.saved_address_id = None;
    }

    /// The saved address the form currently mirrors, if any.
    pub fn saved_address_id(&self) -> Option<&str> {
        self.saved_address_id.as_deref()
    }

    /// Validates the form for submission.
    ///
    /// All four fields must be non-empty; the first missing field is
    /// reported so the UI can focus it. The phone also gets a loose format
    /// check.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_required(ShippingField::FullName.name(), &self.full_name)?;
        validate_phone(&self.phone)?;
        validate_required(ShippingField::Street.name(), &self.street)?;
        validate_required(ShippingField::City.name(), &self.city)?;
        Ok(())
    }

    /// Formats the free-text summary carried on the order.
    pub fn summary(&self) -> String {
        shipping_summary(&self.full_name, &self.phone, &self.street, &self.city)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn saved(id: &str, is_default: bool) -> ShippingAddress {
        ShippingAddress {
            id: id.to_string(),
            full_name: "Linh Trần".to_string(),
            phone: "0901234567".to_string(),
            street: "12 Lê Lợi".to_string(),
            city: "Đà Nẵng".to_string(),
            is_default,
        }
    }

    #[test]
    fn test_select_saved_copies_fields() {
        let mut form = ShippingForm::new();
        form.select_saved(&saved("addr-1", true));

        assert_eq!(form.full_name, "Linh Trần");
        assert_eq!(form.city, "Đà Nẵng");
        assert_eq!(form.saved_address_id(), Some("addr-1"));
    }

    #[test]
    fn test_manual_edit_clears_selection() {
        let mut form = ShippingForm::new();
        form.select_saved(&saved("addr-1", true));

        form.set(ShippingField::Street, "45 Trần Phú");

        assert_eq!(form.street, "45 Trần Phú");
        assert!(form.saved_address_id().is_none());
        // Other fields keep their copied values
        assert_eq!(form.full_name, "Linh Trần");
    }

    #[test]
    fn test_validate_reports_first_missing_field() {
        let mut form = ShippingForm::new();
        form.set(ShippingField::FullName, "Linh Trần");

        let err = form.validate().unwrap_err();
        assert_eq!(err.field(), "phone");

        form.set(ShippingField::Phone, "0901234567");
        let err = form.validate().unwrap_err();
        assert_eq!(err.field(), "street");
    }

    #[test]
    fn test_validate_complete_form() {
        let mut form = ShippingForm::new();
        form.select_saved(&saved("addr-1", false));
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_summary() {
        let mut form = ShippingForm::new();
        form.select_saved(&saved("addr-1", false));
        assert_eq!(form.summary(), "Linh Trần, 0901234567, 12 Lê Lợi, Đà Nẵng");
    }
}
