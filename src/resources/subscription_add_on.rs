//! Subscription add-on line items

use crate::entity::Entity;
use crate::error::Result;
use crate::xml::{XmlCursor, XmlEncoder};

/// An add-on line item inside a subscription.
///
/// Unlike [`crate::AddOn`], the amount is a single integer: the subscription
/// already fixes the currency.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubscriptionAddOn {
    /// Code of the add-on being subscribed
    pub add_on_code: String,
    /// Minor-unit amount per quantity
    pub unit_amount_in_cents: i32,
    /// Number of units
    pub quantity: i32,
}

impl SubscriptionAddOn {
    /// Create a line item with a quantity of 1
    pub fn new(add_on_code: impl Into<String>, unit_amount_in_cents: i32) -> Self {
        Self {
            add_on_code: add_on_code.into(),
            unit_amount_in_cents,
            quantity: 1,
        }
    }

    /// Set the quantity
    pub fn with_quantity(mut self, quantity: i32) -> Self {
        self.quantity = quantity;
        self
    }
}

impl Entity for SubscriptionAddOn {
    const WRAPPER: &'static str = "subscription_add_on";

    fn read_xml(&mut self, cursor: &mut XmlCursor<'_>) -> Result<()> {
        cursor.scan(Self::WRAPPER, |cursor, name| {
            match name {
                "add_on_code" => self.add_on_code = cursor.read_string()?,
                "quantity" => self.quantity = cursor.read_i32()?,
                "unit_amount_in_cents" => self.unit_amount_in_cents = cursor.read_i32()?,
                _ => {}
            }
            Ok(())
        })
    }

    fn write_xml(&self, xml: &mut XmlEncoder) -> Result<()> {
        xml.start_element(Self::WRAPPER)?;
        xml.element("add_on_code", &self.add_on_code)?;
        xml.element("quantity", &self.quantity.to_string())?;
        xml.element("unit_amount_in_cents", &self.unit_amount_in_cents.to_string())?;
        xml.end_element(Self::WRAPPER)
    }
}
