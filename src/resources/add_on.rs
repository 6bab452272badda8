//! Plan add-ons
//!
//! An add-on is an optional line item attached to a plan, priced per
//! currency in minor units. Add-ons are the one resource in this module with
//! remote operations; everything else here is data-only.

use crate::entity::Entity;
use crate::error::{Error, Result};
use crate::http::Transport;
use crate::types::Method;
use crate::xml::{bool_to_wire, WireEnum, XmlCursor, XmlEncoder};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

const URL_PREFIX: &str = "/plans/";
const URL_POSTFIX: &str = "/add_ons/";

/// Pricing model of an add-on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOnType {
    /// Fixed price per billing cycle
    Fixed,
    /// Billed by reported usage
    Usage,
}

impl WireEnum for AddOnType {
    fn wire_name(self) -> &'static str {
        match self {
            AddOnType::Fixed => "fixed",
            AddOnType::Usage => "usage",
        }
    }

    fn from_wire(value: &str) -> Result<Self> {
        match value {
            "fixed" => Ok(AddOnType::Fixed),
            "usage" => Ok(AddOnType::Usage),
            _ => Err(Error::unknown_enum(value)),
        }
    }
}

/// How a usage add-on converts reported quantity into a charge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageType {
    /// A unit price applied to each reported unit
    PerUnit,
    /// A percentage of the reported amount
    Percentage,
}

impl WireEnum for UsageType {
    fn wire_name(self) -> &'static str {
        match self {
            UsageType::PerUnit => "per_unit",
            UsageType::Percentage => "percentage",
        }
    }

    fn from_wire(value: &str) -> Result<Self> {
        match value {
            "per_unit" => Ok(UsageType::PerUnit),
            "percentage" => Ok(UsageType::Percentage),
            _ => Err(Error::unknown_enum(value)),
        }
    }
}

/// An add-on attached to a plan.
///
/// `plan_code` and `add_on_code` together identify the resource remotely.
/// Optional fields distinguish "never set" from an explicit value: a `None`
/// is not written on encode, and an absent element on decode leaves `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddOn {
    /// Code of the plan this add-on belongs to
    pub plan_code: String,
    /// Unique code of the add-on within its plan
    pub add_on_code: String,
    /// Human-readable name
    pub name: String,
    /// Quantity assumed when a subscription does not specify one
    pub default_quantity: i32,
    /// Whether hosted payment pages display a quantity field
    pub display_quantity_on_hosted_page: Option<bool>,
    /// Tax classification code
    pub tax_code: Option<String>,
    /// Whether subscribers may opt out of the add-on
    pub optional: Option<bool>,
    /// Accounting code carried through to invoices
    pub accounting_code: String,
    /// Measured unit this add-on reports usage against
    pub measured_unit_id: Option<i64>,
    /// Pricing model
    pub add_on_type: Option<AddOnType>,
    /// Usage conversion, independent of the pricing model
    pub usage_type: Option<UsageType>,
    /// Server-assigned creation time
    pub created_at: Option<DateTime<Utc>>,
    /// Server-assigned last-update time
    pub updated_at: Option<DateTime<Utc>>,
    /// Currency code to minor-unit amount; re-adding a currency overwrites
    pub unit_amount_in_cents: BTreeMap<String, i32>,
}

impl AddOn {
    /// Create an add-on for a plan
    pub fn new(
        plan_code: impl Into<String>,
        add_on_code: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            plan_code: plan_code.into(),
            add_on_code: add_on_code.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Create this add-on under its plan and refresh it from the response
    pub fn create(&mut self, transport: &impl Transport) -> Result<()> {
        self.require_plan_code()?;
        let path = format!(
            "{URL_PREFIX}{}{URL_POSTFIX}",
            urlencoding::encode(&self.plan_code)
        );
        let body = self.to_xml_string()?;
        if let Some(response) = transport.perform_request(Method::POST, &path, Some(body))? {
            self.from_xml_str(&response)?;
        }
        Ok(())
    }

    /// Update the remote add-on and refresh it from the response
    pub fn update(&mut self, transport: &impl Transport) -> Result<()> {
        self.require_plan_code()?;
        self.require_add_on_code()?;
        let path = format!(
            "{URL_PREFIX}{}{URL_POSTFIX}{}",
            urlencoding::encode(&self.plan_code),
            urlencoding::encode(&self.add_on_code)
        );
        let body = self.to_xml_string()?;
        if let Some(response) = transport.perform_request(Method::PUT, &path, Some(body))? {
            self.from_xml_str(&response)?;
        }
        Ok(())
    }

    /// Delete the remote add-on, making it inactive.
    ///
    /// The local object is not mutated.
    pub fn delete(&self, transport: &impl Transport) -> Result<()> {
        self.require_plan_code()?;
        self.require_add_on_code()?;
        let path = format!(
            "{URL_PREFIX}{}{URL_POSTFIX}{}",
            urlencoding::encode(&self.plan_code),
            urlencoding::encode(&self.add_on_code)
        );
        transport.perform_request(Method::DELETE, &path, None)?;
        Ok(())
    }

    fn require_plan_code(&self) -> Result<()> {
        if self.plan_code.is_empty() {
            return Err(Error::missing_field("plan_code"));
        }
        Ok(())
    }

    fn require_add_on_code(&self) -> Result<()> {
        if self.add_on_code.is_empty() {
            return Err(Error::missing_field("add_on_code"));
        }
        Ok(())
    }

    fn read_unit_amounts(&mut self, cursor: &mut XmlCursor<'_>) -> Result<()> {
        cursor.scan("unit_amount_in_cents", |cursor, currency| {
            let amount = cursor.read_i32()?;
            self.unit_amount_in_cents.insert(currency.to_string(), amount);
            Ok(())
        })
    }
}

impl Entity for AddOn {
    const WRAPPER: &'static str = "add_on";

    fn read_xml(&mut self, cursor: &mut XmlCursor<'_>) -> Result<()> {
        cursor.scan(Self::WRAPPER, |cursor, name| {
            match name {
                "add_on_code" => self.add_on_code = cursor.read_string()?,
                "accounting_code" => self.accounting_code = cursor.read_string()?,
                "name" => self.name = cursor.read_string()?,
                "display_quantity_on_hosted_page" => {
                    self.display_quantity_on_hosted_page = Some(cursor.read_bool()?);
                }
                "default_quantity" => self.default_quantity = cursor.read_i32()?,
                "optional" => self.optional = Some(cursor.read_bool()?),
                "measured_unit_id" => self.measured_unit_id = Some(cursor.read_i64()?),
                "created_at" => self.created_at = Some(cursor.read_datetime()?),
                "updated_at" => self.updated_at = Some(cursor.read_datetime()?),
                "unit_amount_in_cents" => self.read_unit_amounts(cursor)?,
                "tax_code" => self.tax_code = Some(cursor.read_string()?),
                "add_on_type" => self.add_on_type = Some(cursor.read_enum()?),
                "usage_type" => self.usage_type = Some(cursor.read_enum()?),
                _ => {}
            }
            Ok(())
        })
    }

    fn write_xml(&self, xml: &mut XmlEncoder) -> Result<()> {
        xml.start_element(Self::WRAPPER)?;

        xml.element("add_on_code", &self.add_on_code)?;
        xml.element("name", &self.name)?;
        xml.element("default_quantity", &self.default_quantity.to_string())?;
        xml.element("accounting_code", &self.accounting_code)?;

        if let Some(add_on_type) = self.add_on_type {
            xml.element("add_on_type", add_on_type.wire_name())?;
        }
        if let Some(usage_type) = self.usage_type {
            xml.element("usage_type", usage_type.wire_name())?;
        }
        if let Some(measured_unit_id) = self.measured_unit_id {
            xml.element("measured_unit_id", &measured_unit_id.to_string())?;
        }
        if let Some(display) = self.display_quantity_on_hosted_page {
            xml.element("display_quantity_on_hosted_page", bool_to_wire(display))?;
        }
        if let Some(optional) = self.optional {
            xml.element("optional", bool_to_wire(optional))?;
        }

        if !self.unit_amount_in_cents.is_empty() {
            xml.start_element("unit_amount_in_cents")?;
            for (currency, amount) in &self.unit_amount_in_cents {
                xml.element(currency, &amount.to_string())?;
            }
            xml.end_element("unit_amount_in_cents")?;
        }

        xml.end_element(Self::WRAPPER)
    }
}

impl std::fmt::Display for AddOn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "add-on {} (plan {})", self.add_on_code, self.plan_code)
    }
}
