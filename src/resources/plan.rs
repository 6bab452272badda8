//! Plans
//!
//! A plan is the parent resource add-ons hang off. The SDK currently treats
//! plans as data-only: they decode from listings and fetches, and add-on
//! operations address them by code.

use crate::entity::Entity;
use crate::error::Result;
use crate::xml::{XmlCursor, XmlEncoder};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// A billing plan
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Plan {
    /// Unique plan code
    pub plan_code: String,
    /// Human-readable name
    pub name: String,
    /// Marketing description
    pub description: Option<String>,
    /// Recurring charge per currency, in minor units
    pub unit_amount_in_cents: BTreeMap<String, i32>,
    /// One-time setup fee per currency, in minor units
    pub setup_fee_in_cents: BTreeMap<String, i32>,
    /// Server-assigned creation time
    pub created_at: Option<DateTime<Utc>>,
    /// Server-assigned last-update time
    pub updated_at: Option<DateTime<Utc>>,
}

impl Plan {
    fn read_amounts(
        cursor: &mut XmlCursor<'_>,
        wrapper: &str,
        amounts: &mut BTreeMap<String, i32>,
    ) -> Result<()> {
        cursor.scan(wrapper, |cursor, currency| {
            let amount = cursor.read_i32()?;
            amounts.insert(currency.to_string(), amount);
            Ok(())
        })
    }
}

impl Entity for Plan {
    const WRAPPER: &'static str = "plan";

    fn read_xml(&mut self, cursor: &mut XmlCursor<'_>) -> Result<()> {
        cursor.scan(Self::WRAPPER, |cursor, name| {
            match name {
                "plan_code" => self.plan_code = cursor.read_string()?,
                "name" => self.name = cursor.read_string()?,
                "description" => self.description = Some(cursor.read_string()?),
                "unit_amount_in_cents" => {
                    Self::read_amounts(cursor, "unit_amount_in_cents", &mut self.unit_amount_in_cents)?;
                }
                "setup_fee_in_cents" => {
                    Self::read_amounts(cursor, "setup_fee_in_cents", &mut self.setup_fee_in_cents)?;
                }
                "created_at" => self.created_at = Some(cursor.read_datetime()?),
                "updated_at" => self.updated_at = Some(cursor.read_datetime()?),
                _ => {}
            }
            Ok(())
        })
    }

    fn write_xml(&self, xml: &mut XmlEncoder) -> Result<()> {
        xml.start_element(Self::WRAPPER)?;
        xml.element("plan_code", &self.plan_code)?;
        xml.element("name", &self.name)?;
        if let Some(description) = &self.description {
            xml.element("description", description)?;
        }
        for (wrapper, amounts) in [
            ("unit_amount_in_cents", &self.unit_amount_in_cents),
            ("setup_fee_in_cents", &self.setup_fee_in_cents),
        ] {
            if !amounts.is_empty() {
                xml.start_element(wrapper)?;
                for (currency, amount) in amounts {
                    xml.element(currency, &amount.to_string())?;
                }
                xml.end_element(wrapper)?;
            }
        }
        xml.end_element(Self::WRAPPER)
    }
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "plan {}", self.plan_code)
    }
}
