//! Domain entities
//!
//! Concrete API resources implementing the [`crate::entity::Entity`]
//! contract. Each entity is a flat dispatch-decode plus an ordered
//! field-by-field encode; only [`AddOn`] carries remote operations.

mod add_on;
mod note;
mod plan;
mod subscription_add_on;

pub use add_on::{AddOn, AddOnType, UsageType};
pub use note::Note;
pub use plan::Plan;
pub use subscription_add_on::SubscriptionAddOn;

#[cfg(test)]
mod tests;
