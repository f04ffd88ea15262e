//! Stochastic structural augmentation of tables.
//!
//! [`augment_table`] applies the tiered [`AugmentationPolicy`] to a
//! [`TableModel`](table_augment_core::domain::TableModel), one axis at a
//! time, and reports whether the resulting table is worth keeping.

mod acceptance;
mod blocks;
mod policy;

pub use acceptance::{AugmentOutcome, augment_table};
pub use blocks::{augment_block, remove_block};
pub use policy::{AugmentationPolicy, AxisPolicy, CountRange, Tier};
