//! Tiered augmentation policy.
//!
//! How many blocks are duplicated or removed depends on how many blocks the
//! axis has when it is evaluated. Each axis carries an ordered list of tiers;
//! the first tier whose block range contains the current count decides the
//! count ranges, and counts matched by no tier leave the axis untouched.

use rand::Rng;
use serde::{Deserialize, Serialize};
use table_augment_core::core::ConfigError;
use table_augment_core::domain::Axis;

/// Inclusive range of operation counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: usize,
    pub max: usize,
}

impl CountRange {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Draws a count uniformly from `min..=max`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        rng.gen_range(self.min..=self.max)
    }
}

/// One row of an axis policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    /// Smallest block count this tier applies to.
    pub min_blocks: usize,
    /// Largest block count this tier applies to; unbounded when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_blocks: Option<usize>,
    /// Number of duplications to perform.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub augment: Option<CountRange>,
    /// Number of removals to perform, after the duplications.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove: Option<CountRange>,
}

impl Tier {
    pub fn matches(&self, blocks: usize) -> bool {
        blocks >= self.min_blocks && self.max_blocks.is_none_or(|max| blocks <= max)
    }
}

/// Ordered tiers for one axis.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AxisPolicy {
    pub tiers: Vec<Tier>,
}

impl AxisPolicy {
    /// First tier matching `blocks`.
    pub fn tier_for(&self, blocks: usize) -> Option<&Tier> {
        self.tiers.iter().find(|tier| tier.matches(blocks))
    }

    fn validate(&self, axis: Axis) -> Result<(), ConfigError> {
        for (index, tier) in self.tiers.iter().enumerate() {
            let invalid = |what: &str| ConfigError::InvalidConfig {
                message: format!("{axis} tier {index}: {what}"),
            };
            if tier.max_blocks.is_some_and(|max| max < tier.min_blocks) {
                return Err(invalid("max_blocks is below min_blocks"));
            }
            if tier.augment.is_some_and(|r| r.max < r.min) {
                return Err(invalid("augment range is empty"));
            }
            if tier.remove.is_some_and(|r| r.max < r.min) {
                return Err(invalid("remove range is empty"));
            }
        }
        Ok(())
    }
}

/// Tier tables for both axes. Columns are evaluated before rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AugmentationPolicy {
    /// When false only rows are perturbed.
    pub augment_columns: bool,
    pub columns: AxisPolicy,
    pub rows: AxisPolicy,
}

impl AugmentationPolicy {
    pub fn axis(&self, axis: Axis) -> &AxisPolicy {
        match axis {
            Axis::Row => &self.rows,
            Axis::Column => &self.columns,
        }
    }

    /// Checks that every tier has a non-empty block range and count ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.columns.validate(Axis::Column)?;
        self.rows.validate(Axis::Row)
    }
}

fn tier(
    min_blocks: usize,
    max_blocks: Option<usize>,
    augment: Option<(usize, usize)>,
    remove: Option<(usize, usize)>,
) -> Tier {
    Tier {
        min_blocks,
        max_blocks,
        augment: augment.map(|(min, max)| CountRange::new(min, max)),
        remove: remove.map(|(min, max)| CountRange::new(min, max)),
    }
}

impl Default for AugmentationPolicy {
    fn default() -> Self {
        Self {
            augment_columns: true,
            columns: AxisPolicy {
                tiers: vec![
                    tier(9, None, None, Some((1, 2))),
                    tier(6, Some(8), Some((0, 2)), Some((0, 2))),
                    tier(4, Some(5), Some((1, 2)), None),
                ],
            },
            rows: AxisPolicy {
                tiers: vec![
                    tier(13, None, Some((0, 2)), Some((2, 4))),
                    tier(9, Some(12), Some((1, 4)), Some((0, 3))),
                    tier(4, Some(8), Some((1, 3)), Some((0, 1))),
                    tier(2, Some(3), Some((1, 2)), None),
                ],
            },
        }
    }
}
