//! Applying the policy to one table and deciding whether the result is kept.

use super::blocks::{augment_block, remove_block};
use super::policy::AugmentationPolicy;
use rand::Rng;
use table_augment_core::core::{AugmentError, AugmentResult};
use table_augment_core::domain::{Axis, ImageShape, TableModel};
use tracing::{debug, warn};

/// Result of one augmentation attempt.
#[derive(Debug)]
pub enum AugmentOutcome {
    /// The table changed size and still fits on the page.
    Accepted { shape: ImageShape },
    /// The table grew beyond the page it came from.
    Oversized { shape: ImageShape, page: ImageShape },
    /// The edits cancelled out or none were applied.
    Unchanged,
    /// An edit failed; the table is left in whatever state it reached.
    Failed(AugmentError),
}

impl AugmentOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, AugmentOutcome::Accepted { .. })
    }
}

/// Perturbs `table` according to `policy` and checks the result.
///
/// Errors raised while editing are logged and reported as
/// [`AugmentOutcome::Failed`], never returned.
pub fn augment_table<T, R>(
    table: &mut T,
    page: ImageShape,
    policy: &AugmentationPolicy,
    rng: &mut R,
) -> AugmentOutcome
where
    T: TableModel,
    R: Rng + ?Sized,
{
    let crop_shape = table.shape();

    if let Err(err) = apply_policy(table, policy, rng) {
        warn!("Augmentation failed: {err}");
        return AugmentOutcome::Failed(err);
    }

    let shape = table.shape();
    if !shape.fits_within(&page) {
        debug!("Generated table {shape} exceeds page {page}, discarding");
        AugmentOutcome::Oversized { shape, page }
    } else if shape == crop_shape {
        debug!("Generated table has the original size {shape}, discarding");
        AugmentOutcome::Unchanged
    } else {
        AugmentOutcome::Accepted { shape }
    }
}

fn apply_policy<T, R>(table: &mut T, policy: &AugmentationPolicy, rng: &mut R) -> AugmentResult<()>
where
    T: TableModel,
    R: Rng + ?Sized,
{
    let axes: &[Axis] = if policy.augment_columns {
        &[Axis::Column, Axis::Row]
    } else {
        &[Axis::Row]
    };

    for &axis in axes {
        let Some(tier) = policy.axis(axis).tier_for(table.block_count(axis)) else {
            continue;
        };
        if let Some(range) = tier.augment {
            for _ in 0..range.sample(rng) {
                augment_block(table, axis, rng)?;
            }
        }
        if let Some(range) = tier.remove {
            for _ in 0..range.sample(rng) {
                remove_block(table, axis, rng)?;
            }
        }
    }
    Ok(())
}
