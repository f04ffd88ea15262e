//! Single-block structural edits.
//!
//! The first and last blocks of an axis are never picked: they usually hold
//! headers and closing rules whose duplication or loss produces implausible
//! tables.

use rand::Rng;
use std::ops::RangeInclusive;
use table_augment_core::core::{AugmentError, AugmentResult};
use table_augment_core::domain::{Axis, TableModel};
use tracing::trace;

/// Indices `1 ..= n - 2`, or `None` when there are fewer than three blocks.
fn interior(n: usize) -> Option<RangeInclusive<usize>> {
    (n >= 3).then(|| 1..=n - 2)
}

/// Duplicates a random interior block to a random interior position.
///
/// The source and the insertion point are drawn independently, so the copy
/// may land next to its original or anywhere else in the interior.
///
/// # Errors
///
/// [`AugmentError::NoInteriorBlock`] when the axis has fewer than three
/// blocks; any error reported by the table model.
pub fn augment_block<T, R>(table: &mut T, axis: Axis, rng: &mut R) -> AugmentResult<()>
where
    T: TableModel,
    R: Rng + ?Sized,
{
    let n = table.block_count(axis);
    let range = interior(n).ok_or(AugmentError::NoInteriorBlock {
        axis: axis.name(),
        len: n,
    })?;

    let source = rng.gen_range(range.clone());
    let target = rng.gen_range(range);
    trace!("replicate {axis} {source} -> {target} of {n}");
    table.replicate(source, target, axis)?;
    Ok(())
}

/// Deletes a random interior block.
///
/// Returns `Ok(false)` without touching the table when the axis has fewer
/// than four blocks.
pub fn remove_block<T, R>(table: &mut T, axis: Axis, rng: &mut R) -> AugmentResult<bool>
where
    T: TableModel,
    R: Rng + ?Sized,
{
    let n = table.block_count(axis);
    if n < 4 {
        return Ok(false);
    }

    let index = rng.gen_range(1..=n - 2);
    trace!("remove {axis} {index} of {n}");
    table.remove(index, axis)?;
    Ok(true)
}
