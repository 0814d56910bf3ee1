//! Editing operations on a parsed workout.
//!
//! The pipeline never touches blocks after construction; edits go through
//! these functions, each of which swaps one whole movement entry.

use crate::notation::decode_rep_scheme;
use crate::{Error, ParsedMovement, ParsedWorkout, Result};

fn slot<'w>(
    workout: &'w mut ParsedWorkout,
    block: usize,
    index: usize,
) -> Result<&'w mut ParsedMovement> {
    let block_count = workout.workout_blocks.len();
    let movements = &mut workout
        .workout_blocks
        .get_mut(block)
        .ok_or_else(|| {
            Error::Edit(format!(
                "block {} out of range ({} blocks)",
                block, block_count
            ))
        })?
        .movements;

    let movement_count = movements.len();
    movements.get_mut(index).ok_or_else(|| {
        Error::Edit(format!(
            "movement {} out of range in block {} ({} movements)",
            index, block, movement_count
        ))
    })
}

/// Replace one movement, returning the entry it replaced
pub fn replace_movement(
    workout: &mut ParsedWorkout,
    block: usize,
    index: usize,
    movement: ParsedMovement,
) -> Result<ParsedMovement> {
    let target = slot(workout, block, index)?;
    Ok(std::mem::replace(target, movement))
}

/// Rebuild a movement with reps decoded from editor text (`21-15-9`, `Max`, `5x5`)
///
/// Text that decodes to nothing clears the reps.
pub fn set_movement_reps(
    workout: &mut ParsedWorkout,
    block: usize,
    index: usize,
    notation: &str,
) -> Result<ParsedMovement> {
    let current = slot(workout, block, index)?.clone();
    let updated = ParsedMovement {
        reps: decode_rep_scheme(notation),
        ..current
    };
    replace_movement(workout, block, index, updated)
}
