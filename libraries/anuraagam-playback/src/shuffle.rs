//! Random track picking for shuffle mode

use rand::Rng;

/// Pick a uniformly random index in `0..len`, never returning `exclude`.
///
/// Returns `None` when the queue has fewer than two tracks: there is nothing
/// else to pick.
pub fn random_index_excluding<R: Rng + ?Sized>(
    rng: &mut R,
    len: usize,
    exclude: Option<usize>,
) -> Option<usize> {
    if len <= 1 {
        return None;
    }

    match exclude {
        Some(current) if current < len => {
            // Draw from the other len - 1 slots and step over the current one
            let pick = rng.gen_range(0..len - 1);
            Some(if pick >= current { pick + 1 } else { pick })
        }
        _ => Some(rng.gen_range(0..len)),
    }
}
