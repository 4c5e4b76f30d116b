//! Per-run target selection.

use rand::Rng;

/// Pick `want` indices out of `0..total` in a single weighted skip-forward
/// pass: at every position a uniform draw decides between consuming one of
/// the remaining skips or keeping the item. Exactly `want` indices come out
/// (all of them when the list is shorter), in ascending order.
pub(crate) fn select_random_subset<R: Rng>(total: usize, want: usize, rng: &mut R) -> Vec<usize> {
    let mut selected = Vec::with_capacity(want.min(total));
    let mut to_skip = total.saturating_sub(want) as i64;

    for index in 0..total {
        let remaining_items = total as i64 - selected.len() as i64 - to_skip;
        if to_skip > 0 && rng.gen_range(0..remaining_items + to_skip) < to_skip {
            to_skip -= 1;
            continue;
        }

        selected.push(index);
        if selected.len() == want {
            break;
        }
    }

    selected
}
