//! Brute-force nearest-neighbour search over library responses.
//!
//! Every target pixel is compared with every library candidate using the
//! mean absolute componentwise difference across polarisation channels:
//!
//! $$d(\mathbf{t}, \mathbf{c}) = \frac{1}{P} \sum_{p=1}^{P} |t_p - c_p|$$
//!
//! Distances are formed for a block of pixels at a time as a broadcast
//! `(block, candidates, P)` array, and blocks run in parallel via Rayon.
//! Ties always resolve to the lowest candidate index.

use ndarray::{s, ArrayView1, ArrayView2, Axis};
use num_complex::Complex64;
use rayon::prelude::*;

/// Pixels per distance block. Bounds the temporary to
/// `PIXEL_BLOCK × candidates × P` complex values.
const PIXEL_BLOCK: usize = 64;

/// Index of the first minimum of `values`, scanning in ascending order and
/// replacing the incumbent only on a strictly smaller value.
///
/// Returns `None` for an empty sequence.
pub fn first_argmin<I>(values: I) -> Option<usize>
where
    I: IntoIterator<Item = f64>,
{
    let mut iter = values.into_iter().enumerate();
    let (mut best_idx, mut best) = iter.next()?;
    for (i, v) in iter {
        if v < best {
            best = v;
            best_idx = i;
        }
    }
    Some(best_idx)
}

/// Index of the grid point closest to `value` (lowest index on ties).
///
/// An empty grid yields index 0.
pub fn nearest_index(grid: ArrayView1<'_, f64>, value: f64) -> usize {
    first_argmin(grid.iter().map(|&g| (value - g).abs())).unwrap_or(0)
}

/// For each target row, the index of the closest candidate row.
///
/// # Arguments
/// * `candidates` - Library responses, shape `(candidates, P)`.
/// * `targets` - Target responses, shape `(pixels, P)`.
///
/// # Panics
/// Panics if the two arrays disagree on `P` or `candidates` is empty.
pub fn nearest_candidates(
    candidates: ArrayView2<'_, Complex64>,
    targets: ArrayView2<'_, Complex64>,
) -> Vec<usize> {
    assert_eq!(
        candidates.ncols(),
        targets.ncols(),
        "candidate and target channel counts differ"
    );
    assert!(candidates.nrows() > 0, "no candidates to search");

    let npix = targets.nrows();
    let channels = targets.ncols() as f64;
    let starts: Vec<usize> = (0..npix).step_by(PIXEL_BLOCK).collect();

    starts
        .par_iter()
        .map(|&start| {
            let end = (start + PIXEL_BLOCK).min(npix);
            let block = targets.slice(s![start..end, ..]);

            // (block, 1, P) - (1, candidates, P) -> (block, candidates, P)
            let diff = &block.insert_axis(Axis(1)) - &candidates.insert_axis(Axis(0));
            let distance = diff.mapv(|d| d.norm()).sum_axis(Axis(2)) / channels;

            distance
                .outer_iter()
                .map(|row| first_argmin(row.iter().copied()).unwrap_or(0))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>()
        .concat()
}
