//! Row-wise iteration helpers.
//!
//! A row is one contiguous run of `ni` values at fixed `(k, j)` (and fixed
//! component for multi-component fields). Row `r` of a `(k, j, i)` block
//! maps to `k = r / nj`, `j = r % nj`.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Apply `f(row, values)` to every row of `data`.
pub(crate) fn for_each_row<F>(data: &mut [f64], ni: usize, f: F)
where
    F: Fn(usize, &mut [f64]) + Send + Sync,
{
    #[cfg(feature = "parallel")]
    data.par_chunks_mut(ni)
        .enumerate()
        .for_each(|(row, values)| f(row, values));

    #[cfg(not(feature = "parallel"))]
    data.chunks_mut(ni)
        .enumerate()
        .for_each(|(row, values)| f(row, values));
}

/// Apply `f(row, a_values, b_values)` to matching rows of two blocks.
pub(crate) fn for_each_row_pair<F>(a: &mut [f64], b: &mut [f64], ni: usize, f: F)
where
    F: Fn(usize, &mut [f64], &mut [f64]) + Send + Sync,
{
    assert_eq!(a.len(), b.len());

    #[cfg(feature = "parallel")]
    a.par_chunks_mut(ni)
        .zip(b.par_chunks_mut(ni))
        .enumerate()
        .for_each(|(row, (ra, rb))| f(row, ra, rb));

    #[cfg(not(feature = "parallel"))]
    a.chunks_mut(ni)
        .zip(b.chunks_mut(ni))
        .enumerate()
        .for_each(|(row, (ra, rb))| f(row, ra, rb));
}

/// Reduce `map(row, values)` over all rows with an associative `combine`.
pub(crate) fn reduce_rows<M, R>(data: &[f64], ni: usize, identity: f64, map: M, combine: R) -> f64
where
    M: Fn(usize, &[f64]) -> f64 + Send + Sync,
    R: Fn(f64, f64) -> f64 + Send + Sync,
{
    #[cfg(feature = "parallel")]
    let result = data
        .par_chunks(ni)
        .enumerate()
        .map(|(row, values)| map(row, values))
        .reduce(|| identity, &combine);

    #[cfg(not(feature = "parallel"))]
    let result = data
        .chunks(ni)
        .enumerate()
        .map(|(row, values)| map(row, values))
        .fold(identity, &combine);

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_see_their_index() {
        let mut data = vec![0.0; 12];
        for_each_row(&mut data, 4, |row, values| {
            for v in values.iter_mut() {
                *v = row as f64;
            }
        });
        assert_eq!(&data[0..4], &[0.0; 4]);
        assert_eq!(&data[8..12], &[2.0; 4]);
    }

    #[test]
    fn test_row_pair_swaps() {
        let mut a = vec![1.0; 6];
        let mut b = vec![2.0; 6];
        for_each_row_pair(&mut a, &mut b, 3, |_, ra, rb| ra.swap_with_slice(rb));
        assert!(a.iter().all(|&v| v == 2.0));
        assert!(b.iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_reduce_rows_max() {
        let data: Vec<f64> = (0..20).map(|v| v as f64).collect();
        let max = reduce_rows(
            &data,
            5,
            f64::NEG_INFINITY,
            |_, values| values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            f64::max,
        );
        assert_eq!(max, 19.0);
    }
}
