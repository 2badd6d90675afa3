//! One-dimensional cell coordinates along a grid direction.

use crate::error::{Result, RklError};

/// Cell coordinates along one direction, ghost cells included.
///
/// Index `n_ghost` is the first active cell and `n_ghost + n_active - 1` the
/// last. An axis without ghost cells is *inactive*: it has a single cell and
/// the solver never takes derivatives along it.
#[derive(Clone, Debug, PartialEq)]
pub struct Axis {
    /// Number of active cells
    pub n_active: usize,
    /// Ghost cells on each side
    pub n_ghost: usize,
    /// Cell centres
    pub x: Vec<f64>,
    /// Left faces
    pub xl: Vec<f64>,
    /// Right faces
    pub xr: Vec<f64>,
    /// Cell widths `xr - xl`
    pub dx: Vec<f64>,
}

impl Axis {
    /// Uniform axis of `n` active cells on `[lo, hi]`.
    pub fn uniform(lo: f64, hi: f64, n: usize, n_ghost: usize) -> Self {
        Self::uniform_slice(lo, hi, n, n_ghost, 0, n)
    }

    /// The part of a uniform global axis owned by one partition.
    ///
    /// Cells `offset..offset + n_local` of the global axis `[lo, hi]` with
    /// `n_global` cells. Coordinates are computed from the global cell index,
    /// so they are bit-identical to the corresponding cells of
    /// `Axis::uniform(lo, hi, n_global, n_ghost)`.
    pub fn uniform_slice(
        lo: f64,
        hi: f64,
        n_global: usize,
        n_ghost: usize,
        offset: usize,
        n_local: usize,
    ) -> Self {
        assert!(n_global > 0, "Need at least one cell");
        assert!(hi > lo, "hi must be greater than lo");
        assert!(
            offset + n_local <= n_global,
            "Slice {}..{} exceeds {} cells",
            offset,
            offset + n_local,
            n_global
        );

        let h = (hi - lo) / n_global as f64;
        let faces: Vec<f64> = (0..=n_local + 2 * n_ghost)
            .map(|idx| {
                let g = offset as isize + idx as isize - n_ghost as isize;
                lo + g as f64 * h
            })
            .collect();

        Self::from_faces_unchecked(faces, n_ghost)
    }

    /// Logarithmically stretched axis on `[lo, hi]`, `lo > 0`.
    ///
    /// Constant `dx / x`, the usual choice for radial directions.
    pub fn logarithmic(lo: f64, hi: f64, n: usize, n_ghost: usize) -> Self {
        assert!(lo > 0.0 && hi > lo, "Need 0 < lo < hi");
        assert!(n > 0, "Need at least one cell");

        let ratio = (hi / lo).ln() / n as f64;
        let faces: Vec<f64> = (0..=n + 2 * n_ghost)
            .map(|idx| {
                let g = idx as f64 - n_ghost as f64;
                lo * (g * ratio).exp()
            })
            .collect();

        Self::from_faces_unchecked(faces, n_ghost)
    }

    /// Single inactive cell covering `[lo, hi]`.
    pub fn single(lo: f64, hi: f64) -> Self {
        Self::from_faces_unchecked(vec![lo, hi], 0)
    }

    /// Axis from explicit face positions, ghost faces included.
    ///
    /// `faces` must be strictly increasing with `n_active + 2 * n_ghost + 1`
    /// entries.
    pub fn from_faces(faces: Vec<f64>, n_ghost: usize) -> Result<Self> {
        if faces.len() < 2 * n_ghost + 2 {
            return Err(RklError::configuration(format!(
                "{} faces cannot hold {} ghost cells per side and an active cell",
                faces.len(),
                n_ghost
            )));
        }
        if faces.windows(2).any(|w| !(w[1] > w[0])) {
            return Err(RklError::configuration(
                "axis faces must be strictly increasing",
            ));
        }
        Ok(Self::from_faces_unchecked(faces, n_ghost))
    }

    fn from_faces_unchecked(faces: Vec<f64>, n_ghost: usize) -> Self {
        let np_tot = faces.len() - 1;
        let xl: Vec<f64> = faces[..np_tot].to_vec();
        let xr: Vec<f64> = faces[1..].to_vec();
        let x = xl.iter().zip(&xr).map(|(l, r)| 0.5 * (l + r)).collect();
        let dx = xl.iter().zip(&xr).map(|(l, r)| r - l).collect();

        Self {
            n_active: np_tot - 2 * n_ghost,
            n_ghost,
            x,
            xl,
            xr,
            dx,
        }
    }

    /// Total cells including ghosts.
    #[inline]
    pub fn np_tot(&self) -> usize {
        self.n_active + 2 * self.n_ghost
    }

    /// First active index.
    #[inline]
    pub fn beg(&self) -> usize {
        self.n_ghost
    }

    /// One past the last active index.
    #[inline]
    pub fn end(&self) -> usize {
        self.n_ghost + self.n_active
    }

    /// Whether derivatives are taken along this axis.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.n_ghost > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_axis() {
        let axis = Axis::uniform(0.0, 1.0, 10, 2);
        assert_eq!(axis.np_tot(), 14);
        assert_eq!(axis.beg(), 2);
        assert_eq!(axis.end(), 12);
        assert!((axis.xl[axis.beg()] - 0.0).abs() < 1e-14);
        assert!((axis.xr[axis.end() - 1] - 1.0).abs() < 1e-14);
        // Ghost cells extend the spacing outside the domain.
        assert!((axis.x[0] + 0.15).abs() < 1e-14);
        for &dx in &axis.dx {
            assert!((dx - 0.1).abs() < 1e-14);
        }
    }

    #[test]
    fn test_slice_matches_global_bitwise() {
        let global = Axis::uniform(-1.0, 2.0, 48, 2);
        for part in 0..4 {
            let local = Axis::uniform_slice(-1.0, 2.0, 48, 2, part * 12, 12);
            for idx in 0..local.np_tot() {
                let g = part * 12 + idx;
                assert_eq!(local.x[idx].to_bits(), global.x[g].to_bits());
                assert_eq!(local.dx[idx].to_bits(), global.dx[g].to_bits());
            }
        }
    }

    #[test]
    fn test_logarithmic_constant_ratio() {
        let axis = Axis::logarithmic(1.0, 10.0, 16, 2);
        let ratio = axis.dx[3] / axis.x[3];
        for i in axis.beg()..axis.end() {
            assert!((axis.dx[i] / axis.x[i] - ratio).abs() < 1e-12);
        }
        assert!((axis.xl[axis.beg()] - 1.0).abs() < 1e-12);
        assert!((axis.xr[axis.end() - 1] - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_is_inactive() {
        let axis = Axis::single(0.0, 2.0);
        assert!(!axis.is_active());
        assert_eq!(axis.np_tot(), 1);
        assert_eq!((axis.beg(), axis.end()), (0, 1));
        assert!((axis.dx[0] - 2.0).abs() < 1e-14);
    }

    #[test]
    fn test_from_faces_validation() {
        assert!(Axis::from_faces(vec![0.0, 1.0, 0.5, 2.0], 1).is_err());
        assert!(Axis::from_faces(vec![0.0, 1.0], 1).is_err());
        let axis = Axis::from_faces(vec![0.0, 1.0, 3.0, 4.0], 1).unwrap();
        assert_eq!(axis.n_active, 1);
        assert!((axis.dx[1] - 2.0).abs() < 1e-14);
    }
}
