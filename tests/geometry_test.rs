//! Curvilinear corrections of the parabolic right-hand side.
//!
//! With zero flux through the outer faces, the divergence must conserve the
//! volume integral of every component, and the azimuthal component must
//! conserve angular momentum (`r v_phi` for radial faces, `sin(theta) v_phi`
//! for polar-angle faces on spheres).

use std::sync::Arc;

use rkl_rs::{
    Axis, BoundaryKind, BoundarySet, CellField, CellIndex, DiffusionHost, DiffusivityConfig,
    Direction, GeometryKind, Grid, GridField, ParabolicFlux, PhysicsConfig, RklConfig,
    RklIntegrator, SMALL_NUMBER, StateLayout, VectorDiffusion, accumulate_parabolic_rhs,
};

fn polar_line(lo: f64, hi: f64) -> Grid {
    Grid::new(
        GeometryKind::Polar,
        [
            Axis::uniform(lo, hi, 10, 2),
            Axis::single(0.0, 2.0 * std::f64::consts::PI),
            Axis::single(0.0, 1.0),
        ],
    )
    .unwrap()
}

fn spherical_plane() -> Grid {
    Grid::new(
        GeometryKind::Spherical,
        [
            Axis::logarithmic(0.5, 4.0, 8, 2),
            Axis::uniform(0.3, 2.8, 12, 2),
            Axis::single(0.0, 2.0 * std::f64::consts::PI),
        ],
    )
    .unwrap()
}

/// Deterministic face fluxes on interior faces, zero on the outer faces.
fn fill_interior_fluxes(grid: &Grid, dir: Direction, n_comp: usize, out: &mut ParabolicFlux) {
    let (beg, end) = (grid.beg(dir), grid.end(dir));
    let [nk, nj, ni] = grid.shape();
    for c in 0..n_comp {
        for k in 0..nk {
            for j in 0..nj {
                for i in 0..ni {
                    let cell = CellIndex::new(k, j, i);
                    let along = cell.along(dir);
                    if along > beg && along < end {
                        let value = ((i + 3 * j + 7 * c) as f64 * 0.37).sin() + 0.1 * c as f64;
                        out.flux.set(c, cell, value);
                    }
                }
            }
        }
    }
}

/// `sum(weight * dV * du[v])` over the active cells.
fn weighted_total(grid: &Grid, du: &GridField, v: usize, weight: impl Fn(CellIndex) -> f64) -> f64 {
    let mut total = 0.0;
    for k in grid.beg(Direction::X3)..grid.end(Direction::X3) {
        for j in grid.beg(Direction::X2)..grid.end(Direction::X2) {
            for i in grid.beg(Direction::X1)..grid.end(Direction::X1) {
                let cell = CellIndex::new(k, j, i);
                total += weight(cell) * grid.volume.get(cell) * du.get(v, cell);
            }
        }
    }
    total
}

fn accumulate(grid: &Grid, layout: &StateLayout, dir: Direction) -> GridField {
    let mut flux = ParabolicFlux::new(layout.n_components, grid.shape());
    fill_interior_fluxes(grid, dir, layout.n_components, &mut flux);
    let mut du = GridField::new(layout.n_var, grid.shape());
    let mut inv_dt = CellField::new(grid.shape());
    accumulate_parabolic_rhs(grid, layout, dir, 2, &mut flux, &mut du, &mut inv_dt).unwrap();
    assert!(inv_dt.data.iter().all(|&v| v == 0.0));
    du
}

#[test]
fn test_polar_angular_momentum_telescopes() {
    let grid = polar_line(0.5, 2.0);
    let layout = StateLayout::density_momentum(2);
    let du = accumulate(&grid, &layout, Direction::X1);

    // Plain divergence for the radial component.
    let radial = weighted_total(&grid, &du, 1, |_| 1.0);
    assert!(radial.abs() < 1e-11, "radial total {:e}", radial);

    // r-weighted for the azimuthal one.
    let angular = weighted_total(&grid, &du, 2, |cell| grid.axes[0].x[cell.i]);
    assert!(angular.abs() < 1e-11, "angular total {:e}", angular);

    // Without the weight the azimuthal component is not conserved.
    let unweighted = weighted_total(&grid, &du, 2, |_| 1.0);
    assert!(unweighted.abs() > 1e-6);

    // Density is untouched.
    assert!(du.component(0).iter().all(|&v| v == 0.0));
}

#[test]
fn test_spherical_polar_angle_telescopes() {
    let grid = spherical_plane();
    let layout = StateLayout::density_momentum(3);
    let du = accumulate(&grid, &layout, Direction::X2);

    for v in 1..3 {
        let total = weighted_total(&grid, &du, v, |_| 1.0);
        assert!(total.abs() < 1e-10, "component {} total {:e}", v, total);
    }
    let angular = weighted_total(&grid, &du, 3, |cell| grid.sin_x2[cell.j].abs());
    assert!(angular.abs() < 1e-10, "angular total {:e}", angular);
}

#[test]
fn test_spherical_radial_angular_momentum() {
    let grid = spherical_plane();
    let layout = StateLayout::density_momentum(3);
    let du = accumulate(&grid, &layout, Direction::X1);

    let angular = weighted_total(&grid, &du, 3, |cell| grid.axes[0].x[cell.i]);
    assert!(angular.abs() < 1e-10, "angular total {:e}", angular);
}

#[test]
fn test_axis_face_area_is_clamped() {
    let grid = polar_line(0.0, 1.0);
    let layout = StateLayout::density_momentum(2);
    let beg = grid.beg(Direction::X1);
    let at_axis = CellIndex::new(0, 0, beg);
    assert_eq!(grid.area[0].get(at_axis), 0.0);

    let mut flux = ParabolicFlux::new(2, grid.shape());
    flux.flux.set(0, at_axis, 1.0);
    flux.flux.set(1, at_axis, 1.0);
    let mut du = GridField::new(layout.n_var, grid.shape());
    let mut inv_dt = CellField::new(grid.shape());
    accumulate_parabolic_rhs(&grid, &layout, Direction::X1, 1, &mut flux, &mut du, &mut inv_dt)
        .unwrap();

    let expected = SMALL_NUMBER / grid.volume.get(at_axis);
    assert!((du.get(1, at_axis) - expected).abs() < 1e-12 * expected);
    // The azimuthal flux also carries the face radius, which is zero here.
    assert_eq!(du.get(2, at_axis), 0.0);
    assert!(du.data.iter().all(|v| v.is_finite()));
}

#[test]
fn test_spherical_cycle_keeps_uniform_rotation() {
    let grid = Arc::new(spherical_plane());
    let diffusion = VectorDiffusion::new(DiffusivityConfig::constant(0.05).build().unwrap());
    let mut host = DiffusionHost::new(
        Arc::clone(&grid),
        3,
        BoundarySet::uniform(BoundaryKind::Outflow),
        diffusion,
    )
    .unwrap();
    host.set_from_function(|_, _, _| (1.0, [0.0, 0.0, 0.3]));

    let mut rkl = RklIntegrator::new(Arc::clone(&grid), host.layout(), &RklConfig::default())
        .unwrap();
    let report = rkl.run_cycle(&mut host, 0.0, 0.2).unwrap();
    assert!(report.stages >= 2);

    for j in grid.beg(Direction::X2)..grid.end(Direction::X2) {
        for i in grid.beg(Direction::X1)..grid.end(Direction::X1) {
            let cell = CellIndex::new(0, j, i);
            assert!((host.velocity(2, cell) - 0.3).abs() < 1e-12);
            assert!(host.velocity(0, cell).abs() < 1e-12);
        }
    }
}
