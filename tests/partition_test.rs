//! Decomposed domains agree on the parabolic timestep.
//!
//! The X1 axis is split into slices, each run on its own thread with a
//! [`ThreadCommunicator`]. The diffusivity varies in space, so each slice
//! sees a different local bound; after the global reduction every slice must
//! use exactly the timestep and stage count of the undecomposed run.

use std::sync::Arc;
use std::thread;

use rkl_rs::{
    Axis, BoundaryKind, BoundarySet, CycleReport, DiffusionHost, DiffusivityConfig,
    DiffusivityContext, GeometryKind, GlobalReduce, Grid, PhysicsConfig, RklConfig,
    RklIntegrator, ThreadGroup, VectorDiffusion,
};

const N_GLOBAL: usize = 64;
const N_PARTS: usize = 4;

fn eta(ctx: &DiffusivityContext) -> f64 {
    let x = ctx.x[0];
    0.2 + (-(x - 0.7).powi(2) / 0.01).exp()
}

fn host(axis: Axis) -> DiffusionHost {
    let grid = Arc::new(
        Grid::new(
            GeometryKind::Cartesian,
            [axis, Axis::single(0.0, 1.0), Axis::single(0.0, 1.0)],
        )
        .unwrap(),
    );
    let status = DiffusivityConfig::user_defined().enroll(eta).build().unwrap();
    let mut host = DiffusionHost::new(
        grid,
        1,
        BoundarySet::uniform(BoundaryKind::Outflow),
        VectorDiffusion::new(status),
    )
    .unwrap();
    host.set_from_function(|x, _, _| (1.0, [x * (1.0 - x), 0.0, 0.0]));
    host
}

fn config() -> RklConfig {
    RklConfig::default().with_cfl(0.4)
}

#[test]
fn test_partitions_share_timestep() {
    let mut whole = host(Axis::uniform(0.0, 1.0, N_GLOBAL, 2));
    let mut rkl = RklIntegrator::new(whole.grid().clone(), whole.layout(), &config()).unwrap();
    let reference = rkl.run_cycle(&mut whole, 0.0, 0.05).unwrap();

    let n_local = N_GLOBAL / N_PARTS;
    let handles: Vec<_> = ThreadGroup::new(N_PARTS)
        .into_iter()
        .map(|comm| {
            thread::spawn(move || -> CycleReport {
                let offset = comm.rank() * n_local;
                let mut part = host(Axis::uniform_slice(0.0, 1.0, N_GLOBAL, 2, offset, n_local));
                let mut rkl = RklIntegrator::with_communicator(
                    part.grid().clone(),
                    part.layout(),
                    &config(),
                    comm,
                )
                .unwrap();
                rkl.run_cycle(&mut part, 0.0, 0.05).unwrap()
            })
        })
        .collect();

    for handle in handles {
        let report = handle.join().unwrap();
        assert_eq!(report.dt_parabolic, reference.dt_parabolic);
        assert_eq!(report.stages, reference.stages);
        assert_eq!(report.ratio, reference.ratio);
    }
}

#[test]
fn test_local_bounds_differ() {
    // Only the slice containing the diffusivity peak sets the global bound.
    let n_local = N_GLOBAL / N_PARTS;
    let bounds: Vec<f64> = (0..N_PARTS)
        .map(|rank| {
            let mut part =
                host(Axis::uniform_slice(0.0, 1.0, N_GLOBAL, 2, rank * n_local, n_local));
            let mut rkl =
                RklIntegrator::new(part.grid().clone(), part.layout(), &config()).unwrap();
            rkl.run_cycle(&mut part, 0.0, 0.05).unwrap().dt_parabolic
        })
        .collect();

    let smallest = bounds.iter().copied().fold(f64::INFINITY, f64::min);
    assert!(bounds.iter().any(|&dt| dt > 2.0 * smallest), "{:?}", bounds);
}
