// Two-force placement of the 13 processes.
//
// Flow pulls coupled processes together, a short-range push keeps every pair
// at least `min_separation` apart. There is no convergence check: the loop
// always runs `iterations` steps with a geometrically decaying learning rate.
//
// - Attraction on `i` toward `j`: `f * min(d / attraction_range, 1)` where
//   `f` is the normalized flow summed over both directions.
// - Repulsion for `d < min_separation`: `(min_separation - d) / min_separation`
//   applied to both nodes in opposite directions.
// - Coincident nodes have no defined direction and exert no force on each other.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace, warn};

use super::LayoutConfig;
use crate::model::{FlowMatrix, PROCESS_COUNT, PointF, ProcessId};

pub type Positions = [PointF; PROCESS_COUNT];

/// Seeded uniform scatter in `[-scatter, scatter)`, `x` then `y` per process
/// in alphabet order.
pub fn random_scatter(cfg: &LayoutConfig) -> Positions {
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let s = cfg.scatter;
    let mut positions = [PointF::default(); PROCESS_COUNT];
    for pos in positions.iter_mut() {
        let x = rng.random_range(-s..s);
        let y = rng.random_range(-s..s);
        *pos = PointF::new(x, y);
    }
    positions
}

/// Scatter the processes from `cfg.seed` and run the force loop.
pub fn place_processes(flow: &FlowMatrix, cfg: &LayoutConfig) -> Positions {
    let initial = random_scatter(cfg);
    place_from_initial(flow, initial, cfg)
}

/// Run the force loop from caller-provided positions.
pub fn place_from_initial(flow: &FlowMatrix, initial: Positions, cfg: &LayoutConfig) -> Positions {
    let normalized = flow.normalized();
    let mut positions = initial;
    let mut learning_rate = cfg.initial_learning_rate;
    let mut coincident = 0usize;

    debug!(
        max_flow = flow.max(),
        iterations = cfg.iterations,
        learning_rate,
        "starting force placement"
    );

    for iteration in 0..cfg.iterations {
        let mut forces = [PointF::default(); PROCESS_COUNT];
        coincident += accumulate_attraction(&normalized, &positions, cfg, &mut forces);
        coincident += accumulate_repulsion(&positions, cfg, &mut forces);

        let mut peak = 0.0_f64;
        for (pos, force) in positions.iter_mut().zip(forces.iter()) {
            pos.x += force.x * learning_rate;
            pos.y += force.y * learning_rate;
            peak = peak.max(force.x.hypot(force.y));
        }
        trace!(iteration, learning_rate, peak_force = peak, "force step");

        learning_rate *= cfg.learning_rate_decay;
    }

    if coincident > 0 {
        warn!(skipped = coincident, "skipped force terms between coincident processes");
    }
    positions
}

/// Unit vector from `a` to `b` and the distance, `None` when they coincide.
fn direction(a: PointF, b: PointF) -> Option<(f64, f64, f64)> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let d = dx.hypot(dy);
    if d == 0.0 {
        None
    } else {
        Some((dx / d, dy / d, d))
    }
}

/// Returns the number of skipped coincident pairs.
fn accumulate_attraction(
    normalized: &FlowMatrix,
    positions: &Positions,
    cfg: &LayoutConfig,
    forces: &mut Positions,
) -> usize {
    let mut skipped = 0;
    for i in ProcessId::ALL {
        for j in ProcessId::ALL {
            if i == j {
                continue;
            }
            let f = normalized.adjacency(i, j);
            if f <= 0.0 {
                continue;
            }
            let Some((ux, uy, d)) = direction(positions[i.index()], positions[j.index()]) else {
                skipped += 1;
                continue;
            };
            let magnitude = f * (d / cfg.attraction_range).min(1.0);
            forces[i.index()].x += magnitude * ux;
            forces[i.index()].y += magnitude * uy;
        }
    }
    skipped
}

fn accumulate_repulsion(positions: &Positions, cfg: &LayoutConfig, forces: &mut Positions) -> usize {
    let sep = cfg.min_separation;
    let mut skipped = 0;
    for i in 0..PROCESS_COUNT {
        for j in (i + 1)..PROCESS_COUNT {
            let Some((ux, uy, d)) = direction(positions[i], positions[j]) else {
                skipped += 1;
                continue;
            };
            if d >= sep {
                continue;
            }
            let magnitude = (sep - d) / sep;
            forces[i].x -= magnitude * ux;
            forces[i].y -= magnitude * uy;
            forces[j].x += magnitude * ux;
            forces[j].y += magnitude * uy;
        }
    }
    skipped
}
