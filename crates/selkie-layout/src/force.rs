//! Force-directed layout for general graphs (no usable root).
//!
//! Classic spring/repulsion simulation with linear cooling and early-exit
//! convergence detection. State lives in a flat arena indexed by the model's
//! stable node index; forces are recomputed from scratch every iteration so
//! nothing persists between runs.

use crate::geom::{self, Point, Vector};
use crate::model::{Bounds, ForceLayout, Position, PositionMap};
use crate::{Result, validate_extent};
use selkie_core::GraphModel;
use std::f64::consts::TAU;

/// Distance floor for force arithmetic; coincident nodes are treated as
/// this far apart along a deterministic per-node direction.
const MIN_FORCE_DISTANCE: f64 = 0.01;

#[derive(Debug, Clone)]
pub struct ForceOptions {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    /// Repulsion is active below `2 * min_distance`; beyond that pairs exert
    /// no force on each other, which bounds cost and stops runaway spread.
    pub min_distance: f64,
    /// Ideal edge length as a multiple of `min_distance`.
    pub ideal_distance_factor: f64,
    /// Inverse-square repulsion scale. Tuned against `min_distance`; retune
    /// both together (the default is `2 * min_distance^2`).
    pub repulsion_strength: f64,
    pub spring_strength: f64,
    /// Step scale applied to net forces (before cooling).
    pub base_step: f64,
    /// Per-axis cap on how far a node moves in one iteration.
    pub max_displacement: f64,
    /// Cooling decreases linearly from 1 to this floor over the budget.
    pub cooling_floor: f64,
    pub iterations: usize,
    /// Convergence is not checked before this many iterations have run.
    pub min_iterations: usize,
    /// Early exit once the iteration-to-iteration change in maximum force
    /// magnitude falls below this.
    pub convergence_threshold: f64,
}

impl Default for ForceOptions {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            padding: 50.0,
            min_distance: 80.0,
            ideal_distance_factor: 1.5,
            repulsion_strength: 12_800.0,
            spring_strength: 0.1,
            base_step: 4.0,
            max_displacement: 40.0,
            cooling_floor: 0.1,
            iterations: 300,
            min_iterations: 30,
            convergence_threshold: 0.05,
        }
    }
}

struct SimNode {
    pos: Point,
    force: Vector,
}

pub fn layout_force(model: &GraphModel, opts: &ForceOptions) -> Result<ForceLayout> {
    validate_extent(opts.width, opts.height, opts.padding)?;

    let n = model.len();
    if n == 0 {
        return Ok(ForceLayout {
            positions: PositionMap::new(),
            bounds: None,
            converged: true,
            iterations: 0,
        });
    }

    let center = geom::point(opts.width / 2.0, opts.height / 2.0);
    let seed_radius = (opts.width.min(opts.height) / 4.0).max(1.0);

    // Deterministic seed: evenly spaced around a circle, in model order.
    let mut nodes: Vec<SimNode> = (0..n)
        .map(|i| {
            let pos = if n == 1 {
                center
            } else {
                let angle = TAU * i as f64 / n as f64;
                center + geom::vector(angle.cos(), angle.sin()) * seed_radius
            };
            SimNode {
                pos,
                force: Vector::zero(),
            }
        })
        .collect();

    // Edges as arena index pairs; self-edges carry no spring.
    let edges: Vec<(usize, usize)> = model
        .edges()
        .iter()
        .filter_map(|e| {
            let a = model.node_index(&e.source)?;
            let b = model.node_index(&e.target)?;
            (a != b).then_some((a, b))
        })
        .collect();

    let repulsion_range = 2.0 * opts.min_distance;
    let ideal = opts.min_distance * opts.ideal_distance_factor;
    let budget = opts.iterations.max(1);

    let mut converged = false;
    let mut performed = 0usize;
    let mut prev_max_force = f64::INFINITY;

    for iter in 0..budget {
        performed = iter + 1;
        let cooling = 1.0 - (1.0 - opts.cooling_floor) * (iter as f64 / (budget - 1).max(1) as f64);

        for node in &mut nodes {
            node.force = Vector::zero();
        }

        // Repulsion, nearby unordered pairs only.
        for i in 0..n {
            for j in (i + 1)..n {
                let delta = nodes[i].pos - nodes[j].pos;
                let dist = delta.length();
                if dist >= repulsion_range {
                    continue;
                }
                let (dir, dist) = separation(delta, dist, i);
                let magnitude = opts.repulsion_strength / (dist * dist);
                nodes[i].force += dir * magnitude;
                nodes[j].force -= dir * magnitude;
            }
        }

        // Spring attraction along edges.
        for &(a, b) in &edges {
            let delta = nodes[b].pos - nodes[a].pos;
            let dist = delta.length();
            let (dir, dist) = separation(delta, dist, a);
            let magnitude = opts.spring_strength * (dist - ideal);
            nodes[a].force += dir * magnitude;
            nodes[b].force -= dir * magnitude;
        }

        let step = opts.base_step * cooling;
        let mut max_force = 0.0f64;
        for node in &mut nodes {
            max_force = max_force.max(node.force.length());
            let dx = (node.force.x * step).clamp(-opts.max_displacement, opts.max_displacement);
            let dy = (node.force.y * step).clamp(-opts.max_displacement, opts.max_displacement);
            node.pos.x = (node.pos.x + dx).clamp(opts.padding, opts.width - opts.padding);
            node.pos.y = (node.pos.y + dy).clamp(opts.padding, opts.height - opts.padding);
        }

        if performed >= opts.min_iterations
            && (prev_max_force - max_force).abs() < opts.convergence_threshold
        {
            converged = true;
            break;
        }
        prev_max_force = max_force;
    }

    if !converged {
        tracing::debug!(
            iterations = performed,
            "force layout exhausted its iteration budget without converging"
        );
    }

    let mut positions: PositionMap = PositionMap::with_capacity(n);
    for (i, node) in model.nodes().iter().enumerate() {
        let p = nodes[i].pos;
        positions.insert(node.id.clone(), Position { x: p.x, y: p.y });
    }
    let bounds = Bounds::from_positions(positions.values());

    Ok(ForceLayout {
        positions,
        bounds,
        converged,
        iterations: performed,
    })
}

/// Unit direction and effective distance for a pair, with a deterministic
/// fallback direction for coincident nodes.
fn separation(delta: Vector, dist: f64, index: usize) -> (Vector, f64) {
    if dist > MIN_FORCE_DISTANCE {
        (delta / dist, dist)
    } else {
        let angle = TAU * (index as f64 + 0.5) / 7.0;
        (geom::vector(angle.cos(), angle.sin()), MIN_FORCE_DISTANCE)
    }
}
