//! Radial mind-map layout: recursive angular-sector allocation around a
//! fixed root, with local collision push-away.
//!
//! Collisions are minimized, not eliminated: each candidate gets a bounded
//! number of push-away retries and is then accepted as-is, which keeps the
//! worst case linear in the retry budget instead of looping on pathological
//! input.

use crate::geom::{self, Point, Vector};
use crate::model::{Bounds, Position, PositionMap, RadialLayout};
use crate::{Error, Result};
use selkie_core::Hierarchy;
use std::f64::consts::TAU;

/// Trees up to this size use `level_unit_distance` verbatim; larger trees
/// grow the ring spacing so they spread out automatically.
const SMALL_TREE_NODES: usize = 20;
const GROWTH_PER_NODE: f64 = 0.01;
const MAX_GROWTH: f64 = 2.0;

#[derive(Debug, Clone)]
pub struct RadialOptions {
    pub center_x: f64,
    pub center_y: f64,
    /// Ring spacing per depth level (before the large-tree growth factor).
    pub level_unit_distance: f64,
    /// Logical node footprint used for collision checks.
    pub node_radius: f64,
    pub collision_padding: f64,
    /// Floor for a child's angular slice, in radians. Dense subtrees widen
    /// to this and may overlap the neighboring sector.
    pub min_sector: f64,
    pub max_collision_retries: usize,
}

impl Default for RadialOptions {
    fn default() -> Self {
        Self {
            center_x: 600.0,
            center_y: 400.0,
            level_unit_distance: 140.0,
            node_radius: 30.0,
            collision_padding: 10.0,
            min_sector: 0.35,
            max_collision_retries: 10,
        }
    }
}

pub fn layout_radial(hierarchy: &Hierarchy, opts: &RadialOptions) -> Result<RadialLayout> {
    let usable = opts.center_x.is_finite()
        && opts.center_y.is_finite()
        && opts.level_unit_distance.is_finite()
        && opts.level_unit_distance > 0.0
        && opts.node_radius.is_finite()
        && opts.node_radius >= 0.0
        && opts.min_sector > 0.0
        && opts.min_sector <= TAU;
    if !usable {
        return Err(Error::InvalidOptions {
            message: "radial options must have a finite center, a positive ring distance and a sector floor in (0, tau]".to_string(),
        });
    }

    let unit = level_unit(opts.level_unit_distance, hierarchy.len());
    let center = geom::point(opts.center_x, opts.center_y);

    let mut positions: PositionMap = PositionMap::with_capacity(hierarchy.len());
    positions.insert(
        hierarchy.root().to_string(),
        Position {
            x: center.x,
            y: center.y,
        },
    );
    let mut placed: Vec<Point> = vec![center];

    place_subtree(
        hierarchy,
        hierarchy.root(),
        0.0,
        TAU,
        1,
        unit,
        center,
        opts,
        &mut positions,
        &mut placed,
    );

    let bounds = Bounds::from_positions(positions.values());
    Ok(RadialLayout { positions, bounds })
}

fn level_unit(base: f64, total_nodes: usize) -> f64 {
    let growth = 1.0 + total_nodes.saturating_sub(SMALL_TREE_NODES) as f64 * GROWTH_PER_NODE;
    base * growth.min(MAX_GROWTH)
}

#[allow(clippy::too_many_arguments)]
fn place_subtree(
    hierarchy: &Hierarchy,
    parent: &str,
    sector_start: f64,
    sector_width: f64,
    depth: u32,
    unit: f64,
    center: Point,
    opts: &RadialOptions,
    positions: &mut PositionMap,
    placed: &mut Vec<Point>,
) {
    let children = hierarchy.children(parent);
    if children.is_empty() {
        return;
    }

    let nominal = sector_width / children.len() as f64;
    let slice = nominal.max(opts.min_sector);
    // Keep the (possibly widened) fan centered on the parent's sector.
    let fan = slice * children.len() as f64;
    let start = sector_start + sector_width / 2.0 - fan / 2.0;
    let radius = unit * depth as f64;

    for (i, child) in children.iter().enumerate() {
        let angle = start + slice * (i as f64 + 0.5);
        let candidate = center + geom::vector(angle.cos(), angle.sin()) * radius;
        let resolved = resolve_collisions(candidate, angle, placed, opts);
        positions.insert(
            child.clone(),
            Position {
                x: resolved.x,
                y: resolved.y,
            },
        );
        placed.push(resolved);

        place_subtree(
            hierarchy,
            child,
            angle - slice / 2.0,
            slice,
            depth + 1,
            unit,
            center,
            opts,
            positions,
            placed,
        );
    }
}

/// Pushes the candidate directly away from its closest collider by the
/// shortfall distance, re-checking up to the retry budget. Each push lands
/// exactly at clearance from the targeted collider, so separation from it
/// strictly increases per retry.
fn resolve_collisions(
    mut pos: Point,
    angle: f64,
    placed: &[Point],
    opts: &RadialOptions,
) -> Point {
    let clearance = 2.0 * (opts.node_radius + opts.collision_padding);

    for _ in 0..opts.max_collision_retries {
        let mut nearest: Option<(Point, f64)> = None;
        for other in placed {
            let d = (pos - *other).length();
            if d < clearance {
                let closer = nearest.map(|(_, best)| d < best).unwrap_or(true);
                if closer {
                    nearest = Some((*other, d));
                }
            }
        }
        let Some((other, dist)) = nearest else {
            break;
        };

        let away: Vector = if dist > f64::EPSILON {
            (pos - other) / dist
        } else {
            // Coincident points have no direction; fall back to the
            // candidate's own ray from the parent sector.
            geom::vector(angle.cos(), angle.sin())
        };
        pos += away * (clearance - dist);
    }

    pos
}
