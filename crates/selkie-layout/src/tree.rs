//! Hierarchical band layout: nodes in horizontal bands by depth, parents
//! centered over their children.

use crate::model::{Bounds, Position, PositionMap, TreeLayout};
use crate::{Result, validate_extent};
use selkie_core::Hierarchy;

/// A lone root sits left-anchored rather than dead center, so a one-node
/// diagram reads as the start of something rather than a lost dot.
const LONE_ROOT_INSET_X: f64 = 50.0;

#[derive(Debug, Clone)]
pub struct TreeOptions {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    /// Target vertical distance between depth bands. Clamped down when the
    /// deepest band would otherwise leave the canvas.
    pub level_spacing: f64,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            padding: 50.0,
            level_spacing: 120.0,
        }
    }
}

pub fn layout_tree(hierarchy: &Hierarchy, opts: &TreeOptions) -> Result<TreeLayout> {
    validate_extent(opts.width, opts.height, opts.padding)?;

    let mut positions: PositionMap = PositionMap::with_capacity(hierarchy.len());

    if hierarchy.len() == 1 {
        positions.insert(
            hierarchy.root().to_string(),
            Position {
                x: opts.padding + LONE_ROOT_INSET_X,
                y: opts.height / 2.0,
            },
        );
        let bounds = Bounds::from_positions(positions.values());
        return Ok(TreeLayout { positions, bounds });
    }

    let max_depth = hierarchy.max_depth() as usize;
    let mut levels: Vec<Vec<&str>> = vec![Vec::new(); max_depth + 1];
    for (id, entry) in hierarchy.iter() {
        levels[entry.depth as usize].push(id);
    }

    let available = opts.width - 2.0 * opts.padding;
    let mut level_spacing = opts.level_spacing;
    if max_depth > 0 {
        level_spacing = level_spacing.min((opts.height - 2.0 * opts.padding) / max_depth as f64);
    }

    for (depth, ids) in levels.iter().enumerate() {
        let spacing = available / (ids.len() + 1) as f64;
        let y = opts.padding + depth as f64 * level_spacing;
        for (i, id) in ids.iter().enumerate() {
            positions.insert(
                (*id).to_string(),
                Position {
                    x: opts.padding + (i + 1) as f64 * spacing,
                    y,
                },
            );
        }
    }

    // Centering pass, deepest parents first: every parent ends up over the
    // centroid of its direct children, and because children are already
    // final when their parent moves, the property holds for all parents at
    // once.
    for depth in (0..max_depth).rev() {
        for id in &levels[depth] {
            let children = hierarchy.children(id);
            if children.is_empty() {
                continue;
            }
            let mut sum = 0.0;
            let mut count = 0.0;
            for child in children {
                if let Some(p) = positions.get(child.as_str()) {
                    sum += p.x;
                    count += 1.0;
                }
            }
            if count > 0.0 {
                if let Some(p) = positions.get_mut(*id) {
                    p.x = sum / count;
                }
            }
        }
    }

    let bounds = Bounds::from_positions(positions.values());
    Ok(TreeLayout { positions, bounds })
}
