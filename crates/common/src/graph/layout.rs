//! Static radial layout
//!
//! The most important node sits at the canvas center; the rest fill concentric
//! rings in importance order, a fixed number per ring, with a little random
//! jitter so that rings do not look mechanical.

use super::{importance_order, Node};
use crate::config::LayoutConfig;
use rand::Rng;
use std::f64::consts::PI;

const IMPORTANCE_DOMAIN: (f64, f64) = (10.0, 100.0);
const RADIUS_RANGE: (f64, f64) = (4.0, 12.0);

/// Drawing surface the layout is computed for
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Canvas {
    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}

/// Ring geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialLayout {
    pub ring_spacing: f64,
    pub nodes_per_ring: usize,
    pub jitter: f64,
}

impl From<&LayoutConfig> for RadialLayout {
    fn from(config: &LayoutConfig) -> Self {
        Self {
            ring_spacing: config.ring_spacing,
            nodes_per_ring: config.nodes_per_ring.max(1),
            jitter: config.jitter,
        }
    }
}

impl Default for RadialLayout {
    fn default() -> Self {
        Self::from(&LayoutConfig::default())
    }
}

impl RadialLayout {
    /// Ring number and angle of the `slot`-th node after the center one
    fn ring_position(&self, slot: usize) -> (usize, f64) {
        let per_ring = self.nodes_per_ring.max(1);
        let ring = slot / per_ring + 1;
        let angle = 2.0 * PI * (slot % per_ring) as f64 / per_ring as f64;
        (ring, angle)
    }

    fn jitter<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.jitter > 0.0 {
            (rng.gen::<f64>() - 0.5) * self.jitter
        } else {
            0.0
        }
    }
}

/// Linear importance-to-radius scale. Values outside [10, 100] extrapolate.
pub fn node_radius(importance: f64) -> f64 {
    let (d0, d1) = IMPORTANCE_DOMAIN;
    let (r0, r1) = RADIUS_RANGE;
    r0 + (importance - d0) * (r1 - r0) / (d1 - d0)
}

/// Assign `x`, `y` and `radius` to every node. Node order is left unchanged.
pub fn assign_layout<R: Rng + ?Sized>(
    nodes: &mut [Node],
    canvas: Canvas,
    layout: &RadialLayout,
    rng: &mut R,
) {
    let (cx, cy) = canvas.center();

    for (position, index) in importance_order(nodes).into_iter().enumerate() {
        let node = &mut nodes[index];
        node.radius = node_radius(node.importance);

        if position == 0 {
            node.x = cx;
            node.y = cy;
            continue;
        }

        let (ring, angle) = layout.ring_position(position - 1);
        let distance = ring as f64 * layout.ring_spacing;
        node.x = cx + distance * angle.cos() + layout.jitter(rng);
        node.y = cy + distance * angle.sin() + layout.jitter(rng);
    }
}
