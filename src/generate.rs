use rand::Rng;

use crate::cost_matrix::Node;

/// Box of half-width `spread` degrees around a centre point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Area {
    pub center_lat: f64,
    pub center_lng: f64,
    pub spread: f64,
}

impl Default for Area {
    // Central London, roughly 10km across.
    fn default() -> Self {
        Self {
            center_lat: 51.505,
            center_lng: -0.09,
            spread: 0.05,
        }
    }
}

/// `count` nodes with ids `{prefix}1..={prefix}{count}`, uniform inside `area`.
pub fn generate_nodes<R: Rng + ?Sized>(prefix: &str, count: usize, area: &Area, rng: &mut R) -> Vec<Node> {
    (1..=count)
        .map(|k| {
            let lat = area.center_lat + rng.gen_range(-1.0f64..=1.0) * area.spread;
            let lng = area.center_lng + rng.gen_range(-1.0f64..=1.0) * area.spread;
            Node::new(format!("{}{}", prefix, k), lat, lng)
        })
        .collect()
}
