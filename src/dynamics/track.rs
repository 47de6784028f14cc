use nalgebra::Vector2;

use crate::params::Params;

// ---------------------------------------------------------------------------
// Scene geometry: body square and goal marker resting on the track surface
// ---------------------------------------------------------------------------

/// Axis-aligned box in scene coordinates (x along the track, y up).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vector2<f64>,
    pub size: Vector2<f64>,
}

impl Aabb {
    pub fn new(min: Vector2<f64>, size: Vector2<f64>) -> Self {
        Self { min, size }
    }

    pub fn max(&self) -> Vector2<f64> {
        self.min + self.size
    }

    /// Closed-interval overlap on both axes, so touching edges count.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        a_max.x >= other.min.x
            && self.min.x <= b_max.x
            && a_max.y >= other.min.y
            && self.min.y <= b_max.y
    }
}

/// Square occupied by the body when its trailing edge is at `position`.
pub fn body_box(params: &Params, position: f64) -> Aabb {
    let size = params.body.size;
    Aabb::new(
        Vector2::new(position, params.track.surface),
        Vector2::new(size, size),
    )
}

/// Goal marker; its near edge sits at [`Params::goal_position`].
pub fn goal_box(params: &Params) -> Aabb {
    Aabb::new(
        Vector2::new(params.goal_position(), params.track.surface),
        Vector2::new(params.goal.width, params.goal.height),
    )
}

/// True when the body's leading edge has reached the goal marker and the
/// two boxes still overlap.
pub fn reached_goal(params: &Params, position: f64) -> bool {
    body_box(params, position).overlaps(&goal_box(params))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_edge_boundary() {
        let p = Params::default();
        // near edge 450, body size 20
        assert!(!reached_goal(&p, 429.999));
        assert!(reached_goal(&p, 430.0));
        assert!(reached_goal(&p, 440.0));
    }

    #[test]
    fn passing_beyond_the_marker_leaves_it() {
        let p = Params::default();
        assert!(reached_goal(&p, 455.0));
        assert!(!reached_goal(&p, 455.5));
    }

    #[test]
    fn start_position_is_not_at_goal() {
        assert!(!reached_goal(&Params::default(), 0.0));
    }

    #[test]
    fn box_extents() {
        let b = body_box(&Params::default(), 10.0);
        assert_eq!(b.max(), Vector2::new(30.0, 120.0));
    }
}
