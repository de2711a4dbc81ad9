//! Axis-aligned collision detection and contact classification
//!
//! Overlap is strict on every edge, so boxes that merely touch (the actor
//! standing exactly on a platform top) do not collide.

use glam::Vec2;

use super::state::Obstacle;
use crate::consts::{PLAYER_HEIGHT, PLAYER_WIDTH};

/// Axis-aligned bounding box anchored at its bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// The actor's box with its bottom-left corner at `pos`
    pub fn actor(pos: Vec2) -> Self {
        Self::new(pos, Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT))
    }

    pub fn of(obstacle: &Obstacle) -> Self {
        Self::new(obstacle.pos, obstacle.size)
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }
}

/// Side of a platform the actor ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactSide {
    /// Landed on the top face
    Top,
    /// Bumped the bottom face while rising
    Bottom,
    /// Ran into the left face moving right
    Left,
    /// Ran into the right face moving left
    Right,
}

/// Classify a contact from the actor's pre-move box and current velocity
///
/// Rules are tried in a fixed order and the first match wins. Returns `None`
/// when the actor already overlapped the platform before moving; such
/// contacts are left unresolved.
pub fn contact_side(prev: &Aabb, platform: &Aabb, vel: Vec2) -> Option<ContactSide> {
    let (prev_max, plat_max) = (prev.max(), platform.max());

    if prev.min.y >= plat_max.y && vel.y < 0.0 {
        Some(ContactSide::Top)
    } else if prev_max.y <= platform.min.y && vel.y > 0.0 {
        Some(ContactSide::Bottom)
    } else if prev_max.x <= platform.min.x && vel.x > 0.0 {
        Some(ContactSide::Left)
    } else if prev.min.x >= plat_max.x && vel.x < 0.0 {
        Some(ContactSide::Right)
    } else {
        None
    }
}

/// Snap the tentative position and velocity against one platform face
///
/// Returns true if the actor landed on top.
pub fn resolve_contact(side: ContactSide, platform: &Aabb, pos: &mut Vec2, vel: &mut Vec2) -> bool {
    match side {
        ContactSide::Top => {
            pos.y = platform.max().y;
            vel.y = 0.0;
            true
        }
        ContactSide::Bottom => {
            pos.y = platform.min.y - PLAYER_HEIGHT;
            vel.y = 0.0;
            false
        }
        ContactSide::Left => {
            pos.x = platform.min.x - PLAYER_WIDTH;
            vel.x = 0.0;
            false
        }
        ContactSide::Right => {
            pos.x = platform.max().x;
            vel.x = 0.0;
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn platform() -> Aabb {
        Aabb::new(Vec2::new(100.0, 0.0), Vec2::new(100.0, 30.0))
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let standing = Aabb::actor(Vec2::new(120.0, 30.0));
        assert!(!standing.overlaps(&platform()));

        let beside = Aabb::actor(Vec2::new(76.0, 0.0));
        assert!(!beside.overlaps(&platform()));

        let sunk = Aabb::actor(Vec2::new(120.0, 29.5));
        assert!(sunk.overlaps(&platform()));
    }

    #[test]
    fn test_top_beats_side() {
        // Previously above and to the left: falling wins over moving right
        let prev = Aabb::actor(Vec2::new(70.0, 35.0));
        let side = contact_side(&prev, &platform(), Vec2::new(4.0, -6.0));
        assert_eq!(side, Some(ContactSide::Top));
    }

    #[test]
    fn test_bottom_contact() {
        let prev = Aabb::actor(Vec2::new(120.0, -30.0));
        let side = contact_side(&prev, &platform(), Vec2::new(0.0, 8.0));
        assert_eq!(side, Some(ContactSide::Bottom));
    }

    #[test]
    fn test_side_contacts() {
        let from_left = Aabb::actor(Vec2::new(70.0, 5.0));
        assert_eq!(
            contact_side(&from_left, &platform(), Vec2::new(4.0, -0.5)),
            Some(ContactSide::Left)
        );

        let from_right = Aabb::actor(Vec2::new(205.0, 5.0));
        assert_eq!(
            contact_side(&from_right, &platform(), Vec2::new(-4.0, -0.5)),
            Some(ContactSide::Right)
        );
    }

    #[test]
    fn test_preexisting_overlap_is_unclassified() {
        let inside = Aabb::actor(Vec2::new(120.0, 10.0));
        assert_eq!(contact_side(&inside, &platform(), Vec2::new(4.0, -0.5)), None);
    }

    #[test]
    fn test_resolve_snaps_to_face() {
        let plat = platform();
        let mut pos = Vec2::new(120.0, 25.0);
        let mut vel = Vec2::new(0.0, -5.0);
        assert!(resolve_contact(ContactSide::Top, &plat, &mut pos, &mut vel));
        assert_eq!(pos, Vec2::new(120.0, 30.0));
        assert_eq!(vel, Vec2::ZERO);

        let mut pos = Vec2::new(80.0, 5.0);
        let mut vel = Vec2::new(4.0, -0.5);
        assert!(!resolve_contact(ContactSide::Left, &plat, &mut pos, &mut vel));
        assert_eq!(pos.x, 76.0);
        assert_eq!(vel.x, 0.0);
    }
}
