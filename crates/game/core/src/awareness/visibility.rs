//! Viewport visibility predicate.

use crate::state::Location;

/// Tiles visible to the left of the observer on the same floor.
pub const VIEW_LEFT: i32 = 8;
/// Tiles visible to the right of the observer on the same floor.
pub const VIEW_RIGHT: i32 = 9;
/// Tiles visible above the observer on the same floor.
pub const VIEW_TOP: i32 = 6;
/// Tiles visible below the observer on the same floor.
pub const VIEW_BOTTOM: i32 = 7;
/// Floors visible above and below an underground observer.
pub const UNDERGROUND_FLOOR_SPREAD: i32 = 2;

/// Returns true if a creature standing at `observer` can see `target`.
///
/// Surface observers never see below ground level; underground observers see
/// only floors within [`UNDERGROUND_FLOOR_SPREAD`]. The horizontal window is
/// asymmetric and shifts diagonally by the floor difference, so floors above
/// the observer appear offset towards the bottom-right.
pub fn can_see(observer: Location, target: Location) -> bool {
    let observer_z = i32::from(observer.z);
    let target_z = i32::from(target.z);

    if observer.is_surface() {
        if !target.is_surface() {
            return false;
        }
    } else if (observer_z - target_z).abs() > UNDERGROUND_FLOOR_SPREAD {
        return false;
    }

    let offset_z = observer_z - target_z;
    let (observer_x, observer_y) = (i32::from(observer.x), i32::from(observer.y));
    let (target_x, target_y) = (i32::from(target.x), i32::from(target.y));

    target_x >= observer_x - VIEW_LEFT + offset_z
        && target_x <= observer_x + VIEW_RIGHT + offset_z
        && target_y >= observer_y - VIEW_TOP + offset_z
        && target_y <= observer_y + VIEW_BOTTOM + offset_z
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: u16, y: u16, z: u8) -> Location {
        Location::new(x, y, z)
    }

    #[test]
    fn surface_observer_never_sees_underground() {
        assert!(!can_see(at(100, 100, 5), at(100, 100, 9)));
        assert!(!can_see(at(100, 100, 7), at(100, 100, 8)));
    }

    #[test]
    fn underground_observer_sees_two_floors_each_way() {
        assert!(!can_see(at(100, 100, 10), at(100, 100, 13)));
        assert!(can_see(at(100, 100, 10), at(100, 100, 12)));
        assert!(can_see(at(100, 100, 10), at(100, 100, 8)));
    }

    #[test]
    fn same_tile_is_visible() {
        assert!(can_see(at(100, 100, 7), at(100, 100, 7)));
    }

    #[test]
    fn horizontal_bounds_are_asymmetric() {
        let observer = at(100, 100, 7);

        assert!(can_see(observer, at(109, 100, 7)));
        assert!(!can_see(observer, at(110, 100, 7)));
        assert!(can_see(observer, at(92, 100, 7)));
        assert!(!can_see(observer, at(91, 100, 7)));
    }

    #[test]
    fn vertical_bounds_are_asymmetric() {
        let observer = at(100, 100, 7);

        assert!(can_see(observer, at(100, 107, 7)));
        assert!(!can_see(observer, at(100, 108, 7)));
        assert!(can_see(observer, at(100, 94, 7)));
        assert!(!can_see(observer, at(100, 93, 7)));
    }

    #[test]
    fn floor_difference_shifts_the_window() {
        // One floor up: offset is +1, the window moves one tile right and down.
        let observer = at(100, 100, 7);

        assert!(can_see(observer, at(110, 108, 6)));
        assert!(!can_see(observer, at(92, 100, 6)));
        assert!(can_see(observer, at(93, 95, 6)));
    }

    #[test]
    fn window_near_map_origin_does_not_underflow() {
        assert!(can_see(at(0, 0, 7), at(0, 0, 7)));
        assert!(can_see(at(3, 2, 9), at(0, 0, 10)));
    }
}
