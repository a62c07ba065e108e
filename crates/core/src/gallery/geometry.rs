//! Cylinder math for the circular gallery. Everything here is pure and
//! works in degrees.

use serde::Serialize;

/// Opacity and scale of a card derived from its distance to the front.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VisualWeight {
    pub opacity: f32,
    pub scale: f32,
}

/// Lower bounds for [`VisualWeight`] so cards never vanish entirely.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightFloors {
    pub opacity: f32,
    pub scale: f32,
}

impl Default for WeightFloors {
    fn default() -> Self {
        Self {
            opacity: 0.3,
            scale: 0.7,
        }
    }
}

/// `None` for an empty gallery.
pub fn angle_per_item(count: usize) -> Option<f32> {
    if count == 0 {
        None
    } else {
        Some(360.0 / count as f32)
    }
}

pub fn item_angle(index: usize, angle_per_item: f32) -> f32 {
    index as f32 * angle_per_item
}

/// Wraps any angle into `[0, 360)`.
pub fn normalize_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Angular distance from the front, in `[0, 180]`.
pub fn front_distance(item_angle: f32, rotation: f32) -> f32 {
    let effective = normalize_degrees(item_angle + rotation);
    effective.min(360.0 - effective)
}

pub fn visual_weight(item_angle: f32, rotation: f32, floors: WeightFloors) -> VisualWeight {
    let delta = front_distance(item_angle, rotation);
    VisualWeight {
        opacity: (1.0 - delta / 180.0).max(floors.opacity),
        scale: (1.0 - delta / 360.0).max(floors.scale),
    }
}

/// Item closest to the front for a given cylinder rotation.
pub fn active_index(rotation: f32, count: usize) -> Option<usize> {
    let per_item = angle_per_item(count)?;
    let front = normalize_degrees(-rotation);
    Some((front / per_item).round() as usize % count)
}

/// Rotation that brings `index` to the front.
pub fn target_rotation(index: usize, count: usize) -> Option<f32> {
    let per_item = angle_per_item(count)?;
    Some(-(index as f32) * per_item)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn empty_gallery_has_no_geometry() {
        assert_eq!(angle_per_item(0), None);
        assert_eq!(active_index(45.0, 0), None);
        assert_eq!(target_rotation(0, 0), None);
    }

    #[test]
    fn front_item_has_full_weight_and_antipode_floors() {
        let floors = WeightFloors::default();
        let front = visual_weight(90.0, -90.0, floors);
        assert_eq!(front, VisualWeight { opacity: 1.0, scale: 1.0 });

        let back = visual_weight(270.0, -90.0, floors);
        assert!((back.opacity - 0.3).abs() < 1e-6);
        assert!((back.scale - 0.7).abs() < 1e-6);
    }

    #[test]
    fn quarter_turn_weight() {
        let weight = visual_weight(90.0, 0.0, WeightFloors::default());
        assert!((weight.opacity - 0.5).abs() < 1e-6);
        assert!((weight.scale - 0.75).abs() < 1e-6);
    }

    #[test]
    fn active_index_handles_positive_and_wrapped_rotation() {
        assert_eq!(active_index(0.0, 6), Some(0));
        assert_eq!(active_index(-60.0, 6), Some(1));
        assert_eq!(active_index(60.0, 6), Some(5));
        assert_eq!(active_index(-720.0 - 120.0, 6), Some(2));
        assert_eq!(active_index(-350.0, 6), Some(0));
    }

    proptest! {
        #[test]
        fn jump_round_trips_to_active_index(count in 1usize..64, seed in 0usize..1024) {
            let index = seed % count;
            let rotation = target_rotation(index, count).unwrap();
            prop_assert_eq!(active_index(rotation, count), Some(index));
        }

        #[test]
        fn jumped_item_sits_at_the_front(count in 1usize..64, seed in 0usize..1024) {
            let index = seed % count;
            let per_item = angle_per_item(count).unwrap();
            let rotation = target_rotation(index, count).unwrap();
            let weight = visual_weight(item_angle(index, per_item), rotation, WeightFloors::default());
            prop_assert!((weight.opacity - 1.0).abs() < 1e-3);
            prop_assert!((weight.scale - 1.0).abs() < 1e-3);
        }

        #[test]
        fn active_index_is_nearest_item(count in 1usize..32, rotation in -1440.0f32..1440.0) {
            let per_item = angle_per_item(count).unwrap();
            let active = active_index(rotation, count).unwrap();
            let best = front_distance(item_angle(active, per_item), rotation);
            for other in 0..count {
                let distance = front_distance(item_angle(other, per_item), rotation);
                prop_assert!(best <= distance + 1e-2);
            }
        }

        #[test]
        fn weight_stays_within_floors(angle in 0.0f32..360.0, rotation in -1440.0f32..1440.0) {
            let weight = visual_weight(angle, rotation, WeightFloors::default());
            prop_assert!((0.3..=1.0).contains(&weight.opacity));
            prop_assert!((0.7..=1.0).contains(&weight.scale));
        }
    }
}
