use crate::config::EngineConfig;
use crate::geometry::BoundingBox;
use crate::scene::{ElementKind, MapElement};

/// Built-in sample scene: a small city map with two roads, a river, and a
/// handful of labels and icons deliberately placed on top of them.
pub fn demo_scene(config: &EngineConfig) -> Vec<MapElement> {
    let make = |id: &str, kind: &str, x: f32, y: f32, w: f32, h: f32| {
        MapElement::new(
            id,
            ElementKind::from_token(kind),
            BoundingBox::new(x, y, w, h),
            config,
        )
    };

    vec![
        // Fixed geometry: a horizontal road, a vertical road, a river.
        make("road_1", "road", 20.0, 80.0, 160.0, 15.0),
        make("road_2", "road", 95.0, 20.0, 15.0, 160.0),
        make("river_1", "river", 130.0, 100.0, 60.0, 12.0),
        // Labels sitting on the roads and the river.
        make("L1", "label", 30.0, 83.0, 25.0, 12.0),
        make("L2", "label", 98.0, 140.0, 25.0, 12.0),
        make("L3", "label", 135.0, 102.0, 25.0, 10.0),
        // Icons on the vertical road and the river.
        make("I1", "icon", 100.0, 50.0, 12.0, 12.0),
        make("I2", "icon", 160.0, 103.0, 12.0, 10.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{DeclutterEngine, count_overlaps};

    #[test]
    fn demo_scene_partitions_as_expected() {
        let config = EngineConfig::default();
        let elements = demo_scene(&config);
        assert_eq!(elements.len(), 8);
        let engine = DeclutterEngine::new(elements, &config);
        assert_eq!(engine.fixed_indices().len(), 3);
        assert_eq!(engine.movable_indices().len(), 5);
    }

    #[test]
    fn demo_scene_starts_cluttered() {
        let config = EngineConfig::default();
        let elements = demo_scene(&config);
        assert!(count_overlaps(&elements) >= 5);
    }
}
