use crate::engine::DeclutterStats;
use crate::geometry::BoundingBox;
use crate::scene::MapElement;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Machine-readable snapshot of a resolved scene, for downstream tooling.
#[derive(Debug, Serialize)]
pub struct SceneReport {
    pub iterations: usize,
    pub stats: DeclutterStats,
    pub elements: Vec<ElementReport>,
}

#[derive(Debug, Serialize)]
pub struct ElementReport {
    pub id: String,
    pub kind: String,
    pub priority: i32,
    pub movable: bool,
    pub moved: bool,
    pub bbox: BoundingBox,
    pub original_bbox: BoundingBox,
}

impl SceneReport {
    pub fn from_elements(
        elements: &[MapElement],
        stats: DeclutterStats,
        iterations: usize,
    ) -> Self {
        let elements = elements
            .iter()
            .map(|element| ElementReport {
                id: element.id.clone(),
                kind: element.kind.as_token().to_string(),
                priority: element.priority,
                movable: element.movable,
                moved: element.moved,
                bbox: element.bbox,
                original_bbox: element.original_bbox,
            })
            .collect();
        SceneReport {
            iterations,
            stats,
            elements,
        }
    }
}

pub fn write_report(report: &SceneReport, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path)?;
            let writer = BufWriter::new(file);
            serde_json::to_writer_pretty(writer, report)?;
        }
        None => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::demo::demo_scene;
    use crate::engine::DeclutterEngine;

    #[test]
    fn report_keeps_original_positions() {
        let config = EngineConfig::default();
        let mut engine = DeclutterEngine::new(demo_scene(&config), &config);
        let iterations = engine.resolve_clutter();
        let report = SceneReport::from_elements(engine.elements(), engine.statistics(), iterations);
        assert_eq!(report.elements.len(), 8);
        for element in &report.elements {
            if !element.moved {
                assert_eq!(element.bbox, element.original_bbox);
            }
        }
        let l1 = report
            .elements
            .iter()
            .find(|element| element.id == "L1")
            .unwrap();
        assert!(l1.moved);
        assert_eq!(l1.original_bbox, BoundingBox::new(30.0, 83.0, 25.0, 12.0));
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"move_percentage\":100.0"));
    }
}
