use crate::config::EngineConfig;
use crate::geometry::BoundingBox;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Element vocabulary. Tags outside the known set are preserved as-is so a
/// custom priority table can still address them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    Road,
    River,
    Label,
    Icon,
    Other(String),
}

impl ElementKind {
    pub fn from_token(token: &str) -> Self {
        match token {
            "road" => Self::Road,
            "river" => Self::River,
            "label" => Self::Label,
            "icon" => Self::Icon,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_token(&self) -> &str {
        match self {
            Self::Road => "road",
            Self::River => "river",
            Self::Label => "label",
            Self::Icon => "icon",
            Self::Other(token) => token,
        }
    }
}

/// A single map entity. `bbox` is the only field the engine rewrites;
/// `original_bbox` keeps the construction-time position and `moved` flips to
/// true the first time the engine relocates the element.
#[derive(Debug, Clone)]
pub struct MapElement {
    pub id: String,
    pub kind: ElementKind,
    pub bbox: BoundingBox,
    pub priority: i32,
    pub movable: bool,
    pub original_bbox: BoundingBox,
    pub moved: bool,
}

impl MapElement {
    pub fn new(
        id: impl Into<String>,
        kind: ElementKind,
        bbox: BoundingBox,
        config: &EngineConfig,
    ) -> Self {
        let priority = config.priority_of(kind.as_token());
        let movable = config.is_movable(priority);
        Self {
            id: id.into(),
            kind,
            bbox,
            priority,
            movable,
            original_bbox: bbox,
            moved: false,
        }
    }

    /// Offset from the construction-time position to the current one.
    pub fn displacement(&self) -> (f32, f32) {
        (
            self.bbox.x - self.original_bbox.x,
            self.bbox.y - self.original_bbox.y,
        )
    }
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to read scene: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse scene: {0}")]
    Parse(#[from] json5::Error),
    #[error("scene contains no elements")]
    Empty,
}

#[derive(Debug, Deserialize)]
pub struct SceneFile {
    pub elements: Vec<SceneElement>,
}

#[derive(Debug, Deserialize)]
pub struct SceneElement {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub bbox: BoundingBox,
}

impl SceneFile {
    /// Parse a JSON5 scene document. Plain JSON is accepted as a subset.
    /// An empty element list is rejected here, at the ingestion boundary;
    /// the engine itself places no such requirement on its input.
    pub fn parse(input: &str) -> Result<Self, SceneError> {
        let scene: SceneFile = json5::from_str(input)?;
        if scene.elements.is_empty() {
            return Err(SceneError::Empty);
        }
        Ok(scene)
    }

    pub fn into_elements(self, config: &EngineConfig) -> Vec<MapElement> {
        self.elements
            .into_iter()
            .map(|element| {
                MapElement::new(
                    element.id,
                    ElementKind::from_token(&element.kind),
                    element.bbox,
                    config,
                )
            })
            .collect()
    }
}

pub fn load_scene(path: &Path, config: &EngineConfig) -> Result<Vec<MapElement>, SceneError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(SceneFile::parse(&contents)?.into_elements(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_json5_scene() {
        let input = r#"{
            // movable label over a fixed road
            elements: [
                { id: "road_1", type: "road", bbox: { x: 20, y: 80, width: 160, height: 15 } },
                { id: "L1", type: "label", bbox: { x: 30, y: 83, width: 25, height: 12 } },
                { id: "X1", type: "windmill", bbox: { x: 0, y: 0, width: 5, height: 5 } },
            ],
        }"#;
        let config = EngineConfig::default();
        let elements = SceneFile::parse(input).unwrap().into_elements(&config);
        assert_eq!(elements.len(), 3);
        assert_eq!(elements[0].kind, ElementKind::Road);
        assert_eq!(elements[0].priority, 10);
        assert!(!elements[0].movable);
        assert_eq!(elements[1].priority, 1);
        assert!(elements[1].movable);
        // Unrecognized tags default to priority 0, hence movable.
        assert_eq!(elements[2].kind, ElementKind::Other("windmill".to_string()));
        assert_eq!(elements[2].priority, 0);
        assert!(elements[2].movable);
    }

    #[test]
    fn empty_scene_is_rejected_at_load() {
        let err = SceneFile::parse(r#"{ "elements": [] }"#).unwrap_err();
        assert!(matches!(err, SceneError::Empty));
    }

    #[test]
    fn original_bbox_is_a_defensive_copy() {
        let config = EngineConfig::default();
        let bbox = BoundingBox::new(1.0, 2.0, 3.0, 4.0);
        let mut element = MapElement::new("e", ElementKind::Icon, bbox, &config);
        element.bbox = element.bbox.translated(15.0, -15.0);
        assert_eq!(element.original_bbox, bbox);
        assert_eq!(element.displacement(), (15.0, -15.0));
    }

    #[test]
    fn custom_table_reclassifies_kinds() {
        let mut config = EngineConfig::default();
        config.priorities.insert("windmill".to_string(), 7);
        let element = MapElement::new(
            "w",
            ElementKind::from_token("windmill"),
            BoundingBox::new(0.0, 0.0, 4.0, 4.0),
            &config,
        );
        assert_eq!(element.priority, 7);
        assert!(!element.movable);
    }
}
