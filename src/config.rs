use crate::theme::Theme;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

static DEFAULT_PRIORITIES: Lazy<BTreeMap<String, i32>> = Lazy::new(|| {
    BTreeMap::from([
        ("road".to_string(), 10),
        ("river".to_string(), 10),
        ("label".to_string(), 1),
        ("icon".to_string(), 2),
    ])
});

/// Knobs for the declutter algorithm. The priority table is plain data so
/// that callers (and config files) can extend or reshape it without touching
/// the element vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub step: f32,
    pub max_iterations: usize,
    pub movable_threshold: i32,
    pub priorities: BTreeMap<String, i32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            step: 15.0,
            max_iterations: 10,
            movable_threshold: 5,
            priorities: DEFAULT_PRIORITIES.clone(),
        }
    }
}

impl EngineConfig {
    /// Priority for an element type tag. Unknown tags fall back to 0, which
    /// sits below the movable threshold.
    pub fn priority_of(&self, token: &str) -> i32 {
        self.priorities.get(token).copied().unwrap_or(0)
    }

    pub fn is_movable(&self, priority: i32) -> bool {
        priority < self.movable_threshold
    }

    /// Candidate translations in strict trial order: up, down, right, left,
    /// then the four diagonals.
    pub fn movement_offsets(&self) -> [(f32, f32); 8] {
        let s = self.step;
        [
            (0.0, -s),
            (0.0, s),
            (s, 0.0),
            (-s, 0.0),
            (s, -s),
            (-s, -s),
            (s, s),
            (-s, s),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub padding: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1400.0,
            height: 760.0,
            padding: 24.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub theme: Theme,
    pub engine: EngineConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::classic();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            engine: EngineConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    theme: Option<String>,
    engine: Option<EngineConfigFile>,
    render: Option<RenderConfigFile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EngineConfigFile {
    step: Option<f32>,
    max_iterations: Option<usize>,
    movable_threshold: Option<i32>,
    priorities: Option<BTreeMap<String, i32>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    padding: Option<f32>,
    background: Option<String>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = serde_json::from_str(&contents)?;
    Ok(apply_config_file(config, parsed))
}

fn apply_config_file(mut config: Config, parsed: ConfigFile) -> Config {
    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "modern" {
            config.theme = Theme::modern();
        } else if theme_name == "classic" || theme_name == "default" {
            config.theme = Theme::classic();
        }
        config.render.background = config.theme.background.clone();
    }

    if let Some(engine) = parsed.engine {
        if let Some(v) = engine.step {
            config.engine.step = v;
        }
        if let Some(v) = engine.max_iterations {
            config.engine.max_iterations = v;
        }
        if let Some(v) = engine.movable_threshold {
            config.engine.movable_threshold = v;
        }
        if let Some(overrides) = engine.priorities {
            // Entries merge over the defaults so a file can add one kind
            // without restating the whole table.
            for (kind, priority) in overrides {
                config.engine.priorities.insert(kind, priority);
            }
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
        if let Some(v) = render.padding {
            config.render.padding = v;
        }
        if let Some(v) = render.background {
            config.render.background = v;
        }
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_priority_table() {
        let engine = EngineConfig::default();
        assert_eq!(engine.priority_of("road"), 10);
        assert_eq!(engine.priority_of("river"), 10);
        assert_eq!(engine.priority_of("label"), 1);
        assert_eq!(engine.priority_of("icon"), 2);
        assert_eq!(engine.priority_of("lighthouse"), 0);
    }

    #[test]
    fn offsets_try_axes_before_diagonals() {
        let engine = EngineConfig::default();
        let offsets = engine.movement_offsets();
        assert_eq!(offsets[0], (0.0, -15.0));
        assert_eq!(offsets[1], (0.0, 15.0));
        assert_eq!(offsets[2], (15.0, 0.0));
        assert_eq!(offsets[3], (-15.0, 0.0));
        assert_eq!(
            &offsets[4..],
            &[(15.0, -15.0), (-15.0, -15.0), (15.0, 15.0), (-15.0, 15.0)]
        );
    }

    #[test]
    fn config_file_merges_over_defaults() {
        let parsed: ConfigFile = serde_json::from_str(
            r#"{
                "theme": "modern",
                "engine": {
                    "step": 20.0,
                    "priorities": { "railway": 8, "label": 3 }
                },
                "render": { "width": 900.0 }
            }"#,
        )
        .unwrap();
        let config = apply_config_file(Config::default(), parsed);
        assert_eq!(config.engine.step, 20.0);
        assert_eq!(config.engine.max_iterations, 10);
        assert_eq!(config.engine.priority_of("railway"), 8);
        assert_eq!(config.engine.priority_of("label"), 3);
        assert_eq!(config.engine.priority_of("road"), 10);
        assert_eq!(config.render.width, 900.0);
        assert_eq!(config.render.height, 760.0);
        assert_eq!(config.theme.font_size, Theme::modern().font_size);
    }
}
