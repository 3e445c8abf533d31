use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub road_color: String,
    pub river_color: String,
    pub label_color: String,
    pub icon_color: String,
    pub unknown_color: String,
    pub movable_fill: String,
    pub original_outline: String,
    pub displacement_color: String,
    pub caption_warn_color: String,
    pub caption_ok_color: String,
    pub panel_border: String,
    pub background: String,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "\"trebuchet ms\", verdana, arial, sans-serif".to_string(),
            font_size: 12.0,
            road_color: "#2C3E50".to_string(),
            river_color: "#3498DB".to_string(),
            label_color: "#E74C3C".to_string(),
            icon_color: "#F39C12".to_string(),
            unknown_color: "#95A5A6".to_string(),
            movable_fill: "#FFFFFF".to_string(),
            original_outline: "#808080".to_string(),
            displacement_color: "#808080".to_string(),
            caption_warn_color: "#C0392B".to_string(),
            caption_ok_color: "#1E8449".to_string(),
            panel_border: "#BDC3C7".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 11.0,
            road_color: "#1C2430".to_string(),
            river_color: "#4A90D9".to_string(),
            label_color: "#D64541".to_string(),
            icon_color: "#E8930C".to_string(),
            unknown_color: "#7A8AA6".to_string(),
            movable_fill: "#F8FAFF".to_string(),
            original_outline: "#9AA7BA".to_string(),
            displacement_color: "#9AA7BA".to_string(),
            caption_warn_color: "#B3342F".to_string(),
            caption_ok_color: "#24784A".to_string(),
            panel_border: "#D7E0F0".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }
}
