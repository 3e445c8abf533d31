use crate::config::RenderConfig;
use crate::engine::DeclutterStats;
use crate::geometry::BoundingBox;
use crate::scene::MapElement;
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

const PANEL_TITLE_BAND: f32 = 34.0;
const CAPTION_BAND: f32 = 26.0;
const LEGEND_BAND: f32 = 30.0;
const SCENE_MARGIN: f32 = 10.0;

/// Maps scene coordinates into one panel with a uniform scale shared by both
/// panels, so the before and after views line up visually.
struct PanelFrame {
    origin_x: f32,
    origin_y: f32,
    scale: f32,
    min_x: f32,
    min_y: f32,
}

impl PanelFrame {
    fn place(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.origin_x + (x - self.min_x) * self.scale,
            self.origin_y + (y - self.min_y) * self.scale,
        )
    }
}

/// Render the before/after comparison: original positions on the left,
/// resolved positions on the right with original outlines and displacement
/// arrows for every moved element.
pub fn render_comparison(
    elements: &[MapElement],
    stats: &DeclutterStats,
    theme: &Theme,
    config: &RenderConfig,
) -> String {
    let width = config.width.max(400.0);
    let height = config.height.max(300.0);
    let pad = config.padding;

    let panel_w = (width - 3.0 * pad) / 2.0;
    let panel_h = height - 2.0 * pad - PANEL_TITLE_BAND - CAPTION_BAND - LEGEND_BAND;

    let (min_x, min_y, max_x, max_y) = scene_extent(elements);
    let extent_w = (max_x - min_x).max(1.0);
    let extent_h = (max_y - min_y).max(1.0);
    let scale = (panel_w / extent_w).min(panel_h / extent_h);

    let panel_y = pad + PANEL_TITLE_BAND;
    let before = PanelFrame {
        origin_x: pad,
        origin_y: panel_y,
        scale,
        min_x,
        min_y,
    };
    let after = PanelFrame {
        origin_x: pad * 2.0 + panel_w,
        origin_y: panel_y,
        scale,
        min_x,
        min_y,
    };

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        config.background
    ));
    svg.push_str("<defs>");
    svg.push_str(&format!(
        "<marker id=\"arrow\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"6\" markerHeight=\"6\" orient=\"auto-start-reverse\"><path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"{}\"/></marker>",
        theme.displacement_color
    ));
    svg.push_str("</defs>");

    for (frame, title) in [(&before, "Before: cluttered"), (&after, "After: decluttered")] {
        svg.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1\"/>",
            frame.origin_x, frame.origin_y, panel_w, panel_h, theme.panel_border
        ));
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{}\" font-weight=\"bold\" fill=\"{}\">{}</text>",
            frame.origin_x,
            frame.origin_y - 10.0,
            theme.font_family,
            theme.font_size + 2.0,
            theme.road_color,
            title
        ));
    }

    // Left panel: every element at its construction-time position.
    for element in elements {
        draw_element(&mut svg, element, &element.original_bbox, theme, &before);
    }

    // Right panel: resolved positions, with the original footprint and a
    // displacement arrow for anything that moved.
    for element in elements {
        if element.moved {
            let (ox, oy) = after.place(element.original_bbox.x, element.original_bbox.y);
            let (ow, oh) = (
                element.original_bbox.width * after.scale,
                element.original_bbox.height * after.scale,
            );
            svg.push_str(&format!(
                "<rect x=\"{ox:.2}\" y=\"{oy:.2}\" width=\"{ow:.2}\" height=\"{oh:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1\" stroke-dasharray=\"4 3\"/>",
                theme.original_outline
            ));
            let (fx, fy) = element.original_bbox.center();
            let (tx, ty) = element.bbox.center();
            let (fx, fy) = after.place(fx, fy);
            let (tx, ty) = after.place(tx, ty);
            svg.push_str(&format!(
                "<line x1=\"{fx:.2}\" y1=\"{fy:.2}\" x2=\"{tx:.2}\" y2=\"{ty:.2}\" stroke=\"{}\" stroke-width=\"1\" marker-end=\"url(#arrow)\"/>",
                theme.displacement_color
            ));
        }
        draw_element(&mut svg, element, &element.bbox, theme, &after);
    }

    let caption_y = panel_y + panel_h + 18.0;
    let overlaps_before = original_overlap_count(elements);
    svg.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{caption_y:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{} overlaps detected</text>",
        before.origin_x + panel_w / 2.0,
        theme.font_family,
        theme.font_size,
        theme.caption_warn_color,
        overlaps_before
    ));
    svg.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{caption_y:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}/{} elements repositioned ({:.1}%)</text>",
        after.origin_x + panel_w / 2.0,
        theme.font_family,
        theme.font_size,
        theme.caption_ok_color,
        stats.elements_moved,
        stats.movable_elements,
        stats.move_percentage
    ));

    draw_legend(&mut svg, theme, width, height - pad - 8.0);

    svg.push_str("</svg>");
    svg
}

fn draw_element(
    svg: &mut String,
    element: &MapElement,
    bbox: &BoundingBox,
    theme: &Theme,
    frame: &PanelFrame,
) {
    let (x, y) = frame.place(bbox.x, bbox.y);
    let w = bbox.width * frame.scale;
    let h = bbox.height * frame.scale;
    let color = kind_color(element, theme);
    let (cx, cy) = (x + w / 2.0, y + h / 2.0);

    if element.movable {
        svg.push_str(&format!(
            "<rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{w:.2}\" height=\"{h:.2}\" rx=\"2\" ry=\"2\" fill=\"{}\" fill-opacity=\"0.85\" stroke=\"{color}\" stroke-width=\"1.5\"/>",
            theme.movable_fill
        ));
        svg.push_str(&format!(
            "<text x=\"{cx:.2}\" y=\"{cy:.2}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{}\" font-weight=\"bold\" fill=\"{color}\">{}</text>",
            theme.font_family,
            theme.font_size - 3.0,
            escape_xml(&element.id)
        ));
    } else {
        svg.push_str(&format!(
            "<rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{w:.2}\" height=\"{h:.2}\" rx=\"2\" ry=\"2\" fill=\"{color}\" fill-opacity=\"0.7\" stroke=\"{color}\" stroke-width=\"2\"/>",
        ));
        svg.push_str(&format!(
            "<text x=\"{cx:.2}\" y=\"{cy:.2}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{}\" font-weight=\"bold\" fill=\"#FFFFFF\">{}</text>",
            theme.font_family,
            theme.font_size - 3.0,
            escape_xml(&element.kind.as_token().to_uppercase())
        ));
    }
}

fn draw_legend(svg: &mut String, theme: &Theme, width: f32, y: f32) {
    let entries = [
        (theme.road_color.as_str(), true, "Road (fixed)"),
        (theme.river_color.as_str(), true, "River (fixed)"),
        (theme.label_color.as_str(), false, "Label (movable)"),
        (theme.icon_color.as_str(), false, "Icon (movable)"),
    ];
    let slot = 150.0;
    let total = slot * (entries.len() + 1) as f32;
    let mut x = (width - total) / 2.0;
    for (color, filled, text) in entries {
        let fill = if filled { color } else { "none" };
        svg.push_str(&format!(
            "<rect x=\"{x:.2}\" y=\"{:.2}\" width=\"14\" height=\"10\" fill=\"{fill}\" stroke=\"{color}\" stroke-width=\"1.5\"/>",
            y - 9.0
        ));
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{y:.2}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{text}</text>",
            x + 20.0,
            theme.font_family,
            theme.font_size - 2.0,
            theme.road_color
        ));
        x += slot;
    }
    svg.push_str(&format!(
        "<rect x=\"{x:.2}\" y=\"{:.2}\" width=\"14\" height=\"10\" fill=\"none\" stroke=\"{}\" stroke-width=\"1\" stroke-dasharray=\"4 3\"/>",
        y - 9.0,
        theme.original_outline
    ));
    svg.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{y:.2}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">Original position</text>",
        x + 20.0,
        theme.font_family,
        theme.font_size - 2.0,
        theme.road_color
    ));
}

fn kind_color<'a>(element: &MapElement, theme: &'a Theme) -> &'a str {
    match element.kind.as_token() {
        "road" => &theme.road_color,
        "river" => &theme.river_color,
        "label" => &theme.label_color,
        "icon" => &theme.icon_color,
        _ => &theme.unknown_color,
    }
}

/// Overlapping pairs at construction-time positions, for the left caption.
fn original_overlap_count(elements: &[MapElement]) -> usize {
    let mut count = 0;
    for (i, a) in elements.iter().enumerate() {
        for b in &elements[i + 1..] {
            if a.original_bbox.intersects(&b.original_bbox) {
                count += 1;
            }
        }
    }
    count
}

/// Extent covering both the current and original footprint of every element,
/// plus a small margin, so panels share one frame.
fn scene_extent(elements: &[MapElement]) -> (f32, f32, f32, f32) {
    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for element in elements {
        for bbox in [&element.bbox, &element.original_bbox] {
            min_x = min_x.min(bbox.x);
            min_y = min_y.min(bbox.y);
            max_x = max_x.max(bbox.right());
            max_y = max_y.max(bbox.bottom());
        }
    }
    if !min_x.is_finite() {
        return (0.0, 0.0, 200.0, 200.0);
    }
    (
        min_x - SCENE_MARGIN,
        min_y - SCENE_MARGIN,
        max_x + SCENE_MARGIN,
        max_y + SCENE_MARGIN,
    )
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "Inter".to_string();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .unwrap_or(usvg::Size::from_wh(800.0, 600.0).unwrap());

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
