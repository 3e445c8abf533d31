use crate::config::{EngineConfig, load_config};
use crate::demo::demo_scene;
use crate::engine::{DeclutterEngine, DeclutterStats, count_overlaps};
use crate::render::{render_comparison, write_output_svg};
use crate::report::{SceneReport, write_report};
use crate::scene::{MapElement, SceneFile, load_scene};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "mapdc",
    version,
    about = "Priority-based map decluttering with before/after rendering"
)]
pub struct Args {
    /// Input scene file (.json/.json5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Use the built-in demo scene instead of reading input
    #[arg(long = "demo", conflicts_with = "input")]
    pub demo: bool,

    /// Output file (svg/png/json). Defaults to stdout for svg/json if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (engine/render/theme overrides)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Print a resolution summary to stderr
    #[arg(long = "summary")]
    pub summary: bool,

    /// Width
    #[arg(short = 'w', long = "width", default_value_t = 1400.0)]
    pub width: f32,

    /// Height
    #[arg(short = 'H', long = "height", default_value_t = 760.0)]
    pub height: f32,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    config.render.width = args.width;
    config.render.height = args.height;

    let elements = if args.demo {
        demo_scene(&config.engine)
    } else {
        read_scene(args.input.as_deref(), &config.engine)?
    };

    let overlaps_before = count_overlaps(&elements);
    let mut engine = DeclutterEngine::new(elements, &config.engine);
    let iterations = engine.resolve_clutter();
    let stats = engine.statistics();

    if args.summary {
        print_summary(&engine, &stats, overlaps_before, iterations);
    }

    match args.output_format {
        OutputFormat::Svg => {
            let svg = render_comparison(engine.elements(), &stats, &config.theme, &config.render);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            #[cfg(feature = "png")]
            {
                let svg =
                    render_comparison(engine.elements(), &stats, &config.theme, &config.render);
                let output = ensure_output(&args.output, "png")?;
                crate::render::write_output_png(&svg, &output, &config.render)?;
            }
            #[cfg(not(feature = "png"))]
            {
                return Err(anyhow::anyhow!(
                    "this build lacks PNG support (enable the 'png' feature)"
                ));
            }
        }
        OutputFormat::Json => {
            let report = SceneReport::from_elements(engine.elements(), stats, iterations);
            write_report(&report, args.output.as_deref())?;
        }
    }

    Ok(())
}

fn read_scene(path: Option<&Path>, config: &EngineConfig) -> Result<Vec<MapElement>> {
    if let Some(path) = path {
        if path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            return Ok(SceneFile::parse(&buf)?.into_elements(config));
        }
        return Ok(load_scene(path, config)?);
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(SceneFile::parse(&buf)?.into_elements(config))
}

#[cfg(feature = "png")]
fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

fn print_summary(
    engine: &DeclutterEngine,
    stats: &DeclutterStats,
    overlaps_before: usize,
    iterations: usize,
) {
    eprintln!(
        "classified {} elements: {} fixed, {} movable",
        stats.total_elements, stats.fixed_elements, stats.movable_elements
    );
    eprintln!("{} overlaps before resolution", overlaps_before);
    eprintln!("resolved in {} iterations", iterations);
    for &index in engine.movable_indices() {
        let element = &engine.elements()[index];
        if element.moved {
            let (dx, dy) = element.displacement();
            eprintln!("  {}: moved ({:+.0}, {:+.0})", element.id, dx, dy);
        } else {
            eprintln!("  {}: no movement needed", element.id);
        }
    }
    eprintln!(
        "moved {}/{} movable elements ({:.1}%)",
        stats.elements_moved, stats.movable_elements, stats.move_percentage
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_demo_json_invocation() {
        let args = Args::try_parse_from(["mapdc", "--demo", "-e", "json", "--summary"]).unwrap();
        assert!(args.demo);
        assert!(args.summary);
        assert!(matches!(args.output_format, OutputFormat::Json));
        assert!(args.input.is_none());
    }

    #[test]
    fn demo_conflicts_with_input() {
        assert!(Args::try_parse_from(["mapdc", "--demo", "-i", "scene.json"]).is_err());
    }
}
