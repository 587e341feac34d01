//! # curvegraph CLI
//!
//! Command-line interface for accumulating outline shapes into regions.
//!
//! ## Commands
//! - `accumulate` - Load a JSON scene of tessellated shapes and build its region
//! - `modes` - Describe a render mode bit set

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use glam::Affine2;
use serde::Deserialize;

use curvegraph_core::Frustum;
use curvegraph_region::{
    IndexWidth, RegionAccumulator, RegionConfig, RenderModes, ShapeOutcome, TessellatedShape,
};

/// curvegraph region tool
#[derive(Parser)]
#[command(name = "curvegraph")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Accumulate a scene file into a region and report the result
    Accumulate {
        /// Scene file (JSON)
        scene: PathBuf,

        /// Index width of the target backend, overrides the scene config
        #[arg(short, long)]
        index_width: Option<IndexWidthArg>,

        /// Render modes (bits such as `0x103`, or names like `msaa,curve`)
        #[arg(short, long)]
        modes: Option<String>,
    },

    /// Describe a render mode bit set
    Modes {
        /// Render modes (bits such as `0x103`, or names like `vbaa,curve`)
        modes: String,
    },
}

/// Index width accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IndexWidthArg {
    U16,
    U32,
}

impl From<IndexWidthArg> for IndexWidth {
    fn from(arg: IndexWidthArg) -> Self {
        match arg {
            IndexWidthArg::U16 => IndexWidth::U16,
            IndexWidthArg::U32 => IndexWidth::U32,
        }
    }
}

/// Orthographic view volume used for culling
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct OrthoVolume {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    #[serde(default = "OrthoVolume::default_near")]
    pub near: f32,
    #[serde(default = "OrthoVolume::default_far")]
    pub far: f32,
}

impl OrthoVolume {
    fn default_near() -> f32 {
        -1.0
    }

    fn default_far() -> f32 {
        1.0
    }

    pub fn frustum(&self) -> Frustum {
        Frustum::orthographic(self.left, self.right, self.bottom, self.top, self.near, self.far)
    }
}

/// Scene file contents
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Scene {
    /// Render mode bits
    pub render_modes: u32,
    /// Region configuration
    pub config: RegionConfig,
    /// Transform applied to every shape
    pub transform: Option<Affine2>,
    /// Culling volume
    pub frustum: Option<OrthoVolume>,
    /// Shapes in ingestion order
    pub shapes: Vec<TessellatedShape>,
}

impl Scene {
    /// Load a scene from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse scene {}", path.display()))
    }
}

/// Parse render modes from bits (`259`, `0x103`) or names (`msaa,vbaa,curve`)
pub fn parse_modes(text: &str) -> Result<RenderModes> {
    let text = text.trim();
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        let bits = u32::from_str_radix(hex, 16).with_context(|| format!("Invalid mode bits '{text}'"))?;
        return Ok(RenderModes::from_bits_truncate(bits));
    }
    if let Ok(bits) = text.parse::<u32>() {
        return Ok(RenderModes::from_bits_truncate(bits));
    }

    let mut modes = RenderModes::NORMAL;
    for name in text.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        modes |= match name.to_ascii_lowercase().as_str() {
            "norm" | "normal" => RenderModes::NORMAL,
            "msaa" => RenderModes::MSAA,
            "vbaa" => RenderModes::VBAA,
            "curve" | "weight" => RenderModes::VARIABLE_CURVE_WEIGHT,
            other => bail!("Unknown render mode '{other}'"),
        };
    }
    Ok(modes)
}

/// Accumulate every shape of `scene` into a fresh region
pub fn accumulate_scene(scene: &Scene, modes: RenderModes, config: RegionConfig) -> Result<RegionAccumulator> {
    let mut region = RegionAccumulator::new(modes, config);
    if let Some(volume) = scene.frustum {
        region.set_frustum(Some(Arc::new(volume.frustum())));
    }

    let transform = scene.transform.as_ref().map(|t| t as &dyn curvegraph_core::ShapeTransform);
    for (i, shape) in scene.shapes.iter().enumerate() {
        let outcome = region
            .add_shape(shape, transform)
            .with_context(|| format!("Shape {i} could not be added"))?;
        match outcome {
            ShapeOutcome::Culled => log::debug!("  Shape {}: culled", i),
            ShapeOutcome::Added(stats) => log::debug!(
                "  Shape {}: {} triangles, {} raw + {} fresh vertices",
                i,
                stats.triangles,
                stats.raw_vertices,
                stats.fresh_vertices
            ),
        }
    }
    Ok(region)
}

/// Execute the CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    match cli.command {
        Commands::Accumulate { scene, index_width, modes } => {
            log::info!("Accumulating {}...", scene.display());
            let loaded = Scene::load(&scene)?;

            let modes = match modes {
                Some(text) => parse_modes(&text)?,
                None => RenderModes::from_bits_truncate(loaded.render_modes),
            };
            let mut config = loaded.config;
            if let Some(width) = index_width {
                config.index_width = width.into();
            }

            let region = accumulate_scene(&loaded, modes, config)?;
            log::info!("{}", region);
            log::info!("  Shapes: {}", loaded.shapes.len());
            log::info!("  Vertices: {} (limit {})", region.vertex_count(), region.max_vertices());
            log::info!(
                "  Indices: {} ({} bytes as {:?})",
                region.index_count(),
                region.index_count() * config.index_width.size(),
                config.index_width
            );
            log::info!("  Triangles: {}", region.index_count() / 3);
        }

        Commands::Modes { modes } => {
            let modes = parse_modes(&modes)?;
            log::info!("Render modes 0x{:03x}: {}", modes.bits(), modes);
            log::info!("  Multisample AA: {}", modes.is_multisample_aa());
            log::info!("  Two-pass AA: {}", modes.is_two_pass_aa());
            log::info!("  Curve weighting: {:?}", modes.curve_weighting());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use curvegraph_region::RegionError;

    const SCENE: &str = r#"{
        "render_modes": 259,
        "frustum": { "left": 0.0, "right": 10.0, "bottom": 0.0, "top": 10.0 },
        "shapes": [
            {
                "vertices": [
                    { "position": [0.0, 0.0, 0.0] },
                    { "position": [1.0, 0.0, 0.0] },
                    { "position": [1.0, 1.0, 0.0] }
                ],
                "triangles": [
                    { "vertices": [
                        { "position": [0.0, 0.0, 0.0], "id": { "Aliased": 0 } },
                        { "position": [1.0, 0.0, 0.0], "id": { "Aliased": 1 } },
                        { "position": [1.0, 1.0, 0.0], "id": { "Aliased": 2 } }
                    ] }
                ]
            },
            {
                "vertices": [
                    { "position": [50.0, 50.0, 0.0] },
                    { "position": [51.0, 50.0, 0.0] },
                    { "position": [51.0, 51.0, 0.0] }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_cli_parse() {
        let cli = Cli::parse_from(["curvegraph", "modes", "msaa"]);
        assert!(matches!(cli.command, Commands::Modes { .. }));
    }

    #[test]
    fn test_accumulate_command() {
        let cli = Cli::parse_from(["curvegraph", "accumulate", "scene.json", "-i", "u32", "-m", "0x100"]);
        if let Commands::Accumulate { scene, index_width, modes } = cli.command {
            assert_eq!(scene, PathBuf::from("scene.json"));
            assert_eq!(index_width, Some(IndexWidthArg::U32));
            assert_eq!(modes.as_deref(), Some("0x100"));
        } else {
            panic!("Expected Accumulate command");
        }
    }

    #[test]
    fn test_parse_modes() {
        assert_eq!(parse_modes("0x103").unwrap(), RenderModes::all());
        assert_eq!(parse_modes("2").unwrap(), RenderModes::VBAA);
        assert_eq!(
            parse_modes("msaa, curve").unwrap(),
            RenderModes::MSAA | RenderModes::VARIABLE_CURVE_WEIGHT
        );
        assert_eq!(parse_modes("norm").unwrap(), RenderModes::NORMAL);
        assert!(parse_modes("ssaa").is_err());
    }

    #[test]
    fn test_accumulate_scene_culls() {
        let scene: Scene = serde_json::from_str(SCENE).unwrap();
        let modes = RenderModes::from_bits_truncate(scene.render_modes);
        let region = accumulate_scene(&scene, modes, scene.config).unwrap();

        assert_eq!(region.render_modes(), RenderModes::all());
        assert_eq!(region.vertex_count(), 3);
        assert_eq!(region.sink().indices(), &[0, 1, 2]);
        assert!(region.is_dirty());
    }

    #[test]
    fn test_accumulate_scene_reports_overflow() {
        let scene: Scene = serde_json::from_str(SCENE).unwrap();
        let config = RegionConfig::default().with_max_vertices(2);

        let err = accumulate_scene(&scene, RenderModes::NORMAL, config).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RegionError>(),
            Some(RegionError::IndexOverflow { requested: 3, limit: 2 })
        ));
    }

    #[test]
    fn test_load_demo_scene() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/two_glyphs.json");
        let scene = Scene::load(&path).unwrap();
        let modes = RenderModes::from_bits_truncate(scene.render_modes);
        assert!(modes.is_non_uniform_weight());

        let region = accumulate_scene(&scene, modes, scene.config).unwrap();
        assert_eq!(region.vertex_count(), 7);
        assert_eq!(region.index_count(), 9);
        assert_eq!(region.bounds().min, glam::Vec3::new(10.0, 10.0, 0.0));
        assert_eq!(region.bounds().max, glam::Vec3::new(18.0, 22.0, 0.0));
    }

    #[test]
    fn test_load_missing_scene() {
        assert!(Scene::load(Path::new("does/not/exist.json")).is_err());
    }

    #[test]
    fn test_scene_transform() {
        let mut scene: Scene = serde_json::from_str(SCENE).unwrap();
        scene.frustum = None;
        scene.transform = Some(Affine2::from_translation(glam::Vec2::new(2.0, 0.0)));

        let region = accumulate_scene(&scene, RenderModes::NORMAL, RegionConfig::default()).unwrap();
        assert_eq!(region.vertex_count(), 6);
        assert_eq!(region.bounds().min.x, 2.0);
        assert_eq!(region.bounds().max.x, 53.0);
    }
}
