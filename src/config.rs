//! Configuration management for bjerknes.
//!
//! This module handles the layered configuration system with the following precedence:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables (`BJERKNES_*`)
//! 3. JSON config file
//! 4. Default values (lowest priority)

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::colortables;
use crate::error::{BjerknesError, Result};
use crate::interpolation::INTERPOLATION_METHODS;
use crate::render::OutputFormat;

/// Command-line interface for bjerknes
#[derive(Parser, Debug)]
#[command(name = "bjerknes")]
#[command(author, version, about = "Meteorological chart rendering", long_about = None)]
pub struct Cli {
    /// Path to JSON configuration file
    #[arg(short, long, env = "BJERKNES_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "BJERKNES_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Directory holding the boundary shapefiles
    #[arg(long, env = "BJERKNES_MAPS_DIR", global = true)]
    pub maps_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a single field as a filled map
    Render(RenderArgs),
    /// Render a synoptic analysis chart
    Synoptic(SynopticArgs),
    /// List the registered color tables
    Tables(TablesArgs),
    /// Serve charts over HTTP
    Serve(ServeArgs),
}

/// Image options shared by the rendering subcommands
#[derive(Args, Debug, Clone, Default)]
pub struct ImageArgs {
    /// Image width in pixels
    #[arg(long, env = "BJERKNES_WIDTH")]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long, env = "BJERKNES_HEIGHT")]
    pub height: Option<u32>,

    /// Named map region (e.g. china, east_china, europe)
    #[arg(long, conflicts_with = "bbox")]
    pub region: Option<String>,

    /// Map extent as lon_min,lat_min,lon_max,lat_max
    #[arg(long, allow_hyphen_values = true)]
    pub bbox: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Path to the NetCDF file
    pub file: PathBuf,

    /// Variable to render
    #[arg(long = "var")]
    pub var: String,

    #[arg(long)]
    pub time_index: Option<usize>,

    #[arg(long)]
    pub level_index: Option<usize>,

    /// Level coordinate value (e.g. 500), nearest level is used
    #[arg(long, conflicts_with = "level_index")]
    pub level: Option<f64>,

    /// Color table specification, e.g. `temperature_nws` or `qpf_nws:6`
    #[arg(long, env = "BJERKNES_COLORTABLE")]
    pub colortable: Option<String>,

    /// Resampling method (nearest, bilinear, bicubic)
    #[arg(long, env = "BJERKNES_RESAMPLING")]
    pub resampling: Option<String>,

    #[command(flatten)]
    pub image: ImageArgs,

    /// Mask source: a boundary name (e.g. nation) or a shapefile path
    #[arg(long)]
    pub mask: Option<String>,

    /// Attribute of the mask shapefile to filter on
    #[arg(long, requires = "mask")]
    pub mask_attribute: Option<String>,

    /// Accepted attribute values (repeatable)
    #[arg(long, requires = "mask_attribute")]
    pub mask_value: Vec<String>,

    /// Boundary overlays, comma separated (e.g. coastline,province)
    #[arg(long, value_delimiter = ',')]
    pub boundaries: Vec<String>,

    /// Variable drawn as contour lines on top of the fill
    #[arg(long)]
    pub contour_var: Option<String>,

    #[arg(long, requires = "contour_var")]
    pub contour_interval: Option<f64>,

    /// Disable gridlines
    #[arg(long)]
    pub no_gridlines: bool,

    /// Disable the colorbar
    #[arg(long)]
    pub no_colorbar: bool,

    /// Output image (format from the extension)
    #[arg(short, long)]
    pub output: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct SynopticArgs {
    /// Path to the NetCDF file
    pub file: PathBuf,

    /// Chart product (gh500_uv850_mslp, uv850, wind850, theta_on_pv)
    #[arg(long, default_value = "gh500_uv850_mslp")]
    pub product: String,

    /// Geopotential height variable (dagpm)
    #[arg(long, default_value = "gh")]
    pub gh: String,

    #[arg(long, default_value = "u")]
    pub u: String,

    #[arg(long, default_value = "v")]
    pub v: String,

    /// Mean sea level pressure variable (hPa)
    #[arg(long, default_value = "mslp")]
    pub mslp: String,

    /// Equivalent potential temperature variable, drawn when present
    #[arg(long)]
    pub theta_e: Option<String>,

    /// Potential temperature on the PV surface (K)
    #[arg(long, default_value = "theta")]
    pub theta: String,

    /// Level of the height contours
    #[arg(long, default_value_t = 500.0)]
    pub gh_level: f64,

    /// Level of the wind field
    #[arg(long, default_value_t = 850.0)]
    pub wind_level: f64,

    #[arg(long)]
    pub time_index: Option<usize>,

    /// Model initial time as YYYYMMDDHH
    #[arg(long)]
    pub init: Option<String>,

    /// Forecast hour
    #[arg(long, default_value_t = 0)]
    pub fhour: u32,

    #[command(flatten)]
    pub image: ImageArgs,

    /// Output image
    #[arg(short, long, conflicts_with = "output_dir")]
    pub output: Option<PathBuf>,

    /// Directory for a file named after the product and model time
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct TablesArgs {
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Show the bins of one table
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Path to a NetCDF file to serve charts from
    pub file: Option<PathBuf>,

    /// Host address to bind to
    #[arg(short = 'H', long, env = "BJERKNES_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "BJERKNES_PORT")]
    pub port: Option<u16>,

    /// Number of worker threads
    #[arg(short, long, env = "BJERKNES_WORKERS")]
    pub workers: Option<usize>,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of worker threads (None = number of CPU cores)
    #[serde(default)]
    pub workers: Option<usize>,
}

/// Chart rendering defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,

    /// Output format (png, jpeg)
    #[serde(default = "default_format")]
    pub format: String,

    /// Color table used when a request names none
    #[serde(default = "default_colortable")]
    pub colortable: String,

    /// Resampling method for filled fields
    #[serde(default = "default_resampling")]
    pub resampling: String,

    #[serde(default = "default_true")]
    pub gridlines: bool,

    #[serde(default = "default_true")]
    pub colorbar: bool,

    /// Gridline spacing in degrees
    #[serde(default = "default_gridline_spacing")]
    pub gridline_spacing: f64,
}

/// Boundary shapefile locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapsConfig {
    /// Directory holding the shapefiles
    #[serde(default = "default_maps_dir")]
    pub maps_dir: PathBuf,

    /// Boundary source name -> shapefile stem
    #[serde(default = "default_sources")]
    pub sources: BTreeMap<String, String>,
}

impl MapsConfig {
    /// Shapefile path of a named source.
    pub fn path_for(&self, source: &str) -> Option<PathBuf> {
        self.sources
            .get(source)
            .map(|stem| self.maps_dir.join(format!("{}.shp", stem)))
    }
}

/// Complete configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Rendering defaults
    #[serde(default)]
    pub render: RenderConfig,

    /// Boundary shapefiles
    #[serde(default)]
    pub maps: MapsConfig,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Config {
    /// Parse the command line and load configuration from all sources
    pub fn load() -> Result<(Self, Command)> {
        let cli = Cli::parse();
        let config = Self::from_cli(&cli)?;
        Ok((config, cli.command))
    }

    /// Build the configuration from parsed arguments with proper precedence
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = Config::default();

        if let Some(config_path) = &cli.config {
            let json_config = Self::load_from_file(config_path)?;
            config.merge(json_config);
        }

        if let Some(level) = &cli.log_level {
            config.log_level = level.clone();
        }
        if let Some(dir) = &cli.maps_dir {
            config.maps.maps_dir = dir.clone();
        }

        match &cli.command {
            Command::Render(args) => {
                config.apply_image_args(&args.image);
                if let Some(colortable) = &args.colortable {
                    config.render.colortable = colortable.clone();
                }
                if let Some(resampling) = &args.resampling {
                    config.render.resampling = resampling.clone();
                }
                if args.no_gridlines {
                    config.render.gridlines = false;
                }
                if args.no_colorbar {
                    config.render.colorbar = false;
                }
            }
            Command::Synoptic(args) => config.apply_image_args(&args.image),
            Command::Serve(args) => {
                if let Some(host) = &args.host {
                    config.server.host = host.clone();
                }
                if let Some(port) = args.port {
                    config.server.port = port;
                }
                if args.workers.is_some() {
                    config.server.workers = args.workers;
                }
            }
            Command::Tables(_) => {}
        }

        Ok(config)
    }

    fn apply_image_args(&mut self, image: &ImageArgs) {
        if let Some(width) = image.width {
            self.render.width = width;
        }
        if let Some(height) = image.height {
            self.render.height = height;
        }
    }

    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        self.server.host = other.server.host;
        self.server.port = other.server.port;
        if other.server.workers.is_some() {
            self.server.workers = other.server.workers;
        }
        self.render = other.render;
        self.maps.maps_dir = other.maps.maps_dir;
        self.maps.sources.extend(other.maps.sources);
        self.log_level = other.log_level;
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            return Err(BjerknesError::Config {
                message: "Server host cannot be empty".to_string(),
            });
        }

        // Validate port (0 is not a valid port for users)
        if self.server.port == 0 {
            return Err(BjerknesError::Config {
                message: "Server port cannot be 0".to_string(),
            });
        }

        if self.server.workers == Some(0) {
            return Err(BjerknesError::Config {
                message: "Number of workers must be at least 1".to_string(),
            });
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(BjerknesError::Config {
                    message: format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        self.log_level
                    ),
                });
            }
        }

        if !INTERPOLATION_METHODS.contains(&self.render.resampling.as_str()) {
            return Err(BjerknesError::Config {
                message: format!(
                    "Invalid resampling method: {}. Must be one of: {}",
                    self.render.resampling,
                    INTERPOLATION_METHODS.join(", ")
                ),
            });
        }

        if self.render.format.parse::<OutputFormat>().is_err() {
            return Err(BjerknesError::Config {
                message: format!(
                    "Invalid output format: {}. Must be png or jpeg",
                    self.render.format
                ),
            });
        }

        if self.render.width == 0 || self.render.height == 0 {
            return Err(BjerknesError::Config {
                message: "Image width and height must be positive".to_string(),
            });
        }

        if self.render.gridline_spacing.is_nan() || self.render.gridline_spacing <= 0.0 {
            return Err(BjerknesError::Config {
                message: "Gridline spacing must be positive".to_string(),
            });
        }

        if !colortables::registry().contains(&self.render.colortable) {
            return Err(BjerknesError::Config {
                message: format!("Unknown default color table: {}", self.render.colortable),
            });
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            render: RenderConfig::default(),
            maps: MapsConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            format: default_format(),
            colortable: default_colortable(),
            resampling: default_resampling(),
            gridlines: true,
            colorbar: true,
            gridline_spacing: default_gridline_spacing(),
        }
    }
}

impl Default for MapsConfig {
    fn default() -> Self {
        Self {
            maps_dir: default_maps_dir(),
            sources: default_sources(),
        }
    }
}

// Default value functions for serde
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    600
}

fn default_format() -> String {
    "png".to_string()
}

fn default_colortable() -> String {
    "viridis".to_string()
}

fn default_resampling() -> String {
    "bilinear".to_string()
}

fn default_true() -> bool {
    true
}

fn default_gridline_spacing() -> f64 {
    15.0
}

fn default_maps_dir() -> PathBuf {
    PathBuf::from("maps")
}

fn default_sources() -> BTreeMap<String, String> {
    [
        ("nation", "bou1_4p"),
        ("province", "bou2_4p"),
        ("county", "BOUNT_poly"),
        ("river", "hyd1_4l"),
        ("river_high", "hyd2_4l"),
        ("coastline", "coastline"),
        ("country", "country1"),
        ("land", "ne_50m_land"),
    ]
    .into_iter()
    .map(|(name, stem)| (name.to_string(), stem.to_string()))
    .collect()
}

fn default_log_level() -> String {
    "info".to_string()
}
