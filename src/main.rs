//! bjerknes - meteorological chart rendering
//!
//! Command-line entry point: render charts to files, list color tables or
//! serve charts over HTTP.

use anyhow::{bail, Context};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info};

use bjerknes::boundaries::BoundaryCatalog;
use bjerknes::charts::synoptic::render_product;
use bjerknes::charts::{
    ChartData, FieldRequest, ModelTime, Overlay, SynopticOptions, SynopticProduct,
    SynopticVariables,
};
use bjerknes::colortables;
use bjerknes::config::{Command, RenderArgs, SynopticArgs, TablesArgs};
use bjerknes::geography::requested_extent;
use bjerknes::logging::{
    init_tracing, log_chart_rendered, log_error, log_operation_end, log_operation_start,
    log_timed_operation,
};
use bjerknes::server;
use bjerknes::state::{AppState, Dataset, GridSelector};
use bjerknes::{BjerknesError, Config};

fn main() -> anyhow::Result<()> {
    let (config, command) = Config::load()?;
    init_tracing(&config.log_level);
    info!("Starting bjerknes v{}", env!("CARGO_PKG_VERSION"));

    config.validate().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;

    let result = match command {
        Command::Render(args) => render(&config, &args),
        Command::Synoptic(args) => synoptic(&config, &args),
        Command::Tables(args) => tables(&args),
        Command::Serve(args) => {
            let dataset = args.file.as_deref().map(load_dataset).transpose()?;
            serve(config, dataset)
        }
    };
    if let Some(e) = result.as_ref().err().and_then(|e| e.downcast_ref::<BjerknesError>()) {
        log_error(e, "command failed");
    }
    result
}

#[cfg(feature = "netcdf")]
fn load_dataset(path: &Path) -> anyhow::Result<Dataset> {
    use bjerknes::logging::log_dataset_stats;

    info!("Loading NetCDF file: {:?}", path);
    let dataset = log_timed_operation("load_netcdf", || bjerknes::data_loader::load_netcdf(path))
        .with_context(|| format!("failed to load {}", path.display()))?;
    log_dataset_stats(&path.to_string_lossy(), &dataset);
    Ok(dataset)
}

#[cfg(not(feature = "netcdf"))]
fn load_dataset(path: &Path) -> anyhow::Result<Dataset> {
    bail!(
        "cannot read {}: bjerknes was built without NetCDF support",
        path.display()
    )
}

fn render(config: &Config, args: &RenderArgs) -> anyhow::Result<()> {
    let start = Instant::now();
    let dataset = load_dataset(&args.file)?;
    let catalog = BoundaryCatalog::new(config.maps.clone());

    let request = FieldRequest {
        var: args.var.clone(),
        time_index: args.time_index,
        level_index: args.level_index,
        level: args.level,
        colortable: args.colortable.clone(),
        resampling: args.resampling.clone(),
        region: args.image.region.clone(),
        bbox: args.image.bbox.clone(),
        mask: args.mask.clone(),
        mask_attribute: args.mask_attribute.clone(),
        mask_values: args.mask_value.clone(),
        boundaries: args.boundaries.clone(),
        contour_var: args.contour_var.clone(),
        contour_interval: args.contour_interval,
        width: args.image.width,
        height: args.image.height,
        gridlines: None,
        colorbar: None,
    };
    let canvas = request.render(&dataset, &catalog, &config.render)?;
    canvas.save(&args.output)?;

    let bytes = std::fs::metadata(&args.output).map(|m| m.len() as usize).unwrap_or(0);
    let region = args
        .image
        .region
        .as_deref()
        .or(args.image.bbox.as_deref())
        .unwrap_or("data");
    let colortable = args.colortable.as_deref().unwrap_or(&config.render.colortable);
    log_chart_rendered(&args.var, colortable, region, bytes, start);
    println!("{}", args.output.display());
    Ok(())
}

fn synoptic(config: &Config, args: &SynopticArgs) -> anyhow::Result<()> {
    let start = Instant::now();
    let product: SynopticProduct = args.product.parse()?;
    log_operation_start("synoptic", Some(product.name()));
    let output = synoptic_output(product, args)?;

    let dataset = load_dataset(&args.file)?;
    let catalog = BoundaryCatalog::new(config.maps.clone());

    let defaults = SynopticOptions::default();
    let options = SynopticOptions {
        extent: requested_extent(args.image.region.as_deref(), args.image.bbox.as_deref())?,
        width: args.image.width.unwrap_or(defaults.width),
        height: args.image.height.unwrap_or(defaults.height),
        background: Overlay::background(&catalog, &["land"])?,
        overlays: Overlay::background(&catalog, &["coastline", "province"])?,
        ..defaults
    };
    let vars = SynopticVariables {
        gh: args.gh.clone(),
        u: args.u.clone(),
        v: args.v.clone(),
        mslp: args.mslp.clone(),
        theta_e: args.theta_e.clone(),
        theta: args.theta.clone(),
        gh_level: args.gh_level,
        wind_level: args.wind_level,
    };
    let selector = GridSelector {
        time_index: args.time_index,
        ..Default::default()
    };

    let rendered = render_product(product, &ChartData::new(&dataset, selector), &vars, &options);
    log_operation_end("synoptic", start, rendered.is_ok());
    let canvas = rendered?;
    if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("cannot create output directory {}", dir.display()))?;
    }
    canvas.save(&output)?;

    let bytes = std::fs::metadata(&output).map(|m| m.len() as usize).unwrap_or(0);
    let region = options
        .extent
        .map(|e| e.to_string())
        .unwrap_or_else(|| product.default_extent().to_string());
    log_chart_rendered(product.name(), "synoptic", &region, bytes, start);
    println!("{}", output.display());
    Ok(())
}

/// Output path of a synoptic chart: `--output`, or a name built from the
/// product and model time inside `--output-dir`.
fn synoptic_output(product: SynopticProduct, args: &SynopticArgs) -> anyhow::Result<PathBuf> {
    match (&args.output, &args.output_dir) {
        (Some(path), _) => Ok(path.clone()),
        (None, Some(dir)) => {
            let Some(init) = args.init.as_deref() else {
                bail!("--output-dir needs the model initial time (--init YYYYMMDDHH)");
            };
            let time = ModelTime::parse(init, args.fhour)?;
            Ok(dir.join(time.file_name(product.name(), "png")))
        }
        (None, None) => bail!("either --output or --output-dir is required"),
    }
}

fn tables(args: &TablesArgs) -> anyhow::Result<()> {
    if let Some(name) = &args.name {
        let table = colortables::get_color_table(name)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&table.bins())?);
        } else {
            for bin in table.bins() {
                println!("{:>12} {:>12}  {}", bin.lower, bin.upper, bin.color);
            }
        }
        return Ok(());
    }

    let tables = colortables::registry().describe();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&tables)?);
    } else {
        for table in tables {
            println!(
                "{:<36} {:<12} {:>4}  {}",
                table.name, table.kind, table.levels, table.description
            );
        }
    }
    Ok(())
}

fn serve(config: Config, dataset: Option<Dataset>) -> anyhow::Result<()> {
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    if let Some(workers) = config.server.workers {
        builder.worker_threads(workers);
    }
    let runtime = builder.enable_all().build()?;

    let state = AppState::new_shared(config, dataset);
    runtime.block_on(server::serve(state))?;
    Ok(())
}
