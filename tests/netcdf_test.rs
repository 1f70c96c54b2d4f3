//! Loading the synoptic test dataset back from NetCDF.

#![cfg(feature = "netcdf")]

mod common;

use common::{image_utils, test_data};

use bjerknes::charts::synoptic::render_product;
use bjerknes::charts::{ChartData, SynopticOptions, SynopticProduct, SynopticVariables};
use bjerknes::data_loader::load_netcdf;
use bjerknes::render::OutputFormat;
use bjerknes::state::GridSelector;

#[test]
fn test_load_written_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("synoptic.nc");
    test_data::create_synoptic_nc(&path).unwrap();

    let dataset = load_netcdf(&path).unwrap();
    assert_eq!(dataset.metadata.dimensions["level"].size, 2);
    assert_eq!(dataset.metadata.coordinates["lat"].len(), test_data::lats().len());

    let t2m = dataset.grid("t2m", &GridSelector::at_time(1)).unwrap();
    let (lo, hi) = t2m.value_range().unwrap();
    assert!((hi - 36.0).abs() < 1e-4);
    assert!((lo - (36.0 - 0.8 * 65.0)).abs() < 1e-3);
}

#[test]
fn test_render_from_netcdf() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("synoptic.nc");
    test_data::create_synoptic_nc(&path).unwrap();
    let dataset = load_netcdf(&path).unwrap();

    let options = SynopticOptions {
        width: 320,
        height: 240,
        ..SynopticOptions::default()
    };
    let canvas = render_product(
        SynopticProduct::Uv850,
        &ChartData::new(&dataset, GridSelector::default()),
        &SynopticVariables::default(),
        &options,
    )
    .unwrap();
    let img = image_utils::decode(&canvas.encode(OutputFormat::Png).unwrap());
    assert!(image_utils::count_painted(&img) > 320 * 240 / 4);
}
