//! Fixture files shared by the integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::str::FromStr;

use hdf5::types::VarLenUnicode;
use tempfile::TempDir;

/// Route library logs to the test harness. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn varlen(value: &str) -> anyhow::Result<VarLenUnicode> {
    VarLenUnicode::from_str(value).map_err(|e| anyhow::anyhow!("invalid utf-8 attribute: {e}"))
}

/// Write a small HDF5 file:
///
/// ```text
/// /                     title = "sample"
/// /groupA               (no attributes)
/// /groupA/dataset1      float64 (10,)   units = "meters"
/// /groupA/dataset2      int32 (4, 4)    valid_range = [0, 15]
/// /groupA/nested        (empty group)
/// /events               float32 (0,) resizable
/// /flag                 bool scalar
/// ```
pub fn write_sample_h5(path: &Path) -> anyhow::Result<()> {
    let file = hdf5::File::create(path)?;
    file.new_attr::<VarLenUnicode>()
        .create("title")?
        .write_scalar(&varlen("sample")?)?;

    let group_a = file.create_group("groupA")?;
    group_a.create_group("nested")?;

    let dataset1 = group_a.new_dataset::<f64>().shape(10).create("dataset1")?;
    let ramp: Vec<f64> = (0..10).map(f64::from).collect();
    dataset1.write_raw(&ramp)?;
    dataset1
        .new_attr::<VarLenUnicode>()
        .create("units")?
        .write_scalar(&varlen("meters")?)?;

    let dataset2 = group_a.new_dataset::<i32>().shape((4, 4)).create("dataset2")?;
    let grid: Vec<i32> = (0..16).collect();
    dataset2.write_raw(&grid)?;
    dataset2
        .new_attr::<i32>()
        .shape(2)
        .create("valid_range")?
        .write_raw(&[0, 15])?;

    file.new_dataset::<f32>()
        .shape((0..,))
        .chunk((16,))
        .create("events")?;

    file.new_dataset::<bool>()
        .shape(())
        .create("flag")?
        .write_scalar(&true)?;

    Ok(())
}

/// Write an HDF5 file with a single dataset `/values` of length `len`.
pub fn write_flat_h5(path: &Path, len: usize) -> anyhow::Result<()> {
    let file = hdf5::File::create(path)?;
    let values: Vec<f64> = (0..len).map(|i| i as f64 * 0.5).collect();
    file.new_dataset::<f64>()
        .shape(len)
        .create("values")?
        .write_raw(&values)?;
    Ok(())
}

/// Write a small netCDF-4 file:
///
/// ```text
/// /                     title = "climate"
/// /time                 float64 (0,) unlimited   units = "days"
/// /temperature          float32 (3, 2)
/// /surface/pressure     int32 (2,)
/// ```
pub fn write_sample_nc(path: &Path) -> anyhow::Result<()> {
    let mut file = netcdf::create(path)?;
    file.add_attribute("title", "climate")?;
    file.add_unlimited_dimension("time")?;
    file.add_dimension("lat", 3)?;
    file.add_dimension("lon", 2)?;

    {
        let mut time = file.add_variable::<f64>("time", &["time"])?;
        time.put_attribute("units", "days")?;
    }
    {
        let mut temperature = file.add_variable::<f32>("temperature", &["lat", "lon"])?;
        temperature.put_values(&[280.0f32, 281.0, 282.0, 283.0, 284.0, 285.0], ..)?;
    }
    {
        let mut surface = file.add_group("surface")?;
        surface.add_dimension("station", 2)?;
        let mut pressure = surface.add_variable::<i32>("pressure", &["station"])?;
        pressure.put_values(&[1013, 1009], ..)?;
    }

    Ok(())
}

/// Temporary directory holding fixture files.
pub struct Fixtures {
    dir: TempDir,
}

impl Fixtures {
    pub fn new() -> Self {
        init_tracing();
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn sample_h5(&self, name: &str) -> PathBuf {
        let path = self.path(name);
        write_sample_h5(&path).expect("write sample HDF5 file");
        path
    }

    pub fn flat_h5(&self, name: &str, len: usize) -> PathBuf {
        let path = self.path(name);
        write_flat_h5(&path, len).expect("write flat HDF5 file");
        path
    }

    pub fn sample_nc(&self, name: &str) -> PathBuf {
        let path = self.path(name);
        write_sample_nc(&path).expect("write sample netCDF file");
        path
    }

    pub fn garbage(&self, name: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, b"this is not a container file").expect("write garbage file");
        path
    }
}
