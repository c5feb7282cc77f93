//! netCDF adapter.
//!
//! Groups become [`Group`]s and variables become [`Dataset`]s. Dimensions
//! are not items of their own; they only show up in dataset shapes.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ndarray::{ArrayD, IxDyn};
use netcdf::types::{FloatType, IntType, NcVariableType};
use netcdf::AttributeValue;

use crate::error::{Result, ViewerError};
use crate::file::{Container, FileFormat};
use crate::model::{
    join_path, ArraySource, AttrValue, Attribute, DType, Dataset, FileId, Group, ItemInfo,
    LazyData,
};
use crate::session::DatasetCatalog;

/// netCDF file format handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct NetcdfFormat;

impl NetcdfFormat {
    /// Format name.
    pub const NAME: &'static str = "netCDF";
    /// Extensions registered by default.
    pub const EXTENSIONS: &'static [&'static str] = &["nc", "nc4", "netcdf"];
}

impl FileFormat for NetcdfFormat {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn open(&self, path: &Path) -> Result<Arc<dyn Container>> {
        let file = netcdf::open(path).map_err(|e| ViewerError::container_open(path, e))?;
        Ok(Arc::new(NetcdfContainer {
            path: path.to_path_buf(),
            file: Arc::new(file),
        }))
    }
}

/// An opened netCDF file.
pub struct NetcdfContainer {
    path: PathBuf,
    file: Arc<netcdf::File>,
}

impl fmt::Debug for NetcdfContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetcdfContainer")
            .field("path", &self.path)
            .finish()
    }
}

impl Container for NetcdfContainer {
    fn read_root(&self, file: FileId, catalog: &mut DatasetCatalog) -> Result<Group> {
        let source: Arc<dyn ArraySource> = Arc::new(NetcdfSource {
            file: Arc::clone(&self.file),
        });
        let mut builder = TreeBuilder {
            file,
            source,
            catalog,
        };

        let nc = &self.file;
        let mut info = ItemInfo::new("", "/");
        info.attributes = nc.attributes().map(|a| read_attribute(&a)).collect();

        let datasets = nc
            .variables()
            .map(|var| builder.build_dataset(&var, "/"))
            .collect();

        let groups = match nc.groups() {
            Ok(groups) => groups.map(|g| builder.build_group(&g, "/")).collect(),
            // Classic-model files have no groups.
            Err(_) => Vec::new(),
        };

        Ok(Group::new(info, file, groups, datasets))
    }
}

struct TreeBuilder<'c> {
    file: FileId,
    source: Arc<dyn ArraySource>,
    catalog: &'c mut DatasetCatalog,
}

impl TreeBuilder<'_> {
    fn build_group(&mut self, group: &netcdf::Group<'_>, parent_path: &str) -> Group {
        let group_path = join_path(parent_path, &group.name());
        tracing::debug!("Create group {} in file {}", group_path, self.file);

        let mut info = ItemInfo::from_path(group_path.clone());
        info.attributes = group.attributes().map(|a| read_attribute(&a)).collect();

        let datasets = group
            .variables()
            .map(|var| self.build_dataset(&var, &group_path))
            .collect();

        let groups = group
            .groups()
            .map(|child| self.build_group(&child, &group_path))
            .collect();

        Group::new(info, self.file, groups, datasets)
    }

    fn build_dataset(&mut self, var: &netcdf::Variable<'_>, parent_path: &str) -> Dataset {
        let var_path = join_path(parent_path, &var.name());
        tracing::debug!("Create dataset {} in file {}", var_path, self.file);

        let mut info = ItemInfo::from_path(var_path.clone());
        info.attributes = var.attributes().map(|a| read_attribute(&a)).collect();

        let dims = var.dimensions();
        let shape = dims.iter().map(|d| d.len()).collect();
        let maxshape = dims
            .iter()
            .map(|d| if d.is_unlimited() { None } else { Some(d.len()) })
            .collect();

        let dataset = Dataset::new(
            info,
            self.file,
            shape,
            maxshape,
            dtype_of(&var.vartype()),
            LazyData::new(Arc::clone(&self.source), var_path),
        );
        self.catalog.add_dataset(&dataset);
        dataset
    }
}

/// netCDF attributes carry no shape of their own, so shape and dtype are
/// derived from the decoded value.
fn read_attribute(attr: &netcdf::Attribute<'_>) -> Attribute {
    let value = match attr.value() {
        Ok(AttributeValue::Uchar(v)) => AttrValue::UInt(vec![v.into()]),
        Ok(AttributeValue::Schar(v)) => AttrValue::Int(vec![v.into()]),
        Ok(AttributeValue::Ushort(v)) => AttrValue::UInt(vec![v.into()]),
        Ok(AttributeValue::Short(v)) => AttrValue::Int(vec![v.into()]),
        Ok(AttributeValue::Uint(v)) => AttrValue::UInt(vec![v.into()]),
        Ok(AttributeValue::Int(v)) => AttrValue::Int(vec![v.into()]),
        Ok(AttributeValue::Ulonglong(v)) => AttrValue::UInt(vec![v]),
        Ok(AttributeValue::Longlong(v)) => AttrValue::Int(vec![v]),
        Ok(AttributeValue::Float(v)) => AttrValue::Float(vec![v.into()]),
        Ok(AttributeValue::Double(v)) => AttrValue::Float(vec![v]),
        Ok(AttributeValue::Str(v)) => AttrValue::Text(vec![v]),
        Ok(AttributeValue::Uchars(v)) => AttrValue::UInt(v.into_iter().map(u64::from).collect()),
        Ok(AttributeValue::Schars(v)) => AttrValue::Int(v.into_iter().map(i64::from).collect()),
        Ok(AttributeValue::Ushorts(v)) => AttrValue::UInt(v.into_iter().map(u64::from).collect()),
        Ok(AttributeValue::Shorts(v)) => AttrValue::Int(v.into_iter().map(i64::from).collect()),
        Ok(AttributeValue::Uints(v)) => AttrValue::UInt(v.into_iter().map(u64::from).collect()),
        Ok(AttributeValue::Ints(v)) => AttrValue::Int(v.into_iter().map(i64::from).collect()),
        Ok(AttributeValue::Ulonglongs(v)) => AttrValue::UInt(v),
        Ok(AttributeValue::Longlongs(v)) => AttrValue::Int(v),
        Ok(AttributeValue::Floats(v)) => AttrValue::Float(v.into_iter().map(f64::from).collect()),
        Ok(AttributeValue::Doubles(v)) => AttrValue::Float(v),
        Ok(AttributeValue::Strs(v)) => AttrValue::Text(v),
        #[allow(unreachable_patterns)]
        Ok(other) => AttrValue::Opaque(format!("{:?}", other)),
        Err(e) => {
            tracing::debug!("Attribute {} kept undecoded: {}", attr.name(), e);
            AttrValue::Opaque(e.to_string())
        },
    };
    Attribute::from_value(attr.name(), value)
}

fn dtype_of(vartype: &NcVariableType) -> DType {
    match vartype {
        NcVariableType::Int(IntType::I8) => DType::Int(1),
        NcVariableType::Int(IntType::I16) => DType::Int(2),
        NcVariableType::Int(IntType::I32) => DType::Int(4),
        NcVariableType::Int(IntType::I64) => DType::Int(8),
        NcVariableType::Int(IntType::U8) => DType::UInt(1),
        NcVariableType::Int(IntType::U16) => DType::UInt(2),
        NcVariableType::Int(IntType::U32) => DType::UInt(4),
        NcVariableType::Int(IntType::U64) => DType::UInt(8),
        NcVariableType::Float(FloatType::F32) => DType::Float(4),
        NcVariableType::Float(FloatType::F64) => DType::Float(8),
        NcVariableType::Char => DType::String {
            len: Some(1),
            unicode: false,
        },
        NcVariableType::String => DType::String {
            len: None,
            unicode: true,
        },
        other => DType::Other(
            format!("{:?}", other)
                .replace("NcVariableType::", "")
                .to_lowercase(),
        ),
    }
}

/// Payload reader sharing the container handle.
struct NetcdfSource {
    file: Arc<netcdf::File>,
}

impl fmt::Debug for NetcdfSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetcdfSource").finish_non_exhaustive()
    }
}

macro_rules! read_as_f64 {
    ($var:expr, $path:expr, $t:ty) => {{
        let values: Vec<$t> = $var
            .get_values(..)
            .map_err(|e| ViewerError::data_read($path, e))?;
        values.into_iter().map(|x| x as f64).collect::<Vec<f64>>()
    }};
}

impl ArraySource for NetcdfSource {
    fn load(&self, path: &str) -> Result<ArrayD<f64>> {
        // Group variables are addressed without the leading slash.
        let nc_path = path.trim_start_matches('/');
        let var = self
            .file
            .variable(nc_path)
            .ok_or_else(|| ViewerError::data_read(path, "variable not found"))?;
        let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();

        let values = match var.vartype() {
            NcVariableType::Float(FloatType::F64) => read_as_f64!(var, path, f64),
            NcVariableType::Float(FloatType::F32) => read_as_f64!(var, path, f32),
            NcVariableType::Int(IntType::I64) => read_as_f64!(var, path, i64),
            NcVariableType::Int(IntType::I32) => read_as_f64!(var, path, i32),
            NcVariableType::Int(IntType::I16) => read_as_f64!(var, path, i16),
            NcVariableType::Int(IntType::I8) => read_as_f64!(var, path, i8),
            NcVariableType::Int(IntType::U64) => read_as_f64!(var, path, u64),
            NcVariableType::Int(IntType::U32) => read_as_f64!(var, path, u32),
            NcVariableType::Int(IntType::U16) => read_as_f64!(var, path, u16),
            NcVariableType::Int(IntType::U8) => read_as_f64!(var, path, u8),
            NcVariableType::Char | NcVariableType::String => {
                return Err(ViewerError::data_read(
                    path,
                    "Character/string data cannot be visualized",
                ));
            },
            other => {
                return Err(ViewerError::data_read(
                    path,
                    format!("Unsupported variable type: {:?}", other),
                ));
            },
        };

        Ok(ArrayD::from_shape_vec(IxDyn(&shape), values)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variable_types_map_to_model_types() {
        assert_eq!(dtype_of(&NcVariableType::Float(FloatType::F32)), DType::Float(4));
        assert_eq!(dtype_of(&NcVariableType::Int(IntType::U16)), DType::UInt(2));
        assert!(dtype_of(&NcVariableType::String).is_string());
    }

    #[test]
    fn open_rejects_garbage() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("fake.nc");
        std::fs::write(&path, b"not a netcdf file").unwrap();
        let err = NetcdfFormat.open(&path).unwrap_err();
        assert!(matches!(err, ViewerError::ContainerOpen { .. }));
    }
}
