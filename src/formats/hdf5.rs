//! HDF5 adapter.
//!
//! Mirrors an HDF5 file's group hierarchy into the item tree. Structure and
//! attributes are read eagerly; dataset payloads are only read when their
//! [`LazyData`] is loaded.

use std::path::Path;
use std::sync::Arc;

use hdf5::types::{FixedAscii, FixedUnicode, TypeDescriptor, VarLenAscii, VarLenUnicode};
use hdf5::{Location, LocationType};
use ndarray::ArrayD;

use crate::error::{Result, ViewerError};
use crate::file::{Container, FileFormat};
use crate::model::{
    join_path, ArraySource, AttrValue, Attribute, DType, Dataset, FileId, Group, ItemInfo,
    LazyData,
};
use crate::session::DatasetCatalog;

/// Byte capacity used to decode fixed-length string attributes.
const FIXED_STRING_CAPACITY: usize = 1024;

/// HDF5 file format handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct Hdf5Format;

impl Hdf5Format {
    /// Format name.
    pub const NAME: &'static str = "HDF5";
    /// Extensions registered by default.
    pub const EXTENSIONS: &'static [&'static str] = &["h5", "hdf5", "he5"];

    /// Create the handler.
    pub fn new() -> Self {
        Self
    }
}

impl FileFormat for Hdf5Format {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn open(&self, path: &Path) -> Result<Arc<dyn Container>> {
        let file = hdf5::File::open(path).map_err(|e| ViewerError::container_open(path, e))?;
        tracing::debug!("Opened HDF5 container {}", path.display());
        Ok(Arc::new(Hdf5Container { file }))
    }
}

/// An opened HDF5 file.
#[derive(Debug, Clone)]
pub struct Hdf5Container {
    file: hdf5::File,
}

impl Container for Hdf5Container {
    fn read_root(&self, file: FileId, catalog: &mut DatasetCatalog) -> Result<Group> {
        let mut builder = TreeBuilder {
            file,
            source: Arc::new(Hdf5Source {
                file: self.file.clone(),
            }),
            catalog,
        };
        let root = self.file.group("/")?;
        Ok(builder.build_group(&root, "/".to_string()))
    }
}

struct TreeBuilder<'c> {
    file: FileId,
    source: Arc<dyn ArraySource>,
    catalog: &'c mut DatasetCatalog,
}

impl TreeBuilder<'_> {
    fn build_group(&mut self, group: &hdf5::Group, path: String) -> Group {
        tracing::debug!("Create group {} in file {}", path, self.file);
        let mut info = ItemInfo::from_path(path.clone());
        info.attributes = read_attributes(group, &path);

        let mut groups = Vec::new();
        let mut datasets = Vec::new();

        let names = group.member_names().unwrap_or_else(|e| {
            tracing::warn!("Cannot list members of {}: {}", path, e);
            Vec::new()
        });

        for name in names {
            let child_path = join_path(&path, &name);
            match group.loc_type_by_name(&name) {
                Ok(LocationType::Group) => match group.group(&name) {
                    Ok(child) => groups.push(self.build_group(&child, child_path)),
                    Err(e) => tracing::warn!("Skip group {}: {}", child_path, e),
                },
                Ok(LocationType::Dataset) => {
                    let built = group
                        .dataset(&name)
                        .map_err(ViewerError::from)
                        .and_then(|ds| self.build_dataset(&ds, child_path.clone()));
                    match built {
                        Ok(dataset) => datasets.push(dataset),
                        Err(e) => tracing::warn!("Skip dataset {}: {}", child_path, e),
                    }
                },
                Ok(other) => tracing::trace!("Skip {} of kind {:?}", child_path, other),
                // Dangling soft or external links land here.
                Err(e) => tracing::warn!("Skip {}: {}", child_path, e),
            }
        }

        Group::new(info, self.file, groups, datasets)
    }

    fn build_dataset(&mut self, ds: &hdf5::Dataset, path: String) -> Result<Dataset> {
        tracing::debug!("Create dataset {} in file {}", path, self.file);
        let mut info = ItemInfo::from_path(path.clone());
        info.attributes = read_attributes(ds, &path);

        let shape = ds.shape();
        let maxshape = ds.space()?.maxdims();
        let dtype = ds.dtype()?.to_descriptor()?;

        let dataset = Dataset::new(
            info,
            self.file,
            shape,
            maxshape,
            dtype_of(&dtype),
            LazyData::new(Arc::clone(&self.source), path),
        );
        self.catalog.add_dataset(&dataset);
        Ok(dataset)
    }
}

fn read_attributes(loc: &Location, owner: &str) -> Vec<Attribute> {
    let names = match loc.attr_names() {
        Ok(names) => names,
        Err(e) => {
            tracing::warn!("Cannot list attributes of {}: {}", owner, e);
            return Vec::new();
        },
    };

    names
        .into_iter()
        .filter_map(|name| match loc.attr(&name) {
            Ok(attr) => Some(read_attribute(name, &attr)),
            Err(e) => {
                tracing::warn!("Skip attribute {} on {}: {}", name, owner, e);
                None
            },
        })
        .collect()
}

fn read_attribute(name: String, attr: &hdf5::Attribute) -> Attribute {
    let descriptor = attr.dtype().and_then(|t| t.to_descriptor());
    match descriptor {
        Ok(td) => {
            let data = read_attr_value(attr, &td).unwrap_or_else(|e| {
                tracing::debug!("Attribute {} kept undecoded: {}", name, e);
                AttrValue::Opaque(describe(&td))
            });
            Attribute::new(name, attr.shape(), dtype_of(&td), data)
        },
        Err(e) => Attribute::from_value(name, AttrValue::Opaque(e.to_string())),
    }
}

fn read_attr_value(attr: &hdf5::Attribute, td: &TypeDescriptor) -> hdf5::Result<AttrValue> {
    let value = match td {
        TypeDescriptor::Boolean => AttrValue::Bool(attr.read_raw::<bool>()?),
        TypeDescriptor::Integer(_) => AttrValue::Int(attr.read_raw::<i64>()?),
        TypeDescriptor::Unsigned(_) => AttrValue::UInt(attr.read_raw::<u64>()?),
        TypeDescriptor::Float(_) => AttrValue::Float(attr.read_raw::<f64>()?),
        TypeDescriptor::VarLenUnicode => AttrValue::Text(
            attr.read_raw::<VarLenUnicode>()?
                .iter()
                .map(|s| s.as_str().to_string())
                .collect(),
        ),
        TypeDescriptor::VarLenAscii => AttrValue::Text(
            attr.read_raw::<VarLenAscii>()?
                .iter()
                .map(|s| s.as_str().to_string())
                .collect(),
        ),
        TypeDescriptor::FixedAscii(n) | TypeDescriptor::FixedUnicode(n)
            if *n > FIXED_STRING_CAPACITY =>
        {
            // Reading into the smaller buffer would truncate silently.
            AttrValue::Opaque(describe(td))
        },
        TypeDescriptor::FixedUnicode(_) => AttrValue::Text(
            attr.read_raw::<FixedUnicode<FIXED_STRING_CAPACITY>>()?
                .iter()
                .map(|s| s.as_str().to_string())
                .collect(),
        ),
        TypeDescriptor::FixedAscii(_) => AttrValue::Text(
            attr.read_raw::<FixedAscii<FIXED_STRING_CAPACITY>>()?
                .iter()
                .map(|s| s.as_str().to_string())
                .collect(),
        ),
        other => AttrValue::Opaque(describe(other)),
    };
    Ok(value)
}

/// Map an HDF5 type descriptor to the model's element type.
pub(crate) fn dtype_of(td: &TypeDescriptor) -> DType {
    match td {
        TypeDescriptor::Boolean => DType::Bool,
        TypeDescriptor::Integer(_) => DType::Int(td.size()),
        TypeDescriptor::Unsigned(_) => DType::UInt(td.size()),
        TypeDescriptor::Float(_) => DType::Float(td.size()),
        TypeDescriptor::FixedAscii(n) => DType::String {
            len: Some(*n),
            unicode: false,
        },
        TypeDescriptor::FixedUnicode(n) => DType::String {
            len: Some(*n),
            unicode: true,
        },
        TypeDescriptor::VarLenAscii => DType::String {
            len: None,
            unicode: false,
        },
        TypeDescriptor::VarLenUnicode => DType::String {
            len: None,
            unicode: true,
        },
        other => DType::Other(describe(other)),
    }
}

fn describe(td: &TypeDescriptor) -> String {
    match td {
        TypeDescriptor::Enum(_) => "enum".to_string(),
        TypeDescriptor::Compound(_) => "compound".to_string(),
        TypeDescriptor::FixedArray(inner, n) => format!("[{}; {}]", describe(inner), n),
        TypeDescriptor::VarLenArray(inner) => format!("vlen<{}>", describe(inner)),
        TypeDescriptor::Boolean
        | TypeDescriptor::Integer(_)
        | TypeDescriptor::Unsigned(_)
        | TypeDescriptor::Float(_)
        | TypeDescriptor::FixedAscii(_)
        | TypeDescriptor::FixedUnicode(_)
        | TypeDescriptor::VarLenAscii
        | TypeDescriptor::VarLenUnicode => dtype_of(td).to_string(),
        #[allow(unreachable_patterns)]
        other => format!("{:?}", other),
    }
}

/// Payload reader sharing the container handle.
#[derive(Debug)]
struct Hdf5Source {
    file: hdf5::File,
}

impl ArraySource for Hdf5Source {
    fn load(&self, path: &str) -> Result<ArrayD<f64>> {
        let read_err = |e: hdf5::Error| ViewerError::data_read(path, e);

        let ds = self.file.dataset(path).map_err(read_err)?;
        let td = ds.dtype().and_then(|t| t.to_descriptor()).map_err(read_err)?;

        match dtype_of(&td) {
            DType::Bool => {
                let values: Vec<f64> = ds
                    .read_raw::<bool>()
                    .map_err(read_err)?
                    .into_iter()
                    .map(|b| if b { 1.0 } else { 0.0 })
                    .collect();
                Ok(ArrayD::from_shape_vec(ds.shape(), values)?)
            },
            dtype if dtype.is_numeric() => ds.read_dyn::<f64>().map_err(read_err),
            DType::String { .. } => Err(ViewerError::data_read(
                path,
                "Character/string data cannot be visualized",
            )),
            dtype => Err(ViewerError::data_read(
                path,
                format!("Unsupported data type: {}", dtype),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Item;
    use hdf5::types::{FloatSize, IntSize};

    #[test]
    fn descriptors_map_to_model_types() {
        assert_eq!(dtype_of(&TypeDescriptor::Float(FloatSize::U8)), DType::Float(8));
        assert_eq!(dtype_of(&TypeDescriptor::Integer(IntSize::U4)), DType::Int(4));
        assert_eq!(dtype_of(&TypeDescriptor::Unsigned(IntSize::U1)), DType::UInt(1));
        assert_eq!(dtype_of(&TypeDescriptor::Boolean), DType::Bool);
        assert_eq!(
            dtype_of(&TypeDescriptor::FixedAscii(8)),
            DType::String {
                len: Some(8),
                unicode: false
            }
        );
        assert_eq!(
            dtype_of(&TypeDescriptor::VarLenArray(Box::new(TypeDescriptor::Float(
                FloatSize::U4
            )))),
            DType::Other("vlen<float32>".to_string())
        );
    }

    #[test]
    fn oversized_fixed_strings_stay_opaque() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("strings.h5");
        {
            let file = hdf5::File::create(&path).unwrap();
            let long = FixedAscii::<2000>::from_ascii(&[b'x'; 2000]).unwrap();
            file.new_attr::<FixedAscii<2000>>()
                .create("long")
                .unwrap()
                .write_scalar(&long)
                .unwrap();
            let short = FixedAscii::<8>::from_ascii(b"meters").unwrap();
            file.new_attr::<FixedAscii<8>>()
                .create("short")
                .unwrap()
                .write_scalar(&short)
                .unwrap();
        }

        let container = Hdf5Format::new().open(&path).unwrap();
        let root = container
            .read_root(FileId::new(), &mut DatasetCatalog::new())
            .unwrap();

        let long = root.attribute("long").unwrap();
        assert_eq!(long.data, AttrValue::Opaque("|S2000".to_string()));
        assert_eq!(
            long.dtype,
            DType::String {
                len: Some(2000),
                unicode: false
            }
        );
        assert_eq!(root.attribute("short").unwrap().data.as_str(), Some("meters"));
    }

    #[test]
    fn open_rejects_non_hdf5_bytes() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("fake.h5");
        std::fs::write(&path, b"definitely not hdf5").unwrap();
        let err = Hdf5Format::new().open(&path).unwrap_err();
        assert!(matches!(err, ViewerError::ContainerOpen { .. }));
    }
}
