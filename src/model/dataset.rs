//! Datasets: leaf items describing an N-dimensional array.

use std::fmt;
use std::sync::Arc;

use ndarray::ArrayD;

use super::{DType, FileId, Item, ItemInfo};
use crate::error::Result;

/// Backend capable of fetching a dataset payload by its internal path.
///
/// Implementations hold the opened container handle, so every [`LazyData`]
/// keeps the container alive until it is dropped.
pub trait ArraySource: fmt::Debug {
    /// Read the whole payload at `path`, converted to `f64`.
    fn load(&self, path: &str) -> Result<ArrayD<f64>>;
}

/// Deferred accessor for a dataset payload.
#[derive(Clone)]
pub struct LazyData {
    source: Arc<dyn ArraySource>,
    path: String,
}

impl LazyData {
    /// Bind an accessor to `path` on `source`.
    pub fn new(source: Arc<dyn ArraySource>, path: impl Into<String>) -> Self {
        Self {
            source,
            path: path.into(),
        }
    }

    /// Internal container path the accessor reads from.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Fetch the payload. Blocks on container I/O.
    pub fn load(&self) -> Result<ArrayD<f64>> {
        tracing::debug!("Load data for {}", self.path);
        self.source.load(&self.path)
    }
}

impl fmt::Debug for LazyData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyData")
            .field("path", &self.path)
            .field("source", &self.source)
            .finish()
    }
}

/// Kind of plot a dataset can be shown with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotKind {
    /// 1-D line plot (rows stacked for higher ranks).
    Line,
    /// 2-D image.
    Image,
    /// Series of images along the leading axes.
    Series,
}

/// A leaf item describing a concrete data array.
#[derive(Debug, Clone)]
pub struct Dataset {
    info: ItemInfo,
    file: FileId,
    shape: Vec<usize>,
    maxshape: Vec<Option<usize>>,
    dtype: DType,
    data: LazyData,
}

impl Dataset {
    /// Create a dataset. `maxshape` entries are `None` for unbounded axes.
    pub fn new(
        info: ItemInfo,
        file: FileId,
        shape: Vec<usize>,
        maxshape: Vec<Option<usize>>,
        dtype: DType,
        data: LazyData,
    ) -> Self {
        Self {
            info,
            file,
            shape,
            maxshape,
            dtype,
            data,
        }
    }

    /// Id of the owning file.
    pub fn file_id(&self) -> FileId {
        self.file
    }

    /// Current extents.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Maximum extents; `None` means unbounded.
    pub fn maxshape(&self) -> &[Option<usize>] {
        &self.maxshape
    }

    /// Element type.
    pub fn dtype(&self) -> &DType {
        &self.dtype
    }

    /// Lazy payload accessor.
    pub fn data(&self) -> &LazyData {
        &self.data
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    /// Whether the dataset has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Plot kinds applicable to this dataset's rank.
    pub fn plot_kinds(&self) -> Vec<PlotKind> {
        match self.ndim() {
            0 => vec![],
            1 => vec![PlotKind::Line],
            2 => vec![PlotKind::Line, PlotKind::Image],
            _ => vec![PlotKind::Line, PlotKind::Image, PlotKind::Series],
        }
    }
}

impl Item for Dataset {
    fn info(&self) -> &ItemInfo {
        &self.info
    }
}

/// Datasets compare by identity.
impl PartialEq for Dataset {
    fn eq(&self, other: &Self) -> bool {
        self.info.id == other.info.id
    }
}

impl Eq for Dataset {}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.info.name)?;
        match self.shape.as_slice() {
            [] => write!(f, "()")?,
            [n] => write!(f, "({},)", n)?,
            dims => {
                let dims: Vec<String> = dims.iter().map(|d| d.to_string()).collect();
                write!(f, "({})", dims.join(", "))?;
            },
        }
        write!(f, " {}", self.dtype)
    }
}
