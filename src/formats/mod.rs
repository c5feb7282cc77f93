//! Built-in container formats.
//!
//! Each format implements [`FileFormat`](crate::FileFormat) and is plugged
//! into a [`FileFactory`](crate::FileFactory) by extension.

mod hdf5;
mod netcdf;

pub use self::hdf5::{Hdf5Container, Hdf5Format};
pub use self::netcdf::{NetcdfContainer, NetcdfFormat};
