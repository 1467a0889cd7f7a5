//! Persistence helpers for result arrays.

use std::path::Path;
use ndarray as nd;
use ndarray_npy::{ ReadableElement, WritableElement };
use crate::error::Result;

/// Write an array to a `.npy` file, creating parent directories as needed.
pub fn write_npy<P, A, D>(path: P, array: &nd::Array<A, D>) -> Result<()>
where
    P: AsRef<Path>,
    A: WritableElement,
    D: nd::Dimension,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    ndarray_npy::write_npy(path, array)?;
    Ok(())
}

/// Read a 2D array from a `.npy` file.
pub fn read_npy2<P, A>(path: P) -> Result<nd::Array2<A>>
where
    P: AsRef<Path>,
    A: ReadableElement,
{
    Ok(ndarray_npy::read_npy(path)?)
}
