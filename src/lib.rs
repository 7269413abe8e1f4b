#[cfg(test)]
#[macro_use]
extern crate assert_approx_eq;

pub type LabelVec = Vec<bool>;
pub type DenseVecView<'a> = ndarray::ArrayView1<'a, f32>;
pub type DenseMat = ndarray::Array2<f32>;
pub type DataSet = data::DataSet;
pub type HyperParam = reduce::HyperParam;
pub use error::{Error, Result};
pub use reduce::{Decomposition, FitnessPoint, Reduction};
pub use selection::{GraphOrder, Selector};

pub mod data;
pub mod editing;
mod error;
pub mod local_set;
mod metric;
pub mod neighbors;
pub mod oracle;
pub mod reduce;
pub mod selection;
mod util;

