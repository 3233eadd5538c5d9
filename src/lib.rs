//! A small k-means clustering library.
//!
//! Points are parsed from comma-separated rows into [`Vector`]s and
//! partitioned with Lloyd's algorithm: assign every point to its nearest
//! centroid by Euclidean distance, recompute each centroid as the mean of
//! its members, repeat until the centroid list stops moving or the
//! iteration cap is reached.

pub mod dataset;
pub mod error;
pub mod kmeans;
pub mod vector;

pub use dataset::DataSet;
pub use error::{KMeansError, Result};
pub use kmeans::{InitStrategy, KMeans, KMeansConfig, KMeansFit, CENTROID_DECIMALS};
pub use vector::Vector;
