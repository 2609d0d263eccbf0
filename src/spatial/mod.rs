pub mod clustering;
pub mod index;
pub mod sizing;

pub use clustering::{ClusterNode, ClusterSet, Clustering};
pub use index::{SpatialIndex, SpatialItem};
pub use sizing::{ClusterIcon, ClusterSizer, SizeClass};
