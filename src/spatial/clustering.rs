use crate::prelude::HashMap;
use crate::{
    core::{
        config::ClusteringConfig,
        geo::{LatLng, Point},
    },
    spatial::{
        index::{SpatialIndex, SpatialItem},
        sizing::{ClusterIcon, ClusterSizer},
    },
    traits::MapEngine,
};

/// A group of markers drawn as one icon
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterNode {
    /// Markers in this cluster, always at least one
    pub child_count: usize,
    /// Markers in the whole set at clustering time
    pub total_marker_count: usize,
    /// Mean member position in pixels at the clustering zoom
    pub center: Point,
    /// `center` unprojected
    pub position: LatLng,
    /// Indices into the clustered marker list, ascending
    pub members: Vec<usize>,
}

impl ClusterNode {
    pub fn is_single(&self) -> bool {
        self.child_count == 1
    }

    pub fn icon(&self, sizer: &ClusterSizer, zoom: f64) -> ClusterIcon {
        sizer.icon(self.child_count, self.total_marker_count, zoom)
    }
}

/// Clusters for one zoom level
#[derive(Debug, Clone, Default)]
pub struct ClusterSet {
    pub zoom: f64,
    pub nodes: Vec<ClusterNode>,
    membership: HashMap<usize, usize>,
}

impl ClusterSet {
    /// Cluster containing the marker at `marker_index`
    pub fn cluster_of(&self, marker_index: usize) -> Option<&ClusterNode> {
        self.membership
            .get(&marker_index)
            .and_then(|&node| self.nodes.get(node))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Greedy radius clustering in pixel space.
///
/// Markers are visited in input order; each unassigned marker seeds a cluster
/// that absorbs every still-unassigned marker within the zoom's clustering
/// radius of the seed.
pub struct Clustering {
    config: ClusteringConfig,
    sizer: ClusterSizer,
}

impl Clustering {
    pub fn new(config: ClusteringConfig, sizer: ClusterSizer) -> Self {
        Self { config, sizer }
    }

    pub fn sizer(&self) -> &ClusterSizer {
        &self.sizer
    }

    pub fn config(&self) -> &ClusteringConfig {
        &self.config
    }

    /// Whether markers are drawn individually at `zoom`
    pub fn is_disabled_at(&self, zoom: f64) -> bool {
        self.config
            .disable_clustering_at_zoom
            .map(|limit| zoom >= limit)
            .unwrap_or(false)
    }

    pub fn cluster<E: MapEngine>(&self, engine: &E, positions: &[LatLng], zoom: f64) -> ClusterSet {
        let total = positions.len();
        let projected: Vec<Point> = positions.iter().map(|p| engine.project(p, zoom)).collect();

        let mut set = ClusterSet {
            zoom,
            nodes: Vec::new(),
            membership: HashMap::default(),
        };
        if total == 0 {
            return set;
        }

        if self.is_disabled_at(zoom) {
            for (index, position) in positions.iter().enumerate() {
                set.membership.insert(index, set.nodes.len());
                set.nodes.push(ClusterNode {
                    child_count: 1,
                    total_marker_count: total,
                    center: projected[index],
                    position: *position,
                    members: vec![index],
                });
            }
            return set;
        }

        let radius = self.sizer.radius(zoom);
        let index = SpatialIndex::bulk_load(
            projected
                .iter()
                .enumerate()
                .map(|(i, p)| SpatialItem::new(i, *p))
                .collect(),
        );

        let mut assigned = vec![false; total];
        for seed in 0..total {
            if assigned[seed] {
                continue;
            }

            let mut members: Vec<usize> = index
                .query_radius(&projected[seed], radius)
                .into_iter()
                .map(|item| item.index)
                .filter(|&i| !assigned[i])
                .collect();
            members.sort_unstable();

            let node_index = set.nodes.len();
            let mut sum = Point::new(0.0, 0.0);
            for &member in &members {
                assigned[member] = true;
                set.membership.insert(member, node_index);
                sum = sum.add(&projected[member]);
            }
            let center = sum.multiply(1.0 / members.len() as f64);

            set.nodes.push(ClusterNode {
                child_count: members.len(),
                total_marker_count: total,
                center,
                position: engine.unproject(&center, zoom),
                members,
            });
        }

        log::debug!(
            "clustered {} markers into {} clusters at zoom {:.1} (radius {:.1}px)",
            total,
            set.nodes.len(),
            zoom,
            radius
        );
        set
    }

    /// Icons for every cluster in `set`
    pub fn icons(&self, set: &ClusterSet) -> Vec<ClusterIcon> {
        set.nodes
            .iter()
            .map(|node| node.icon(&self.sizer, set.zoom))
            .collect()
    }
}

impl Default for Clustering {
    fn default() -> Self {
        Self::new(ClusteringConfig::default(), ClusterSizer::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::map::Map;

    fn engine() -> Map {
        Map::new(LatLng::new(46.05, 14.5), 10.0, Point::new(1024.0, 768.0))
    }

    fn positions() -> Vec<LatLng> {
        vec![
            LatLng::new(46.0500, 14.5000),
            LatLng::new(46.0501, 14.5001),
            LatLng::new(46.0502, 14.4999),
            LatLng::new(45.5000, 13.7000),
        ]
    }

    #[test]
    fn test_nearby_markers_share_a_cluster() {
        let set = Clustering::default().cluster(&engine(), &positions(), 10.0);

        assert_eq!(set.len(), 2);
        assert_eq!(set.nodes[0].members, vec![0, 1, 2]);
        assert_eq!(set.nodes[0].child_count, 3);
        assert_eq!(set.nodes[0].total_marker_count, 4);
        assert!(set.nodes[1].is_single());
        assert_eq!(set.cluster_of(3).unwrap().members, vec![3]);
    }

    #[test]
    fn test_every_marker_in_exactly_one_cluster() {
        let set = Clustering::default().cluster(&engine(), &positions(), 3.0);
        let total: usize = set.nodes.iter().map(|n| n.child_count).sum();
        assert_eq!(total, 4);
        for i in 0..4 {
            assert!(set.cluster_of(i).is_some());
        }
    }

    #[test]
    fn test_disabled_above_zoom_limit() {
        let clustering = Clustering::new(
            ClusteringConfig {
                disable_clustering_at_zoom: Some(15.0),
            },
            ClusterSizer::default(),
        );
        let set = clustering.cluster(&engine(), &positions(), 15.0);
        assert_eq!(set.len(), 4);
        assert!(set.nodes.iter().all(ClusterNode::is_single));
    }

    #[test]
    fn test_empty_marker_set_has_no_clusters() {
        let set = Clustering::default().cluster(&engine(), &[], 10.0);
        assert!(set.is_empty());
        assert!(Clustering::default().icons(&set).is_empty());
    }

    #[test]
    fn test_icons_sized_by_population() {
        let clustering = Clustering::default();
        let set = clustering.cluster(&engine(), &positions(), 10.0);
        let icons = clustering.icons(&set);

        assert_eq!(icons[0].size, (30.0 * 1.0 + 50.0 * 3.0) / 4.0);
        assert_eq!(icons[1].size, (30.0 * 3.0 + 50.0) / 4.0);
    }
}
