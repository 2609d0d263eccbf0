use crate::core::geo::Point;

use rstar::{PointDistance, RTree, RTreeObject, AABB};

/// A marker position in pixel space, keyed by its index in the marker list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialItem {
    pub index: usize,
    pub position: Point,
}

impl SpatialItem {
    pub fn new(index: usize, position: Point) -> Self {
        Self { index, position }
    }
}

// --- rstar integration -------------------------------------------------------------------------

impl RTreeObject for SpatialItem {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.position.x, self.position.y])
    }
}

impl PointDistance for SpatialItem {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.position.x - point[0];
        let dy = self.position.y - point[1];
        dx * dx + dy * dy
    }
}

/// R-tree over projected marker positions
#[derive(Default)]
pub struct SpatialIndex {
    rtree: RTree<SpatialItem>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bulk-loads the index; faster than repeated inserts for a full marker set
    pub fn bulk_load(items: Vec<SpatialItem>) -> Self {
        Self {
            rtree: RTree::bulk_load(items),
        }
    }

    pub fn insert(&mut self, item: SpatialItem) {
        self.rtree.insert(item);
    }

    /// Items whose position lies inside the pixel rectangle `min..=max`
    pub fn query(&self, min: &Point, max: &Point) -> Vec<&SpatialItem> {
        let envelope = AABB::from_corners([min.x, min.y], [max.x, max.y]);
        self.rtree.locate_in_envelope(&envelope).collect()
    }

    /// Items within `radius` pixels of `center`, inclusive
    pub fn query_radius(&self, center: &Point, radius: f64) -> Vec<&SpatialItem> {
        self.rtree
            .locate_within_distance([center.x, center.y], radius * radius)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rtree.size() == 0
    }

    pub fn len(&self) -> usize {
        self.rtree.size()
    }

    pub fn clear(&mut self) {
        self.rtree = RTree::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> SpatialIndex {
        SpatialIndex::bulk_load(vec![
            SpatialItem::new(0, Point::new(0.0, 0.0)),
            SpatialItem::new(1, Point::new(10.0, 0.0)),
            SpatialItem::new(2, Point::new(100.0, 100.0)),
        ])
    }

    #[test]
    fn test_query_radius_uses_pixels() {
        let index = index();
        let mut found: Vec<_> = index
            .query_radius(&Point::new(0.0, 0.0), 10.0)
            .into_iter()
            .map(|item| item.index)
            .collect();
        found.sort_unstable();
        assert_eq!(found, vec![0, 1]);
    }

    #[test]
    fn test_query_rectangle() {
        let index = index();
        let found = index.query(&Point::new(50.0, 50.0), &Point::new(150.0, 150.0));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].index, 2);
    }

    #[test]
    fn test_insert_and_clear() {
        let mut index = SpatialIndex::new();
        assert!(index.is_empty());
        index.insert(SpatialItem::new(7, Point::new(1.0, 1.0)));
        assert_eq!(index.len(), 1);
        index.clear();
        assert!(index.is_empty());
    }
}
