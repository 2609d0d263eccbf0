use crate::{
    core::{config::ReferencePoint, geo::distance_km},
    data::feed::MarkerRecord,
};

/// Annotates markers with their distance from a fixed reference point and
/// flags the single farthest one
#[derive(Debug, Clone, Copy, Default)]
pub struct RankingEngine {
    reference: ReferencePoint,
}

impl RankingEngine {
    pub fn new(reference: ReferencePoint) -> Self {
        Self { reference }
    }

    pub fn reference(&self) -> ReferencePoint {
        self.reference
    }

    /// Sets `distance_km` on every marker and `is_farthest` on exactly one,
    /// keeping input order. An empty list comes back empty.
    pub fn rank(&self, mut markers: Vec<MarkerRecord>) -> Vec<MarkerRecord> {
        let origin = self.reference.position();
        for marker in &mut markers {
            marker.distance_km = distance_km(
                origin.lat,
                origin.lng,
                marker.coordinates.lat,
                marker.coordinates.lng,
            );
            marker.is_farthest = false;
        }

        if let Some(index) = farthest_index(&markers) {
            markers[index].is_farthest = true;
            log::debug!(
                "Farthest marker: {} at {} km",
                markers[index].path,
                markers[index].display_distance()
            );
        }
        markers
    }
}

/// Index of the first marker with the greatest distance. Single pass with a
/// strict `>`, so the earliest of tied maxima wins; NaN distances never win.
pub fn farthest_index(markers: &[MarkerRecord]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, marker) in markers.iter().enumerate() {
        let distance = marker.distance_km;
        if distance.is_nan() {
            continue;
        }
        match best {
            Some((_, max)) if distance <= max => {}
            _ => best = Some((index, distance)),
        }
    }
    best.map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::LatLng;
    use crate::data::feed::MediaKind;

    fn marker_at(lat: f64, lng: f64) -> MarkerRecord {
        MarkerRecord {
            path: format!("{lat},{lng}.jpg"),
            media_kind: MediaKind::Image,
            coordinates: LatLng::new(lat, lng),
            description: String::new(),
            city: String::new(),
            captured_at: None,
            distance_km: 0.0,
            is_farthest: false,
        }
    }

    fn with_distances(distances: &[f64]) -> Vec<MarkerRecord> {
        distances
            .iter()
            .map(|&d| MarkerRecord {
                distance_km: d,
                ..marker_at(0.0, 0.0)
            })
            .collect()
    }

    #[test]
    fn test_first_maximum_wins_ties() {
        assert_eq!(farthest_index(&with_distances(&[5.0, 12.3, 12.3, 3.1])), Some(1));
        assert_eq!(farthest_index(&with_distances(&[0.0])), Some(0));
        assert_eq!(farthest_index(&[]), None);
    }

    #[test]
    fn test_nan_never_farthest() {
        assert_eq!(farthest_index(&with_distances(&[f64::NAN, 2.0, 1.0])), Some(1));
        assert_eq!(farthest_index(&with_distances(&[2.0, f64::NAN, 3.0])), Some(2));
    }

    #[test]
    fn test_rank_flags_exactly_one() {
        let engine = RankingEngine::default();
        let ranked = engine.rank(vec![
            marker_at(46.049698, 14.109393),
            marker_at(46.3625, 14.0939),
            marker_at(45.5469, 13.7294),
            marker_at(46.2389, 14.3556),
        ]);

        assert_eq!(ranked[0].distance_km, 0.0);
        assert!(!ranked[0].is_farthest);
        assert_eq!(ranked.iter().filter(|m| m.is_farthest).count(), 1);
        assert!(ranked[2].is_farthest);
        assert!(ranked.iter().all(|m| m.distance_km >= 0.0));
    }

    #[test]
    fn test_rank_empty() {
        assert!(RankingEngine::default().rank(Vec::new()).is_empty());
    }

    #[test]
    fn test_rank_resets_stale_flags() {
        let mut stale = marker_at(46.05, 14.11);
        stale.is_farthest = true;
        let ranked = RankingEngine::default().rank(vec![stale, marker_at(40.0, 10.0)]);
        assert!(!ranked[0].is_farthest);
        assert!(ranked[1].is_farthest);
    }
}
