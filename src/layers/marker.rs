use crate::{
    core::{
        constants::{MARKER_ICON_ANCHOR, MARKER_ICON_SIZE},
        geo::{LatLng, LatLngBounds, Point},
    },
    data::feed::MarkerRecord,
    ui::popup::Popup,
};
use serde::{Deserialize, Serialize};

/// Thumbnail icon drawn for a single photo marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerIcon {
    pub size: Point,
    pub anchor: Point,
    pub class_name: String,
    pub html: String,
}

impl MarkerIcon {
    pub fn for_record(record: &MarkerRecord) -> Self {
        Self {
            size: Point::new(MARKER_ICON_SIZE.0 as f64, MARKER_ICON_SIZE.1 as f64),
            anchor: Point::new(MARKER_ICON_ANCHOR.0 as f64, MARKER_ICON_ANCHOR.1 as f64),
            class_name: "photo-marker".to_string(),
            html: format!(
                r#"<img src="{}" alt="Photo taken in {}">"#,
                record.thumbnail_url(),
                record.city
            ),
        }
    }
}

/// A photo marker with its icon and popup
#[derive(Debug, Clone)]
pub struct Marker {
    id: String,
    position: LatLng,
    icon: MarkerIcon,
    is_farthest: bool,
    popup: Popup,
}

impl Marker {
    pub fn new(id: String, record: &MarkerRecord) -> Self {
        Self {
            popup: Popup::for_marker(id.clone(), record),
            id,
            position: record.coordinates,
            icon: MarkerIcon::for_record(record),
            is_farthest: record.is_farthest,
        }
    }

    /// One marker per record, ids taken from the record order
    pub fn from_records(records: &[MarkerRecord]) -> Vec<Marker> {
        records
            .iter()
            .enumerate()
            .map(|(i, record)| Marker::new(format!("marker-{i}"), record))
            .collect()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    pub fn icon(&self) -> &MarkerIcon {
        &self.icon
    }

    pub fn is_farthest(&self) -> bool {
        self.is_farthest
    }

    pub fn popup(&self) -> &Popup {
        &self.popup
    }

    pub fn into_popup(self) -> Popup {
        self.popup
    }

    pub fn bounds(&self) -> LatLngBounds {
        LatLngBounds::new(self.position, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::feed::SourceRecord;

    #[test]
    fn test_marker_from_video_record() {
        let record = MarkerRecord::from_source(SourceRecord {
            path: "clips/walk.webm".to_string(),
            coordinates: "46.37,14.11".to_string(),
            city: "Bled".to_string(),
            ..Default::default()
        })
        .unwrap();

        let marker = Marker::new("m1".to_string(), &record);

        assert_eq!(marker.icon().size, Point::new(48.0, 48.0));
        assert_eq!(marker.icon().anchor, Point::new(24.0, 24.0));
        assert!(marker.icon().html.contains(r#"src="clips/walk.jpg""#));
        assert_eq!(marker.popup().position, LatLng::new(46.37, 14.11));
        assert_eq!(marker.bounds().center(), marker.position());
    }
}
