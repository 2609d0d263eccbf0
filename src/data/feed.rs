//! Marker feed: source records as they arrive over the wire, and the
//! validated [`MarkerRecord`]s built from them.

use crate::{
    core::{
        constants::VIDEO_EXTENSIONS,
        geo::{LatLng, LatLngBounds},
    },
    PhotoFocusError, Result,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
#[cfg(feature = "tokio-runtime")]
use std::path::PathBuf;

/// One entry of the JSON image list
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceRecord {
    pub path: String,
    /// `"lat,lon"`
    pub coordinates: String,
    pub description: String,
    pub city: String,
    #[serde(rename = "dateTime")]
    pub date_time: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Video when the final extension is one of the known video types
    pub fn from_path(path: &str) -> Self {
        let extension = path
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.contains('/'));

        match extension {
            Some(ext) if VIDEO_EXTENSIONS.iter().any(|v| v.eq_ignore_ascii_case(ext)) => {
                MediaKind::Video
            }
            _ => MediaKind::Image,
        }
    }
}

/// A resolved photo or video marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerRecord {
    pub path: String,
    pub media_kind: MediaKind,
    pub coordinates: LatLng,
    /// May contain markup; rendered as-is
    pub description: String,
    pub city: String,
    pub captured_at: Option<String>,
    /// Kilometres from the reference point, set by ranking
    pub distance_km: f64,
    pub is_farthest: bool,
}

impl MarkerRecord {
    /// Validates a source record
    pub fn from_source(record: SourceRecord) -> Result<Self> {
        if record.path.trim().is_empty() {
            return Err(PhotoFocusError::Feed("record has no media path".to_string()));
        }
        let coordinates = parse_coordinates(&record.coordinates)?;
        let captured_at = Some(record.date_time.trim().to_string()).filter(|s| !s.is_empty());

        Ok(Self {
            media_kind: MediaKind::from_path(&record.path),
            path: record.path,
            coordinates,
            description: record.description,
            city: record.city,
            captured_at,
            distance_km: 0.0,
            is_farthest: false,
        })
    }

    pub fn is_video(&self) -> bool {
        self.media_kind == MediaKind::Video
    }

    /// Still image shown in the marker icon. Videos use a `.jpg` sibling
    /// rendered ahead of time.
    pub fn thumbnail_url(&self) -> String {
        match self.media_kind {
            MediaKind::Image => self.path.clone(),
            MediaKind::Video => match self.path.rsplit_once('.') {
                Some((stem, ext)) if !ext.contains('/') => format!("{stem}.jpg"),
                _ => format!("{}.jpg", self.path),
            },
        }
    }

    /// Distance rounded to one decimal, e.g. `"12.3"`
    pub fn display_distance(&self) -> String {
        format!("{:.1}", self.distance_km)
    }
}

/// Parses `"lat,lon"`, rejecting anything that is not exactly two finite,
/// in-range numbers
pub fn parse_coordinates(raw: &str) -> Result<LatLng> {
    let invalid = || PhotoFocusError::InvalidCoordinates(format!("{raw:?}"));

    let (lat, lng) = raw.split_once(',').ok_or_else(invalid)?;
    if lng.contains(',') {
        return Err(invalid());
    }
    let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;
    let lng: f64 = lng.trim().parse().map_err(|_| invalid())?;

    let position = LatLng::new(lat, lng);
    if !position.is_valid() {
        return Err(invalid());
    }
    Ok(position)
}

/// A source record that did not become a marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRecord {
    /// Position in the feed
    pub index: usize,
    pub path: String,
    pub reason: String,
}

/// Outcome of resolving a feed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedReport {
    /// Valid markers in feed order
    pub markers: Vec<MarkerRecord>,
    pub skipped: Vec<SkippedRecord>,
}

impl FeedReport {
    pub fn positions(&self) -> Vec<LatLng> {
        self.markers.iter().map(|m| m.coordinates).collect()
    }

    /// Bounds around all markers, `None` for an empty feed
    pub fn bounds(&self) -> Option<LatLngBounds> {
        LatLngBounds::from_points(self.markers.iter().map(|m| &m.coordinates))
    }
}

/// Validates every record, keeping feed order. Invalid records are logged
/// and reported, never fatal.
pub fn resolve_feed(records: Vec<SourceRecord>) -> FeedReport {
    let mut report = FeedReport::default();

    for (index, record) in records.into_iter().enumerate() {
        let path = record.path.clone();
        match MarkerRecord::from_source(record) {
            Ok(marker) => report.markers.push(marker),
            Err(e) => {
                log::warn!("Skipping feed record {} ({}): {}", index, path, e);
                report.skipped.push(SkippedRecord {
                    index,
                    path,
                    reason: e.to_string(),
                });
            }
        }
    }

    log::info!(
        "Resolved {} markers ({} skipped)",
        report.markers.len(),
        report.skipped.len()
    );
    report
}

/// Parses a JSON array of source records
pub fn parse_feed_json(json: &str) -> Result<Vec<SourceRecord>> {
    Ok(serde_json::from_str(json)?)
}

/// Anything that can deliver the raw image list
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<SourceRecord>>;

    /// Human-readable origin, used in logs
    fn describe(&self) -> String;
}

/// Fetches and resolves a feed in one step
pub async fn load_feed(source: &dyn FeedSource) -> Result<FeedReport> {
    log::info!("Loading marker feed from {}", source.describe());
    let records = source.fetch().await?;
    Ok(resolve_feed(records))
}

/// Records already held in memory
#[derive(Debug, Clone, Default)]
pub struct StaticFeedSource {
    records: Vec<SourceRecord>,
}

impl StaticFeedSource {
    pub fn new(records: Vec<SourceRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl FeedSource for StaticFeedSource {
    async fn fetch(&self) -> Result<Vec<SourceRecord>> {
        Ok(self.records.clone())
    }

    fn describe(&self) -> String {
        format!("{} in-memory records", self.records.len())
    }
}

/// JSON image list on the local filesystem
#[cfg(feature = "tokio-runtime")]
#[derive(Debug, Clone)]
pub struct FileFeedSource {
    path: PathBuf,
}

#[cfg(feature = "tokio-runtime")]
impl FileFeedSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[cfg(feature = "tokio-runtime")]
#[async_trait]
impl FeedSource for FileFeedSource {
    async fn fetch(&self) -> Result<Vec<SourceRecord>> {
        let json = tokio::fs::read_to_string(&self.path).await?;
        parse_feed_json(&json)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// JSON image list served over HTTP
#[derive(Debug, Clone)]
pub struct HttpFeedSource {
    url: String,
    client: reqwest::Client,
}

impl HttpFeedSource {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("photofocus/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self::with_client(url, client))
    }

    pub fn with_client(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self) -> Result<Vec<SourceRecord>> {
        let records: Vec<SourceRecord> = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        log::debug!("Downloaded {} records from {}", records.len(), self.url);
        Ok(records)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(path: &str, coordinates: &str) -> SourceRecord {
        SourceRecord {
            path: path.to_string(),
            coordinates: coordinates.to_string(),
            description: "Sticker on a lamp post".to_string(),
            city: "Kranj".to_string(),
            date_time: String::new(),
        }
    }

    #[test]
    fn test_parse_coordinates() {
        let position = parse_coordinates("46.2389, 14.3556").unwrap();
        assert_eq!(position, LatLng::new(46.2389, 14.3556));

        for bad in ["", "46.2", "46.2,abc", "1,2,3", "NaN,14", "91,14", "46,181"] {
            assert!(
                matches!(parse_coordinates(bad), Err(PhotoFocusError::InvalidCoordinates(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn test_media_kind_from_extension() {
        assert_eq!(MediaKind::from_path("images/a.jpg"), MediaKind::Image);
        assert_eq!(MediaKind::from_path("images/a.MP4"), MediaKind::Video);
        assert_eq!(MediaKind::from_path("clips/b.webm"), MediaKind::Video);
        assert_eq!(MediaKind::from_path("clips.ogg/b"), MediaKind::Image);
    }

    #[test]
    fn test_thumbnail_for_video() {
        let video = MarkerRecord::from_source(record("clips/v1.final.mp4", "46,14")).unwrap();
        assert_eq!(video.thumbnail_url(), "clips/v1.final.jpg");

        let image = MarkerRecord::from_source(record("img/p.png", "46,14")).unwrap();
        assert_eq!(image.thumbnail_url(), "img/p.png");
    }

    #[test]
    fn test_empty_date_time_is_none() {
        let marker = MarkerRecord::from_source(record("a.jpg", "46,14")).unwrap();
        assert_eq!(marker.captured_at, None);

        let mut dated = record("a.jpg", "46,14");
        dated.date_time = "2024-05-01 12:00".to_string();
        let marker = MarkerRecord::from_source(dated).unwrap();
        assert_eq!(marker.captured_at.as_deref(), Some("2024-05-01 12:00"));
    }

    #[test]
    fn test_resolve_skips_invalid_records() {
        let report = resolve_feed(vec![
            record("a.jpg", "46.0,14.0"),
            record("b.jpg", "not a coordinate"),
            record("", "46.0,14.0"),
            record("c.mp4", "45.5,13.9"),
        ]);

        assert_eq!(report.markers.len(), 2);
        assert_eq!(report.markers[1].path, "c.mp4");
        let skipped: Vec<_> = report.skipped.iter().map(|s| s.index).collect();
        assert_eq!(skipped, vec![1, 2]);
        assert!(report.bounds().unwrap().contains(&LatLng::new(45.7, 13.95)));
    }

    #[test]
    fn test_feed_json_with_missing_fields() {
        let records = parse_feed_json(
            r#"[{"path": "a.jpg", "coordinates": "46,14", "description": "x", "city": "Bled"},
                {"path": "b.jpg", "dateTime": "2023-08-02"}]"#,
        )
        .unwrap();
        let report = resolve_feed(records);

        assert_eq!(report.markers.len(), 1);
        assert_eq!(report.skipped[0].path, "b.jpg");
    }

    #[test]
    fn test_display_distance() {
        let mut marker = MarkerRecord::from_source(record("a.jpg", "46,14")).unwrap();
        marker.distance_km = 12.345;
        assert_eq!(marker.display_distance(), "12.3");
    }

    #[tokio::test]
    async fn test_load_static_feed() {
        let source = StaticFeedSource::new(vec![record("a.jpg", "46,14")]);
        let report = load_feed(&source).await.unwrap();
        assert_eq!(report.markers.len(), 1);
        assert!(report.skipped.is_empty());
    }
}
