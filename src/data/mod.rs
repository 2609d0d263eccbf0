pub mod feed;
pub mod geocode;
pub mod ranking;

pub use feed::{
    load_feed, parse_coordinates, resolve_feed, FeedReport, FeedSource, HttpFeedSource,
    MarkerRecord, MediaKind, SkippedRecord, SourceRecord, StaticFeedSource,
};
#[cfg(feature = "tokio-runtime")]
pub use feed::FileFeedSource;
pub use geocode::{fill_missing_cities, NominatimGeocoder, ReverseGeocoder};
pub use ranking::{farthest_index, RankingEngine};
