//! Reverse geocoding for markers that arrive without a city name.
//!
//! Lookups never block marker creation: any failure falls back to
//! [`UNKNOWN_LOCATION`].

use crate::{
    core::{constants::UNKNOWN_LOCATION, geo::LatLng},
    data::feed::MarkerRecord,
    PhotoFocusError, Result,
};
use async_trait::async_trait;
use futures::future::join_all;
use serde::Deserialize;

#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// Place name for a position
    async fn place_name(&self, position: LatLng) -> Result<String>;
}

/// Place name for `position`, or the fallback on any failure
pub async fn place_name_or_fallback(geocoder: &dyn ReverseGeocoder, position: LatLng) -> String {
    match geocoder.place_name(position).await {
        Ok(name) if !name.trim().is_empty() => name,
        Ok(_) => UNKNOWN_LOCATION.to_string(),
        Err(e) => {
            log::warn!(
                "Reverse geocoding failed for ({:.6}, {:.6}): {}",
                position.lat,
                position.lng,
                e
            );
            UNKNOWN_LOCATION.to_string()
        }
    }
}

/// Looks up every marker with an empty city concurrently and fills it in.
/// Returns how many markers were looked up.
pub async fn fill_missing_cities(
    markers: &mut [MarkerRecord],
    geocoder: &dyn ReverseGeocoder,
) -> usize {
    let pending: Vec<usize> = markers
        .iter()
        .enumerate()
        .filter(|(_, m)| m.city.trim().is_empty())
        .map(|(i, _)| i)
        .collect();

    let names = join_all(
        pending
            .iter()
            .map(|&i| place_name_or_fallback(geocoder, markers[i].coordinates)),
    )
    .await;

    for (&index, name) in pending.iter().zip(names) {
        markers[index].city = name;
    }
    pending.len()
}

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    #[serde(default)]
    address: Option<NominatimAddress>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    municipality: Option<String>,
    county: Option<String>,
}

impl NominatimAddress {
    fn place_name(self) -> Option<String> {
        self.city
            .or(self.town)
            .or(self.village)
            .or(self.municipality)
            .or(self.county)
    }
}

/// Reverse geocoding through a Nominatim-compatible HTTP endpoint
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    base_url: String,
    client: reqwest::Client,
}

impl NominatimGeocoder {
    pub const DEFAULT_URL: &'static str = "https://nominatim.openstreetmap.org/reverse";

    pub fn new() -> Result<Self> {
        Self::with_base_url(Self::DEFAULT_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        // Nominatim's usage policy requires an identifying user agent
        let client = reqwest::Client::builder()
            .user_agent(concat!("photofocus/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(10))
            .build()?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    fn parse(body: &str) -> Result<String> {
        let response: NominatimResponse = serde_json::from_str(body)?;
        if let Some(error) = response.error {
            return Err(PhotoFocusError::Geocoding(error));
        }
        response
            .address
            .and_then(NominatimAddress::place_name)
            .ok_or_else(|| PhotoFocusError::Geocoding("no place name in response".to_string()))
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn place_name(&self, position: LatLng) -> Result<String> {
        let body = self
            .client
            .get(&self.base_url)
            .query(&[
                ("format", "jsonv2".to_string()),
                ("lat", position.lat.to_string()),
                ("lon", position.lng.to_string()),
                ("zoom", "10".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Self::parse(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::feed::{MarkerRecord, SourceRecord};

    struct FlakyGeocoder;

    #[async_trait]
    impl ReverseGeocoder for FlakyGeocoder {
        async fn place_name(&self, position: LatLng) -> Result<String> {
            if position.lat > 46.0 {
                Ok("Kranj".to_string())
            } else {
                Err(PhotoFocusError::Geocoding("service unavailable".to_string()))
            }
        }
    }

    fn marker(coordinates: &str, city: &str) -> MarkerRecord {
        MarkerRecord::from_source(SourceRecord {
            path: "a.jpg".to_string(),
            coordinates: coordinates.to_string(),
            city: city.to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_fills_only_missing_cities_with_fallback() {
        let mut markers = vec![
            marker("46.24,14.36", ""),
            marker("45.55,13.73", ""),
            marker("46.37,14.11", "Bled"),
        ];

        let looked_up = fill_missing_cities(&mut markers, &FlakyGeocoder).await;

        assert_eq!(looked_up, 2);
        assert_eq!(markers[0].city, "Kranj");
        assert_eq!(markers[1].city, UNKNOWN_LOCATION);
        assert_eq!(markers[2].city, "Bled");
    }

    #[test]
    fn test_parse_nominatim_response() {
        let name = NominatimGeocoder::parse(
            r#"{"place_id": 1, "address": {"town": "Škofja Loka", "country": "Slovenija"}}"#,
        )
        .unwrap();
        assert_eq!(name, "Škofja Loka");

        assert!(matches!(
            NominatimGeocoder::parse(r#"{"error": "Unable to geocode"}"#),
            Err(PhotoFocusError::Geocoding(_))
        ));
        assert!(matches!(
            NominatimGeocoder::parse("not json"),
            Err(PhotoFocusError::Serialization(_))
        ));
    }
}
