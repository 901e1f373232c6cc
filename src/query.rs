//! Fixed parameters of the USGS FDSN event query.

use reqwest::Url;

use crate::error::{QuakeError, Result};

pub const FEED_ENDPOINT: &str = "https://earthquake.usgs.gov/fdsnws/event/1/query.geojson";

/// Latitude/longitude box the query is restricted to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedQuery {
    pub endpoint: &'static str,
    pub start_time: &'static str,
    pub end_time: &'static str,
    pub bounds: BoundingBox,
    pub min_magnitude: f64,
    pub order_by: &'static str,
}

impl FeedQuery {
    /// British Isles, 2000-01-01 to 2018-10-11, magnitude 1 and above.
    pub const BRITISH_ISLES: FeedQuery = FeedQuery {
        endpoint: FEED_ENDPOINT,
        start_time: "2000-01-01",
        end_time: "2018-10-11",
        bounds: BoundingBox {
            min_latitude: 50.008,
            max_latitude: 58.723,
            min_longitude: -9.756,
            max_longitude: 1.67,
        },
        min_magnitude: 1.0,
        order_by: "time-asc",
    };

    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("starttime", self.start_time.to_string()),
            ("endtime", self.end_time.to_string()),
            ("minlatitude", self.bounds.min_latitude.to_string()),
            ("maxlatitude", self.bounds.max_latitude.to_string()),
            ("minlongitude", self.bounds.min_longitude.to_string()),
            ("maxlongitude", self.bounds.max_longitude.to_string()),
            ("minmagnitude", self.min_magnitude.to_string()),
            ("orderby", self.order_by.to_string()),
        ]
    }

    pub fn url(&self) -> Result<Url> {
        let mut url = Url::parse(self.endpoint).map_err(|e| QuakeError::InvalidEndpoint {
            url: self.endpoint.to_string(),
            message: e.to_string(),
        })?;
        url.query_pairs_mut().extend_pairs(self.params());
        Ok(url)
    }
}

impl Default for FeedQuery {
    fn default() -> Self {
        Self::BRITISH_ISLES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_url_has_all_params() {
        let url = FeedQuery::default().url().unwrap();
        assert_eq!(url.host_str(), Some("earthquake.usgs.gov"));
        assert_eq!(url.path(), "/fdsnws/event/1/query.geojson");

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(pairs.len(), 8);
        assert!(pairs.contains(&("starttime".into(), "2000-01-01".into())));
        assert!(pairs.contains(&("endtime".into(), "2018-10-11".into())));
        assert!(pairs.contains(&("minlatitude".into(), "50.008".into())));
        assert!(pairs.contains(&("maxlongitude".into(), "1.67".into())));
        assert!(pairs.contains(&("minlongitude".into(), "-9.756".into())));
        assert!(pairs.contains(&("minmagnitude".into(), "1".into())));
        assert!(pairs.contains(&("orderby".into(), "time-asc".into())));
    }

    #[test]
    fn test_invalid_endpoint_is_reported() {
        let query = FeedQuery {
            endpoint: "not a url",
            ..FeedQuery::BRITISH_ISLES
        };
        let err = query.url().unwrap_err();
        assert!(matches!(err, QuakeError::InvalidEndpoint { ref url, .. } if url == "not a url"));
    }
}
