//! GeoJSON parser for the USGS event feed.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::Result;
use crate::record::{Feature, Quake};

/// What to do with a feature that fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParsePolicy {
    /// Abort the whole parse on the first bad record.
    #[default]
    Strict,
    /// Drop bad records, log them and count them.
    Lenient,
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    /// Decoded one at a time so a bad feature is reported with its index.
    features: Vec<Value>,
}

/// Validated records of one response, in feed order.
#[derive(Debug, Default)]
pub struct ParsedFeed {
    pub records: Vec<Quake>,
    pub skipped: usize,
}

/// Decodes a GeoJSON `FeatureCollection` into validated [`Quake`] records.
///
/// # Errors
///
/// Returns [`QuakeError::MalformedResponse`](crate::error::QuakeError::MalformedResponse)
/// if the body is not JSON or has no `features` array. A feature with a
/// missing field or a wrongly typed one is a per-record error: under
/// [`ParsePolicy::Strict`] the first one is returned, under
/// [`ParsePolicy::Lenient`] it is skipped and counted.
pub fn parse_feed(body: &str, policy: ParsePolicy) -> Result<ParsedFeed> {
    let collection: FeatureCollection = serde_json::from_str(body)?;
    debug!(features = collection.features.len(), "Feature collection decoded");

    let mut parsed = ParsedFeed {
        records: Vec::with_capacity(collection.features.len()),
        skipped: 0,
    };

    for (index, value) in collection.features.into_iter().enumerate() {
        let id = value.get("id").and_then(Value::as_str).map(str::to_owned);
        let record =
            Feature::from_value(index, value).and_then(|f| Quake::try_from_feature(index, &f));

        match record {
            Ok(quake) => parsed.records.push(quake),
            Err(e) if policy == ParsePolicy::Lenient && e.is_record_error() => {
                warn!(index, id = id.as_deref(), error = %e, "Skipping record");
                parsed.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(parsed)
}
