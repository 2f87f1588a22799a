pub mod file;
pub mod http;
pub mod inline;

use crate::domain::ports::trade_source::TradeSource;
use std::sync::Arc;

/// Builds a source from a location string: `http(s)://` URLs are fetched, anything
/// else is read from disk.
pub fn from_location(location: &str) -> Arc<dyn TradeSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Arc::new(http::HttpSource::new(location))
    } else {
        Arc::new(file::FileSource::new(location))
    }
}
