//! GeoSense Route Comparison
//!
//! The routing backend answers a comparison request with up to three route
//! variants whose fields come in whichever shape the backend felt like that
//! day. This crate turns that payload into a fixed three-way comparison:
//! - always exactly three options, ordered Fastest, Eco, Cheapest
//! - missing data becomes an explicit "N/A" sentinel, never an omitted field
//! - invalid geometry points are dropped one by one

mod error;
mod geocode;
mod model;
mod normalize;
mod raw;
pub mod resolve;

pub use error::NormalizationError;
pub use geocode::{geocode, DEFAULT_LOCATION};
pub use model::{GeoPoint, Metric, RouteComparison, RouteKind, RouteOption, NOT_AVAILABLE};
pub use normalize::{normalize, normalize_raw};
pub use raw::{RawComparison, RawField, RawRoute};

pub type Result<T> = std::result::Result<T, NormalizationError>;
