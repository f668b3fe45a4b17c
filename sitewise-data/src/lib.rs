//! Upstream adapters for the Sitewise engine.
//!
//! Responsibilities:
//! - Sample population density from GeoTIFF rasters ([`raster`]).
//! - Count features through the Overpass API ([`overpass`]).
//! - Resolve road-network proximity through OpenRouteService ([`routing`]).
//!
//! Boundaries:
//! - Do not encode scoring rules (live in `sitewise-core`).
//! - Narrow upstream JSON into core types at the boundary.
//!
//! Invariants:
//! - No global mutable state; every adapter is configured at construction.
//! - Adapters are `Send + Sync` and safe to share between requests.

#![forbid(unsafe_code)]

use thiserror::Error;

pub mod overpass;
pub mod raster;
pub mod routing;

/// Default user agent for outbound HTTP requests.
pub const DEFAULT_USER_AGENT: &str = "sitewise/0.1";

/// Failure to construct an HTTP client.
#[derive(Debug, Error)]
#[error("failed to build HTTP client: {0}")]
pub struct ClientBuildError(#[from] reqwest::Error);
