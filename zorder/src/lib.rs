//! ZOrder - Z-order (Morton) spatial and spatio-temporal indexing
//!
//! This library maps longitude/latitude (and optionally a time of week) onto a
//! single sortable 64-bit key, and turns a query region into the short list of
//! contiguous key ranges a range-scanning store has to read.
//!
//! # Layers
//!
//! | Module         | Role                                                   |
//! |----------------|--------------------------------------------------------|
//! | [`normalizer`] | Continuous value to fixed-precision integer bin        |
//! | [`curve`]      | Bit interleaving for 2 and 3 dimensions                |
//! | [`range`]      | Z-value intervals and scan ranges                      |
//! | [`sfc`]        | Geographic point (+ time) to Z-value and back          |
//! | [`week`]       | Absolute date spans cut into week slices               |
//! | [`search`]     | Breadth-first range decomposition                      |
//! | [`query`]      | Bounding box (+ dates) to scan ranges                  |
//! | [`config`]     | Search budgets and their INI representation            |
//! | [`nds`]        | NDS packed tile ids on a 32/31-bit Morton code         |
//!
//! # Example
//!
//! ```
//! use zorder::{BoundingBox, Z2Search};
//!
//! let search = Z2Search::new(31)?;
//! let bbox = BoundingBox::from_bounds(1.4, 43.5, 1.5, 44.0);
//! let ranges = search.ranges(&bbox)?;
//!
//! let z = search.curve().index(1.45, 43.7)?;
//! assert!(ranges.iter().any(|r| r.contains(z)));
//! # Ok::<(), zorder::ZOrderError>(())
//! ```
//!
//! Everything here is pure computation: no I/O outside [`config`], no shared
//! state, and every public type is `Send + Sync`.

pub mod config;
pub mod curve;
pub mod error;
pub mod nds;
pub mod normalizer;
pub mod query;
pub mod range;
pub mod search;
pub mod sfc;
pub mod week;

pub use config::SearchConfig;
pub use curve::{ZCurve, Z2, Z3};
pub use error::{Axis, Result, ZOrderError};
pub use nds::{packed_tile_id, read_packed_tile_id};
pub use normalizer::Normalizer;
pub use query::{Z2Search, Z3Search};
pub use range::{BoundedRange, IndexRange};
pub use search::{calculate_ranges, merge_ranges};
pub use sfc::{BoundingBox, Point, Z2Sfc, Z3Sfc};
pub use week::{decompose, WeekDate, WeekTimeRange};
