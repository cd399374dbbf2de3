//! # vidsim Core
//!
//! Core data model for the vidsim video similarity toolkit.
//!
//! - [`Code`] - Opaque perceptual signature string
//! - [`Item`] - A video with one code per signal type
//! - [`PairKey`] / [`PairResult`] - Scores for an unordered pair of items
//! - [`pairs`] - Lexicographic enumeration of all unordered pairs
//!
//! ## Example
//!
//! ```rust
//! use vidsim_core::{pairs, Item};
//!
//! let items = vec![
//!     Item::new(0, "a.mp4").with_code("hash", "1010"),
//!     Item::new(1, "b.mp4").with_code("hash", "1011"),
//!     Item::new(2, "c.mp4").with_code("hash", "0000"),
//! ];
//!
//! let keys: Vec<String> = pairs(items.len()).map(|k| k.to_string()).collect();
//! assert_eq!(keys, vec!["0-1", "0-2", "1-2"]);
//! ```

pub mod code;
pub mod error;
pub mod item;
pub mod pair;

pub use code::Code;
pub use error::{Error, Result};
pub use item::Item;
pub use pair::{pair_count, pairs, PairKey, PairResult};
