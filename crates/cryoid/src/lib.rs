//! Snowflake-style identifier generation and deconstruction over
//! configurable bit layouts.
//!
//! A snowflake identifier packs a millisecond timestamp delta, a small set of
//! origin ids (worker/shard and optionally process), and a per-millisecond
//! sequence number into one sortable integer, so independent generators can
//! mint collision-resistant IDs without coordination. `cryoid` implements the
//! codec (pack and exact unpack), the collision-avoidance state machine
//! (sequence increments, millisecond rollover), and the deconstructor, over
//! any bit layout — including layouts wider than 128 bits, which are carried
//! through an exact decimal↔binary string codec instead of native integers.
//!
//! # Example
//!
//! ```
//! use cryoid::{GenerateOptions, Layout, MILLENNIUM_EPOCH, SnowflakeGenerator};
//!
//! // The fixed 64-bit layout: 41-bit timestamp | 13-bit shard | 10-bit sequence.
//! let generator = SnowflakeGenerator::new(MILLENNIUM_EPOCH, Layout::sharded64());
//!
//! let flake = generator.generate(GenerateOptions::default()).unwrap();
//! let decoded = generator.deconstruct(flake.id.as_decimal()).unwrap();
//! assert_eq!(decoded.sequence, flake.sequence);
//! assert_eq!(decoded.timestamp, flake.timestamp);
//! ```
//!
//! Custom layouts are plain configurations of the same [`Layout`] type:
//!
//! ```
//! use cryoid::{GenerateOptions, Layout, SnowflakeGenerator, TWITTER_EPOCH};
//!
//! // 96 bits total: 42-bit timestamp | 10-bit worker | 10-bit process | 20-bit sequence.
//! let layout = Layout::new(96, 42, 10, 10, 20).unwrap();
//! let generator = SnowflakeGenerator::new(TWITTER_EPOCH, layout);
//! let flake = generator
//!     .generate(GenerateOptions::default().with_worker_id(542))
//!     .unwrap();
//! assert_eq!(flake.worker_id, 542);
//! ```

mod codec;
mod deconstruct;
mod error;
mod generator;
mod id;
mod layout;
mod origin;
#[cfg(feature = "serde")]
mod serde;
mod time;

pub use crate::codec::*;
pub use crate::deconstruct::*;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::layout::*;
pub use crate::origin::*;
pub use crate::time::*;
