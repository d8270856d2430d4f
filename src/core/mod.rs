//! Engine internals
//!
//! | Module         | Purpose                                                 |
//! |----------------|---------------------------------------------------------|
//! | [`store`]      | `RawStore` trait and the media implementing it          |
//! | [`region`]     | Data/control split of a reserved byte range             |
//! | [`bitmap`]     | Persisted retirement bitmap                              |
//! | [`translate`]  | Virtual offset to physical slot                         |
//! | [`engine`]     | read / write / update / full reset, capacity counters   |
//! | [`compaction`] | Retirement cascade and tail shift (`offset_right`)      |
//! | [`shared`]     | Mutex-serialised handle for multi-threaded callers      |
//! | [`config`]     | Region configuration and TOML loading                   |

pub mod bitmap;
pub mod compaction;
pub mod config;
pub mod engine;
pub mod error;
pub mod region;
pub mod shared;
pub mod store;
pub mod translate;
