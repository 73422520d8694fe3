#![forbid(unsafe_code)]

//! Spiral growth renderer.
//!
//! Growing polyline "spirals" are advanced once per frame and rasterized
//! straight into an RGBA pixel buffer owned by a [`SurfaceController`].
//!
//! # How it fits together
//!
//! - [`path::SpiralPath`] owns the kinematic state of one spiral and queues the
//!   pixels its tip covered since the last drain.
//! - [`raster`] turns a segment into pixel samples.
//! - [`surface`] holds the pixel buffer and the [`Surface`] presentation trait.
//! - [`controller::SurfaceController`] composes every path into the shared
//!   buffer, spawns branches, and presents each frame.
//! - [`schedule`] provides periodic tick sources for `start`/`stop`.
//!
//! # Example
//!
//! ```ignore
//! use spiral_core::{HeadlessSurface, Layout, SpiralConfig, SurfaceController};
//!
//! let surface = HeadlessSurface::new(320, 240);
//! let mut controller = SurfaceController::new(surface, Layout::FourSpiral)?;
//! for _ in 0..600 {
//!     controller.advance_frame();
//! }
//! ```

pub mod color;
pub mod config;
pub mod controller;
pub mod debug_trace;
pub mod layout;
pub mod logging;
pub mod path;
pub mod random;
pub mod raster;
pub mod schedule;
pub mod surface;

pub use color::PackedRgba;
pub use config::{ConfigError, SpiralConfig};
pub use controller::{FrameStats, SurfaceController};
pub use layout::Layout;
pub use path::{BranchPoint, Pixel, SpiralPath};
pub use random::{ConstantSource, RandomSource, SeededRandom, random_color, random_size, sign};
pub use schedule::{ManualScheduler, Scheduler, ThreadScheduler, TickHandle};
pub use surface::{HeadlessSurface, PixelBuffer, Surface};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, info, trace, warn};
