#![forbid(unsafe_code)]

//! Surface controller: composes every spiral into one pixel buffer.
//!
//! Each frame the controller:
//! 1. starts any staggered spirals whose virtual start time has arrived,
//! 2. advances every running path and drains its pixels into the buffer,
//!    dropping points outside the buffer,
//! 3. stops paths whose speed went negative,
//! 4. rolls for a branch on every path that holds a branch point,
//! 5. presents the buffer on the surface.
//!
//! Paths are never removed; stopped paths stay in the list and are skipped.
//!
//! # Scheduling
//!
//! [`SurfaceController::start`] asks the [`Scheduler`] for a tick stream at the
//! configured frame rate. Ticks are consumed by [`SurfaceController::pump`],
//! which runs one frame (or the installed callback) per tick on the caller's
//! thread.

use std::collections::VecDeque;
use std::fmt;

use crate::config::{ConfigError, SpiralConfig};
use crate::layout::{Layout, PlannedSpiral};
use crate::path::SpiralPath;
use crate::random::{RandomSource, SeededRandom, random_color, random_size};
use crate::schedule::{Scheduler, ThreadScheduler, TickHandle};
use crate::surface::{PixelBuffer, Surface};

/// Per-tick callback installed by [`SurfaceController::start_with`].
pub type TickCallback<S> = Box<dyn FnMut(&mut SurfaceController<S>)>;

/// Counters for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frame number (1-based).
    pub frame: u64,
    /// Staggered paths started this frame.
    pub paths_started: usize,
    /// Pixels written into the buffer.
    pub pixels_written: usize,
    /// Pixels discarded because they fell outside the buffer.
    pub pixels_dropped: usize,
    /// Paths whose speed went negative this frame.
    pub paths_stopped: usize,
    /// Branches grown this frame.
    pub branches_spawned: usize,
}

/// Owns the pixel buffer and every spiral drawn into it.
pub struct SurfaceController<S: Surface> {
    surface: S,
    pixels: PixelBuffer,
    paths: Vec<SpiralPath>,
    /// Staggered spirals not started yet, ordered by delay.
    scheduled: VecDeque<PlannedSpiral>,
    config: SpiralConfig,
    random: Box<dyn RandomSource>,
    scheduler: Box<dyn Scheduler>,
    ticker: Option<TickHandle>,
    on_tick: Option<TickCallback<S>>,
    frame: u64,
    last_stats: FrameStats,
}

impl<S: Surface> SurfaceController<S> {
    /// Controller with the default config, an entropy-seeded random source and
    /// a timer-thread scheduler.
    pub fn new(surface: S, layout: Layout) -> Result<Self, ConfigError> {
        Self::with_config(
            surface,
            layout,
            SpiralConfig::default(),
            SeededRandom::from_entropy(),
        )
    }

    /// Controller with an explicit config and random source.
    pub fn with_config(
        surface: S,
        layout: Layout,
        config: SpiralConfig,
        random: impl RandomSource + 'static,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let width = surface.width();
        let height = surface.height();
        let mut controller = Self {
            pixels: PixelBuffer::new(width, height),
            surface,
            paths: Vec::new(),
            scheduled: layout.plan(width, height).into(),
            config,
            random: Box::new(random),
            scheduler: Box::new(ThreadScheduler::new()),
            ticker: None,
            on_tick: None,
            frame: 0,
            last_stats: FrameStats::default(),
        };
        controller.start_due_paths();
        crate::debug!(
            width,
            height,
            layout = ?layout,
            started = controller.paths.len(),
            scheduled = controller.scheduled.len(),
            "spiral controller created"
        );
        Ok(controller)
    }

    /// Replace the tick source. A running tick stream is cancelled first.
    #[must_use]
    pub fn with_scheduler(mut self, scheduler: impl Scheduler + 'static) -> Self {
        self.stop();
        self.scheduler = Box::new(scheduler);
        self
    }

    /// Add a path. It is advanced from the next frame on.
    pub fn add_path(&mut self, path: SpiralPath) {
        self.paths.push(path);
    }

    /// Start every scheduled spiral whose delay has elapsed in virtual time.
    fn start_due_paths(&mut self) -> usize {
        let now_ms = self.config.virtual_millis(self.frame);
        let mut started = 0;
        while let Some(next) = self.scheduled.front() {
            if next.delay.as_millis() > u128::from(now_ms) {
                break;
            }
            if let Some(plan) = self.scheduled.pop_front() {
                self.spawn_planned(plan);
                started += 1;
            }
        }
        started
    }

    fn spawn_planned(&mut self, plan: PlannedSpiral) {
        let size = random_size(self.random.as_mut());
        let color = match self.config.initial_color {
            Some(color) => color,
            None => random_color(self.random.as_mut()),
        };
        let acceleration = plan.curl.acceleration(self.config.angular_accel_magnitude);
        let path = SpiralPath::new(plan.x, plan.y, plan.direction, acceleration, size, color)
            .with_branch_threshold(self.config.branch_threshold_frames);
        crate::debug!(
            index = self.paths.len(),
            x = plan.x,
            y = plan.y,
            direction = plan.direction,
            size,
            "spiral started"
        );
        self.paths.push(path);
    }

    /// Run one frame and present the result.
    pub fn advance_frame(&mut self) {
        self.frame += 1;
        let mut stats = FrameStats {
            frame: self.frame,
            ..FrameStats::default()
        };
        stats.paths_started = self.start_due_paths();

        // Branches spawned this frame are appended past `count` and first
        // advance on the next frame.
        let count = self.paths.len();
        for index in 0..count {
            let path = &mut self.paths[index];
            if !path.is_stopped() {
                path.advance();
                for px in path.drain().rev() {
                    if self.pixels.in_canvas(px.x, px.y) {
                        self.pixels.set(px.x as u32, px.y as u32, px.color);
                        stats.pixels_written += 1;
                    } else {
                        stats.pixels_dropped += 1;
                        crate::debug_trace!(
                            "path {} dropped ({}, {}) outside {}x{}",
                            index,
                            px.x,
                            px.y,
                            self.pixels.width(),
                            self.pixels.height()
                        );
                    }
                }
                if path.speed() < 0.0 {
                    path.stop();
                    stats.paths_stopped += 1;
                    crate::debug!(index, frame = self.frame, "spiral stopped");
                }
            }

            if self.paths[index].branch_point().is_some()
                && self.random.next_unit() < self.config.branch_probability
            {
                self.spawn_branch(index);
                stats.branches_spawned += 1;
            }
        }

        self.surface.present(&self.pixels);
        self.last_stats = stats;
        crate::trace!(
            frame = stats.frame,
            written = stats.pixels_written,
            dropped = stats.pixels_dropped,
            stopped = stats.paths_stopped,
            branches = stats.branches_spawned,
            "frame complete"
        );
    }

    fn spawn_branch(&mut self, origin: usize) {
        let Some(point) = self.paths[origin].take_branch_point() else {
            return;
        };
        let color = self.paths[origin].color();
        let size = random_size(self.random.as_mut());
        let branch = SpiralPath::from_branch(
            point,
            self.config.angular_accel_magnitude,
            size,
            color,
        )
        .with_branch_threshold(self.config.branch_threshold_frames);
        crate::debug!(
            origin,
            index = self.paths.len(),
            x = point.x,
            y = point.y,
            "branch spawned"
        );
        self.paths.push(branch);
    }

    /// Write one pixel. The caller guarantees `x < width` and `y < height`.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8, a: u8) {
        self.pixels.set_pixel(x, y, r, g, b, a);
    }

    /// Write one opaque pixel.
    #[inline]
    pub fn set_pixel_rgb(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8) {
        self.set_pixel(x, y, r, g, b, 255);
    }

    /// Begin ticking at the configured frame rate; each tick runs one frame.
    ///
    /// No-op while already running.
    pub fn start(&mut self) {
        self.start_ticker(None);
    }

    /// Begin ticking, running `callback` per tick instead of a plain frame.
    ///
    /// No-op while already running.
    pub fn start_with(&mut self, callback: impl FnMut(&mut Self) + 'static) {
        self.start_ticker(Some(Box::new(callback)));
    }

    fn start_ticker(&mut self, callback: Option<TickCallback<S>>) {
        if self.ticker.is_some() {
            return;
        }
        let interval = self.config.frame_interval();
        self.on_tick = callback;
        self.ticker = Some(self.scheduler.schedule(interval));
        crate::info!(
            fps = self.config.frames_per_second,
            custom_callback = self.on_tick.is_some(),
            "spiral animation started"
        );
    }

    /// Cancel the tick stream. An in-progress frame is not affected.
    pub fn stop(&mut self) {
        if let Some(handle) = self.ticker.take() {
            self.scheduler.cancel(handle);
            crate::info!(frame = self.frame, "spiral animation stopped");
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    /// Handle of the live tick stream, if running.
    #[inline]
    pub fn tick_handle(&self) -> Option<TickHandle> {
        self.ticker
    }

    /// Run one frame (or the callback) per tick fired since the last call.
    ///
    /// Returns how many ticks were handled. A callback that calls
    /// [`Self::stop`] ends the batch early. If it also restarts the stream,
    /// the new stream's tick action replaces the callback from the next
    /// pump on.
    pub fn pump(&mut self) -> u32 {
        let Some(handle) = self.ticker else {
            return 0;
        };
        let ticks = self.scheduler.take_ticks(handle);
        let mut callback = self.on_tick.take();
        let mut handled = 0;
        for _ in 0..ticks {
            match callback.as_mut() {
                Some(cb) => cb(self),
                None => self.advance_frame(),
            }
            handled += 1;
            if self.ticker != Some(handle) {
                break;
            }
        }
        // Only the stream that owned the callback gets it back.
        if self.ticker == Some(handle) {
            self.on_tick = callback;
        }
        handled
    }

    #[inline]
    pub fn paths(&self) -> &[SpiralPath] {
        &self.paths
    }

    /// Paths that are still growing.
    pub fn active_path_count(&self) -> usize {
        self.paths.iter().filter(|p| !p.is_stopped()).count()
    }

    /// Staggered spirals still waiting for their start time.
    #[inline]
    pub fn scheduled_count(&self) -> usize {
        self.scheduled.len()
    }

    #[inline]
    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    #[inline]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[inline]
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[inline]
    pub fn config(&self) -> &SpiralConfig {
        &self.config
    }

    /// Frames advanced so far.
    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    #[inline]
    pub fn last_frame_stats(&self) -> FrameStats {
        self.last_stats
    }
}

impl<S: Surface> Drop for SurfaceController<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<S: Surface> fmt::Debug for SurfaceController<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfaceController")
            .field("width", &self.pixels.width())
            .field("height", &self.pixels.height())
            .field("paths", &self.paths.len())
            .field("scheduled", &self.scheduled.len())
            .field("frame", &self.frame)
            .field("running", &self.ticker.is_some())
            .field("config", &self.config)
            .finish()
    }
}
