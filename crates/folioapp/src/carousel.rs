//! # Carousel Engine
//!
//! Images of a section are laid out on a ring and the ring spins slowly.
//!
//! ## Geometry
//!
//! For `N` images the angular step is `theta = 360 / N` degrees. The ring
//! radius approximates a circumference that fits `N` items edge to edge at
//! the base width, with a floor so small rings do not collapse:
//!
//! ```text
//! radius = max(min_radius, round((item_width + gap) * N / 2π))
//! ```
//!
//! A single image is the degenerate case: `theta = 0`, `radius = 0`.
//! Item `i` sits at `rotateY(theta*i deg) translateZ(radius px)`. The ring
//! itself is pushed back by the radius and turned by the current angle,
//! `translateZ(-radius px) rotateY(angle deg)`. That ring transform is the
//! only thing animation and navigation ever change.
//!
//! ## Rotation Task
//!
//! The continuous rotation is a cooperative task driven by animation frames.
//! Each frame callback carries a [`FrameToken`]; while the carousel is open
//! the callback advances the angle (unless the pointer hovers the scene) and
//! requests the next frame with the same token. Closing or re-opening bumps
//! the generation, so any token still in flight is stale and stops the chain.
//!
//! Manual navigation jumps the angle by one `theta` and leaves the task
//! running; it simply continues from the new angle.

use crate::loader::DisplaySource;
use crate::surface::{CarouselItemView, Surface};
use std::collections::VecDeque;
use std::f64::consts::PI;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarouselSettings {
    pub item_width: f64,
    pub gap: f64,
    pub min_radius: f64,
    /// Degrees subtracted from the angle per animation frame.
    pub rotation_step: f64,
}

impl Default for CarouselSettings {
    fn default() -> Self {
        Self {
            item_width: 600.0,
            gap: 30.0,
            min_radius: 250.0,
            rotation_step: 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingGeometry {
    pub count: usize,
    pub theta: f64,
    pub radius: f64,
}

impl RingGeometry {
    pub fn compute(count: usize, settings: &CarouselSettings) -> Self {
        if count <= 1 {
            return Self {
                count,
                theta: 0.0,
                radius: 0.0,
            };
        }
        let n = count as f64;
        let perimeter = (settings.item_width + settings.gap) * n;
        let radius = (perimeter / (2.0 * PI)).round().max(settings.min_radius);
        Self {
            count,
            theta: 360.0 / n,
            radius,
        }
    }

    pub fn item_transform(&self, index: usize) -> String {
        format!(
            "rotateY({}deg) translateZ({}px)",
            css_number(self.theta * index as f64),
            css_number(self.radius)
        )
    }

    pub fn ring_transform(&self, angle: f64) -> String {
        format!(
            "translateZ({}px) rotateY({}deg)",
            css_number(-self.radius),
            css_number(angle)
        )
    }
}

/// Formats a number for a transform string: at most four decimals, no `-0`.
fn css_number(value: f64) -> String {
    let rounded = (value * 10_000.0).round() / 10_000.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{}", rounded)
    }
}

/// Continuation token of the rotation task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameToken {
    generation: u64,
}

pub trait FrameScheduler {
    fn request_frame(&mut self, token: FrameToken);
}

/// Cooperative frame queue. The host drains it once per animation frame.
#[derive(Debug, Default)]
pub struct FrameQueue {
    pending: VecDeque<FrameToken>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take_pending(&mut self) -> Vec<FrameToken> {
        self.pending.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self, token: FrameToken) {
        self.pending.push_back(token);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselPhase {
    Closed,
    Running,
    Paused,
}

#[derive(Debug)]
pub struct Carousel {
    settings: CarouselSettings,
    geometry: RingGeometry,
    angle: f64,
    running: bool,
    hovering: bool,
    generation: u64,
    /// Sources shown on the ring, held so their handles outlive reloads.
    images: Vec<DisplaySource>,
}

impl Default for Carousel {
    fn default() -> Self {
        Self::new(CarouselSettings::default())
    }
}

impl Carousel {
    pub fn new(settings: CarouselSettings) -> Self {
        Self {
            settings,
            geometry: RingGeometry::compute(0, &settings),
            angle: 0.0,
            running: false,
            hovering: false,
            generation: 0,
            images: Vec::new(),
        }
    }

    pub fn phase(&self) -> CarouselPhase {
        match (self.running, self.hovering) {
            (false, _) => CarouselPhase::Closed,
            (true, false) => CarouselPhase::Running,
            (true, true) => CarouselPhase::Paused,
        }
    }

    pub fn is_open(&self) -> bool {
        self.running
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn geometry(&self) -> RingGeometry {
        self.geometry
    }

    pub fn settings(&self) -> &CarouselSettings {
        &self.settings
    }

    /// Open on `images` facing `selected`. Returns false (and does nothing)
    /// when there is nothing to show.
    pub fn open<U: Surface, F: FrameScheduler>(
        &mut self,
        images: Vec<DisplaySource>,
        selected: usize,
        surface: &mut U,
        scheduler: &mut F,
    ) -> bool {
        if images.is_empty() {
            return false;
        }

        self.geometry = RingGeometry::compute(images.len(), &self.settings);
        let items = images
            .iter()
            .enumerate()
            .map(|(index, source)| CarouselItemView {
                index,
                url: source.url().to_string(),
                transform: self.geometry.item_transform(index),
            })
            .collect();
        self.images = images;
        self.angle = -(selected as f64 * self.geometry.theta);

        surface.show_carousel(items);
        self.update(surface);
        surface.set_scroll_locked(true);

        self.start(scheduler);
        debug!(
            count = self.geometry.count,
            theta = self.geometry.theta,
            radius = self.geometry.radius,
            selected,
            "carousel opened"
        );
        true
    }

    fn start<F: FrameScheduler>(&mut self, scheduler: &mut F) {
        self.generation += 1;
        self.running = true;
        self.hovering = false;
        scheduler.request_frame(FrameToken {
            generation: self.generation,
        });
    }

    /// One animation frame. Returns whether the task re-scheduled itself.
    pub fn on_frame<U: Surface, F: FrameScheduler>(
        &mut self,
        token: FrameToken,
        surface: &mut U,
        scheduler: &mut F,
    ) -> bool {
        if !self.running || token.generation != self.generation {
            return false;
        }
        if !self.hovering {
            self.angle -= self.settings.rotation_step;
            self.update(surface);
        }
        scheduler.request_frame(token);
        true
    }

    pub fn set_hovering(&mut self, hovering: bool) {
        self.hovering = hovering;
    }

    pub fn next<U: Surface>(&mut self, surface: &mut U) {
        if self.running {
            self.angle -= self.geometry.theta;
            self.update(surface);
        }
    }

    pub fn prev<U: Surface>(&mut self, surface: &mut U) {
        if self.running {
            self.angle += self.geometry.theta;
            self.update(surface);
        }
    }

    pub fn close<U: Surface>(&mut self, surface: &mut U) {
        self.running = false;
        self.hovering = false;
        self.generation += 1;
        self.images.clear();
        surface.hide_carousel();
        surface.set_scroll_locked(false);
        debug!("carousel closed");
    }

    fn update<U: Surface>(&self, surface: &mut U) {
        surface.set_ring_transform(&self.geometry.ring_transform(self.angle));
    }
}
