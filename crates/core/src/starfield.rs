//! Decorative star-streak field
//!
//! The field owns a fixed population of [`Star`]s that fall down the
//! viewport while swirling sideways. Stars leaving the bottom edge are
//! recycled just above the top edge, so the animation never runs dry.
//! Painting goes through the [`Surface`] trait so the browser canvas and
//! tests share the same stepping code.

use rand::Rng;
use std::f64::consts::TAU;

/// Number of stars in a default field
pub const STAR_COUNT: usize = 400;

/// Vertical position given to a recycled star
pub const RESPAWN_Y: f64 = -10.0;

const STREAK_SCALE: f64 = 4.0;
const SWIRL_PERIOD: f64 = 50.0;
const SWIRL_AMPLITUDE: f64 = 0.3;

/// Streak palette
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreakColor {
    Rosewood,
    MidnightBlue,
    Indigo,
    Orchid,
}

impl StreakColor {
    pub const ALL: [Self; 4] = [Self::Rosewood, Self::MidnightBlue, Self::Indigo, Self::Orchid];

    /// CSS color string understood by a 2d canvas context
    pub const fn css(self) -> &'static str {
        match self {
            Self::Rosewood => "#744f4fff",
            Self::MidnightBlue => "#191970",
            Self::Indigo => "#280569ff",
            Self::Orchid => "#b71be6ff",
        }
    }

    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// Size of the drawing surface in CSS pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Negative or NaN dimensions collapse to zero.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }
}

/// A line segment to paint for one star
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Streak {
    pub from: (f64, f64),
    pub to: (f64, f64),
}

/// Something the field can paint onto
pub trait Surface {
    /// Wipe the whole surface
    fn clear(&mut self, viewport: Viewport);

    /// Stroke a one pixel wide streak
    fn stroke(&mut self, streak: Streak, color: StreakColor, opacity: f64);
}

/// One animated streak
#[derive(Clone, Debug, PartialEq)]
pub struct Star {
    pub x: f64,
    pub y: f64,
    pub length: f64,
    pub speed: f64,
    pub opacity: f64,
    pub color: StreakColor,
    pub angle: f64,
}

impl Star {
    fn random<R: Rng + ?Sized>(rng: &mut R, viewport: Viewport) -> Self {
        Self {
            x: uniform(rng, viewport.width),
            y: uniform(rng, viewport.height),
            length: rng.gen_range(1.0..3.0),
            speed: rng.gen_range(0.05..0.55),
            opacity: rng.gen_range(0.2..1.0),
            color: StreakColor::random(rng),
            angle: rng.gen_range(0.0..TAU),
        }
    }

    /// Segment from the star's head along its heading
    pub fn streak(&self) -> Streak {
        let reach = self.length * STREAK_SCALE;
        Streak {
            from: (self.x, self.y),
            to: (self.x + self.angle.sin() * reach, self.y + reach),
        }
    }

    /// Fall by `speed`, then drift sideways by a swirl term that couples the
    /// new height with the heading.
    fn advance(&mut self) {
        self.y += self.speed;
        self.x += (self.y / SWIRL_PERIOD + self.angle).sin() * SWIRL_AMPLITUDE;
    }

    fn respawn<R: Rng + ?Sized>(&mut self, rng: &mut R, width: f64) {
        self.y = RESPAWN_Y;
        self.x = uniform(rng, width);
        self.angle = rng.gen_range(0.0..TAU);
    }
}

/// Uniform sample in `[0, upper)`, or zero for an empty range
fn uniform<R: Rng + ?Sized>(rng: &mut R, upper: f64) -> f64 {
    if upper > 0.0 {
        rng.gen_range(0.0..upper)
    } else {
        0.0
    }
}

/// The whole animated population
pub struct StarField<R> {
    stars: Vec<Star>,
    viewport: Viewport,
    rng: R,
}

impl<R: Rng> StarField<R> {
    /// Populate a field of [`STAR_COUNT`] stars
    pub fn new(viewport: Viewport, rng: R) -> Self {
        Self::with_count(viewport, STAR_COUNT, rng)
    }

    /// Populate a field with an explicit number of stars
    pub fn with_count(viewport: Viewport, count: usize, mut rng: R) -> Self {
        let stars = (0..count)
            .map(|_| Star::random(&mut rng, viewport))
            .collect();
        Self {
            stars,
            viewport,
            rng,
        }
    }

    /// Paint one frame and advance every star
    pub fn step<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        surface.clear(self.viewport);

        let Viewport { width, height } = self.viewport;
        for star in &mut self.stars {
            surface.stroke(star.streak(), star.color, star.opacity);
            star.advance();
            if star.y > height {
                star.respawn(&mut self.rng, width);
            }
        }
    }

    /// Track a new surface size. Stars keep their coordinates.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }
}
