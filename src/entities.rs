/// All game entity types — pure data plus the geometry they need.
///
/// Rover, targets and hazards share a [`Body`] (position, bounds, visual)
/// by composition; behaviour lives in `compute`.

/// Milliseconds on the monotonic session clock.
pub type Millis = i64;

// ── Geometry ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    pub fn distance(self, other: Vec2) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Unit vector in the same direction, or `None` for the zero vector.
    pub fn normalized(self) -> Option<Vec2> {
        let len = self.length();
        if len > 0.0 {
            Some(Vec2::new(self.x / len, self.y / len))
        } else {
            None
        }
    }

    pub fn scaled(self, k: f32) -> Vec2 {
        Vec2::new(self.x * k, self.y * k)
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Collision/render footprint of a body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Bounds {
    /// Rectangle centred on the body position.
    CenteredRect { width: f32, height: f32 },
    /// Rectangle whose top-left corner is the body position.
    AnchoredRect { width: f32, height: f32 },
    Circle { radius: f32 },
}

impl Bounds {
    /// Radius of the smallest circle enclosing the shape.
    pub fn bounding_radius(&self) -> f32 {
        match *self {
            Bounds::CenteredRect { width, height } | Bounds::AnchoredRect { width, height } => {
                0.5 * width.hypot(height)
            }
            Bounds::Circle { radius } => radius,
        }
    }
}

/// Axis-aligned rectangle in playfield pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Closest point inside the rectangle to `p`.
    pub fn clamp_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.left, self.right()),
            p.y.clamp(self.top, self.bottom()),
        )
    }
}

// ── Visuals ───────────────────────────────────────────────────────────────────

/// Index of an image held by the presentation side's asset store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageId(pub usize);

/// Procedural stand-ins drawn when an image is unavailable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FallbackShape {
    /// Solid square with a front indicator (rover).
    SolidSquare,
    /// Solid Mars-red fill (background).
    SolidFill,
    /// Coloured disc (science target).
    Disc,
    /// Shaded rectangle with a red border (visible hazard).
    HazardPatch,
    /// Drawn as nothing (hidden hazard).
    Nothing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visual {
    Image(ImageId),
    Fallback(FallbackShape),
}

// ── Bodies ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub bounds: Bounds,
    pub visual: Visual,
}

impl Body {
    /// Rectangle covered by the body; circles report their bounding square.
    pub fn rect(&self) -> Rect {
        let p = self.position;
        match self.bounds {
            Bounds::CenteredRect { width, height } => Rect {
                left: p.x - width / 2.0,
                top: p.y - height / 2.0,
                width,
                height,
            },
            Bounds::AnchoredRect { width, height } => Rect {
                left: p.x,
                top: p.y,
                width,
                height,
            },
            Bounds::Circle { radius } => Rect {
                left: p.x - radius,
                top: p.y - radius,
                width: radius * 2.0,
                height: radius * 2.0,
            },
        }
    }

    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }
}

/// Rover appearance chosen once at startup: a loaded image with its scaled
/// size, or the fallback square.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoverTemplate {
    pub width: f32,
    pub height: f32,
    pub visual: Visual,
}

impl RoverTemplate {
    pub fn fallback(size: f32) -> Self {
        Self {
            width: size,
            height: size,
            visual: Visual::Fallback(FallbackShape::SolidSquare),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Rover {
    pub body: Body,
    /// Screen orientation in degrees; 0 points up, counter-clockwise positive.
    pub facing_degrees: f32,
    /// Pixels travelled per frame while a direction is held.
    pub speed: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScienceTarget {
    pub body: Body,
    /// Cosmetic palette slot, always in `0..TARGET_PALETTE_SIZE`.
    pub type_index: usize,
}

pub const TARGET_PALETTE_SIZE: usize = 4;

impl ScienceTarget {
    pub fn radius(&self) -> f32 {
        self.body.bounds.bounding_radius()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Hazard {
    pub body: Body,
    pub visible: bool,
}

impl Hazard {
    pub fn width(&self) -> f32 {
        self.body.rect().width
    }

    pub fn height(&self) -> f32 {
        self.body.rect().height
    }
}

// ── Session state ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Active,
    Over,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HazardMessage {
    pub text: String,
    pub expires_at: Millis,
}

impl HazardMessage {
    pub fn is_visible(&self, now: Millis) -> bool {
        now < self.expires_at
    }
}

/// Everything the session owns for one mission.
#[derive(Clone, Debug)]
pub struct MissionState {
    pub rover: Rover,
    pub targets: Vec<ScienceTarget>,
    pub hazards: Vec<Hazard>,
    pub score: u32,
    /// Effective start of the countdown; hazard penalties move it backwards.
    pub mission_start: Millis,
    pub remaining_seconds: f32,
    pub status: SessionStatus,
    /// `None` until the first penalty of the mission.
    pub last_hazard_hit: Option<Millis>,
    pub hazard_message: Option<HazardMessage>,
}

impl MissionState {
    pub fn is_over(&self) -> bool {
        self.status == SessionStatus::Over
    }
}

/// Noteworthy things that happened during one simulation step.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    TargetCollected { type_index: usize, score: u32 },
    HazardPenalty { score: u32, remaining_seconds: f32 },
    MissionOver { score: u32 },
}
