//! Core geometry types: Size, EdgeInsets, Constraints, Rect.
//!
//! These are the foundational value types used throughout trellis-ui for sizing,
//! spacing, and positioning elements. All dimensions are `f64` so that unbounded
//! ("infinite") constraint maxima can be represented directly.

use std::ops::Add;

// ---------------------------------------------------------------------------
// Size
// ---------------------------------------------------------------------------

/// A 2D size (width x height) in layout units.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// A zero-sized size.
    pub const ZERO: Size = Size { width: 0.0, height: 0.0 };

    /// An infinite size, used for unconstrained layouts.
    pub const INFINITE: Size = Size {
        width: f64::INFINITY,
        height: f64::INFINITY,
    };

    /// Create a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A square size with the same width and height.
    #[inline]
    pub const fn square(value: f64) -> Self {
        Self { width: value, height: value }
    }

    /// Whether both dimensions are zero.
    #[inline]
    pub fn is_zero(self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }

    /// Whether either dimension is non-finite.
    #[inline]
    pub fn is_unbounded(self) -> bool {
        !self.width.is_finite() || !self.height.is_finite()
    }

    /// Replace any non-finite dimension with zero.
    #[inline]
    pub fn finite_or_zero(self) -> Size {
        Size {
            width: if self.width.is_finite() { self.width } else { 0.0 },
            height: if self.height.is_finite() { self.height } else { 0.0 },
        }
    }

    /// Grow this size by the total extent of the given insets.
    #[inline]
    pub fn inflate(self, insets: EdgeInsets) -> Size {
        Size {
            width: self.width + insets.horizontal(),
            height: self.height + insets.vertical(),
        }
    }
}

impl Add for Size {
    type Output = Size;
    #[inline]
    fn add(self, rhs: Size) -> Size {
        Size {
            width: self.width + rhs.width,
            height: self.height + rhs.height,
        }
    }
}

// ---------------------------------------------------------------------------
// EdgeInsets
// ---------------------------------------------------------------------------

/// Spacing around the four sides of a rectangle, used for container padding.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct EdgeInsets {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl EdgeInsets {
    /// Zero insets on all sides.
    pub const ZERO: EdgeInsets = EdgeInsets {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    /// Create insets with explicit values for each side.
    #[inline]
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self { top, right, bottom, left }
    }

    /// All four sides set to the same value.
    #[inline]
    pub const fn all(value: f64) -> Self {
        Self { top: value, right: value, bottom: value, left: value }
    }

    /// Symmetric insets: `vertical` for top/bottom, `horizontal` for left/right.
    #[inline]
    pub const fn symmetric(vertical: f64, horizontal: f64) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    /// Total horizontal extent: `left + right`.
    #[inline]
    pub fn horizontal(self) -> f64 {
        self.left + self.right
    }

    /// Total vertical extent: `top + bottom`.
    #[inline]
    pub fn vertical(self) -> f64 {
        self.top + self.bottom
    }
}

// ---------------------------------------------------------------------------
// Constraints
// ---------------------------------------------------------------------------

/// Min/max bounds passed down during the measure pass.
///
/// Invariant: `min <= max` on each axis. Violating constraints are a caller
/// error and are debug-asserted at construction rather than represented
/// in-band.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Constraints {
    pub min_width: f64,
    pub max_width: f64,
    pub min_height: f64,
    pub max_height: f64,
}

impl Default for Constraints {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

impl Constraints {
    /// Fully unconstrained: zero minima, infinite maxima.
    pub const UNBOUNDED: Constraints = Constraints {
        min_width: 0.0,
        max_width: f64::INFINITY,
        min_height: 0.0,
        max_height: f64::INFINITY,
    };

    /// Create constraints with explicit bounds.
    #[inline]
    pub fn new(min_width: f64, max_width: f64, min_height: f64, max_height: f64) -> Self {
        debug_assert!(min_width <= max_width, "min_width must not exceed max_width");
        debug_assert!(min_height <= max_height, "min_height must not exceed max_height");
        Self { min_width, max_width, min_height, max_height }
    }

    /// Tight constraints: the only satisfying size is `size` itself.
    #[inline]
    pub fn tight(size: Size) -> Self {
        Self {
            min_width: size.width,
            max_width: size.width,
            min_height: size.height,
            max_height: size.height,
        }
    }

    /// Loose constraints: anything from zero up to `max`.
    #[inline]
    pub fn loose(max: Size) -> Self {
        Self {
            min_width: 0.0,
            max_width: max.width,
            min_height: 0.0,
            max_height: max.height,
        }
    }

    /// Clamp a size into these bounds.
    #[inline]
    pub fn constrain(self, size: Size) -> Size {
        Size {
            width: size.width.clamp(self.min_width, self.max_width),
            height: size.height.clamp(self.min_height, self.max_height),
        }
    }

    /// Whether `size` already satisfies these bounds.
    #[inline]
    pub fn is_satisfied_by(self, size: Size) -> bool {
        self.constrain(size) == size
    }

    /// Whether both axes are tight (min == max).
    #[inline]
    pub fn is_tight(self) -> bool {
        self.min_width == self.max_width && self.min_height == self.max_height
    }

    /// The largest size satisfying these constraints.
    #[inline]
    pub fn biggest(self) -> Size {
        Size { width: self.max_width, height: self.max_height }
    }

    /// The smallest size satisfying these constraints.
    #[inline]
    pub fn smallest(self) -> Size {
        Size { width: self.min_width, height: self.min_height }
    }

    /// Drop the minima to zero, keeping the maxima.
    #[inline]
    pub fn loosen(self) -> Self {
        Self {
            min_width: 0.0,
            max_width: self.max_width,
            min_height: 0.0,
            max_height: self.max_height,
        }
    }

    /// Narrow the available box by `insets` (padding on the way down).
    ///
    /// Maxima shrink by the total inset extent; minima follow. All bounds are
    /// clamped at zero so over-large padding cannot produce negative space.
    #[inline]
    pub fn deflate(self, insets: EdgeInsets) -> Self {
        let h = insets.horizontal();
        let v = insets.vertical();
        let max_width = (self.max_width - h).max(0.0);
        let max_height = (self.max_height - v).max(0.0);
        Self {
            min_width: (self.min_width - h).clamp(0.0, max_width),
            max_width,
            min_height: (self.min_height - v).clamp(0.0, max_height),
            max_height,
        }
    }
}

// ---------------------------------------------------------------------------
// Rect
// ---------------------------------------------------------------------------

/// Positioned geometry produced by the arrange pass.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// An empty rect at the origin.
    pub const ZERO: Rect = Rect { x: 0.0, y: 0.0, width: 0.0, height: 0.0 };

    /// Create a new rect.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// A rect at the origin with the given size.
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self { x: 0.0, y: 0.0, width: size.width, height: size.height }
    }

    /// The dimensions as a [`Size`].
    #[inline]
    pub const fn size(self) -> Size {
        Size { width: self.width, height: self.height }
    }

    /// Contract the rect inward by the given insets.
    ///
    /// Width and height are clamped at zero to avoid negative dimensions.
    #[inline]
    pub fn shrink(self, insets: EdgeInsets) -> Rect {
        Rect {
            x: self.x + insets.left,
            y: self.y + insets.top,
            width: (self.width - insets.horizontal()).max(0.0),
            height: (self.height - insets.vertical()).max(0.0),
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
