//! Shape parameters for the formed tree.
//!
//! [`TreeShape`] describes the layered cone silhouette every formed-state
//! generator works from: overall height, base radius, layer count and the
//! droop/jitter amounts that keep layers from reading as flat plates.

/// Parameters of the layered-cone tree silhouette.
///
/// All generators in [`crate::placement`] take the shape by reference and
/// never mutate it. Out-of-range values are clamped by [`TreeShape::sanitized`]
/// rather than rejected; a degenerate shape (zero height or radius) still
/// produces a valid, axis-collapsed buffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TreeShape {
    /// Total height; layers span `-height/2 ..= height/2`.
    pub height: f32,
    /// Radius of the bottom layer.
    pub max_radius: f32,
    /// Number of branch layers.
    pub layers: u32,
    /// Exponent skewing random layer selection toward the base.
    /// Values > 1 give the base super-linearly more particles than the tip.
    pub layer_bias: f32,
    /// Exponent of the radius shrink law `r = max_radius * (1 - p)^exp`.
    /// Below 1 the cone profile bows slightly outward.
    pub radius_exponent: f32,
    /// Maximum droop: edge particles sag by up to this much, quadratically
    /// in their normalized distance from the layer center.
    pub droop: f32,
    /// Total vertical jitter band per layer (`y` varies by `±jitter/2`).
    pub jitter: f32,
}

impl Default for TreeShape {
    fn default() -> Self {
        Self {
            height: 12.0,
            max_radius: 4.0,
            layers: 16,
            layer_bias: 2.5,
            radius_exponent: 0.8,
            droop: 1.5,
            jitter: 0.8,
        }
    }
}

impl TreeShape {
    /// Return a copy with every field forced into its valid range.
    ///
    /// Negative lengths clamp to zero, non-finite values fall back to the
    /// defaults, and the layer count is at least 1. Generators call this on
    /// entry so malformed parameters can never put NaN into a buffer.
    pub fn sanitized(&self) -> Self {
        let d = Self::default();
        let finite = |v: f32, fallback: f32| if v.is_finite() { v } else { fallback };
        Self {
            height: finite(self.height, d.height).max(0.0),
            max_radius: finite(self.max_radius, d.max_radius).max(0.0),
            layers: self.layers.max(1),
            layer_bias: finite(self.layer_bias, d.layer_bias).max(0.0),
            radius_exponent: finite(self.radius_exponent, d.radius_exponent).max(0.01),
            droop: finite(self.droop, d.droop).max(0.0),
            jitter: finite(self.jitter, d.jitter).max(0.0),
        }
    }

    /// Height of a layer at normalized progress `p` (0 = base, 1 = tip).
    #[inline]
    pub fn layer_height(&self, p: f32) -> f32 {
        p * self.height - self.height / 2.0
    }

    /// Radius of a layer at normalized progress `p`, following the
    /// sub-linear shrink law.
    #[inline]
    pub fn layer_radius(&self, p: f32) -> f32 {
        self.max_radius * (1.0 - p).max(0.0).powf(self.radius_exponent)
    }

    /// Highest `y` any cone-layer particle can reach (tip plus jitter).
    #[inline]
    pub fn max_y_bound(&self) -> f32 {
        self.height / 2.0 + self.jitter / 2.0
    }

    /// Lowest `y` any cone-layer particle can reach (base minus full droop
    /// and jitter).
    #[inline]
    pub fn min_y_bound(&self) -> f32 {
        -self.height / 2.0 - self.droop - self.jitter / 2.0
    }
}

/// Fractional radius band for edge placement, relative to a layer's radius.
///
/// `0.9..1.1` places items right at the branch tips with a little overhang.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadiusBand {
    pub min: f32,
    pub max: f32,
}

impl RadiusBand {
    /// Band constructor; swaps the ends if given in the wrong order.
    pub fn new(min: f32, max: f32) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }
}

impl Default for RadiusBand {
    fn default() -> Self {
        Self { min: 0.9, max: 1.1 }
    }
}
