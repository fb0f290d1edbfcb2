//! Point distribution generators.
//!
//! Pure functions producing the target [`PointBuffer`]s the morph engine
//! blends between. Every generator returns a buffer of exactly `3 * count`
//! floats and has no shared state: each call owns an independent random
//! stream, so two buffers of the same shape differ in detail but match
//! statistically.
//!
//! | Generator | Shape | Used for |
//! |-----------|-------|----------|
//! | [`uniform_sphere`] | volume-uniform ball | the scattered "chaos" state |
//! | [`layered_cone`] | base-heavy layered cone with drooping edges | foliage |
//! | [`cone_spiral`] | golden-angle spiral on the cone surface | photo anchors |
//! | [`garland_helix`] | conical helix | garlands |
//! | [`ornament_rings`] | evenly spaced items at layer edges | ornament/gift instances |
//!
//! The seeded `*_with_rng` variants exist for statistical tests; the plain
//! variants seed from the clock, so reloads look different while keeping the
//! same silhouette.

use crate::buffer::PointBuffer;
use crate::shape::{RadiusBand, TreeShape};
use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// The golden angle in radians, `pi * (3 - sqrt(5))`.
///
/// Successive increments by this irrational angle never resonate with a full
/// turn, so spiral points cannot stack up at any count.
pub const GOLDEN_ANGLE: f32 = 2.399_963_2;

/// Layer radii below this are treated as on-axis to avoid dividing by a
/// vanishing radius near the tip.
const RADIUS_EPSILON: f32 = 1e-3;

/// Most ornaments the topmost layer may carry, regardless of total count.
const MAX_TIP_ORNAMENTS: usize = 10;

/// Layer progress cap for edge placement; keeps items off the exact tip.
const TIP_PROGRESS_CAP: f32 = 0.96;

fn clock_rng() -> SmallRng {
    // Different stream each call within a run, different across runs.
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(42);
    SmallRng::seed_from_u64(seed)
}

/// Uniform random points inside a sphere of `radius` centered at the origin.
///
/// Volume-uniform: the radial coordinate is cube-root transformed and the
/// polar angle is sampled through a uniform cosine, so the result is biased
/// toward neither the surface, the center, nor the poles.
pub fn uniform_sphere(count: usize, radius: f32) -> PointBuffer {
    uniform_sphere_with_rng(count, radius, &mut clock_rng())
}

/// Seeded variant of [`uniform_sphere`].
pub fn uniform_sphere_with_rng(count: usize, radius: f32, rng: &mut impl Rng) -> PointBuffer {
    let radius = if radius.is_finite() { radius.max(0.0) } else { 0.0 };
    let mut buf = PointBuffer::with_len(count);

    for i in 0..count {
        let theta = rng.gen_range(0.0..TAU);
        let cos_phi: f32 = rng.gen_range(-1.0..=1.0);
        let sin_phi = (1.0 - cos_phi * cos_phi).max(0.0).sqrt();
        // Cube root for uniform volume distribution
        let r = radius * rng.gen::<f32>().cbrt();

        buf.set_point(
            i,
            Vec3::new(
                r * sin_phi * theta.cos(),
                r * sin_phi * theta.sin(),
                r * cos_phi,
            ),
        );
    }
    buf
}

/// The formed tree body: a layered cone with a full base and sparse tip.
///
/// Each particle draws a layer index skewed toward the base (`u^layer_bias`),
/// then an area-uniform disk radius scaled by that layer's shrinking radius.
/// Particles near a layer's edge sag quadratically (droop), and a small
/// vertical jitter keeps layers from reading as flat plates.
pub fn layered_cone(count: usize, shape: &TreeShape) -> PointBuffer {
    layered_cone_with_rng(count, shape, &mut clock_rng())
}

/// Seeded variant of [`layered_cone`].
pub fn layered_cone_with_rng(count: usize, shape: &TreeShape, rng: &mut impl Rng) -> PointBuffer {
    let shape = shape.sanitized();
    let layers = shape.layers as f32;
    let mut buf = PointBuffer::with_len(count);

    for i in 0..count {
        // Favor bottom layers strongly: u^bias pushes draws toward 0.
        let layer_index = ((rng.gen::<f32>().powf(shape.layer_bias) * layers) as u32)
            .min(shape.layers - 1);
        let progress = if shape.layers > 1 {
            layer_index as f32 / (layers - 1.0)
        } else {
            0.0
        };

        let layer_y = shape.layer_height(progress);
        let layer_radius = shape.layer_radius(progress);

        // sqrt for uniform density over the layer disk
        let r = layer_radius * rng.gen::<f32>().sqrt();
        let theta = rng.gen_range(0.0..TAU);

        // Quadratic droop: 0 at the layer center, full at the edge.
        let droop_factor = if layer_radius > RADIUS_EPSILON {
            r / layer_radius
        } else {
            0.0
        };
        let droop = droop_factor * droop_factor * shape.droop;
        let thickness = (rng.gen::<f32>() - 0.5) * shape.jitter;

        buf.set_point(
            i,
            Vec3::new(
                r * theta.cos(),
                layer_y - droop + thickness,
                r * theta.sin(),
            ),
        );
    }
    buf
}

/// Golden-angle spiral over the cone surface.
///
/// The angle advances by [`GOLDEN_ANGLE`] per index; the height mapping
/// inverts the cumulative surface area of the radius power law analytically,
/// so density per unit of cone surface is constant. Unlike independent
/// random sampling, no two points can cluster at any count, which is why
/// photo anchors use this generator.
pub fn cone_spiral(count: usize, shape: &TreeShape) -> PointBuffer {
    let shape = shape.sanitized();
    let mut buf = PointBuffer::with_len(count);
    // Area element on the surface goes as (1 - p)^exp, so the cumulative
    // share below progress p is 1 - (1 - p)^(exp + 1). Inverting that maps
    // the even index spacing t onto area-even heights.
    let area_exp = shape.radius_exponent + 1.0;

    for i in 0..count {
        let t = if count > 1 {
            i as f32 / (count - 1) as f32
        } else {
            0.0
        };
        let progress = (1.0 - (1.0 - t).max(0.0).powf(1.0 / area_exp)).min(TIP_PROGRESS_CAP);

        let r = shape.layer_radius(progress);
        let theta = i as f32 * GOLDEN_ANGLE;

        buf.set_point(
            i,
            Vec3::new(
                r * theta.cos(),
                shape.layer_height(progress) - shape.droop,
                r * theta.sin(),
            ),
        );
    }
    buf
}

/// A conical helix wrapping the tree `turns` times, for garlands.
///
/// Height rises linearly, radius follows the same sub-linear shrink law as
/// the cone (slightly widened so the garland sits outside the foliage), and
/// the whole strand starts a little below the lowest branches.
pub fn garland_helix(count: usize, shape: &TreeShape, turns: f32) -> PointBuffer {
    let shape = shape.sanitized();
    let mut buf = PointBuffer::with_len(count);

    for i in 0..count {
        let t = i as f32 / count.max(1) as f32;
        let y = shape.layer_height(t) - 1.0;
        let radius = (shape.max_radius + 0.5) * (1.0 - t).powf(shape.radius_exponent);
        let theta = t * TAU * turns;

        buf.set_point(i, Vec3::new(radius * theta.cos(), y, radius * theta.sin()));
    }
    buf
}

/// Ornament anchors at the branch tips, layer by layer.
///
/// The topmost layer is capped at a handful of items; the remainder spreads
/// over the lower layers in linearly decreasing quotas from base to tip.
/// Within a layer, items sit near the outer edge (inside `band`, as a
/// fraction of the layer radius) at evenly spaced angles with a little
/// jitter so the ring does not look machined.
pub fn ornament_rings(count: usize, shape: &TreeShape, band: RadiusBand) -> PointBuffer {
    ornament_rings_with_rng(count, shape, band, &mut clock_rng())
}

/// Seeded variant of [`ornament_rings`].
pub fn ornament_rings_with_rng(
    count: usize,
    shape: &TreeShape,
    band: RadiusBand,
    rng: &mut impl Rng,
) -> PointBuffer {
    let shape = shape.sanitized();
    let band = RadiusBand::new(band.min, band.max);
    let mut buf = PointBuffer::with_len(count);
    if count == 0 {
        return buf;
    }

    let layers = shape.layers as usize;
    let tip_quota = MAX_TIP_ORNAMENTS.min((count / 100).max(1));
    let remaining = count.saturating_sub(tip_quota);

    // Lower layers get linearly more: layer 0 weighs `layers` units, the
    // second-to-top layer weighs 2, the tip is handled by its fixed quota.
    let total_units = (layers * (layers + 1)) / 2 - 1;

    let mut placed = 0;
    for layer_index in 0..layers {
        if placed >= count {
            break;
        }
        let progress = if layers > 1 {
            (layer_index as f32 / (layers - 1) as f32).min(TIP_PROGRESS_CAP)
        } else {
            0.0
        };

        let quota = if layer_index == layers - 1 {
            tip_quota
        } else {
            let layer_units = layers - layer_index;
            ((layer_units * remaining) as f32 / total_units.max(1) as f32).round() as usize
        };
        if quota == 0 {
            continue;
        }

        let layer_y = shape.layer_height(progress);
        let layer_radius = shape.layer_radius(progress);
        let angle_step = TAU / quota as f32;

        for j in 0..quota {
            if placed >= count {
                break;
            }
            let r = layer_radius * rng.gen_range(band.min..=band.max);
            let theta = j as f32 * angle_step + (rng.gen::<f32>() - 0.5) * angle_step * 0.5;
            // Edge placement sags by the full droop.
            let y = layer_y - shape.droop + (rng.gen::<f32>() - 0.5) * 0.5;

            buf.set_point(placed, Vec3::new(r * theta.cos(), y, r * theta.sin()));
            placed += 1;
        }
    }

    // Quota rounding can leave a few unplaced; drop them on the base ring.
    while placed < count {
        let r = shape.max_radius * rng.gen_range(band.min..=band.max);
        let theta = rng.gen_range(0.0..TAU);
        let y = shape.layer_height(0.0) - shape.droop;
        buf.set_point(placed, Vec3::new(r * theta.cos(), y, r * theta.sin()));
        placed += 1;
    }

    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(0x5eed)
    }

    #[test]
    fn test_zero_count_is_empty() {
        assert!(uniform_sphere(0, 10.0).is_empty());
        assert!(layered_cone(0, &TreeShape::default()).is_empty());
        assert!(cone_spiral(0, &TreeShape::default()).is_empty());
        assert!(garland_helix(0, &TreeShape::default(), 4.0).is_empty());
        assert!(ornament_rings(0, &TreeShape::default(), RadiusBand::default()).is_empty());
    }

    #[test]
    fn test_sphere_points_within_radius() {
        let buf = uniform_sphere_with_rng(1000, 20.0, &mut rng());
        assert_eq!(buf.len(), 1000);
        for p in buf.iter() {
            assert!(p.length() <= 20.0001);
        }
    }

    #[test]
    fn test_sphere_radial_density_grows_quadratically() {
        // Volume-uniform means the mass below radius r goes as (r/R)^3.
        let buf = uniform_sphere_with_rng(40_000, 1.0, &mut rng());
        let mut bins = [0usize; 4];
        for p in buf.iter() {
            let idx = ((p.length() * 4.0) as usize).min(3);
            bins[idx] += 1;
        }
        let n = buf.len() as f32;
        for (i, &b) in bins.iter().enumerate() {
            let lo = i as f32 / 4.0;
            let hi = (i + 1) as f32 / 4.0;
            let expected = hi.powi(3) - lo.powi(3);
            let observed = b as f32 / n;
            assert!(
                (observed - expected).abs() < 0.02,
                "bin {i}: observed {observed}, expected {expected}"
            );
        }
    }

    #[test]
    fn test_sphere_has_no_polar_bias() {
        let buf = uniform_sphere_with_rng(40_000, 1.0, &mut rng());
        let mean_cos: f32 = buf
            .iter()
            .filter(|p| p.length() > 1e-4)
            .map(|p| p.z / p.length())
            .sum::<f32>()
            / buf.len() as f32;
        assert!(mean_cos.abs() < 0.02, "mean polar cosine {mean_cos}");
    }

    #[test]
    fn test_sphere_zero_radius_collapses_to_origin() {
        let buf = uniform_sphere_with_rng(50, 0.0, &mut rng());
        for p in buf.iter() {
            assert_eq!(p, Vec3::ZERO);
        }
    }

    #[test]
    fn test_cone_respects_bounds() {
        let shape = TreeShape {
            droop: 0.3,
            jitter: 0.4,
            ..Default::default()
        };
        let buf = layered_cone_with_rng(1000, &shape, &mut rng());
        for p in buf.iter() {
            assert!(p.y <= shape.max_y_bound() + 1e-4);
            assert!(p.y >= shape.min_y_bound() - 1e-4);
            assert!(p.y.abs() <= 6.5);
            let radial = (p.x * p.x + p.z * p.z).sqrt();
            assert!(radial <= shape.max_radius + 1e-4);
        }
    }

    #[test]
    fn test_cone_favors_base_layers() {
        let buf = layered_cone_with_rng(10_000, &TreeShape::default(), &mut rng());
        let below = buf.iter().filter(|p| p.y < 0.0).count();
        // The bias exponent should put well over half the mass in the lower half.
        assert!(below > 7_000, "only {below} of 10000 below center");
    }

    #[test]
    fn test_cone_zero_radius_sits_on_axis() {
        let shape = TreeShape {
            max_radius: 0.0,
            ..Default::default()
        };
        let buf = layered_cone_with_rng(200, &shape, &mut rng());
        for p in buf.iter() {
            assert!(p.x.abs() < 1e-6 && p.z.abs() < 1e-6);
            assert!(p.y.is_finite());
        }
    }

    #[test]
    fn test_spiral_consecutive_angles_stay_separated() {
        let buf = cone_spiral(500, &TreeShape::default());
        for i in 1..buf.len() {
            let a = buf.point(i - 1);
            let b = buf.point(i);
            let ta = a.z.atan2(a.x);
            let tb = b.z.atan2(b.x);
            let mut diff = (tb - ta).abs() % TAU;
            if diff > TAU / 2.0 {
                diff = TAU - diff;
            }
            // Golden-angle stepping keeps neighbors ~2.4 rad apart (mod tau).
            assert!(diff > 2.0, "indices {} and {i} only {diff} rad apart", i - 1);
        }
    }

    #[test]
    fn test_spiral_height_is_monotonic() {
        let buf = cone_spiral(100, &TreeShape::default());
        for i in 1..buf.len() {
            assert!(buf.point(i).y >= buf.point(i - 1).y - 1e-5);
        }
    }

    #[test]
    fn test_helix_wraps_and_narrows() {
        let shape = TreeShape::default();
        let buf = garland_helix(800, &shape, 4.0);
        let first = buf.point(0);
        let last = buf.point(799);
        assert!(last.y > first.y);
        let r_first = (first.x * first.x + first.z * first.z).sqrt();
        let r_last = (last.x * last.x + last.z * last.z).sqrt();
        assert!(r_last < r_first);
    }

    #[test]
    fn test_ornaments_fill_exact_count() {
        let buf = ornament_rings_with_rng(
            300,
            &TreeShape::default(),
            RadiusBand::default(),
            &mut rng(),
        );
        assert_eq!(buf.len(), 300);
        // No zeroed leftovers: everything was placed somewhere off-axis.
        for p in buf.iter() {
            assert!(p != Vec3::ZERO);
        }
    }

    #[test]
    fn test_ornaments_cap_the_tip_layer() {
        let shape = TreeShape::default();
        let buf = ornament_rings_with_rng(1000, &shape, RadiusBand::new(1.0, 1.0), &mut rng());
        // Anything above the second-to-top layer's jitter ceiling belongs to
        // the capped tip ring.
        let second_progress = (shape.layers - 2) as f32 / (shape.layers - 1) as f32;
        let tip_cutoff = shape.layer_height(second_progress) - shape.droop + 0.26;
        let near_tip = buf.iter().filter(|p| p.y > tip_cutoff).count();
        assert!(near_tip <= MAX_TIP_ORNAMENTS, "{near_tip} items at the tip");
    }
}
