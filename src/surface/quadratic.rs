//! Root finding for ray / quadric intersections.
use super::no_intersection;
use crate::types::SurfaceState;
use roots::{find_roots_quadratic, Roots};

/// Nonnegative roots of `a t² + 2 half_b t + c = 0`.
///
/// `c` is the value of the surface function at the ray origin, `half_b` half of its derivative along the ray.
/// Negative and complex roots are replaced by [`no_intersection()`]; the slot order of the two roots is kept
/// (smaller root first). A tangent ray (double root) does not cross the surface and yields no intersection.
///
/// If the ray origin is known to be on the surface, `c` is taken to be exactly zero so that the remaining root is
/// `-2 half_b / a`.
pub fn calc_quadric_intersections(
    a: f64,
    half_b: f64,
    c: f64,
    on_surface: SurfaceState,
) -> [f64; 2] {
    let none = no_intersection();
    if a == 0.0 {
        // ray is parallel to a generator of the surface: the equation degenerates to a linear one
        if half_b == 0.0 || on_surface == SurfaceState::On {
            return [none, none];
        }
        let t = -c / (2.0 * half_b);
        return [if t >= 0.0 { t } else { none }, none];
    }
    match on_surface {
        SurfaceState::On => {
            let t = -2.0 * half_b / a;
            if t > 0.0 {
                [t, none]
            } else {
                [none, none]
            }
        }
        SurfaceState::Off => match find_roots_quadratic(a, 2.0 * half_b, c) {
            Roots::Two([t0, t1]) => {
                let (near, far) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };
                [nonnegative(near), nonnegative(far)]
            }
            // no real roots or a tangent ray
            _ => [none, none],
        },
    }
}

fn nonnegative(t: f64) -> f64 {
    if t >= 0.0 && t.is_finite() {
        t
    } else {
        no_intersection()
    }
}
