//! Ellipsoidal surface distance on the WGS84 reference ellipsoid.
//!
//! The solver is Vincenty's inverse formula: the longitude difference on the
//! auxiliary sphere (λ) is refined by fixed-point iteration until successive
//! values agree to within [`CONVERGENCE_THRESHOLD`] radians, then the arc on
//! the auxiliary sphere is converted to metres along the ellipsoid.
//!
//! Nearly antipodal points may fail to converge. [`try_distance`] reports that
//! as [`GeodesicError::NoConvergence`]; [`distance`] keeps the plain `f64`
//! contract and returns the [`NO_CONVERGENCE`] sentinel instead.

use geo::Coord;
use thiserror::Error;

/// Semi-major axis of the WGS84 ellipsoid in metres.
pub const SEMI_MAJOR_AXIS: f64 = 6_378_137.0;

/// Semi-minor axis of the WGS84 ellipsoid in metres.
pub const SEMI_MINOR_AXIS: f64 = 6_356_752.314_245;

/// Flattening of the WGS84 ellipsoid.
#[expect(
    clippy::float_arithmetic,
    reason = "flattening is defined as the reciprocal of the inverse flattening"
)]
pub const FLATTENING: f64 = 1.0 / 298.257_223_563;

/// Largest change in λ, in radians, accepted as convergence.
pub const CONVERGENCE_THRESHOLD: f64 = 1.0e-12;

/// Maximum number of λ refinements before giving up.
pub const MAX_ITERATIONS: u32 = 100;

/// Value returned by [`distance`] when the solver does not converge.
///
/// Valid distances are never negative, so the sentinel cannot be mistaken
/// for a real (if very long) distance. Test for it with
/// [`is_no_convergence`].
pub const NO_CONVERGENCE: f64 = -1.0e17;

/// Errors raised by [`try_distance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeodesicError {
    /// λ was still moving after the iteration budget was spent.
    #[error("geodesic solver did not converge within {iterations} iterations")]
    NoConvergence {
        /// Number of refinements attempted.
        iterations: u32,
    },
}

/// Distance in metres between two points given in signed decimal degrees.
///
/// Returns `0.0` for coincident points and [`NO_CONVERGENCE`] when the
/// iterative solver exceeds [`MAX_ITERATIONS`].
///
/// # Examples
///
/// ```
/// use waygraph_core::geodesic::distance;
///
/// // One thousandth of a degree along the equator.
/// let metres = distance(0.0, 0.0, 0.0, 0.001);
/// assert!((metres - 111.319_49).abs() < 1.0e-3);
/// ```
#[must_use]
pub fn distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    try_distance(Coord { x: lon1, y: lat1 }, Coord { x: lon2, y: lat2 })
        .unwrap_or(NO_CONVERGENCE)
}

/// Returns `true` when `metres` is the [`NO_CONVERGENCE`] sentinel.
#[must_use]
#[expect(
    clippy::float_cmp,
    reason = "the sentinel is an exact constant, never the result of arithmetic"
)]
pub fn is_no_convergence(metres: f64) -> bool {
    metres == NO_CONVERGENCE
}

/// Distance in metres between two WGS84 coordinates (`x = lon`, `y = lat`).
///
/// # Errors
///
/// Returns [`GeodesicError::NoConvergence`] when λ does not settle within
/// [`MAX_ITERATIONS`] refinements, which happens for nearly antipodal points.
#[expect(
    clippy::float_arithmetic,
    reason = "Vincenty's inverse formula is floating-point trigonometry"
)]
pub fn try_distance(from: Coord<f64>, to: Coord<f64>) -> Result<f64, GeodesicError> {
    let lon_delta = (to.x - from.x).to_radians();
    let reduced_from = ((1.0 - FLATTENING) * from.y.to_radians().tan()).atan();
    let reduced_to = ((1.0 - FLATTENING) * to.y.to_radians().tan()).atan();
    let auxiliary = AuxiliaryLatitudes {
        sin_from: reduced_from.sin(),
        cos_from: reduced_from.cos(),
        sin_to: reduced_to.sin(),
        cos_to: reduced_to.cos(),
    };

    let mut lambda = lon_delta;
    for _ in 0..MAX_ITERATIONS {
        let Some(arc) = auxiliary.arc(lambda) else {
            return Ok(0.0);
        };
        let previous = lambda;
        lambda = arc.next_lambda(lon_delta);
        if (lambda - previous).abs() <= CONVERGENCE_THRESHOLD {
            return Ok(arc.ellipsoidal_length());
        }
    }
    Err(GeodesicError::NoConvergence {
        iterations: MAX_ITERATIONS,
    })
}

/// Sines and cosines of the reduced latitudes of both endpoints.
#[derive(Debug, Clone, Copy)]
struct AuxiliaryLatitudes {
    sin_from: f64,
    cos_from: f64,
    sin_to: f64,
    cos_to: f64,
}

/// Quantities of one λ iteration that the final length depends on.
#[derive(Debug, Clone, Copy)]
struct AuxiliaryArc {
    sin_sigma: f64,
    cos_sigma: f64,
    sigma: f64,
    sin_alpha: f64,
    cos_sq_alpha: f64,
    cos_2sigma_m: f64,
}

impl AuxiliaryLatitudes {
    /// Arc on the auxiliary sphere for the current λ, or `None` when the
    /// points coincide.
    #[expect(
        clippy::float_arithmetic,
        reason = "Vincenty's inverse formula is floating-point trigonometry"
    )]
    fn arc(&self, lambda: f64) -> Option<AuxiliaryArc> {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        let east = self.cos_to * sin_lambda;
        let north = self.cos_from * self.sin_to - self.sin_from * self.cos_to * cos_lambda;
        let sin_sigma = east.hypot(north);
        if sin_sigma == 0.0 {
            return None;
        }
        let cos_sigma = self.sin_from * self.sin_to + self.cos_from * self.cos_to * cos_lambda;
        let sigma = sin_sigma.atan2(cos_sigma);
        let sin_alpha = self.cos_from * self.cos_to * sin_lambda / sin_sigma;
        let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
        // Both points on the equator make this 0/0.
        let raw_cos_2sigma_m = cos_sigma - 2.0 * self.sin_from * self.sin_to / cos_sq_alpha;
        let cos_2sigma_m = if raw_cos_2sigma_m.is_nan() {
            0.0
        } else {
            raw_cos_2sigma_m
        };
        Some(AuxiliaryArc {
            sin_sigma,
            cos_sigma,
            sigma,
            sin_alpha,
            cos_sq_alpha,
            cos_2sigma_m,
        })
    }
}

impl AuxiliaryArc {
    #[expect(
        clippy::float_arithmetic,
        reason = "Vincenty's inverse formula is floating-point trigonometry"
    )]
    fn next_lambda(&self, lon_delta: f64) -> f64 {
        let c = FLATTENING / 16.0
            * self.cos_sq_alpha
            * (4.0 + FLATTENING * (4.0 - 3.0 * self.cos_sq_alpha));
        let correction = self.sigma
            + c * self.sin_sigma
                * (self.cos_2sigma_m
                    + c * self.cos_sigma * (-1.0 + 2.0 * self.cos_2sigma_m * self.cos_2sigma_m));
        lon_delta + (1.0 - c) * FLATTENING * self.sin_alpha * correction
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "Vincenty's inverse formula is floating-point trigonometry"
    )]
    fn ellipsoidal_length(&self) -> f64 {
        let a_sq = SEMI_MAJOR_AXIS * SEMI_MAJOR_AXIS;
        let b_sq = SEMI_MINOR_AXIS * SEMI_MINOR_AXIS;
        let u_sq = self.cos_sq_alpha * (a_sq - b_sq) / b_sq;
        let big_a =
            1.0 + u_sq / 16_384.0 * (4_096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
        let big_b = u_sq / 1_024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
        let cos_2sigma_m_sq = self.cos_2sigma_m * self.cos_2sigma_m;
        let delta_sigma = big_b
            * self.sin_sigma
            * (self.cos_2sigma_m
                + big_b / 4.0
                    * (self.cos_sigma * (-1.0 + 2.0 * cos_2sigma_m_sq)
                        - big_b / 6.0
                            * self.cos_2sigma_m
                            * (-3.0 + 4.0 * self.sin_sigma * self.sin_sigma)
                            * (-3.0 + 4.0 * cos_2sigma_m_sq)));
        SEMI_MINOR_AXIS * big_a * (self.sigma - delta_sigma)
    }
}
