use crate::error::ErrorKind;
use crate::utils::{clamp, round2};
use num_traits::float::Float;

/// z for a 95% confidence level.
pub const CONFIDENCE_Z: f64 = 1.96;

/// Verified reviews earn a flat multiplier on top of the Wilson bound.
const VERIFIED_MULTIPLIER: f64 = 1.2;

/// Below this many votes the score is scaled down linearly, so a single
/// upvote never outranks a review with many consistent votes.
const LOW_VOTE_THRESHOLD: u32 = 10;

/// Lower bound of the Wilson score interval for a Bernoulli proportion:
/// `positive` successes out of `total` trials at confidence `z`.
pub fn wilson_lower_bound<V>(positive: V, total: V, z: V) -> Result<V, ErrorKind>
where
    V: Float,
{
    if total <= V::zero() {
        return Err(ErrorKind::EmptySample);
    }

    let two = V::from(2.0).ok_or(ErrorKind::ConvertType)?;
    let four = V::from(4.0).ok_or(ErrorKind::ConvertType)?;

    let p_hat = positive / total;
    let z_sq = z * z;

    let spread = (p_hat * (V::one() - p_hat) / total + z_sq / (four * total * total)).sqrt();
    let num = p_hat + z_sq / (two * total) - z * spread;
    let dem = V::one() + z_sq / total;

    Ok(num / dem)
}

/// Helpfulness of a review given its current vote counts, in [0, 100].
///
/// Zero votes score zero regardless of verification; the verified
/// multiplier and the low-vote penalty apply before the final clamp.
pub fn score(upvotes: u32, downvotes: u32, verified: bool) -> f64 {
    let total = upvotes + downvotes;
    if total == 0 {
        return 0.0;
    }

    // The kernel only fails on an empty sample, ruled out above
    let mut score =
        match wilson_lower_bound(f64::from(upvotes), f64::from(total), CONFIDENCE_Z) {
            Ok(lower_bound) => lower_bound,
            Err(_) => return 0.0,
        };

    if verified {
        score *= VERIFIED_MULTIPLIER;
    }

    if total < LOW_VOTE_THRESHOLD {
        score *= f64::from(total) / f64::from(LOW_VOTE_THRESHOLD);
    }

    clamp(round2(score * 100.0), 0.0, 100.0)
}
