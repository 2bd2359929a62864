// Copyright (C) 2020 Kevin Del Castillo Ramírez
//
// This file is part of review-system.
//
// review-system is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// review-system is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with review-system.  If not, see <http://www.gnu.org/licenses/>.

/// Round to two decimals, the rule every emitted score shares so that
/// recomputation over the same inputs is bit-for-bit identical.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn round2_to_nearest() {
        assert_approx_eq!(0.35, round2(0.347));
        assert_approx_eq!(3.95, round2(3.947_368));
        assert_approx_eq!(100.0, round2(99.999));
    }

    #[test]
    fn clamp_bounds() {
        assert_approx_eq!(0.0, clamp(-3.0, 0.0, 100.0));
        assert_approx_eq!(100.0, clamp(140.3, 0.0, 100.0));
        assert_approx_eq!(55.5, clamp(55.5, 0.0, 100.0));
    }
}
