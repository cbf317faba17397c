//! Winner-take-all speaker attribution with a dominance margin.

/// Which channel buffer(s) receive the current audio block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribution {
	/// Both channels below the noise floor — block discarded.
	Neither,
	/// Channel A is dominant.
	A,
	/// Channel B is dominant.
	B,
	/// Levels within the dominance margin — both buffers receive the block.
	/// Trades duplicate submissions for not losing audio on crosstalk.
	Both,
}

/// Thresholds for the per-block attribution decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttributionPolicy {
	/// Noise floor below which a channel is treated as silent.
	pub vad_threshold: f32,
	/// Loudness multiple one channel must exceed the other by to win outright.
	/// Close to 1.0: decisive attribution, falling back to `Both` only when
	/// levels are nearly identical.
	pub dominance_ratio: f32,
}

impl Default for AttributionPolicy {
	fn default() -> Self {
		Self {
			vad_threshold: 500.0,
			dominance_ratio: 1.05,
		}
	}
}

impl AttributionPolicy {
	/// Decide attribution for one block from the two post-gain RMS levels.
	/// Rules are evaluated in order; first match wins.
	pub fn attribute(&self, rms_a: f32, rms_b: f32) -> Attribution {
		if rms_a < self.vad_threshold && rms_b < self.vad_threshold {
			return Attribution::Neither;
		}
		if rms_a > rms_b * self.dominance_ratio {
			return Attribution::A;
		}
		if rms_b > rms_a * self.dominance_ratio {
			return Attribution::B;
		}
		Attribution::Both
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_both_below_floor_is_neither() {
		let policy = AttributionPolicy::default();
		assert_eq!(policy.attribute(0.0, 0.0), Attribution::Neither);
		assert_eq!(policy.attribute(499.9, 499.9), Attribution::Neither);
	}

	#[test]
	fn test_dominant_a_wins_alone() {
		let policy = AttributionPolicy::default();
		assert_eq!(policy.attribute(2000.0, 100.0), Attribution::A);
	}

	#[test]
	fn test_dominant_b_wins_alone() {
		let policy = AttributionPolicy::default();
		assert_eq!(policy.attribute(100.0, 2000.0), Attribution::B);
	}

	#[test]
	fn test_equal_levels_go_to_both() {
		let policy = AttributionPolicy::default();
		assert_eq!(policy.attribute(1000.0, 1000.0), Attribution::Both);
	}

	#[test]
	fn test_within_margin_goes_to_both() {
		let policy = AttributionPolicy::default();
		// 1040 < 1000 * 1.05, so neither side dominates
		assert_eq!(policy.attribute(1040.0, 1000.0), Attribution::Both);
		assert_eq!(policy.attribute(1000.0, 1040.0), Attribution::Both);
	}

	#[test]
	fn test_just_past_margin_is_decisive() {
		let policy = AttributionPolicy::default();
		assert_eq!(policy.attribute(1051.0, 1000.0), Attribution::A);
		assert_eq!(policy.attribute(1000.0, 1051.0), Attribution::B);
	}

	#[test]
	fn test_one_loud_one_silent() {
		// A silent channel must never drag a loud one below the floor check
		let policy = AttributionPolicy::default();
		assert_eq!(policy.attribute(600.0, 0.0), Attribution::A);
		assert_eq!(policy.attribute(0.0, 600.0), Attribution::B);
	}
}
