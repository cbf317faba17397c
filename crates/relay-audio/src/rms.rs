/// Root-mean-square amplitude of a block of signed 16-bit little-endian samples.
///
/// Returns 0.0 for empty input. An odd trailing byte is truncated rather than
/// treated as an error, since device drivers occasionally deliver ragged reads.
pub fn rms(bytes: &[u8]) -> f32 {
	let mut sum_of_squares = 0.0_f64;
	let mut count = 0_usize;

	for pair in bytes.chunks_exact(2) {
		let sample = f64::from(i16::from_le_bytes([pair[0], pair[1]]));
		sum_of_squares += sample * sample;
		count += 1;
	}

	if count == 0 {
		return 0.0;
	}

	(sum_of_squares / count as f64).sqrt() as f32
}
