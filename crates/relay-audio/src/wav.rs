//! Byte-exact WAV framing for the recognizer upload contract.
//!
//! The upstream API accepts a standard 44-byte RIFF/WAVE header with a PCM
//! `fmt ` chunk followed by a `data` chunk whose declared length matches the
//! payload exactly. Nothing more is supported or needed.

use thiserror::Error;

pub const HEADER_LEN: usize = 44;
pub const SAMPLE_RATE: u32 = 16_000;
pub const BITS_PER_SAMPLE: u16 = 16;

#[derive(Debug, Error)]
pub enum WavError {
	#[error("header truncated: {0} bytes")]
	Truncated(usize),
	#[error("bad chunk id at offset {offset}, expected {expected:?}")]
	BadChunk { offset: usize, expected: &'static str },
	#[error("unsupported audio format tag {0}, only PCM is handled")]
	UnsupportedFormat(u16),
}

/// Build the fixed 44-byte header for a PCM payload of `data_length` bytes.
pub fn wav_header(data_length: u32, sample_rate: u32, channels: u16, bits_per_sample: u16) -> [u8; HEADER_LEN] {
	let bytes_per_sample = bits_per_sample / 8;
	let byte_rate = sample_rate * u32::from(channels) * u32::from(bytes_per_sample);
	let block_align = channels * bytes_per_sample;

	let mut header = [0_u8; HEADER_LEN];
	header[0..4].copy_from_slice(b"RIFF");
	header[4..8].copy_from_slice(&(data_length + 36).to_le_bytes());
	header[8..12].copy_from_slice(b"WAVE");
	header[12..16].copy_from_slice(b"fmt ");
	header[16..20].copy_from_slice(&16_u32.to_le_bytes());
	header[20..22].copy_from_slice(&1_u16.to_le_bytes()); // PCM
	header[22..24].copy_from_slice(&channels.to_le_bytes());
	header[24..28].copy_from_slice(&sample_rate.to_le_bytes());
	header[28..32].copy_from_slice(&byte_rate.to_le_bytes());
	header[32..34].copy_from_slice(&block_align.to_le_bytes());
	header[34..36].copy_from_slice(&bits_per_sample.to_le_bytes());
	header[36..40].copy_from_slice(b"data");
	header[40..44].copy_from_slice(&data_length.to_le_bytes());
	header
}

/// Wrap raw mono 16kHz 16-bit PCM in a WAV container, ready for upload.
pub fn wrap_pcm(pcm: &[u8]) -> Vec<u8> {
	let mut wav = Vec::with_capacity(HEADER_LEN + pcm.len());
	wav.extend_from_slice(&wav_header(pcm.len() as u32, SAMPLE_RATE, 1, BITS_PER_SAMPLE));
	wav.extend_from_slice(pcm);
	wav
}

/// Parsed view of the fixed header. Used by tests and the batch pipeline to
/// sanity-check ffmpeg output before upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
	pub channels: u16,
	pub sample_rate: u32,
	pub bits_per_sample: u16,
	pub data_length: u32,
}

impl WavSpec {
	pub fn parse(bytes: &[u8]) -> Result<Self, WavError> {
		if bytes.len() < HEADER_LEN {
			return Err(WavError::Truncated(bytes.len()));
		}

		expect_chunk(bytes, 0, b"RIFF", "RIFF")?;
		expect_chunk(bytes, 8, b"WAVE", "WAVE")?;
		expect_chunk(bytes, 12, b"fmt ", "fmt ")?;
		expect_chunk(bytes, 36, b"data", "data")?;

		let format_tag = u16::from_le_bytes([bytes[20], bytes[21]]);
		if format_tag != 1 {
			return Err(WavError::UnsupportedFormat(format_tag));
		}

		Ok(Self {
			channels: u16::from_le_bytes([bytes[22], bytes[23]]),
			sample_rate: u32::from_le_bytes([bytes[24], bytes[25], bytes[26], bytes[27]]),
			bits_per_sample: u16::from_le_bytes([bytes[34], bytes[35]]),
			data_length: u32::from_le_bytes([bytes[40], bytes[41], bytes[42], bytes[43]]),
		})
	}
}

fn expect_chunk(bytes: &[u8], offset: usize, id: &[u8; 4], name: &'static str) -> Result<(), WavError> {
	if &bytes[offset..offset + 4] == id {
		Ok(())
	} else {
		Err(WavError::BadChunk { offset, expected: name })
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_header_round_trip() {
		let header = wav_header(12345, SAMPLE_RATE, 1, BITS_PER_SAMPLE);
		let spec = WavSpec::parse(&header).expect("valid header");

		assert_eq!(spec.data_length, 12345);
		assert_eq!(spec.sample_rate, 16000);
		assert_eq!(spec.channels, 1);
		assert_eq!(spec.bits_per_sample, 16);
	}

	#[test]
	fn test_header_is_exactly_44_bytes() {
		assert_eq!(wav_header(0, SAMPLE_RATE, 1, BITS_PER_SAMPLE).len(), 44);
	}

	#[test]
	fn test_riff_length_field() {
		let header = wav_header(1000, SAMPLE_RATE, 1, BITS_PER_SAMPLE);
		let riff_len = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
		assert_eq!(riff_len, 1036);
	}

	#[test]
	fn test_mono_16k_byte_rate_and_block_align() {
		let header = wav_header(0, SAMPLE_RATE, 1, BITS_PER_SAMPLE);
		let byte_rate = u32::from_le_bytes([header[28], header[29], header[30], header[31]]);
		let block_align = u16::from_le_bytes([header[32], header[33]]);
		assert_eq!(byte_rate, 32000);
		assert_eq!(block_align, 2);
	}

	#[test]
	fn test_wrap_pcm_declares_payload_length() {
		let pcm = vec![0_u8; 320];
		let wav = wrap_pcm(&pcm);

		assert_eq!(wav.len(), HEADER_LEN + 320);
		let spec = WavSpec::parse(&wav).expect("valid header");
		assert_eq!(spec.data_length, 320);
	}

	#[test]
	fn test_parse_rejects_truncated_input() {
		assert!(matches!(WavSpec::parse(&[0; 10]), Err(WavError::Truncated(10))));
	}

	#[test]
	fn test_parse_rejects_wrong_magic() {
		let mut header = wav_header(0, SAMPLE_RATE, 1, BITS_PER_SAMPLE);
		header[0] = b'X';
		assert!(matches!(WavSpec::parse(&header), Err(WavError::BadChunk { offset: 0, .. })));
	}

	#[test]
	fn test_parse_rejects_non_pcm() {
		let mut header = wav_header(0, SAMPLE_RATE, 1, BITS_PER_SAMPLE);
		header[20..22].copy_from_slice(&3_u16.to_le_bytes()); // IEEE float
		assert!(matches!(WavSpec::parse(&header), Err(WavError::UnsupportedFormat(3))));
	}
}
