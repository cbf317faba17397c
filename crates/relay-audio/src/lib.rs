pub mod attribution;
pub mod buffer;
pub mod rms;
pub mod stereo;
pub mod wav;

pub use attribution::{Attribution, AttributionPolicy};
pub use buffer::{ChannelBuffer, FlushPolicy};
pub use rms::rms;
pub use stereo::{apply_gain, split_channels};
pub use wav::{wav_header, wrap_pcm, WavSpec};
