use thiserror::Error;

/// Rejected analysis or synthesis settings. Raised before any frame is
/// processed, so a caller never sees partially filled track matrices.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("band list is empty")]
    NoBands,

    #[error("band {index}: upper edge must be positive, got {edge} Hz")]
    NonPositiveEdge { index: usize, edge: f64 },

    #[error("band {index}: edge {edge} Hz must exceed the previous band edge {previous} Hz")]
    NonIncreasingEdges { index: usize, edge: f64, previous: f64 },

    #[error("hop size must be positive")]
    InvalidHop,

    #[error("band {index}: window is empty")]
    EmptyWindow { index: usize },

    #[error("band {index}: window weight {weight} at position {position} is negative")]
    NegativeWindowWeight { index: usize, position: usize, weight: f64 },

    #[error("band {index}: window weights sum to zero")]
    ZeroWindowSum { index: usize },

    #[error("band {index}: window length {window} exceeds transform size {fft_size}")]
    WindowTooLong { index: usize, window: usize, fft_size: usize },

    #[error("band {index}: transform size {fft_size} is not a power of two")]
    NotPowerOfTwo { index: usize, fft_size: usize },

    #[error("sample rate must be positive")]
    InvalidSampleRate,

    #[error("maximum number of sines must be positive")]
    NoSines,

    #[error("minimum sine duration must be finite and non-negative, got {0} s")]
    InvalidDuration(f64),

    #[error("synthesis size {size} must be even and at least twice the hop size {hop}")]
    InvalidSynthesisSize { size: usize, hop: usize },

    #[error("unknown window '{0}' (expected rectangular, hann, hamming, blackman or blackmanharris)")]
    UnknownWindow(String),

    #[error("invalid band '{spec}': {reason}")]
    InvalidBandSpec { spec: String, reason: String },
}
