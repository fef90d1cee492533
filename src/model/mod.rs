pub mod analysis;
pub mod band;
pub mod cleaner;
pub mod matrix;
pub mod merge;
pub mod peaks;
pub mod spectrum;
pub mod synth;
pub mod tracker;
pub mod window;
