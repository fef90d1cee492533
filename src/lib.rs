//! Multi-resolution sinusoidal modeling.
//!
//! Each frequency band is analyzed with its own window and transform size,
//! the per-band spectral peaks are merged into one peak set per frame, and
//! the peaks are linked over time into partial tracks held in fixed-width
//! frame x slot matrices. Short tracks are removed afterwards, and the
//! result can be resynthesized by overlap-add.

pub mod audio;
pub mod config;
pub mod encode;
pub mod error;
pub mod model;
