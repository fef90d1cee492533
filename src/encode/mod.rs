pub mod tracks;
pub mod wav;
