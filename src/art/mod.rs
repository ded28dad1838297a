//! # Decorative Patterns
//!
//! Procedural generators that scatter decorative marks over a region of a
//! [`Surface`]. Each generator lives in its own module and only draws; none
//! of them return anything.
//!
//! Randomized generators take the random source as an argument. Pass a
//! seeded `StdRng` for reproducible output, or an OS-seeded one for the
//! usual "every render looks a little different" behavior.
//!
//! | Generator | Mark | Random |
//! |-----------|------|--------|
//! | [`wave`] | 5 sinusoidal strokes | no |
//! | [`star_burst`] | gold 5-vertex stars | yes |
//! | [`heart`] | pink hearts | yes |
//! | [`confetti`] | squares from a 6-color palette | yes |
//! | [`rainbow_band`] | 7-stop horizontal gradient bar | no |
//!
//! A `count` of zero draws nothing.

pub mod confetti;
pub mod hearts;
pub mod rainbow;
pub mod stars;
pub mod waves;

pub use confetti::{confetti, CONFETTI_PALETTE};
pub use hearts::{heart, heart_path, HEART_PINK};
pub use rainbow::{rainbow_band, RAINBOW_STOPS};
pub use stars::{star_burst, star_path, STAR_GOLD};
pub use waves::wave;
