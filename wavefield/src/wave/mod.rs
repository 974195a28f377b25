//! Ripple wave events, emission, and surface height sampling.
//!
//! A wave is an outward-expanding front, not a standing field: it only
//! influences a point once the front has reached it. Overlapping waves are
//! never merged structurally; they interfere at sample time per their
//! [`WaveGroup`].

pub mod emitter;
pub mod event;
pub mod sampler;

pub use emitter::WaveEmitter;
pub use event::{WaveEvent, WaveGroup};
pub use sampler::{sample_height, wave_offset};
