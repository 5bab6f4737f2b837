//! `haulplan-media`
//!
//! **Responsibility:** boundary to the platform media subsystem.
//!
//! Capture acquisition is scoped: a [`CaptureSession`] stops all tracks
//! exactly once, whether it ends by completion, cancellation, error, or
//! drop. Video-to-description is an opaque async collaborator behind
//! [`VideoDescriber`]; the shipped implementation is simulated.

pub mod capture;
pub mod describe;

pub use capture::{
    CaptureError, CaptureSession, MediaGateway, MediaStream, SimulatedMediaGateway, VideoBlob,
};
pub use describe::{DescribeError, SimulatedVideoDescriber, VideoDescriber};
