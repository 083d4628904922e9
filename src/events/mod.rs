//! Event types and observers used by the session.
//!
//! Submodules:
//! - [`audio`] – commands for and replies from the audio device
//! - [`environment`] – scene reload/load requests serviced by the host
//! - [`session`] – external session requests and phase change notifications
pub mod audio;
pub mod environment;
pub mod session;
