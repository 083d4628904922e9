//! ECS resources made available to systems.
//!
//! Overview
//! - `audio` – the session's music channel and the bridge to the audio thread
//! - `clipstore` – audio clip catalogue keyed by clip id
//! - `collaborators` – the scoring and hazard trackers driven by the session
//! - `input` – per-frame pause key state
//! - `session` – phase, pause flag and result of the current session
//! - `sessionconfig` – scene names, result texts and clip references
//! - `ui` – desired panel visibility and label texts
//! - `worldtime` – scaled simulation time
pub mod audio;
pub mod clipstore;
pub mod collaborators;
pub mod input;
pub mod session;
pub mod sessionconfig;
pub mod ui;
pub mod worldtime;
