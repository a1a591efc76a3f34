//! Mochi Submission
//!
//! Turns an editor snapshot into backend requests:
//! - **Payload:** Multipart field layout for the voiceover and text overlay
//!   endpoints
//! - **Backend:** The HTTP seam (`reqwest` in production)
//! - **Download:** Where processed videos end up
//! - **Orchestrator:** Which steps run, in what order, and how failures
//!   surface to the session

pub mod backend;
pub mod download;
pub mod orchestrator;
pub mod payload;

pub use backend::*;
pub use download::*;
pub use orchestrator::*;
pub use payload::*;
