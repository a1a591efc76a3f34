//! Mochi Editor Model
//!
//! Client-side state for the voiceover / text overlay editor:
//! - **Media:** In-memory files picked by the user
//! - **Handles:** Revocable preview handles, one per referenced file
//! - **Lists:** Copy-on-write ordered collections of segments and overlays
//! - **Session:** The observable store tying video, lists, error slot and
//!   busy flag together
//!
//! Nothing here touches the network; submission lives in `mochi-submission`.

pub mod error;
pub mod fields;
pub mod handle;
pub mod list;
pub mod media;
pub mod overlay;
pub mod segment;
pub mod session;

pub use error::*;
pub use handle::*;
pub use list::*;
pub use media::*;
pub use overlay::*;
pub use segment::*;
pub use session::*;
