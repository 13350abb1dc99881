//! HTTP adapters - REST API implementations.
//!
//! Each domain module has its own HTTP adapter for endpoint exposure,
//! and all of them speak the shared envelope from [`response`].

pub mod machine;
pub mod parameter;
pub mod response;
pub mod router;
pub mod upload;
pub mod video;

// Re-export key types for convenience
pub use machine::{branch_machine_router, machine_router, MachineAppState};
pub use parameter::{parameter_router, ParameterAppState};
pub use router::{api_router, ApiContext};
pub use upload::{upload_router, UploadAppState};
pub use video::{coach_video_router, video_router, VideoAppState};
