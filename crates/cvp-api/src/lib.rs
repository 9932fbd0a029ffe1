// cvp-api: Async Rust client for the Arista CloudVision (CVP) REST API

pub mod client;
pub mod error;
pub mod ndjson;
pub mod tag;
pub mod transport;
pub mod workspace;

pub use client::CvpClient;
pub use error::Error;
pub use tag::{ElementType, TagMutation};
pub use transport::{AcceptPayload, TlsMode, TransportConfig};
pub use workspace::{BuildWait, WorkspaceState, WorkspaceTransaction};
