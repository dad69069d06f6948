//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validate config → Spawn thread → Bind listener → Signal ready → Run loop
//!
//! Shutdown (shutdown.rs):
//!     GET …/terminateThread → Loop exits cleanly → Thread joined
//! ```
//!
//! # Design Decisions
//! - Callers block until the port is bound, never longer
//! - Shutdown is a request, so it works identically over TLS

pub mod shutdown;
pub mod startup;

pub use shutdown::{is_terminate_path, request_termination, terminate_url, TERMINATE_PATH};
pub use startup::ServerThread;
