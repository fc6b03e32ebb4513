//! Little characters that live on top of a web page: they fall onto the chat
//! box, wander along it, bump into its edges and react when picked up.

pub mod app;
pub mod config;
pub mod ecs;
pub mod error;
pub mod host;
pub mod logging;
pub mod page;
pub mod pet;
pub mod pool;

pub use app::{App, FrameOutcome, PetSnapshot};
pub use config::Config;
