// ABOUTME: Registry capability consumed by the tag rotator.
// ABOUTME: Docker CLI, Docker Engine API, and in-memory implementations.

mod bollard;
mod cli;
mod error;
mod memory;
mod ops;
pub(crate) mod sealed;

pub use self::bollard::{BollardRegistry, connect_engine};
pub use cli::DockerCli;
pub use error::RegistryError;
pub use memory::MemoryRegistry;
pub use ops::{RegistryCall, RegistryCredentials, RegistryOps};
