// ABOUTME: Validated domain types for image references and their tag slots.
// ABOUTME: Names are checked once at construction and rendered bit-exactly.

mod environment;
mod image_id;
mod image_ref;
mod registry_address;
mod service_name;
mod tag;

pub use environment::Environment;
pub use image_id::ImageId;
pub use image_ref::ImageReference;
pub use registry_address::{RegistryAddress, RegistryAddressError};
pub use service_name::{NameError, ServiceName};
pub use tag::{BACKUP_ID_LEN, BackupId, BackupIdError, Tag};
