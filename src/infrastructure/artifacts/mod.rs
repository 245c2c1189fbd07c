//! Side-artifact storage and rendering.
//!
//! A side-artifact is a derived, non-authoritative rendering associated
//! with a record (here, a scannable QR image). It is best-effort in both
//! directions: creation succeeds without it and the sweeper tolerates
//! failed cleanup.

mod fs_store;
mod null_store;
mod qr;
mod service;

pub use fs_store::FsArtifactStore;
pub use null_store::NullArtifactStore;
pub use qr::{QrRenderer, SvgQrRenderer};
pub use service::{ArtifactError, ArtifactResult, ArtifactStore};

#[cfg(test)]
pub use qr::MockQrRenderer;
#[cfg(test)]
pub use service::MockArtifactStore;
