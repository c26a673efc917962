//! helm: orchestration over the polyfs routing layer.
//!
//! One [`Helm`] owns the mount table, the id-router, the lazy tree cache,
//! the side stores and the [`AvailabilityGate`], and sequences the mutation
//! fan-out: backend change first, then cache invalidation and the
//! side-store cascade.

mod error;
mod gate;
#[allow(clippy::module_inception)]
mod helm;

pub use error::{Error, Result};
pub use gate::{AvailabilityGate, HealthProbe, HttpProbe, ProviderStatus};
pub use helm::Helm;

#[cfg(test)]
mod tests;
