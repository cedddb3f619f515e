//! omnicloud resource model
//!
//! This crate provides the pieces every cloud builder shares: deferred
//! outputs, resource declarations, and the seam to the provisioning engine
//! that actually creates things.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                 omnicloud CLI                    │
//! │          (omnicloud validate/preview)            │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │               omnicloud-cloud                    │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │    Stack { declare, export, finish }      │   │
//! │  │    Output<T> (deferred, shared)           │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │    trait ProvisioningEngine { ... }       │   │
//! │  └──────────────────────────────────────────┘   │
//! └───────┬─────────────────┬───────────────┬───────┘
//!         │                 │               │
//! ┌───────▼───────┐ ┌───────▼───────┐ ┌─────▼─────────┐
//! │  aws builder  │ │ azure builder │ │  gcp builder  │
//! └───────────────┘ └───────────────┘ └───────────────┘
//! ```

pub mod action;
pub mod engine;
pub mod error;
pub mod output;
pub mod resource;
pub mod stack;

// Re-exports
pub use action::{Action, ActionType, Plan, PlanSummary};
pub use engine::{OutputResolver, PreviewEngine, ProvisioningEngine};
pub use error::{CloudError, Result};
pub use output::Output;
pub use resource::{
    ComponentResource, Resource, ResourceConfig, ResourceOptions, ResourceOutputs, ResourceSet,
    provider_of,
};
pub use stack::{Stack, StackOutputs};
