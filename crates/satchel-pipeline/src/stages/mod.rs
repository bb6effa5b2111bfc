//! Concrete stage plugins.
//!
//! Grouped the way the composer inserts them: shared stages for every mode,
//! PWA stages behind `is_pwa`, production-only stages last.

pub mod production;
pub mod pwa;
pub mod shared;

pub use production::{CompressionPlugin, DefineEnvPlugin, HashedModuleIdsPlugin, MinifyPlugin};
pub use pwa::{PwaManifestPlugin, ServiceWorkerPlugin};
pub use shared::{
    ChunkMergePlugin, CriticalCssPlugin, ManifestPlugin, ModuleConcatenationPlugin, ProgressPlugin,
};
