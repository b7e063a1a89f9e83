//! Shelf application library
//!
//! Project modules plus the glue that turns settings into a ready router.

pub mod modules;

use anyhow::Context;
use axum::Router;
use shelf_kernel::{settings::Settings, ModuleRegistry};

pub use modules::register_all;

/// Build a registry holding every project module
pub fn build_registry() -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    register_all(&mut registry).context("failed to register modules")?;
    Ok(registry)
}

/// Build the complete HTTP application for `settings`
pub fn build_app(settings: &Settings) -> anyhow::Result<Router> {
    let registry = build_registry()?;
    shelf_http::build_router(&registry, settings)
}
