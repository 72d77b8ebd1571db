//! Tool suites.
//!
//! Each suite lives in its own module and exposes a `register` function
//! that adds its tools to a [`ToolRegistry`]. [`register_suite`] is the
//! single place mapping a configured [`Suite`] to that function.

pub mod common;

pub mod anymile;
pub mod arxiv;
pub mod geo;
pub mod hyperskill;
pub mod inventory;
pub mod latex;
pub mod memory;
pub mod mylife;
pub mod news;
pub mod nutrition;
pub mod ufmr;
pub mod wallet;

use crate::core::config::{Config, Suite};

use super::ToolRegistry;

/// Register every tool of `suite`.
pub fn register_suite(suite: Suite, registry: &mut ToolRegistry, config: &Config) {
    match suite {
        Suite::News => news::register(registry, config),
        Suite::Geo => geo::register(registry, config),
        Suite::Nutrition => nutrition::register(registry, config),
        Suite::Anymile => anymile::register(registry, config),
        Suite::Mylife => mylife::register(registry, config),
        Suite::Hyperskill => hyperskill::register(registry, config),
        Suite::Arxiv => arxiv::register(registry, config),
        Suite::Wallet => wallet::register(registry, config),
        Suite::Inventory => inventory::register(registry, config),
        Suite::Memory => memory::register(registry, config),
        Suite::Latex => latex::register(registry, config),
        Suite::Ufmr => ufmr::register(registry),
    }
}
