//! Client-side script bundle and its injection into pages.
//!
//! The scripts under `assets/` are embedded in the binary at build time. Pages reference them
//! through an [`HtmlDependency`] produced by [`use_x_storage`].

pub mod bundle;
pub mod dependency;

pub use bundle::{asset_response, ClientAssets, SHIM_SCRIPT, STORAGE_LIBRARY};
pub use dependency::{use_x_storage, HeadTags, HtmlDependency};
