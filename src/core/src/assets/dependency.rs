use log::debug;

use crate::assets::bundle::{ClientAssets, SHIM_SCRIPT, STORAGE_LIBRARY};
use crate::error_handling::types::AssetError;

pub const DEPENDENCY_NAME: &str = "xLocalStorage";

/// A named set of scripts to load in the page head.
#[derive(Debug, Clone, PartialEq)]
pub struct HtmlDependency {
    pub name: String,
    pub version: String,
    /// URL path segment the scripts are served under.
    pub mount: String,
    pub scripts: Vec<String>,
}

/// The dependency loading the storage library and the shim, in that order.
pub fn use_x_storage(mount: &str) -> HtmlDependency {
    HtmlDependency {
        name: DEPENDENCY_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        mount: mount.trim_matches('/').to_string(),
        scripts: vec![STORAGE_LIBRARY.to_string(), SHIM_SCRIPT.to_string()],
    }
}

impl HtmlDependency {
    pub fn script_urls(&self) -> Vec<String> {
        self.scripts
            .iter()
            .map(|s| format!("/{}/{}", self.mount, s))
            .collect()
    }

    pub fn render(&self) -> String {
        self.script_urls()
            .iter()
            .map(|url| format!("<script src=\"{}\"></script>", url))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Fails if a referenced script is not part of the embedded bundle.
    pub fn verify(&self) -> Result<(), AssetError> {
        for script in &self.scripts {
            if ClientAssets::get(script).is_none() {
                return Err(AssetError::Missing(script.clone()));
            }
        }
        debug!("{} {}: {} script(s) bundled", self.name, self.version, self.scripts.len());
        Ok(())
    }
}

/// Page head contents; each dependency is included once, by name.
#[derive(Debug, Default)]
pub struct HeadTags {
    dependencies: Vec<HtmlDependency>,
}

impl HeadTags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, dependency: HtmlDependency) -> Self {
        self.push(dependency);
        self
    }

    /// Adds `dependency` unless one with the same name is already present.
    pub fn push(&mut self, dependency: HtmlDependency) -> bool {
        if self.dependencies.iter().any(|d| d.name == dependency.name) {
            return false;
        }
        self.dependencies.push(dependency);
        true
    }

    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }

    pub fn render(&self) -> String {
        self.dependencies
            .iter()
            .map(HtmlDependency::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_library_before_shim() {
        let html = use_x_storage("xstorage").render();
        assert_eq!(
            html,
            "<script src=\"/xstorage/xstorage-lib.js\"></script>\n\
             <script src=\"/xstorage/xlocalstorage.js\"></script>"
        );
    }

    #[test]
    fn mount_slashes_are_trimmed() {
        let dep = use_x_storage("/static/");
        assert_eq!(dep.script_urls()[0], "/static/xstorage-lib.js");
    }

    #[test]
    fn repeated_injection_loads_once() {
        let mut head = HeadTags::new().with(use_x_storage("xstorage"));
        assert!(!head.push(use_x_storage("xstorage")));
        assert_eq!(head.len(), 1);
        assert_eq!(head.render().matches("xlocalstorage.js").count(), 1);
    }

    #[test]
    fn verify_accepts_bundle_and_rejects_missing_file() {
        assert!(use_x_storage("xstorage").verify().is_ok());

        let mut broken = use_x_storage("xstorage");
        broken.scripts.push("missing.js".into());
        assert_eq!(
            broken.verify(),
            Err(AssetError::Missing("missing.js".into()))
        );
    }
}
