pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_ASSET_MOUNT: &str = "xstorage";
pub const DEFAULT_NAMESPACE_TAG: &str = "xLocalStorage";
pub const DEFAULT_PREFIX_LENGTH: usize = 8;
pub const DEFAULT_RETRIEVE_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_MAX_SESSIONS: usize = 64;
pub const DEFAULT_APP_NAME: &str = "xlocalstore-demo";

pub const MIN_PREFIX_LENGTH: usize = 4;
pub const MAX_PREFIX_LENGTH: usize = 64;
pub const NAMESPACE_TAG_PATTERN: &str = r"^[A-Za-z][A-Za-z0-9]*$";

/// How session prefixes are shaped: `<namespace_tag>_<length random alphanumerics>`.
#[derive(Debug, PartialEq, Clone)]
pub struct PrefixPolicy {
    pub namespace_tag: String,
    pub length: usize,
}

impl Default for PrefixPolicy {
    fn default() -> Self {
        Self {
            namespace_tag: DEFAULT_NAMESPACE_TAG.to_string(),
            length: DEFAULT_PREFIX_LENGTH,
        }
    }
}
