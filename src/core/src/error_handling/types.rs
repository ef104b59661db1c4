use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    ArgsError(String),
    TomlError(String),
    BadIPFormatting(String),
    NotInRange(String),
    InvalidNamespaceTag(String),
    InvalidMount(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ArgsError(e) => write!(f, "Command-line error: {}", e),
            ConfigError::TomlError(e) => write!(f, "TOML parsing error: {}", e),
            ConfigError::BadIPFormatting(e) => write!(f, "IP formatting error: {}", e),
            ConfigError::NotInRange(e) => write!(f, "Value out of range: {}", e),
            ConfigError::InvalidNamespaceTag(e) => write!(f, "Invalid namespace tag: {}", e),
            ConfigError::InvalidMount(e) => write!(f, "Invalid asset mount: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError(err)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssetError {
    Missing(String),
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Missing(name) => write!(f, "Bundled asset missing: {}", name),
        }
    }
}

impl std::error::Error for AssetError {}

#[derive(Debug)]
pub enum TransportError {
    Closed,
    Encode(serde_json::Error),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Closed => write!(f, "Session channel closed"),
            TransportError::Encode(e) => write!(f, "Command encoding failed: {}", e),
        }
    }
}

impl std::error::Error for TransportError {}

#[derive(Debug, Clone, PartialEq)]
pub enum StorageError {
    QuotaExceeded(usize),
    WriteFailed,
    ReadFailed,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::QuotaExceeded(n) => write!(f, "Storage quota of {} entries exceeded", n),
            StorageError::WriteFailed => write!(f, "Storage write failed"),
            StorageError::ReadFailed => write!(f, "Storage read failed"),
        }
    }
}

impl std::error::Error for StorageError {}

#[derive(Debug)]
pub enum ProtocolError {
    Decode(serde_json::Error),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::Decode(e) => write!(f, "Malformed client message: {}", e),
        }
    }
}

impl std::error::Error for ProtocolError {}

/// Why a pending retrieve did not resolve to a value.
#[derive(Debug, Clone, PartialEq)]
pub enum RetrieveError {
    /// No reply arrived within the allotted time.
    TimedOut,
    /// The session was reconfigured while the request was in flight.
    Superseded,
    /// The session closed, or the request could not be sent.
    Disconnected,
    /// The client reported a storage failure.
    ClientFailure(String),
}

impl fmt::Display for RetrieveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetrieveError::TimedOut => write!(f, "Retrieve timed out"),
            RetrieveError::Superseded => write!(f, "Retrieve superseded by reconfiguration"),
            RetrieveError::Disconnected => write!(f, "Session disconnected"),
            RetrieveError::ClientFailure(e) => write!(f, "Client storage failure: {}", e),
        }
    }
}

impl std::error::Error for RetrieveError {}

#[derive(Debug)]
pub enum SessionError {
    NotFound,
    SessionLimitReached,
    Protocol(ProtocolError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::NotFound => write!(f, "Session not found"),
            SessionError::SessionLimitReached => write!(f, "Session limit reached"),
            SessionError::Protocol(e) => write!(f, "Protocol error: {}", e),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<ProtocolError> for SessionError {
    fn from(err: ProtocolError) -> Self {
        SessionError::Protocol(err)
    }
}

#[derive(Debug)]
pub enum WebError {
    BindFailed(String),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebError::BindFailed(e) => write!(f, "Web server bind failed: {}", e),
        }
    }
}

impl std::error::Error for WebError {}

#[derive(Debug)]
pub enum ControllerError {
    ConfigurationError(ConfigError),
    AssetError(AssetError),
    WebError(WebError),
}

impl fmt::Display for ControllerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerError::ConfigurationError(e) => write!(f, "Configuration error: {}", e),
            ControllerError::AssetError(e) => write!(f, "Asset error: {}", e),
            ControllerError::WebError(e) => write!(f, "Web error: {}", e),
        }
    }
}

impl std::error::Error for ControllerError {}

impl From<ConfigError> for ControllerError {
    fn from(err: ConfigError) -> Self {
        ControllerError::ConfigurationError(err)
    }
}

impl From<AssetError> for ControllerError {
    fn from(err: AssetError) -> Self {
        ControllerError::AssetError(err)
    }
}

impl From<WebError> for ControllerError {
    fn from(err: WebError) -> Self {
        ControllerError::WebError(err)
    }
}
