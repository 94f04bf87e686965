// ── Runtime portal configuration ──
//
// Describes *how* to reach the rental portal and how to keep a session
// alive. The CLI builds a `PortalConfig` from its profile and hands it in;
// core never reads config files.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

pub use klrent_api::DEFAULT_TIMEOUT;

/// Backend URL used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Delay before the first background session check.
pub const DEFAULT_REFRESH_DELAY: Duration = Duration::from_secs(5);

/// Interval between background session checks.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(3 * 60);

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (local development backends).
    DangerAcceptInvalid,
}

/// Configuration for talking to one portal backend.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// API root (e.g., `http://localhost:3000`).
    pub url: Url,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// Where the session token is persisted. `None` keeps it in memory.
    pub session_path: Option<PathBuf>,
    /// Delay before the first background session check.
    pub refresh_delay: Duration,
    /// Interval between background session checks.
    pub refresh_interval: Duration,
    /// `origem_agen` tag sent with reservations.
    pub origin: String,
    /// CEP lookup service root. `None` uses ViaCEP.
    pub cep_url: Option<Url>,
}

impl PortalConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            tls: TlsVerification::default(),
            timeout: DEFAULT_TIMEOUT,
            session_path: None,
            refresh_delay: DEFAULT_REFRESH_DELAY,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            origin: crate::draft::DEFAULT_ORIGIN.to_owned(),
            cep_url: None,
        }
    }

    pub(crate) fn transport(&self) -> klrent_api::TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => klrent_api::TlsMode::System,
            TlsVerification::CustomCa(path) => klrent_api::TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => klrent_api::TlsMode::DangerAcceptInvalid,
        };
        klrent_api::TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}
