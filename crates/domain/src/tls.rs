//! TLS settings for the key-value store connection.

use serde::{Deserialize, Serialize};

/// How the store connection is secured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreTls {
    /// Plain TCP.
    Disabled,
    /// TLS with full certificate verification.
    #[default]
    Verified,
    /// TLS that accepts any certificate.
    /// WARNING: test environments only!
    #[serde(alias = "insecure")]
    InsecureSkipVerify,
}

/// Security warnings for a TLS mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsSecurityWarning {
    /// Traffic, including the store password, is sent in clear text.
    PlaintextConnection,
    /// The server certificate is not verified.
    CertificateVerificationDisabled,
}

impl TlsSecurityWarning {
    /// Human-readable warning.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::PlaintextConnection => "store connection is not encrypted",
            Self::CertificateVerificationDisabled => {
                "store certificate verification is disabled; use only against test environments"
            }
        }
    }
}

impl StoreTls {
    /// Returns true if the connection uses TLS.
    #[must_use]
    pub const fn uses_tls(self) -> bool {
        !matches!(self, Self::Disabled)
    }

    /// Check if this mode uses any dangerous/insecure options.
    #[must_use]
    pub fn security_warnings(self) -> Vec<TlsSecurityWarning> {
        match self {
            Self::Disabled => vec![TlsSecurityWarning::PlaintextConnection],
            Self::Verified => Vec::new(),
            Self::InsecureSkipVerify => vec![TlsSecurityWarning::CertificateVerificationDisabled],
        }
    }

    /// Check if this is a secure configuration.
    #[must_use]
    pub fn is_secure(self) -> bool {
        self.security_warnings().is_empty()
    }
}
