//! Validation diagnostics.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Diagnostic severity. Ordered most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }

    /// Errors gate export; warnings and notices never do.
    pub fn blocks(&self) -> bool {
        matches!(self, Severity::Error)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stable machine-readable diagnostic codes.
pub mod codes {
    // Structural
    pub const UNKNOWN_RESOURCE: &str = "UNKNOWN_RESOURCE";
    pub const DEPENDENCY_CYCLE: &str = "DEPENDENCY_CYCLE";
    pub const DANGLING_EDGE: &str = "DANGLING_EDGE";
    pub const DUPLICATE_NAME: &str = "DUPLICATE_NAME";
    pub const DUPLICATE_NAME_CROSS_TYPE: &str = "DUPLICATE_NAME_CROSS_TYPE";
    pub const INVALID_IDENTIFIER: &str = "INVALID_IDENTIFIER";

    // Policy
    pub const EMPTY_GRAPH: &str = "EMPTY_GRAPH";
    pub const SUBNET_WITHOUT_VPC: &str = "SUBNET_WITHOUT_VPC";

    // Field level
    pub const REQUIRED_FIELD: &str = "REQUIRED_FIELD";
    pub const INVALID_PROPERTY: &str = "INVALID_PROPERTY";
    pub const INVALID_MTU: &str = "INVALID_MTU";
    pub const INVALID_CIDR: &str = "INVALID_CIDR";
    pub const INVALID_ZONE: &str = "INVALID_ZONE";
    pub const INVALID_DISK_SIZE: &str = "INVALID_DISK_SIZE";
    pub const INVALID_PRIORITY: &str = "INVALID_PRIORITY";
    pub const INVALID_DNS_NAME: &str = "INVALID_DNS_NAME";
    pub const INVALID_ACCOUNT_ID: &str = "INVALID_ACCOUNT_ID";

    // Best practice
    pub const MISSING_VPC: &str = "MISSING_VPC";
    pub const NO_SUBNET: &str = "NO_SUBNET";
    pub const OPEN_FIREWALL: &str = "OPEN_FIREWALL";
    pub const PUBLIC_BUCKET_RISK: &str = "PUBLIC_BUCKET_RISK";
    pub const ACL_MODE: &str = "ACL_MODE";
    pub const NO_DELETION_PROTECTION: &str = "NO_DELETION_PROTECTION";
    pub const HIGH_COST_CLUSTER: &str = "HIGH_COST_CLUSTER";

    // Notices
    pub const AUTO_SUBNET_MODE: &str = "AUTO_SUBNET_MODE";
    pub const NO_CUSTOM_NETWORK: &str = "NO_CUSTOM_NETWORK";
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl Diagnostic {
    pub fn new(severity: Severity, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: code.into(),
            node_id: None,
            field: None,
            message: message.into(),
            remediation: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    pub fn info(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, code, message)
    }

    /// Scope the diagnostic to a node.
    pub fn for_node(mut self, node_id: impl Into<String>) -> Self {
        self.node_id = Some(node_id.into());
        self
    }

    /// Scope the diagnostic to one property of its node.
    pub fn on_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_remediation(mut self, remediation: impl Into<String>) -> Self {
        self.remediation = Some(remediation.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.code, self.message)?;
        if let Some(field) = &self.field {
            write!(f, " (field: {})", field)?;
        }
        Ok(())
    }
}
