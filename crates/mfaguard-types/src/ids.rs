//! Stable identifiers for checks, finding codes, and account attributes.
//!
//! `check_id` is a dotted namespace. `code` is a short snake_case discriminator.

// Checks
pub const CHECK_IDENTITY_MFA_REQUIRED: &str = "identity.mfa_required";
pub const CHECK_IDENTITY_PASSWORD_ROTATION: &str = "identity.password_rotation";
pub const CHECK_IDENTITY_NO_STALE_ADMIN: &str = "identity.no_stale_admin";

// Codes: identity.mfa_required
pub const CODE_MFA_DISABLED: &str = "mfa_disabled";

// Codes: identity.password_rotation
pub const CODE_PASSWORD_STALE: &str = "password_stale";

// Codes: identity.no_stale_admin
pub const CODE_STALE_ADMIN: &str = "stale_admin";

// Codes: custom rules declared only in config
pub const CODE_POLICY_VIOLATION: &str = "policy_violation";

// Observed account attributes
pub const ATTR_MFA_ENABLED: &str = "mfa_enabled";
pub const ATTR_PASSWORD_ROTATED: &str = "password_rotated";
pub const ATTR_ACTIVE: &str = "active";

// Tool-level
pub const CHECK_TOOL_RUNTIME: &str = "tool.runtime";
pub const CODE_RUNTIME_ERROR: &str = "runtime_error";
pub const CODE_CHECK_UNAVAILABLE: &str = "check_unavailable";
