/// What to do with payload keys an entity does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownFieldPolicy {
    /// Drop them silently (logged at debug level).
    #[default]
    Drop,
    /// Keep them aside in the decoded overflow map. Outbound bodies only
    /// carry declared fields, so writes drop them as `Drop` does.
    Retain,
    /// Fail with `SchemaError::UnknownField`.
    Reject,
}

/// Controls validation and encoding behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Handling of undeclared payload keys.
    pub unknown_fields: UnknownFieldPolicy,
    /// When true, encoding a record for create silently omits audit fields and
    /// server-assigned ids. When false, a record carrying them fails with
    /// `SchemaError::ForbiddenFieldOnCreate`.
    pub strip_forbidden_on_create: bool,
    /// When true, whole-valued floats (`1024.0`) are accepted for integer
    /// fields and normalized to integers.
    pub coerce_integral_floats: bool,
}

impl RegistryConfig {
    /// Reject unknown fields and refuse to strip forbidden create fields.
    pub fn strict() -> Self {
        Self {
            unknown_fields: UnknownFieldPolicy::Reject,
            strip_forbidden_on_create: false,
            coerce_integral_floats: false,
        }
    }

    /// Keep unknown fields in the overflow map.
    pub fn permissive() -> Self {
        Self {
            unknown_fields: UnknownFieldPolicy::Retain,
            ..Self::default()
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            unknown_fields: UnknownFieldPolicy::Drop,
            strip_forbidden_on_create: true,
            coerce_integral_floats: true,
        }
    }
}
