use facet::Facet;

/// Errors that can occur while sanitizing or loading a policy.
///
/// [`crate::Sanitizer::sanitize`] never returns these; it degrades to a
/// text-only rendering instead. They surface through the `try_*` variants.
#[derive(Facet, Debug, Clone, PartialEq, Eq)]
#[facet(derive(Error))]
#[repr(u8)]
pub enum SanitizeError {
    /// element nesting exceeds the depth limit of {limit}
    DepthExceeded { limit: usize },

    /// output did not settle after {passes} reparse passes
    Unstable { passes: usize },

    /// invalid policy configuration: {message}
    InvalidPolicy { message: String },
}
