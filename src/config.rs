//! Output options for hover generation.

/// Controls what [`crate::analyze_with_config`] produces.
///
/// ## Examples
/// ```rust
/// use hovermark::HoverConfig;
///
/// let config = HoverConfig::default().with_code_fence("text").with_literals(false);
/// assert_eq!(config.code_fence, "text");
/// assert!(!config.include_literals);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverConfig {
    /// Language tag of the markdown code fence around signatures.
    pub code_fence: String,
    /// Produce hovers for number, string, boolean and `null` literals.
    pub include_literals: bool,
    /// Attach doc comments and library descriptions.
    pub include_documentation: bool,
    /// Seed the file scope with the core library before custom types.
    pub seed_core_library: bool,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            code_fence: "dart".to_string(),
            include_literals: true,
            include_documentation: true,
            seed_core_library: true,
        }
    }
}

impl HoverConfig {
    pub fn with_code_fence(mut self, language: impl Into<String>) -> Self {
        self.code_fence = language.into();
        self
    }

    pub fn with_literals(mut self, enabled: bool) -> Self {
        self.include_literals = enabled;
        self
    }

    pub fn with_documentation(mut self, enabled: bool) -> Self {
        self.include_documentation = enabled;
        self
    }

    pub fn with_core_library(mut self, enabled: bool) -> Self {
        self.seed_core_library = enabled;
        self
    }

    /// Wrap a signature in the configured code fence.
    pub fn fence(&self, signature: &str) -> String {
        format!("```{}\n{}\n```", self.code_fence, signature)
    }
}
