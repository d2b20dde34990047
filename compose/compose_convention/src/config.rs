//! Engine configuration.

/// Synthesis engine settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Store each successful result per `(type, member)` key.
    pub cache_results: bool,

    /// Give an export that names neither contract type nor contract name the
    /// exporting type (or, for member rules, the member's type) as contract
    /// type. When off, both stay unset and the consumer infers.
    pub infer_contract_type: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_results: true,
            infer_contract_type: true,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_results = enabled;
        self
    }

    #[must_use]
    pub fn with_contract_inference(mut self, enabled: bool) -> Self {
        self.infer_contract_type = enabled;
        self
    }
}
