pub const DEFAULT_TRUNCATE_LIMIT: usize = 2000;
const TRUNCATION_MARKER: &str = "...";

/// Built-in compliance reference list, used when no knowledge-base file is
/// configured.
pub const DEFAULT_KNOWLEDGE: &str = "\
1. CBB Rulebook Volume 5 (Specialized Licensees):
   - FC Module: Financial Crime
   - HC Module: High-Level Controls
   - RR Module: Regulatory Reporting

2. Company-Specific Policies:
   - KYC Onboarding Guidelines
   - AML Transaction Monitoring Rules
   - Regulatory Reporting Schedule
";

/// The textual sources gathered for a single query. Built fresh per query
/// and discarded after prompt assembly.
#[derive(Debug, Clone, Default)]
pub struct SourceBundle {
    pub folder_text: String,
    pub web_text: String,
}

/// Assembles the bounded system prompt: persona text, the static knowledge
/// summary, then each auxiliary source truncated to the limit. Total prompt
/// size is bounded by the knowledge length plus twice the limit plus the
/// fixed instructional text, regardless of source document size.
pub struct ContextBuilder {
    knowledge: String,
    truncate_limit: usize,
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self {
            knowledge: DEFAULT_KNOWLEDGE.to_string(),
            truncate_limit: DEFAULT_TRUNCATE_LIMIT,
        }
    }

    pub fn with_knowledge(mut self, knowledge: impl Into<String>) -> Self {
        self.knowledge = knowledge.into();
        self
    }

    pub fn with_truncate_limit(mut self, limit: usize) -> Self {
        self.truncate_limit = limit;
        self
    }

    pub fn build_system_prompt(&self, bundle: &SourceBundle) -> String {
        format!(
            "You are a senior compliance assistant AI trained on the Central Bank of Bahrain (CBB) Rulebook, internal fintech policies, and regulatory practices.\n\
             Provide responses with direct references (Volume, Module, Clause) and actionable guidance.\n\
             \n\
             Knowledge Base:\n{}\n\
             \n\
             Document Extracts:\n{}\n\
             \n\
             Website Content:\n{}",
            self.knowledge,
            truncate(&bundle.folder_text, self.truncate_limit),
            truncate(&bundle.web_text, self.truncate_limit),
        )
    }
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// First `limit` characters of `text`. The marker is appended only when
/// something was actually cut; under-limit text comes back unchanged.
pub fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }

    let mut truncated: String = text.chars().take(limit).collect();
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}
