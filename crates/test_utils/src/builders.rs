//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while leaving
//! everything else absent.

use serde_json::Value;

use domain_claims::ExtractedFields;

/// Builder for extracted fields and the model reply that carries them
#[derive(Debug, Clone, Default)]
pub struct FieldsBuilder {
    fields: ExtractedFields,
}

impl FieldsBuilder {
    /// Creates a builder with every field absent
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder with all eight fields filled
    pub fn complete() -> Self {
        Self::new()
            .loss_type("Theft")
            .severity("Medium")
            .affected_assets("Laptop")
            .estimated_loss("$1,200")
            .incident_date("Last Friday")
            .location("Central station")
            .confidence("High")
            .explanation("Classified as 'Theft' because the 'laptop was stolen'")
    }

    pub fn loss_type(mut self, value: impl Into<String>) -> Self {
        self.fields.loss_type = Some(value.into());
        self
    }

    pub fn severity(mut self, value: impl Into<String>) -> Self {
        self.fields.severity = Some(value.into());
        self
    }

    pub fn affected_assets(mut self, value: impl Into<String>) -> Self {
        self.fields.affected_assets = Some(value.into());
        self
    }

    pub fn estimated_loss(mut self, value: impl Into<String>) -> Self {
        self.fields.estimated_loss = Some(value.into());
        self
    }

    pub fn incident_date(mut self, value: impl Into<String>) -> Self {
        self.fields.incident_date = Some(value.into());
        self
    }

    pub fn location(mut self, value: impl Into<String>) -> Self {
        self.fields.location = Some(value.into());
        self
    }

    pub fn confidence(mut self, value: impl Into<String>) -> Self {
        self.fields.confidence = Some(value.into());
        self
    }

    pub fn explanation(mut self, value: impl Into<String>) -> Self {
        self.fields.extraction_explanation = Some(value.into());
        self
    }

    /// Builds the typed fields
    pub fn build(self) -> ExtractedFields {
        self.fields
    }

    /// Renders the present fields as a bare JSON reply
    pub fn to_reply(&self) -> String {
        Value::Object(self.fields.to_mapping()).to_string()
    }

    /// Renders the present fields as a ```json fenced reply
    pub fn to_fenced_reply(&self) -> String {
        format!("```json\n{}\n```", self.to_reply())
    }
}
