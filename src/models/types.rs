use derive_more::{AsRef, Display, From, FromStr, Into};
use bon::bon;
use std::collections::HashMap;

/// Name of the batch-input field holding the ordered prompt sequence.
pub const PROMPT_INPUT: &str = "prompt";

/// Name of a chat model, e.g. "meta/llama3-70b-instruct".
#[derive(Debug, Clone, PartialEq, Eq, Hash, From, Into, Display, AsRef, FromStr)]
#[from(String, &str)]
pub struct ModelName(String);

#[bon]
impl ModelName {
    #[builder]
    pub fn new(name: String) -> Self {
        Self(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

/// A text prompt sent to the model.
#[derive(Debug, Clone, PartialEq, Eq, From, Into, Display, AsRef, FromStr)]
#[from(String, &str)]
pub struct PromptText(String);

#[bon]
impl PromptText {
    #[builder]
    pub fn new(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The model's text output for a single prompt.
#[derive(Debug, Clone, PartialEq, Eq, From, Into, Display, AsRef, FromStr)]
#[from(String, &str)]
pub struct GenerationText(String);

#[bon]
impl GenerationText {
    #[builder]
    pub fn new(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Batch input mapping. The single recognized key is [`PROMPT_INPUT`],
/// holding the ordered sequence of prompts for one batch call.
#[derive(Debug, Clone, Default, From, Into)]
pub struct PromptBatch(HashMap<String, Vec<String>>);

#[bon]
impl PromptBatch {
    #[builder]
    pub fn new(inputs: HashMap<String, Vec<String>>) -> Self {
        Self(inputs)
    }

    /// Builds a batch from an ordered prompt sequence under the
    /// [`PROMPT_INPUT`] key.
    pub fn from_prompts<I, S>(prompts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let prompts: Vec<String> = prompts.into_iter().map(Into::into).collect();
        Self(HashMap::from([(PROMPT_INPUT.to_string(), prompts)]))
    }

    /// The ordered prompt sequence, or `None` when the [`PROMPT_INPUT`]
    /// key is absent.
    pub fn prompts(&self) -> Option<&[String]> {
        self.0.get(PROMPT_INPUT).map(Vec::as_slice)
    }

    pub fn into_inner(self) -> HashMap<String, Vec<String>> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_name() {
        let model = ModelName::from("test_model");
        assert_eq!(model.as_str(), "test_model");
        assert_eq!(model.to_string(), "test_model");
        assert!(!model.is_empty());

        let blank = ModelName::from("  ");
        assert!(blank.is_empty());

        // Test FromStr
        let parsed: ModelName = "test_model".parse().unwrap();
        assert_eq!(parsed, model);
    }

    #[test]
    fn test_text_types() {
        let prompt = PromptText::from("test_prompt");
        assert_eq!(prompt.as_str(), "test_prompt");
        assert_eq!(prompt.to_string(), "test_prompt");
        assert!(!prompt.is_empty());

        let generation = GenerationText::from("generated");
        assert_eq!(generation.as_str(), "generated");
        assert_eq!(generation.clone().into_inner(), "generated");
        assert_eq!(generation.len(), 9);
    }

    #[test]
    fn test_prompt_batch() {
        let batch = PromptBatch::from_prompts(["prompt1", "prompt2"]);
        assert_eq!(
            batch.prompts(),
            Some(["prompt1".to_string(), "prompt2".to_string()].as_slice())
        );

        let empty = PromptBatch::default();
        assert_eq!(empty.prompts(), None);

        let other_key = PromptBatch::from(HashMap::from([(
            "input".to_string(),
            vec!["prompt1".to_string()],
        )]));
        assert_eq!(other_key.prompts(), None);
    }
}
