//! Writing tools backed by a hosted chat model
//!
//! Each tool pairs a fixed system prompt with an instruction built from the
//! request. The model call sits behind [`ChatBackend`] so the tools can run
//! against any completion service.

mod openai;

pub use openai::OpenAiBackend;

use crate::config::ServiceConfig;
use crate::error::{Result, ToolsError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }
}

/// A chat completion service
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send the conversation and return the assistant's reply text
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiTool {
    GrammarChecker,
    EssayImprover,
    Summarizer,
}

const GRAMMAR_PROMPT: &str = "You are a grammar and spelling corrector. Return the corrected version of the text. Do not change the meaning. Do not add or remove sentences. Just fix grammar, spelling, punctuation, and basic word choice.

Rules:
- Fix all grammar errors
- Correct spelling mistakes
- Fix punctuation errors
- Improve basic word choice if it's clearly wrong
- Preserve the original meaning completely
- Do NOT rewrite or restructure sentences unless grammatically necessary
- Do NOT add new information
- Return ONLY the corrected text, no explanations or notes";

const ESSAY_PROMPT: &str = "You are an academic writing assistant. The user will paste a paragraph or essay. Your job is to improve grammar, clarity, and readability while preserving the original meaning. Avoid adding new ideas or making up facts.

Rules:
- Fix grammar, spelling, and punctuation errors
- Improve sentence structure and flow
- Enhance clarity and readability
- Preserve the original meaning and tone
- Do NOT add new information or ideas
- Do NOT change the core message
- Return ONLY the improved text, no explanations or notes

If the user requests specific improvements (clarity, formality, conciseness), apply those while maintaining the original meaning.";

const SUMMARY_PROMPT: &str = "You summarize academic and informational text. Keep the summary faithful to the original, with no new information.

Rules:
- Preserve key facts and main ideas
- Maintain the original meaning
- Do NOT add information not in the original
- Do NOT include your own opinions or interpretations
- Return ONLY the summary text, no explanations or notes";

impl AiTool {
    /// Route segment under `/api/ai/`
    pub fn from_route(name: &str) -> Option<Self> {
        match name {
            "grammar-checker" => Some(AiTool::GrammarChecker),
            "essay-improver" => Some(AiTool::EssayImprover),
            "summarizer" => Some(AiTool::Summarizer),
            _ => None,
        }
    }

    pub fn system_prompt(&self) -> &'static str {
        match self {
            AiTool::GrammarChecker => GRAMMAR_PROMPT,
            AiTool::EssayImprover => ESSAY_PROMPT,
            AiTool::Summarizer => SUMMARY_PROMPT,
        }
    }

    /// JSON field carrying the reply
    pub fn reply_field(&self) -> &'static str {
        match self {
            AiTool::GrammarChecker => "correctedText",
            AiTool::EssayImprover => "improvedText",
            AiTool::Summarizer => "summary",
        }
    }

    pub fn char_limit(&self, config: &ServiceConfig) -> usize {
        match self {
            AiTool::GrammarChecker | AiTool::EssayImprover => config.max_edit_chars,
            AiTool::Summarizer => config.max_summary_chars,
        }
    }

    fn failure_message(&self) -> &'static str {
        match self {
            AiTool::GrammarChecker => "Failed to check grammar. Please try again.",
            AiTool::EssayImprover => "Failed to improve text. Please try again.",
            AiTool::Summarizer => "Failed to summarize text. Please try again.",
        }
    }
}

/// Request body shared by the three tools
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolRequest {
    #[serde(default)]
    pub text: String,
    /// Essay improver: any of "clarity", "formal", "concise"
    #[serde(default)]
    pub options: Vec<String>,
    /// Summarizer: "short", "medium" or "detailed"
    #[serde(default)]
    pub length: Option<String>,
}

impl ToolRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), ..Self::default() }
    }

    pub fn validate(&self, limit: usize) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(ToolsError::invalid("text", "Text is required"));
        }
        if self.text.chars().count() > limit {
            return Err(ToolsError::invalid(
                "text",
                format!("Text is too long. Maximum {} characters.", group_thousands(limit)),
            ));
        }
        Ok(())
    }
}

/// 20000 -> "20,000"
fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn improvement_instructions(options: &[String]) -> String {
    let mut instructions = String::from("Improve this text:");
    let wants = |name: &str| options.iter().any(|o| o.eq_ignore_ascii_case(name));
    if wants("clarity") {
        instructions.push_str(" Make it clearer and easier to understand.");
    }
    if wants("formal") {
        instructions.push_str(" Make it more formal and academic.");
    }
    if wants("concise") {
        instructions.push_str(" Make it more concise and to the point.");
    }
    instructions
}

fn summary_length_instruction(length: Option<&str>) -> &'static str {
    match length.unwrap_or("medium") {
        "short" => "Summarize in 1-2 sentences. Include only the most essential information.",
        "medium" => "Summarize in a brief paragraph (3-5 sentences). Include main points and key details.",
        "detailed" => "Provide a detailed summary (2-3 paragraphs). Include main points, supporting details, and important context.",
        _ => "Summarize in a brief paragraph. Include main points and key details.",
    }
}

/// Conversation sent to the model for `tool`
pub fn build_messages(tool: AiTool, request: &ToolRequest) -> Vec<ChatMessage> {
    let user = match tool {
        AiTool::GrammarChecker => {
            format!("Correct the grammar and spelling in this text:\n\n{}", request.text)
        }
        AiTool::EssayImprover => {
            format!("{}\n\n{}", improvement_instructions(&request.options), request.text)
        }
        AiTool::Summarizer => format!(
            "{}\n\nText to summarize:\n\n{}",
            summary_length_instruction(request.length.as_deref()),
            request.text
        ),
    };
    vec![ChatMessage::system(tool.system_prompt()), ChatMessage::user(user)]
}

/// Validate, call the model, and return the trimmed reply
pub async fn run_tool<B>(backend: &B, tool: AiTool, request: &ToolRequest, config: &ServiceConfig) -> Result<String>
where
    B: ChatBackend + ?Sized,
{
    request.validate(tool.char_limit(config))?;

    let messages = build_messages(tool, request);
    match backend.complete(&messages).await {
        Ok(reply) => Ok(reply.trim().to_string()),
        Err(e) => {
            log::error!("{:?} failed: {}", tool, e);
            match e {
                ToolsError::Upstream(msg) if msg.is_empty() => {
                    Err(ToolsError::Upstream(tool.failure_message().to_string()))
                }
                other => Err(other),
            }
        }
    }
}
