use serde::{Deserialize, Serialize};

use crate::cli::ModelId;

/// The five free-text inputs collected by the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Identity,
    Objective,
    Context,
    Constraints,
    Format,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Identity,
        Field::Objective,
        Field::Context,
        Field::Constraints,
        Field::Format,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Identity => "Identity Construct",
            Field::Objective => "Prime Directive",
            Field::Context => "Knowledge Base",
            Field::Constraints => "Boundary Parameters",
            Field::Format => "Output Architecture",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Field::Identity => "Who is the AI? Define its persona, expertise level, and tone. Be specific (e.g., 'Senior React Engineer with 10 years experience' vs 'Coder').",
            Field::Objective => "What is the singular goal of this agent? What specific problem is it solving?",
            Field::Context => "What context does the AI need? Mention specific frameworks, documents, or real-world events. Search Grounding will be used to verify these details.",
            Field::Constraints => "What should the AI NOT do? Define safety rails, length limits, and negative constraints.",
            Field::Format => "How should the response be structured? Markdown, JSON, Tables, or a specific template?",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Field::Identity => "e.g., You are an expert Constitutional Lawyer specializing in maritime law. You have a dry, academic tone but explain concepts clearly...",
            Field::Objective => "e.g., Your goal is to review user-submitted contracts and identify potential liability clauses based on current US regulations...",
            Field::Context => "e.g., Use React 19 server components. Reference the 2024 AWS Well-Architected Framework...",
            Field::Constraints => "e.g., Do not provide legal advice. Never use markdown code blocks for simple text. Keep responses under 200 words...",
            Field::Format => "e.g., Return a JSON object with fields 'summary', 'risk_score', and 'recommendation'...",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    pub model: ModelId,
    pub identity: String,
    pub objective: String,
    pub context: String,
    pub constraints: String,
    pub format: String,
}

impl FormState {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Identity => &self.identity,
            Field::Objective => &self.objective,
            Field::Context => &self.context,
            Field::Constraints => &self.constraints,
            Field::Format => &self.format,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Identity => &mut self.identity,
            Field::Objective => &mut self.objective,
            Field::Context => &mut self.context,
            Field::Constraints => &mut self.constraints,
            Field::Format => &mut self.format,
        };
        *slot = value.into();
    }

    /// Empty every text field; the model selection survives.
    pub fn clear_text(&mut self) {
        for field in Field::ALL {
            self.set(field, String::new());
        }
    }
}
