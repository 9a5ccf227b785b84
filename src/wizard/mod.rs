use crate::cli::ModelId;
use crate::errors::GenerationError;
use crate::form::{Field, FormState};
use crate::wire::GeneratedResult;

/// Wizard step progression. Transitions are single-step and saturate at
/// both ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    #[default]
    Intro,
    Identity,
    Objective,
    Context,
    Constraints,
    Format,
    Generating,
    Result,
}

impl WizardStep {
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Intro => "Initialization",
            Self::Identity => "Construct Persona Matrix",
            Self::Objective => "Define Prime Directive",
            Self::Context => "Upload Knowledge Base",
            Self::Constraints => "Set Boundary Parameters",
            Self::Format => "Output Architecture",
            Self::Generating => "Processing...",
            Self::Result => "Final Artifact",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Intro => Self::Identity,
            Self::Identity => Self::Objective,
            Self::Objective => Self::Context,
            Self::Context => Self::Constraints,
            Self::Constraints => Self::Format,
            Self::Format => Self::Generating,
            Self::Generating => Self::Result,
            Self::Result => Self::Result,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Intro => Self::Intro,
            Self::Identity => Self::Intro,
            Self::Objective => Self::Identity,
            Self::Context => Self::Objective,
            Self::Constraints => Self::Context,
            Self::Format => Self::Constraints,
            Self::Generating => Self::Format,
            Self::Result => Self::Generating,
        }
    }

    /// Input steps map onto the form field they edit.
    pub fn field(self) -> Option<Field> {
        match self {
            Self::Identity => Some(Field::Identity),
            Self::Objective => Some(Field::Objective),
            Self::Context => Some(Field::Context),
            Self::Constraints => Some(Field::Constraints),
            Self::Format => Some(Field::Format),
            _ => None,
        }
    }

    pub fn is_input(self) -> bool {
        self.field().is_some()
    }

    pub fn next_on_success(self) -> Self {
        match self {
            Self::Generating => Self::Result,
            other => other,
        }
    }

    pub fn next_on_failure(self) -> Self {
        match self {
            Self::Generating => Self::Format,
            other => other,
        }
    }
}

/// Local gating only: Identity and Objective require text, nothing else does.
pub fn can_advance(step: WizardStep, form: &FormState) -> bool {
    match step {
        WizardStep::Identity => !form.identity.is_empty(),
        WizardStep::Objective => !form.objective.is_empty(),
        _ => true,
    }
}

/// Session state for one run of the wizard.
#[derive(Debug, Default)]
pub struct Wizard {
    step: WizardStep,
    pub form: FormState,
    pub manual_key: String,
    result: Option<GeneratedResult>,
    error: Option<String>,
}

impl Wizard {
    pub fn new(form: FormState) -> Self {
        Self { form, ..Self::default() }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn result(&self) -> Option<&GeneratedResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn can_advance(&self) -> bool {
        can_advance(self.step, &self.form)
    }

    /// Leaves Intro, but only once a usable credential is available.
    pub fn start(&mut self, credential_ready: bool) -> bool {
        if self.step != WizardStep::Intro || !credential_ready {
            return false;
        }
        self.step = self.step.next();
        true
    }

    /// Moves forward one input step. Intro is left through `start` and
    /// Generating is entered through `begin_generation`.
    pub fn advance(&mut self) -> bool {
        if !self.step.is_input() || self.step == WizardStep::Format || !self.can_advance() {
            return false;
        }
        self.step = self.step.next();
        true
    }

    /// Moves back one step within Intro..=Format. Generating and Result
    /// have no back edge.
    pub fn retreat(&mut self) -> bool {
        if !self.step.is_input() {
            return false;
        }
        self.step = self.step.prev();
        true
    }

    pub fn begin_generation(&mut self) -> bool {
        if self.step != WizardStep::Format {
            return false;
        }
        self.error = None;
        self.step = WizardStep::Generating;
        true
    }

    pub fn finish_generation(&mut self, outcome: Result<GeneratedResult, GenerationError>) {
        if self.step != WizardStep::Generating {
            return;
        }
        match outcome {
            Ok(result) => {
                self.result = Some(result);
                self.step = self.step.next_on_success();
            }
            Err(err) => {
                self.error = Some(err.to_string());
                self.step = self.step.next_on_failure();
            }
        }
    }

    pub fn select_model(&mut self, model: ModelId) {
        self.form.model = model;
    }

    pub fn reset(&mut self) {
        self.form.clear_text();
        self.result = None;
        self.error = None;
        self.step = WizardStep::Intro;
    }
}
