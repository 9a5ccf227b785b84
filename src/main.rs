use clap::Parser;
use colored::Colorize;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, warn};

mod cli;
mod config;
mod credential;
mod errors;
mod form;
mod generate;
mod interrupt;
mod log;
mod prompt;
mod provider;
mod ux;
mod wire;
mod wizard;

use credential::keyring_store::KeyringCapability;
use credential::{CredentialResolver, DynCapability};
use errors::GenerationError;
use form::FormState;
use interrupt::Interrupts;
use provider::DynProvider;
use ux::clipboard::{copy_artifact, CopyIndicator, SystemClipboard};
use ux::{CardInput, IntroAction, ResultAction};
use wire::GeneratedResult;
use wizard::{Wizard, WizardStep};

/// Runs one generation as a spawned task raced against the session's
/// Ctrl-C routing. Any failure, cancellation included, comes back as a value.
async fn run_generation(
    interrupts: &Interrupts,
    provider: DynProvider,
    form: FormState,
    manual_key: String,
    ambient_key: Option<String>,
) -> Result<GeneratedResult, GenerationError> {
    let mut scope = interrupts.generation();
    let spinner = ux::generating_spinner(form.model);
    let mut task = tokio::spawn(async move {
        generate::generate(
            provider.as_ref(),
            &form,
            Some(manual_key.as_str()),
            ambient_key.as_deref(),
        )
        .await
    });

    let outcome = tokio::select! {
        joined = &mut task => joined.unwrap_or_else(|e| {
            Err(GenerationError::Provider(format!("generation task failed: {e}")))
        }),
        _ = scope.cancelled() => {
            task.abort();
            Err(GenerationError::Cancelled)
        }
    };
    spinner.finish_and_clear();
    outcome
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();
    log::init(args.debug)?;
    let interrupts = Interrupts::new();
    interrupt::install(Arc::clone(&interrupts));

    let mut cfg = config::Config::load(args.config.as_deref().map(Path::new))?;
    cfg.apply_args(&args);

    let capability: Option<DynCapability> = if cfg.use_keyring {
        Some(Box::new(KeyringCapability::new(
            cfg.keyring_service.clone(),
            Arc::new(ux::HiddenTerminal),
        )))
    } else {
        None
    };
    let mut resolver = CredentialResolver::init(capability, cfg.env_key()).await;
    let provider = provider::make_provider(cfg.endpoint.clone());

    let mut wizard = Wizard::new(FormState {
        model: cfg.model,
        ..FormState::default()
    });
    if let Some(key) = &args.api_key {
        wizard.manual_key = key.trim().to_string();
    }

    let mut clipboard = SystemClipboard::new();
    let mut copied = CopyIndicator::default();

    debug!(model = %cfg.model, endpoint = %cfg.endpoint, "session started");

    loop {
        let ready = resolver.is_ready(&wizard.manual_key);
        ux::show_header(wizard.step(), wizard.form.model, ready);
        if let Some(message) = wizard.error() {
            ux::show_error_banner(message);
        }

        match wizard.step() {
            WizardStep::Intro => {
                ux::show_intro(
                    wizard.form.model,
                    &wizard.manual_key,
                    resolver.platform_or_env_present(),
                    ready,
                );
                let Some(choice) = ux::prompt_line("choice")? else { break };
                match ux::parse_intro_action(&choice) {
                    IntroAction::Start => {
                        if !wizard.start(ready) {
                            println!("{}", "Provide an API key first ([k] or [p]).".yellow());
                        }
                    }
                    IntroAction::SelectModel(model) => wizard.select_model(model),
                    IntroAction::EnterKey => {
                        match ux::read_api_key(&ux::HiddenTerminal, "Gemini API key (AIza...)") {
                            Ok(key) => wizard.manual_key = key.unwrap_or_default(),
                            Err(e) => warn!("{e:#}"),
                        }
                    }
                    IntroAction::PlatformKey => {
                        if !resolver.has_capability() {
                            println!("{}", "No platform key capability available.".yellow());
                        } else if let Err(e) = resolver.request_platform_key().await {
                            warn!("platform key selection failed: {e:#}");
                        }
                    }
                    IntroAction::Quit => break,
                    IntroAction::Unknown => println!("{}", "Unrecognized choice.".yellow()),
                }
            }

            WizardStep::Generating => {
                debug!(
                    credential = resolver.resolve(&wizard.manual_key).map(|c| c.source()).unwrap_or("none"),
                    "starting generation"
                );
                let ambient_key = resolver.ambient_key().await;
                let outcome = run_generation(
                    &interrupts,
                    provider.clone(),
                    wizard.form.clone(),
                    wizard.manual_key.clone(),
                    ambient_key,
                )
                .await;
                if let Err(e) = &outcome {
                    error!(model = %wizard.form.model, "generation failed: {e}");
                }
                wizard.finish_generation(outcome);
            }

            WizardStep::Result => {
                if let Some(result) = wizard.result() {
                    ux::show_result(result, wizard.form.model);
                }
                let menu = ux::result_menu(copied.is_active(Instant::now()));
                let Some(choice) = ux::prompt_line(&menu)? else { break };
                match ux::parse_result_action(&choice) {
                    ResultAction::Copy => {
                        let text = wizard
                            .result()
                            .map(|r| r.system_prompt.clone())
                            .unwrap_or_default();
                        if let Err(e) = copy_artifact(&mut clipboard, &mut copied, &text, Instant::now()) {
                            warn!("{e}");
                        }
                    }
                    ResultAction::NewPrompt => {
                        wizard.reset();
                        copied = CopyIndicator::default();
                    }
                    ResultAction::Quit => break,
                    ResultAction::Unknown => println!("{}", "Unrecognized choice.".yellow()),
                }
            }

            step => {
                let Some(field) = step.field() else { break };
                ux::show_card(step, field, wizard.form.get(field), wizard.can_advance());
                let Some(lines) = ux::read_card_lines()? else { break };
                match ux::parse_card_input(&lines) {
                    CardInput::Back => {
                        wizard.retreat();
                        continue;
                    }
                    CardInput::Quit => break,
                    CardInput::Dismiss => {
                        wizard.dismiss_error();
                        continue;
                    }
                    CardInput::Keep => {}
                    CardInput::Text(text) => wizard.form.set(field, text),
                }
                if step == WizardStep::Format {
                    wizard.begin_generation();
                } else if !wizard.advance() {
                    println!("{}", format!("{} is required.", field.label()).yellow());
                }
            }
        }
    }

    Ok(())
}
