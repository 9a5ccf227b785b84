use anyhow::{bail, Context};
use colored::Colorize;
use dialoguer::Password;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, IsTerminal, Write};
use std::time::Duration;

use crate::cli::ModelId;
use crate::form::Field;
use crate::log::mask_key;
use crate::wire::GeneratedResult;
use crate::wizard::WizardStep;

pub mod clipboard;

const INPUT_STEPS: u8 = 5;

/// What the user asked for on an input card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardInput {
    Back,
    Quit,
    Dismiss,
    /// Nothing typed; keep whatever the field already holds.
    Keep,
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntroAction {
    SelectModel(ModelId),
    EnterKey,
    PlatformKey,
    Start,
    Quit,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultAction {
    Copy,
    NewPrompt,
    Quit,
    Unknown,
}

pub fn parse_card_input(lines: &[String]) -> CardInput {
    match lines.first().map(|l| l.trim()) {
        None | Some("") => CardInput::Keep,
        Some(":back") | Some(":b") => CardInput::Back,
        Some(":quit") | Some(":q") => CardInput::Quit,
        Some(":dismiss") | Some(":d") => CardInput::Dismiss,
        Some(_) => CardInput::Text(lines.join("\n").trim_end().to_string()),
    }
}

pub fn parse_intro_action(input: &str) -> IntroAction {
    match input.trim().to_lowercase().as_str() {
        "" | "s" | "start" => IntroAction::Start,
        "k" | "key" => IntroAction::EnterKey,
        "p" | "platform" => IntroAction::PlatformKey,
        "q" | "quit" => IntroAction::Quit,
        other => other
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| ModelId::ALL.get(i).copied())
            .map(IntroAction::SelectModel)
            .unwrap_or(IntroAction::Unknown),
    }
}

pub fn parse_result_action(input: &str) -> ResultAction {
    match input.trim().to_lowercase().as_str() {
        "c" | "copy" => ResultAction::Copy,
        "n" | "new" => ResultAction::NewPrompt,
        "q" | "quit" => ResultAction::Quit,
        _ => ResultAction::Unknown,
    }
}

/// "Step n of 5" plus a five-segment bar; `None` outside the input steps.
pub fn step_progress(step: WizardStep) -> Option<String> {
    if !step.is_input() {
        return None;
    }
    let n = step.index();
    let bar: String = (1..=INPUT_STEPS)
        .map(|i| if i <= n { '■' } else { '□' })
        .collect();
    Some(format!("Step {} of {}  {}  {}", n, INPUT_STEPS, bar, step.title()))
}

/// `None` once stdin is closed.
pub fn prompt_line(prompt: &str) -> anyhow::Result<Option<String>> {
    print!("{}: ", prompt);
    io::stdout().flush()?;
    let mut s = String::new();
    if io::stdin().read_line(&mut s)? == 0 {
        return Ok(None);
    }
    Ok(Some(s.trim_end_matches(['\r', '\n']).to_string()))
}

/// Non-echoing key entry.
pub trait SecretInput: Send + Sync {
    fn read_secret(&self, prompt: &str) -> anyhow::Result<String>;
}

/// The controlling terminal, with echo off while the key is typed.
pub struct HiddenTerminal;

impl SecretInput for HiddenTerminal {
    fn read_secret(&self, prompt: &str) -> anyhow::Result<String> {
        if !io::stdin().is_terminal() {
            bail!("key entry needs an interactive terminal; pass --api-key instead");
        }
        Password::new()
            .with_prompt(format!("{prompt} (input hidden)"))
            .allow_empty_password(true)
            .interact()
            .context("Failed to read API key from terminal")
    }
}

/// Trimmed key from `input`; `None` when nothing was entered.
pub fn read_api_key(input: &dyn SecretInput, prompt: &str) -> anyhow::Result<Option<String>> {
    let raw = input.read_secret(prompt)?;
    let key = raw.trim();
    Ok((!key.is_empty()).then(|| key.to_string()))
}

/// Reads lines until an empty one. A command on the first line ends input
/// immediately. `None` when stdin closes before anything was typed.
pub fn read_card_lines() -> anyhow::Result<Option<Vec<String>>> {
    print!("{} ", ">".cyan().bold());
    io::stdout().flush()?;
    let stdin = io::stdin();
    let mut lines = Vec::new();
    let mut closed = true;
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            closed = false;
            break;
        }
        if lines.is_empty() && line.trim().starts_with(':') {
            lines.push(line);
            closed = false;
            break;
        }
        lines.push(line);
    }
    if closed && lines.is_empty() {
        return Ok(None);
    }
    Ok(Some(lines))
}

pub fn show_error_banner(message: &str) {
    println!("\n{} {}", "[!]".red().bold(), message.red());
}

pub fn show_header(step: WizardStep, model: ModelId, secured: bool) {
    let badge = if step == WizardStep::Intro {
        "V 2.5 // ONLINE".to_string()
    } else {
        model.as_str().to_uppercase()
    };
    let secured = if secured && step > WizardStep::Intro {
        format!("  {}", "SECURED".green().bold())
    } else {
        String::new()
    };
    println!("\n{}  {}{}", "MOBIUS // PRIME".bold().dimmed(), badge.cyan(), secured);
}

pub fn show_intro(model: ModelId, manual_key: &str, platform_active: bool, ready: bool) {
    println!("\n{}", "MOBIUS PRIME".green().bold());
    println!("{}", "System Prompt Engineering App".green());
    println!("Construct high-fidelity system prompts through a guided interrogation protocol.\n");

    println!("{}", "Uplink Authentication".bold());
    if manual_key.is_empty() {
        println!("  manual key: {}", "(none)".dimmed());
    } else {
        println!("  manual key: {}", mask_key(manual_key));
    }
    if platform_active {
        println!("  {}", "ENVIRONMENT KEY ACTIVE".green().bold());
    } else {
        println!("  [p] USE PLATFORM KEY   [k] enter key manually");
    }

    println!("\n{}", "Select Neural Core".bold());
    for (i, m) in ModelId::ALL.iter().enumerate() {
        let marker = if *m == model { "●".green().to_string() } else { " ".to_string() };
        println!("  {} [{}] {:<18} {}", marker, i + 1, m.display_name(), m.description().dimmed());
    }

    let start = if ready {
        "INITIALIZE PROTOCOL [enter]".green().bold()
    } else {
        "AWAITING AUTHENTICATION".dimmed()
    };
    println!("\n{}   [q] quit", start);
}

pub fn show_card(step: WizardStep, field: Field, current: &str, can_advance: bool) {
    if let Some(progress) = step_progress(step) {
        println!("{}", progress.dimmed());
    }
    println!("\n{}", field.label().bold());
    println!("{}", field.description());
    if current.is_empty() {
        println!("{}", field.placeholder().dimmed());
    } else {
        println!("{}\n{}", "current:".dimmed(), current);
    }
    let next = if step == WizardStep::Format { "GENERATE" } else { "NEXT" };
    let hint = if can_advance {
        format!("blank line = {next}")
    } else {
        "this field is required".to_string()
    };
    println!("{}", format!("({hint}; :back, :dismiss, :quit)").dimmed());
}

pub fn generating_spinner(model: ModelId) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(format!(
        "Synthesizing on {} (search grounding, chain of thought; Ctrl-C to cancel)",
        model
    ));
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

pub fn show_result(result: &GeneratedResult, model: ModelId) {
    println!("\n{}", "Artifact Generated".bold());
    println!(
        "{} Syntax Verified  {} Grounding Applied  [{}]",
        "✓".green(),
        "✓".green(),
        model
    );

    println!("\n{}", "MOBIUS REASONING".green().bold());
    println!("{}", result.reasoning);

    if !result.sources.is_empty() {
        println!("\n{}", "GROUNDING SOURCES".bold());
        for source in &result.sources {
            println!("  ↗ {}\n    {}", source.title, source.url.dimmed());
        }
    }

    println!("\n{}", "── system_prompt.md ──".dimmed());
    println!("{}", result.system_prompt);
    println!("{}", "──────────────────────".dimmed());
}

pub fn result_menu(copied: bool) -> String {
    let copy = if copied {
        "[c] Copied ✓".green().bold().to_string()
    } else {
        "[c] Copy System Prompt".to_string()
    };
    format!("{}   [n] New Prompt   [q] quit", copy)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ScriptedSecret(&'static str);

    impl SecretInput for ScriptedSecret {
        fn read_secret(&self, _prompt: &str) -> anyhow::Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct ClosedTerminal;

    impl SecretInput for ClosedTerminal {
        fn read_secret(&self, _prompt: &str) -> anyhow::Result<String> {
            bail!("key entry needs an interactive terminal")
        }
    }

    #[test]
    fn api_key_comes_from_hidden_input_trimmed() {
        let key = read_api_key(&ScriptedSecret("  AIzaSyExample123 \n"), "key").unwrap();
        assert_eq!(key.as_deref(), Some("AIzaSyExample123"));
    }

    #[test]
    fn blank_hidden_entry_is_no_key() {
        assert_eq!(read_api_key(&ScriptedSecret("   "), "key").unwrap(), None);
    }

    #[test]
    fn hidden_input_failure_propagates() {
        assert!(read_api_key(&ClosedTerminal, "key").is_err());
    }

    fn lines(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn card_commands_and_text() {
        assert_eq!(parse_card_input(&[]), CardInput::Keep);
        assert_eq!(parse_card_input(&lines(&[":back"])), CardInput::Back);
        assert_eq!(parse_card_input(&lines(&[" :q "])), CardInput::Quit);
        assert_eq!(parse_card_input(&lines(&[":dismiss"])), CardInput::Dismiss);
        assert_eq!(
            parse_card_input(&lines(&["You are a lawyer.", "Dry tone.  "])),
            CardInput::Text("You are a lawyer.\nDry tone.".into())
        );
    }

    #[test]
    fn intro_actions() {
        assert_eq!(parse_intro_action(""), IntroAction::Start);
        assert_eq!(parse_intro_action("K"), IntroAction::EnterKey);
        assert_eq!(parse_intro_action("p"), IntroAction::PlatformKey);
        assert_eq!(parse_intro_action("3"), IntroAction::SelectModel(ModelId::Gemini25Flash));
        assert_eq!(parse_intro_action("0"), IntroAction::Unknown);
        assert_eq!(parse_intro_action("4"), IntroAction::Unknown);
    }

    #[test]
    fn result_actions() {
        assert_eq!(parse_result_action("c"), ResultAction::Copy);
        assert_eq!(parse_result_action("NEW"), ResultAction::NewPrompt);
        assert_eq!(parse_result_action("x"), ResultAction::Unknown);
    }

    #[test]
    fn progress_only_on_input_steps() {
        assert_eq!(step_progress(WizardStep::Intro), None);
        assert_eq!(step_progress(WizardStep::Generating), None);
        let p = step_progress(WizardStep::Objective).unwrap();
        assert!(p.starts_with("Step 2 of 5  ■■□□□"));
        assert!(p.ends_with("Define Prime Directive"));
    }
}
