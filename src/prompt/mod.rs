use crate::form::FormState;

fn instructions() -> &'static str {
r#"INSTRUCTIONS:
1. Research the specific topics mentioned in the "Context" or "Identity" using Google Search if they refer to specific real-world technologies, events, or frameworks (e.g., "React 19", "US Tax Code 2025") to ensure the system prompt contains accurate, high-level instructions.
2. Synthesize a coherent, highly detailed System Prompt.
3. Structure the System Prompt with clear delimiters (XML or Markdown sections).
4. Include a "Chain of Thought" or "Reasoning Protocol" section in the generated prompt if the task is complex.
5. Return the response in a structured JSON format containing the 'systemPrompt' and a 'reasoning' field explaining why you structured it that way."#
}

fn techniques() -> &'static str {
r#"The final system prompt you generate should use advanced techniques like:
- Role Prompting
- Few-Shot Prompting (placeholders)
- Chain-of-Thought guidance
- Delimiter usage"#
}

/// The meta-prompt sent to the model. Field values are embedded verbatim.
pub fn build_instruction(form: &FormState) -> String {
    format!(
        "You are MOBIUS PRIME, an advanced Prompt Engineering Architect.\n\
         Your goal is to construct a \"World-Class\" System Prompt based on user inputs.\n\
         \n\
         USER INPUTS:\n\
         1. Identity/Persona: {}\n\
         2. Primary Objective: {}\n\
         3. Context/Knowledge: {}\n\
         4. Constraints: {}\n\
         5. Output Format: {}\n\
         \n\
         {}\n\
         \n\
         {}\n",
        form.identity,
        form.objective,
        form.context,
        form.constraints,
        form.format,
        instructions(),
        techniques(),
    )
}
