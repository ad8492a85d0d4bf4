use serde_json::{json, Value as JsonValue};

use crate::models::plan::PlanGenerationInput;

pub const USER_PROMPT: &str = "Please generate a daily plan for me based on my preferences.";

/// System prompt describing the user's day and the JSON shape expected back.
pub fn plan_system_prompt(input: &PlanGenerationInput) -> String {
    let tasks = if input.priority_tasks.is_empty() {
        "None".to_string()
    } else {
        input.priority_tasks.join(", ")
    };
    let goal = input
        .personal_goal
        .as_deref()
        .filter(|goal| !goal.trim().is_empty())
        .unwrap_or("Not specified");

    format!(
        r#"You are an intelligent daily planner AI assistant called AutoPilot AI.
Create a personalized daily plan based on the following user information:
- Mood: {mood}
- Available Time: {time}
- Energy Level: {energy}
- Priority Tasks: {tasks}
- Personal Goal: {goal}

Provide your response as a JSON object with the following structure:
{{
  "greeting": "A personalized greeting that acknowledges their mood",
  "timeline": [
    {{
      "startTime": "Start time in HH:MM format",
      "endTime": "End time in HH:MM format",
      "task": "Task name",
      "description": "Brief description of the task",
      "duration": Duration in minutes
    }}
  ],
  "motivationalTip": "A short motivational tip or advice"
}}

Your response should:
1. Include a greeting that acknowledges their current mood
2. Break down the available time into appropriate tasks based on their priorities
3. Account for their energy level (easier tasks for low energy, challenging tasks for high energy)
4. Include breaks between focused work sessions
5. Incorporate their personal goal if provided
6. End with a motivational tip that encourages them to stay productive

The timeline should be realistic and well-balanced, with proper work-break intervals."#,
        mood = input.mood,
        time = input.time_available,
        energy = input.energy_level,
    )
}

/// Chat-completions request body for one plan generation.
pub fn build_plan_request(model: &str, input: &PlanGenerationInput) -> JsonValue {
    json!({
        "model": model,
        "temperature": 0.7,
        "response_format": { "type": "json_object" },
        "messages": [
            { "role": "system", "content": plan_system_prompt(input) },
            { "role": "user", "content": USER_PROMPT }
        ]
    })
}
