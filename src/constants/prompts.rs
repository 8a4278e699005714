use crate::models::domain::{QuizQuestion, RoadmapGraph, RoadmapMode, Topic};

pub const CURRICULUM_SYSTEM_PROMPT: &str = "You are an expert curriculum designer. You reply with strict JSON only: no markdown, no commentary, no code fences.";

pub const QUIZ_SYSTEM_PROMPT: &str = "You are an exam author who writes rigorous multiple-choice questions. You reply with strict JSON only: no markdown, no commentary, no code fences.";

pub const SEARCH_PHRASE_SYSTEM_PROMPT: &str = "You turn long study notes into short web search phrases. Reply with the phrase only.";

pub const TUTOR_SYSTEM_PROMPT: &str = "You are a patient, encouraging tutor. Explain step by step, use short examples, and keep answers under 200 words. Use markdown for code and lists.";

fn roadmap_schema() -> String {
    serde_json::to_string(&schemars::schema_for!(RoadmapGraph)).unwrap_or_default()
}

fn quiz_schema() -> String {
    serde_json::to_string(&schemars::schema_for!(Vec<QuizQuestion>)).unwrap_or_default()
}

pub fn roadmap_prompt(topic: &Topic, mode: RoadmapMode) -> String {
    let steps = mode.target_steps();
    let focus = match mode {
        RoadmapMode::Standard => format!(
            "Create a linear {steps}-step learning path for '{topic}' that progresses from fundamentals to advanced mastery. Each step builds directly on the previous one."
        ),
        RoadmapMode::Crash => format!(
            "Create a crash-course revision path for '{topic}' with EXACTLY {steps} steps. Cover only high-yield, exam-critical concepts. Do not include introductions, history, or motivation."
        ),
    };

    format!(
        "{focus}\nUse short labels (at most six words). Number the ids from \"1\".\nReturn a JSON object matching this schema:\n{schema}\nExample: {{\"nodes\": [{{\"id\": \"1\", \"label\": \"Core Syntax\"}}]}}",
        schema = roadmap_schema()
    )
}

pub fn quiz_prompt(
    main_topic: &str,
    sub_topic: &str,
    count: usize,
    prior_topics: &[String],
) -> String {
    let distribution = if prior_topics.is_empty() {
        format!("All {count} questions must focus on '{sub_topic}'.")
    } else {
        format!(
            "Make this cumulative: about 70% of the questions target '{sub_topic}' and about 30% integrate previously studied topics ({}) to test retention.",
            prior_topics.join(", ")
        )
    };

    format!(
        "Write {count} multiple-choice questions about '{sub_topic}' in the context of '{main_topic}'.\n\
         Favour scenario-based and application-level questions. Do NOT ask for simple definitions.\n\
         {distribution}\n\
         Each question has 4 options and `correct_answer` is the zero-based index of the right option.\n\
         Return a JSON array matching this schema:\n{schema}",
        schema = quiz_schema()
    )
}

pub fn search_phrase_prompt(raw: &str) -> String {
    format!(
        "Summarise the following text as a 3-5 word search phrase describing what to study. Reply with the phrase only.\n\n{}",
        raw
    )
}

pub fn tutor_context(topic: &str, node_label: &str) -> String {
    format!(
        "{TUTOR_SYSTEM_PROMPT}\nThe learner is studying '{node_label}' as part of a roadmap on '{topic}'. Stay on that subject."
    )
}
