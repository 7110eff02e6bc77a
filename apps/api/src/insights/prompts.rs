// Insight prompt templates.
// Placeholders are filled in one pass by the requester before sending.

/// Role for all insight requests. The JSON-object directive is appended at call time.
pub const INSIGHT_SYSTEM: &str = "You are a supportive workplace wellbeing analyst. \
    You read daily check-ins (mood, stress level 0-10, productivity level 0-10, notes) \
    and give practical, kind, non-clinical guidance.";

/// Personal analysis. Replace: {user_name}, {metrics_json}, {total}, {records_json}
pub const PERSON_PROMPT_TEMPLATE: &str = r#"Analyze the wellness check-ins of {user_name}.

SUMMARY STATISTICS:
{metrics_json}

TOTAL CHECK-INS: {total}

CHECK-INS (oldest first):
{records_json}

Return a JSON object with this EXACT shape:
{
  "summary": "two or three sentences about how this person is doing",
  "recommendations": ["concrete action the person can take"],
  "riskFactors": [{"level": "low" | "medium" | "high", "description": "what to watch"}],
  "suggestions": ["small habit or routine worth trying"]
}"#;

/// Free-text reflection analysis. No metrics. Replace: {thoughts}
pub const THOUGHTS_PROMPT_TEMPLATE: &str = r#"Analyze the following free-text reflection written by an employee about their week.

REFLECTION:
{thoughts}

Return a JSON object with this EXACT shape:
{
  "summary": "two or three sentences capturing the main themes",
  "recommendations": ["concrete action the person can take"],
  "patterns": [{"type": "stressor" | "motivator" | "habit", "description": "what you noticed"}],
  "suggestions": ["small habit or routine worth trying"]
}"#;

/// Whole-team analysis. Replace: {metrics_json}, {total}, {records_json}
pub const TEAM_PROMPT_TEMPLATE: &str = r#"Analyze the wellness check-ins of the whole team.

SUMMARY STATISTICS:
{metrics_json}

TOTAL CHECK-INS: {total}

CHECK-INS (oldest first):
{records_json}

Return a JSON object with this EXACT shape:
{
  "summary": "two or three sentences about team wellbeing",
  "recommendations": ["concrete action for the manager"],
  "riskFactors": [{"level": "low" | "medium" | "high", "description": "what to watch"}],
  "positiveHighlights": ["something going well"]
}"#;
