// Instruction templates for agent invocations
//
// This module contains the natural-language instructions sent to each agent.
// Templates are versioned so replies can be traced back to the wording used.

use std::collections::HashMap;

use crate::domain::team::TeamMember;

/// Prompt template structure
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    pub name: String,
    pub version: String,
    pub user_template: String,
}

impl PromptTemplate {
    /// Render the template, replacing each `{{key}}` with its value
    ///
    /// Substitution is a single left-to-right pass over the template, so
    /// placeholder text inside a value is never expanded. Placeholders
    /// without a value are left in place.
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use pulse_api::agents::prompts::library;
    ///
    /// let mut vars = HashMap::new();
    /// vars.insert("members", "Alice, Bob".to_string());
    /// vars.insert("period", "2026-10-12 to 2026-10-18".to_string());
    /// let text = library::coordinator().render(&vars);
    /// assert!(text.contains("Team members: Alice, Bob."));
    /// ```
    pub fn render(&self, variables: &HashMap<&str, String>) -> String {
        let mut output = String::with_capacity(self.user_template.len());
        let mut rest = self.user_template.as_str();

        while let Some(start) = rest.find("{{") {
            output.push_str(&rest[..start]);
            let after_open = &rest[start + 2..];

            match after_open.find("}}") {
                Some(end) => {
                    let key = &after_open[..end];
                    match variables.get(key) {
                        Some(value) => output.push_str(value),
                        None => {
                            output.push_str("{{");
                            output.push_str(key);
                            output.push_str("}}");
                        }
                    }
                    rest = &after_open[end + 2..];
                }
                None => {
                    output.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        output.push_str(rest);
        output
    }
}

/// Comma-separated member names
pub fn member_names(members: &[TeamMember]) -> String {
    members
        .iter()
        .map(|m| m.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Comma-separated `Name (@handle)` pairs
pub fn member_handles(members: &[TeamMember]) -> String {
    members
        .iter()
        .map(|m| format!("{} ({})", m.name(), m.slack_id()))
        .collect::<Vec<_>>()
        .join(", ")
}

pub mod library {
    use super::PromptTemplate;

    pub fn coordinator() -> PromptTemplate {
        PromptTemplate {
            name: "coordinator".to_string(),
            version: "1.0.0".to_string(),
            user_template: "Weekly marketing intelligence workflow trigger for {{period}}. \
                            Team members: {{members}}. \
                            Validate data collection, coordinate with communication agent, \
                            then prepare for aggregation."
                .to_string(),
        }
    }

    pub fn communication() -> PromptTemplate {
        PromptTemplate {
            name: "communication".to_string(),
            version: "1.0.0".to_string(),
            user_template: "Send personalized Slack messages to the following team members \
                            requesting their weekly metrics for {{period}} \
                            (MQLs, campaigns, engagement rate): {{members}}. \
                            Confirm delivery and log communication details."
                .to_string(),
        }
    }

    pub fn aggregation() -> PromptTemplate {
        PromptTemplate {
            name: "aggregation".to_string(),
            version: "1.0.0".to_string(),
            user_template: "Fetch and aggregate Slack replies from team members for {{period}}. \
                            Extract MQLs, campaign counts, and engagement rates. \
                            Validate data quality, normalize formats, and compile a structured \
                            dataset with team totals and individual rankings. Team: {{members}}"
                .to_string(),
        }
    }

    pub fn dashboard() -> PromptTemplate {
        PromptTemplate {
            name: "dashboard".to_string(),
            version: "1.0.0".to_string(),
            user_template: "Generate a weekly marketing intelligence summary for {{period}} \
                            from the following team metrics. Respond in JSON with a headline, \
                            highlights, and recommendations.\n\nMetrics: {{metrics}}"
                .to_string(),
        }
    }
}
