//! Chat prompt asking an LLM to pick activities for a traveller

use crate::catalog::ActivityOption;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct ActivityPrompt {
    pub system: String,
    pub user: String,
}

#[derive(Serialize)]
struct PromptActivity<'a> {
    name: &'a str,
    description: &'a str,
    location: &'a str,
    city: &'a str,
}

impl ActivityPrompt {
    /// System prompt carrying the activity list and the reply format, user
    /// prompt carrying the preferences.
    pub fn for_activities(preferences: &str, activities: &[ActivityOption]) -> Result<Self, serde_json::Error> {
        let listed: Vec<PromptActivity<'_>> = activities
            .iter()
            .map(|a| PromptActivity {
                name: &a.name,
                description: &a.description,
                location: a.city.label(),
                city: a.city.key(),
            })
            .collect();
        let listed = serde_json::to_string_pretty(&listed)?;

        let system = format!(
            r#"You are a travel consultant for Nepal. Recommend activities from the list below that fit the traveller's preferences.

Rules:
1. Reply with a single JSON object and nothing else.
2. Only use activity names exactly as they appear in the list.
3. Recommend between 3 and 8 activities, mixing both cities when it suits the traveller.
4. Give a concrete reason for every pick.

Available activities:
{}

Reply format:
{{
  "recommendations": [
    {{
      "activityName": "exact name from the list",
      "city": "kathmandu or pokhara",
      "matchScore": 95,
      "reasoning": "why this fits the traveller"
    }}
  ],
  "summary": "one or two sentences on the overall plan"
}}"#,
            listed
        );

        let user = format!(
            "Traveller preferences: \"{}\"\n\nPick the activities from the list that best match these interests and travel style (adventure level, social or quiet, culture, relaxation). Reply with the JSON object only.",
            preferences
        );

        Ok(Self { system, user })
    }

    /// Minimal prompt used to check that a provider answers
    pub fn connectivity_check() -> Self {
        Self {
            system: r#"Return only: {"test": "success"}"#.to_string(),
            user: "Test".to_string(),
        }
    }
}
