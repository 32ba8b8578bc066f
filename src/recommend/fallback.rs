//! Keyword matching used when no LLM provider answers

use super::{Recommendation, RecommendationResult, RecommendationSource};
use crate::catalog::ActivityOption;
use std::cmp::Ordering;
use tracing::{debug, info};

pub const FALLBACK_SUMMARY: &str = "Keyword-based recommendations (AI service unavailable)";

/// Maximum number of activities returned
pub const MAX_RECOMMENDATIONS: usize = 6;

const CATEGORY_KEYWORDS: [(&str, &[&str]); 5] = [
    (
        "adventure",
        &["adventure", "exciting", "thrill", "extreme", "adrenaline", "flying", "paragliding", "bungee"],
    ),
    ("relaxing", &["quiet", "peaceful", "relax", "calm", "tranquil", "spa", "massage"]),
    (
        "cultural",
        &["culture", "traditional", "heritage", "temple", "history", "spiritual", "meditation"],
    ),
    ("nature", &["nature", "outdoor", "hiking", "trekking", "lake", "mountain", "scenic"]),
    ("social", &["social", "group", "people", "party", "nightlife", "shopping", "market"]),
];

const CATEGORY_POINTS: u32 = 20;
const WORD_POINTS: u32 = 10;
const MAX_SCORE: u32 = 100;

/// Score every activity against the free-text preferences.
///
/// A category keyword found in both the preferences and the activity's name
/// or description scores 20; every preference word longer than three
/// characters found in the activity text scores 10. Scores cap at 100 and
/// only the six best activities are kept.
pub fn keyword_recommendations(preferences: &str, activities: &[ActivityOption]) -> RecommendationResult {
    info!(activities = activities.len(), "Using keyword-based recommendations");

    let preferences = preferences.to_lowercase();
    let general_words: Vec<&str> = preferences
        .split(' ')
        .filter(|word| word.chars().count() > 3)
        .collect();

    let mut recommendations: Vec<Recommendation> = activities
        .iter()
        .filter_map(|activity| score_activity(&preferences, &general_words, activity))
        .collect();

    recommendations.sort_by(|a, b| {
        b.match_score
            .partial_cmp(&a.match_score)
            .unwrap_or(Ordering::Equal)
    });
    recommendations.truncate(MAX_RECOMMENDATIONS);

    debug!(matched = recommendations.len(), "Keyword scoring completed");

    RecommendationResult {
        recommendations,
        summary: FALLBACK_SUMMARY.to_string(),
        source: RecommendationSource::Keywords,
    }
}

fn score_activity(preferences: &str, general_words: &[&str], activity: &ActivityOption) -> Option<Recommendation> {
    let text = format!("{} {}", activity.name, activity.description).to_lowercase();

    let mut score = 0;
    let mut matched_categories = Vec::new();

    for (category, keywords) in CATEGORY_KEYWORDS {
        let matches = keywords
            .iter()
            .filter(|keyword| preferences.contains(*keyword) && text.contains(*keyword))
            .count() as u32;

        if matches > 0 {
            score += matches * CATEGORY_POINTS;
            matched_categories.push(category);
        }
    }

    // Repeated words count every time
    score += general_words
        .iter()
        .filter(|word| text.contains(*word))
        .count() as u32
        * WORD_POINTS;

    if score == 0 {
        return None;
    }

    let reasoning = if matched_categories.is_empty() {
        "Matches words from your preferences".to_string()
    } else {
        format!("Matches your preferences for {} activities", matched_categories.join(", "))
    };

    Some(Recommendation {
        activity_name: activity.name.clone(),
        city: activity.city.key().to_string(),
        match_score: f64::from(score.min(MAX_SCORE)),
        reasoning,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::Destination;

    fn activity(id: u32, name: &str, description: &str) -> ActivityOption {
        ActivityOption {
            id,
            name: name.to_string(),
            price: 10,
            description: description.to_string(),
            city: Destination::Kathmandu,
        }
    }

    #[test]
    fn test_adventure_preferences() {
        let catalog = Catalog::builtin();
        let result = keyword_recommendations("I love adventure and paragliding", &catalog.all_activities());

        assert_eq!(result.source, RecommendationSource::Keywords);
        assert_eq!(result.summary, FALLBACK_SUMMARY);
        assert_eq!(result.recommendations.len(), 2);

        let top = &result.recommendations[0];
        assert_eq!(top.activity_name, "Paragliding");
        assert_eq!(top.city, "pokhara");
        assert_eq!(top.match_score, 60.0);
        assert_eq!(top.reasoning, "Matches your preferences for adventure activities");

        assert_eq!(result.recommendations[1].activity_name, "Sarangkot");
        assert_eq!(result.recommendations[1].match_score, 30.0);
    }

    #[test]
    fn test_score_is_capped() {
        let catalog = Catalog::builtin();
        let result = keyword_recommendations(
            "adventure thrill adrenaline flying paragliding lake mountain scenic",
            &catalog.all_activities(),
        );
        let top = &result.recommendations[0];
        assert_eq!(top.activity_name, "Paragliding");
        assert_eq!(top.match_score, 100.0);
        assert_eq!(top.reasoning, "Matches your preferences for adventure, nature activities");
    }

    #[test]
    fn test_no_matches() {
        let catalog = Catalog::builtin();
        let result = keyword_recommendations("xyz", &catalog.all_activities());
        assert!(result.recommendations.is_empty());
    }

    #[test]
    fn test_short_words_are_ignored() {
        let activities = vec![activity(1, "The Bat", "The bat flies at dusk")];
        assert!(keyword_recommendations("the bat", &activities).recommendations.is_empty());

        let result = keyword_recommendations("caves", &[activity(1, "Caves", "Many caves")]);
        assert_eq!(result.recommendations[0].match_score, 10.0);
        assert_eq!(result.recommendations[0].reasoning, "Matches words from your preferences");
    }

    #[test]
    fn test_case_insensitive_matching() {
        let activities = vec![activity(1, "Old Town", "Heritage walk through HISTORY")];
        let result = keyword_recommendations("Heritage and History", &activities);
        // two cultural keywords plus two general words
        assert_eq!(result.recommendations[0].match_score, 60.0);
    }

    #[test]
    fn test_top_six_sorted_and_stable() {
        let activities: Vec<ActivityOption> = (1..=8)
            .map(|id| {
                let description = if id == 5 { "market market shopping" } else { "market" };
                activity(id, &format!("Stop {}", id), description)
            })
            .collect();

        let result = keyword_recommendations("market shopping", &activities);
        assert_eq!(result.recommendations.len(), MAX_RECOMMENDATIONS);
        assert_eq!(result.recommendations[0].activity_name, "Stop 5");

        // Equal scores keep catalog order
        let rest: Vec<&str> = result.recommendations[1..]
            .iter()
            .map(|r| r.activity_name.as_str())
            .collect();
        assert_eq!(rest, vec!["Stop 1", "Stop 2", "Stop 3", "Stop 4", "Stop 6"]);
    }
}
