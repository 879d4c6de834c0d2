use crate::{knowledge::KnowledgeBase, models::Category};

use super::MatchError;

/// Suitability of a category for an event, straight from the event table
pub fn event_match_score(
    knowledge: &KnowledgeBase,
    category: Category,
    event: &str,
) -> Result<f64, MatchError> {
    knowledge
        .event_score(category, event)
        .map_err(|e| MatchError::MissingEventData(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formal_event_prefers_coat_over_hoodie() {
        let kb = KnowledgeBase::embedded().unwrap();
        let coat = event_match_score(&kb, Category::Coat, "formal_event").unwrap();
        let hoodie = event_match_score(&kb, Category::Hoodie, "formal_event").unwrap();
        assert!(coat > hoodie);
    }

    #[test]
    fn test_unknown_event_is_missing_data() {
        let kb = KnowledgeBase::embedded().unwrap();
        let err = event_match_score(&kb, Category::Jeans, "coronation").unwrap_err();
        assert_eq!(
            err,
            MatchError::MissingEventData(
                "Path 'jeans.event.coronation' is invalid: key 'coronation' not found".to_string()
            )
        );
    }
}
