use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::models::{ClothingItem, MatchResult, WardrobeSlot};

use super::{strategy::EvaluationContext, MatchError};

/// Scores every item concurrently, at most `pool_size` at a time.
///
/// Results come back in wardrobe order. A task that fails (panics) yields a
/// result without a final match carrying the failure as an error string, so
/// one bad item never sinks the batch.
pub async fn evaluate_wardrobe(
    items: &[ClothingItem],
    context: Arc<EvaluationContext>,
    pool_size: usize,
) -> Vec<MatchResult> {
    let permits = Arc::new(Semaphore::new(pool_size.max(1)));
    let mut tasks = Vec::with_capacity(items.len());

    for item in items {
        let context = Arc::clone(&context);
        let permits = Arc::clone(&permits);
        let task_item = item.clone();
        let task = tokio::spawn(async move {
            let _permit = permits.acquire_owned().await.ok();
            context.evaluate_item(&task_item)
        });
        tasks.push((item, task));
    }

    let mut results = Vec::with_capacity(tasks.len());
    let mut failures = 0usize;

    for (item, task) in tasks {
        match task.await {
            Ok(result) => results.push(result),
            Err(e) => {
                tracing::error!(item_id = item.id, error = %e, "Item evaluation task failed");
                failures += 1;
                results.push(failed_result(&context, item, MatchError::Evaluation(e.to_string())));
            }
        }
    }

    if failures > 0 {
        tracing::warn!(
            success_count = results.len() - failures,
            error_count = failures,
            "Partial item evaluation failure"
        );
    }

    tracing::debug!(
        evaluated = results.len(),
        palette = ?context.palette,
        "Wardrobe evaluated"
    );

    results
}

fn failed_result(context: &EvaluationContext, item: &ClothingItem, error: MatchError) -> MatchResult {
    MatchResult {
        item_id: item.id,
        item_name: item.name.clone(),
        category: item.category,
        image_ref: context.image_ref(item),
        is_favorite: item.is_favorite,
        final_match: None,
        group: WardrobeSlot::Unknown,
        errors: vec![error.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::KnowledgeBase;
    use crate::models::{Category, MatchKind, Season, WeatherSnapshot};

    fn wardrobe(count: i64) -> Vec<ClothingItem> {
        let categories = [Category::Tshirt, Category::Jeans, Category::Sneakers, Category::Coat];
        (0..count)
            .map(|id| ClothingItem {
                id,
                name: format!("item-{}", id),
                filename: format!("{}.png", id),
                category: categories[id as usize % categories.len()],
                season: Season::Spring,
                red: Some(200),
                green: Some(50),
                blue: Some(50),
                is_favorite: id % 2 == 0,
            })
            .collect()
    }

    fn context() -> Arc<EvaluationContext> {
        Arc::new(EvaluationContext {
            knowledge: Arc::new(KnowledgeBase::embedded().unwrap()),
            weather: Some(WeatherSnapshot {
                temperature: 14.0,
                condition: "scattered clouds".to_string(),
                icon: "03d".to_string(),
                condition_code: 802,
            }),
            target_color: None,
            palette: None,
            event: Some("casual_walk".to_string()),
            include_favorites: false,
            image_base_url: "http://img".to_string(),
        })
    }

    #[tokio::test]
    async fn test_every_item_scored_in_order() {
        let items = wardrobe(25);
        let results = evaluate_wardrobe(&items, context(), 4).await;

        assert_eq!(results.len(), 25);
        for (item, result) in items.iter().zip(&results) {
            assert_eq!(item.id, result.item_id);
            assert_eq!(
                result.final_match.unwrap().kind,
                MatchKind::WeatherEventMatch
            );
        }
    }

    #[tokio::test]
    async fn test_parallel_matches_sequential() {
        let items = wardrobe(12);
        let ctx = context();
        let sequential: Vec<MatchResult> = items.iter().map(|i| ctx.evaluate_item(i)).collect();
        let parallel = evaluate_wardrobe(&items, ctx, 3).await;
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_empty_wardrobe_and_zero_pool_size() {
        let results = tokio_test::block_on(evaluate_wardrobe(&[], context(), 0));
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_zero_pool_size_still_makes_progress() {
        let items = wardrobe(3);
        let results = evaluate_wardrobe(&items, context(), 0).await;
        assert_eq!(results.len(), 3);
    }
}
