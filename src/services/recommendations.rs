use rand::{rngs::StdRng, SeedableRng};
use std::sync::Arc;
use std::time::Instant;

use crate::{
    error::AppResult,
    knowledge::KnowledgeBase,
    models::{
        palette_label, RecommendationContext, RecommendationRequest, RecommendationResponse,
        WeatherSnapshot,
    },
};

use super::{
    evaluator::evaluate_wardrobe,
    outfits::{assemble_outfits, sort_outfits, AccessoryPicker, RngPicker},
    providers::WeatherProvider,
    strategy::EvaluationContext,
    wardrobe::WardrobeStore,
};

pub const NO_ITEMS_DETAIL: &str = "No clothing items found for user.";
pub const SUCCESS_DETAIL: &str = "Recommendations computed successfully for each palette type.";
pub const NO_OUTFITS_DETAIL: &str = "No outfits could be assembled from the wardrobe.";

/// Builds ranked outfit recommendations for a user's wardrobe
pub struct RecommendationService {
    knowledge: Arc<KnowledgeBase>,
    wardrobe: Arc<dyn WardrobeStore>,
    weather: Arc<dyn WeatherProvider>,
    image_base_url: String,
    worker_pool_size: usize,
}

impl RecommendationService {
    pub fn new(
        knowledge: Arc<KnowledgeBase>,
        wardrobe: Arc<dyn WardrobeStore>,
        weather: Arc<dyn WeatherProvider>,
        image_base_url: String,
        worker_pool_size: usize,
    ) -> Self {
        Self {
            knowledge,
            wardrobe,
            weather,
            image_base_url,
            worker_pool_size,
        }
    }

    /// Recommends outfits, breaking accessory ties at random
    pub async fn recommend(
        &self,
        user_id: i64,
        request: RecommendationRequest,
    ) -> AppResult<RecommendationResponse> {
        let mut picker = RngPicker(StdRng::from_entropy());
        self.recommend_with(user_id, request, &mut picker).await
    }

    /// Recommends outfits using the given accessory picker.
    ///
    /// Invalid palettes or times fail the request before any lookups. A
    /// weather failure only drops the weather dimension.
    pub async fn recommend_with(
        &self,
        user_id: i64,
        request: RecommendationRequest,
        picker: &mut (dyn AccessoryPicker + Send),
    ) -> AppResult<RecommendationResponse> {
        let start = Instant::now();
        let context = RecommendationContext::try_from(request)?;

        tracing::info!(
            user_id,
            palettes = context.palette_types.len(),
            event = ?context.event,
            has_color = context.target_color.is_some(),
            has_weather_query = context.weather_query().is_some(),
            "Starting recommendation"
        );

        let items = self.wardrobe.items_for_user(user_id).await?;
        if items.is_empty() {
            tracing::info!(user_id, "Wardrobe is empty");
            return Ok(RecommendationResponse {
                detail: NO_ITEMS_DETAIL.to_string(),
                weather: None,
                outfits: vec![],
            });
        }

        let weather = self.current_weather(&context).await;

        let mut outfits = Vec::new();
        for palette in &context.palette_types {
            let evaluation = Arc::new(EvaluationContext {
                knowledge: Arc::clone(&self.knowledge),
                weather: weather.clone(),
                target_color: context.target_color,
                palette: *palette,
                event: context.event.clone(),
                include_favorites: context.include_favorites,
                image_base_url: self.image_base_url.clone(),
            });

            let results = evaluate_wardrobe(&items, evaluation, self.worker_pool_size).await;
            let assembled = assemble_outfits(results, &self.knowledge, *palette, &mut *picker);

            tracing::debug!(
                palette = palette_label(*palette),
                outfits = assembled.len(),
                "Palette pass finished"
            );

            outfits.extend(assembled);
        }

        sort_outfits(&mut outfits);

        let detail = if outfits.is_empty() {
            NO_OUTFITS_DETAIL
        } else {
            SUCCESS_DETAIL
        };

        tracing::info!(
            user_id,
            items = items.len(),
            outfits = outfits.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Recommendation completed"
        );

        Ok(RecommendationResponse {
            detail: detail.to_string(),
            weather,
            outfits,
        })
    }

    /// Fetched once per request; any failure disables the weather dimension
    async fn current_weather(&self, context: &RecommendationContext) -> Option<WeatherSnapshot> {
        let (location, target_time) = context.weather_query()?;

        match self
            .weather
            .forecast_at(location.lat, location.lon, target_time)
            .await
        {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::warn!(
                    provider = self.weather.name(),
                    error = %e,
                    "Weather lookup failed, scoring without weather"
                );
                None
            }
        }
    }
}
