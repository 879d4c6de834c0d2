/// Read-through caching: returns the cached value for `$key`, or awaits
/// `$block`, queues the result for a background write and returns it.
///
/// Expands to an `AppResult`, so `?` on cache reads and on the block
/// propagates from the enclosing function.
///
/// # Arguments
/// * `$cache`: The cache instance to use for retrieval and storage. The cache must have
///   `get_from_cache` and `set_in_background` methods.
/// * `$key`: The key to use for caching the value.
/// * `$ttl`: The time-to-live (TTL) for the cached value in seconds.
/// * `$block`: The block of code to execute if the value is not found in cache.
///
/// # Example
/// ```rust,ignore
/// let forecast: Vec<ForecastSlot> = cached!(cache, CacheKey::Forecast { lat, lon }, FORECAST_CACHE_TTL, async move {
///     fetch_forecast(lat, lon).await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        if let Some(cached) = $cache.get_from_cache(&$key).await? {
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.set_in_background(&$key, &value, $ttl);
            Ok(value)
        }
    }};
}
