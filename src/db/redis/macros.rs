/// A macro to simplify get-or-fetch caching.
///
/// Returns the cached value when present. Otherwise awaits `$block`, stores its
/// successful result in the cache and returns it. Errors from `$block` are
/// propagated with `?` and never cached. A failing cache read is logged and
/// treated as a miss.
///
/// # Arguments
/// * `$cache`: The cache instance. It must have `get_from_cache` and
///   `set_in_background` methods.
/// * `$key`: The key to use for caching the value.
/// * `$block`: The future to await if the value is not found in cache.
///
/// # Example
/// ```rust,ignore
/// let details = cached!(self.cache, CacheKey::MovieDetails(id), async move {
///     self.fetch_remote(id).await
/// });
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $block:expr) => {{
        match $cache.get_from_cache(&$key).await {
            Ok(Some(cached)) => {
                tracing::debug!(key = %$key, "Cache hit");
                Ok(cached)
            }
            outcome => {
                if let Err(e) = outcome {
                    tracing::warn!(error = %e, key = %$key, "Cache read failed, treating as miss");
                }
                let value = $block.await?;
                $cache.set_in_background(&$key, &value);
                Ok(value)
            }
        }
    }};
}
