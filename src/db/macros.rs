/// Returns a cached value when present, otherwise awaits `$block`, queues the
/// result for caching and returns it.
///
/// `$cache` must expose `get_from_cache` and `set_in_background`
/// (see [`crate::db::Cache`]). A cache read failure is logged and treated as a
/// miss so a broken cache never blocks discovery.
///
/// ```rust,ignore
/// let titles = cached!(self.cache, CacheKey::TitleDetail(id), 3600, async move {
///     fetch_detail(id).await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        match $cache.get_from_cache(&key).await {
            Ok(Some(cached)) => Ok(cached),
            other => {
                if let Err(e) = other {
                    tracing::warn!(error = %e, key = %key, "Cache read failed");
                }
                let value = $block.await?;
                $cache.set_in_background(&key, &value, $ttl);
                Ok(value)
            }
        }
    }};
}
