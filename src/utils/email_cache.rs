use moka::future::Cache;
use once_cell::sync::Lazy;
use std::time::Duration;

use crate::utils::email_filter::normalize;

/// true => email is TAKEN. Only taken emails are stored.
pub static EMAIL_CACHE: Lazy<Cache<String, bool>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(100_000)
        .time_to_live(Duration::from_secs(86400)) // 24h TTL
        .build()
});

/// Mark a single email as taken
pub async fn mark_taken(email: &str) {
    EMAIL_CACHE.insert(normalize(email), true).await;
}

/// Forget an email, e.g. after its employee is deleted or renamed
pub async fn release(email: &str) {
    EMAIL_CACHE.invalidate(&normalize(email)).await;
}

/// Check if email is taken
pub async fn is_taken(email: &str) -> bool {
    EMAIL_CACHE.get(&normalize(email)).await.unwrap_or(false)
}
