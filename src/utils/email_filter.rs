use anyhow::{Result, anyhow};
use autoscale_cuckoo_filter::CuckooFilter;
use futures_util::StreamExt;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::sync::{PoisonError, RwLock};
use tracing::{debug, info, instrument};

/// Expected capacity and false-positive rate.
const FILTER_CAPACITY: usize = 100_000;
const FALSE_POSITIVE_RATE: f64 = 0.001;

static EMAIL_FILTER: Lazy<RwLock<CuckooFilter<String>>> =
    Lazy::new(|| RwLock::new(CuckooFilter::new(FILTER_CAPACITY, FALSE_POSITIVE_RATE)));

#[inline]
pub fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Check if an email might be registered (false positives possible)
pub fn might_exist(email: &str) -> bool {
    let email = normalize(email);
    EMAIL_FILTER
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .contains(&email)
}

/// Insert a single email into the filter
pub fn insert(email: &str) {
    let email = normalize(email);
    EMAIL_FILTER
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .add(&email);
}

/// Remove an email from the filter
pub fn remove(email: &str) {
    let email = normalize(email);
    EMAIL_FILTER
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .remove(&email);
}

/// Add already-normalized emails under a single write lock; returns how many were added.
fn seed<'a>(emails: impl IntoIterator<Item = &'a str>) -> usize {
    let mut filter = EMAIL_FILTER.write().unwrap_or_else(PoisonError::into_inner);
    emails.into_iter().fold(0, |added, email| {
        filter.add(email);
        added + 1
    })
}

/// Load every registered email into the filter, `batch_size` rows per lock.
#[instrument(skip(pool))]
pub async fn warmup_email_filter(pool: &MySqlPool, batch_size: usize) -> Result<()> {
    let mut batches = sqlx::query_scalar::<_, String>("SELECT email FROM employees")
        .fetch(pool)
        .chunks(batch_size.max(1));

    let mut total = 0usize;
    while let Some(rows) = batches.next().await {
        let emails = rows
            .into_iter()
            .map(|row| row.map(|email| normalize(&email)))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow!("DB row fetch failed: {}", e))?;

        total += seed(emails.iter().map(String::as_str));
        debug!(loaded = total, "Email filter batch loaded");
    }

    info!(employees = total, "Email filter warmup complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inserted_email_is_found_case_insensitively() {
        insert("Filter.Test@Company.com");
        assert!(might_exist("filter.test@company.com"));
        assert!(might_exist("  FILTER.TEST@COMPANY.COM "));

        remove("filter.test@company.com");
        assert!(!might_exist("filter.test@company.com"));
    }

    #[test]
    fn seeded_batch_is_counted_and_visible() {
        let added = seed(["seed.one@company.com", "seed.two@company.com"]);

        assert_eq!(added, 2);
        assert!(might_exist("Seed.One@Company.com"));
        assert!(might_exist("seed.two@company.com"));
    }
}
