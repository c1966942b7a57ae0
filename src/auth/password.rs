use thiserror::Error;
use tokio::task;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Password error: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Password task failed: {0}")]
    Task(#[from] task::JoinError),
}

/// Hashes `plain` with a fresh salt at the given bcrypt cost.
///
/// Runs on the blocking pool so a slow cost does not stall other requests.
pub async fn hash_password(plain: &str, cost: u32) -> Result<String, PasswordError> {
    let plain = plain.to_owned();
    Ok(task::spawn_blocking(move || bcrypt::hash(plain, cost)).await??)
}

/// Returns whether `plain` matches `hash`. A malformed hash never matches.
pub async fn verify_password(plain: &str, hash: &str) -> bool {
    let (plain, hash) = (plain.to_owned(), hash.to_owned());
    match task::spawn_blocking(move || bcrypt::verify(plain, &hash)).await {
        Ok(Ok(matches)) => matches,
        Ok(Err(e)) => {
            tracing::warn!("Stored password hash could not be checked: {}", e);
            false
        }
        Err(e) => {
            tracing::error!("Password check did not complete: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_then_verify() {
        let hash = hash_password("pw123", 4).await.unwrap();
        assert_ne!("pw123", hash);
        assert!(verify_password("pw123", &hash).await);
        assert!(!verify_password("pw124", &hash).await);
        assert!(!verify_password("", &hash).await);
    }

    #[tokio::test]
    async fn hashes_are_salted() {
        let first = hash_password("pw123", 4).await.unwrap();
        let second = hash_password("pw123", 4).await.unwrap();
        assert_ne!(first, second);
        assert!(verify_password("pw123", &first).await);
        assert!(verify_password("pw123", &second).await);
    }

    #[tokio::test]
    async fn malformed_hash_does_not_match() {
        assert!(!verify_password("pw123", "pw123").await);
    }

    #[tokio::test]
    async fn invalid_cost_is_an_error() {
        assert!(matches!(hash_password("pw123", 2).await, Err(PasswordError::Hash(_))));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn hashing_leaves_the_runtime_responsive() {
        let hashing = tokio::spawn(hash_password("pw123", 10));
        // The only runtime thread must stay free while bcrypt works
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        assert!(!hashing.is_finished());
        assert!(hashing.await.unwrap().is_ok());
    }
}
