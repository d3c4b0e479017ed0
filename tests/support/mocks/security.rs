// tests/support/mocks/security.rs
use academy_core::application::{
    ApplicationResult,
    ports::{PasswordHasherPort, security::PasswordHasher},
};
use academy_core::domain::errors::AccessError;
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// 決定論的なパスワードハッシャー。`hash::{password}` を返し、照合は完全一致。
#[derive(Clone, Debug, Default)]
pub struct StrictPasswordHasher;

#[async_trait]
impl PasswordHasher for StrictPasswordHasher {
    async fn hash(&self, password: &str) -> ApplicationResult<String> {
        Ok(format!("hash::{password}"))
    }

    async fn verify(&self, password: &str, expected_hash: &str) -> ApplicationResult<()> {
        if expected_hash == format!("hash::{password}") {
            Ok(())
        } else {
            Err(AccessError::InvalidCredentials.into())
        }
    }
}

/// Wraps another hasher and counts how often each operation runs.
pub struct CountingPasswordHasher {
    inner: Arc<PasswordHasherPort>,
    hashes: AtomicU32,
    verifies: AtomicU32,
}

impl CountingPasswordHasher {
    pub fn new(inner: Arc<PasswordHasherPort>) -> Self {
        Self {
            inner,
            hashes: AtomicU32::new(0),
            verifies: AtomicU32::new(0),
        }
    }

    pub fn hashes(&self) -> u32 {
        self.hashes.load(Ordering::SeqCst)
    }

    pub fn verifies(&self) -> u32 {
        self.verifies.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PasswordHasher for CountingPasswordHasher {
    async fn hash(&self, password: &str) -> ApplicationResult<String> {
        self.hashes.fetch_add(1, Ordering::SeqCst);
        self.inner.hash(password).await
    }

    async fn verify(&self, password: &str, expected_hash: &str) -> ApplicationResult<()> {
        self.verifies.fetch_add(1, Ordering::SeqCst);
        self.inner.verify(password, expected_hash).await
    }
}
