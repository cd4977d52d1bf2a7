//! Credential/model rotation ring.
//!
//! Strict round-robin over the credential pool bounds how often any single
//! credential is hit, and with it the rate-limit exposure of each token. The
//! model pick is uniform random with no history: variety, not fairness.

use rand::Rng;

use sage_types::{CredentialKey, ModelId};

/// Empty pools are rejected at construction: the cursors are maintained with
/// modular arithmetic, and a zero-length pool has no valid cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    #[error("credential pool is empty")]
    EmptyCredentials,
    #[error("model pool is empty")]
    EmptyModels,
}

/// Paired credential/model selection state, advanced once per completed
/// dispatch attempt.
///
/// The pools are fixed at construction; only the cursors move. Unset
/// credential slots stay in the pool: they fail on their turn as a transport
/// error and rotation moves past them on the next advance.
#[derive(Debug)]
pub struct RotationRing {
    credentials: Vec<CredentialKey>,
    models: Vec<ModelId>,
    credential_cursor: usize,
    model_cursor: usize,
}

impl RotationRing {
    pub fn new(credentials: Vec<CredentialKey>, models: Vec<ModelId>) -> Result<Self, PoolError> {
        if credentials.is_empty() {
            return Err(PoolError::EmptyCredentials);
        }
        if models.is_empty() {
            return Err(PoolError::EmptyModels);
        }
        Ok(Self {
            credentials,
            models,
            credential_cursor: 0,
            model_cursor: 0,
        })
    }

    /// The pair for the attempt about to be made, before any advance.
    #[must_use]
    pub fn current(&self) -> (CredentialKey, ModelId) {
        (
            self.credentials[self.credential_cursor].clone(),
            self.models[self.model_cursor].clone(),
        )
    }

    /// Advance after a completed attempt, success and failure alike: next
    /// credential in round-robin order, fresh uniform-random model.
    pub fn advance(&mut self) {
        self.credential_cursor = (self.credential_cursor + 1) % self.credentials.len();
        self.model_cursor = rand::rng().random_range(0..self.models.len());
    }

    #[must_use]
    pub const fn credential_cursor(&self) -> usize {
        self.credential_cursor
    }

    #[must_use]
    pub const fn model_cursor(&self) -> usize {
        self.model_cursor
    }

    #[must_use]
    pub fn credential_count(&self) -> usize {
        self.credentials.len()
    }

    #[must_use]
    pub fn model_count(&self) -> usize {
        self.models.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{PoolError, RotationRing};
    use sage_types::{CredentialKey, ModelId};

    fn credentials(n: usize) -> Vec<CredentialKey> {
        (0..n).map(|i| CredentialKey::new(format!("key-{i}"))).collect()
    }

    fn models(n: usize) -> Vec<ModelId> {
        (0..n).map(|i| ModelId::new(format!("model-{i}"))).collect()
    }

    #[test]
    fn starts_at_first_credential() {
        let ring = RotationRing::new(credentials(3), models(4)).unwrap();
        let (credential, _model) = ring.current();
        assert_eq!(credential, CredentialKey::new("key-0"));
        assert_eq!(ring.credential_cursor(), 0);
        assert_eq!(ring.model_cursor(), 0);
    }

    #[test]
    fn round_robin_visits_every_credential_exactly_once_per_window() {
        let mut ring = RotationRing::new(credentials(5), models(3)).unwrap();

        for _window in 0..4 {
            let mut seen = [0usize; 5];
            for _ in 0..5 {
                seen[ring.credential_cursor()] += 1;
                ring.advance();
            }
            assert_eq!(seen, [1, 1, 1, 1, 1]);
        }
    }

    #[test]
    fn model_cursor_stays_in_range() {
        let mut ring = RotationRing::new(credentials(2), models(9)).unwrap();
        for _ in 0..200 {
            ring.advance();
            assert!(ring.model_cursor() < ring.model_count());
        }
    }

    #[test]
    fn single_model_pool_is_a_fixed_point() {
        let mut ring = RotationRing::new(credentials(3), models(1)).unwrap();
        for _ in 0..10 {
            ring.advance();
            assert_eq!(ring.model_cursor(), 0);
        }
    }

    #[test]
    fn unset_slots_are_kept_in_rotation() {
        let pool = vec![
            CredentialKey::new("key-0"),
            CredentialKey::new(""),
            CredentialKey::new("key-2"),
        ];
        let mut ring = RotationRing::new(pool, models(1)).unwrap();

        ring.advance();
        let (credential, _model) = ring.current();
        assert!(credential.is_unset());

        ring.advance();
        let (credential, _model) = ring.current();
        assert_eq!(credential, CredentialKey::new("key-2"));
    }

    #[test]
    fn empty_pools_are_rejected() {
        assert_eq!(
            RotationRing::new(Vec::new(), models(1)).unwrap_err(),
            PoolError::EmptyCredentials
        );
        assert_eq!(
            RotationRing::new(credentials(1), Vec::new()).unwrap_err(),
            PoolError::EmptyModels
        );
    }
}
