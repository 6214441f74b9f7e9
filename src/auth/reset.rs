// One-time password-reset code ledger
//
// Codes live in process memory only and are lost on restart; clients simply
// request a new one. Entries are keyed by the code value itself.

use chrono::Utc;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Validity window for a reset code: 1 hour from issuance, no extension.
const RESET_CODE_TTL_MS: i64 = 3_600_000;

/// A single issued reset code
#[derive(Debug, Clone)]
pub struct ResetCodeEntry {
    pub email: String,
    pub code: String,
    pub created_at_millis: i64,
}

impl ResetCodeEntry {
    fn is_expired(&self, now_millis: i64) -> bool {
        now_millis - self.created_at_millis > RESET_CODE_TTL_MS
    }

    fn is_valid_for(&self, email: &str, now_millis: i64) -> bool {
        self.email == email && !self.is_expired(now_millis)
    }
}

/// Shared ledger of active reset codes
///
/// Cloning yields a handle to the same underlying map, so the ledger can be
/// stored in application state and shared across request tasks. A code is
/// `active` until it is consumed (removed) or expires (removed by the sweep
/// in `issue`, or rejected on lookup); it is never reusable after either.
#[derive(Clone, Default)]
pub struct ResetCodeLedger {
    entries: Arc<RwLock<HashMap<String, ResetCodeEntry>>>,
}

impl ResetCodeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a 6-digit code for the given email and store it.
    ///
    /// Expired entries are swept before the new code is stored. Two codes
    /// colliding on the same 6-digit value overwrite each other; with a
    /// one-hour window over a million keys that is an accepted tradeoff.
    pub async fn issue(&self, email: &str) -> String {
        let code = format!("{:06}", rand::thread_rng().gen_range(0..1_000_000));
        let now = Utc::now().timestamp_millis();

        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| !entry.is_expired(now));
        entries.insert(
            code.clone(),
            ResetCodeEntry {
                email: email.to_string(),
                code: code.clone(),
                created_at_millis: now,
            },
        );

        tracing::debug!("Issued reset code for {} ({} active)", email, entries.len());
        code
    }

    /// Check whether a code is active and bound to the given email.
    /// Never mutates the ledger.
    pub async fn verify(&self, email: &str, code: &str) -> bool {
        let now = Utc::now().timestamp_millis();
        let entries = self.entries.read().await;
        entries
            .get(code)
            .map(|entry| entry.is_valid_for(email, now))
            .unwrap_or(false)
    }

    /// Consume a code: re-run the verify check and, on success, remove the
    /// entry under the same write guard so the code is usable exactly once.
    ///
    /// Returns the removed entry, or None when the code is unknown, bound to
    /// a different email, or expired — in which case the ledger is untouched.
    pub async fn consume(&self, email: &str, code: &str) -> Option<ResetCodeEntry> {
        let now = Utc::now().timestamp_millis();
        let mut entries = self.entries.write().await;
        let valid = entries
            .get(code)
            .map(|entry| entry.is_valid_for(email, now))
            .unwrap_or(false);

        if valid {
            entries.remove(code)
        } else {
            None
        }
    }

    #[cfg(test)]
    async fn insert_entry(&self, entry: ResetCodeEntry) {
        self.entries
            .write()
            .await
            .insert(entry.code.clone(), entry);
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expired_entry(email: &str, code: &str) -> ResetCodeEntry {
        ResetCodeEntry {
            email: email.to_string(),
            code: code.to_string(),
            // Issued just past the window
            created_at_millis: Utc::now().timestamp_millis() - RESET_CODE_TTL_MS - 1,
        }
    }

    #[tokio::test]
    async fn test_issued_code_is_six_zero_padded_digits() {
        let ledger = ResetCodeLedger::new();
        let code = ledger.issue("a@x.com").await;

        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn test_issue_verify_consume_round_trip() {
        let ledger = ResetCodeLedger::new();
        let code = ledger.issue("a@x.com").await;

        assert!(ledger.verify("a@x.com", &code).await);

        let entry = ledger.consume("a@x.com", &code).await;
        assert!(entry.is_some());
        assert_eq!(entry.unwrap().email, "a@x.com");

        // Single use: both verify and consume fail afterwards
        assert!(!ledger.verify("a@x.com", &code).await);
        assert!(ledger.consume("a@x.com", &code).await.is_none());
    }

    #[tokio::test]
    async fn test_verify_does_not_mutate() {
        let ledger = ResetCodeLedger::new();
        let code = ledger.issue("a@x.com").await;

        assert!(ledger.verify("a@x.com", &code).await);
        assert!(ledger.verify("a@x.com", &code).await);
        assert_eq!(ledger.len().await, 1);
    }

    #[tokio::test]
    async fn test_email_must_match_exactly() {
        let ledger = ResetCodeLedger::new();
        let code = ledger.issue("a@x.com").await;

        assert!(!ledger.verify("b@x.com", &code).await);
        assert!(!ledger.verify("A@x.com", &code).await);
        assert!(ledger.consume("b@x.com", &code).await.is_none());

        // A failed consume leaves the entry in place
        assert!(ledger.verify("a@x.com", &code).await);
    }

    #[tokio::test]
    async fn test_unknown_code_is_invalid() {
        let ledger = ResetCodeLedger::new();
        ledger.issue("a@x.com").await;

        assert!(!ledger.verify("a@x.com", "000000").await);
        assert!(ledger.consume("a@x.com", "000000").await.is_none());
    }

    #[tokio::test]
    async fn test_expired_code_fails_verify_and_consume() {
        let ledger = ResetCodeLedger::new();
        ledger.insert_entry(expired_entry("a@x.com", "123456")).await;

        assert!(!ledger.verify("a@x.com", "123456").await);
        assert!(ledger.consume("a@x.com", "123456").await.is_none());
    }

    #[tokio::test]
    async fn test_code_valid_just_inside_window() {
        let ledger = ResetCodeLedger::new();
        ledger
            .insert_entry(ResetCodeEntry {
                email: "a@x.com".to_string(),
                code: "654321".to_string(),
                created_at_millis: Utc::now().timestamp_millis() - RESET_CODE_TTL_MS + 1_000,
            })
            .await;

        assert!(ledger.verify("a@x.com", "654321").await);
    }

    #[tokio::test]
    async fn test_issue_sweeps_expired_entries() {
        let ledger = ResetCodeLedger::new();
        ledger.insert_entry(expired_entry("old@x.com", "111111")).await;
        ledger.insert_entry(expired_entry("old@x.com", "222222")).await;

        ledger.issue("new@x.com").await;

        // Only the freshly issued code remains
        assert_eq!(ledger.len().await, 1);
        assert!(!ledger.verify("old@x.com", "111111").await);
        assert!(!ledger.verify("old@x.com", "222222").await);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let ledger = ResetCodeLedger::new();
        let handle = ledger.clone();

        let code = ledger.issue("a@x.com").await;
        assert!(handle.verify("a@x.com", &code).await);

        handle.consume("a@x.com", &code).await.unwrap();
        assert!(!ledger.verify("a@x.com", &code).await);
    }

    #[tokio::test]
    async fn test_concurrent_consume_hands_out_entry_once() {
        let ledger = ResetCodeLedger::new();
        let code = ledger.issue("a@x.com").await;

        let mut handles = Vec::new();
        for _ in 0..8 {
            let ledger = ledger.clone();
            let code = code.clone();
            handles.push(tokio::spawn(async move {
                ledger.consume("a@x.com", &code).await.is_some()
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }
}
