// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

#[cfg(test)]
mod tests {
    use crate::domain::services::rate_limiting_service::{
        RateLimitConfig, RateLimitDecision, RateLimiter,
    };
    use crate::infrastructure::cache::kv_store::KvStore;
    use crate::infrastructure::cache::memory_store::MemoryStore;
    use std::sync::Arc;

    const NOT_LIMITED: RateLimitDecision = RateLimitDecision {
        triggered: false,
        limited: false,
    };
    const TRIGGERED: RateLimitDecision = RateLimitDecision {
        triggered: true,
        limited: true,
    };
    const COOLING: RateLimitDecision = RateLimitDecision {
        triggered: false,
        limited: true,
    };

    fn limiter(store: Arc<MemoryStore>) -> RateLimiter {
        RateLimiter::new(
            store,
            "chat",
            RateLimitConfig {
                threshold: 3,
                interval: 60,
                cooldown: 30,
            },
        )
    }

    #[tokio::test]
    async fn test_fourth_call_in_window_triggers() {
        let limiter = limiter(Arc::new(MemoryStore::new()));
        let t0 = 1_700_000_000_000;

        for offset in [0, 10_000, 20_000] {
            assert_eq!(
                limiter.is_limited_at("u", "", t0 + offset).await.unwrap(),
                NOT_LIMITED
            );
        }
        assert_eq!(
            limiter.is_limited_at("u", "", t0 + 30_000).await.unwrap(),
            TRIGGERED
        );
        assert_eq!(
            limiter.is_limited_at("u", "", t0 + 30_001).await.unwrap(),
            COOLING
        );
    }

    #[tokio::test]
    async fn test_cooldown_expiry_resets_to_window_mode() {
        let store = Arc::new(MemoryStore::new());
        let limiter = limiter(store.clone());
        let t0 = 1_700_000_000_000;

        for offset in 0..4 {
            limiter.is_limited_at("u", "g", t0 + offset).await.unwrap();
        }
        assert_eq!(
            limiter.is_limited_at("u", "g", t0 + 29_000).await.unwrap(),
            COOLING
        );

        let after = t0 + 3 + 30_000;
        assert_eq!(
            limiter.is_limited_at("u", "g", after).await.unwrap(),
            NOT_LIMITED
        );
        let raw = store.get_raw("rl:chat:g:u").await.unwrap().unwrap();
        let record: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(record, serde_json::json!({ "ts": [after] }));
    }

    #[tokio::test]
    async fn test_old_timestamps_slide_out_of_window() {
        let limiter = limiter(Arc::new(MemoryStore::new()));
        let t0 = 1_700_000_000_000;

        for offset in [0, 1_000, 2_000] {
            limiter.is_limited_at("u", "", t0 + offset).await.unwrap();
        }
        // 前两次已经滑出窗口
        assert_eq!(
            limiter.is_limited_at("u", "", t0 + 61_500).await.unwrap(),
            NOT_LIMITED
        );
    }

    #[tokio::test]
    async fn test_users_and_groups_are_isolated() {
        let limiter = limiter(Arc::new(MemoryStore::new()));
        let t0 = 1_700_000_000_000;

        for offset in 0..4 {
            limiter.is_limited_at("alice", "g1", t0 + offset).await.unwrap();
        }
        assert!(limiter.is_limited_at("alice", "g1", t0 + 5).await.unwrap().limited);
        assert!(!limiter.is_limited_at("alice", "g2", t0 + 5).await.unwrap().limited);
        assert!(!limiter.is_limited_at("bob", "g1", t0 + 5).await.unwrap().limited);
    }
}
