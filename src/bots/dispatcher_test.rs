// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

#[cfg(test)]
mod tests {
    use crate::bots::build_router;
    use crate::bots::dispatcher::{ChatDispatcher, CustomRegistration, InboundMessage};
    use crate::bots::protocol::{ChatMode, SendResult};
    use crate::bots::web_reply::WebReply;
    use crate::domain::models::permission::Permission;
    use crate::domain::models::player::{Player, PlayerLookup, RankEntry};
    use crate::domain::models::user::UserRecord;
    use crate::domain::repositories::user_repository::UserRepository;
    use crate::domain::services::rate_limiting_service::{RateLimitConfig, RateLimiter};
    use crate::infrastructure::cache::fetch_cache::FetchOptions;
    use crate::infrastructure::cache::memory_store::MemoryStore;
    use crate::infrastructure::fetches::maps::map_cache;
    use crate::infrastructure::fetches::players::PlayerSource;
    use crate::infrastructure::repositories::user_repo_impl::UserRepositoryImpl;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Arc;

    /// 固定的玩家数据，`None` 表示尚未加载
    struct StubPlayers(Option<Vec<Player>>);

    #[async_trait]
    impl PlayerSource for StubPlayers {
        async fn lookup(&self, name: &str) -> PlayerLookup {
            match &self.0 {
                None => PlayerLookup::Unavailable,
                Some(players) => players
                    .iter()
                    .find(|player| player.name == name)
                    .cloned()
                    .map(PlayerLookup::Found)
                    .unwrap_or(PlayerLookup::NotFound),
            }
        }
    }

    struct Fixture {
        dispatcher: Arc<ChatDispatcher>,
        users: Arc<UserRepositoryImpl>,
    }

    fn fixture_with(players: StubPlayers, threshold: usize) -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let users = Arc::new(UserRepositoryImpl::new(store.clone()));
        let maps = Arc::new(map_cache(
            "http://127.0.0.1:9/maps.json",
            store.clone(),
            FetchOptions::default(),
            reqwest::Client::new(),
        ));
        let router = build_router(users.clone(), maps, Arc::new(players));
        let limiter = RateLimiter::new(
            store,
            "chat",
            RateLimitConfig {
                threshold,
                interval: 60,
                cooldown: 60,
            },
        );

        Fixture {
            dispatcher: Arc::new(ChatDispatcher::new(router, limiter, users.clone(), 1)),
            users,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(StubPlayers(None), 100)
    }

    fn message(user: &str, text: &str, mode: ChatMode) -> InboundMessage {
        InboundMessage {
            platform: "qq".to_string(),
            user: user.to_string(),
            group: match mode {
                ChatMode::Group => "g1".to_string(),
                ChatMode::Direct => String::new(),
            },
            message: text.to_string(),
            mode,
            raw: Value::Null,
        }
    }

    fn content(result: &SendResult) -> String {
        match result {
            SendResult::Sent(body) => body["content"].as_str().unwrap_or_default().to_string(),
            SendResult::Ignored { message, .. } => panic!("unexpected ignored: {}", message),
        }
    }

    async fn send(fixture: &Fixture, user: &str, text: &str, mode: ChatMode) -> SendResult {
        fixture
            .dispatcher
            .handle(message(user, text, mode), Arc::new(WebReply::new()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_points_without_player_data_is_ignored() {
        let fixture = fixture();
        let result = send(&fixture, "123", "/分数 TsFreddie", ChatMode::Direct).await;

        assert_eq!(result, SendResult::ignored("玩家信息未加载，分数功能未启用"));
    }

    #[tokio::test]
    async fn test_unknown_command_depends_on_mode() {
        let fixture = fixture();

        let group = send(&fixture, "1", "/whatever", ChatMode::Group).await;
        assert_eq!(group, SendResult::ignored("未知指令"));

        let direct = send(&fixture, "1", "/whatever", ChatMode::Direct).await;
        assert!(content(&direct).starts_with("目前豆豆可以提供以下查询功能"));
    }

    #[tokio::test]
    async fn test_leading_mention_is_stripped() {
        let fixture = fixture();
        let result = send(&fixture, "1", "@豆豆 /帮助", ChatMode::Group).await;

        assert!(content(&result).contains("/分数 <玩家名>"));
    }

    #[tokio::test]
    async fn test_bind_then_points_uses_bound_name() {
        let player = Player {
            name: "TsFreddie".to_string(),
            points: RankEntry {
                rank: Some(12),
                points: 18000,
            },
            team: RankEntry::default(),
            rank: RankEntry::default(),
            yearly: RankEntry {
                rank: None,
                points: 300,
            },
        };
        let fixture = fixture_with(StubPlayers(Some(vec![player])), 100);

        let bound = send(&fixture, "7", "/绑定 TsFreddie", ChatMode::Direct).await;
        assert!(content(&bound).contains("已记住了你的游戏名 TsFreddie"));

        let points = content(&send(&fixture, "7", "/分数", ChatMode::Direct).await);
        assert!(points.starts_with("TsFreddie\n总通过分: 18000pts [No.12]"));
        assert!(points.contains("团队排位: 未上榜"));
        assert!(points.contains("去年获得: 无记录"));
        assert!(points.contains("https://teeworlds.cn/ddnet/players/TsFreddie"));

        let unbound = send(&fixture, "7", "/绑定", ChatMode::Direct).await;
        assert_eq!(content(&unbound), "已解绑 TsFreddie");
        assert_eq!(
            fixture.users.find("qq:7").await.unwrap().unwrap().bind_name,
            None
        );
    }

    #[tokio::test]
    async fn test_custom_reply_fires_once() {
        let fixture = fixture();
        let body = json!({ "msg_type": 2, "markdown": { "content": "hello" } });

        let CustomRegistration::Armed { token } = fixture
            .dispatcher
            .register_custom(Some(body.clone()))
            .await
            .unwrap()
        else {
            panic!("custom reply should be armed");
        };
        assert_eq!(token.len(), 24);

        let first = send(&fixture, "1", &token, ChatMode::Group).await;
        assert_eq!(first, SendResult::Sent(body.clone()));
        assert_eq!(
            fixture.dispatcher.custom_error().await.unwrap(),
            Some(SendResult::Sent(body))
        );

        let second = send(&fixture, "1", &token, ChatMode::Group).await;
        assert_eq!(second, SendResult::ignored("未知指令"));
    }

    #[tokio::test]
    async fn test_custom_reply_requires_body() {
        let fixture = fixture();

        for body in [None, Some(Value::Null)] {
            let registration = fixture.dispatcher.register_custom(body).await.unwrap();
            assert_eq!(
                registration,
                CustomRegistration::Rejected {
                    error: true,
                    message: "custom command must have a body".to_string(),
                }
            );
        }
    }

    #[tokio::test]
    async fn test_listen_to_user_filters_transactions() {
        let fixture = fixture();
        let dispatcher = &fixture.dispatcher;

        send(&fixture, "1", "/帮助", ChatMode::Direct).await;
        let last = dispatcher.last_transaction().await.unwrap().unwrap();
        assert_eq!(last.uid, "qq:1");
        assert_eq!(last.msg, "/帮助");
        assert!(last.result.is_some());

        dispatcher
            .set_listen_to_user(Some("qq:2".to_string()))
            .await
            .unwrap();
        assert_eq!(
            dispatcher.listen_to_user().await.unwrap().as_deref(),
            Some("qq:2")
        );

        send(&fixture, "3", "/工具箱", ChatMode::Direct).await;
        assert_eq!(dispatcher.last_transaction().await.unwrap().unwrap().msg, "/帮助");

        send(&fixture, "2", "/工具箱", ChatMode::Direct).await;
        let last = dispatcher.last_transaction().await.unwrap().unwrap();
        assert_eq!(last.uid, "qq:2");

        dispatcher.set_listen_to_user(Some(String::new())).await.unwrap();
        assert_eq!(dispatcher.listen_to_user().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_rate_limit_warns_once_then_stays_quiet() {
        let fixture = fixture_with(StubPlayers(None), 2);

        send(&fixture, "1", "/帮助", ChatMode::Group).await;
        send(&fixture, "1", "/帮助", ChatMode::Group).await;

        let warned = send(&fixture, "1", "/帮助", ChatMode::Group).await;
        assert_eq!(content(&warned), "你发消息太快了，休息一下再试吧");

        let quiet = send(&fixture, "1", "/帮助", ChatMode::Group).await;
        assert_eq!(quiet, SendResult::ignored("rate limited"));

        let other = send(&fixture, "2", "/帮助", ChatMode::Group).await;
        assert!(!other.is_ignored());
    }

    #[tokio::test]
    async fn test_permission_commands_need_super() {
        let fixture = fixture();

        let denied = send(&fixture, "1", "/perm-add qq:2 TICKETS", ChatMode::Group).await;
        assert_eq!(denied, SendResult::ignored("未知指令"));
        assert_eq!(fixture.users.find("qq:2").await.unwrap(), None);

        fixture
            .users
            .save(
                "qq:1",
                &UserRecord {
                    permissions: vec![Permission::Super],
                    bind_name: None,
                },
            )
            .await
            .unwrap();

        let granted = send(&fixture, "1", "/perm-add qq:2 tickets", ChatMode::Group).await;
        assert_eq!(
            content(&granted),
            "Permission \"TICKETS\" has been given to \"qq:2\""
        );
        assert_eq!(
            fixture.users.find("qq:2").await.unwrap().unwrap().permissions,
            vec![Permission::Tickets]
        );

        let check = send(&fixture, "1", "/perm qq:2", ChatMode::Group).await;
        assert_eq!(content(&check), "User \"qq:2\" has permission TICKETS");

        let removed = send(&fixture, "1", "/perm-rm qq:2 all", ChatMode::Group).await;
        assert_eq!(
            content(&removed),
            "All permissions have been removed from \"qq:2\""
        );
    }
}
