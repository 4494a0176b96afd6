// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use crate::bots::command_router::CommandRouter;
use crate::bots::protocol::{ChatMode, HandlerContext, Reply, SendResult};
use crate::domain::repositories::user_repository::UserRepository;
use crate::domain::services::rate_limiting_service::RateLimiter;
use crate::queue::async_queue::MultiAsyncQueue;
use crate::utils::errors::BotError;

/// 消息开头的 @ 提及
static MENTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:<@!?[^>]+>|@\S+)\s*").expect("Failed to compile mention regex")
});

const RATE_LIMIT_WARNING: &str = "你发消息太快了，休息一下再试吧";

/// 已解码的入站消息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    /// 平台标识，如 `qq`、`web`、`cli`
    pub platform: String,
    pub user: String,
    /// 群组标识，私聊为空串
    #[serde(default)]
    pub group: String,
    pub message: String,
    pub mode: ChatMode,
    /// 原始载荷，仅用于诊断
    #[serde(default)]
    pub raw: Value,
}

/// 最近一次处理的消息快照
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub uid: String,
    pub msg: String,
    pub raw: Value,
    pub mode: ChatMode,
    /// 毫秒时间戳
    pub time: i64,
    pub result: Option<SendResult>,
}

/// `register_custom` 的结果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CustomRegistration {
    Armed { token: String },
    Rejected { error: bool, message: String },
}

#[derive(Default)]
struct DispatcherState {
    custom_body: Option<Value>,
    custom_token: Option<String>,
    custom_error: Option<SendResult>,
    last_transaction: Option<Transaction>,
    listen_to_user: Option<String>,
}

/// 聊天分发器
///
/// 所有消息与管理操作都提交到同一个队列中执行，自定义回复与诊断快照
/// 只在队列任务内修改
pub struct ChatDispatcher {
    router: CommandRouter,
    limiter: RateLimiter,
    users: Arc<dyn UserRepository>,
    queue: MultiAsyncQueue,
    state: Mutex<DispatcherState>,
}

impl ChatDispatcher {
    /// 创建分发器
    ///
    /// # 参数
    ///
    /// * `router` - 指令表
    /// * `limiter` - 按用户的聊天限流器
    /// * `users` - 用户仓库，用于读取权限
    /// * `queue_workers` - 子队列数量，1 表示全局串行
    pub fn new(
        router: CommandRouter,
        limiter: RateLimiter,
        users: Arc<dyn UserRepository>,
        queue_workers: usize,
    ) -> Self {
        Self {
            router,
            limiter,
            users,
            queue: MultiAsyncQueue::new(queue_workers),
            state: Mutex::new(DispatcherState::default()),
        }
    }

    /// 处理一条入站消息
    ///
    /// # 返回值
    ///
    /// * `Ok(SendResult)` - 回复结果，未知指令与限流以 `Ignored` 表示
    /// * `Err(BotError)` - 处理器失败，只影响这一条消息
    pub async fn handle(
        self: &Arc<Self>,
        message: InboundMessage,
        reply: Arc<dyn Reply>,
    ) -> Result<SendResult, BotError> {
        let this = self.clone();
        self.queue
            .push(async move { this.process(message, reply).await })
            .await?
    }

    async fn process(
        &self,
        message: InboundMessage,
        reply: Arc<dyn Reply>,
    ) -> Result<SendResult, BotError> {
        let uid = format!("{}:{}", message.platform, message.user);
        let transaction = Transaction {
            uid: uid.clone(),
            msg: message.message.clone(),
            raw: message.raw,
            mode: message.mode,
            time: chrono::Utc::now().timestamp_millis(),
            result: None,
        };
        let text = message.message.trim();

        let armed = {
            let mut state = self.state.lock();
            if state.custom_body.is_some() && state.custom_token.as_deref() == Some(text) {
                state.custom_token = None;
                state.custom_body.take()
            } else {
                None
            }
        };
        if let Some(body) = armed {
            info!(uid = %uid, "Custom reply triggered");
            let result = reply.custom(&body).await?;
            self.state.lock().custom_error = Some(result.clone());
            self.record(transaction, &result);
            return Ok(result);
        }

        let decision = self.limiter.is_limited(&uid, &message.group).await?;
        if decision.limited {
            metrics::counter!("chat_messages_total", "result" => "limited").increment(1);
            debug!(uid = %uid, triggered = decision.triggered, "Chat rate limited");
            let result = if decision.triggered {
                reply.text(RATE_LIMIT_WARNING).await?
            } else {
                SendResult::ignored("rate limited")
            };
            self.record(transaction, &result);
            return Ok(result);
        }

        let text = MENTION.replace(text, "");
        let user = self.users.find(&uid).await?;
        let permissions = user
            .as_ref()
            .map(|user| user.permissions.clone())
            .unwrap_or_default();
        let parsed = self.router.parse(&text, &permissions);

        let ctx = HandlerContext {
            uid: uid.clone(),
            user,
            reply,
            command: parsed.cmd.clone(),
            args: parsed.args.clone(),
            mode: message.mode,
            group: message.group,
        };
        let result = self.router.run(&parsed, &ctx).await?;

        let label = if result.is_ignored() { "ignored" } else { "sent" };
        metrics::counter!("chat_messages_total", "result" => label).increment(1);
        info!(uid = %uid, cmd = %parsed.cmd, fallback = parsed.fallback, result = label, "Chat handled");

        self.record(transaction, &result);
        Ok(result)
    }

    fn record(&self, mut transaction: Transaction, result: &SendResult) {
        let mut state = self.state.lock();
        let listening = state
            .listen_to_user
            .as_deref()
            .is_none_or(|uid| uid == transaction.uid);
        if listening {
            transaction.result = Some(result.clone());
            state.last_transaction = Some(transaction);
        }
    }

    /// 布置一次性自定义回复
    ///
    /// 下一条内容恰好等于返回令牌的消息将收到 `body` 作为回复
    pub async fn register_custom(
        self: &Arc<Self>,
        body: Option<Value>,
    ) -> Result<CustomRegistration, BotError> {
        let this = self.clone();
        let registration = self
            .queue
            .push(async move {
                let Some(body) = body.filter(|body| !body.is_null()) else {
                    return CustomRegistration::Rejected {
                        error: true,
                        message: "custom command must have a body".to_string(),
                    };
                };

                let token = hex::encode(rand::random::<[u8; 12]>());
                let mut state = this.state.lock();
                state.custom_token = Some(token.clone());
                state.custom_body = Some(body);
                CustomRegistration::Armed { token }
            })
            .await?;
        Ok(registration)
    }

    /// 最近一次自定义回复的发送结果
    pub async fn custom_error(self: &Arc<Self>) -> Result<Option<SendResult>, BotError> {
        let this = self.clone();
        Ok(self
            .queue
            .push(async move { this.state.lock().custom_error.clone() })
            .await?)
    }

    pub async fn last_transaction(self: &Arc<Self>) -> Result<Option<Transaction>, BotError> {
        let this = self.clone();
        Ok(self
            .queue
            .push(async move { this.state.lock().last_transaction.clone() })
            .await?)
    }

    /// 只记录指定用户的消息，`None` 表示记录所有人
    pub async fn set_listen_to_user(self: &Arc<Self>, uid: Option<String>) -> Result<(), BotError> {
        let this = self.clone();
        self.queue
            .push(async move {
                this.state.lock().listen_to_user = uid.filter(|uid| !uid.is_empty());
            })
            .await?;
        Ok(())
    }

    pub async fn listen_to_user(self: &Arc<Self>) -> Result<Option<String>, BotError> {
        let this = self.clone();
        Ok(self
            .queue
            .push(async move { this.state.lock().listen_to_user.clone() })
            .await?)
    }
}

#[cfg(test)]
#[path = "dispatcher_test.rs"]
mod tests;
