// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use futures::future::BoxFuture;
use futures::FutureExt;
use parking_lot::Mutex;
use std::any::Any;
use std::collections::VecDeque;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{debug, error};

/// 队列错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueueError {
    /// 任务执行时发生panic
    #[error("Task panicked: {0}")]
    Panicked(String),

    /// 任务在完成前被丢弃（运行时关闭）
    #[error("Task dropped before completion")]
    Dropped,
}

type Job = BoxFuture<'static, ()>;

#[derive(Default)]
struct QueueState {
    jobs: VecDeque<Job>,
    running: bool,
    /// 尚未完成的任务数，包括正在执行的任务
    pending: usize,
}

/// 异步串行队列
///
/// 同一队列中的任务严格按提交顺序逐个执行，每个调用者获得自己任务的结果。
/// 单个任务失败或panic不会影响其他任务，也不会中断队列
#[derive(Clone, Default)]
pub struct AsyncQueue {
    state: Arc<Mutex<QueueState>>,
}

impl AsyncQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// 提交任务
    ///
    /// 任务在调用时立即入队，返回的 future 只用于等待结果，丢弃它不会取消任务
    ///
    /// # 参数
    ///
    /// * `task` - 要执行的异步任务
    ///
    /// # 返回值
    ///
    /// 任务完成后解析为任务输出，panic 时解析为 `QueueError::Panicked`
    pub fn push<F, T>(&self, task: F) -> impl Future<Output = Result<T, QueueError>>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let job = async move {
            let outcome = AssertUnwindSafe(task)
                .catch_unwind()
                .await
                .map_err(|payload| QueueError::Panicked(panic_message(payload)));
            if let Err(QueueError::Panicked(message)) = &outcome {
                error!(%message, "Queued task panicked");
            }
            let _ = tx.send(outcome);
        }
        .boxed();

        let start_runner = {
            let mut state = self.state.lock();
            state.jobs.push_back(job);
            state.pending += 1;
            !std::mem::replace(&mut state.running, true)
        };

        if start_runner {
            tokio::spawn(Self::run(self.state.clone()));
        }

        async move { rx.await.unwrap_or(Err(QueueError::Dropped)) }
    }

    /// 当前未完成的任务数
    pub fn size(&self) -> usize {
        self.state.lock().pending
    }

    async fn run(state: Arc<Mutex<QueueState>>) {
        debug!("Queue runner started");
        loop {
            let job = {
                let mut state = state.lock();
                match state.jobs.pop_front() {
                    Some(job) => job,
                    None => {
                        state.running = false;
                        break;
                    }
                }
            };

            job.await;
            state.lock().pending -= 1;
        }
        debug!("Queue runner idle");
    }
}

/// 多路异步队列
///
/// 维护 `n` 个独立的串行队列，新任务进入当前最空闲的队列。
/// 只保证同一子队列内的顺序
#[derive(Clone)]
pub struct MultiAsyncQueue {
    queues: Vec<AsyncQueue>,
}

impl MultiAsyncQueue {
    /// 创建多路队列，`n` 为 0 时按 1 处理
    pub fn new(n: usize) -> Self {
        Self {
            queues: (0..n.max(1)).map(|_| AsyncQueue::new()).collect(),
        }
    }

    pub fn push<F, T>(&self, task: F) -> impl Future<Output = Result<T, QueueError>>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let queue = self
            .queues
            .iter()
            .min_by_key(|queue| queue.size())
            .unwrap_or(&self.queues[0]);
        queue.push(task)
    }

    /// 所有子队列的未完成任务总数
    pub fn size(&self) -> usize {
        self.queues.iter().map(AsyncQueue::size).sum()
    }

    pub fn width(&self) -> usize {
        self.queues.len()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
