// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 本机调试用的机器人客户端
//!
//! 把一条消息发送到本机服务的 `/bots/local` 并打印回复

use anyhow::{bail, Context};
use clap::Parser;
use serde_json::{json, Value};

/// Send a chat message to the local bot endpoint.
#[derive(Parser, Debug)]
#[command(name = "bot-command")]
#[command(about = "Send a message to the local ddportal bot")]
struct Args {
    /// Port of the local ddportal server
    #[arg(long, default_value_t = 3000)]
    port: u16,

    /// Message to send, joined with spaces
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    message: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let url = format!("http://localhost:{}/bots/local", args.port);

    let response = reqwest::Client::new()
        .post(&url)
        .json(&json!({ "message": args.message.join(" ") }))
        .send()
        .await
        .with_context(|| format!("Failed to reach {}", url))?;

    let status = response.status();
    if !status.is_success() {
        bail!("Failed to execute command: {}", status);
    }

    let data: Value = response.json().await?;
    match data.get("content").and_then(Value::as_str) {
        Some(content) => println!("{}", content),
        None => println!("{}", serde_json::to_string_pretty(&data)?),
    }

    Ok(())
}
