// Copyright 2026 Muvon Un Limited
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Push notifications. Fire-and-forget: failures are logged, never returned.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::PushConfig;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str);
}

/// Sends notifications through the Pushover messages API
pub struct PushoverNotifier {
    endpoint: String,
    token_env: String,
    user_env: String,
    client: reqwest::Client,
}

impl PushoverNotifier {
    pub fn new(config: &PushConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            token_env: config.token_env.clone(),
            user_env: config.user_env.clone(),
            client,
        })
    }
}

#[async_trait]
impl Notifier for PushoverNotifier {
    async fn notify(&self, message: &str) {
        // Credentials are read per call
        let (Ok(token), Ok(user)) = (
            std::env::var(&self.token_env),
            std::env::var(&self.user_env),
        ) else {
            warn!(
                token_env = %self.token_env,
                user_env = %self.user_env,
                "Push credentials not set, notification dropped"
            );
            return;
        };

        let form = [
            ("token", token.as_str()),
            ("user", user.as_str()),
            ("message", message),
        ];

        match self.client.post(&self.endpoint).form(&form).send().await {
            Ok(response) if response.status().is_success() => {
                debug!("Push notification sent");
            }
            Ok(response) => {
                warn!(status = %response.status(), "Push service rejected notification");
            }
            Err(e) => {
                warn!(error = %e, "Push notification failed");
            }
        }
    }
}

/// Notifier that only writes to the log, used when push is disabled
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, message: &str) {
        tracing::info!(notification = %message, "Notification");
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Records every message instead of sending it
    #[derive(Default)]
    pub struct RecordingNotifier {
        sent: Mutex<Vec<String>>,
    }

    impl RecordingNotifier {
        pub fn sent(&self) -> Vec<String> {
            self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, message: &str) {
            self.sent
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(message.to_string());
        }
    }
}
