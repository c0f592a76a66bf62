//! Slack webhook notification.

use serde_json::json;

use crate::error::WatchError;

/// Message body for a new-version announcement.
pub fn release_message(target: &str, version: &str, url: &str) -> String {
    format!(":tada: New {target} version available: *{version}*. Check it out here: {url}")
}

/// Post `text` to a Slack incoming webhook.
pub fn send_slack(agent: &ureq::Agent, webhook: &str, text: &str) -> Result<(), WatchError> {
    agent
        .post(webhook)
        .send_json(json!({ "text": text }))
        .map_err(|e| WatchError::Notify(e.to_string()))?;
    tracing::info!("Slack notification sent");
    Ok(())
}
