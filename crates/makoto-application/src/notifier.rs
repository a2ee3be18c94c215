//! Survey notification port
//!
//! Public submissions are not stored; they are forwarded to moderators
//! through a [`SurveyNotifier`]. Delivery is best-effort and runs detached
//! from the request that triggered it.

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::dto::SurveyInput;

/// Heading of every submission message
const HEADING: &str = "【新規アンケート】";

/// Placeholder for blank fields
const BLANK: &str = "未入力";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NotifyError {
    #[error("Notification delivery failed: {0}")]
    Delivery(String),
}

/// Message sent to moderators for one submission
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyNotification {
    /// Who the message is attributed to
    pub sender: String,
    pub text: String,
}

impl SurveyNotification {
    pub fn from_input(input: &SurveyInput) -> Self {
        Self {
            sender: sender_label(input),
            text: render_text(input),
        }
    }
}

/// Store id, else "name / branch", else "anonymous"
fn sender_label(input: &SurveyInput) -> String {
    let store_id = input.store_id.trim();
    if !store_id.is_empty() {
        return store_id.to_string();
    }
    let parts: Vec<&str> = [input.store_name.trim(), input.branch_name.trim()]
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect();
    if parts.is_empty() {
        "anonymous".to_string()
    } else {
        parts.join(" / ")
    }
}

fn or_blank(value: &str) -> &str {
    match value.trim() {
        "" => BLANK,
        value => value,
    }
}

fn trimmed(value: &Option<String>) -> &str {
    value.as_deref().map(str::trim).unwrap_or_default()
}

fn render_text(input: &SurveyInput) -> String {
    let mut lines = vec![
        format!("店舗名: {}", or_blank(&input.store_name)),
        format!("支店名: {}", or_blank(&input.branch_name)),
        format!("都道府県: {}", or_blank(&input.prefecture)),
        format!("業種: {}", or_blank(&input.industry)),
        format!("働いた時期: {}", or_blank(&input.visited_period)),
        format!("勤務形態: {}", or_blank(&input.work_type)),
        format!("年齢: {}", input.age),
        format!("スペック評価: {}", input.spec_score),
        format!("待機時間(時間): {}", input.wait_time_hours),
        format!("平均稼ぎ: {}", input.average_earning),
        format!("総合評価: {:.1}", input.rating),
        format!("客層について: {}", trimmed(&input.customer_comment)),
        format!("スタッフについて: {}", trimmed(&input.staff_comment)),
        format!("職場の環境について: {}", trimmed(&input.work_environment_comment)),
    ];
    if let Some(email) = &input.email_address {
        lines.push(format!("連絡先: {}", email.trim()));
    }
    if !input.image_urls.is_empty() {
        lines.push(format!("画像URL: {}", input.image_urls.join(", ")));
    }
    format!("{HEADING}\n{}", lines.join("\n"))
}

/// Outbound notification port
///
/// Infrastructure provides the real delivery channel.
#[async_trait]
pub trait SurveyNotifier: Send + Sync {
    async fn notify(&self, notification: &SurveyNotification) -> Result<(), NotifyError>;
}

/// Writes submissions to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNotifier;

#[async_trait]
impl SurveyNotifier for LoggingNotifier {
    async fn notify(&self, notification: &SurveyNotification) -> Result<(), NotifyError> {
        info!(sender = %notification.sender, "{}", notification.text);
        Ok(())
    }
}

/// No-op notifier for testing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpNotifier;

#[async_trait]
impl SurveyNotifier for NoOpNotifier {
    async fn notify(&self, _notification: &SurveyNotification) -> Result<(), NotifyError> {
        Ok(())
    }
}
