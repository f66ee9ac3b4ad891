use async_trait::async_trait;
use serde::{
    Deserialize,
    Serialize,
};

use crate::error::AppError;

pub const USERNAME: &str = "exslack";
pub const ICON_EMOJI: &str = ":tada:";

/// Delivers a finished job's report text to its destination.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier {
    async fn notify(&self, text: &str) -> Result<(), AppError>;
}

/// Body of a chat incoming webhook.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct WebhookBody {
    pub text: String,
    pub channel: String,
    pub username: String,
    pub icon_emoji: String,
}

#[derive(Clone, Debug)]
pub struct WebhookNotifier {
    pub(crate) client: reqwest::Client,
    pub(crate) url: String,
    pub(crate) destination: String,
}

mod impls;
