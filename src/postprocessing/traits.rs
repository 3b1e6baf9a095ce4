//! Pluggable presentation of composed messages.

use super::composer::RenderedMessage;

pub trait MessageView: Send + Sync {
    fn render(&self, message: &RenderedMessage) -> String;
}
