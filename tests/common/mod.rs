//! Shared fixtures for integration tests

#![allow(dead_code)]

use chat_insights::{AppConfig, ChatAnalyzer, ChatParser, MessageCollection};

/// Small group chat: three people, two notifications, one media message
pub const GROUP_CHAT: &str = include_str!("../fixtures/group_chat.txt");

pub fn parser() -> ChatParser {
    ChatParser::with_defaults().expect("Failed to create parser")
}

pub fn analyzer() -> ChatAnalyzer {
    ChatAnalyzer::new(&AppConfig::default()).expect("Failed to create analyzer")
}

pub fn group_chat() -> MessageCollection {
    parser().parse(GROUP_CHAT)
}
