//! Integration tests for the aggregations

mod common;

use chrono::{NaiveDate, Weekday};
use chat_insights::analysis::{ChatStats, WordCount};
use chat_insights::config::{AppConfig, WordCloudConfig};
use chat_insights::models::UserFilter;
use chat_insights::{ChatAnalyzer, MessageCollection};
use common::{analyzer, group_chat, parser};

fn alice() -> UserFilter {
    UserFilter::from("Alice")
}

#[test]
fn test_fetch_stats_single_message() {
    let collection = parser().parse("12/1/23, 10:30 AM - Alice: Hello world");
    let stats = analyzer().fetch_stats(&UserFilter::Overall, &collection);
    assert_eq!(
        stats,
        ChatStats {
            messages: 1,
            words: 2,
            media: 0,
            links: 0
        }
    );
}

#[test]
fn test_fetch_stats_overall() {
    let stats = analyzer().fetch_stats(&UserFilter::Overall, &group_chat());
    assert_eq!(stats.messages, 8);
    assert_eq!(stats.words, 23);
    assert_eq!(stats.media, 1);
    assert_eq!(stats.links, 2);
}

#[test]
fn test_fetch_stats_for_user() {
    let stats = analyzer().fetch_stats(&alice(), &group_chat());
    assert_eq!(
        stats,
        ChatStats {
            messages: 3,
            words: 7,
            media: 1,
            links: 0
        }
    );
}

#[test]
fn test_unknown_user_gives_empty_results() {
    let analyzer = analyzer();
    let collection = group_chat();
    let nobody = UserFilter::from("Nobody");

    assert_eq!(analyzer.fetch_stats(&nobody, &collection), ChatStats::default());
    assert!(analyzer.monthly_timeline(&nobody, &collection).is_empty());
    assert!(analyzer.daily_timeline(&nobody, &collection).is_empty());
    assert!(analyzer.week_activity_map(&nobody, &collection).is_empty());
    assert!(analyzer.month_activity_map(&nobody, &collection).is_empty());
    assert!(analyzer.activity_heatmap(&nobody, &collection).is_empty());
    assert!(analyzer.most_common_words(&nobody, &collection).is_empty());
    assert!(analyzer.emoji_helper(&nobody, &collection).is_empty());
    assert!(analyzer.create_wordcloud(&nobody, &collection).is_empty());
}

#[test]
fn test_sender_named_overall_is_selectable() {
    let collection = parser().parse(
        "12/1/23, 10:30 AM - Overall: guitar time\n12/1/23, 10:31 AM - Alice: pizza",
    );
    let analyzer = analyzer();

    let only_them = UserFilter::sender("Overall");
    assert_eq!(analyzer.fetch_stats(&only_them, &collection).messages, 1);
    assert_eq!(
        analyzer.fetch_stats(&UserFilter::from("Overall"), &collection).messages,
        2
    );
}

#[test]
fn test_empty_collection() {
    let analyzer = analyzer();
    let collection = MessageCollection::default();
    let overall = UserFilter::Overall;

    assert_eq!(analyzer.fetch_stats(&overall, &collection), ChatStats::default());
    assert!(analyzer.monthly_timeline(&overall, &collection).is_empty());
    assert_eq!(analyzer.activity_heatmap(&overall, &collection).total(), 0);
    let busy = analyzer.most_busy_users(&collection);
    assert!(busy.top.is_empty());
    assert!(busy.shares.is_empty());
}

#[test]
fn test_monthly_timeline() {
    let timeline = analyzer().monthly_timeline(&UserFilter::Overall, &group_chat());
    let labels: Vec<(&str, usize)> = timeline.iter().map(|p| (p.label.as_str(), p.count)).collect();
    assert_eq!(labels, vec![("December 2023", 6), ("January 2024", 2)]);
}

#[test]
fn test_daily_timeline() {
    let timeline = analyzer().daily_timeline(&UserFilter::Overall, &group_chat());
    let days: Vec<(NaiveDate, usize)> = timeline.iter().map(|p| (p.date, p.count)).collect();
    assert_eq!(
        days,
        vec![
            (NaiveDate::from_ymd_opt(2023, 12, 1).expect("valid date"), 5),
            (NaiveDate::from_ymd_opt(2023, 12, 2).expect("valid date"), 1),
            (NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date"), 2),
        ]
    );
}

#[test]
fn test_week_activity_map() {
    let days = analyzer().week_activity_map(&UserFilter::Overall, &group_chat());
    let days: Vec<(&str, usize)> = days.iter().map(|c| (c.label.as_str(), c.count)).collect();
    assert_eq!(days, vec![("Friday", 5), ("Monday", 2), ("Saturday", 1)]);
}

#[test]
fn test_month_activity_map() {
    let months = analyzer().month_activity_map(&alice(), &group_chat());
    let months: Vec<(&str, usize)> = months.iter().map(|c| (c.label.as_str(), c.count)).collect();
    assert_eq!(months, vec![("December", 2), ("January", 1)]);
}

#[test]
fn test_activity_heatmap() {
    let heatmap = analyzer().activity_heatmap(&UserFilter::Overall, &group_chat());
    assert_eq!(heatmap.get(Weekday::Fri, 10), 4);
    assert_eq!(heatmap.get(Weekday::Fri, 23), 1);
    assert_eq!(heatmap.get(Weekday::Sat, 9), 1);
    assert_eq!(heatmap.get(Weekday::Mon, 20), 2);
    assert_eq!(heatmap.get(Weekday::Tue, 12), 0);
    assert_eq!(heatmap.total(), 8);
    assert_eq!(heatmap.row(Weekday::Fri).iter().sum::<usize>(), 5);
}

#[test]
fn test_most_busy_users() {
    let busy = analyzer().most_busy_users(&group_chat());

    let top: Vec<(&str, usize)> = busy.top.iter().map(|c| (c.label.as_str(), c.count)).collect();
    assert_eq!(top, vec![("Alice", 3), ("Bob", 2), ("Carol", 1)]);

    let percents: Vec<f64> = busy.shares.iter().map(|s| s.percent).collect();
    assert_eq!(percents, vec![50.0, 33.33, 16.67]);
    let total: f64 = percents.iter().sum();
    assert!((total - 100.0).abs() < 0.05);
}

#[test]
fn test_most_busy_users_respects_limit() {
    let mut config = AppConfig::default();
    config.analysis.top_users = 2;
    let analyzer = ChatAnalyzer::new(&config).expect("Failed to create analyzer");

    let busy = analyzer.most_busy_users(&group_chat());
    assert_eq!(busy.top.len(), 2);
    assert_eq!(busy.shares.len(), 3);
}

#[test]
fn test_most_common_words() {
    let words = analyzer().most_common_words(&UserFilter::Overall, &group_chat());
    assert_eq!(
        words.first(),
        Some(&WordCount {
            word: "pizza".to_string(),
            count: 3
        })
    );
    assert!(words.iter().any(|w| w.word == "guitar" && w.count == 1));
    // Media placeholder and notification text never become tokens
    assert!(!words.iter().any(|w| w.word == "media" || w.word == "omitted"));
    assert!(!words.iter().any(|w| w.word == "encrypted" || w.word == "trip"));
}

#[test]
fn test_most_common_words_extra_stop_words() {
    let mut config = AppConfig::default();
    config.analysis.extra_stop_words = vec!["Pizza".to_string()];
    let analyzer = ChatAnalyzer::new(&config).expect("Failed to create analyzer");

    let words = analyzer.most_common_words(&UserFilter::Overall, &group_chat());
    assert!(!words.iter().any(|w| w.word == "pizza"));
}

#[test]
fn test_emoji_helper() {
    let emojis = analyzer().emoji_helper(&UserFilter::Overall, &group_chat());
    let emojis: Vec<(&str, usize)> = emojis.iter().map(|e| (e.emoji.as_str(), e.count)).collect();
    assert_eq!(emojis, vec![("😂", 3), ("👍", 1)]);

    let alice_emojis = analyzer().emoji_helper(&alice(), &group_chat());
    assert_eq!(alice_emojis.len(), 1);
    assert_eq!(alice_emojis[0].count, 1);
}

#[test]
fn test_wordcloud_uses_common_words() {
    let analyzer = analyzer();
    let collection = group_chat();

    let cloud = analyzer.create_wordcloud(&UserFilter::Overall, &collection);
    assert!(!cloud.is_empty());
    let biggest = cloud
        .words
        .iter()
        .max_by_key(|w| w.font_size)
        .expect("cloud has words");
    assert_eq!(biggest.text, "pizza");
}

#[test]
fn test_wordcloud_is_deterministic_for_seed() {
    let config = AppConfig {
        wordcloud: WordCloudConfig {
            seed: 7,
            ..WordCloudConfig::default()
        },
        ..AppConfig::default()
    };
    let analyzer = ChatAnalyzer::new(&config).expect("Failed to create analyzer");
    let collection = group_chat();

    let first = analyzer.create_wordcloud(&UserFilter::Overall, &collection);
    let second = analyzer.create_wordcloud(&UserFilter::Overall, &collection);
    assert_eq!(first, second);
}

#[test]
fn test_analyzer_rejects_inverted_font_range() {
    let config = AppConfig {
        wordcloud: WordCloudConfig {
            min_font_size: 40,
            max_font_size: 20,
            ..WordCloudConfig::default()
        },
        ..AppConfig::default()
    };
    assert!(ChatAnalyzer::new(&config).is_err());
}

#[test]
fn test_analyzer_rejects_zero_limits() {
    let mut config = AppConfig::default();
    config.analysis.top_words = 0;
    assert!(ChatAnalyzer::new(&config).is_err());
}

#[test]
fn test_word_tokens_skip_media_and_notifications() {
    let tokens = analyzer().word_tokens(&alice(), &group_chat());
    assert!(tokens.contains(&"pizza".to_string()));
    assert!(!tokens.iter().any(|t| t.contains("media")));
}
