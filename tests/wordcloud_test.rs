use chat_insights::analysis::WordCount;
use chat_insights::config::WordCloudConfig;
use chat_insights::wordcloud::{PlacedWord, WordCloudBuilder};

fn frequencies(n: usize) -> Vec<WordCount> {
    (0..n)
        .map(|i| WordCount {
            word: format!("word{i}"),
            count: n - i,
        })
        .collect()
}

fn disjoint(a: &PlacedWord, b: &PlacedWord) -> bool {
    a.x + a.width <= b.x || b.x + b.width <= a.x || a.y + a.height <= b.y || b.y + b.height <= a.y
}

#[test]
fn test_layout_stays_on_canvas() {
    let config = WordCloudConfig::default();
    let cloud = WordCloudBuilder::new(&config)
        .expect("valid config")
        .build(&frequencies(60));

    assert_eq!((cloud.width, cloud.height), (500, 500));
    assert!(!cloud.is_empty());
    for word in &cloud.words {
        assert!(word.x + word.width <= cloud.width, "{} overflows horizontally", word.text);
        assert!(word.y + word.height <= cloud.height, "{} overflows vertically", word.text);
    }
}

#[test]
fn test_words_do_not_overlap() {
    let cloud = WordCloudBuilder::new(&WordCloudConfig::default())
        .expect("valid config")
        .build(&frequencies(40));

    for (i, a) in cloud.words.iter().enumerate() {
        for b in &cloud.words[i + 1..] {
            assert!(disjoint(a, b), "{} overlaps {}", a.text, b.text);
        }
    }
}

#[test]
fn test_font_sizes_within_range() {
    let config = WordCloudConfig {
        min_font_size: 12,
        max_font_size: 40,
        ..WordCloudConfig::default()
    };
    let cloud = WordCloudBuilder::new(&config)
        .expect("valid config")
        .build(&frequencies(30));

    assert!(cloud
        .words
        .iter()
        .all(|w| (12..=40).contains(&w.font_size)));
    assert_eq!(cloud.words[0].text, "word0");
    assert_eq!(cloud.words[0].font_size, 40);
}

#[test]
fn test_max_words_cap() {
    let config = WordCloudConfig {
        max_words: 5,
        ..WordCloudConfig::default()
    };
    let cloud = WordCloudBuilder::new(&config)
        .expect("valid config")
        .build(&frequencies(50));

    assert!(cloud.words.len() <= 5);
    assert!(cloud.words.iter().all(|w| w.count > 45));
}

#[test]
fn test_empty_input() {
    let cloud = WordCloudBuilder::new(&WordCloudConfig::default())
        .expect("valid config")
        .build(&[]);
    assert!(cloud.is_empty());
}

#[test]
fn test_different_seeds_change_layout() {
    let words = frequencies(10);
    let first = WordCloudBuilder::new(&WordCloudConfig {
        seed: 1,
        ..WordCloudConfig::default()
    })
    .expect("valid config")
    .build(&words);
    let second = WordCloudBuilder::new(&WordCloudConfig {
        seed: 2,
        ..WordCloudConfig::default()
    })
    .expect("valid config")
    .build(&words);

    assert_eq!(first.words.len(), second.words.len());
    assert_ne!(first, second);
}

#[test]
fn test_inverted_font_range_is_an_error() {
    let config = WordCloudConfig {
        min_font_size: 40,
        max_font_size: 20,
        ..WordCloudConfig::default()
    };
    assert!(WordCloudBuilder::new(&config).is_err());
}

#[test]
fn test_zero_canvas_is_an_error() {
    let config = WordCloudConfig {
        height: 0,
        ..WordCloudConfig::default()
    };
    assert!(WordCloudBuilder::new(&config).is_err());
}

#[test]
fn test_equal_counts_fill_the_cloud() {
    let words: Vec<WordCount> = (0..200)
        .map(|i| WordCount {
            word: format!("word{i}"),
            count: 7,
        })
        .collect();
    let cloud = WordCloudBuilder::new(&WordCloudConfig::default())
        .expect("valid config")
        .build(&words);

    assert!(cloud.words.len() >= 180, "only {} of 200 placed", cloud.words.len());
    assert!(cloud.words.windows(2).all(|w| w[0].font_size >= w[1].font_size));
}

#[test]
fn test_sizes_never_grow_along_the_ranking() {
    let words: Vec<WordCount> = (0..200)
        .map(|i| WordCount {
            word: format!("word{i}"),
            count: 1000 / (i + 1),
        })
        .collect();
    let cloud = WordCloudBuilder::new(&WordCloudConfig::default())
        .expect("valid config")
        .build(&words);

    assert!(cloud.words.len() >= 180, "only {} of 200 placed", cloud.words.len());
    assert!(cloud.words.windows(2).all(|w| w[0].font_size >= w[1].font_size));
    assert!(cloud.words[0].font_size > cloud.words[cloud.words.len() - 1].font_size);
}
