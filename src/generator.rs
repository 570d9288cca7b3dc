use clap::ValueEnum;
use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;

static WORDS_DIR: Dir = include_dir!("src/words");

// Character pool for the random word source; deliberately includes the
// awkward shifted symbols worth practicing.
const RANDOM_CHARSET: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@$%^&*()`-='\\[~_+\"|{},";
const MAX_RANDOM_WORD_LEN: usize = 8;

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
pub enum WordSource {
    /// common english vocabulary
    English,
    /// random character runs
    Random,
}

impl WordSource {
    fn file_name(&self) -> String {
        format!("{}.json", self.to_string().to_lowercase())
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct WordList {
    pub name: String,
    pub size: u32,
    pub words: Vec<String>,
}

impl WordList {
    /// Load an embedded vocabulary file. Missing or malformed files are a
    /// packaging error, so this fails fast at startup.
    pub fn load(source: WordSource) -> Self {
        let file = WORDS_DIR
            .get_file(source.file_name())
            .expect("word list file not found");

        let contents = file
            .contents_utf8()
            .expect("word list file is not valid utf-8");

        serde_json::from_str(contents).expect("unable to deserialize word list")
    }

    /// Draw `num` words with replacement.
    pub fn sample(&self, num: usize) -> Vec<String> {
        let mut rng = rand::thread_rng();
        (0..num)
            .filter_map(|_| self.words.choose(&mut rng).cloned())
            .collect()
    }
}

/// Configuration for passage generation
#[derive(Debug, Clone)]
pub struct GenConfig {
    pub number_of_words: usize,
    pub custom_passage: Option<String>,
    pub source: WordSource,
}

/// Produces the text a test asks the user to type. The engine only sees
/// the returned string; token counting happens on its side.
pub struct PassageGenerator {
    config: GenConfig,
}

impl PassageGenerator {
    pub fn new(config: GenConfig) -> Self {
        Self { config }
    }

    pub fn generate(&self) -> String {
        if let Some(ref passage) = self.config.custom_passage {
            return passage.clone();
        }

        let words = match self.config.source {
            WordSource::English => {
                WordList::load(WordSource::English).sample(self.config.number_of_words)
            }
            WordSource::Random => random_words(self.config.number_of_words),
        };

        words.join(" ")
    }
}

fn random_words(num: usize) -> Vec<String> {
    let charset: Vec<char> = RANDOM_CHARSET.chars().collect();
    let mut rng = rand::thread_rng();

    (0..num)
        .map(|_| {
            let len = rng.gen_range(1..=MAX_RANDOM_WORD_LEN);
            (0..len).map(|_| charset[rng.gen_range(0..charset.len())]).collect()
        })
        .collect()
}
