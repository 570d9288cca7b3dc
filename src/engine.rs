use std::time::SystemTime;

#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

/// One resolved keystroke: the key that was pressed and whether it matched
/// the grapheme that was expected at the time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Keystroke {
    pub key: char,
    pub outcome: Outcome,
}

/// State machine for a single typing attempt.
///
/// The passage is fixed at construction; `cursor` indexes the next
/// unconsumed grapheme, so the unresolved remainder is `passage[cursor..]`
/// and undo is a log rewind rather than any splicing of the passage.
#[derive(Debug)]
pub struct Engine {
    passage: Vec<char>,
    cursor: usize,
    history: Vec<Keystroke>,
    pub word_count: usize,
    pub started_at: Option<SystemTime>,
    pub finished_at: Option<SystemTime>,
}

impl Engine {
    pub fn new(passage: &str) -> Self {
        Self {
            passage: passage.chars().collect(),
            cursor: 0,
            history: Vec::new(),
            word_count: passage.split_whitespace().count(),
            started_at: None,
            finished_at: None,
        }
    }

    /// Graphemes not yet resolved, in passage order.
    pub fn remaining(&self) -> &[char] {
        &self.passage[self.cursor..]
    }

    /// Every keystroke resolved so far, oldest first.
    pub fn history(&self) -> &[Keystroke] {
        &self.history
    }

    pub fn passage(&self) -> String {
        self.passage.iter().collect()
    }

    fn expected(&self) -> Option<char> {
        self.passage.get(self.cursor).copied()
    }

    /// Resolve one keystroke against the front of the remainder.
    ///
    /// A matching key consumes the expected grapheme; a mismatch leaves the
    /// remainder untouched. Either way the keystroke lands in history, so
    /// the rendered line shows exactly what was pressed. The clock starts
    /// on the first keystroke, not at construction, and stops the instant
    /// the last grapheme is consumed.
    pub fn write(&mut self, key: char) {
        if self.has_finished() {
            // completion was already surfaced; never resolve past the end
            return;
        }

        if self.started_at.is_none() {
            self.started_at = Some(SystemTime::now());
        }

        let outcome = match self.expected() {
            Some(c) if c == key => {
                self.cursor += 1;
                Outcome::Correct
            }
            _ => Outcome::Incorrect,
        };

        self.history.push(Keystroke { key, outcome });

        if self.cursor == self.passage.len() {
            self.finish();
        }
    }

    /// Resolve pasted text one constituent char at a time.
    /// Completion is honored after each char, so trailing input past the
    /// end of the passage is dropped.
    pub fn write_str(&mut self, keys: &str) {
        for c in keys.chars() {
            self.write(c);
        }
    }

    /// Undo the most recent keystroke.
    ///
    /// Only a correct keystroke ever consumed a grapheme, so only undoing
    /// a correct one rewinds the cursor; an incorrect keystroke is simply
    /// dropped from history.
    pub fn backspace(&mut self) {
        if let Some(last) = self.history.pop() {
            if last.outcome == Outcome::Correct {
                self.cursor -= 1;
            }
        }
    }

    fn backspace_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.history.last().is_some_and(|k| pred(k.key)) {
            self.backspace();
        }
    }

    /// Delete back to the previous word boundary (ctrl+w): the trailing
    /// run of spaces, then the trailing run of non-spaces.
    pub fn delete_word(&mut self) {
        self.backspace_while(|c| c == ' ');
        self.backspace_while(|c| c != ' ');
    }

    /// Delete everything typed so far (ctrl+u). Replays single-step undo
    /// so the cursor bookkeeping stays consistent with history.
    pub fn clear_line(&mut self) {
        self.backspace_while(|_| true);
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn has_finished(&self) -> bool {
        self.cursor == self.passage.len()
    }

    fn finish(&mut self) {
        if self.finished_at.is_none() {
            self.finished_at = Some(SystemTime::now());
        }
    }

    /// Wall-clock duration of the attempt. `None` until finished.
    pub fn elapsed_secs(&self) -> Option<f64> {
        let started = self.started_at?;
        let finished = self.finished_at?;
        finished
            .duration_since(started)
            .ok()
            .map(|d| d.as_secs_f64())
    }

    /// Words per minute over the full attempt. `None` until finished, or
    /// if the elapsed time degenerates to zero (mocked clocks).
    pub fn wpm(&self) -> Option<f64> {
        let secs = self.elapsed_secs()?;
        if secs > 0.0 {
            Some(self.word_count as f64 * 60.0 / secs)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::time::Duration;

    fn typed(engine: &Engine) -> String {
        engine.history().iter().map(|k| k.key).collect()
    }

    fn correct_keys(engine: &Engine) -> String {
        engine
            .history()
            .iter()
            .filter(|k| k.outcome == Outcome::Correct)
            .map(|k| k.key)
            .collect()
    }

    #[test]
    fn test_new_engine() {
        let engine = Engine::new("hello world");

        assert_eq!(engine.remaining().len(), 11);
        assert_eq!(engine.history().len(), 0);
        assert_eq!(engine.word_count, 2);
        assert!(!engine.has_started());
        assert!(!engine.has_finished());
        assert_eq!(engine.elapsed_secs(), None);
        assert_eq!(engine.wpm(), None);
    }

    #[test]
    fn test_write_correct_char() {
        let mut engine = Engine::new("test");

        engine.write('t');

        assert_eq!(engine.history().len(), 1);
        assert_eq!(engine.history()[0].key, 't');
        assert_matches!(engine.history()[0].outcome, Outcome::Correct);
        assert_eq!(engine.remaining(), &['e', 's', 't']);
        assert!(engine.has_started());
    }

    #[test]
    fn test_write_incorrect_char() {
        let mut engine = Engine::new("test");

        engine.write('x');

        assert_eq!(engine.history().len(), 1);
        assert_eq!(engine.history()[0].key, 'x');
        assert_matches!(engine.history()[0].outcome, Outcome::Incorrect);
        // An incorrect keystroke consumes nothing
        assert_eq!(engine.remaining(), &['t', 'e', 's', 't']);
    }

    #[test]
    fn test_clock_starts_on_first_keystroke() {
        let mut engine = Engine::new("ab");
        assert!(engine.started_at.is_none());

        engine.write('x');
        let first = engine.started_at;
        assert!(first.is_some());

        // Further keystrokes never restart the clock
        engine.write('a');
        assert_eq!(engine.started_at, first);
    }

    #[test]
    fn test_backspace_restores_correct_key() {
        let mut engine = Engine::new("hi hi");

        engine.write('h');
        assert_eq!(engine.remaining(), &['i', ' ', 'h', 'i']);

        engine.backspace();
        assert_eq!(engine.remaining(), &['h', 'i', ' ', 'h', 'i']);
        assert_eq!(engine.history().len(), 0);
    }

    #[test]
    fn test_backspace_on_incorrect_key_leaves_remaining() {
        let mut engine = Engine::new("hi");

        engine.write('x');
        engine.backspace();

        assert_eq!(engine.remaining(), &['h', 'i']);
        assert_eq!(engine.history().len(), 0);
    }

    #[test]
    fn test_backspace_on_empty_history() {
        let mut engine = Engine::new("hi");

        engine.backspace();

        assert_eq!(engine.history().len(), 0);
        assert_eq!(engine.remaining(), &['h', 'i']);
    }

    #[test]
    fn test_undo_is_inverse_of_write() {
        let mut engine = Engine::new("abc abc");

        // Mixed correct and incorrect keystrokes
        for c in "abx c".chars() {
            engine.write(c);
        }
        let pressed = engine.history().len();

        for _ in 0..pressed {
            engine.backspace();
        }

        assert_eq!(engine.history().len(), 0);
        assert_eq!(engine.remaining(), "abc abc".chars().collect::<Vec<_>>());
        // Undo restores the partition, but the clock stays started
        assert!(engine.has_started());
    }

    #[test]
    fn test_partition_invariant_through_random_ops() {
        let passage = "the quick brown fox";
        let mut engine = Engine::new(passage);

        for c in "the quxck br".chars() {
            engine.write(c);
        }
        engine.backspace();
        engine.delete_word();
        engine.write('o');

        let correct = correct_keys(&engine);
        let reconstructed: String = correct
            .chars()
            .chain(engine.remaining().iter().copied())
            .collect();
        assert_eq!(reconstructed, passage);
        assert_eq!(correct.chars().count() + engine.remaining().len(), 19);
    }

    #[test]
    fn test_delete_word_stops_at_boundary() {
        let mut engine = Engine::new("foo bar baz");

        for c in "foo bar baz".chars() {
            engine.write(c);
        }
        assert!(engine.has_finished());

        engine.delete_word();

        // No trailing space run, so only the last word is removed and the
        // space before it survives
        assert_eq!(typed(&engine), "foo bar ");
        assert_eq!(engine.remaining(), "baz".chars().collect::<Vec<_>>());
    }

    #[test]
    fn test_delete_word_consumes_trailing_space() {
        let mut engine = Engine::new("foo bar baz");

        for c in "foo bar ".chars() {
            engine.write(c);
        }
        engine.delete_word();

        // The trailing space run goes first, then the word before it
        assert_eq!(typed(&engine), "foo ");
        assert_eq!(
            engine.remaining(),
            "bar baz".chars().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_delete_word_mid_word() {
        let mut engine = Engine::new("foo bar");

        for c in "foo ba".chars() {
            engine.write(c);
        }
        engine.delete_word();

        // No trailing space run, so only the partial word is removed
        assert_eq!(typed(&engine), "foo ");
    }

    #[test]
    fn test_delete_word_on_single_word() {
        let mut engine = Engine::new("foo");

        for c in "foo".chars() {
            engine.write(c);
        }
        engine.delete_word();

        assert_eq!(engine.history().len(), 0);
        assert_eq!(engine.remaining(), &['f', 'o', 'o']);
    }

    #[test]
    fn test_delete_word_with_incorrect_keys() {
        let mut engine = Engine::new("foo bar");

        for c in "foo bxr".chars() {
            engine.write(c);
        }
        engine.delete_word();

        assert_eq!(typed(&engine), "foo ");
        assert_eq!(engine.remaining(), "bar".chars().collect::<Vec<_>>());
    }

    #[test]
    fn test_clear_line() {
        let mut engine = Engine::new("hello world");

        for c in "helxo wor".chars() {
            engine.write(c);
        }
        engine.clear_line();

        assert_eq!(engine.history().len(), 0);
        assert_eq!(
            engine.remaining(),
            "hello world".chars().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_completion_triggers_once() {
        let mut engine = Engine::new("hi");

        engine.write('h');
        assert!(!engine.has_finished());
        assert!(engine.finished_at.is_none());

        engine.write('i');
        assert!(engine.has_finished());
        let finished = engine.finished_at;
        assert!(finished.is_some());

        // Writes after completion are no-ops
        engine.write('z');
        assert_eq!(engine.history().len(), 2);
        assert_eq!(engine.finished_at, finished);
    }

    #[test]
    fn test_completion_despite_errors() {
        // A mistyped key is recorded but does not block completion
        let mut engine = Engine::new("hi hi");

        for c in ['h', 'i', ' ', 'x', 'h', 'i'] {
            engine.write(c);
        }

        assert!(engine.has_finished());
        assert_eq!(engine.remaining().len(), 0);
        assert_eq!(engine.history().len(), 6);
        let correct = engine
            .history()
            .iter()
            .filter(|k| k.outcome == Outcome::Correct)
            .count();
        assert_eq!(correct, 5);
        assert_eq!(engine.word_count, 2);
    }

    #[test]
    fn test_single_correct_then_undo_scenario() {
        let mut engine = Engine::new("hi hi");

        engine.write('h');
        engine.backspace();

        assert_eq!(
            engine.remaining(),
            "hi hi".chars().collect::<Vec<_>>()
        );
        assert_eq!(engine.history().len(), 0);
    }

    #[test]
    fn test_write_str_resolves_each_char() {
        let mut engine = Engine::new("enter");

        engine.write_str("enter");

        assert!(engine.has_finished());
        assert_eq!(engine.history().len(), 5);
    }

    #[test]
    fn test_write_str_stops_at_completion() {
        let mut engine = Engine::new("hi");

        engine.write_str("hi there");

        assert!(engine.has_finished());
        // " there" arrived after the passage emptied and was dropped
        assert_eq!(engine.history().len(), 2);
    }

    #[test]
    fn test_word_count_ignores_extra_whitespace() {
        let engine = Engine::new("  two  words ");
        assert_eq!(engine.word_count, 2);
    }

    #[test]
    fn test_empty_passage_is_finished() {
        let mut engine = Engine::new("");

        assert!(engine.has_finished());
        engine.write('a');
        assert_eq!(engine.history().len(), 0);
    }

    #[test]
    fn test_elapsed_and_wpm() {
        let mut engine = Engine::new("hi hi");
        for c in "hi hi".chars() {
            engine.write(c);
        }
        assert!(engine.has_finished());

        // Pin the interval so the math is exact
        let start = SystemTime::UNIX_EPOCH;
        engine.started_at = Some(start);
        engine.finished_at = Some(start + Duration::from_secs(30));

        assert_eq!(engine.elapsed_secs(), Some(30.0));
        assert_eq!(engine.wpm(), Some(4.0)); // 2 words in half a minute
    }

    #[test]
    fn test_wpm_none_on_zero_elapsed() {
        let mut engine = Engine::new("a");
        engine.write('a');

        let t = SystemTime::UNIX_EPOCH;
        engine.started_at = Some(t);
        engine.finished_at = Some(t);

        assert_eq!(engine.elapsed_secs(), Some(0.0));
        assert_eq!(engine.wpm(), None);
    }

    #[test]
    fn test_wpm_none_before_finish() {
        let mut engine = Engine::new("ab");
        engine.write('a');

        assert_eq!(engine.elapsed_secs(), None);
        assert_eq!(engine.wpm(), None);
    }

    #[test]
    fn test_passage_accessor() {
        let engine = Engine::new("hi hi");
        assert_eq!(engine.passage(), "hi hi");
    }
}
