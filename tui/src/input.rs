use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;

/// Minimal single-line prompt editor: plain text plus a char-indexed cursor.
#[derive(Debug, Default)]
pub struct PromptInput {
    chars: Vec<char>,
    cursor: usize,
}

impl PromptInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn handle_paste(&mut self, pasted: &str) {
        for ch in pasted.chars() {
            if ch != '\r' && ch != '\n' {
                self.chars.insert(self.cursor, ch);
                self.cursor += 1;
            }
        }
    }

    /// Returns true when the event changed the buffer or cursor.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(ch) => {
                self.chars.insert(self.cursor, ch);
                self.cursor += 1;
                true
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.chars.remove(self.cursor);
                    true
                } else {
                    false
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.chars.len() {
                    self.chars.remove(self.cursor);
                    true
                } else {
                    false
                }
            }
            KeyCode::Left => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    true
                } else {
                    false
                }
            }
            KeyCode::Right => {
                if self.cursor < self.chars.len() {
                    self.cursor += 1;
                    true
                } else {
                    false
                }
            }
            KeyCode::Home => {
                self.cursor = 0;
                true
            }
            KeyCode::End => {
                self.cursor = self.chars.len();
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn typing_and_editing_updates_the_buffer() {
        let mut input = PromptInput::new();
        for ch in "plan".chars() {
            input.handle_key(key(KeyCode::Char(ch)));
        }
        assert_eq!(input.text(), "plan");

        input.handle_key(key(KeyCode::Backspace));
        assert_eq!(input.text(), "pla");

        input.handle_key(key(KeyCode::Home));
        input.handle_key(key(KeyCode::Delete));
        assert_eq!(input.text(), "la");
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn paste_strips_newlines() {
        let mut input = PromptInput::new();
        input.handle_paste("two\nlines");
        assert_eq!(input.text(), "twolines");
    }
}
