use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    Submit,
    Cancel,
}

/// Single-line text field used by the name prompt.
pub struct LineInput {
    text: String,
    /// Cursor position as a char index (0 = before first char).
    cursor: usize,
    max_chars: usize,
}

impl LineInput {
    pub fn new(text: &str, max_chars: usize) -> Self {
        let text: String = text.chars().take(max_chars).collect();
        let cursor = text.chars().count();
        Self {
            text,
            cursor,
            max_chars,
        }
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Returns (before_cursor, cursor_char, after_cursor) for styled rendering.
    /// When cursor is at end of text, cursor_char is None.
    pub fn render_parts(&self) -> (&str, Option<char>, &str) {
        let byte_offset = self.char_to_byte(self.cursor);
        match self.text[byte_offset..].chars().next() {
            Some(ch) => {
                let next_byte = byte_offset + ch.len_utf8();
                (&self.text[..byte_offset], Some(ch), &self.text[next_byte..])
            }
            None => (&self.text, None, ""),
        }
    }

    pub fn handle(&mut self, key: KeyEvent) -> InputResult {
        let len = self.text.chars().count();
        match key.code {
            KeyCode::Esc => return InputResult::Cancel,
            KeyCode::Enter => return InputResult::Submit,
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(len),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = len,
            KeyCode::Backspace if self.cursor > 0 => {
                self.remove_char_at(self.cursor - 1);
                self.cursor -= 1;
            }
            KeyCode::Delete if self.cursor < len => self.remove_char_at(self.cursor),
            KeyCode::Char('a') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.cursor = 0;
            }
            KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.cursor = len;
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => self.clear(),
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if len < self.max_chars {
                    let byte_offset = self.char_to_byte(self.cursor);
                    self.text.insert(byte_offset, ch);
                    self.cursor += 1;
                }
            }
            _ => {}
        }
        InputResult::Continue
    }

    /// Convert char index to byte offset.
    fn char_to_byte(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }

    fn remove_char_at(&mut self, char_idx: usize) {
        let byte_offset = self.char_to_byte(char_idx);
        if let Some(ch) = self.text[byte_offset..].chars().next() {
            self.text
                .replace_range(byte_offset..byte_offset + ch.len_utf8(), "");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    fn type_str(input: &mut LineInput, s: &str) {
        for ch in s.chars() {
            input.handle(key(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn insert_at_start_middle_end() {
        let mut input = LineInput::new("", 40);
        type_str(&mut input, "ac");
        input.handle(key(KeyCode::Left));
        type_str(&mut input, "b");
        input.handle(key(KeyCode::Home));
        type_str(&mut input, ">");
        assert_eq!(input.value(), ">abc");
    }

    #[test]
    fn backspace_and_delete_at_boundaries() {
        let mut input = LineInput::new("ab", 40);
        input.handle(key(KeyCode::Delete));
        assert_eq!(input.value(), "ab");
        input.handle(key(KeyCode::Backspace));
        assert_eq!(input.value(), "a");
        input.handle(key(KeyCode::Home));
        input.handle(key(KeyCode::Backspace));
        assert_eq!(input.value(), "a");
        input.handle(key(KeyCode::Delete));
        assert_eq!(input.value(), "");
    }

    #[test]
    fn multibyte_chars_edit_cleanly() {
        let mut input = LineInput::new("Zoë", 40);
        input.handle(key(KeyCode::Backspace));
        assert_eq!(input.value(), "Zo");
        type_str(&mut input, "é");
        assert_eq!(input.value(), "Zoé");
    }

    #[test]
    fn max_chars_is_enforced() {
        let mut input = LineInput::new("", 3);
        type_str(&mut input, "abcdef");
        assert_eq!(input.value(), "abc");
    }

    #[test]
    fn ctrl_shortcuts() {
        let mut input = LineInput::new("hello", 40);
        input.handle(ctrl('a'));
        type_str(&mut input, "_");
        input.handle(ctrl('e'));
        type_str(&mut input, "!");
        assert_eq!(input.value(), "_hello!");
        input.handle(ctrl('u'));
        assert_eq!(input.value(), "");
    }

    #[test]
    fn render_parts_positions() {
        let mut input = LineInput::new("abc", 40);
        assert_eq!(input.render_parts(), ("abc", None, ""));
        input.handle(key(KeyCode::Left));
        assert_eq!(input.render_parts(), ("ab", Some('c'), ""));
        input.handle(key(KeyCode::Home));
        assert_eq!(input.render_parts(), ("", Some('a'), "bc"));
    }

    #[test]
    fn submit_and_cancel() {
        let mut input = LineInput::new("", 40);
        assert_eq!(input.handle(key(KeyCode::Enter)), InputResult::Submit);
        assert_eq!(input.handle(key(KeyCode::Esc)), InputResult::Cancel);
        assert_eq!(input.handle(key(KeyCode::Char('x'))), InputResult::Continue);
    }
}
