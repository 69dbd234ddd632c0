//! Single-line text input
//!
//! While a [`TextEdit`] is active every printable key goes into its buffer;
//! Enter hands the text to whatever the edit targets.

/// What the typed text is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    /// The patient search query; applied on every keystroke
    SearchQuery,
    /// A field of the open form, by index
    Field(usize),
    /// New email address of a staff account
    UserEmail(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub target: EditTarget,
    pub buffer: String,
    /// Hide the buffer when drawing it
    pub secret: bool,
}

impl TextEdit {
    pub fn new(target: EditTarget, initial: impl Into<String>) -> Self {
        Self {
            target,
            buffer: initial.into(),
            secret: false,
        }
    }

    pub fn secret(mut self, secret: bool) -> Self {
        self.secret = secret;
        self
    }

    pub fn push(&mut self, c: char) {
        if !c.is_control() {
            self.buffer.push(c);
        }
    }

    pub fn pop(&mut self) {
        self.buffer.pop();
    }

    /// Buffer as it should be drawn
    pub fn display(&self) -> String {
        if self.secret {
            "*".repeat(self.buffer.chars().count())
        } else {
            self.buffer.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_pop() {
        let mut edit = TextEdit::new(EditTarget::SearchQuery, "ad");
        edit.push('a');
        edit.push('\n');
        assert_eq!(edit.buffer, "ada");
        edit.pop();
        assert_eq!(edit.buffer, "ad");
    }

    #[test]
    fn test_secret_is_masked() {
        let edit = TextEdit::new(EditTarget::Field(1), "hunter2").secret(true);
        assert_eq!(edit.display(), "*******");
    }
}
