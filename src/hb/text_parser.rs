use read_fonts::types::Tag;

pub struct TextParser<'a> {
    pos: usize,
    text: &'a str,
}

impl<'a> TextParser<'a> {
    #[inline]
    pub fn new(text: &'a str) -> Self {
        TextParser { pos: 0, text }
    }

    #[inline]
    pub fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    #[inline]
    pub fn curr_byte(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn consume_byte(&mut self, c: u8) -> Option<()> {
        if self.curr_byte()? == c {
            self.advance(1);
            Some(())
        } else {
            None
        }
    }

    pub fn skip_spaces(&mut self) {
        while self.curr_byte().is_some_and(|c| c.is_ascii_whitespace()) {
            self.advance(1);
        }
    }

    pub fn consume_quote(&mut self) -> Option<u8> {
        let c = self.curr_byte()?;
        if matches!(c, b'\'' | b'"') {
            self.advance(1);
            Some(c)
        } else {
            None
        }
    }

    pub fn consume_bytes<F>(&mut self, f: F) -> &'a str
    where
        F: Fn(u8) -> bool,
    {
        let start = self.pos;
        while self.curr_byte().is_some_and(&f) {
            self.advance(1);
        }
        &self.text[start..self.pos]
    }

    pub fn consume_tag(&mut self) -> Option<Tag> {
        let tag = self.consume_bytes(|c| c.is_ascii_alphanumeric() || c == b'_');
        if tag.is_empty() || tag.len() > 4 {
            return None;
        }
        Some(crate::hb::common::tag_from_str_lossy(tag))
    }

    pub fn consume_i32(&mut self) -> Option<i32> {
        let start = self.pos;

        if matches!(self.curr_byte(), Some(b'-') | Some(b'+')) {
            self.advance(1);
        }

        self.consume_bytes(|c| c.is_ascii_digit());
        match self.text[start..self.pos].parse() {
            Ok(n) => Some(n),
            Err(_) => {
                self.pos = start;
                None
            }
        }
    }

    pub fn consume_f32(&mut self) -> Option<f32> {
        let start = self.pos;

        if matches!(self.curr_byte(), Some(b'-') | Some(b'+')) {
            self.advance(1);
        }

        self.consume_bytes(|c| c.is_ascii_digit());
        if self.consume_byte(b'.').is_some() {
            self.consume_bytes(|c| c.is_ascii_digit());
        }

        match self.text[start..self.pos].parse() {
            Ok(n) => Some(n),
            Err(_) => {
                self.pos = start;
                None
            }
        }
    }

    pub fn consume_bool(&mut self) -> Option<bool> {
        self.skip_spaces();

        let value = self.consume_bytes(|c| c.is_ascii_alphabetic());
        match value.to_ascii_lowercase().as_str() {
            "on" | "true" => Some(true),
            "off" | "false" => Some(false),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers() {
        let mut p = TextParser::new("-12abc");
        assert_eq!(p.consume_i32(), Some(-12));
        assert_eq!(p.consume_i32(), None);
        assert_eq!(p.consume_tag(), Some(Tag::new(b"abc ")));
        assert!(p.at_end());

        let mut p = TextParser::new("1.25");
        assert_eq!(p.consume_f32(), Some(1.25));
    }

    #[test]
    fn long_tags_are_rejected() {
        let mut p = TextParser::new("kerning");
        assert_eq!(p.consume_tag(), None);
    }
}
