//! Small XML builder over a reusable byte buffer

/// Appends XML markup to an in-memory buffer
///
/// Writing into a `Vec<u8>` cannot fail, so none of the methods return
/// `Result`. The finished bytes are handed to the ZIP entry in one call.
pub(crate) struct XmlWriter {
    buffer: Vec<u8>,
    itoa: itoa::Buffer,
}

impl XmlWriter {
    pub fn with_capacity(capacity: usize) -> Self {
        XmlWriter {
            buffer: Vec::with_capacity(capacity),
            itoa: itoa::Buffer::new(),
        }
    }

    /// Write raw bytes directly
    #[inline]
    pub fn write_raw(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    #[inline]
    pub fn write_str(&mut self, s: &str) {
        self.write_raw(s.as_bytes());
    }

    /// Write `<name` (attributes may follow)
    #[inline]
    pub fn start_element(&mut self, name: &str) {
        self.write_raw(b"<");
        self.write_str(name);
    }

    #[inline]
    pub fn close_start_tag(&mut self) {
        self.write_raw(b">");
    }

    /// Close a start tag as self-closing: `/>`
    #[inline]
    pub fn close_empty(&mut self) {
        self.write_raw(b"/>");
    }

    #[inline]
    pub fn end_element(&mut self, name: &str) {
        self.write_raw(b"</");
        self.write_str(name);
        self.write_raw(b">");
    }

    #[inline]
    pub fn attribute(&mut self, name: &str, value: &str) {
        self.write_raw(b" ");
        self.write_str(name);
        self.write_raw(b"=\"");
        self.write_escaped(value);
        self.write_raw(b"\"");
    }

    #[inline]
    pub fn attribute_int(&mut self, name: &str, value: u64) {
        self.write_raw(b" ");
        self.write_str(name);
        self.write_raw(b"=\"");
        let digits = self.itoa.format(value);
        self.buffer.extend_from_slice(digits.as_bytes());
        self.write_raw(b"\"");
    }

    /// Write text content with XML escaping
    pub fn write_escaped(&mut self, text: &str) {
        for ch in text.chars() {
            match ch {
                '&' => self.write_raw(b"&amp;"),
                '<' => self.write_raw(b"&lt;"),
                '>' => self.write_raw(b"&gt;"),
                '"' => self.write_raw(b"&quot;"),
                '\'' => self.write_raw(b"&apos;"),
                // XML 1.0 only allows tab, LF and CR below U+0020
                c if (c as u32) < 0x20 && c != '\t' && c != '\n' && c != '\r' => continue,
                c => {
                    let mut buf = [0u8; 4];
                    self.buffer
                        .extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                }
            }
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }
}
