/*!
 * TTML / ITT caption document generation.
 *
 * Builds the `tt > body > div > p*` tree for a cue sequence and serializes it
 * as indented UTF-8 XML with a declaration.
 */

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::errors::SubtitleError;
use crate::subtitle_processor::Cue;
use crate::timestamp::srt_to_ttml;

/// Default TTML namespace
pub const TTML_NAMESPACE: &str = "http://www.w3.org/ns/ttml";

/// Namespace bound to the `tts` prefix
pub const TTML_STYLING_NAMESPACE: &str = "http://www.w3.org/ns/ttml#styling";

/// Namespace bound to the `ttm` prefix
pub const TTML_METADATA_NAMESPACE: &str = "http://www.w3.org/ns/ttml#metadata";

/// Default indentation width in spaces
pub const DEFAULT_INDENT_SIZE: usize = 2;

/// Serializes cues into a TTML document
#[derive(Debug, Clone, Copy)]
pub struct IttEncoder {
    indent_size: usize,
}

impl Default for IttEncoder {
    fn default() -> Self {
        Self {
            indent_size: DEFAULT_INDENT_SIZE,
        }
    }
}

impl IttEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `indent_size` spaces per nesting level
    pub fn with_indent(indent_size: usize) -> Self {
        Self { indent_size }
    }

    pub fn indent_size(&self) -> usize {
        self.indent_size
    }

    /// Encode cues as a TTML document.
    ///
    /// `begin`/`end` come from the cue's SRT timestamps (as written in the
    /// source, when parsed) with the separator swapped, and newlines in the
    /// text are flattened to single spaces.
    pub fn encode(&self, cues: &[Cue]) -> Result<String, SubtitleError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', self.indent_size);

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut tt = BytesStart::new("tt");
        tt.push_attribute(("xmlns", TTML_NAMESPACE));
        tt.push_attribute(("xmlns:tts", TTML_STYLING_NAMESPACE));
        tt.push_attribute(("xmlns:ttm", TTML_METADATA_NAMESPACE));
        writer.write_event(Event::Start(tt))?;
        writer.write_event(Event::Start(BytesStart::new("body")))?;

        if cues.is_empty() {
            writer.write_event(Event::Empty(BytesStart::new("div")))?;
        } else {
            writer.write_event(Event::Start(BytesStart::new("div")))?;
            for cue in cues {
                self.write_paragraph(&mut writer, cue)?;
            }
            writer.write_event(Event::End(BytesEnd::new("div")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("body")))?;
        writer.write_event(Event::End(BytesEnd::new("tt")))?;

        let mut xml = String::from_utf8(writer.into_inner())
            .map_err(|e| SubtitleError::Xml(e.to_string()))?;
        xml.push('\n');
        Ok(xml)
    }

    fn write_paragraph(&self, writer: &mut Writer<Vec<u8>>, cue: &Cue) -> Result<(), SubtitleError> {
        let begin = srt_to_ttml(&cue.srt_start_text());
        let end = srt_to_ttml(&cue.srt_end_text());
        let text = flatten_text(&cue.text);

        let mut p = BytesStart::new("p");
        p.push_attribute(("begin", begin.as_str()));
        p.push_attribute(("end", end.as_str()));
        writer.write_event(Event::Start(p))?;
        writer.write_event(Event::Text(BytesText::new(&text)))?;
        writer.write_event(Event::End(BytesEnd::new("p")))?;
        Ok(())
    }
}

/// Replace every newline with a single space
fn flatten_text(text: &str) -> String {
    text.replace('\n', " ")
}
