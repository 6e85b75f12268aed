//! Content descriptor (`.dat`) parsing
//!
//! Descriptors are streamed with quick-xml; element names are matched
//! case-insensitively because exports mix `TITLE` and `title` freely.

use crate::extract::Extracted;
use crate::model::ContentType;
use crate::{ExtractError, ExtractResult};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::path::Path;

/// Content handler value marking a descriptor as a link to a collection file
const FILE_LINK_HANDLER: &str = "resource/x-bb-file";

/// Running state while streaming a descriptor
#[derive(Debug, Default)]
struct DescriptorState {
    is_announcement: bool,
    is_discussion: bool,
    is_assessment: bool,
    is_file_link: bool,
    in_text: bool,
    in_assessment_type: bool,
    title: String,
    assessment_type: String,
    text: String,
    file_link: Option<String>,
}

impl DescriptorState {
    fn start_element(&mut self, element: &BytesStart<'_>, path: &Path) -> ExtractResult<()> {
        let name = element.name();
        let name = name.as_ref();

        if name.eq_ignore_ascii_case(b"announcement") {
            self.is_announcement = true;
        }
        if name.eq_ignore_ascii_case(b"forum") {
            self.is_discussion = true;
        }

        let is_assessment_element = name.eq_ignore_ascii_case(b"assessment");
        if is_assessment_element {
            self.is_assessment = true;
        }
        if self.is_assessment && name.eq_ignore_ascii_case(b"bbmd_assessmenttype") {
            self.in_assessment_type = true;
        }
        if name.eq_ignore_ascii_case(b"text") {
            self.in_text = true;
        }

        let is_title = name.eq_ignore_ascii_case(b"title");
        let is_content_handler = name.eq_ignore_ascii_case(b"contenthandler");
        let is_link_name = name.eq_ignore_ascii_case(b"linkname");

        for attr in element.attributes() {
            let attr = attr.map_err(|e| xml_error(path, e))?;
            let value = attr.unescape_value().map_err(|e| xml_error(path, e))?;
            let key = attr.key.as_ref();

            if is_assessment_element && key == b"title" {
                self.title = value.to_string();
            }
            if is_title && key == b"value" {
                self.title = value.to_string();
            }
            if is_content_handler && key == b"value" && value == FILE_LINK_HANDLER {
                self.is_file_link = true;
            }
            if self.is_file_link && is_link_name && key == b"value" {
                self.file_link = Some(value.to_string());
            }
            // Text payloads are also flagged by type attributes such as `type="SMART_TEXT"`
            if value.contains("TEXT") {
                self.in_text = true;
            }
        }

        Ok(())
    }

    fn characters(&mut self, chars: &str) {
        if self.in_text {
            self.text.push_str(chars);
        }
        if self.in_assessment_type {
            self.assessment_type = chars.to_string();
        }
    }

    fn end_element(&mut self) {
        self.in_text = false;
        if self.is_assessment {
            self.in_assessment_type = false;
        }
    }

    /// First matching marker wins
    fn content_type(&self) -> ContentType {
        if self.is_announcement {
            ContentType::Announcement
        } else if self.is_discussion {
            ContentType::DiscussionForum
        } else if self.is_assessment {
            ContentType::Assessment
        } else {
            ContentType::Unclassified
        }
    }

    fn finish(self) -> Extracted {
        let content_type = self.content_type();

        let (title, assessment_type) = if content_type == ContentType::Assessment {
            (
                format!("{}: {}", self.assessment_type, self.title),
                Some(self.assessment_type),
            )
        } else {
            (self.title, None)
        };

        let raw_text = if self.is_announcement || self.is_discussion {
            String::new()
        } else {
            self.text
        };

        Extracted {
            title,
            content_type,
            assessment_type,
            raw_text,
            file_link: self.file_link,
        }
    }
}

/// Parses one content descriptor
///
/// # Arguments
///
/// * `xml` - The descriptor document
/// * `path` - Source path, used for error reporting
/// * `buf` - Scratch buffer reused across calls
///
/// # Returns
///
/// * `Ok(Extracted)` - Title, content type, assessment type and text payload
/// * `Err(ExtractError::Xml)` - The document is not well-formed
pub fn parse_descriptor(xml: &str, path: &Path, buf: &mut Vec<u8>) -> ExtractResult<Extracted> {
    let mut reader = Reader::from_str(xml);
    let mut state = DescriptorState::default();
    buf.clear();

    loop {
        match reader.read_event_into(buf) {
            Ok(Event::Start(e)) => state.start_element(&e, path)?,
            Ok(Event::Empty(e)) => {
                state.start_element(&e, path)?;
                state.end_element();
            }
            Ok(Event::End(_)) => state.end_element(),
            Ok(Event::Text(e)) => {
                let text = e.unescape().map_err(|err| xml_error(path, err))?;
                state.characters(&text);
            }
            Ok(Event::CData(e)) => {
                let data = e.into_inner();
                state.characters(&String::from_utf8_lossy(&data));
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(path, e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(state.finish())
}

fn xml_error(path: &Path, err: impl std::fmt::Display) -> ExtractError {
    ExtractError::Xml {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
