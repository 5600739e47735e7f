//! [`MimeReader`] over a message parsed with `mailparse`.

use std::io::{self, Cursor, Read};
use std::slice;

use mailparse::{parse_headers, DispositionType, MailHeaderMap, ParsedMail};

use super::{HeaderKind, HeaderLookup, MimeReader, Part};
use crate::error::MimeError;

/// Walks the leaf parts of a parsed message, depth first, exactly once.
///
/// Multipart containers are descended but never handed out. A message that
/// is not multipart yields itself as its only part.
pub struct ParsedMailReader<'a> {
    mail: &'a ParsedMail<'a>,
    stack: Vec<slice::Iter<'a, ParsedMail<'a>>>,
    root_pending: bool,
}

impl<'a> ParsedMailReader<'a> {
    pub fn new(mail: &'a ParsedMail<'a>) -> Self {
        let multipart = is_multipart(mail);
        Self {
            mail,
            stack: if multipart {
                vec![mail.subparts.iter()]
            } else {
                Vec::new()
            },
            root_pending: !multipart,
        }
    }

    fn part(&self, mail: &ParsedMail<'_>) -> Part<PartBody> {
        let header = match mail.get_content_disposition().disposition {
            DispositionType::Attachment => HeaderKind::Absent,
            _ => HeaderKind::Present,
        };

        let body = match mail.get_body_raw() {
            Ok(bytes) => PartBody::new(bytes),
            Err(e) => PartBody::failed(e.to_string()),
        };

        Part {
            header,
            content_type: mail.ctype.mimetype.to_lowercase(),
            body,
        }
    }
}

impl HeaderLookup for ParsedMailReader<'_> {
    fn header(&self, name: &str) -> Option<String> {
        self.mail.headers.get_first_value(name)
    }
}

impl MimeReader for ParsedMailReader<'_> {
    type Body = PartBody;
    type Embedded = OwnedHeaders;

    fn next_part(&mut self) -> Result<Option<Part<PartBody>>, MimeError> {
        if self.root_pending {
            self.root_pending = false;
            return Ok(Some(self.part(self.mail)));
        }

        while let Some(parts) = self.stack.last_mut() {
            match parts.next() {
                Some(next) if is_multipart(next) => self.stack.push(next.subparts.iter()),
                Some(next) => return Ok(Some(self.part(next))),
                None => {
                    self.stack.pop();
                }
            }
        }

        Ok(None)
    }

    fn parse_embedded(&self, body: &mut dyn Read) -> Result<OwnedHeaders, MimeError> {
        let mut raw = Vec::new();
        body.read_to_end(&mut raw)?;

        let (headers, _) = parse_headers(&raw)?;
        Ok(OwnedHeaders(
            headers
                .iter()
                .map(|h| (h.get_key(), h.get_value()))
                .collect(),
        ))
    }
}

fn is_multipart(mail: &ParsedMail<'_>) -> bool {
    mail.ctype.mimetype.to_lowercase().starts_with("multipart/")
}

/// A transfer-decoded part body.
///
/// If decoding failed, the first read reports it as an I/O error.
#[derive(Debug)]
pub struct PartBody {
    data: Cursor<Vec<u8>>,
    fault: Option<String>,
}

impl PartBody {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data: Cursor::new(data),
            fault: None,
        }
    }

    pub fn failed(reason: String) -> Self {
        Self {
            data: Cursor::new(Vec::new()),
            fault: Some(reason),
        }
    }
}

impl Read for PartBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if let Some(reason) = self.fault.take() {
            return Err(io::Error::new(io::ErrorKind::InvalidData, reason));
        }
        self.data.read(buf)
    }
}

/// Headers of an embedded message, detached from its source buffer.
#[derive(Debug, Clone, Default)]
pub struct OwnedHeaders(pub Vec<(String, String)>);

impl HeaderLookup for OwnedHeaders {
    fn header(&self, name: &str) -> Option<String> {
        self.0
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mime::read_body;
    use mailparse::parse_mail;

    fn content_types(reader: &mut ParsedMailReader<'_>) -> Vec<String> {
        let mut seen = Vec::new();
        while let Some(part) = reader.next_part().unwrap() {
            seen.push(part.content_type);
        }
        seen
    }

    #[test]
    fn test_single_part_yields_itself_once() {
        let raw = "Subject: Hi\r\nContent-Type: text/plain\r\n\r\nthanks, got it\r\n";
        let mail = parse_mail(raw.as_bytes()).unwrap();
        let mut reader = ParsedMailReader::new(&mail);

        let part = reader.next_part().unwrap().unwrap();
        assert_eq!(part.header, HeaderKind::Present);
        assert_eq!(part.content_type, "text/plain");
        assert!(read_body(part.body).unwrap().contains("thanks, got it"));

        assert!(reader.next_part().unwrap().is_none());
        assert!(reader.next_part().unwrap().is_none());
    }

    #[test]
    fn test_nested_multipart_is_flattened_in_order() {
        let raw = r#"Content-Type: multipart/mixed; boundary="outer"

--outer
Content-Type: multipart/alternative; boundary="inner"

--inner
Content-Type: text/plain

Plain text

--inner
Content-Type: text/html

<html><body>HTML</body></html>

--inner--

--outer
Content-Type: message/delivery-status

Final-Recipient: rfc822; bob@example.com

--outer--"#;

        let mail = parse_mail(raw.as_bytes()).unwrap();
        let mut reader = ParsedMailReader::new(&mail);

        assert_eq!(
            content_types(&mut reader),
            vec!["text/plain", "text/html", "message/delivery-status"]
        );
    }

    #[test]
    fn test_attachment_parts_have_no_header() {
        let raw = r#"Content-Type: multipart/mixed; boundary="b"

--b
Content-Type: text/plain

inline body

--b
Content-Type: text/plain
Content-Disposition: attachment; filename="log.txt"

attached body

--b--"#;

        let mail = parse_mail(raw.as_bytes()).unwrap();
        let mut reader = ParsedMailReader::new(&mail);

        let first = reader.next_part().unwrap().unwrap();
        let second = reader.next_part().unwrap().unwrap();
        assert_eq!(first.header, HeaderKind::Present);
        assert_eq!(second.header, HeaderKind::Absent);
    }

    #[test]
    fn test_top_level_header_lookup_is_case_insensitive() {
        let raw = "X-Failed-Recipients: alice@x.com\r\nSubject: Undelivered\r\n\r\n";
        let mail = parse_mail(raw.as_bytes()).unwrap();
        let reader = ParsedMailReader::new(&mail);

        assert_eq!(
            reader.header("x-failed-recipients"),
            Some("alice@x.com".to_string())
        );
        assert_eq!(reader.header("To"), None);
    }

    #[test]
    fn test_parse_embedded_reads_headers() {
        let mail = parse_mail(b"Subject: x\r\n\r\n").unwrap();
        let reader = ParsedMailReader::new(&mail);
        let mut body = PartBody::new(b"To: carol@example.org\r\nSubject: hello\r\n\r\nbody".to_vec());

        let embedded = reader.parse_embedded(&mut body).unwrap();
        assert_eq!(embedded.header("to"), Some("carol@example.org".to_string()));
    }

    #[test]
    fn test_failed_body_reports_on_read() {
        let err = read_body(PartBody::failed("bad base64".to_string())).unwrap_err();
        assert!(err.to_string().contains("bad base64"));
    }
}
