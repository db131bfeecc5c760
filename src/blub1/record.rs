use std::fmt;
use std::io::Write;
use thiserror::Error;

/// Size of the fixed Blub1 header in bytes
pub const HEADER_LEN: usize = 8;

const MAX_URL_LEN: usize = u16::MAX as usize;
const MAX_TITLE_LEN: usize = u16::MAX as usize;
const MAX_BODY_LEN: u64 = u32::MAX as u64;

/// A payload segment of a Blub1 record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Url,
    Title,
    Body,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Url => "url",
            Field::Title => "title",
            Field::Body => "body",
        };
        f.write_str(name)
    }
}

/// Errors produced while building, encoding or decoding Blub1 records
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Blub1Error {
    #[error("{field} is {len} bytes, exceeding the Blub1 limit of {max}")]
    Oversize { field: Field, len: u64, max: u64 },

    #[error("record is {len} bytes, shorter than the 8-byte header")]
    Truncated { len: usize },

    #[error("header describes {expected} bytes but record holds {actual}")]
    LengthMismatch { expected: u64, actual: u64 },

    #[error("{field} segment is not valid UTF-8")]
    InvalidUtf8 { field: Field },
}

/// One crawled page, validated against the Blub1 length limits
///
/// The only ways to obtain a record are [`Blub1Record::new`] and [`decode`],
/// so every instance is guaranteed to encode without truncation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blub1Record {
    url: String,
    title: String,
    body: String,
}

impl Blub1Record {
    /// Builds a record, rejecting any field that does not fit its header slot
    ///
    /// # Example
    ///
    /// ```
    /// use blub_crawler::blub1::Blub1Record;
    ///
    /// let record = Blub1Record::new("https://docs.rs/", "Docs.rs", "body").unwrap();
    /// assert_eq!(record.encoded_len(), 8 + 16 + 7 + 4);
    /// ```
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<Self, Blub1Error> {
        let record = Self {
            url: url.into(),
            title: title.into(),
            body: body.into(),
        };

        check_len(Field::Url, record.url.len() as u64, MAX_URL_LEN as u64)?;
        check_len(Field::Title, record.title.len() as u64, MAX_TITLE_LEN as u64)?;
        check_len(Field::Body, record.body.len() as u64, MAX_BODY_LEN)?;

        Ok(record)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Consumes the record, returning `(url, title, body)`
    pub fn into_parts(self) -> (String, String, String) {
        (self.url, self.title, self.body)
    }

    /// Total number of bytes the encoded record occupies
    pub fn encoded_len(&self) -> usize {
        HEADER_LEN + self.url.len() + self.title.len() + self.body.len()
    }

    /// Returns the fixed 8-byte header for this record
    pub fn header(&self) -> [u8; HEADER_LEN] {
        // Lengths were checked in `new`, so the narrowing casts are exact.
        let mut header = [0u8; HEADER_LEN];
        header[0..2].copy_from_slice(&(self.url.len() as u16).to_le_bytes());
        header[2..4].copy_from_slice(&(self.title.len() as u16).to_le_bytes());
        header[4..8].copy_from_slice(&(self.body.len() as u32).to_le_bytes());
        header
    }

    /// Encodes the record into a fresh buffer
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.encoded_len());
        bytes.extend_from_slice(&self.header());
        bytes.extend_from_slice(self.url.as_bytes());
        bytes.extend_from_slice(self.title.as_bytes());
        bytes.extend_from_slice(self.body.as_bytes());
        bytes
    }

    /// Writes the encoded record to `writer`
    pub fn write_to<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        writer.write_all(&self.header())?;
        writer.write_all(self.url.as_bytes())?;
        writer.write_all(self.title.as_bytes())?;
        writer.write_all(self.body.as_bytes())?;
        writer.flush()
    }
}

fn check_len(field: Field, len: u64, max: u64) -> Result<(), Blub1Error> {
    if len > max {
        return Err(Blub1Error::Oversize { field, len, max });
    }
    Ok(())
}

/// Encodes a page as Blub1 bytes
///
/// # Example
///
/// ```
/// use blub_crawler::blub1::{decode, encode};
///
/// let bytes = encode("https://a.com/x", "Hi", "Body text").unwrap();
/// let record = decode(&bytes).unwrap();
/// assert_eq!(record.title(), "Hi");
/// ```
pub fn encode(url: &str, title: &str, body: &str) -> Result<Vec<u8>, Blub1Error> {
    Ok(Blub1Record::new(url, title, body)?.to_bytes())
}

/// Decodes Blub1 bytes back into a record
///
/// The input must be exactly one record: trailing or missing bytes are a
/// [`Blub1Error::LengthMismatch`].
pub fn decode(bytes: &[u8]) -> Result<Blub1Record, Blub1Error> {
    if bytes.len() < HEADER_LEN {
        return Err(Blub1Error::Truncated { len: bytes.len() });
    }

    let url_len = u16::from_le_bytes([bytes[0], bytes[1]]) as usize;
    let title_len = u16::from_le_bytes([bytes[2], bytes[3]]) as usize;
    let body_len = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]) as u64;

    let expected = HEADER_LEN as u64 + url_len as u64 + title_len as u64 + body_len;
    if bytes.len() as u64 != expected {
        return Err(Blub1Error::LengthMismatch {
            expected,
            actual: bytes.len() as u64,
        });
    }

    let payload = &bytes[HEADER_LEN..];
    let (url, rest) = payload.split_at(url_len);
    let (title, body) = rest.split_at(title_len);

    Ok(Blub1Record {
        url: utf8(Field::Url, url)?,
        title: utf8(Field::Title, title)?,
        body: utf8(Field::Body, body)?,
    })
}

fn utf8(field: Field, bytes: &[u8]) -> Result<String, Blub1Error> {
    String::from_utf8(bytes.to_vec()).map_err(|_| Blub1Error::InvalidUtf8 { field })
}
