//! Locators for file patch items.
//!
//! A file patch locator looks like
//! `hunk://file-patch/<file path>/<staging status>?amending&activate&lineNum=12`.
//! The query keys `amending` and `activate` are presence-only flags; `lineNum`
//! carries a base-10 line number hint.

use std::fmt;

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use url::Url;

pub const FILE_PATCH_SCHEME: &str = "hunk";
pub const FILE_PATCH_KIND: &str = "file-patch";

const STAGED: &str = "staged";
const UNSTAGED: &str = "unstaged";

// Encodes a whole file path as one path segment, slashes included.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StagingStatus {
    Staged,
    Unstaged,
    /// Any other segment. Treated as unstaged everywhere it matters.
    Unrecognized(String),
}

impl StagingStatus {
    pub fn from_segment(segment: &str) -> Self {
        match segment {
            STAGED => Self::Staged,
            UNSTAGED => Self::Unstaged,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    pub fn is_staged(&self) -> bool {
        matches!(self, Self::Staged)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Staged => STAGED,
            Self::Unstaged => UNSTAGED,
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl fmt::Display for StagingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePatchDescriptor {
    pub file_path: String,
    pub staging_status: StagingStatus,
    pub amending: bool,
    pub activate: bool,
    pub line_number: Option<u32>,
}

/// Optional query flags carried by a file patch locator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilePatchUriOptions {
    pub amending: bool,
    pub activate: bool,
    pub line_number: Option<u32>,
}

pub struct FilePatchUri;

impl FilePatchUri {
    pub fn build(file_path: &str, status: &StagingStatus, options: FilePatchUriOptions) -> String {
        let mut uri = format!(
            "{FILE_PATCH_SCHEME}://{FILE_PATCH_KIND}/{}/{}",
            utf8_percent_encode(file_path, SEGMENT),
            utf8_percent_encode(status.as_str(), SEGMENT),
        );

        let mut query = Vec::new();
        if options.amending {
            query.push("amending".to_string());
        }
        if options.activate {
            query.push("activate".to_string());
        }
        if let Some(line_number) = options.line_number {
            query.push(format!("lineNum={line_number}"));
        }
        if !query.is_empty() {
            uri.push('?');
            uri.push_str(&query.join("&"));
        }

        uri
    }
}

/// Returns `None` for any locator this item does not handle, including ones
/// with the right scheme and kind but missing path segments or segments that
/// do not decode to UTF-8. Dot segments are resolved before splitting, so
/// `../a.txt/staged` names `a.txt`.
pub fn parse_file_patch_uri(locator: &str) -> Option<FilePatchDescriptor> {
    let url = Url::parse(locator).ok()?;
    if url.scheme() != FILE_PATCH_SCHEME || url.host_str() != Some(FILE_PATCH_KIND) {
        return None;
    }

    let mut segments = url
        .path()
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            percent_decode_str(segment)
                .decode_utf8()
                .ok()
                .map(|decoded| decoded.into_owned())
        })
        .collect::<Option<Vec<_>>>()?;
    if segments.len() < 2 {
        return None;
    }

    let staging_status = StagingStatus::from_segment(&segments.pop()?);
    let file_path = segments.join("/");

    let mut amending = false;
    let mut activate = false;
    let mut line_number = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "amending" => amending = true,
            "activate" => activate = true,
            "lineNum" => line_number = value.parse::<u32>().ok(),
            _ => {}
        }
    }

    Some(FilePatchDescriptor {
        file_path,
        staging_status,
        amending,
        activate,
        line_number,
    })
}
