//! Encoding registry: the closed set of encodings the engine can name.
//!
//! # Identity rules
//! Every encoding the engine touches is one of three canonical names:
//!   - UTF-8 (the target of every conversion),
//!   - Shift_JIS (the legacy double-byte fallback the classifier can infer),
//!   - windows-1252 (single-byte fallback, accepted from declarations only).
//!
//! Two spellings exist for each name.  Sidecar `.cpg` files written by GIS
//! authoring tools use code-page style labels (`CP932`, `65001`); the codec
//! collaborator (`encoding_rs`) uses WHATWG labels (`Shift_JIS`).  This
//! module is the only place that knows both — callers deal exclusively in
//! [`EncodingName`] and never pass raw labels around.

use std::borrow::Cow;
use thiserror::Error;

// ── Canonical names ──────────────────────────────────────────────────────────

/// Canonical encoding discriminant.  Carries both the sidecar label written
/// to `.cpg` entries and the codec label resolved to an `encoding_rs` codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingName {
    Utf8,
    ShiftJis,
    Latin1,
}

impl EncodingName {
    /// The label written into a sidecar `.cpg` entry.
    /// Code-page spellings are what authoring tools expect to read back.
    pub fn sidecar_label(self) -> &'static str {
        match self {
            EncodingName::Utf8     => "UTF-8",
            EncodingName::ShiftJis => "CP932",
            EncodingName::Latin1   => "CP1252",
        }
    }

    /// The codec collaborator for this name.
    pub fn codec(self) -> &'static encoding_rs::Encoding {
        match self {
            EncodingName::Utf8     => encoding_rs::UTF_8,
            EncodingName::ShiftJis => encoding_rs::SHIFT_JIS,
            EncodingName::Latin1   => encoding_rs::WINDOWS_1252,
        }
    }

    /// Human-readable name (for diagnostics only — never parsed).
    pub fn name(self) -> &'static str {
        match self {
            EncodingName::Utf8     => "UTF-8",
            EncodingName::ShiftJis => "Shift_JIS",
            EncodingName::Latin1   => "windows-1252",
        }
    }

    /// Resolve any accepted spelling — sidecar code pages, WHATWG labels,
    /// Windows code-page numbers — to a canonical name.
    ///
    /// Returns `None` for labels outside the closed set; callers MUST treat
    /// that as "no declaration", never guess.
    pub fn from_label(label: &str) -> Option<Self> {
        let trimmed = label.trim().trim_start_matches('\u{feff}');
        match trimmed.to_ascii_uppercase().as_str() {
            "UTF-8" | "UTF8" | "65001" => Some(EncodingName::Utf8),
            "CP932" | "932" | "SHIFT_JIS" | "SHIFT-JIS" | "SJIS" => {
                Some(EncodingName::ShiftJis)
            }
            "CP1252" | "1252" | "WINDOWS-1252" | "ISO-8859-1" | "LATIN1" => {
                Some(EncodingName::Latin1)
            }
            _ => None,
        }
    }
}

// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("bytes are not valid {0}")]
    Decode(&'static str),
    #[error("text is not representable in {0}")]
    Encode(&'static str),
}

// ── Codec collaborator surface ───────────────────────────────────────────────

/// Strictly decode `bytes` under `encoding`.  Any malformed sequence is an
/// error — the transcoder relies on this to leave undecodable slots alone
/// rather than injecting replacement characters into attribute data.
pub fn decode(bytes: &[u8], encoding: EncodingName) -> Result<Cow<'_, str>, CodecError> {
    encoding
        .codec()
        .decode_without_bom_handling_and_without_replacement(bytes)
        .ok_or(CodecError::Decode(encoding.name()))
}

/// Encode `text` under `encoding`.  Unmappable characters are an error, not
/// a substitution.
pub fn encode(text: &str, encoding: EncodingName) -> Result<Vec<u8>, CodecError> {
    let (bytes, _, had_errors) = encoding.codec().encode(text);
    if had_errors {
        return Err(CodecError::Encode(encoding.name()));
    }
    Ok(bytes.into_owned())
}
