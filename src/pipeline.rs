//! Attribute-encoding orchestrator — the entry point the bundle-processing
//! pipeline calls per archive.
//!
//! # Sequencing
//!
//! 1. Locate the bundle's base name from the geometry (`.shp`) entry stem,
//!    falling back to a bare `.dbf` entry when no geometry file exists.
//! 2. If a `.cpg` declaration entry exists and names a recognized encoding,
//!    that value is authoritative; otherwise a bounded sample of the `.dbf`
//!    is classified.
//! 3. Source already equal to the target: nothing is written.
//!    Otherwise the `.dbf` entry is replaced with the transcoder's output
//!    and the `.cpg` entry is rewritten to the target's label.
//!
//! # Failure policy
//!
//! Historically this engine failed open: a malformed header or unreadable
//! entry left the bundle untouched instead of aborting the conversion, at
//! the cost of passing mojibake through silently.  That behavior is the
//! default but is configurable via [`FailurePolicy`].

use thiserror::Error;

use crate::classify::{classify, ClassifierParams};
use crate::encoding::EncodingName;
use crate::layout::{parse_layout, LayoutError};
use crate::sample::{extract_sample, DEFAULT_SAMPLE_CAP};
use crate::store::{EntryStore, StoreError};
use crate::transcode::transcode;

#[derive(Error, Debug)]
pub enum RecodeError {
    #[error("attribute file structure: {0}")]
    Layout(#[from] LayoutError),
    #[error("bundle entry access: {0}")]
    Store(#[from] StoreError),
}

/// What to do when the attribute file cannot be parsed or read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Leave the bundle untouched and report why (legacy behavior).
    #[default]
    Open,
    /// Propagate the error to the caller.
    Closed,
}

#[derive(Debug, Clone)]
pub struct RecodeOptions {
    pub target:         EncodingName,
    pub failure_policy: FailurePolicy,
    pub sample_cap:     usize,
    pub classifier:     ClassifierParams,
}

impl Default for RecodeOptions {
    fn default() -> Self {
        Self {
            target:         EncodingName::Utf8,
            failure_policy: FailurePolicy::default(),
            sample_cap:     DEFAULT_SAMPLE_CAP,
            classifier:     ClassifierParams::default(),
        }
    }
}

/// Terminal outcome for one bundle.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// No entry was written.
    Unchanged(UnchangedReason),
    /// The `.dbf` entry was replaced and the `.cpg` declaration rewritten.
    Transcoded {
        source:          EncodingName,
        /// Slots whose re-encoded value outgrew its fixed width and lost
        /// its tail.  Non-zero means the conversion was lossy.
        truncated_slots: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum UnchangedReason {
    /// No `.dbf` companion in the bundle.
    NoAttributeTable,
    /// The table has no character or memo columns to transcode.
    NoTextFields,
    /// Declared or classified source already matches the target.
    AlreadyTarget(EncodingName),
    /// A structural or read error was swallowed under [`FailurePolicy::Open`].
    FailedOpen(String),
}

/// Resolve the attribute file's encoding and rewrite it to the target if it
/// differs.  Pure function of the store's entries plus `options`; the store
/// is only written on the `Transcoded` path.
pub fn recode_bundle<S: EntryStore>(
    store: &mut S,
    options: &RecodeOptions,
) -> Result<Outcome, RecodeError> {
    match recode_inner(store, options) {
        Ok(outcome) => Ok(outcome),
        Err(err) => match options.failure_policy {
            FailurePolicy::Open => Ok(Outcome::Unchanged(UnchangedReason::FailedOpen(
                err.to_string(),
            ))),
            FailurePolicy::Closed => Err(err),
        },
    }
}

fn recode_inner<S: EntryStore>(
    store: &mut S,
    options: &RecodeOptions,
) -> Result<Outcome, RecodeError> {
    let names = store.entry_names();
    let stem = match base_stem(&names) {
        Some(stem) => stem,
        None => return Ok(Outcome::Unchanged(UnchangedReason::NoAttributeTable)),
    };
    let dbf_name = match companion(&names, &stem, "dbf") {
        Some(name) => name,
        None => return Ok(Outcome::Unchanged(UnchangedReason::NoAttributeTable)),
    };

    // A declaration naming the target short-circuits before the attribute
    // file is even parsed.
    let declared = read_declaration(store, &names, &stem);
    if declared == Some(options.target) {
        return Ok(Outcome::Unchanged(UnchangedReason::AlreadyTarget(options.target)));
    }

    let dbf = store.read_entry(&dbf_name)?;
    let layout = parse_layout(&dbf)?;
    if !layout.has_text_fields() {
        return Ok(Outcome::Unchanged(UnchangedReason::NoTextFields));
    }

    let source = declared.unwrap_or_else(|| {
        let sample = extract_sample(&dbf, &layout, options.sample_cap);
        classify(&sample, &options.classifier)
    });

    if source == options.target {
        return Ok(Outcome::Unchanged(UnchangedReason::AlreadyTarget(source)));
    }

    let (rewritten, stats) = transcode(&dbf, &layout, source, options.target);
    store.write_entry(&dbf_name, rewritten.into_owned())?;

    let cpg_name = companion(&names, &stem, "cpg")
        .unwrap_or_else(|| format!("{stem}.cpg"));
    store.write_entry(&cpg_name, options.target.sidecar_label().as_bytes().to_vec())?;

    Ok(Outcome::Transcoded { source, truncated_slots: stats.truncated_slots })
}

/// Declaration read: a present-but-unreadable or unrecognized `.cpg` entry
/// is "no declaration", never an error.
fn read_declaration<S: EntryStore>(
    store: &S,
    names: &[String],
    stem: &str,
) -> Option<EncodingName> {
    let cpg_name = companion(names, stem, "cpg")?;
    let bytes = store.read_entry(&cpg_name).ok()?;
    let label = std::str::from_utf8(&bytes).ok()?;
    EncodingName::from_label(label)
}

/// Shared base name of the bundle: the geometry entry's stem, else the stem
/// of the first attribute table found.
fn base_stem(names: &[String]) -> Option<String> {
    names
        .iter()
        .find_map(|n| split_ext(n).filter(|(_, ext)| ext.eq_ignore_ascii_case("shp")))
        .or_else(|| {
            names
                .iter()
                .find_map(|n| split_ext(n).filter(|(_, ext)| ext.eq_ignore_ascii_case("dbf")))
        })
        .map(|(stem, _)| stem.to_owned())
}

/// Find the entry `stem.ext`, matching the extension case-insensitively the
/// way GIS tooling writes bundles (`A.DBF` next to `a.shp` is common).
fn companion(names: &[String], stem: &str, ext: &str) -> Option<String> {
    names
        .iter()
        .find(|n| {
            split_ext(n).is_some_and(|(s, e)| s == stem && e.eq_ignore_ascii_case(ext))
        })
        .cloned()
}

fn split_ext(name: &str) -> Option<(&str, &str)> {
    let dot = name.rfind('.')?;
    (dot > 0).then(|| (&name[..dot], &name[dot + 1..]))
}
