//! Search the comments of a markup document.
//!
//! This crate ties the workspace together: `commentq_dom` loads markup into a document,
//! `commentq_query` finds comments in it and `commentq_config` holds the settings both of them
//! read. The helpers below are used by the `commentq` binary.

pub use commentq_config as config;
pub use commentq_dom as dom;
pub use commentq_query as query;
pub use commentq_shared as shared;

use commentq_config::storage::JsonStorageAdapter;
use commentq_dom::Document;
use commentq_query::arguments::string_to_number;
use commentq_query::Argument;
use commentq_shared::errors::Error;
use commentq_shared::node::NodeId;
use commentq_shared::types::Result;
use std::fs;
use std::path::Path;

/// Reads and loads a markup file
pub fn load_document(path: &Path) -> Result<Document> {
    let markup = fs::read_to_string(path).map_err(Error::IO)?;
    Document::from_markup(&markup)
}

/// Opens a json settings file. The file must exist.
pub fn open_settings(path: &Path) -> Result<JsonStorageAdapter> {
    JsonStorageAdapter::open_existing(path)
}

/// Converts a command line word into a query argument. `true` and `false` become booleans.
/// With `numbers` set, numeric words become numbers as well; everything else stays a string.
#[must_use]
pub fn argument_from_str(value: &str, numbers: bool) -> Argument {
    match value {
        "true" => return Argument::Bool(true),
        "false" => return Argument::Bool(false),
        _ => {}
    }

    if numbers && !value.trim().is_empty() {
        let number = string_to_number(value);
        if !number.is_nan() {
            return Argument::Number(number);
        }
    }

    Argument::from(value)
}

/// The roots to search: every element with the tag name, or the document node when no tag is given
#[must_use]
pub fn select_roots(document: &Document, tag: Option<&str>) -> Vec<NodeId> {
    match tag {
        Some(tag) => document.elements_by_tag_name(tag),
        None => vec![document.root_id()],
    }
}

/// Formats a comment value the way it appears in markup
#[must_use]
pub fn format_comment(value: &str) -> String {
    format!("<!--{value}-->")
}
