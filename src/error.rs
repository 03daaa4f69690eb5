//! Error types for rst2db operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a document tree or rendering it.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Invalid document tree: {0}")]
    InvalidTree(String),

    /// The DocBook element stack did not reduce to exactly the root element.
    #[error("Unbalanced element stack: {depth} element(s) open at end of translation")]
    UnbalancedStack { depth: usize },

    #[error("XML serialization error: {0}")]
    Serialize(String),

    #[error("Template file doesn't exist: {}", .0.display())]
    TemplateNotFound(PathBuf),

    #[error("Template support is not available in this build")]
    TemplateUnavailable,

    #[cfg(feature = "template")]
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
