//! Reading section lists from files or stdin.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use canvas::doc::Section;
use serde::Deserialize;

use crate::CliError;

/// Accepted layouts for a sections document.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SectionsFile {
    List(Vec<Section>),
    Document { sections: Vec<Section> },
}

/// Read sections from `path`, or from stdin when `path` is `-`.
pub fn read_sections(path: &Path) -> Result<Vec<Section>, CliError> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|source| CliError::Io { path: path.to_path_buf(), source })?;
        buf
    } else {
        fs::read_to_string(path).map_err(|source| CliError::Io { path: PathBuf::from(path), source })?
    };
    parse_sections(&raw)
}

/// Parse either a bare JSON array of sections or `{ "sections": [...] }`.
pub fn parse_sections(raw: &str) -> Result<Vec<Section>, CliError> {
    let file: SectionsFile = serde_json::from_str(raw)?;
    Ok(match file {
        SectionsFile::List(sections) | SectionsFile::Document { sections } => sections,
    })
}

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;
