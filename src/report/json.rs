//! JSON report

use crate::render::RenderedResult;
use crate::selection::Preview;
use chrono::Local;
use serde::Serialize;
use std::io::{self, Write};

#[derive(Serialize)]
struct ImageInfo<'a> {
    file_name: &'a str,
    mime: &'a str,
    size: usize,
}

#[derive(Serialize)]
struct Report<'a> {
    generated: String,
    image: Option<ImageInfo<'a>>,
    result: &'a RenderedResult,
}

/// The preview's data URI is left out; it would dwarf everything else.
pub fn write<W: Write>(
    writer: &mut W,
    preview: Option<&Preview>,
    result: &RenderedResult,
) -> io::Result<()> {
    let report = Report {
        generated: Local::now().to_rfc3339(),
        image: preview.map(|p| ImageInfo {
            file_name: &p.file_name,
            mime: &p.mime,
            size: p.size,
        }),
        result,
    };
    serde_json::to_writer_pretty(&mut *writer, &report)?;
    writeln!(writer)
}
