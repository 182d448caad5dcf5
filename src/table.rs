/*!
 * Spreadsheet input and output.
 *
 * Two workbooks are involved per movie:
 *
 * - the segment table (`text, start, end, duration_start, duration_end`),
 *   written after transcription and possibly edited by hand before `submit`;
 * - the final table with one row per part clip.
 *
 * Workbooks are written with a fixed creation timestamp so that unchanged
 * input produces byte-identical files.
 */

use calamine::{open_workbook, Data, Reader, Xlsx};
use log::debug;
use rust_xlsxwriter::{DocProperties, ExcelDateTime, Format, Workbook, Worksheet};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::errors::TableError;
use crate::language_utils;
use crate::records::ClipRecord;
use crate::segmenter::Segment;
use crate::timecode;

pub const SEGMENT_COLUMNS: [&str; 5] = ["text", "start", "end", "duration_start", "duration_end"];

/// Final table headers; `None` marks the target and source text columns,
/// which are named after their language codes
const FINAL_COLUMNS: [Option<&str>; 10] = [
    Some("DeckNo"),
    Some("PartNo"),
    Some("Order"),
    Some("StartTime"),
    Some("EndTime"),
    Some("SourceLanguage"),
    None,
    None,
    Some("FileNameDeste"),
    Some("FileNamePart"),
];

const SECONDS_PER_DAY: f64 = 86_400.0;

fn new_workbook() -> Result<Workbook, TableError> {
    let mut workbook = Workbook::new();
    let created = ExcelDateTime::from_ymd(2000, 1, 1)?;
    let properties = DocProperties::new()
        .set_creation_datetime(&created)
        .set_author("clipdeck");
    workbook.set_properties(&properties);
    Ok(workbook)
}

fn write_headers(worksheet: &mut Worksheet, headers: &[String]) -> Result<(), TableError> {
    let bold = Format::new().set_bold();
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, header, &bold)?;
    }
    Ok(())
}

/// Write the segment table
pub fn write_segment_table(path: &Path, segments: &[Segment]) -> Result<(), TableError> {
    let mut workbook = new_workbook()?;
    let worksheet = workbook.add_worksheet();
    let headers: Vec<String> = SEGMENT_COLUMNS.iter().map(|h| h.to_string()).collect();
    write_headers(worksheet, &headers)?;

    for (i, segment) in segments.iter().enumerate() {
        let row = (i + 1) as u32;
        worksheet.write_string(row, 0, &segment.text)?;
        worksheet.write_string(row, 1, timecode::format_hms(segment.start))?;
        if let Some(end) = segment.end {
            worksheet.write_string(row, 2, timecode::format_hms(end))?;
        }
        worksheet.write_string(row, 3, timecode::format_hms(segment.duration_start))?;
        worksheet.write_string(row, 4, timecode::format_hms(segment.duration_end))?;
    }

    worksheet.autofit();
    workbook.save(path)?;
    debug!("Wrote {} segments to {:?}", segments.len(), path);
    Ok(())
}

/// Read a segment table, validating every row
pub fn read_segment_table(path: &Path) -> Result<Vec<Segment>, TableError> {
    let read_error = |message: String| TableError::Read {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook: Xlsx<_> = open_workbook(path).map_err(|e| read_error(format!("{}", e)))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| read_error("workbook has no worksheets".to_string()))?
        .map_err(|e| read_error(format!("{}", e)))?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| TableError::MissingColumn(SEGMENT_COLUMNS[0].to_string()))?;
    let columns: HashMap<String, usize> = header
        .iter()
        .enumerate()
        .map(|(i, cell)| (cell.to_string().trim().to_lowercase(), i))
        .collect();
    let index_of = |name: &str| {
        columns
            .get(name)
            .copied()
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    };
    let text_col = index_of("text")?;
    let start_col = index_of("start")?;
    let end_col = index_of("end")?;
    let duration_start_col = index_of("duration_start")?;
    let duration_end_col = index_of("duration_end")?;

    let mut segments = Vec::new();
    for (i, cells) in rows.enumerate() {
        // 1-based, after the header
        let row = i + 2;
        if cells.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }
        let cell = |col: usize| cells.get(col).unwrap_or(&Data::Empty);

        let required = |col: usize, name: &str| {
            cell_duration(cell(col), row)?.ok_or_else(|| TableError::InvalidRow {
                row,
                reason: format!("empty '{}'", name),
            })
        };

        let start = required(start_col, "start")?;
        let end = cell_duration(cell(end_col), row)?;
        let duration_start = required(duration_start_col, "duration_start")?;
        let duration_end = required(duration_end_col, "duration_end")?;

        if let Some(end) = end {
            if end < start {
                return Err(TableError::InvalidRow {
                    row,
                    reason: format!(
                        "end {} is before start {}",
                        timecode::format_hms(end),
                        timecode::format_hms(start)
                    ),
                });
            }
        }

        segments.push(Segment {
            text: cell_text(cell(text_col)),
            start,
            end,
            duration_start,
            duration_end,
        });
    }

    debug!("Read {} segments from {:?}", segments.len(), path);
    Ok(segments)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

/// Timecode from a cell: `HH:MM:SS` text, plain seconds or an Excel time
fn cell_duration(cell: &Data, row: usize) -> Result<Option<Duration>, TableError> {
    let invalid = |value: String| TableError::InvalidTimecode { row, value };
    match cell {
        Data::Empty => Ok(None),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
            let s = s.trim();
            if s.is_empty() || s.eq_ignore_ascii_case("nan") {
                return Ok(None);
            }
            timecode::parse_hms(s)
                .map(Some)
                .ok_or_else(|| invalid(s.to_string()))
        }
        Data::Int(seconds) if *seconds >= 0 => Ok(Some(Duration::from_secs(*seconds as u64))),
        Data::Float(seconds) if seconds.is_finite() && *seconds >= 0.0 => {
            Ok(Some(timecode::from_seconds_f64(*seconds)))
        }
        Data::DateTime(time) => {
            let seconds = time.as_f64() * SECONDS_PER_DAY;
            Ok(Some(timecode::from_seconds_f64(seconds)))
        }
        other => Err(invalid(other.to_string())),
    }
}

/// Headers of the final table for the given language pair
pub fn final_table_headers(source_language: &str, target_language: &str) -> Vec<String> {
    let mut text_columns = [
        language_utils::column_label(target_language),
        language_utils::column_label(source_language),
    ]
    .into_iter();

    FINAL_COLUMNS
        .iter()
        .map(|header| match header {
            Some(name) => name.to_string(),
            None => text_columns.next().unwrap_or_default(),
        })
        .collect()
}

/// Write the final per-part table
pub fn write_final_table(
    path: &Path,
    records: &[ClipRecord],
    source_language: &str,
    target_language: &str,
) -> Result<(), TableError> {
    let mut workbook = new_workbook()?;
    let worksheet = workbook.add_worksheet();
    write_headers(worksheet, &final_table_headers(source_language, target_language))?;

    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        worksheet.write_number(row, 0, record.deck_number as f64)?;
        worksheet.write_number(row, 1, record.part_number as f64)?;
        worksheet.write_number(row, 2, record.order as f64)?;
        worksheet.write_string(row, 3, timecode::format_hms(record.start_offset))?;
        worksheet.write_string(row, 4, timecode::format_hms(record.end_offset))?;
        worksheet.write_string(row, 5, &record.source_language)?;
        worksheet.write_string(row, 6, &record.translated_text)?;
        worksheet.write_string(row, 7, &record.source_text)?;
        worksheet.write_string(row, 8, &record.deck_filename)?;
        worksheet.write_string(row, 9, &record.part_filename)?;
    }

    worksheet.autofit();
    workbook.save(path)?;
    debug!("Wrote {} records to {:?}", records.len(), path);
    Ok(())
}
