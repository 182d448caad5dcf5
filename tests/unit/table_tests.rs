/*!
 * Tests for segment table and final table spreadsheets
 */

use anyhow::Result;
use calamine::{open_workbook, Data, Reader, Xlsx};
use rust_xlsxwriter::Workbook;
use std::path::Path;
use std::time::Duration;

use clipdeck::errors::TableError;
use clipdeck::records::ClipRecord;
use clipdeck::table;

use crate::common::{self, secs, segment};

/// Writes a sheet of string cells, first row being the header
fn write_rows(path: &Path, rows: &[&[&str]]) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            if !value.is_empty() {
                worksheet.write_string(r as u32, c as u16, *value)?;
            }
        }
    }
    workbook.save(path)?;
    Ok(())
}

fn read_all(path: &Path) -> Result<Vec<Vec<Data>>> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| anyhow::anyhow!("no worksheet"))??;
    Ok(range.rows().map(|row| row.to_vec()).collect())
}

fn sample_records() -> Vec<ClipRecord> {
    vec![
        ClipRecord {
            deck_number: 1,
            part_number: 1,
            order: 1,
            start_offset: Duration::ZERO,
            end_offset: secs(3),
            source_language: "EN".to_string(),
            source_text: "Hello".to_string(),
            translated_text: "Merhaba".to_string(),
            deck_filename: "film_D1.mp4".to_string(),
            part_filename: "film_1.mp4".to_string(),
        },
        ClipRecord {
            deck_number: 1,
            part_number: 2,
            order: 2,
            start_offset: secs(10),
            end_offset: secs(14),
            source_language: "EN".to_string(),
            source_text: "World".to_string(),
            translated_text: "Dünya".to_string(),
            deck_filename: String::new(),
            part_filename: "film_2.mp4".to_string(),
        },
    ]
}

#[test]
fn test_segmentTable_writeThenRead_shouldPreserveSegments() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("film_data.xlsx");
    let segments = vec![
        segment("Hello", 0, Some(10), 0, 3),
        segment("World", 10, None, 10, 14),
    ];

    table::write_segment_table(&path, &segments)?;
    let read_back = table::read_segment_table(&path)?;

    assert_eq!(read_back, segments);
    Ok(())
}

#[test]
fn test_segmentTable_shouldRoundToWholeSeconds() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("film_data.xlsx");
    let mut rounded = segment("Hi", 0, None, 0, 0);
    rounded.duration_end = Duration::from_millis(2_600);

    table::write_segment_table(&path, &[rounded])?;
    let read_back = table::read_segment_table(&path)?;

    assert_eq!(read_back[0].duration_end, secs(3));
    Ok(())
}

#[test]
fn test_readSegmentTable_withEditedTable_shouldAcceptMinuteSecondForm() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("edited.xlsx");
    write_rows(
        &path,
        &[
            &["text", "start", "end", "duration_start", "duration_end"],
            &["First", "00:00", "01:05", "00:00", "01:00"],
            &["", "", "", "", ""],
            &["Second", "01:05", "", "01:05", "01:30"],
        ],
    )?;

    let segments = table::read_segment_table(&path)?;

    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].end, Some(secs(65)));
    assert_eq!(segments[1].start, secs(65));
    assert_eq!(segments[1].end, None);
    assert_eq!(segments[1].playback_end(), secs(90));
    Ok(())
}

#[test]
fn test_readSegmentTable_withMissingColumn_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("broken.xlsx");
    write_rows(&path, &[&["text", "start", "end"], &["a", "00:00:01", "00:00:02"]])?;

    let result = table::read_segment_table(&path);

    assert!(matches!(result, Err(TableError::MissingColumn(ref c)) if c == "duration_start"));
    Ok(())
}

#[test]
fn test_readSegmentTable_withBadTimecode_shouldReportRow() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("broken.xlsx");
    write_rows(
        &path,
        &[
            &["text", "start", "end", "duration_start", "duration_end"],
            &["a", "00:00:01", "00:00:02", "00:00:01", "00:00:02"],
            &["b", "soon", "", "00:00:02", "00:00:03"],
        ],
    )?;

    let result = table::read_segment_table(&path);

    assert!(matches!(result, Err(TableError::InvalidTimecode { row: 3, .. })));
    Ok(())
}

#[test]
fn test_readSegmentTable_withOversizedHours_shouldReportTimecode() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("broken.xlsx");
    write_rows(
        &path,
        &[
            &["text", "start", "end", "duration_start", "duration_end"],
            &["a", "99999999999999999:00:00", "", "00:00:01", "00:00:02"],
        ],
    )?;

    let result = table::read_segment_table(&path);

    assert!(matches!(result, Err(TableError::InvalidTimecode { row: 2, .. })));
    Ok(())
}

#[test]
fn test_readSegmentTable_withEndBeforeStart_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("broken.xlsx");
    write_rows(
        &path,
        &[
            &["text", "start", "end", "duration_start", "duration_end"],
            &["a", "00:00:05", "00:00:02", "00:00:05", "00:00:06"],
        ],
    )?;

    let result = table::read_segment_table(&path);

    assert!(matches!(result, Err(TableError::InvalidRow { row: 2, .. })));
    Ok(())
}

#[test]
fn test_readSegmentTable_withMissingFile_shouldReturnReadError() {
    let result = table::read_segment_table(Path::new("does/not/exist.xlsx"));
    assert!(matches!(result, Err(TableError::Read { .. })));
}

#[test]
fn test_finalTableHeaders_shouldNameTextColumnsByLanguage() {
    let headers = table::final_table_headers("en", "tr");
    assert_eq!(
        headers,
        vec![
            "DeckNo",
            "PartNo",
            "Order",
            "StartTime",
            "EndTime",
            "SourceLanguage",
            "TR",
            "EN",
            "FileNameDeste",
            "FileNamePart"
        ]
    );
}

#[test]
fn test_writeFinalTable_shouldWriteOneRowPerRecord() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("film_final_table.xlsx");

    table::write_final_table(&path, &sample_records(), "en", "tr")?;
    let rows = read_all(&path)?;

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1][0], Data::Float(1.0));
    assert_eq!(rows[1][3], Data::String("00:00:00".to_string()));
    assert_eq!(rows[1][6], Data::String("Merhaba".to_string()));
    assert_eq!(rows[1][7], Data::String("Hello".to_string()));
    assert_eq!(rows[1][8], Data::String("film_D1.mp4".to_string()));
    assert_eq!(rows[2][2], Data::Float(2.0));
    assert_eq!(rows[2][3], Data::String("00:00:10".to_string()));
    assert_eq!(rows[2][9], Data::String("film_2.mp4".to_string()));
    Ok(())
}

#[test]
fn test_writeFinalTable_twice_shouldProduceIdenticalBytes() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let first = temp_dir.path().join("first.xlsx");
    let second = temp_dir.path().join("second.xlsx");

    table::write_final_table(&first, &sample_records(), "en", "tr")?;
    table::write_final_table(&second, &sample_records(), "en", "tr")?;

    assert_eq!(std::fs::read(&first)?, std::fs::read(&second)?);
    Ok(())
}
