//! Conversion of image/question/answer tables into chat-format JSONL.
//!
//! Each source row becomes one [`TrainingRecord`]: an optional system turn,
//! a user turn carrying the question (plus the image, inline as a base64
//! `data:` URL or by reference), and an assistant turn carrying the answer.
//! Rows missing a question or answer are logged and skipped.

use crate::errors::{DataError, FinetuneError, FinetuneResult, ValidationError};
use crate::services::chat::{ChatMessage, ChatMessageRole, ContentPart};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use url::Url;

/// One row of the source table. Every column is optional so that malformed
/// rows surface as data errors instead of parse failures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceRow {
    #[serde(default, alias = "image_path", alias = "image_url")]
    pub image: Option<String>,
    #[serde(default, alias = "query", alias = "prompt")]
    pub question: Option<String>,
    #[serde(default, alias = "label", alias = "response")]
    pub answer: Option<String>,
}

impl SourceRow {
    pub fn new(
        image: Option<&str>,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            image: image.map(str::to_string),
            question: Some(question.into()),
            answer: Some(answer.into()),
        }
    }
}

/// Rows read from a source table, plus the rows that could not be parsed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceTable {
    pub rows: Vec<SourceRow>,
    pub skipped: Vec<SkippedRow>,
}

impl SourceTable {
    fn skip(&mut self, row: usize, reason: String) {
        tracing::warn!(row, reason = %reason, "skipping unreadable source row");
        self.skipped.push(SkippedRow { row, reason });
    }
}

/// Reads source rows from a `.csv` table or a `.jsonl` file of row objects.
///
/// Short CSV rows read with the missing columns empty, so the converter
/// skips them as missing fields. Rows that fail to parse at all are logged
/// and reported in [`SourceTable::skipped`]; only I/O failures abort.
pub fn read_source_rows(path: impl AsRef<Path>) -> FinetuneResult<SourceTable> {
    let path = path.as_ref();
    match extension(path).as_deref() {
        Some("csv") => {
            let mut reader = csv::ReaderBuilder::new()
                .trim(csv::Trim::All)
                .flexible(true)
                .from_path(path)?;
            let mut table = SourceTable::default();
            for (index, row) in reader.deserialize::<SourceRow>().enumerate() {
                match row {
                    Ok(row) => table.rows.push(row),
                    Err(error) if error.is_io_error() => return Err(error.into()),
                    Err(error) => table.skip(index + 1, error.to_string()),
                }
            }
            Ok(table)
        }
        Some("jsonl") | Some("json") => read_source_lines(path),
        other => Err(FinetuneError::Validation(ValidationError::InvalidFileFormat {
            expected: "csv or jsonl".to_string(),
            actual: other.unwrap_or("none").to_string(),
        })),
    }
}

/// How image references end up in the user turn.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageMode {
    /// Local files are read and embedded as `data:<mime>;base64,...` URLs.
    Inline,
    /// Relative names are joined onto this base URL.
    Url(Url),
}

#[derive(Debug, Clone)]
pub struct DatasetConverter {
    system_prompt: String,
    image_mode: ImageMode,
    image_root: PathBuf,
}

impl DatasetConverter {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            image_mode: ImageMode::Inline,
            image_root: PathBuf::from("."),
        }
    }

    pub fn with_image_mode(mut self, mode: ImageMode) -> Self {
        self.image_mode = mode;
        self
    }

    /// Directory that relative image paths are resolved against.
    pub fn with_image_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.image_root = root.into();
        self
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Converts a single row. `row` is the 1-based row number used in errors.
    pub fn convert_row(&self, row: usize, source: &SourceRow) -> FinetuneResult<TrainingRecord> {
        let question = required(row, "question", &source.question)?;
        let answer = required(row, "answer", &source.answer)?;

        let mut messages = Vec::with_capacity(3);
        if !self.system_prompt.trim().is_empty() {
            messages.push(ChatMessage::system(self.system_prompt.clone()));
        }

        let image = source
            .image
            .as_deref()
            .map(str::trim)
            .filter(|image| !image.is_empty());
        match image {
            Some(image) => {
                let url = self.image_reference(image)?;
                messages.push(ChatMessage::user_parts(vec![
                    ContentPart::text(question),
                    ContentPart::image(url),
                ]));
            }
            None => messages.push(ChatMessage::user(question)),
        }

        messages.push(ChatMessage::assistant(answer));
        Ok(TrainingRecord { messages })
    }

    /// Converts every row, skipping rows with data-shape problems.
    pub fn convert_rows(&self, rows: &[SourceRow]) -> FinetuneResult<ConversionReport> {
        let mut report = ConversionReport::default();

        for (index, source) in rows.iter().enumerate() {
            let row = index + 1;
            match self.convert_row(row, source) {
                Ok(record) => report.records.push(record),
                Err(FinetuneError::Data(error)) => {
                    tracing::warn!(row, error = %error, "skipping row");
                    report.skipped.push(SkippedRow {
                        row,
                        reason: error.to_string(),
                    });
                }
                Err(other) => return Err(other),
            }
        }

        tracing::info!(
            converted = report.records.len(),
            skipped = report.skipped.len(),
            "dataset converted"
        );
        Ok(report)
    }

    fn image_reference(&self, image: &str) -> FinetuneResult<String> {
        if is_remote(image) {
            return Ok(image.to_string());
        }

        match &self.image_mode {
            ImageMode::Inline => {
                let path = self.image_root.join(image);
                encode_image(&path)
            }
            ImageMode::Url(base) => base.join(image).map(String::from).map_err(|e| {
                FinetuneError::Data(DataError::InvalidImage {
                    path: image.to_string(),
                    reason: e.to_string(),
                })
            }),
        }
    }
}

fn required(row: usize, field: &str, value: &Option<String>) -> FinetuneResult<String> {
    match value.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(FinetuneError::Data(DataError::MissingField {
            row,
            field: field.to_string(),
        })),
    }
}

fn is_remote(image: &str) -> bool {
    image.starts_with("http://") || image.starts_with("https://") || image.starts_with("data:")
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// Mime type for an image file, from its extension.
pub fn image_mime(path: &Path) -> Option<mime::Mime> {
    match extension(path)?.as_str() {
        "png" => Some(mime::IMAGE_PNG),
        "jpg" | "jpeg" => Some(mime::IMAGE_JPEG),
        "gif" => Some(mime::IMAGE_GIF),
        "webp" => "image/webp".parse().ok(),
        _ => None,
    }
}

/// Reads an image and returns it as a base64 `data:` URL.
pub fn encode_image(path: &Path) -> FinetuneResult<String> {
    let invalid = |reason: String| {
        FinetuneError::Data(DataError::InvalidImage {
            path: path.display().to_string(),
            reason,
        })
    };

    let mime = image_mime(path).ok_or_else(|| invalid("unsupported image type".to_string()))?;
    let bytes = std::fs::read(path).map_err(|e| invalid(e.to_string()))?;
    if bytes.is_empty() {
        return Err(invalid("file is empty".to_string()));
    }

    Ok(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
}

/// One chat-format training example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRecord {
    pub messages: Vec<ChatMessage>,
}

impl TrainingRecord {
    fn turn(&self, role: ChatMessageRole) -> Option<&ChatMessage> {
        self.messages.iter().find(|message| message.role == role)
    }

    pub fn system_prompt(&self) -> Option<String> {
        self.turn(ChatMessageRole::System)
            .and_then(ChatMessage::text_content)
    }

    pub fn question(&self) -> Option<String> {
        self.turn(ChatMessageRole::User)
            .and_then(ChatMessage::text_content)
    }

    pub fn image_url(&self) -> Option<&str> {
        self.turn(ChatMessageRole::User)
            .and_then(ChatMessage::image_url)
    }

    pub fn answer(&self) -> Option<String> {
        self.turn(ChatMessageRole::Assistant)
            .and_then(ChatMessage::text_content)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub row: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct ConversionReport {
    pub records: Vec<TrainingRecord>,
    pub skipped: Vec<SkippedRow>,
}

/// Writes one compact JSON object per line. Returns the number of records.
pub fn write_jsonl<W: Write>(writer: W, records: &[TrainingRecord]) -> FinetuneResult<usize> {
    let mut writer = BufWriter::new(writer);
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(records.len())
}

pub fn write_jsonl_file(path: impl AsRef<Path>, records: &[TrainingRecord]) -> FinetuneResult<usize> {
    let path = path.as_ref();
    let written = write_jsonl(File::create(path)?, records)?;
    tracing::debug!(path = %path.display(), records = written, "wrote jsonl");
    Ok(written)
}

/// Reads training records back, skipping blank lines.
pub fn read_jsonl(path: impl AsRef<Path>) -> FinetuneResult<Vec<TrainingRecord>> {
    read_json_lines(path.as_ref())
}

fn read_source_lines(path: &Path) -> FinetuneResult<SourceTable> {
    let reader = BufReader::new(File::open(path)?);
    let mut table = SourceTable::default();
    let mut row = 0;

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        row += 1;
        match serde_json::from_str(&line) {
            Ok(source) => table.rows.push(source),
            Err(error) => table.skip(row, error.to_string()),
        }
    }

    Ok(table)
}

fn read_json_lines<T: serde::de::DeserializeOwned>(path: &Path) -> FinetuneResult<Vec<T>> {
    let reader = BufReader::new(File::open(path)?);
    let mut items = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let item = serde_json::from_str(&line).map_err(|e| {
            FinetuneError::Data(DataError::InvalidRecord {
                line: index + 1,
                reason: e.to_string(),
            })
        })?;
        items.push(item);
    }

    Ok(items)
}

/// Contiguous train/validation/test partition of a row sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSplit<T> {
    pub train: Vec<T>,
    pub validation: Vec<T>,
    pub test: Vec<T>,
}

/// Splits `rows` in order: the first `train` fraction, then the next
/// `validation` fraction, the remainder is the test set.
pub fn split_rows<T: Clone>(
    rows: &[T],
    train: f64,
    validation: f64,
) -> FinetuneResult<DatasetSplit<T>> {
    for (field, value) in [("train", train), ("validation", validation)] {
        if !(0.0..=1.0).contains(&value) {
            return Err(FinetuneError::Validation(ValidationError::ValueOutOfRange {
                field: field.to_string(),
                min: "0".to_string(),
                max: "1".to_string(),
                value: value.to_string(),
            }));
        }
    }
    if train + validation > 1.0 + f64::EPSILON {
        return Err(FinetuneError::Validation(ValidationError::InvalidParameter {
            parameter: "validation".to_string(),
            reason: format!("train + validation must not exceed 1, got {}", train + validation),
        }));
    }

    let total = rows.len();
    let train_end = boundary(total, train).min(total);
    let validation_end = (train_end + boundary(total, validation)).min(total);

    Ok(DatasetSplit {
        train: rows[..train_end].to_vec(),
        validation: rows[train_end..validation_end].to_vec(),
        test: rows[validation_end..].to_vec(),
    })
}

/// Number of rows a fraction covers. The tolerance absorbs float error such
/// as `100.0 * 0.29 == 28.999999999999996`.
fn boundary(total: usize, fraction: f64) -> usize {
    (total as f64 * fraction + 1e-9).floor() as usize
}
