use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::ExportError;
use crate::models::OutpassRecord;
use crate::window;

pub const CSV_MIME: &str = "text/csv";

pub const HEADER: [&str; 14] = [
    "S.No",
    "Student Name",
    "Department",
    "Batch",
    "Dayscholar/Hostel",
    "Status",
    "Staff Approval",
    "Year Incharge Approval",
    "Warden Approval",
    "Reason",
    "Type",
    "From Date",
    "To Date",
    "Applied On",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime_type: &'static str,
}

impl Artifact {
    pub fn deliver(&self, sink: &dyn ArtifactSink) -> Result<(), ExportError> {
        sink.write(&self.bytes, &self.file_name, self.mime_type)
    }
}

pub trait ArtifactSink {
    fn write(&self, bytes: &[u8], suggested_name: &str, mime_type: &str) -> Result<(), ExportError>;
}

/// Saves artifacts under a directory using the suggested file name.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, suggested_name: &str) -> PathBuf {
        self.dir.join(suggested_name)
    }
}

impl ArtifactSink for DirectorySink {
    fn write(&self, bytes: &[u8], suggested_name: &str, mime_type: &str) -> Result<(), ExportError> {
        let is_plain_name = Path::new(suggested_name)
            .file_name()
            .is_some_and(|name| name == suggested_name);
        if !is_plain_name {
            return Err(ExportError::Sink {
                name: suggested_name.to_string(),
                reason: "not a plain file name".to_string(),
            });
        }

        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(suggested_name);
        fs::write(&path, bytes)?;
        log::info!("wrote {} ({mime_type}, {} bytes)", path.display(), bytes.len());
        Ok(())
    }
}

pub struct StdoutSink;

impl ArtifactSink for StdoutSink {
    fn write(&self, bytes: &[u8], suggested_name: &str, _mime_type: &str) -> Result<(), ExportError> {
        let mut out = std::io::stdout().lock();
        out.write_all(bytes)?;
        out.write_all(b"\n")?;
        out.flush()?;
        log::debug!("streamed {suggested_name} to stdout");
        Ok(())
    }
}

/// `outpass_report_<YYYY-MM-DD>.csv` for the UTC date of `now`.
pub fn report_file_name<Tz: TimeZone>(now: &DateTime<Tz>) -> String {
    format!(
        "outpass_report_{}.csv",
        now.with_timezone(&Utc).date_naive().format("%Y-%m-%d")
    )
}

fn quote_text(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn export_date<Tz: TimeZone>(value: &str, tz: &Tz) -> String {
    window::utc_date(value, tz)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Student name, department and reason are always quoted; the other
/// columns are written as-is. No trailing newline.
pub fn export_csv<'a, Tz, I>(records: I, now: &DateTime<Tz>) -> Result<Artifact, ExportError>
where
    Tz: TimeZone,
    I: IntoIterator<Item = &'a OutpassRecord>,
{
    let tz = now.timezone();
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(HEADER)?;

    let mut rows = 0usize;
    for (index, record) in records.into_iter().enumerate() {
        let view = record.view();
        writer.write_record([
            (index + 1).to_string(),
            quote_text(&view.student_name),
            quote_text(&view.department),
            view.batch.into_owned(),
            view.residence_type.into_owned(),
            view.status.into_owned(),
            view.staff_approval.into_owned(),
            view.year_incharge_approval.into_owned(),
            view.warden_approval.into_owned(),
            quote_text(&view.reason),
            view.outpass_type.into_owned(),
            export_date(&view.from_date, &tz),
            export_date(&view.to_date, &tz),
            export_date(&view.created_at, &tz),
        ])?;
        rows += 1;
    }

    let mut bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))?;
    if bytes.last() == Some(&b'\n') {
        bytes.pop();
    }

    let file_name = report_file_name(now);
    log::debug!("rendered {rows} rows into {file_name}");
    Ok(Artifact {
        bytes,
        file_name,
        mime_type: CSV_MIME,
    })
}
