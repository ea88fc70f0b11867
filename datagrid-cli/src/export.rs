//! JSON export of the filtered, sorted rows.

use std::io::Write;
use std::sync::Arc;

use datagrid_lib::collab::Exporter;
use datagrid_lib::error::ExportError;
use datagrid_lib::model::Column;
use datagrid_lib::model::TableRow;
use datagrid_lib::model::Value;
use serde::Serialize;

/// Writes `{"columns": [...], "rows": [[...], ...]}` with cells in column
/// order.
pub struct JsonExporter<W> {
    writer: W,
    pretty: bool,
}

#[derive(Serialize)]
struct Export<'a> {
    columns: Vec<&'a str>,
    rows: Vec<Vec<Value>>,
}

impl<W: Write> JsonExporter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pretty: false,
        }
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<R: TableRow, W: Write> Exporter<R> for JsonExporter<W> {
    fn export(&mut self, rows: &[Arc<R>], columns: &[&Column<R>]) -> Result<(), ExportError> {
        let export = Export {
            columns: columns.iter().map(|c| c.header.as_str()).collect(),
            rows: rows
                .iter()
                .map(|row| columns.iter().map(|c| c.resolve(row).into_owned()).collect())
                .collect(),
        };
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, &export)?;
        } else {
            serde_json::to_writer(&mut self.writer, &export)?;
        }
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        log::info!("exported {} rows", export.rows.len());
        Ok(())
    }
}
