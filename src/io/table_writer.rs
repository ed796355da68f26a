use crate::{
    constants::FIXED_OUTPUT_COLUMNS,
    core::{frequency::PopulationTable, processor::OutputRow},
    utils::util::Result,
};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

/// Tab-delimited output table. The header row (fixed columns followed by one
/// column per population code) is written on construction.
pub struct TableWriter<W: Write> {
    writer: W,
    rows_written: u64,
}

impl TableWriter<BufWriter<File>> {
    pub fn create(path: &Path, populations: &PopulationTable) -> Result<Self> {
        let file = File::create(path).map_err(|e| {
            crate::vex_error!("Failed to create output file {}: {e}", path.display())
        })?;
        Self::from_writer(BufWriter::new(file), populations)
    }
}

impl<W: Write> TableWriter<W> {
    pub fn from_writer(mut writer: W, populations: &PopulationTable) -> Result<Self> {
        let mut columns: Vec<&str> = FIXED_OUTPUT_COLUMNS.to_vec();
        columns.extend(populations.codes());
        writeln!(writer, "{}", columns.join("\t"))?;
        Ok(TableWriter {
            writer,
            rows_written: 0,
        })
    }

    pub fn write_row(&mut self, row: &OutputRow) -> Result<()> {
        write!(
            self.writer,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            row.hgvsc,
            row.gene,
            row.chrom,
            row.pos,
            row.id,
            row.allele,
            row.sift,
            row.polyphen,
            row.consequence
        )?;
        for frequency in &row.frequencies {
            write!(self.writer, "\t{frequency}")?;
        }
        writeln!(self.writer)?;
        self.rows_written += 1;
        Ok(())
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    pub fn finish(mut self) -> Result<u64> {
        self.writer.flush()?;
        Ok(self.rows_written)
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
