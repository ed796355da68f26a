use crate::{
    cli::ExtractArgs,
    core::{
        frequency::PopulationTable,
        processor::{AnnotationFilters, RecordProcessor},
    },
    io::{readers::open_vcf_reader, table_writer::TableWriter},
    utils::util::Result,
};
use std::{
    io::{BufRead, Write},
    path::Path,
};


pub fn extract(args: ExtractArgs) -> Result<()> {
    let vcf_paths = args.process_vcf_paths()?;
    let populations = PopulationTable::new(args.gnomad);
    let filters = AnnotationFilters {
        canonical_only: !args.noncanonical,
        hc_lof_only: !args.allvars,
    };

    let output_path = Path::new(&args.output);
    let mut writer = TableWriter::create(output_path, &populations)?;

    for path in &vcf_paths {
        log::info!("Processing {}", path.display());
        process_file(path, &populations, filters, &mut writer)?;
    }

    let rows_written = writer.finish()?;
    log::info!(
        "Wrote {} annotation rows from {} file(s) to {}",
        rows_written,
        vcf_paths.len(),
        output_path.display()
    );
    Ok(())
}

/// Runs one VCF stream through the record processor, tagging errors with the
/// offending file and line number.
fn process_file<W: Write>(
    path: &Path,
    populations: &PopulationTable,
    filters: AnnotationFilters,
    writer: &mut TableWriter<W>,
) -> Result<()> {
    let reader = open_vcf_reader(path)?;
    let mut processor = RecordProcessor::new(populations, filters);
    for (line_number, result_line) in reader.lines().enumerate() {
        let line = result_line.map_err(|e| {
            crate::vex_error!("Error reading {} line {}: {e}", path.display(), line_number + 1)
        })?;
        processor.process_line(&line, writer).map_err(|e| {
            crate::vex_error!("{} line {}: {e}", path.display(), line_number + 1)
        })?;
    }
    Ok(())
}
