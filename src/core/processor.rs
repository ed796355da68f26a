use crate::{
    constants::{COLUMN_HEADER_NAME, CSQ_KEY},
    core::{
        allele::resolve_allele_index, csq::CsqSchema, frequency::PopulationTable, info::InfoField,
    },
    error::VexError,
    io::table_writer::TableWriter,
    utils::util::{log_warning, Result},
};
use rust_decimal::Decimal;
use std::{collections::HashMap, io::Write};

/// Which annotation records survive the filter-and-emit step.
#[derive(Debug, Clone, Copy)]
pub struct AnnotationFilters {
    pub canonical_only: bool,
    pub hc_lof_only: bool,
}

/// One row of the output table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    pub hgvsc: String,
    pub gene: String,
    pub chrom: String,
    pub pos: String,
    pub id: String,
    pub allele: String,
    pub sift: String,
    pub polyphen: String,
    pub consequence: String,
    pub frequencies: Vec<Decimal>,
}

/// Column-name to zero-based position mapping from the column header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnIndex {
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    /// Builds the index from a '#'-stripped column header line
    /// (`CHROM POS ID REF ALT ...`), split on whitespace.
    pub fn from_header_line(line: &str) -> Self {
        let positions = line
            .split_whitespace()
            .enumerate()
            .map(|(position, name)| (name.to_string(), position))
            .collect();
        ColumnIndex { positions }
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    fn resolve(&self, name: &str) -> Result<usize> {
        self.get(name).ok_or_else(|| VexError::MissingColumn {
            name: name.to_string(),
        })
    }
}

/// Positions of the columns the extractor consumes, checked once when the
/// stream becomes ready.
#[derive(Debug, Clone, Copy)]
struct ResolvedColumns {
    chrom: usize,
    pos: usize,
    id: usize,
    alt: usize,
    info: usize,
}

impl ResolvedColumns {
    fn from_index(index: &ColumnIndex) -> Result<Self> {
        Ok(ResolvedColumns {
            chrom: index.resolve("CHROM")?,
            pos: index.resolve("POS")?,
            id: index.resolve("ID")?,
            alt: index.resolve("ALT")?,
            info: index.resolve("INFO")?,
        })
    }

    fn max_position(&self) -> usize {
        self.chrom
            .max(self.pos)
            .max(self.id)
            .max(self.alt)
            .max(self.info)
    }
}

/// Schema state of one input stream. Both schemas must be seen in the
/// header before the first data line; after that the state is immutable.
#[derive(Debug)]
enum SchemaState {
    Gathering {
        csq: Option<CsqSchema>,
        columns: Option<ColumnIndex>,
    },
    Ready {
        csq: CsqSchema,
        columns: ResolvedColumns,
    },
}

/// Per-stream record processor: consumes one text line at a time, learns the
/// CSQ and column schemas from the header, then expands each data line's CSQ
/// payload and writes one output row per annotation passing the filters.
#[derive(Debug)]
pub struct RecordProcessor<'a> {
    populations: &'a PopulationTable,
    filters: AnnotationFilters,
    state: SchemaState,
}

impl<'a> RecordProcessor<'a> {
    pub fn new(populations: &'a PopulationTable, filters: AnnotationFilters) -> Self {
        RecordProcessor {
            populations,
            filters,
            state: SchemaState::Gathering {
                csq: None,
                columns: None,
            },
        }
    }

    /// Feeds one input line through the processor. Header lines update the
    /// schema state (and are ignored once the stream is ready); data lines
    /// are expanded into output rows on `sink`. The first data line without
    /// both schemas established fails the whole stream.
    pub fn process_line<W: Write>(&mut self, line: &str, sink: &mut TableWriter<W>) -> Result<()> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }
        if let Some(header) = line.strip_prefix('#') {
            self.observe_header_line(header.trim_start_matches('#'));
            return Ok(());
        }
        self.ensure_ready()?;
        match &self.state {
            SchemaState::Ready { csq, columns } => emit_rows(
                line,
                csq,
                *columns,
                self.populations,
                self.filters,
                sink,
            ),
            SchemaState::Gathering { .. } => unreachable!("ensure_ready establishes Ready"),
        }
    }

    fn observe_header_line(&mut self, line: &str) {
        if let SchemaState::Gathering { csq, columns } = &mut self.state {
            if let Some(schema) = CsqSchema::from_header_line(line) {
                *csq = Some(schema);
            }
            if line.starts_with(COLUMN_HEADER_NAME) {
                *columns = Some(ColumnIndex::from_header_line(line));
            }
        }
    }

    fn ensure_ready(&mut self) -> Result<()> {
        if let SchemaState::Gathering { csq, columns } = &mut self.state {
            let csq = csq.take().ok_or(VexError::MissingCsqFormat)?;
            let index = columns.take().ok_or(VexError::MissingColumnHeader)?;
            let columns = ResolvedColumns::from_index(&index)?;
            self.state = SchemaState::Ready { csq, columns };
        }
        Ok(())
    }
}

/// Expands one data line into output rows: decode INFO, expand the CSQ
/// payload, filter, resolve the allele, compute frequencies, emit.
fn emit_rows<W: Write>(
    line: &str,
    csq: &CsqSchema,
    columns: ResolvedColumns,
    populations: &PopulationTable,
    filters: AnnotationFilters,
    sink: &mut TableWriter<W>,
) -> Result<()> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() <= columns.max_position() {
        return log_warning(
            format!(
                "Record has {} fields, expected at least {}; skipping line",
                fields.len(),
                columns.max_position() + 1
            ),
            Ok(()),
        );
    }

    let info = InfoField::decode(fields[columns.info]);
    let payload = match info.get(CSQ_KEY) {
        Some(payload) => payload,
        // Records without a consequence payload are routine.
        None => return Ok(()),
    };
    let alleles: Vec<&str> = fields[columns.alt].split(',').collect();

    for annotation in csq.expand(payload) {
        if filters.canonical_only && !annotation.is_canonical() {
            continue;
        }
        if filters.hc_lof_only && !annotation.is_hc_lof() {
            continue;
        }
        let allele_idx = resolve_allele_index(&alleles, annotation.allele());
        let row = OutputRow {
            hgvsc: annotation.hgvsc().to_string(),
            gene: annotation.gene().to_string(),
            chrom: fields[columns.chrom].to_string(),
            pos: fields[columns.pos].to_string(),
            id: fields[columns.id].to_string(),
            allele: annotation.allele().to_string(),
            sift: annotation.sift().to_string(),
            polyphen: annotation.polyphen().to_string(),
            consequence: annotation.consequence().to_string(),
            frequencies: populations.frequencies(&info, allele_idx),
        };
        sink.write_row(&row)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VEP_HEADER: &str = "##INFO=<ID=CSQ,Number=.,Type=String,Description=\"Consequence annotations from Ensembl VEP. Format: Allele|Gene|HGVSc|SIFT|PolyPhen|Consequence|CANONICAL|LoF\">";
    const COLUMN_HEADER: &str = "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO";

    fn run_lines(lines: &[&str], filters: AnnotationFilters, gnomad: bool) -> Result<String> {
        let populations = PopulationTable::new(gnomad);
        let mut sink = TableWriter::from_writer(Vec::new(), &populations)?;
        let mut processor = RecordProcessor::new(&populations, filters);
        for line in lines {
            processor.process_line(line, &mut sink)?;
        }
        Ok(String::from_utf8(sink.into_inner()).unwrap())
    }

    fn default_filters() -> AnnotationFilters {
        AnnotationFilters {
            canonical_only: true,
            hc_lof_only: true,
        }
    }

    fn open_filters() -> AnnotationFilters {
        AnnotationFilters {
            canonical_only: false,
            hc_lof_only: false,
        }
    }

    fn data_rows(output: &str) -> Vec<&str> {
        output.lines().skip(1).collect()
    }

    #[test]
    fn test_missing_csq_schema_is_fatal() {
        let populations = PopulationTable::new(false);
        let mut sink = TableWriter::from_writer(Vec::new(), &populations).unwrap();
        let mut processor = RecordProcessor::new(&populations, default_filters());
        processor.process_line(COLUMN_HEADER, &mut sink).unwrap();
        let err = processor
            .process_line("1\t100\trs1\tA\tT\t.\tPASS\tCSQ=x", &mut sink)
            .unwrap_err();
        assert!(matches!(err, VexError::MissingCsqFormat));
    }

    #[test]
    fn test_missing_column_header_is_fatal() {
        let populations = PopulationTable::new(false);
        let mut sink = TableWriter::from_writer(Vec::new(), &populations).unwrap();
        let mut processor = RecordProcessor::new(&populations, default_filters());
        processor.process_line(VEP_HEADER, &mut sink).unwrap();
        let err = processor
            .process_line("1\t100\trs1\tA\tT\t.\tPASS\tCSQ=x", &mut sink)
            .unwrap_err();
        assert!(matches!(err, VexError::MissingColumnHeader));
    }

    #[test]
    fn test_single_variant_single_allele() {
        let output = run_lines(
            &[
                "##fileformat=VCFv4.2",
                VEP_HEADER,
                COLUMN_HEADER,
                "1\t100\trs1\tA\tT\t.\tPASS\tAC_AFR=2;AN_AFR=10;CSQ=T|GENE1|c.1A>T|0.1|0.9|missense_variant|YES|HC",
            ],
            default_filters(),
            false,
        )
        .unwrap();
        let rows = data_rows(&output);
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0],
            "c.1A>T\tGENE1\t1\t100\trs1\tT\t0.1\t0.9\tmissense_variant\t0.2\t0\t0\t0\t0\t0"
        );
    }

    #[test]
    fn test_multiallelic_with_shared_allele_number() {
        let output = run_lines(
            &[
                VEP_HEADER,
                COLUMN_HEADER,
                "2\t200\trs2\tA\tC,G\t.\tPASS\tAC_AFR=1,3;AN_AFR=20;CSQ=G|GENE2|c.2A>G|0.2|0.8|stop_gained|YES|HC",
            ],
            default_filters(),
            false,
        )
        .unwrap();
        let rows = data_rows(&output);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].ends_with("stop_gained\t0.15\t0\t0\t0\t0\t0"));
    }

    #[test]
    fn test_malformed_payload_entry_is_skipped() {
        let output = run_lines(
            &[
                VEP_HEADER,
                COLUMN_HEADER,
                "1\t100\trs1\tA\tT\t.\tPASS\tAN_AFR=10;AC_AFR=2;CSQ=T|short,T|GENE1|c.1A>T|0.1|0.9|missense_variant|YES|HC",
            ],
            default_filters(),
            false,
        )
        .unwrap();
        let rows = data_rows(&output);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].starts_with("c.1A>T\tGENE1"));
    }

    #[test]
    fn test_record_without_csq_is_skipped() {
        let output = run_lines(
            &[
                VEP_HEADER,
                COLUMN_HEADER,
                "1\t100\trs1\tA\tT\t.\tPASS\tAC_AFR=2;AN_AFR=10",
            ],
            default_filters(),
            false,
        )
        .unwrap();
        assert!(data_rows(&output).is_empty());
    }

    #[test]
    fn test_filters_are_independent_and_default_is_subset() {
        let lines = [
            VEP_HEADER,
            COLUMN_HEADER,
            // canonical+HC, canonical only, HC only, neither
            "1\t1\trs1\tA\tT\t.\tPASS\tCSQ=T|G1|c.1|0.1|0.9|missense_variant|YES|HC",
            "1\t2\trs2\tA\tT\t.\tPASS\tCSQ=T|G2|c.2|0.1|0.9|missense_variant|YES|LC",
            "1\t3\trs3\tA\tT\t.\tPASS\tCSQ=T|G3|c.3|0.1|0.9|missense_variant||HC",
            "1\t4\trs4\tA\tT\t.\tPASS\tCSQ=T|G4|c.4|0.1|0.9|missense_variant||",
        ];
        let default_output = run_lines(&lines, default_filters(), false).unwrap();
        let open_output = run_lines(&lines, open_filters(), false).unwrap();
        let default_rows = data_rows(&default_output);
        let open_rows = data_rows(&open_output);

        assert_eq!(default_rows.len(), 1);
        assert!(default_rows[0].contains("G1"));
        assert_eq!(open_rows.len(), 4);
        assert!(default_rows.iter().all(|row| open_rows.contains(row)));

        let canonical_only = run_lines(
            &lines,
            AnnotationFilters {
                canonical_only: true,
                hc_lof_only: false,
            },
            false,
        )
        .unwrap();
        assert_eq!(data_rows(&canonical_only).len(), 2);

        let hc_only = run_lines(
            &lines,
            AnnotationFilters {
                canonical_only: false,
                hc_lof_only: true,
            },
            false,
        )
        .unwrap();
        assert_eq!(data_rows(&hc_only).len(), 2);
    }

    #[test]
    fn test_header_lines_are_ignored_once_ready() {
        // A second CSQ declaration after the first data line must not change
        // the established schema.
        let output = run_lines(
            &[
                VEP_HEADER,
                COLUMN_HEADER,
                "1\t1\trs1\tA\tT\t.\tPASS\tCSQ=T|G1|c.1|0.1|0.9|missense_variant|YES|HC",
                "##INFO=<ID=CSQ,Description=\"Format: Allele|Gene\">",
                "1\t2\trs2\tA\tT\t.\tPASS\tCSQ=T|G2|c.2|0.1|0.9|missense_variant|YES|HC",
            ],
            default_filters(),
            false,
        )
        .unwrap();
        assert_eq!(data_rows(&output).len(), 2);
    }

    #[test]
    fn test_short_data_line_is_skipped() {
        let output = run_lines(
            &[VEP_HEADER, COLUMN_HEADER, "1\t100\trs1"],
            default_filters(),
            false,
        )
        .unwrap();
        assert!(data_rows(&output).is_empty());
    }

    #[test]
    fn test_column_order_is_taken_from_header() {
        // INFO and ALT swapped relative to the usual layout.
        let output = run_lines(
            &[
                VEP_HEADER,
                "#CHROM\tPOS\tID\tREF\tINFO\tALT",
                "1\t100\trs1\tA\tAC_AFR=2;AN_AFR=10;CSQ=T|GENE1|c.1A>T|0.1|0.9|missense_variant|YES|HC\tT",
            ],
            default_filters(),
            false,
        )
        .unwrap();
        let rows = data_rows(&output);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].contains("\t0.2\t"));
    }

    #[test]
    fn test_missing_required_column_is_fatal() {
        let populations = PopulationTable::new(false);
        let mut sink = TableWriter::from_writer(Vec::new(), &populations).unwrap();
        let mut processor = RecordProcessor::new(&populations, default_filters());
        processor.process_line(VEP_HEADER, &mut sink).unwrap();
        processor
            .process_line("#CHROM\tPOS\tID\tREF\tALT", &mut sink)
            .unwrap();
        let err = processor
            .process_line("1\t100\trs1\tA\tT", &mut sink)
            .unwrap_err();
        assert!(matches!(err, VexError::MissingColumn { ref name } if name == "INFO"));
    }

    #[test]
    fn test_gnomad_mode_appends_asj_frequency() {
        let output = run_lines(
            &[
                VEP_HEADER,
                COLUMN_HEADER,
                "1\t100\trs1\tA\tT\t.\tPASS\tAC_ASJ=1;AN_ASJ=4;CSQ=T|GENE1|c.1A>T|0.1|0.9|missense_variant|YES|HC",
            ],
            default_filters(),
            true,
        )
        .unwrap();
        let rows = data_rows(&output);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].ends_with("\t0\t0\t0\t0\t0\t0\t0.25"));
    }
}
