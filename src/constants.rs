/// Population cohorts shared by ExAC and gnomAD releases, in output-column
/// order.
pub const BASE_POPULATIONS: [&str; 6] = ["AFR", "AMR", "SAS", "EAS", "FIN", "NFE"];

/// gnomAD adds the Ashkenazi Jewish cohort on top of the base set.
pub const GNOMAD_POPULATION: &str = "ASJ";

/// INFO key holding the VEP consequence payload.
pub const CSQ_KEY: &str = "CSQ";

/// Marker identifying the header line that declares the CSQ field layout.
pub const CSQ_HEADER_MARKER: &str = "ID=CSQ";

/// Label preceding the pipe-delimited field names inside the CSQ declaration.
pub const CSQ_FORMAT_LABEL: &str = "Format: ";

/// First token of the column header line, after '#'-stripping.
pub const COLUMN_HEADER_NAME: &str = "CHROM";

/// LOFTEE tier for high-confidence loss-of-function calls.
pub const HC_LOF: &str = "HC";

/// File names containing this substring are picked up in directory mode.
pub const VCF_NAME_MARKER: &str = "vcf";

pub const DEFAULT_OUTPUT_PATH: &str = "variantdetails.txt";

/// Fixed leading columns of the output table; population codes follow.
pub const FIXED_OUTPUT_COLUMNS: [&str; 9] = [
    "HGVSC",
    "ENSGID",
    "CHROM",
    "POS",
    "RSID",
    "Allele",
    "SIFT",
    "PolyPhen",
    "Consequence",
];
