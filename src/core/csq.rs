use crate::constants::{CSQ_FORMAT_LABEL, CSQ_HEADER_MARKER, HC_LOF};
use std::collections::HashMap;

/// Ordered CSQ field names declared by the input's own header. Defines the
/// positional meaning of each pipe-delimited segment of a CSQ entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsqSchema {
    fields: Vec<String>,
}

impl CsqSchema {
    /// Extracts the field-name schema from a '#'-stripped header line, e.g.
    ///
    /// `INFO=<ID=CSQ,...,Description="... Format: Allele|Gene|HGVSc|...">`
    ///
    /// Returns `None` for header lines that do not declare the CSQ format.
    pub fn from_header_line(line: &str) -> Option<Self> {
        if !line.contains(CSQ_HEADER_MARKER) {
            return None;
        }
        let format = line.rsplit(CSQ_FORMAT_LABEL).next()?;
        let fields = format
            .trim_matches(|c| c == '"' || c == '>')
            .split('|')
            .map(str::to_string)
            .collect();
        Some(CsqSchema { fields })
    }

    #[cfg(test)]
    pub fn from_fields(fields: &[&str]) -> Self {
        CsqSchema {
            fields: fields.iter().map(|field| field.to_string()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Lazily expands a raw CSQ payload (comma-separated entries, each
    /// pipe-delimited) into one [`Annotation`] per well-formed entry.
    /// Entries whose segment count does not match the schema length are
    /// skipped. Single pass; the iterator is consumed once per record.
    pub fn expand<'a>(&'a self, payload: &'a str) -> impl Iterator<Item = Annotation<'a>> + 'a {
        payload.split(',').filter_map(move |entry| {
            let segments: Vec<&str> = entry.split('|').collect();
            if segments.len() != self.fields.len() {
                return None;
            }
            let values = self
                .fields
                .iter()
                .map(String::as_str)
                .zip(segments)
                .collect::<HashMap<_, _>>();
            Some(Annotation { values })
        })
    }
}

/// One transcript/consequence record: CSQ field name to raw value, borrowed
/// from the schema and the record's payload.
#[derive(Debug, Clone)]
pub struct Annotation<'a> {
    values: HashMap<&'a str, &'a str>,
}

impl<'a> Annotation<'a> {
    pub fn get(&self, field: &str) -> Option<&'a str> {
        self.values.get(field).copied()
    }

    fn field_or_empty(&self, field: &str) -> &'a str {
        self.get(field).unwrap_or("")
    }

    pub fn allele(&self) -> &'a str {
        self.field_or_empty("Allele")
    }

    pub fn gene(&self) -> &'a str {
        self.field_or_empty("Gene")
    }

    pub fn hgvsc(&self) -> &'a str {
        self.field_or_empty("HGVSc")
    }

    pub fn sift(&self) -> &'a str {
        self.field_or_empty("SIFT")
    }

    pub fn polyphen(&self) -> &'a str {
        self.field_or_empty("PolyPhen")
    }

    pub fn consequence(&self) -> &'a str {
        self.field_or_empty("Consequence")
    }

    /// VEP marks canonical transcripts with a non-empty CANONICAL value.
    pub fn is_canonical(&self) -> bool {
        !self.field_or_empty("CANONICAL").is_empty()
    }

    /// High-confidence loss-of-function call per the LOFTEE tier.
    pub fn is_hc_lof(&self) -> bool {
        self.field_or_empty("LoF") == HC_LOF
    }
}
