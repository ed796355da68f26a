use crate::{
    constants::{BASE_POPULATIONS, GNOMAD_POPULATION},
    core::info::InfoField,
    utils::util::log_warning,
};
use rust_decimal::Decimal;

/// One population cohort bound to its allele-count/allele-number INFO keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Population {
    pub code: String,
    pub ac_key: String,
    pub an_key: String,
}

impl Population {
    fn new(code: &str) -> Self {
        Population {
            code: code.to_string(),
            ac_key: format!("AC_{code}"),
            an_key: format!("AN_{code}"),
        }
    }
}

/// Immutable per-run population list, in output-column order.
#[derive(Debug, Clone)]
pub struct PopulationTable {
    populations: Vec<Population>,
}

impl PopulationTable {
    /// The base ExAC cohorts, extended with ASJ for gnomAD releases.
    pub fn new(gnomad: bool) -> Self {
        let mut populations: Vec<Population> = BASE_POPULATIONS
            .iter()
            .map(|code| Population::new(code))
            .collect();
        if gnomad {
            populations.push(Population::new(GNOMAD_POPULATION));
        }
        PopulationTable { populations }
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.populations
            .iter()
            .map(|population| population.code.as_str())
    }

    pub fn len(&self) -> usize {
        self.populations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.populations.is_empty()
    }

    /// Computes one allele frequency per population, in table order, for the
    /// allele at `allele_idx` of the record's ALT list.
    pub fn frequencies(&self, info: &InfoField, allele_idx: usize) -> Vec<Decimal> {
        self.populations
            .iter()
            .map(|population| population_frequency(population, info, allele_idx))
            .collect()
    }
}

/// AC/AN ratio for one population, in exact decimal arithmetic.
///
/// Absent AC/AN keys, zero or negative counts and zero denominators all
/// report 0 rather than failing; gnomAD r2 genomes carry no SAS cohort at
/// all, and AN is frequently reported once per record rather than once per
/// allele.
fn population_frequency(population: &Population, info: &InfoField, allele_idx: usize) -> Decimal {
    let (ac_raw, an_raw) = match (info.get(&population.ac_key), info.get(&population.an_key)) {
        (Some(ac_raw), Some(an_raw)) => (ac_raw, an_raw),
        _ => return Decimal::ZERO,
    };

    let ac_fields: Vec<&str> = ac_raw.split(',').collect();
    let an_fields: Vec<&str> = an_raw.split(',').collect();

    let ac_field = match ac_fields.get(allele_idx) {
        Some(ac_field) => *ac_field,
        None => {
            return log_warning(
                format!(
                    "{}={} has no value for allele index {}; reporting 0",
                    population.ac_key, ac_raw, allele_idx
                ),
                Decimal::ZERO,
            );
        }
    };
    let an_field = if an_fields.len() > 1 {
        match an_fields.get(allele_idx) {
            Some(an_field) => *an_field,
            None => {
                return log_warning(
                    format!(
                        "{}={} has no value for allele index {}; reporting 0",
                        population.an_key, an_raw, allele_idx
                    ),
                    Decimal::ZERO,
                );
            }
        }
    } else {
        an_fields[0]
    };

    let numerator = match parse_count(ac_field, &population.ac_key) {
        Some(numerator) => numerator,
        None => return Decimal::ZERO,
    };
    let denominator = match parse_count(an_field, &population.an_key) {
        Some(denominator) => denominator,
        None => return Decimal::ZERO,
    };

    if denominator.is_zero() || numerator <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    numerator / denominator
}

fn parse_count(raw: &str, key: &str) -> Option<Decimal> {
    match raw.trim().parse::<Decimal>() {
        Ok(value) => Some(value),
        Err(e) => log_warning(format!("Unparseable {key} value '{raw}': {e}"), None),
    }
}
