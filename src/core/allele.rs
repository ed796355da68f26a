/// Resolves which ALT allele a CSQ annotation's allele designation refers
/// to, as a zero-based index into the record's ALT list.
///
/// Single-allele records are unambiguous. For multi-allelic records an exact
/// match wins; failing that, the first ALT containing the designation as a
/// substring is taken (VEP trims shared bases from indel alleles, so the
/// designation can be a fragment of the ALT spelling). With no match at all
/// the index falls back to 0.
pub fn resolve_allele_index(alleles: &[&str], designation: &str) -> usize {
    if alleles.len() <= 1 {
        return 0;
    }
    if let Some(index) = alleles.iter().position(|allele| *allele == designation) {
        return index;
    }
    alleles
        .iter()
        .position(|allele| allele.contains(designation))
        .unwrap_or(0)
}
