use crate::{constants::VCF_NAME_MARKER, error::VexError, utils::util::Result};
use flate2::read::MultiGzDecoder;
use std::{
    fs::File,
    io::{BufReader, Read as ioRead},
    path::{Path, PathBuf},
};

/// Opens a VCF for line-oriented reading, transparently decompressing gzip
/// input. Compression is decided by file extension and verified against the
/// gzip magic bytes before decoding starts.
pub fn open_vcf_reader(path: &Path) -> Result<BufReader<Box<dyn ioRead>>> {
    fn is_gzipped(path: &Path) -> bool {
        let path_str = path.to_string_lossy().to_lowercase();
        path_str.ends_with(".gz") || path_str.ends_with(".gzip")
    }
    if is_gzipped(path) {
        if !has_gzip_magic(path)? {
            return Err(VexError::InvalidGzipHeader {
                path: path.to_path_buf(),
            });
        }
        let file = open_file(path)?;
        Ok(BufReader::new(Box::new(MultiGzDecoder::new(file))))
    } else {
        let file = open_file(path)?;
        Ok(BufReader::new(Box::new(file)))
    }
}

fn open_file(path: &Path) -> Result<File> {
    File::open(path)
        .map_err(|error| crate::vex_error!("Failed to open file {}: {error}", path.display()))
}

fn has_gzip_magic(path: &Path) -> Result<bool> {
    let mut file = open_file(path)?;
    let mut magic = [0u8; 2];
    let n = std::io::Read::read(&mut file, &mut magic)
        .map_err(|e| crate::vex_error!("Failed to read {}: {e}", path.display()))?;
    Ok(n == 2 && magic == [0x1f, 0x8b])
}

/// Collects the VCF files of a directory: every plain file whose name
/// contains "vcf" (gnomAD genomes ship one VCF per chromosome), sorted for a
/// deterministic processing order.
pub fn collect_vcf_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| crate::vex_error!("Failed to read directory {}: {e}", dir.display()))?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry
            .map_err(|e| crate::vex_error!("Failed to list directory {}: {e}", dir.display()))?;
        let path = entry.path();
        if entry.file_name().to_string_lossy().contains(VCF_NAME_MARKER) && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
