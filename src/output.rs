//! Output files for certificate maps and subgraph listings.
//!
//! Both live under fixed paths in the working directory:
//! `certificates/motif-size-<k>-certificates.txt` for the sequential
//! mode and `certificates/motif-size-<k>-output-<suffix>-certificates.txt`
//! when a node list is enumerated, mirrored under `subgraphs/`. The
//! directories must exist; nothing is created implicitly.

use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use crate::Error;

fn file_name(kind: &str, motif_size: usize, output_suffix: Option<i64>) -> String {
    match output_suffix {
        Some(suffix) => format!(
            "motif-size-{:03}-output-{:08}-{}.txt",
            motif_size, suffix, kind
        ),
        None => format!("motif-size-{:03}-{}.txt", motif_size, kind),
    }
}

pub fn certificates_path(
    directory: &Path,
    motif_size: usize,
    output_suffix: Option<i64>,
) -> PathBuf {
    directory
        .join("certificates")
        .join(file_name("certificates", motif_size, output_suffix))
}

pub fn subgraphs_path(directory: &Path, motif_size: usize, output_suffix: Option<i64>) -> PathBuf {
    directory
        .join("subgraphs")
        .join(file_name("subgraphs", motif_size, output_suffix))
}

/// The per-run output sinks: the certificate file, and the subgraph
/// listing when enabled.
pub struct OutputFiles {
    pub certificates: BufWriter<File>,
    pub subgraphs: Option<BufWriter<File>>,
}

fn create(path: PathBuf) -> Result<BufWriter<File>, Error> {
    match File::create(&path) {
        Ok(file) => Ok(BufWriter::new(file)),
        Err(source) => Err(Error::File { path, source }),
    }
}

pub fn open_output_files(
    directory: &Path,
    motif_size: usize,
    output_suffix: Option<i64>,
    write_subgraphs: bool,
) -> Result<OutputFiles, Error> {
    let certificates = create(certificates_path(directory, motif_size, output_suffix))?;

    let subgraphs = if write_subgraphs {
        Some(create(subgraphs_path(directory, motif_size, output_suffix))?)
    } else {
        None
    };

    Ok(OutputFiles {
        certificates,
        subgraphs,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sequential_paths() {
        let directory = Path::new("/tmp/run");
        assert_eq!(
            Path::new("/tmp/run/certificates/motif-size-005-certificates.txt"),
            certificates_path(directory, 5, None)
        );
        assert_eq!(
            Path::new("/tmp/run/subgraphs/motif-size-012-subgraphs.txt"),
            subgraphs_path(directory, 12, None)
        );
    }

    #[test]
    fn node_list_paths() {
        let directory = Path::new("/tmp/run");
        assert_eq!(
            Path::new("/tmp/run/certificates/motif-size-003-output-00000042-certificates.txt"),
            certificates_path(directory, 3, Some(42))
        );
        assert_eq!(
            Path::new("/tmp/run/subgraphs/motif-size-003-output-00000042-subgraphs.txt"),
            subgraphs_path(directory, 3, Some(42))
        );
    }

    #[test]
    fn missing_directory_is_an_error() {
        let directory = Path::new("/tmp/motif-census-no-such-directory");
        let result = open_output_files(directory, 3, None, false);
        assert!(matches!(result, Err(Error::File { .. })));
    }
}
