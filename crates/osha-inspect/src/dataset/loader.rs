use std::borrow::Cow;
use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::Path;

use csv::{ReaderBuilder, Writer};
use log::{debug, info, warn};

use crate::dataset::table::Dataset;
use crate::error::DatasetError;

const CSV_EXTENSION: &str = "csv";
const ZIP_EXTENSION: &str = "zip";

/// Reads CSV from `reader`. Cells are decoded lossily: bytes that are
/// not UTF-8 (e.g. Windows-1252 exports) become U+FFFD and a warning
/// names the source and the number of affected cells.
pub fn read_csv<R: Read>(reader: R, source: &Path) -> Result<Dataset, DatasetError> {
    let csv_error = |e| DatasetError::Csv {
        path: source.to_path_buf(),
        source: e,
    };

    let mut replaced = 0usize;
    let mut decode = |bytes: &[u8]| match String::from_utf8_lossy(bytes) {
        Cow::Borrowed(text) => text.to_string(),
        Cow::Owned(text) => {
            replaced += 1;
            text
        }
    };

    let mut csv_reader = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers: Vec<String> = csv_reader
        .byte_headers()
        .map_err(csv_error)?
        .iter()
        .map(&mut decode)
        .collect();

    let mut rows = Vec::new();
    for record in csv_reader.byte_records() {
        let record = record.map_err(csv_error)?;
        rows.push(record.iter().map(&mut decode).collect());
    }

    if replaced > 0 {
        warn!(
            "{}: {} cells were not valid UTF-8 and were decoded with replacement characters",
            source.display(),
            replaced
        );
    }

    debug!("Read {} rows from {}", rows.len(), source.display());
    Ok(Dataset::new(headers, rows))
}

pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Dataset, DatasetError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| DatasetError::Open {
        path: path.to_path_buf(),
        source: e,
    })?;
    read_csv(file, path)
}

/// Concatenates every `.csv` entry of a ZIP archive, in archive order.
pub fn load_zip<P: AsRef<Path>>(path: P) -> Result<Dataset, DatasetError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| DatasetError::Open {
        path: path.to_path_buf(),
        source: e,
    })?;
    read_zip(file, path)
}

fn read_zip<R: Read + Seek>(reader: R, path: &Path) -> Result<Dataset, DatasetError> {
    let zip_error = |e| DatasetError::Zip {
        path: path.to_path_buf(),
        source: e,
    };

    let mut archive = zip::ZipArchive::new(reader).map_err(zip_error)?;
    let mut dataset = Dataset::default();

    for i in 0..archive.len() {
        let entry = archive.by_index(i).map_err(zip_error)?;
        if !entry.is_file() || !has_extension(entry.name(), CSV_EXTENSION) {
            continue;
        }
        let entry_path = path.join(entry.name());
        dataset.append(read_csv(entry, &entry_path)?);
    }

    Ok(dataset)
}

fn has_extension(name: &str, extension: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

/// Loads one `.csv` or `.zip` input.
pub fn load_input<P: AsRef<Path>>(path: P) -> Result<Dataset, DatasetError> {
    let path = path.as_ref();
    let name = path.to_string_lossy();
    if has_extension(&name, CSV_EXTENSION) {
        load_csv(path)
    } else if has_extension(&name, ZIP_EXTENSION) {
        load_zip(path)
    } else {
        Err(DatasetError::UnsupportedInput(path.to_path_buf()))
    }
}

/// Loads and concatenates every input, matching columns by name.
pub fn load_inputs<P: AsRef<Path>>(paths: &[P]) -> Result<Dataset, DatasetError> {
    let mut dataset = Dataset::default();
    for path in paths {
        dataset.append(load_input(path)?);
    }
    info!(
        "Loaded {} rows with {} columns from {} input(s)",
        dataset.len(),
        dataset.width(),
        paths.len()
    );
    Ok(dataset)
}

pub fn write_csv<W: Write>(dataset: &Dataset, writer: W) -> Result<(), DatasetError> {
    let mut csv_writer = Writer::from_writer(writer);
    csv_writer.write_record(dataset.headers())?;
    for row in dataset.rows() {
        csv_writer.write_record(row)?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn save_csv<P: AsRef<Path>>(dataset: &Dataset, path: P) -> Result<(), DatasetError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| DatasetError::Open {
        path: path.to_path_buf(),
        source: e,
    })?;
    write_csv(dataset, file)?;
    info!("Wrote {} rows to {}", dataset.len(), path.display());
    Ok(())
}
