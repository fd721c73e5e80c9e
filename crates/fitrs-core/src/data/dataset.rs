use crate::data::DataError;
use crate::model::validate_inputs;

use std::fs::File;
use std::path::Path;
use tracing::info;

/// Paired training data that already passed [`validate_inputs`].
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    x: Vec<f64>,
    y: Vec<f64>,
}

pub fn mk_rdr<P: AsRef<Path>>(filename: P) -> Result<csv::Reader<File>, DataError> {
    let file = File::open(filename)?;
    let rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);
    Ok(rdr)
}

fn parse_value(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

impl Dataset {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self, DataError> {
        validate_inputs(&x, &y)?;
        Ok(Self { x, y })
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }
    pub fn y(&self) -> &[f64] {
        &self.y
    }
    pub fn len(&self) -> usize {
        self.x.len()
    }
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Reads two named columns from a comma separated file with a header row.
    /// Rows are numbered from 1, not counting the header.
    pub fn from_csv<P: AsRef<Path>>(path: P, x_col: &str, y_col: &str) -> Result<Self, DataError> {
        let path = path.as_ref();
        let mut rdr = mk_rdr(path)?;

        let headers = rdr.headers()?.clone();
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| DataError::MissingColumn(name.to_owned()))
        };
        let x_idx = find(x_col)?;
        let y_idx = find(y_col)?;

        let mut x = Vec::new();
        let mut y = Vec::new();
        for (i, record) in rdr.records().enumerate() {
            let record = record?;
            for (idx, name, out) in [(x_idx, x_col, &mut x), (y_idx, y_col, &mut y)] {
                let raw = record.get(idx).unwrap_or("");
                let value = parse_value(raw).ok_or_else(|| DataError::NotNumeric {
                    row: i + 1,
                    column: name.to_owned(),
                    value: raw.to_owned(),
                })?;
                out.push(value);
            }
        }

        info!(path = %path.display(), rows = x.len(), "loaded dataset");
        Self::new(x, y)
    }

    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), DataError> {
        let mut wtr = csv::Writer::from_path(path)?;
        wtr.write_record(["x", "y"])?;
        for (xi, yi) in self.x.iter().zip(&self.y) {
            wtr.write_record(&[xi.to_string(), yi.to_string()])?;
        }
        wtr.flush()?;
        Ok(())
    }
}
