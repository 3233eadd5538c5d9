use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};

use crate::error::{KMeansError, Result};
use crate::vector::Vector;

/// A parsed set of points, all sharing one dimension.
#[derive(Debug, Clone)]
pub struct DataSet {
    points: Vec<Vector>,
    dim: usize,
}

impl DataSet {
    /// Parse comma-separated numeric rows, one point per row, each with
    /// exactly `dim` fields.
    ///
    /// A row with the wrong field count or a non-numeric token fails the
    /// whole parse with `MalformedInput`; no partial point list is
    /// returned. Row numbers in errors are 1-based.
    pub fn from_reader<R: Read>(reader: R, dim: usize) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut points = Vec::new();

        for (i, result) in rdr.records().enumerate() {
            let row = i + 1;
            let record = result.map_err(|e| KMeansError::MalformedInput {
                row,
                reason: e.to_string(),
            })?;

            if record.len() != dim {
                return Err(KMeansError::MalformedInput {
                    row,
                    reason: format!("expected {} fields, found {}", dim, record.len()),
                });
            }

            let mut components = Vec::with_capacity(dim);
            for field in record.iter() {
                let value = field.parse::<f64>().map_err(|_| KMeansError::MalformedInput {
                    row,
                    reason: format!("not a number: {:?}", field),
                })?;
                components.push(value);
            }
            points.push(Vector::new(components));
        }

        Ok(Self { points, dim })
    }

    /// Read a data file from disk.
    pub fn from_path<P: AsRef<Path>>(path: P, dim: usize) -> Result<Self> {
        let file = File::open(&path).map_err(|e| KMeansError::Io {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        Self::from_reader(file, dim)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn points(&self) -> &[Vector] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Vector> {
        self.points
    }
}
