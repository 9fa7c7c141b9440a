//! Output adapters (`spec.md` §4.H, §6 "Output formats").
//!
//! Grounded on `original_source/src/output/output.c`'s dispatch table:
//! a name selects one of a small set of format implementations, falling
//! back to `text` with a logged warning on an unrecognized name. Here
//! that becomes [`open_output`] returning a boxed [`OutputAdapter`].

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use strmatrix_core::{HarryError, Matrix, Result};

/// Drains a finished [`Matrix`] to some sink (`spec.md` §4.H).
pub trait OutputAdapter {
    fn open(&mut self, path: &Path) -> Result<()>;
    fn write(&mut self, matrix: &Matrix) -> Result<usize>;
    fn close(&mut self) -> Result<()>;
}

/// Default output format name, used when `open_output` is given an
/// unrecognized one (`spec.md` §7: "Usage ... locally recovered by
/// reverting to the default").
pub const DEFAULT_FORMAT: &str = "text";

/// Construct the named output adapter, falling back to [`DEFAULT_FORMAT`]
/// with a warning on an unknown name.
pub fn open_output(format: &str) -> Box<dyn OutputAdapter> {
    match format.to_ascii_lowercase().as_str() {
        "text" => Box::new(TextOutput::default()),
        "libsvm" => Box::new(LibsvmOutput::default()),
        other => {
            tracing::warn!(requested = other, fallback = DEFAULT_FORMAT, "unknown output format, falling back");
            Box::new(TextOutput::default())
        }
    }
}

/// `spec.md` §7 classifies an un-openable output sink as `Fatal`, not
/// `Resource` (`Resource` is reserved for allocation failures of the
/// matrix backing store, labels, or source array).
fn open_writer(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path)
        .map_err(|e| HarryError::Fatal(format!("could not open '{}': {e}", path.display())))?;
    Ok(BufWriter::new(file))
}

/// One line per stored pair: `label_x label_y src_x src_y value`, both
/// orientations emitted for a triangular matrix since `Matrix::get` is
/// symmetric over its packed storage (`spec.md` §6).
#[derive(Default)]
pub struct TextOutput {
    writer: Option<BufWriter<File>>,
}

impl OutputAdapter for TextOutput {
    fn open(&mut self, path: &Path) -> Result<()> {
        self.writer = Some(open_writer(path)?);
        Ok(())
    }

    fn write(&mut self, matrix: &Matrix) -> Result<usize> {
        let w = self
            .writer
            .as_mut()
            .ok_or_else(|| HarryError::Fatal("TextOutput::write called before open".into()))?;

        writeln!(w, "# strmatrix text output, {} rows", matrix.num)
            .map_err(|e| HarryError::Resource(e.to_string()))?;

        let mut count = 0;
        for x in matrix.x.i..matrix.x.n {
            for y in matrix.y.i..matrix.y.n {
                let value = matrix.get(x, y);
                let label_x = field(matrix.labels[x]);
                let label_y = field(matrix.labels[y]);
                let src_x = matrix.srcs[x].as_deref().unwrap_or("-");
                let src_y = matrix.srcs[y].as_deref().unwrap_or("-");
                writeln!(w, "{label_x} {label_y} {src_x} {src_y} {value}")
                    .map_err(|e| HarryError::Resource(e.to_string()))?;
                count += 1;
            }
        }
        Ok(count)
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut w) = self.writer.take() {
            w.flush().map_err(|e| HarryError::Resource(e.to_string()))?;
        }
        Ok(())
    }
}

fn field(label: Option<f32>) -> String {
    label.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// One line per row of the active x-range: `label_x <col>:<value> ...`
/// with 1-based columns over the active y-range (`spec.md` §6).
#[derive(Default)]
pub struct LibsvmOutput {
    writer: Option<BufWriter<File>>,
}

impl OutputAdapter for LibsvmOutput {
    fn open(&mut self, path: &Path) -> Result<()> {
        self.writer = Some(open_writer(path)?);
        Ok(())
    }

    fn write(&mut self, matrix: &Matrix) -> Result<usize> {
        let w = self
            .writer
            .as_mut()
            .ok_or_else(|| HarryError::Fatal("LibsvmOutput::write called before open".into()))?;

        let mut count = 0;
        for x in matrix.x.i..matrix.x.n {
            write!(w, "{}", field(matrix.labels[x])).map_err(|e| HarryError::Resource(e.to_string()))?;
            for (col, y) in (matrix.y.i..matrix.y.n).enumerate() {
                let value = matrix.get(x, y);
                write!(w, " {}:{value}", col + 1).map_err(|e| HarryError::Resource(e.to_string()))?;
            }
            writeln!(w).map_err(|e| HarryError::Resource(e.to_string()))?;
            count += 1;
        }
        Ok(count)
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut w) = self.writer.take() {
            w.flush().map_err(|e| HarryError::Resource(e.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strmatrix_core::SimString;

    fn batch() -> Vec<SimString> {
        vec![
            SimString::from_bytes(Some("a".into()), Some(1.0), 0, b"kitten".to_vec()),
            SimString::from_bytes(Some("b".into()), Some(0.0), 1, b"sitting".to_vec()),
        ]
    }

    #[test]
    fn text_output_writes_one_line_per_pair_plus_header() {
        let b = batch();
        let mut m = Matrix::init(&b);
        m.allocate();
        m.set(0, 0, 0.0);
        m.set(1, 0, 3.0);
        m.set(1, 1, 0.0);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let mut out = TextOutput::default();
        out.open(&path).unwrap();
        let count = out.write(&m).unwrap();
        out.close().unwrap();

        assert_eq!(count, 4);
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.lines().count() >= 5);
    }

    #[test]
    fn libsvm_output_writes_one_line_per_row() {
        let b = batch();
        let mut m = Matrix::init(&b);
        m.allocate();
        m.set(0, 0, 0.0);
        m.set(1, 0, 3.0);
        m.set(1, 1, 0.0);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.libsvm");
        let mut out = LibsvmOutput::default();
        out.open(&path).unwrap();
        let count = out.write(&m).unwrap();
        out.close().unwrap();

        assert_eq!(count, 2);
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.lines().next().unwrap().starts_with("1 1:"));
    }

    #[test]
    fn unknown_format_falls_back_to_text() {
        let adapter = open_output("xml");
        let _: Box<dyn OutputAdapter> = adapter;
    }
}
