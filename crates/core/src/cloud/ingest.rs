//! Text sample-stream reader and writer
//!
//! The stream format is a leading integer count followed by whitespace
//! separated `x y z` triples. Line breaks carry no meaning.

use super::{PointCloud, Sample, StatsAccumulator};
use crate::error::{Result, WatershedError};
use std::io::{Read, Write};
use tracing::{debug, warn};

/// Knobs for [`ingest`].
#[derive(Debug, Clone, Copy, Default)]
pub struct IngestOptions {
    /// Reject streams whose triple count differs from the header.
    pub strict_count: bool,
}

/// Read a sample stream, accumulating statistics in the same pass.
///
/// # Errors
/// Returns an input-class [`WatershedError`] when the header is missing or not
/// positive, a token is not a number, the stream ends inside a triple, no
/// triples are present, or (with `strict_count`) the count does not match.
pub fn ingest<R: Read>(mut reader: R, options: IngestOptions) -> Result<PointCloud> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse(&text, options)
}

/// Parse an in-memory sample stream.
///
/// # Errors
/// Same conditions as [`ingest`].
pub fn parse(text: &str, options: IngestOptions) -> Result<PointCloud> {
    let mut tokens = text.split_whitespace().enumerate();

    let (_, header) = tokens.next().ok_or(WatershedError::EmptyInput)?;
    let declared: i64 = header.parse().map_err(|_| WatershedError::MalformedInput {
        token: 0,
        message: format!("expected sample count, found {header:?}"),
    })?;
    if declared <= 0 {
        return Err(WatershedError::NonPositiveCount(declared));
    }
    let declared = declared as usize;

    let mut samples = Vec::with_capacity(declared.min(1 << 24));
    let mut stats = StatsAccumulator::new();
    let mut triple = [0.0_f64; 3];
    let mut filled = 0;

    for (index, token) in tokens {
        triple[filled] = token
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| WatershedError::MalformedInput {
                token: index,
                message: format!("expected a finite number, found {token:?}"),
            })?;
        filled += 1;
        if filled == 3 {
            let sample = Sample::new(triple[0], triple[1], triple[2]);
            stats.push(&sample);
            samples.push(sample);
            filled = 0;
        }
    }

    if filled != 0 {
        return Err(WatershedError::MalformedInput {
            token: samples.len() * 3 + filled,
            message: "stream ended inside a sample triple".to_string(),
        });
    }

    let Some(statistics) = stats.finish() else {
        return Err(WatershedError::EmptyInput);
    };

    if samples.len() != declared {
        if options.strict_count {
            return Err(WatershedError::CountMismatch {
                declared,
                actual: samples.len(),
            });
        }
        warn!(
            "Header declares {} samples but {} were read, using {}",
            declared,
            samples.len(),
            samples.len()
        );
    }

    debug!(
        "Ingested {} samples, heights {:.2}..{:.2}",
        statistics.count, statistics.min_height, statistics.max_height
    );

    Ok(PointCloud {
        samples,
        statistics,
    })
}

/// Write samples back out in the stream format.
///
/// # Errors
/// Propagates any I/O error from `writer`.
pub fn write_samples<W: Write>(mut writer: W, samples: &[Sample]) -> Result<()> {
    writeln!(writer, "{}", samples.len())?;
    for sample in samples {
        writeln!(writer, "{:.1} {:.1} {:.15}", sample.x, sample.y, sample.z)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const GRID_3X3: &str = "9\n\
        0.0 0.0 1.0\n1.0 0.0 2.0\n2.0 0.0 3.0\n\
        0.0 1.0 4.0\n1.0 1.0 5.0\n2.0 1.0 6.0\n\
        0.0 2.0 7.0\n1.0 2.0 8.0\n2.0 2.0 9.0\n";

    #[test]
    fn test_parse_small_grid() {
        let cloud = parse(GRID_3X3, IngestOptions::default()).unwrap();
        assert_eq!(cloud.samples.len(), 9);
        assert_eq!(cloud.statistics.min_height, 1.0);
        assert_eq!(cloud.statistics.max_height, 9.0);
        assert_eq!(cloud.statistics.avg_height, 5.0);
        assert_eq!(cloud.samples[4], Sample::new(1.0, 1.0, 5.0));
    }

    #[test]
    fn test_empty_input() {
        let err = parse("", IngestOptions::default()).unwrap_err();
        assert!(matches!(err, WatershedError::EmptyInput));

        let err = parse("4\n", IngestOptions::default()).unwrap_err();
        assert!(matches!(err, WatershedError::EmptyInput));
    }

    #[test]
    fn test_non_positive_count() {
        let err = parse("0\n1 2 3\n", IngestOptions::default()).unwrap_err();
        assert!(matches!(err, WatershedError::NonPositiveCount(0)));
        assert_eq!(err.kind(), ErrorKind::Input);

        let err = parse("-3\n1 2 3\n", IngestOptions::default()).unwrap_err();
        assert!(matches!(err, WatershedError::NonPositiveCount(-3)));
    }

    #[test]
    fn test_garbled_tokens() {
        let err = parse("abc\n", IngestOptions::default()).unwrap_err();
        assert!(matches!(err, WatershedError::MalformedInput { token: 0, .. }));

        let err = parse("1\n1.0 nope 2.0\n", IngestOptions::default()).unwrap_err();
        assert!(matches!(err, WatershedError::MalformedInput { token: 2, .. }));
    }

    #[test]
    fn test_non_finite_values_rejected() {
        for text in ["1\n0 0 nan\n", "1\ninf 0 1\n", "1\n0 -infinity 1\n"] {
            let err = parse(text, IngestOptions::default()).unwrap_err();
            assert!(
                matches!(err, WatershedError::MalformedInput { .. }),
                "{text:?}"
            );
        }
    }

    #[test]
    fn test_truncated_triple() {
        let err = parse("2\n1 2 3\n4 5\n", IngestOptions::default()).unwrap_err();
        assert!(matches!(err, WatershedError::MalformedInput { .. }));
    }

    #[test]
    fn test_count_mismatch_policy() {
        let text = "3\n0 0 1\n1 0 2\n";
        let cloud = parse(text, IngestOptions::default()).unwrap();
        assert_eq!(cloud.samples.len(), 2);

        let err = parse(text, IngestOptions { strict_count: true }).unwrap_err();
        assert!(matches!(
            err,
            WatershedError::CountMismatch {
                declared: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn test_write_then_read() {
        let cloud = parse(GRID_3X3, IngestOptions::default()).unwrap();
        let mut out = Vec::new();
        write_samples(&mut out, &cloud.samples).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("9\n0.0 0.0 1.000000000000000\n"));

        let again = ingest(text.as_bytes(), IngestOptions { strict_count: true }).unwrap();
        assert_eq!(again.samples, cloud.samples);
    }
}
