//! C7 — abstract source of reference timestamps (spec §4.7).

use session_types::{CameraDescriptor, Config, Manifest, TimebaseSource};

use crate::{Error, PulseReader, Result};

/// A strictly-monotonic non-decreasing sequence of reference timestamps,
/// sourced one of three ways.
#[derive(Debug, Clone, PartialEq)]
pub enum TimebaseProvider {
    NominalRate { starting_time: f64, rate: f64 },
    Ttl { pulse_times: Vec<f64> },
    ExternalClock { sample_times: Vec<f64> },
}

impl TimebaseProvider {
    pub fn nominal_rate(starting_time: f64, rate: f64) -> Result<Self> {
        if rate <= 0.0 {
            return Err(Error::TimebaseError(format!(
                "nominal rate must be > 0, got {rate}"
            )));
        }
        Ok(Self::NominalRate { starting_time, rate })
    }

    pub fn ttl(pulse_times: Vec<f64>) -> Result<Self> {
        require_strictly_monotonic(&pulse_times)?;
        Ok(Self::Ttl { pulse_times })
    }

    pub fn external_clock(sample_times: Vec<f64>) -> Result<Self> {
        require_strictly_monotonic(&sample_times)?;
        Ok(Self::ExternalClock { sample_times })
    }

    /// Build the variant named by `config.timebase.source`.
    ///
    /// `external_samples` supplies the named external stream's sample times
    /// for the `ExternalClock` variant — ingestion of that stream is outside
    /// this component's responsibility, so the caller provides it already
    /// loaded.
    pub fn from_config(
        config: &Config,
        manifest: &Manifest,
        camera: &CameraDescriptor,
        external_samples: Option<&[f64]>,
    ) -> Result<Self> {
        match config.timebase.source {
            TimebaseSource::NominalRate => {
                Self::nominal_rate(config.timebase.offset_s, camera.nominal_rate_hz)
            }
            TimebaseSource::Ttl => {
                let ttl_id = config.timebase.ttl_id.as_ref().ok_or_else(|| {
                    Error::TimebaseError("timebase.source = ttl requires timebase.ttl_id".into())
                })?;
                let entry = manifest.ttl(ttl_id).ok_or_else(|| {
                    Error::TimebaseError(format!(
                        "timebase.ttl_id '{ttl_id}' does not reference a TTL entry in the manifest"
                    ))
                })?;
                Self::ttl(PulseReader::read_many(&entry.file_paths))
            }
            TimebaseSource::ExternalClock => {
                let samples = external_samples.ok_or_else(|| {
                    Error::TimebaseError(
                        "timebase.source = external_clock requires pre-loaded external samples"
                            .into(),
                    )
                })?;
                Self::external_clock(samples.to_vec())
            }
        }
    }

    /// Return the first `n` reference timestamps.
    ///
    /// `NominalRate` has infinite domain and never fails. `Ttl`/
    /// `ExternalClock` fail if `n` exceeds the underlying pulse/sample count.
    pub fn get_timestamps(&self, n: usize) -> Result<Vec<f64>> {
        match self {
            Self::NominalRate { starting_time, rate } => {
                Ok((0..n).map(|i| starting_time + i as f64 / rate).collect())
            }
            Self::Ttl { pulse_times } => take_n(pulse_times, n),
            Self::ExternalClock { sample_times } => take_n(sample_times, n),
        }
    }

    /// The underlying source sequence, for variants that have one.
    pub fn pulse_times(&self) -> Option<&[f64]> {
        match self {
            Self::NominalRate { .. } => None,
            Self::Ttl { pulse_times } => Some(pulse_times),
            Self::ExternalClock { sample_times } => Some(sample_times),
        }
    }

    pub fn source_kind(&self) -> TimebaseSource {
        match self {
            Self::NominalRate { .. } => TimebaseSource::NominalRate,
            Self::Ttl { .. } => TimebaseSource::Ttl,
            Self::ExternalClock { .. } => TimebaseSource::ExternalClock,
        }
    }
}

fn take_n(sequence: &[f64], n: usize) -> Result<Vec<f64>> {
    if n > sequence.len() {
        return Err(Error::TimebaseError(format!(
            "requested {n} timestamps but source sequence has only {}",
            sequence.len()
        )));
    }
    Ok(sequence[..n].to_vec())
}

fn require_strictly_monotonic(sequence: &[f64]) -> Result<()> {
    if sequence.windows(2).any(|w| w[1] <= w[0]) {
        return Err(Error::TimebaseError(
            "timebase source sequence is not strictly monotonic".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nominal_rate_is_closed_form() {
        let tb = TimebaseProvider::nominal_rate(10.0, 2.0).unwrap();
        assert_eq!(tb.get_timestamps(3).unwrap(), vec![10.0, 10.5, 11.0]);
    }

    #[test]
    fn nominal_rate_rejects_non_positive_rate() {
        assert!(TimebaseProvider::nominal_rate(0.0, 0.0).is_err());
        assert!(TimebaseProvider::nominal_rate(0.0, -1.0).is_err());
    }

    #[test]
    fn ttl_rejects_non_monotonic_input() {
        let err = TimebaseProvider::ttl(vec![1.0, 2.0, 2.0]).unwrap_err();
        assert!(matches!(err, Error::TimebaseError(_)));
        let err = TimebaseProvider::ttl(vec![1.0, 0.5]).unwrap_err();
        assert!(matches!(err, Error::TimebaseError(_)));
    }

    #[test]
    fn ttl_get_timestamps_beyond_length_is_an_error() {
        let tb = TimebaseProvider::ttl(vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(tb.get_timestamps(2).unwrap(), vec![1.0, 2.0]);
        assert!(tb.get_timestamps(4).is_err());
    }

    #[test]
    fn external_clock_behaves_like_ttl() {
        let tb = TimebaseProvider::external_clock(vec![0.1, 0.2]).unwrap();
        assert_eq!(tb.pulse_times(), Some(&[0.1, 0.2][..]));
    }
}
