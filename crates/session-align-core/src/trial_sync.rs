//! C10 — resolve per-trial clock offsets from behavioral-controller time to
//! absolute hardware time (spec §4.10, "the most subtle subsystem").

use std::collections::{BTreeMap, HashMap};

use session_types::{TrialOffsetMap, TrialSyncWarning, TrialTypeDescriptor};

use crate::{Error, Result};

/// One trial's data as already extracted from the behavioral controller's
/// recording, in the shape `TrialSyncResolver` needs. Parsing the
/// controller's native file format into this shape is the caller's
/// responsibility — this component only runs the synchronization algorithm.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTrial {
    /// 1-based trial index.
    pub trial_index: usize,
    pub trial_type: String,
    /// `T_i` — this trial's start time on the behavioral controller's clock.
    pub start_time: f64,
    /// `raw_states_i` — named state -> start time within the trial.
    pub states: BTreeMap<String, f64>,
}

pub struct TrialSyncResolver;

impl TrialSyncResolver {
    /// Resolve `TrialOffsetMap` + warnings for `trials`, given the session's
    /// trial-type descriptors and each sync TTL channel's sorted pulse
    /// sequence (by channel id).
    ///
    /// `drift_sanity_threshold_s` bounds `|δ_i - δ_{i-1}|` between
    /// consecutive resolved trials before it is flagged as a warning.
    pub fn resolve(
        trial_types: &[TrialTypeDescriptor],
        trials: &[ParsedTrial],
        pulses_by_channel: &BTreeMap<String, Vec<f64>>,
        drift_sanity_threshold_s: f64,
    ) -> Result<(TrialOffsetMap, Vec<TrialSyncWarning>)> {
        let types_by_name: HashMap<&str, &TrialTypeDescriptor> = trial_types
            .iter()
            .map(|t| (t.trial_type.as_str(), t))
            .collect();

        let mut offsets = TrialOffsetMap::new();
        let mut warnings = Vec::new();
        let mut next_pulse_index: HashMap<&str, usize> = HashMap::new();
        let mut truncated_channels: std::collections::HashSet<&str> = std::collections::HashSet::new();
        let mut last_offset: Option<(usize, f64)> = None;

        for trial in trials {
            // LOOKUP_TYPE
            let Some(descriptor) = types_by_name.get(trial.trial_type.as_str()) else {
                warnings.push(TrialSyncWarning::SyncStateMissing {
                    trial_index: trial.trial_index,
                });
                continue;
            };

            // EXTRACT_SYNC_TIME
            let Some(&sync_state_time) = trial.states.get(&descriptor.sync_signal_name) else {
                warnings.push(TrialSyncWarning::SyncStateMissing {
                    trial_index: trial.trial_index,
                });
                continue;
            };
            let target_i = trial.start_time + sync_state_time;

            // ASSIGN_PULSE
            let channel_id = descriptor.sync_ttl_channel_id.as_str();
            let pulses = pulses_by_channel.get(channel_id).ok_or_else(|| {
                Error::TrialSyncError(format!(
                    "sync TTL channel '{channel_id}' is not present in the manifest"
                ))
            })?;

            let pulse_index = *next_pulse_index.entry(channel_id).or_insert(0);
            if pulse_index >= pulses.len() {
                if truncated_channels.insert(channel_id) {
                    warnings.push(TrialSyncWarning::PulseCountTruncated {
                        n_pulses: pulses.len(),
                        n_trials: trials.len(),
                    });
                }
                continue;
            }
            next_pulse_index.insert(channel_id, pulse_index + 1);

            // COMPUTE_DELTA
            let p_i = pulses[pulse_index];
            let delta_i = p_i - target_i;

            if let Some((prev_index, prev_delta)) = last_offset {
                if prev_index + 1 == trial.trial_index {
                    let drift = (delta_i - prev_delta).abs();
                    if drift > drift_sanity_threshold_s {
                        warnings.push(TrialSyncWarning::DriftExceedsSanityThreshold {
                            trial_index: trial.trial_index,
                            drift_s: drift,
                        });
                    }
                }
            }

            offsets.insert(trial.trial_index, delta_i);
            last_offset = Some((trial.trial_index, delta_i));
        }

        Ok((offsets, warnings))
    }
}
