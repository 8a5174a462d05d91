use crate::loader::ConfigLoader;
use crate::orchestrator::{synthesize, XorShiftConfig};
use crate::types::TuringMachineError;
use tracing::warn;

// Embedded preset configurations
const PRESET_TEXTS: [&str; 4] = [
    include_str!("../presets/classic.json"),
    include_str!("../presets/nibble.json"),
    include_str!("../presets/zero.json"),
    include_str!("../presets/mixed.json"),
];

lazy_static::lazy_static! {
    /// Presets parsed once on first use. A preset that fails to parse is logged and skipped.
    pub static ref PRESETS: Vec<XorShiftConfig> = PRESET_TEXTS
        .iter()
        .filter_map(|text| match ConfigLoader::load_config_from_string(text) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!(error = %e, "failed to parse embedded preset");
                None
            }
        })
        .collect();
}

pub struct PresetManager;

impl PresetManager {
    /// Get the number of available presets
    pub fn get_preset_count() -> usize {
        PRESETS.len()
    }

    /// Get a preset by its index
    pub fn get_preset_by_index(index: usize) -> Result<XorShiftConfig, TuringMachineError> {
        PRESETS.get(index).cloned().ok_or_else(|| {
            TuringMachineError::ValidationError(format!("Preset index {} out of range", index))
        })
    }

    /// Get a preset by its name, ignoring case
    pub fn get_preset_by_name(name: &str) -> Result<XorShiftConfig, TuringMachineError> {
        PRESETS
            .iter()
            .find(|preset| preset.name.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| {
                TuringMachineError::ValidationError(format!("Preset '{}' not found", name))
            })
    }

    /// List all preset names
    pub fn list_preset_names() -> Vec<String> {
        PRESETS.iter().map(|preset| preset.name.clone()).collect()
    }

    /// Search for presets whose name or description contains `query`
    pub fn search_presets(query: &str) -> Vec<usize> {
        let query = query.to_lowercase();
        PRESETS
            .iter()
            .enumerate()
            .filter(|(_, preset)| {
                preset.name.to_lowercase().contains(&query)
                    || preset.description.to_lowercase().contains(&query)
            })
            .map(|(index, _)| index)
            .collect()
    }

    /// Get information about a preset by its index, including the size of its program
    pub fn get_preset_info(index: usize) -> Result<PresetInfo, TuringMachineError> {
        let preset = Self::get_preset_by_index(index)?;
        let program = synthesize(&preset)?;

        Ok(PresetInfo {
            index,
            name: preset.name.clone(),
            description: preset.description.clone(),
            seed: preset.seed.clone(),
            shifts: (preset.a, preset.b, preset.c),
            state_count: program.rules.len(),
            transition_count: program.transition_count(),
        })
    }

    /// Get the original JSON text of a preset by its index
    pub fn get_preset_text_by_index(index: usize) -> Result<&'static str, TuringMachineError> {
        PRESET_TEXTS.get(index).copied().ok_or_else(|| {
            TuringMachineError::ValidationError(format!(
                "Preset text index {} out of range",
                index
            ))
        })
    }
}

#[derive(Debug, Clone)]
pub struct PresetInfo {
    pub index: usize,
    pub name: String,
    pub description: String,
    pub seed: String,
    pub shifts: (usize, usize, usize),
    pub state_count: usize,
    pub transition_count: usize,
}
