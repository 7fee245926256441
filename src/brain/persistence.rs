//! Weights file for trained controllers
//!
//! The weights file is binary:
//!
//! ```text
//! [u64 byte length of all weight records][weight records...][bias records...]
//! ```
//!
//! with each record laid out as described in [`crate::tensor::codec`]. Next to
//! it a `<path>.meta.json` file records how and when the weights were
//! produced; it is informational and never required for loading.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::Variables;
use crate::evolution::TrainConfig;
use crate::tensor::{codec, TensorError};

const LENGTH_PREFIX: usize = 8;

/// Metadata saved with the weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Grid width the controller was trained on
    pub grid_width: usize,

    /// Grid height the controller was trained on
    pub grid_height: usize,

    /// Generation that produced these weights
    pub generation: usize,

    /// Normalized fitness of the controller in that generation
    pub fitness: f64,

    /// Version identifier for compatibility checking
    pub version: String,

    /// Settings of the training run that produced the weights
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training: Option<TrainConfig>,
}

impl ModelMetadata {
    pub fn new(grid_width: usize, grid_height: usize, generation: usize, fitness: f64) -> Self {
        Self {
            grid_width,
            grid_height,
            generation,
            fitness,
            version: env!("CARGO_PKG_VERSION").to_string(),
            training: None,
        }
    }

    /// Attach the training settings
    pub fn with_training(mut self, config: TrainConfig) -> Self {
        self.training = Some(config);
        self
    }
}

/// Serialize controller parameters into the weights-file layout
pub fn encode_variables(variables: &Variables) -> Vec<u8> {
    let weights = codec::encode_list(variables.weights());
    let biases = codec::encode_list(variables.biases());

    let mut out = Vec::with_capacity(LENGTH_PREFIX + weights.len() + biases.len());
    out.extend_from_slice(&(weights.len() as u64).to_le_bytes());
    out.extend_from_slice(&weights);
    out.extend_from_slice(&biases);
    out
}

/// Parse the weights-file layout.
///
/// A length prefix that runs past the end of the data is an error, as is
/// any record whose declared shape overruns its section.
pub fn decode_variables(bytes: &[u8]) -> Result<Variables, TensorError> {
    if bytes.len() < LENGTH_PREFIX {
        return Err(TensorError::Truncated {
            needed: LENGTH_PREFIX,
            available: bytes.len(),
        });
    }

    let mut prefix = [0u8; LENGTH_PREFIX];
    prefix.copy_from_slice(&bytes[..LENGTH_PREFIX]);
    let weight_len = u64::from_le_bytes(prefix);

    let available = bytes.len() - LENGTH_PREFIX;
    let weight_end = usize::try_from(weight_len)
        .ok()
        .filter(|&len| len <= available)
        .map(|len| LENGTH_PREFIX + len)
        .ok_or(TensorError::Truncated {
            needed: usize::try_from(weight_len).unwrap_or(usize::MAX),
            available,
        })?;

    let weights = codec::decode_list(&bytes[LENGTH_PREFIX..weight_end])?;
    let biases = codec::decode_list(&bytes[weight_end..])?;

    Ok(Variables::new(weights, biases))
}

/// Save controller parameters and metadata
///
/// Creates parent directories if they don't exist. The weights go to `path`
/// and the metadata to `<path>.meta.json`.
pub fn save_variables(variables: &Variables, metadata: &ModelMetadata, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    std::fs::write(path, encode_variables(variables))
        .with_context(|| format!("Failed to write weights to {:?}", path))?;

    let meta_path = metadata_path(path);
    let meta_json =
        serde_json::to_string_pretty(metadata).context("Failed to serialize metadata")?;
    std::fs::write(&meta_path, meta_json)
        .with_context(|| format!("Failed to write metadata to {:?}", meta_path))?;

    Ok(())
}

/// Load controller parameters from a weights file
pub fn load_variables(path: &Path) -> Result<Variables> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read weights from {:?}", path))?;
    let variables = decode_variables(&bytes)
        .with_context(|| format!("Corrupt weights file {:?}", path))?;
    Ok(variables)
}

/// Load the metadata written next to a weights file, if present
pub fn load_metadata(path: &Path) -> Result<ModelMetadata> {
    let meta_path = metadata_path(path);
    let meta_json = std::fs::read_to_string(&meta_path)
        .with_context(|| format!("Failed to read metadata from {:?}", meta_path))?;
    serde_json::from_str(&meta_json).context("Failed to deserialize metadata")
}

fn metadata_path(path: &Path) -> std::path::PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".meta.json");
    name.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evolution::GameEnd;
    use crate::game::Board;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::TempDir;

    fn sample() -> Variables {
        let mut rng = StdRng::seed_from_u64(42);
        Variables::random(&Board::new(4, 3), &mut rng)
    }

    #[test]
    fn test_encode_decode_bit_identical() {
        let vars = sample();
        let decoded = decode_variables(&encode_variables(&vars)).unwrap();

        for (a, b) in vars.weights().iter().zip(decoded.weights()) {
            assert_eq!(a.dims(), b.dims());
            let bits_a: Vec<u64> = a.values().iter().map(|v| v.to_bits()).collect();
            let bits_b: Vec<u64> = b.values().iter().map(|v| v.to_bits()).collect();
            assert_eq!(bits_a, bits_b);
        }
        assert_eq!(decoded, vars);
    }

    #[test]
    fn test_length_prefix_matches_weight_section() {
        let vars = sample();
        let bytes = encode_variables(&vars);
        let weight_len: usize = vars.weights().iter().map(|m| m.encoded_len()).sum();
        assert_eq!(&bytes[..8], &(weight_len as u64).to_le_bytes());
    }

    #[test]
    fn test_overrunning_prefix_is_rejected() {
        let mut bytes = encode_variables(&sample());
        let bogus = (bytes.len() as u64) * 2;
        bytes[..8].copy_from_slice(&bogus.to_le_bytes());
        assert!(matches!(
            decode_variables(&bytes),
            Err(TensorError::Truncated { .. })
        ));
    }

    #[test]
    fn test_truncated_file_is_rejected() {
        let bytes = encode_variables(&sample());
        assert!(decode_variables(&bytes[..bytes.len() - 3]).is_err());
        assert!(decode_variables(&bytes[..4]).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("models").join("best.dat");
        let vars = sample();
        let metadata = ModelMetadata::new(4, 3, 7, 42.5);

        save_variables(&vars, &metadata, &path).unwrap();

        assert_eq!(load_variables(&path).unwrap(), vars);
        assert_eq!(load_metadata(&path).unwrap(), metadata);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        assert!(load_variables(&temp_dir.path().join("nope.dat")).is_err());
    }

    #[test]
    fn test_metadata_serialization() {
        let metadata = ModelMetadata::new(11, 11, 3, 12.0);
        let json = serde_json::to_string(&metadata).unwrap();
        let deserialized: ModelMetadata = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.grid_width, 11);
        assert_eq!(deserialized.generation, 3);
        assert_eq!(deserialized.version, env!("CARGO_PKG_VERSION"));
        assert!(!json.contains("training"));
        assert_eq!(deserialized.training, None);
    }

    #[test]
    fn test_metadata_records_training_settings() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("best.dat");
        let mut training = TrainConfig::new(5, 8, path.clone());
        training.game_end = GameEnd::Extinction;
        training.seed = Some(3);
        let metadata = ModelMetadata::new(11, 11, 4, 9.5).with_training(training.clone());

        save_variables(&sample(), &metadata, &path).unwrap();

        let json = std::fs::read_to_string(metadata_path(&path)).unwrap();
        assert!(json.contains("\"game_end\": \"extinction\""));
        assert_eq!(load_metadata(&path).unwrap().training, Some(training));
    }
}
