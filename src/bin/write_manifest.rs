//! Manifest utility for HullRot model artifacts.
//!
//! Writes `manifest.json` binding `encoder.json` and `hr_risk_model.json` by
//! SHA-256 digest, so the application refuses artifacts that were changed
//! after export.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin write_manifest -- <model_dir> [--created-at <unix_seconds>]
//! ```

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use hullrot::adapters::loader::{
    sha256_hex, ArtifactManifest, CLASSIFIER_FILE, ENCODER_FILE, MANIFEST_FILE, MANIFEST_VERSION,
};

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

fn usage() -> String {
    "Usage: write_manifest <model_dir> [--created-at <unix_seconds>]".to_string()
}

fn parse_args() -> Result<(PathBuf, Option<i64>), String> {
    let mut args = env::args().skip(1);
    let mut model_dir: Option<PathBuf> = None;
    let mut created_at: Option<i64> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--created-at" => {
                let v = args.next().ok_or_else(usage)?;
                let parsed = v
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| "--created-at must be an integer".to_string())?;
                created_at = Some(parsed);
            }
            "-h" | "--help" => return Err(usage()),
            _ => {
                if model_dir.is_none() {
                    model_dir = Some(PathBuf::from(arg));
                } else {
                    return Err(usage());
                }
            }
        }
    }

    let model_dir = model_dir.ok_or_else(usage)?;
    Ok((model_dir, created_at))
}

fn main() -> Result<(), String> {
    let (model_dir, created_at) = parse_args()?;

    if !model_dir.is_dir() {
        return Err(format!("Model directory not found: {model_dir:?}"));
    }

    let mut files: BTreeMap<String, String> = BTreeMap::new();
    for rel in [ENCODER_FILE, CLASSIFIER_FILE] {
        let path = model_dir.join(rel);
        let bytes = fs::read(&path).map_err(|e| format!("Failed to read {path:?}: {e}"))?;
        files.insert(rel.to_string(), sha256_hex(&bytes));
    }

    let manifest = ArtifactManifest {
        version: MANIFEST_VERSION,
        created_at: Some(created_at.unwrap_or_else(unix_now)),
        files,
    };

    let manifest_bytes = serde_json::to_vec_pretty(&manifest)
        .map_err(|e| format!("Failed to serialize manifest: {e}"))?;

    let manifest_path = model_dir.join(MANIFEST_FILE);
    fs::write(&manifest_path, &manifest_bytes)
        .map_err(|e| format!("Failed to write {manifest_path:?}: {e}"))?;

    println!("Wrote {}", manifest_path.display());
    for (rel, digest) in &manifest.files {
        println!("  {rel}: {digest}");
    }

    Ok(())
}
