use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Execution environment for a model run.
///
/// A run description arrives as JSON on stdin (or as a TOML config file): an
/// `input` section with the model parameters and a `replicate` index for
/// sweep tooling, a `model.files` map of named input files, and an `output`
/// section selecting a filesystem directory or stdout. Every file written
/// through the environment is digested so a manifest can attest that reruns
/// of the same description produced byte-identical outputs.
pub struct Environment<I = ()> {
    raw_input: serde_json::Map<String, Value>,
    pub input: Option<I>,
    pub replicate: u64,
    pub files: HashMap<String, PathBuf>,
    output: Value,
    manifest: BTreeMap<String, String>,
}

impl Environment {
    pub fn from_json(data: Value) -> Self {
        let mut raw_input = data
            .get("input")
            .and_then(|v| v.as_object())
            .cloned()
            .unwrap_or_default();

        let replicate = raw_input
            .remove("replicate")
            .and_then(|v| v.as_u64())
            .unwrap_or(0);

        let files = data
            .get("model")
            .and_then(|m| m.get("files"))
            .and_then(|f| f.as_object())
            .map(|obj| {
                obj.iter()
                    .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), PathBuf::from(s))))
                    .collect()
            })
            .unwrap_or_default();

        let output = data.get("output").cloned().unwrap_or(Value::Null);

        Self {
            raw_input,
            input: None,
            replicate,
            files,
            output,
            manifest: BTreeMap::new(),
        }
    }

    pub fn from_stdin() -> Self {
        let mut raw = String::new();
        io::stdin()
            .read_to_string(&mut raw)
            .expect("failed to read stdin");
        if raw.trim().is_empty() {
            eprintln!("Error: no input on stdin");
            std::process::exit(1);
        }
        let data: Value = serde_json::from_str(&raw).expect("failed to parse JSON from stdin");
        Self::from_json(data)
    }

    /// Reads a TOML file in place of a stdin run description. The top-level
    /// table becomes the input section, except for a reserved `[output]`
    /// table which is lifted into the output section.
    pub fn from_config_file(path: impl AsRef<Path>) -> Self {
        let raw = fs::read_to_string(path.as_ref()).expect("failed to read config file");
        let mut table: toml::Table = raw.parse().expect("failed to parse TOML config");
        let output = table
            .remove("output")
            .map(|v| serde_json::to_value(v).expect("failed to convert output section"))
            .unwrap_or(Value::Null);
        let input = serde_json::to_value(table).expect("failed to convert config");
        Self::from_json(serde_json::json!({ "input": input, "output": output }))
    }

    pub fn with_input_type<I: DeserializeOwned>(self) -> Environment<I> {
        let input_value = Value::Object(self.raw_input.clone());
        let input = serde_json::from_value(input_value).expect("failed to deserialize input");
        Environment {
            raw_input: self.raw_input,
            input: Some(input),
            replicate: self.replicate,
            files: self.files,
            output: self.output,
            manifest: self.manifest,
        }
    }
}

impl<I: DeserializeOwned> Environment<I> {
    pub fn load() -> Self {
        Environment::from_stdin().with_input_type::<I>()
    }
}

impl<I> Environment<I> {
    pub fn input_map(&self) -> &serde_json::Map<String, Value> {
        &self.raw_input
    }

    pub fn output_dir(&self) -> Option<PathBuf> {
        let output = self.output.as_object()?;

        // Flat output
        if output.get("spec").and_then(Value::as_str) == Some("filesystem") {
            return output.get("dir").and_then(Value::as_str).map(PathBuf::from);
        }

        // Profiled output, resolving the default profile
        let profiles = output.get("profile").and_then(|v| v.as_object())?;
        let selected = profiles.get("default").or_else(|| profiles.values().next())?;
        if selected.get("spec").and_then(Value::as_str) == Some("filesystem") {
            return selected.get("dir").and_then(Value::as_str).map(PathBuf::from);
        }

        None
    }

    pub fn write(&mut self, filename: &str, data: &[u8]) {
        self.manifest
            .insert(filename.to_string(), hex::encode(Sha256::digest(data)));
        if let Some(dir) = self.output_dir() {
            fs::create_dir_all(&dir).expect("failed to create output directory");
            fs::write(dir.join(filename), data).expect("failed to write output file");
        } else {
            io::stdout()
                .write_all(data)
                .expect("failed to write to stdout");
        }
    }

    pub fn write_csv(&mut self, filename: &str, headers: &[&str], rows: &[Vec<String>]) {
        let mut buf = Vec::new();
        {
            let mut wtr = csv::Writer::from_writer(&mut buf);
            wtr.write_record(headers).expect("failed to write CSV header");
            for row in rows {
                wtr.write_record(row).expect("failed to write CSV row");
            }
            wtr.flush().expect("failed to flush CSV");
        }
        self.write(filename, &buf);
    }

    /// Filename -> hex SHA-256 of every file written so far.
    pub fn manifest(&self) -> &BTreeMap<String, String> {
        &self.manifest
    }

    /// Writes `manifest.json` next to the other outputs. Stdout runs have
    /// nothing to attest and skip it.
    pub fn write_manifest(&self) {
        if let Some(dir) = self.output_dir() {
            fs::create_dir_all(&dir).expect("failed to create output directory");
            let body = serde_json::to_vec_pretty(&self.manifest)
                .expect("failed to serialize manifest");
            fs::write(dir.join("manifest.json"), body).expect("failed to write manifest");
        }
    }
}
