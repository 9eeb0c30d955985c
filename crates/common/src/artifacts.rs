//! Discovery and loading of compiled contract artifacts.
//!
//! Both the Hardhat layout (`artifacts/contracts/Foo.sol/Foo.json`, bytecode as a hex string)
//! and the Foundry layout (`out/Foo.sol/Foo.json`, bytecode under `bytecode.object`) are read.

use alloy_json_abi::JsonAbi;
use alloy_primitives::{Bytes, hex};
use serde::Deserialize;
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};
use walkdir::WalkDir;

/// Directory holding compiler inputs/outputs, never contract artifacts.
const BUILD_INFO_DIR: &str = "build-info";

/// Errors that can occur while resolving an artifact.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("artifacts directory {} does not exist, compile the contracts first", .0.display())]
    MissingDirectory(PathBuf),
    #[error("could not find artifact for contract {id:?} in {}", dir.display())]
    NotFound { id: String, dir: PathBuf },
    #[error(
        "multiple artifacts found for contract {name:?}, use a fully qualified name instead:\n{}",
        candidates.iter().map(|c| format!("\t{c}")).collect::<Vec<_>>().join("\n")
    )]
    Ambiguous { name: String, candidates: Vec<String> },
    #[error("failed to read artifact {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse artifact {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("contract {0:?} has no bytecode, it may be abstract or an interface")]
    EmptyBytecode(String),
    #[error(
        "Dynamic linking not supported - deploy the following library contracts first, then provide the address to link at compile time\n{libraries}"
    )]
    Unlinked { libraries: String },
    #[error("contract {name:?} has invalid bytecode")]
    InvalidBytecode {
        name: String,
        #[source]
        source: hex::FromHexError,
    },
    #[error(transparent)]
    Walk(#[from] walkdir::Error),
}

/// A contract identifier in the form `Name` or `path/to/File.sol:Name`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContractId {
    /// The source path, if the identifier is fully qualified.
    pub path: Option<String>,
    /// The contract name.
    pub name: String,
}

impl ContractId {
    pub fn new(name: impl Into<String>) -> Self {
        Self { path: None, name: name.into() }
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(path) = &self.path {
            write!(f, "{path}:")?;
        }
        f.write_str(&self.name)
    }
}

impl FromStr for ContractId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, name) = match s.rsplit_once(':') {
            Some((path, name)) => (Some(path.to_string()), name),
            None => (None, s),
        };
        if name.is_empty() || path.as_deref().is_some_and(str::is_empty) {
            return Err(format!("invalid contract identifier {s:?}, expected `<path>:<name>` or `<name>`"));
        }
        Ok(Self { path, name: name.to_string() })
    }
}

/// A contract's ABI and creation bytecode, ready for deployment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractArtifact {
    /// The fully qualified identifier of the artifact.
    pub id: ContractId,
    /// The artifact file the contract was read from.
    pub file: PathBuf,
    pub abi: JsonAbi,
    pub bytecode: Bytes,
}

impl ContractArtifact {
    /// Finds the artifact for `id` under `dir` and loads it.
    pub fn load(dir: &Path, id: &ContractId) -> Result<Self, ArtifactError> {
        let file = find_artifact(dir, id)?;
        Self::read(dir, &file, &id.name)
    }

    /// Reads the artifact of contract `name` from `file`.
    fn read(dir: &Path, file: &Path, name: &str) -> Result<Self, ArtifactError> {
        trace!(file = %file.display(), "reading artifact");
        let content = std::fs::read_to_string(file)
            .map_err(|source| ArtifactError::Read { path: file.to_path_buf(), source })?;
        let raw: RawArtifact = serde_json::from_str(&content)
            .map_err(|source| ArtifactError::Parse { path: file.to_path_buf(), source })?;

        let (object, link_references) = match raw.bytecode {
            RawBytecode::Hex(object) => (object, raw.link_references),
            RawBytecode::Object { object, link_references } => (object, link_references),
        };
        let object = object.trim_start_matches("0x");

        if object.is_empty() {
            return Err(ArtifactError::EmptyBytecode(name.to_string()));
        }
        // library placeholders, `__$<hash>$__` or the legacy `__<name>___`
        if object.contains("__") {
            let libraries = link_references
                .iter()
                .flat_map(|(path, names)| names.keys().map(move |name| format!("\t{name}: {path}")))
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect::<Vec<_>>()
                .join("\n");
            return Err(ArtifactError::Unlinked { libraries });
        }
        let bytecode = hex::decode(object)
            .map_err(|source| ArtifactError::InvalidBytecode { name: name.to_string(), source })?;

        let id = ContractId { path: Some(source_path(dir, file)), name: name.to_string() };
        Ok(Self { id, file: file.to_path_buf(), abi: raw.abi, bytecode: bytecode.into() })
    }
}

/// Returns the artifact file of the contract `id` in `dir`.
///
/// A bare name must match exactly one artifact. A fully qualified name selects the artifact whose
/// source directory matches the given path.
pub fn find_artifact(dir: &Path, id: &ContractId) -> Result<PathBuf, ArtifactError> {
    if !dir.is_dir() {
        return Err(ArtifactError::MissingDirectory(dir.to_path_buf()));
    }

    let file_name = format!("{}.json", id.name);
    let mut candidates = Vec::new();
    let entries = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.file_name() != BUILD_INFO_DIR);
    for entry in entries {
        let entry = entry?;
        if entry.file_type().is_file() && entry.file_name().to_str() == Some(file_name.as_str()) {
            candidates.push(entry.into_path());
        }
    }

    if let Some(path) = &id.path {
        let wanted = Path::new(path);
        // Foundry drops the source directories, `out/Foo.sol` matches `src/Foo.sol`
        candidates.retain(|file| {
            let source = source_path(dir, file);
            !source.is_empty() && (Path::new(&source).ends_with(wanted) || wanted.ends_with(&source))
        });
    }
    debug!(contract = %id, candidates = candidates.len(), "resolved artifact candidates");

    match candidates.len() {
        0 => Err(ArtifactError::NotFound { id: id.to_string(), dir: dir.to_path_buf() }),
        1 => Ok(candidates.remove(0)),
        _ => Err(ArtifactError::Ambiguous {
            name: id.name.clone(),
            candidates: candidates
                .iter()
                .map(|file| format!("{}:{}", source_path(dir, file), id.name))
                .collect(),
        }),
    }
}

/// Returns the source path of an artifact file, i.e. its directory relative to `dir`.
fn source_path(dir: &Path, file: &Path) -> String {
    file.parent()
        .and_then(|parent| parent.strip_prefix(dir).ok())
        .map(|source| source.to_string_lossy().replace('\\', "/"))
        .unwrap_or_default()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArtifact {
    abi: JsonAbi,
    bytecode: RawBytecode,
    /// Hardhat keeps link references next to the bytecode string.
    #[serde(default)]
    link_references: LinkReferences,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    Hex(String),
    #[serde(rename_all = "camelCase")]
    Object {
        object: String,
        #[serde(default)]
        link_references: LinkReferences,
    },
}

/// Source path -> library name -> offsets. Only the keys are of interest.
type LinkReferences = BTreeMap<String, BTreeMap<String, serde_json::Value>>;
