//! Artifact names and their typed contents.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::SnapshotError;
use crate::card::Card;
use crate::catalog::{CardImages, Catalog, ImageEntry, PrefixTree};

/// One persisted catalog index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Artifact {
    CardDict,
    NameToId,
    ImageDict,
    CardImages,
    CardTree,
    Names,
    FullNames,
    OracleToId,
}

impl Artifact {
    pub const ALL: [Artifact; 8] = [
        Artifact::CardDict,
        Artifact::NameToId,
        Artifact::ImageDict,
        Artifact::CardImages,
        Artifact::CardTree,
        Artifact::Names,
        Artifact::FullNames,
        Artifact::OracleToId,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            Artifact::CardDict => "carddict.json",
            Artifact::NameToId => "nameToId.json",
            Artifact::ImageDict => "imagedict.json",
            Artifact::CardImages => "cardimages.json",
            Artifact::CardTree => "cardtree.json",
            Artifact::Names => "names.json",
            Artifact::FullNames => "full_names.json",
            Artifact::OracleToId => "oracleToId.json",
        }
    }

    /// Artifact stored under `file_name`, if any.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.file_name() == file_name)
    }

    /// Serialize this artifact's index from `catalog`.
    pub(crate) fn to_json(self, catalog: &Catalog) -> Result<Vec<u8>, SnapshotError> {
        let bytes = match self {
            Artifact::CardDict => serde_json::to_vec(&catalog.dict),
            Artifact::NameToId => serde_json::to_vec(&catalog.name_to_id),
            Artifact::ImageDict => serde_json::to_vec(&catalog.imagedict),
            Artifact::CardImages => serde_json::to_vec(&catalog.cardimages),
            Artifact::CardTree => serde_json::to_vec(&catalog.cardtree),
            Artifact::Names => serde_json::to_vec(&catalog.names),
            Artifact::FullNames => serde_json::to_vec(&catalog.full_names),
            Artifact::OracleToId => serde_json::to_vec(&catalog.oracle_to_id),
        };
        bytes.map_err(|e| SnapshotError::parse(self.file_name(), e))
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Parsed contents of one artifact.
#[derive(Debug, Clone, PartialEq)]
pub enum ArtifactData {
    CardDict(HashMap<String, Card>),
    NameToId(HashMap<String, Vec<String>>),
    ImageDict(HashMap<String, ImageEntry>),
    CardImages(HashMap<String, CardImages>),
    CardTree(PrefixTree),
    Names(Vec<String>),
    FullNames(PrefixTree),
    OracleToId(HashMap<String, Vec<String>>),
}

impl ArtifactData {
    pub fn parse(artifact: Artifact, bytes: &[u8]) -> Result<Self, SnapshotError> {
        let parsed = match artifact {
            Artifact::CardDict => serde_json::from_slice(bytes).map(Self::CardDict),
            Artifact::NameToId => serde_json::from_slice(bytes).map(Self::NameToId),
            Artifact::ImageDict => serde_json::from_slice(bytes).map(Self::ImageDict),
            Artifact::CardImages => serde_json::from_slice(bytes).map(Self::CardImages),
            Artifact::CardTree => from_nested_slice(bytes).map(Self::CardTree),
            Artifact::Names => serde_json::from_slice(bytes).map(Self::Names),
            Artifact::FullNames => from_nested_slice(bytes).map(Self::FullNames),
            Artifact::OracleToId => serde_json::from_slice(bytes).map(Self::OracleToId),
        };
        parsed.map_err(|e| SnapshotError::parse(artifact.file_name(), e))
    }

    pub fn artifact(&self) -> Artifact {
        match self {
            Self::CardDict(_) => Artifact::CardDict,
            Self::NameToId(_) => Artifact::NameToId,
            Self::ImageDict(_) => Artifact::ImageDict,
            Self::CardImages(_) => Artifact::CardImages,
            Self::CardTree(_) => Artifact::CardTree,
            Self::Names(_) => Artifact::Names,
            Self::FullNames(_) => Artifact::FullNames,
            Self::OracleToId(_) => Artifact::OracleToId,
        }
    }

    /// Replace the matching index of `catalog`.
    pub fn apply_to(self, catalog: &mut Catalog) {
        match self {
            Self::CardDict(dict) => catalog.dict = dict,
            Self::NameToId(name_to_id) => catalog.name_to_id = name_to_id,
            Self::ImageDict(imagedict) => catalog.imagedict = imagedict,
            Self::CardImages(cardimages) => catalog.cardimages = cardimages,
            Self::CardTree(tree) => catalog.cardtree = tree,
            Self::Names(names) => catalog.names = names,
            Self::FullNames(tree) => catalog.full_names = tree,
            Self::OracleToId(oracle_to_id) => catalog.oracle_to_id = oracle_to_id,
        }
    }
}

/// Parse a document nested two levels per character of its longest word.
///
/// Card names run past 140 characters, well beyond the parser's default
/// depth limit of 128.
fn from_nested_slice<'de, T: Deserialize<'de>>(bytes: &'de [u8]) -> serde_json::Result<T> {
    let mut de = serde_json::Deserializer::from_slice(bytes);
    de.disable_recursion_limit();
    let value = T::deserialize(&mut de)?;
    de.end()?;
    Ok(value)
}
