use std::path::{Path, PathBuf};

use alloy::dyn_abi::{DynSolValue, Specifier};
use alloy::json_abi::JsonAbi;
use alloy::primitives::Bytes;
use serde::Deserialize;

use crate::error::{ConfigurationError, DeploymentError};

/// Compiled contract as written by the build: `<dir>/<ContractName>.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    pub contract_name: String,
    pub abi: JsonAbi,
    pub bytecode: Bytes,
}

impl ContractArtifact {
    pub fn path(dir: impl AsRef<Path>, contract_name: &str) -> PathBuf {
        dir.as_ref().join(format!("{}.json", contract_name))
    }

    pub fn load(dir: impl AsRef<Path>, contract_name: &str) -> Result<Self, ConfigurationError> {
        let path = Self::path(dir, contract_name);
        let invalid = |reason: String| ConfigurationError::Artifact {
            path: path.clone(),
            reason,
        };
        let json = std::fs::read_to_string(&path).map_err(|e| invalid(e.to_string()))?;
        let artifact = Self::from_json(&json).map_err(|e| invalid(e.to_string()))?;
        if artifact.contract_name != contract_name {
            return Err(invalid(format!(
                "artifact is for contract `{}`",
                artifact.contract_name
            )));
        }
        Ok(artifact)
    }

    pub fn from_json(json: &str) -> Result<Self, ArtifactError> {
        let artifact: ContractArtifact = serde_json::from_str(json)?;
        if artifact.bytecode.is_empty() {
            return Err(ArtifactError::EmptyBytecode);
        }
        Ok(artifact)
    }

    /// Creation payload: bytecode followed by the constructor arguments,
    /// each literal coerced to the type the constructor declares.
    pub fn encode_deployment(&self, constructor_args: &[String]) -> Result<Bytes, DeploymentError> {
        let rejected = |reason: String| DeploymentError::ConstructorArgs {
            contract: self.contract_name.clone(),
            reason,
        };
        let inputs = self
            .abi
            .constructor
            .as_ref()
            .map(|constructor| constructor.inputs.as_slice())
            .unwrap_or_default();
        if inputs.len() != constructor_args.len() {
            return Err(rejected(format!(
                "expected {} arguments, got {}",
                inputs.len(),
                constructor_args.len()
            )));
        }

        let mut values = Vec::with_capacity(inputs.len());
        for (param, literal) in inputs.iter().zip(constructor_args) {
            let ty = param.resolve().map_err(|e| rejected(e.to_string()))?;
            let value = ty.coerce_str(literal).map_err(|e| {
                rejected(format!("`{}` is not a valid {}: {}", literal, param.ty, e))
            })?;
            values.push(value);
        }

        let mut code = self.bytecode.to_vec();
        if !values.is_empty() {
            code.extend(DynSolValue::Tuple(values).abi_encode_params());
        }
        Ok(code.into())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("bytecode is empty")]
    EmptyBytecode,
}
