use anyhow::{anyhow, Result};
use serde::Deserialize;

use crate::{
    consts::MPH_ISSUANCE_MODEL_ADDRESS,
    utils::{parse_address, to_hex_id},
};

fn default_issuance_model() -> String {
    to_hex_id(&MPH_ISSUANCE_MODEL_ADDRESS)
}

/// Module parameters, passed by the host as a query string,
/// e.g. `mph_issuance_model=0x36ad542dadc22078511d64b98aff818abd1ac713`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Params {
    /// Contract queried for a pool's reward multipliers when the pool is first seen.
    #[serde(default = "default_issuance_model")]
    pub mph_issuance_model: String,
}

impl Default for Params {
    fn default() -> Self {
        Self { mph_issuance_model: default_issuance_model() }
    }
}

impl Params {
    pub fn parse_from_query(input: &str) -> Result<Self> {
        let params: Params = serde_qs::from_str(input)
            .map_err(|e| anyhow!("Failed to parse query params: {}", e))?;
        params.issuance_model()?;
        Ok(params)
    }

    pub fn issuance_model(&self) -> Result<Vec<u8>> {
        parse_address(&self.mph_issuance_model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_uses_defaults() {
        let params = Params::parse_from_query("").unwrap();
        assert_eq!(params, Params::default());
        assert_eq!(params.issuance_model().unwrap(), MPH_ISSUANCE_MODEL_ADDRESS.to_vec());
    }

    #[test]
    fn parses_issuance_model_override() {
        let params =
            Params::parse_from_query("mph_issuance_model=0x0000000000000000000000000000000000000042")
                .unwrap();
        let mut expected = vec![0u8; 20];
        expected[19] = 0x42;
        assert_eq!(params.issuance_model().unwrap(), expected);
    }

    #[test]
    fn rejects_malformed_address() {
        assert!(Params::parse_from_query("mph_issuance_model=0x1234").is_err());
    }
}
