//! Version checking utilities for protocol upgrades

use crate::errors::OracleError;
use crate::state::{OracleConfig, CURRENT_PROTOCOL_VERSION, MIN_SUPPORTED_VERSION};
use anchor_lang::prelude::*;

/// Check that the oracle config version is compatible with the current program
///
/// # Returns
/// * `Ok(())` if version is compatible
/// * `Err(OracleError::AccountVersionTooOld)` if the config needs migration
/// * `Err(OracleError::AccountVersionTooNew)` if the program needs upgrade
/// * `Err(OracleError::VersionMismatchProtocol)` if the config is inconsistent
pub fn check_version_compatible(config: &OracleConfig) -> Result<()> {
    if config.protocol_version < config.min_supported_version {
        msg!(
            "Config version {} is below its minimum supported {}",
            config.protocol_version,
            config.min_supported_version
        );
        return Err(OracleError::AccountVersionTooOld.into());
    }

    if config.protocol_version > CURRENT_PROTOCOL_VERSION {
        msg!(
            "Config version {} is newer than program version {}",
            config.protocol_version,
            CURRENT_PROTOCOL_VERSION
        );
        return Err(OracleError::AccountVersionTooNew.into());
    }

    if config.min_supported_version < MIN_SUPPORTED_VERSION
        || config.min_supported_version > CURRENT_PROTOCOL_VERSION
    {
        msg!(
            "Config min_supported_version {} is outside supported range {}-{}",
            config.min_supported_version,
            MIN_SUPPORTED_VERSION,
            CURRENT_PROTOCOL_VERSION
        );
        return Err(OracleError::VersionMismatchProtocol.into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_compatible() {
        assert!(check_version_compatible(&OracleConfig::default()).is_ok());
    }

    #[test]
    fn test_version_below_minimum_rejected() {
        let config = OracleConfig {
            protocol_version: 1,
            min_supported_version: 2,
            ..Default::default()
        };
        assert_eq!(
            check_version_compatible(&config).unwrap_err(),
            anchor_lang::error::Error::from(OracleError::AccountVersionTooOld)
        );
    }

    #[test]
    fn test_version_too_new_rejected() {
        let config = OracleConfig {
            protocol_version: CURRENT_PROTOCOL_VERSION + 1,
            ..Default::default()
        };
        assert_eq!(
            check_version_compatible(&config).unwrap_err(),
            anchor_lang::error::Error::from(OracleError::AccountVersionTooNew)
        );
    }

    #[test]
    fn test_min_supported_out_of_range_rejected() {
        let config = OracleConfig {
            protocol_version: CURRENT_PROTOCOL_VERSION,
            min_supported_version: 0,
            ..Default::default()
        };
        assert_eq!(
            check_version_compatible(&config).unwrap_err(),
            anchor_lang::error::Error::from(OracleError::VersionMismatchProtocol)
        );
    }
}
