use db::models::asset::AssetHardware;
use serde::Serialize;
use util::network::normalize_mac;

/// Where an employee record's MAC address can come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MacSource {
    LaptopSpec,
    IntelNucSpec,
}

impl MacSource {
    /// Sources in the order they are consulted. The first non-empty MAC wins.
    pub const PRECEDENCE: [MacSource; 2] = [MacSource::LaptopSpec, MacSource::IntelNucSpec];

    /// The raw MAC this source holds for `hardware`, if any.
    pub fn read(self, hardware: &AssetHardware) -> Option<&str> {
        match self {
            MacSource::LaptopSpec => hardware.laptop.as_ref()?.mac_wlan.as_deref(),
            MacSource::IntelNucSpec => hardware.intel_nuc.as_ref()?.mac_wlan.as_deref(),
        }
    }
}

/// Resolves the MAC of `hardware` following [`MacSource::PRECEDENCE`].
///
/// Blank values are skipped; the winner is returned normalized.
pub fn derive_mac(hardware: &AssetHardware) -> Option<(MacSource, String)> {
    MacSource::PRECEDENCE.iter().find_map(|source| {
        let mac = normalize_mac(source.read(hardware)?);
        (!mac.is_empty()).then_some((*source, mac))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use db::models::{asset, intel_nuc_spec, laptop_spec};

    fn hardware(laptop_mac: Option<Option<&str>>, nuc_mac: Option<Option<&str>>) -> AssetHardware {
        let now = Utc::now();
        AssetHardware {
            asset: asset::Model {
                id: 1,
                asset_code: "AST-1".into(),
                name: "Asset".into(),
                created_at: now,
                updated_at: now,
            },
            laptop: laptop_mac.map(|mac| laptop_spec::Model {
                id: 1,
                asset_id: 1,
                processor: None,
                ram: None,
                mac_wlan: mac.map(str::to_string),
                created_at: now,
                updated_at: now,
            }),
            intel_nuc: nuc_mac.map(|mac| intel_nuc_spec::Model {
                id: 1,
                asset_id: 1,
                processor: None,
                ram: None,
                mac_wlan: mac.map(str::to_string),
                created_at: now,
                updated_at: now,
            }),
        }
    }

    #[test]
    fn laptop_spec_takes_precedence_over_nuc() {
        let hw = hardware(Some(Some("aa:aa:aa:aa:aa:aa")), Some(Some("BB:BB:BB:BB:BB:BB")));
        assert_eq!(
            derive_mac(&hw),
            Some((MacSource::LaptopSpec, "AA:AA:AA:AA:AA:AA".to_string()))
        );
    }

    #[test]
    fn falls_back_to_nuc_when_laptop_has_no_mac() {
        let hw = hardware(Some(None), Some(Some("BB:BB:BB:BB:BB:BB")));
        assert_eq!(
            derive_mac(&hw),
            Some((MacSource::IntelNucSpec, "BB:BB:BB:BB:BB:BB".to_string()))
        );

        let hw = hardware(Some(Some("  ")), Some(Some("bbbbbbbbbbbb")));
        assert_eq!(derive_mac(&hw).map(|(s, _)| s), Some(MacSource::IntelNucSpec));
    }

    #[test]
    fn no_spec_means_no_mac() {
        assert_eq!(derive_mac(&hardware(None, None)), None);
        assert_eq!(derive_mac(&hardware(None, Some(None))), None);
    }
}
