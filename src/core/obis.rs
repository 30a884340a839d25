//! Static [OBIS](https://en.wikipedia.org/wiki/IEC_62056#OBIS) code table of the Leneda platform.

use crate::prelude::*;

#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ObisCode {
    pub code: &'static str,
    pub description: &'static str,

    /// Unit of the per-interval samples and of the hourly averages.
    pub rate_unit: &'static str,

    /// Unit of the hourly accumulated values and of the running sum.
    pub cumulative_unit: &'static str,

    pub rate_unit_class: Option<&'static str>,
    pub cumulative_unit_class: Option<&'static str>,
}

impl ObisCode {
    pub const DEFAULT: &'static str = "1-1:1.29.0";

    /// Look the code up in the table.
    pub fn lookup(code: &str) -> Result<&'static Self> {
        OBIS_CODES
            .iter()
            .find(|obis_code| obis_code.code == code)
            .with_context(|| format!("unsupported OBIS code `{code}`"))
    }

    const fn active(code: &'static str, description: &'static str) -> Self {
        Self {
            code,
            description,
            rate_unit: "kW",
            cumulative_unit: "kWh",
            rate_unit_class: Some("power"),
            cumulative_unit_class: Some("energy"),
        }
    }

    const fn reactive(code: &'static str, description: &'static str) -> Self {
        Self {
            code,
            description,
            rate_unit: "kVAR",
            cumulative_unit: "kVARh",
            rate_unit_class: Some("reactive_power"),
            cumulative_unit_class: None,
        }
    }

    const fn gas(
        code: &'static str,
        description: &'static str,
        unit: &'static str,
        unit_class: &'static str,
    ) -> Self {
        let unit_class = Some(unit_class);
        Self {
            code,
            description,
            rate_unit: unit,
            cumulative_unit: unit,
            rate_unit_class: unit_class,
            cumulative_unit_class: unit_class,
        }
    }
}

pub const OBIS_CODES: &[ObisCode] = &[
    ObisCode::active("1-1:1.29.0", "Measured active consumption"),
    ObisCode::active("1-1:2.29.0", "Measured active production"),
    ObisCode::reactive("1-1:3.29.0", "Measured reactive consumption"),
    ObisCode::reactive("1-1:4.29.0", "Measured reactive production"),
    ObisCode::active("1-65:1.29.1", "Consumption covered by production sharing, layer 1"),
    ObisCode::active("1-65:1.29.3", "Consumption covered by production sharing, layer 2"),
    ObisCode::active("1-65:1.29.2", "Consumption covered by production sharing, layer 3"),
    ObisCode::active("1-65:1.29.4", "Consumption covered by production sharing, layer 4"),
    ObisCode::active("1-65:1.29.9", "Remaining consumption after sharing"),
    ObisCode::active("1-65:2.29.1", "Production shared, layer 1"),
    ObisCode::active("1-65:2.29.3", "Production shared, layer 2"),
    ObisCode::active("1-65:2.29.2", "Production shared, layer 3"),
    ObisCode::active("1-65:2.29.4", "Production shared, layer 4"),
    ObisCode::active("1-65:2.29.9", "Remaining production after sharing"),
    ObisCode::gas("7-1:99.23.15", "Measured consumed gas volume", "m³", "volume"),
    ObisCode::gas("7-1:99.23.17", "Measured consumed gas standard volume", "Nm³", "volume"),
    ObisCode::gas("7-20:99.33.17", "Measured consumed gas energy", "kWh", "energy"),
];
