use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Output fields whose values do not depend on the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarcConstants {
    /// Custodian code written in `535` and `906`.
    pub owner_code: String,
    pub media_337: String,
    pub carrier_338: String,
    pub cataloguing_agency_948: String,
    pub format: String,
    /// `999` local-system fields, one output field each.
    pub local_999: Vec<String>,
}

impl Default for MarcConstants {
    fn default() -> Self {
        Self {
            owner_code: "VIS".to_string(),
            media_337: "$$acomputer$$bc$$2rdamedia".to_string(),
            carrier_338: "$$aonline resource$$bcr$$2rdacarrier".to_string(),
            cataloguing_agency_948: "$$aNNL".to_string(),
            format: "MX".to_string(),
            local_999: vec![
                "$$bNOULI".to_string(),
                "$$bNOOCLC".to_string(),
                "$$aARCHIVE".to_string(),
            ],
        }
    }
}

/// Everything the encoder reads besides the batch and the authorities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderSettings {
    pub constants: MarcConstants,
    /// Cataloguer name to cataloguer code (`921`/`933`).
    pub cataloguer_codes: BTreeMap<String, String>,
}
