//! Path parameter types for HTTP handlers.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Path parameters for encounter-level operations.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EncounterPathParams {
    /// Unique identifier of the encounter.
    pub encounter_id: Uuid,
}

/// Path parameters for patient-level operations.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientPathParams {
    /// Unique identifier of the patient.
    pub patient_id: Uuid,
}

/// Path parameters for transfer-level operations.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferPathParams {
    /// Unique identifier of the transfer.
    pub transfer_id: Uuid,
}

/// Path parameters for attachment operations.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentPathParams {
    /// Unique identifier of the attachment.
    pub attachment_id: Uuid,
}
