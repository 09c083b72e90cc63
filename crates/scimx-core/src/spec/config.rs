use serde::Deserialize;

/// SCIM service provider configuration
///
/// Advertised capabilities that gate optional protocol features. Only the
/// capabilities the engine consults are modelled.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceProviderConfig {
    #[serde(default)]
    pub patch: Capability,
    #[serde(default)]
    pub etag: Capability,
}

/// A single on/off capability
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capability {
    #[serde(default)]
    pub supported: bool,
}
