use serde::Serialize;

/// Version verdict for one container
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionResult {
    /// Version the container reports or its tag implies
    pub current_version: Option<String>,
    /// Highest release tag published for the image, if it could be determined
    pub latest_version: Option<String>,
    pub update_available: bool,
}

impl VersionResult {
    /// Builds a result. An update is never reported without a latest version
    /// to compare against.
    pub fn new(
        current_version: Option<String>,
        latest_version: Option<String>,
        update_available: bool,
    ) -> Self {
        let update_available = update_available && latest_version.is_some();
        Self {
            current_version,
            latest_version,
            update_available,
        }
    }

    /// Result for a container whose image is unknown
    pub fn unknown() -> Self {
        Self::new(None, None, false)
    }
}
