use crate::{metadata::RequestMetadata, types::CaEventStatus, Client, Result};

impl Client {
    /// Returns the status of the corporate action event with the given process reference.
    pub async fn ca_event_status(&self, process_ref_id: &str) -> Result<CaEventStatus> {
        let metadata = RequestMetadata::new("/api/vyk/caEventStatus")
            .with_query_param("processRefId", process_ref_id);
        Ok(self.get(metadata).await?.data)
    }
}
