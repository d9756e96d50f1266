use crate::{download::Download, metadata::RequestMetadata, Client, Result};

impl Client {
    /// Starts downloading a disclosure attachment.
    ///
    /// The body is left unread; see [`Download`].
    pub async fn download_attachment(&self, attachment_id: &str) -> Result<Download> {
        let metadata = RequestMetadata::new(format!("/api/vyk/downloadAttachment/{attachment_id}"));
        self.get_raw(metadata).await
    }
}
