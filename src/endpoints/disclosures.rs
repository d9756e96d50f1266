use crate::{
    metadata::RequestMetadata,
    types::{Disclosure, DisclosureDetail, DisclosureListParams, FileType, LastDisclosureIndexResponse},
    Client, Result,
};
use serde_json::Value;

impl Client {
    /// Returns up to 50 disclosures published from `disclosure_index` onwards.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use kap::{types::DisclosureListParams, Client};
    ///
    /// # async fn example() -> Result<(), kap::Error> {
    /// let client = Client::builder().basic_auth("user", "pass").build()?;
    ///
    /// let params = DisclosureListParams {
    ///     disclosure_class: Some("FR".to_string()),
    ///     ..Default::default()
    /// };
    /// for disclosure in client.disclosures(1092228, Some(&params)).await? {
    ///     println!("{} {}", disclosure.disclosure_index, disclosure.title);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn disclosures(
        &self,
        disclosure_index: u64,
        params: Option<&DisclosureListParams>,
    ) -> Result<Vec<Disclosure>> {
        let mut metadata = RequestMetadata::new("/api/vyk/disclosures")
            .with_query_param("disclosureIndex", disclosure_index.to_string());

        if let Some(params) = params {
            metadata = metadata
                .with_optional_query_param("disclosureClass", params.disclosure_class.as_deref())
                .with_optional_query_param("disclosureTypes", params.disclosure_type.as_deref())
                .with_optional_query_param("companyId", params.company_id.as_deref());
        }

        Ok(self.get(metadata).await?.data)
    }

    /// Returns the full details of one disclosure.
    ///
    /// `sub_report_list` narrows the sub-reports returned; `None` returns all.
    pub async fn disclosure_detail(
        &self,
        disclosure_index: u64,
        file_type: FileType,
        sub_report_list: Option<&str>,
    ) -> Result<DisclosureDetail> {
        let metadata = RequestMetadata::new(format!("/api/vyk/disclosureDetail/{disclosure_index}"))
            .with_query_param("fileType", file_type.as_str())
            .with_optional_query_param("subReportList", sub_report_list);

        Ok(self.get(metadata).await?.data)
    }

    /// Returns the index of the most recently published disclosure.
    pub async fn last_disclosure_index(&self) -> Result<String> {
        let metadata = RequestMetadata::new("/api/vyk/lastDisclosureIndex");
        let response = self.get::<LastDisclosureIndexResponse>(metadata).await?;
        Ok(response.data.last_disclosure_index)
    }

    /// Returns blocked disclosures and attachments as raw JSON.
    pub async fn blocked_disclosures(&self) -> Result<Value> {
        let metadata = RequestMetadata::new("/api/vyk/blockedDisclosures");
        Ok(self.get(metadata).await?.data)
    }
}
