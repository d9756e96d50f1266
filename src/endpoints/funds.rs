use crate::{
    metadata::RequestMetadata,
    types::{DetailField, Fund, FundListParams},
    Client, Result,
};

impl Client {
    /// Returns all funds, optionally filtered.
    ///
    /// Every value in a filter list is sent as its own query parameter.
    pub async fn funds(&self, params: Option<&FundListParams>) -> Result<Vec<Fund>> {
        let mut metadata = RequestMetadata::new("/api/vyk/funds");

        if let Some(params) = params {
            metadata = metadata
                .with_repeated_query_param("fundState", &params.fund_state)
                .with_repeated_query_param("fundClass", &params.fund_class)
                .with_repeated_query_param("fundType", &params.fund_type);
        }

        Ok(self.get(metadata).await?.data)
    }

    /// Returns general information fields for one fund.
    pub async fn fund_detail(&self, fund_id: u64) -> Result<Vec<DetailField>> {
        let metadata = RequestMetadata::new(format!("/api/vyk/fundDetail/{fund_id}"));
        Ok(self.get(metadata).await?.data)
    }
}
