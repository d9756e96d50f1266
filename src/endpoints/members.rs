use crate::{
    metadata::RequestMetadata,
    types::{DetailField, Member, MemberSecurities},
    Client, Result,
};

impl Client {
    /// Returns all member companies.
    pub async fn members(&self) -> Result<Vec<Member>> {
        let metadata = RequestMetadata::new("/api/vyk/members");
        Ok(self.get(metadata).await?.data)
    }

    /// Returns listed companies with their securities.
    pub async fn member_securities(&self) -> Result<Vec<MemberSecurities>> {
        let metadata = RequestMetadata::new("/api/vyk/memberSecurities");
        Ok(self.get(metadata).await?.data)
    }

    /// Returns general information fields for one company.
    pub async fn member_detail(&self, member_id: u64) -> Result<Vec<DetailField>> {
        let metadata = RequestMetadata::new(format!("/api/vyk/memberDetail/{member_id}"));
        Ok(self.get(metadata).await?.data)
    }
}
