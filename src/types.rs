//! Payload types returned by the platform.
//!
//! Field names follow the platform's camelCase JSON. The platform omits
//! fields or sends `null` freely, so record types decode a missing or null
//! scalar to its empty value instead of failing the whole listing. Fields
//! that only some records carry are `Option`s; free-form content whose
//! shape depends on the disclosure type is kept as [`serde_json::Value`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Decodes `null` as `T::default()`.
///
/// Missing fields are covered by the container-level `#[serde(default)]`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of the token generation response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The issued token.
    pub token: String,
}

/// One item of the disclosure list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Disclosure {
    #[serde(deserialize_with = "null_as_default")]
    pub disclosure_index: String,
    #[serde(deserialize_with = "null_as_default")]
    pub disclosure_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub disclosure_class: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sub_report_ids: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub company_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fund_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fund_code: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub accepted_data_file_types: Vec<String>,
}

/// Optional filters for [`Client::disclosures`](crate::Client::disclosures).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisclosureListParams {
    /// Disclosure class, e.g. `FR` or `ODA`.
    pub disclosure_class: Option<String>,
    /// Disclosure type, sent as `disclosureTypes`.
    pub disclosure_type: Option<String>,
    /// Restrict to one company.
    pub company_id: Option<String>,
}

/// Representation requested from the disclosure detail endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// Base64-encoded HTML messages.
    Html,
    /// Structured data.
    Data,
}

impl FileType {
    /// The value sent as the `fileType` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Html => "html",
            FileType::Data => "data",
        }
    }
}

/// Text in Turkish and English; either side may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalizedText {
    pub tr: Option<String>,
    pub en: Option<String>,
}

/// A link to a disclosure attachment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AttachmentUrl {
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub file_name: String,
}

/// A structured content block of a disclosure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentItem {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    pub content: Value,
}

/// Base64-encoded HTML message in Turkish and English.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HtmlMessage {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    pub tr: Option<String>,
    pub en: Option<String>,
}

/// A company or fund a disclosure relates to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelatedStock {
    #[serde(deserialize_with = "null_as_default")]
    pub code: String,
}

/// Full details of one disclosure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DisclosureDetail {
    #[serde(deserialize_with = "null_as_default")]
    pub disclosure_index: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sender_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sender_title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sender_exch_codes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub behalf_sender_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub behalf_sender_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub behalf_sender_exch_codes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub behalf_fund_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub behalf_fund_title: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub disclosure_reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disclosure_delay_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_disclosure_index: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub disclosure_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub disclosure_class: String,
    #[serde(deserialize_with = "null_as_default")]
    pub subject: LocalizedText,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consolidation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<LocalizedText>,
    #[serde(deserialize_with = "null_as_default")]
    pub related_stocks: Vec<RelatedStock>,
    #[serde(deserialize_with = "null_as_default")]
    pub summary: LocalizedText,
    #[serde(deserialize_with = "null_as_default")]
    pub time: String,
    #[serde(deserialize_with = "null_as_default")]
    pub link: String,
    #[serde(deserialize_with = "null_as_default")]
    pub attachment_urls: Vec<AttachmentUrl>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<i64>,
    #[serde(deserialize_with = "null_as_default")]
    pub presentation: Vec<ContentItem>,
    #[serde(deserialize_with = "null_as_default")]
    pub flat_data: Vec<ContentItem>,
    #[serde(deserialize_with = "null_as_default")]
    pub html_messages: Vec<HtmlMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LastDisclosureIndexResponse {
    pub last_disclosure_index: String,
}

/// Status of a corporate action event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CaEventStatus {
    #[serde(deserialize_with = "null_as_default")]
    pub ref_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complete_date: Option<String>,
}

/// A platform member company.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Member {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub stock_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub member_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kfif_url: Option<String>,
}

/// A listed security of a member company.
///
/// Several field names are Turkish on the wire and kept as such.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Security {
    #[serde(deserialize_with = "null_as_default")]
    pub isin: String,
    #[serde(deserialize_with = "null_as_default")]
    pub isin_desc: String,
    #[serde(deserialize_with = "null_as_default")]
    pub borsa_kodu: String,
    #[serde(deserialize_with = "null_as_default")]
    pub takas_kodu: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tertip_group: String,
    #[serde(deserialize_with = "null_as_default")]
    pub capital: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub current_capital: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub group_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub group_code_desc: String,
    #[serde(deserialize_with = "null_as_default")]
    pub borsada_isleme_acik: bool,
}

/// Company summary in the member securities listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompanyInfo {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub member_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sermaye_sistemi: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kayitli_sermaye_tavani: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kst_son_gecerlilik_tarihi: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sirket_unvan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mks_mbr_id: Option<String>,
}

/// A company with its listed securities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberSecurities {
    #[serde(deserialize_with = "null_as_default")]
    pub member: CompanyInfo,
    #[serde(deserialize_with = "null_as_default")]
    pub securities: Vec<Security>,
}

/// One field of a company or fund detail response.
///
/// `value` varies with `key`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DetailField {
    #[serde(deserialize_with = "null_as_default")]
    pub name_tr: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name_en: String,
    #[serde(deserialize_with = "null_as_default")]
    pub key: String,
    pub publish_date_time: Option<String>,
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_key: Option<String>,
}

/// A fund in the fund listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Fund {
    #[serde(deserialize_with = "null_as_default")]
    pub fund_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub fund_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub fund_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub fund_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub fund_class: String,
    #[serde(deserialize_with = "null_as_default")]
    pub fund_expiry: String,
    #[serde(deserialize_with = "null_as_default")]
    pub fund_state: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub umb_member_types: String,
    #[serde(deserialize_with = "null_as_default")]
    pub fund_member_types: String,
    #[serde(deserialize_with = "null_as_default")]
    pub kap_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub non_inactive_count: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub fund_company_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub fund_company_title: String,
}

/// Optional filters for [`Client::funds`](crate::Client::funds).
///
/// Each list is sent as a repeated query parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FundListParams {
    pub fund_state: Vec<String>,
    pub fund_class: Vec<String>,
    pub fund_type: Vec<String>,
}
