// Location endpoint: paginated, server-side filtered GPS fixes.

use chrono::NaiveDate;
use serde::Serialize;

use crate::client::TrackingClient;
use crate::error::Error;
use crate::models::LocationPageResponse;

/// Query parameters for `GET /location`.
///
/// Absent filters are omitted from the query string entirely. Dates
/// serialize as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationQuery {
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imei: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl Default for LocationQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            imei: None,
            start_date: None,
            end_date: None,
        }
    }
}

impl TrackingClient {
    /// Fetch one page of location records plus the device list.
    ///
    /// `GET /location?page=&limit=&imei=&startDate=&endDate=`
    pub async fn fetch_locations(
        &self,
        query: &LocationQuery,
    ) -> Result<LocationPageResponse, Error> {
        let url = self.endpoint(&["location"])?;
        self.get_with_query(url, query).await
    }
}
