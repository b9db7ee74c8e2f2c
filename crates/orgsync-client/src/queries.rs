//! Read-only aggregate endpoints. These bypass the replica.

use orgsync_core::entities::Organization;
use orgsync_core::responses::AddressCount;

use crate::api::HttpApi;
use crate::endpoints;
use crate::error::ClientError;

impl HttpApi {
    /// Sum of all organizations' ratings.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on transport failure, a non-2xx status, or a
    /// malformed body.
    pub async fn total_rating(&self) -> Result<i64, ClientError> {
        self.get_json(endpoints::TOTAL_RATING).await
    }

    /// Average employee count of the ten organizations with the highest annual
    /// turnover.
    ///
    /// # Errors
    ///
    /// See [`HttpApi::total_rating`].
    pub async fn average_employees_top10(&self) -> Result<f64, ClientError> {
        self.get_json(endpoints::EMPLOYEE_COUNT).await
    }

    /// Organizations with the highest annual turnover. These come without an
    /// owner, so `owner_id` is zero.
    ///
    /// # Errors
    ///
    /// See [`HttpApi::total_rating`].
    pub async fn top_turnover(&self) -> Result<Vec<Organization>, ClientError> {
        self.get_json(endpoints::TOP_TURNOVER).await
    }

    /// Number of organizations per address.
    ///
    /// # Errors
    ///
    /// See [`HttpApi::total_rating`].
    pub async fn group_by_address(&self) -> Result<Vec<AddressCount>, ClientError> {
        self.get_json(endpoints::GROUP_BY_ADDRESS).await
    }
}
