//! Backend endpoint paths, relative to `api.base_url`.

use orgsync_core::Id;

pub const ORGANIZATIONS: &str = "/api/organizations";
pub const ADDRESSES: &str = "/api/organizations/addresses";
pub const COORDINATES: &str = "/api/organizations/coordinates";

pub const CREATE_ORGANIZATION: &str = "/api/organizations/create";
pub const CREATE_ADDRESS: &str = "/api/organizations/addresses/create";
pub const CREATE_COORDINATES: &str = "/api/organizations/coordinates/create";

pub const DELETE_BY_TYPE: &str = "/api/organizations/delete/type";

pub const TOTAL_RATING: &str = "/api/organizations/total-rating";
pub const EMPLOYEE_COUNT: &str = "/api/organizations/employee-count";
pub const TOP_TURNOVER: &str = "/api/organizations/top-turnover";
pub const GROUP_BY_ADDRESS: &str = "/api/organizations/group-by-address";

#[must_use]
pub fn update_organization(id: Id) -> String {
    format!("/api/organizations/update/{id}")
}

#[must_use]
pub fn delete_organization(id: Id) -> String {
    format!("/api/organizations/delete/{id}")
}
