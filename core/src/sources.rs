//! The two fetch strategies behind one contract.
//!
//! The anonymous path queries GraphQL, the authenticated path queries the
//! paginated REST endpoint; both must converge to the same nested
//! [`RawUser`] shape before [`normalize`](crate::normalize::normalize) runs.
//! All GraphQL-specific reshaping lives behind `GraphqlSource`, so the REST
//! variant is a plain fetch.

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::RawUser;

/// One shared fetch-all contract over the two query paths.
pub trait DataSource {
    fn fetch_all(
        &self,
        client: &ApiClient,
        transport: &dyn Transport,
    ) -> Result<Vec<RawUser>, ApiError>;
}

/// Authenticated strategy: one paginated request to the users endpoint,
/// which already returns flat identifier fields.
pub struct RestSource<'a> {
    pub token: &'a str,
}

impl DataSource for RestSource<'_> {
    fn fetch_all(
        &self,
        client: &ApiClient,
        transport: &dyn Transport,
    ) -> Result<Vec<RawUser>, ApiError> {
        let request = client.build_fetch_users(self.token)?;
        let response = transport.execute(request)?;
        client.parse_fetch_users(response)
    }
}

/// Anonymous strategy: a single nested GraphQL query, reshaped client-side
/// into the REST-equivalent form.
pub struct GraphqlSource;

impl DataSource for GraphqlSource {
    fn fetch_all(
        &self,
        client: &ApiClient,
        transport: &dyn Transport,
    ) -> Result<Vec<RawUser>, ApiError> {
        let request = client.build_fetch_graphql()?;
        let response = transport.execute(request)?;
        client.parse_fetch_graphql(response)
    }
}
