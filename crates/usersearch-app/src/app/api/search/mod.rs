//! `/search` endpoints: filtered search, single submit, sample load and
//! lookup by id.

mod put_sample;
mod query;
mod record;
mod response;
mod submit;

use salvo::Router;

use super::{PUT_SAMPLE_ROUTE_COMPONENT, SEARCH_ROUTE_COMPONENT};

#[must_use]
pub fn routes() -> Router {
    Router::with_path(SEARCH_ROUTE_COMPONENT)
        .get(query::search_users)
        .post(submit::submit_user)
        .push(Router::with_path(PUT_SAMPLE_ROUTE_COMPONENT).get(put_sample::put_sample))
        .push(Router::with_path("{id}").get(record::get_user))
}
