use std::convert::Infallible;

use warp::{Filter, Rejection, Reply};

use crate::app::AppState;
use crate::auth::admin_auth;
use crate::error::handle_rejection;
use crate::handlers;

const JSON_BODY_LIMIT: u64 = 64 * 1024;
const CSV_UPLOAD_LIMIT: u64 = 10 * 1024 * 1024;

fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

fn json_body<T>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone
where
    T: serde::de::DeserializeOwned + Send,
{
    warp::body::content_length_limit(JSON_BODY_LIMIT).and(warp::body::json())
}

/// GET /
pub fn hello() -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path::end()
        .and(warp::get())
        .and_then(handlers::hello)
}

/// POST /tax/calculations and POST /tax/calculations/upload-csv
pub fn tax_routes(
    state: AppState
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let calculate = warp::path!("tax" / "calculations")
        .and(warp::post())
        .and(json_body())
        .and(with_state(state.clone()))
        .and_then(handlers::calculate_tax);

    let upload = warp::path!("tax" / "calculations" / "upload-csv")
        .and(warp::post())
        .and(warp::multipart::form().max_length(CSV_UPLOAD_LIMIT))
        .and(with_state(state))
        .and_then(handlers::upload_csv);

    calculate.or(upload)
}

/// POST /admin/deductions/{personal,k-receipt}, behind Basic auth.
pub fn admin_routes(
    state: AppState
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let personal = warp::path!("admin" / "deductions" / "personal")
        .and(warp::post())
        .and(admin_auth(state.credentials.clone()))
        .and(json_body())
        .and(with_state(state.clone()))
        .and_then(handlers::update_personal_deduction);

    let k_receipt = warp::path!("admin" / "deductions" / "k-receipt")
        .and(warp::post())
        .and(admin_auth(state.credentials.clone()))
        .and(json_body())
        .and(with_state(state))
        .and_then(handlers::update_k_receipt);

    personal.or(k_receipt)
}

/// Every route, with rejections rendered as JSON and each request traced.
pub fn routes(state: AppState) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    hello()
        .or(tax_routes(state.clone()))
        .or(admin_routes(state))
        .recover(handle_rejection)
        .with(warp::trace::request())
}
