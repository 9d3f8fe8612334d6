use bytes::BufMut;
use futures_util::TryStreamExt;
use tax_data::BatchCsvLoader;
use tracing::{debug, info};
use warp::http::StatusCode;
use warp::multipart::FormData;
use warp::{Rejection, Reply};

use crate::app::AppState;
use crate::error::ApiError;
use crate::schemas::{
    AmountRequest, CsvResponse, CsvTaxResponse, KReceiptResponse, PersonalDeductionResponse,
    TaxCalculationRequest, TaxCalculationResponse,
};

/// Multipart field that carries the CSV upload.
pub const TAX_FILE_FIELD: &str = "taxFile";

pub const LIVENESS_MESSAGE: &str = "Tax service is running";

pub async fn hello() -> Result<impl Reply, Rejection> {
    Ok(warp::reply::with_status(LIVENESS_MESSAGE, StatusCode::OK))
}

pub async fn calculate_tax(
    request: TaxCalculationRequest,
    state: AppState,
) -> Result<impl Reply, Rejection> {
    let valid = request
        .validate()
        .map_err(|errors| ApiError::validation(&errors))?;

    let computation = state
        .tax_service
        .calculate_detailed_tax(valid.total_income, valid.wht, &valid.allowances)
        .await
        .map_err(ApiError::from)?;

    Ok(warp::reply::json(&TaxCalculationResponse::from(computation)))
}

/// Returns the bytes of the named part, or `None` if the form lacks it.
async fn read_part(
    form: FormData,
    name: &str,
) -> Result<Option<Vec<u8>>, warp::Error> {
    let mut form = std::pin::pin!(form);
    while let Some(part) = form.try_next().await? {
        if part.name() != name {
            continue;
        }
        let data = part
            .stream()
            .try_fold(Vec::new(), |mut acc, buf| async move {
                acc.put(buf);
                Ok(acc)
            })
            .await?;
        return Ok(Some(data));
    }
    Ok(None)
}

pub async fn upload_csv(
    form: FormData,
    state: AppState,
) -> Result<impl Reply, Rejection> {
    let data = read_part(form, TAX_FILE_FIELD)
        .await
        .map_err(|e| {
            debug!(error = %e, "multipart read failed");
            ApiError::BadRequest("Failed to get the file".to_string())
        })?
        .ok_or_else(|| ApiError::BadRequest("Failed to get the file".to_string()))?;

    let records = BatchCsvLoader::load(data.as_slice()).map_err(ApiError::from)?;
    let results = state
        .tax_service
        .calculate_tax_batch(&records)
        .await
        .map_err(ApiError::from)?;

    Ok(warp::reply::json(&CsvResponse {
        taxes: results.into_iter().map(CsvTaxResponse::from).collect(),
    }))
}

pub async fn update_personal_deduction(
    request: AmountRequest,
    state: AppState,
) -> Result<impl Reply, Rejection> {
    let amount = request
        .amount
        .ok_or_else(|| ApiError::BadRequest("amount is required".to_string()))?;

    let personal_deduction = state
        .admin_service
        .update_personal_deduction(amount)
        .await
        .map_err(ApiError::from)?;

    info!(%personal_deduction, "admin updated personal deduction");
    Ok(warp::reply::json(&PersonalDeductionResponse {
        personal_deduction,
    }))
}

pub async fn update_k_receipt(
    request: AmountRequest,
    state: AppState,
) -> Result<impl Reply, Rejection> {
    let amount = request
        .amount
        .ok_or_else(|| ApiError::BadRequest("amount is required".to_string()))?;

    let k_receipt = state
        .admin_service
        .update_k_receipt_deduction_max(amount)
        .await
        .map_err(ApiError::from)?;

    info!(%k_receipt, "admin updated k-receipt cap");
    Ok(warp::reply::json(&KReceiptResponse { k_receipt }))
}
