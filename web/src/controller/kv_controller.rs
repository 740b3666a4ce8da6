use crate::extractors::credential::Credential;
use crate::params::kv::KvParams;
use crate::{AppState, Error};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use backbone::KeyValue;
use bytes::Bytes;
use log::*;

/// Validate the target, clear it with the authorization gate and open the bucket.
///
/// The key, not the bucket, is what the gate sees as the subject.
async fn open_bucket(
    app_state: &AppState,
    Credential(credential): Credential,
    params: KvParams,
) -> Result<(Box<dyn KeyValue>, String), Error> {
    let (bucket, key) = params.into_target()?;

    if !app_state.authorizer.authorize(&credential, &key) {
        debug!("Denied key-value access to {bucket}/{key}");
        return Err(Error::unauthorized());
    }

    let store = app_state.backbone_ref().key_value(&bucket).await?;
    Ok((store, key))
}

/// GET the value stored under a key
#[utoipa::path(
    get,
    path = "/kv",
    params(KvParams),
    responses(
        (status = 200, description = "Raw value bytes"),
        (status = 400, description = "Bad Request"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Bucket or key does not exist"),
        (status = 500, description = "Internal Server Error")
    ),
    security(
        ("authorization" = [])
    )
)]
pub async fn read(
    State(app_state): State<AppState>,
    credential: Credential,
    Query(params): Query<KvParams>,
) -> Result<impl IntoResponse, Error> {
    let (store, key) = open_bucket(&app_state, credential, params).await?;
    let value = store.get(&key).await?;

    Ok((StatusCode::OK, value))
}

/// PUT store the request body under a key
#[utoipa::path(
    put,
    path = "/kv",
    params(KvParams),
    request_body(content = String, description = "Raw value bytes", content_type = "application/octet-stream"),
    responses(
        (status = 204, description = "Value stored"),
        (status = 400, description = "Bad Request"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Bucket does not exist"),
        (status = 500, description = "Internal Server Error")
    ),
    security(
        ("authorization" = [])
    )
)]
pub async fn update(
    State(app_state): State<AppState>,
    credential: Credential,
    Query(params): Query<KvParams>,
    body: Bytes,
) -> Result<impl IntoResponse, Error> {
    let (store, key) = open_bucket(&app_state, credential, params).await?;
    debug!("PUT {} bytes under {key}", body.len());
    store.put(&key, body).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE the value stored under a key
#[utoipa::path(
    delete,
    path = "/kv",
    params(KvParams),
    responses(
        (status = 200, description = "Value removed"),
        (status = 400, description = "Bad Request"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Bucket does not exist"),
        (status = 500, description = "Internal Server Error")
    ),
    security(
        ("authorization" = [])
    )
)]
pub async fn delete(
    State(app_state): State<AppState>,
    credential: Credential,
    Query(params): Query<KvParams>,
) -> Result<impl IntoResponse, Error> {
    let (store, key) = open_bucket(&app_state, credential, params).await?;
    debug!("DELETE {key}");
    store.delete(&key).await?;

    Ok(StatusCode::OK)
}

/// Any other method. A missing bucket or key is still reported first.
pub async fn unsupported(Query(params): Query<KvParams>) -> Result<impl IntoResponse, Error> {
    params.into_target()?;

    Ok(StatusCode::METHOD_NOT_ALLOWED)
}
