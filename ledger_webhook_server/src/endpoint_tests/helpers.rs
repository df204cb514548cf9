use actix_web::{body::MessageBody, dev::ServiceResponse, http::StatusCode, web::Bytes, Error};

/// Flatten a service call result into a status code and body string.
///
/// Handler errors are converted to responses by the `Responder` impl before they get here, but middleware errors
/// (e.g. an HMAC rejection) surface as `Err` and must be rendered through their `ResponseError` impl.
pub async fn unpack<B: MessageBody>(result: Result<ServiceResponse<B>, Error>) -> (StatusCode, String) {
    match result {
        Ok(res) => {
            let (_, res) = res.into_parts();
            let status = res.status();
            let bytes = res.into_body().try_into_bytes().unwrap_or_else(|_| Bytes::new());
            (status, String::from_utf8_lossy(&bytes).into_owned())
        },
        Err(e) => {
            let res = e.error_response();
            let status = res.status();
            let bytes = res.into_body().try_into_bytes().unwrap_or_else(|_| Bytes::new());
            (status, String::from_utf8_lossy(&bytes).into_owned())
        },
    }
}
