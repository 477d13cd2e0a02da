use axum::{
    async_trait,
    extract::{Form, FromRequest, Multipart, Query, Request},
    http::header,
};
use serde::Deserialize;

use crate::errors::WikiError;

/// Name of the form field holding page text
pub const BODY_FIELD: &str = "body";

#[derive(Debug, Default, Deserialize)]
struct BodyField {
    body: Option<String>,
}

/// Page text submitted to `/save/<title>`.
///
/// Read from a urlencoded or multipart payload first, then from the query
/// string. Empty only when neither carries a `body` field. A payload that
/// fails to parse is rejected so nothing gets overwritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveBody(pub String);

enum Payload {
    UrlEncoded,
    Multipart,
    None,
}

fn payload_kind(req: &Request) -> Payload {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();
    if content_type.starts_with("application/x-www-form-urlencoded") {
        Payload::UrlEncoded
    } else if content_type.starts_with("multipart/form-data") {
        Payload::Multipart
    } else {
        Payload::None
    }
}

async fn multipart_body(mut multipart: Multipart) -> Result<Option<String>, WikiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| WikiError::BadForm(e.to_string()))?
    {
        if field.name() == Some(BODY_FIELD) {
            let text = field.text().await.map_err(|e| WikiError::BadForm(e.to_string()))?;
            return Ok(Some(text));
        }
    }
    Ok(None)
}

#[async_trait]
impl<S> FromRequest<S> for SaveBody
where
    S: Send + Sync,
{
    type Rejection = WikiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let from_query = match Query::<BodyField>::try_from_uri(req.uri()) {
            Ok(Query(field)) => field.body,
            Err(e) => {
                log::debug!("Ignoring unparseable query string: {}", e);
                None
            }
        };

        let from_payload = match payload_kind(&req) {
            Payload::UrlEncoded => {
                let Form(field) = Form::<BodyField>::from_request(req, state)
                    .await
                    .map_err(|e| WikiError::BadForm(e.to_string()))?;
                field.body
            }
            Payload::Multipart => {
                let multipart = Multipart::from_request(req, state)
                    .await
                    .map_err(|e| WikiError::BadForm(e.to_string()))?;
                multipart_body(multipart).await?
            }
            Payload::None => None,
        };

        Ok(SaveBody(from_payload.or(from_query).unwrap_or_default()))
    }
}
