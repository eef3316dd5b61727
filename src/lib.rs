pub mod api;
pub mod builder;
pub mod dispatch;
mod error;
pub mod gcs;
pub mod globals;
pub mod logging;
pub mod model;
pub mod output;
pub mod registry;
pub mod transfer;

pub use error::{Error, Result};

/// Acquires a bearer token for the default credentials on the system
pub fn get_bearer_token(scopes: &[&str]) -> anyhow::Result<http::header::HeaderValue> {
    use anyhow::Context as _;
    use gcp::TokenProvider;
    use tame_oauth::gcp;

    let tp = gcp::TokenProviderWrapper::get_default_provider()
        .context("unable to read default credentials")?
        .context("unable to determine default credentials")?;

    match tp
        .get_token(scopes)
        .context("failed to make token request")?
    {
        gcp::TokenOrRequest::Token(tok) => Ok(tok
            .try_into()
            .context("failed to convert token to header value")?),
        gcp::TokenOrRequest::Request {
            request,
            scope_hash,
            ..
        } => {
            let client = reqwest::blocking::Client::new();
            let (parts, body) = request.into_parts();
            let uri = parts.uri.to_string();

            tracing::debug!(%uri, "requesting token");

            // Token requests are always POST
            let res = client
                .post(&uri)
                .headers(parts.headers)
                .body(body)
                .send()
                .context("failed to send token request")?;

            let code = res.status();

            let mut builder = http::Response::builder()
                .status(code)
                .version(res.version());

            let headers = builder
                .headers_mut()
                .context("failed to convert response headers")?;

            headers.extend(
                res.headers()
                    .into_iter()
                    .map(|(k, v)| (k.clone(), v.clone())),
            );

            let buffer = res.bytes().context("failed to read token response")?;

            if !code.is_success() {
                if let Ok(err_str) = String::from_utf8(buffer.into()) {
                    anyhow::bail!(err_str);
                } else {
                    anyhow::bail!("failed to retrieve error for {code}");
                }
            }

            let response = builder
                .body(buffer)
                .context("failed to build token response")?;

            Ok(tp
                .parse_token_response(scope_hash, response)
                .and_then(std::convert::TryInto::try_into)
                .context("failed to convert token to header value")?)
        }
    }
}
