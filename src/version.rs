use std::borrow::Cow;

use crate::error::{InstallError, Result};
use crate::fetch::{Endpoints, Fetch};

/// Version token that asks for the newest published release.
pub const LATEST: &str = "LATEST";

/// Turn the requested version into a concrete one.
///
/// Only the sentinel touches the network; anything else is returned as given
/// and left for the download to reject.
pub fn resolve_version<'a>(
    requested: &'a str,
    fetcher: &dyn Fetch,
    endpoints: &Endpoints,
) -> Result<Cow<'a, str>> {
    if !requested.eq_ignore_ascii_case(LATEST) {
        return Ok(Cow::Borrowed(requested));
    }
    print_info!("Fetching latest version...");
    let url = &endpoints.latest_url;
    let body = fetcher.get(url)?;
    let body = String::from_utf8_lossy(body.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(&body));
    let version = body.trim();
    if version.is_empty() {
        return Err(InstallError::NetworkFailure {
            url: url.clone(),
            reason: "latest version resource is empty".to_owned(),
        });
    }
    tracing::info!(version, "resolved latest version");
    Ok(Cow::Owned(version.to_owned()))
}
