//! Session negotiation: token acquisition and site selection.
//!
//! Interactive input is kept behind the [`CredentialSource`] and
//! [`SiteSelector`] capabilities so the pipeline can be driven by
//! deterministic implementations in tests and by `--token`/`--site` in
//! non-interactive runs.

use crate::api_client::ApiClient;
use crate::progress::Reporter;
use atelier_core::{Envelope, Error, RemoteSite, Result, Session, Site};
use dialoguer::{Input, Select};

pub trait CredentialSource {
    /// Produce a token for `host`, already trimmed and non-empty.
    fn token(&self, host: &str) -> Result<String>;
}

pub trait SiteSelector {
    /// Pick one site from a non-empty list.
    fn select(&self, sites: &[RemoteSite]) -> Result<RemoteSite>;
}

/// Build the session for this invocation: a supplied token wins, otherwise
/// the credential source is consulted. Both paths go through the validating
/// [`Session`] constructor.
pub fn negotiate_session(
    host: impl Into<String>,
    supplied: Option<&str>,
    source: &dyn CredentialSource,
) -> Result<Session> {
    let host = host.into();
    let token = match supplied {
        Some(token) => token.to_string(),
        None => source.token(&host)?,
    };
    Session::new(host, &token)
}

/// Resolve the target site for an upload.
///
/// The selector is only consulted once the registry has answered with a
/// non-empty site list; an empty list emits the no-sites advisory and fails.
pub async fn acquire_site(
    client: &ApiClient,
    selector: &dyn SiteSelector,
    reporter: &dyn Reporter,
) -> Result<Site> {
    match client.my_sites().await? {
        Envelope::Failure { message, .. } => Err(Error::RemoteRejected(
            message.unwrap_or_else(|| "site list request failed".to_string()),
        )),
        Envelope::Success { data } => {
            let sites = data.unwrap_or_default();
            if sites.is_empty() {
                reporter.no_sites_advisory(client.host());
                return Err(Error::NoSitesAvailable);
            }
            let chosen = selector.select(&sites)?;
            Ok(Site::bind(client.host(), chosen))
        }
    }
}

/// Interactive token prompt. Re-prompts on empty input, trims the accepted
/// value, and maps an aborted prompt to [`Error::InputCancelled`].
pub struct TokenPrompt;

impl CredentialSource for TokenPrompt {
    fn token(&self, host: &str) -> Result<String> {
        println!();
        println!("If this is your first sync or you do not have a token yet, see:");
        println!("  {host}/help.html#/dev-create-site");
        println!();
        let value: String = Input::new()
            .with_prompt(format!("Please input your {host} token"))
            .validate_with(|input: &String| {
                if input.trim().is_empty() {
                    Err("token cannot be empty")
                } else {
                    Ok(())
                }
            })
            .interact_text()
            .map_err(|_| Error::InputCancelled)?;
        Ok(value.trim().to_string())
    }
}

/// Interactive single-choice site selection, keyed by site name.
pub struct SitePrompt;

impl SiteSelector for SitePrompt {
    fn select(&self, sites: &[RemoteSite]) -> Result<RemoteSite> {
        let names: Vec<&str> = sites.iter().map(|site| site.name.as_str()).collect();
        let index = Select::new()
            .with_prompt("Please select your site")
            .items(&names)
            .default(0)
            .interact()
            .map_err(|_| Error::InputCancelled)?;
        Ok(sites[index].clone())
    }
}

/// Non-interactive selection from a `--site` argument, matched against the
/// listing by id or name.
pub struct PreselectedSite {
    key: String,
}

impl PreselectedSite {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl SiteSelector for PreselectedSite {
    fn select(&self, sites: &[RemoteSite]) -> Result<RemoteSite> {
        sites
            .iter()
            .find(|site| site.name == self.key || site.id.to_string() == self.key)
            .cloned()
            .ok_or_else(|| Error::UnknownSite(self.key.clone()))
    }
}
