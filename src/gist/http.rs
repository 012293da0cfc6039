//! GitHub REST implementation of [`GistApi`].

use super::TransportError;
use super::api::{GIST_PAGE_SIZE, Gist, GistApi, GistRequest};
use serde::de::DeserializeOwned;

/// User-Agent header required by GitHub API
const USER_AGENT: &str = "cursor-sync-cli";

/// Blocking client for the gist endpoints.
pub struct HttpGists {
    agent: ureq::Agent,
    base_url: String,
    token: String,
}

impl HttpGists {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new().user_agent(USER_AGENT).build();
        Self {
            agent,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn request(&self, method: &str, url: &str) -> ureq::Request {
        self.agent
            .request(method, url)
            .set("Authorization", &format!("Bearer {}", self.token))
            .set("Accept", "application/vnd.github+json")
            .set("X-GitHub-Api-Version", "2022-11-28")
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl GistApi for HttpGists {
    fn list(&self, page: u32) -> Result<Vec<Gist>, TransportError> {
        let url = self.endpoint(&format!("/gists?per_page={}&page={}", GIST_PAGE_SIZE, page));
        decode(self.request("GET", &url).call())
    }

    fn get(&self, id: &str) -> Result<Gist, TransportError> {
        let url = self.endpoint(&format!("/gists/{}", id));
        decode(self.request("GET", &url).call())
    }

    fn create(&self, request: &GistRequest) -> Result<Gist, TransportError> {
        let url = self.endpoint("/gists");
        decode(self.request("POST", &url).send_json(request))
    }

    fn update(&self, id: &str, request: &GistRequest) -> Result<Gist, TransportError> {
        let url = self.endpoint(&format!("/gists/{}", id));
        decode(self.request("PATCH", &url).send_json(request))
    }

    fn get_raw(&self, url: &str) -> Result<String, TransportError> {
        let response = check(self.request("GET", url).call())?;
        response
            .into_string()
            .map_err(|e| TransportError::Parse(e.to_string()))
    }
}

fn decode<T: DeserializeOwned>(
    response: Result<ureq::Response, ureq::Error>,
) -> Result<T, TransportError> {
    check(response)?
        .into_json()
        .map_err(|e| TransportError::Parse(e.to_string()))
}

fn check(response: Result<ureq::Response, ureq::Error>) -> Result<ureq::Response, TransportError> {
    match response {
        Ok(resp) => Ok(resp),
        Err(ureq::Error::Status(401, _)) => Err(TransportError::Unauthorized),
        Err(ureq::Error::Status(403, _)) => Err(TransportError::Forbidden),
        Err(ureq::Error::Status(code, resp)) => {
            let body = resp.into_string().unwrap_or_default();
            Err(TransportError::Http(format!("HTTP {}: {}", code, body)))
        }
        Err(e) => Err(TransportError::Http(e.to_string())),
    }
}
