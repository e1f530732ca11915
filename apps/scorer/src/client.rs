use anyhow::{anyhow, bail, Context, Result};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    error::ApiError,
    protocol::{
        MatchEvent, MatchSnapshot, RecordActionRequest, SetLog, TaxonomyCategory, TeamsView,
        UpdateTeamsRequest,
    },
};
use tracing::debug;
use url::Url;

/// HTTP client for a running scorebook server.
pub struct ScoreboardClient {
    http: Client,
    base_url: Url,
}

impl ScoreboardClient {
    pub fn new(server_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(server_url.trim())
            .with_context(|| format!("invalid server url '{server_url}'"))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            bail!("server_url must start with http:// or https://");
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            http: Client::new(),
            base_url,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let url = self.base_url.join(path)?;
        debug!(%url, "scorebook request");
        Ok(url)
    }

    pub async fn snapshot(&self) -> Result<MatchSnapshot> {
        let res = self.http.get(self.endpoint("match")?).send().await?;
        decode(res).await
    }

    pub async fn set_log(&self, set: Option<u32>) -> Result<SetLog> {
        let mut url = self.endpoint("match/log")?;
        if let Some(set) = set {
            url.query_pairs_mut().append_pair("set", &set.to_string());
        }
        decode(self.http.get(url).send().await?).await
    }

    pub async fn record_action(&self, request: &RecordActionRequest) -> Result<MatchEvent> {
        let res = self
            .http
            .post(self.endpoint("match/actions")?)
            .json(request)
            .send()
            .await?;
        decode(res).await
    }

    pub async fn undo_last(&self) -> Result<MatchEvent> {
        let res = self.http.post(self.endpoint("match/undo")?).send().await?;
        decode(res).await
    }

    pub async fn end_set(&self) -> Result<MatchEvent> {
        let res = self
            .http
            .post(self.endpoint("match/sets/end")?)
            .send()
            .await?;
        decode(res).await
    }

    pub async fn taxonomy(&self) -> Result<Vec<TaxonomyCategory>> {
        let res = self.http.get(self.endpoint("taxonomy")?).send().await?;
        decode(res).await
    }

    pub async fn teams(&self) -> Result<TeamsView> {
        let res = self.http.get(self.endpoint("match/teams")?).send().await?;
        decode(res).await
    }

    pub async fn update_teams(&self, request: &UpdateTeamsRequest) -> Result<MatchEvent> {
        let res = self
            .http
            .put(self.endpoint("match/teams")?)
            .json(request)
            .send()
            .await?;
        decode(res).await
    }

    pub async fn export_csv(&self) -> Result<Vec<u8>> {
        let res = self
            .http
            .get(self.endpoint("match/export.csv")?)
            .send()
            .await?;
        let res = ensure_success(res).await?;
        Ok(res.bytes().await?.to_vec())
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ApiError>(&body) {
        Ok(api_error) => Err(api_error.into()),
        Err(_) => Err(anyhow!("server returned {status}: {body}")),
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let response = ensure_success(response).await?;
    Ok(response.json().await?)
}

#[cfg(test)]
#[path = "tests/client_tests.rs"]
mod tests;
