//! Dashboard snapshot loading.
//!
//! Keywords and rankings are independent reads. Both are issued together and
//! both must finish before the dashboard is aggregated.

use rankdash_core::{Dashboard, Keyword, RankingObservation};

use crate::client::RankApiClient;
use crate::error::ClientError;

/// Keywords and rankings fetched for one dashboard render.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub keywords: Vec<Keyword>,
    pub rankings: Vec<RankingObservation>,
}

impl Snapshot {
    #[must_use]
    pub fn dashboard(&self) -> Dashboard {
        Dashboard::build(&self.keywords, &self.rankings)
    }
}

/// Fetch keywords and rankings concurrently.
///
/// # Errors
///
/// Returns the first error of the two requests; both requests still run to
/// completion before this returns.
pub async fn try_load_snapshot(client: &RankApiClient) -> Result<Snapshot, ClientError> {
    let (keywords, rankings) = tokio::join!(client.list_keywords(), client.list_rankings());
    Ok(Snapshot {
        keywords: keywords?,
        rankings: rankings?,
    })
}

/// Fetch keywords and rankings, falling back to an empty snapshot.
///
/// Any failure is logged and yields empty lists for both, so the dashboard
/// renders zero-valued aggregates instead of an error.
pub async fn load_snapshot(client: &RankApiClient) -> Snapshot {
    match try_load_snapshot(client).await {
        Ok(snapshot) => {
            tracing::debug!(
                keywords = snapshot.keywords.len(),
                rankings = snapshot.rankings.len(),
                "dashboard snapshot loaded"
            );
            snapshot
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to load dashboard data; rendering empty dashboard");
            Snapshot::default()
        }
    }
}
