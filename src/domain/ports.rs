use crate::domain::model::{EntityStandings, LeaderboardRow};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Write-only blob store behind the CSV sink; a snapshot is never read back.
pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Where a run gets its medal counts from.
#[async_trait]
pub trait StandingsSource: Send + Sync {
    async fn fetch(&self) -> Result<EntityStandings>;

    /// Short description for logs.
    fn describe(&self) -> String;
}

/// Sink for a finished leaderboard. Implementations replace whatever the
/// previous run left behind.
#[async_trait]
pub trait SnapshotPublisher: Send + Sync {
    async fn publish(&self, header: &str, rows: &[LeaderboardRow]) -> Result<()>;

    /// Where the snapshot ends up, for the success log line.
    fn destination(&self) -> String;
}

#[async_trait]
impl<T: StandingsSource + ?Sized> StandingsSource for Box<T> {
    async fn fetch(&self) -> Result<EntityStandings> {
        (**self).fetch().await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

#[async_trait]
impl<T: SnapshotPublisher + ?Sized> SnapshotPublisher for Box<T> {
    async fn publish(&self, header: &str, rows: &[LeaderboardRow]) -> Result<()> {
        (**self).publish(header, rows).await
    }

    fn destination(&self) -> String {
        (**self).destination()
    }
}
