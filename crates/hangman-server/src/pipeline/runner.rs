//! Fetch → export → chart, end to end.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::json;

use hangman::{
    count_by_field, statistics, ChartRenderer, CsvExporter, PipelineError, PipelineResult, Record,
};

use super::ApiClient;

/// Posts fetched per run.
pub const POSTS_LIMIT: usize = 10;

/// Users fetched per run.
pub const USERS_LIMIT: usize = 5;

/// Files produced by a pipeline run. A step that failed leaves its entries `None`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineReport {
    pub posts_csv: Option<PathBuf>,
    pub posts_chart: Option<PathBuf>,
    pub users_csv: Option<PathBuf>,
    pub users_chart: Option<PathBuf>,
    pub summary_csv: Option<PathBuf>,
}

/// The sample-data pipeline over one output directory.
pub struct DataPipeline {
    client: ApiClient,
    exporter: CsvExporter,
    charts: ChartRenderer,
}

impl DataPipeline {
    pub fn new(client: ApiClient, output_dir: &Path) -> PipelineResult<Self> {
        Ok(Self {
            client,
            exporter: CsvExporter::new(output_dir)?,
            charts: ChartRenderer::new(output_dir)?,
        })
    }

    /// Run every step. Step failures are logged and do not stop later steps.
    pub async fn run(&self) -> PipelineReport {
        tracing::info!("Starting full data pipeline");
        let mut report = PipelineReport::default();
        let mut summary = Record::new();

        tracing::info!("Step 1: Collecting posts from API");
        if let Err(e) = self.posts_step(&mut report, &mut summary).await {
            tracing::error!("Posts step failed: {e}");
        }

        tracing::info!("Step 2: Collecting users from API");
        if let Err(e) = self.users_step(&mut report, &mut summary).await {
            tracing::error!("Users step failed: {e}");
        }

        let exporter = self.exporter.clone();
        match blocking(move || exporter.export_aggregated(&summary, "pipeline_summary")).await {
            Ok(path) => report.summary_csv = path,
            Err(e) => tracing::error!("Summary export failed: {e}"),
        }

        tracing::info!("Pipeline completed");
        report
    }

    async fn posts_step(
        &self,
        report: &mut PipelineReport,
        summary: &mut Record,
    ) -> PipelineResult<()> {
        let posts = self.client.fetch_posts(POSTS_LIMIT).await?;
        let stats = statistics(&posts);
        summary.insert("posts_total".into(), json!(stats.total_items));
        summary.insert("posts_fields".into(), json!(stats.fields));
        summary.insert("posts_fetched_at".into(), json!(stats.timestamp));

        let per_user = count_by_field(&posts, "userId");
        summary.insert("posts_authors".into(), json!(per_user.len()));

        let exporter = self.exporter.clone();
        report.posts_csv = blocking(move || exporter.export_records(&posts, "posts_data")).await?;

        let charts = self.charts.clone();
        report.posts_chart = blocking(move || charts.bar_chart(&per_user, "posts_by_user")).await?;
        Ok(())
    }

    async fn users_step(
        &self,
        report: &mut PipelineReport,
        summary: &mut Record,
    ) -> PipelineResult<()> {
        let users = self.client.fetch_users(USERS_LIMIT).await?;
        summary.insert("users_total".into(), json!(users.len()));

        let per_city = count_by_field(&users, "address.city");
        summary.insert("users_cities".into(), json!(per_city.len()));

        let exporter = self.exporter.clone();
        report.users_csv = blocking(move || exporter.export_records(&users, "users_data")).await?;

        let charts = self.charts.clone();
        report.users_chart =
            blocking(move || charts.pie_chart(&per_city, "users_distribution")).await?;
        Ok(())
    }
}

/// Run file writes and image encoding on the blocking pool.
async fn blocking<T, F>(work: F) -> PipelineResult<T>
where
    F: FnOnce() -> PipelineResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| PipelineError::Io(std::io::Error::other(e)))?
}
