use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{HttpCatalogApi, HttpCatalogConfig, SelectionSession};
use shared::{
    domain::FilterKind,
    protocol::{CourseInstanceQuery, SortDirection},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_seed, load_settings};

#[derive(Parser, Debug)]
#[command(name = "bulk_select", about = "Browse course instances for bulk Canvas site creation")]
struct Cli {
    #[arg(long, global = true)]
    server_url: Option<String>,
    #[arg(long, global = true)]
    resource_link_id: Option<String>,
    #[arg(long, global = true)]
    csrf_token: Option<String>,
    /// JSON file with the initial filter values and option lists
    #[arg(long, global = true)]
    seed: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the options of one filter
    Options {
        kind: FilterKind,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Print course counts for the selected term and account
    Summary {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Print one page of course instances
    Courses {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 0)]
        start: u64,
        #[arg(long, default_value_t = 10)]
        length: u64,
        #[arg(long)]
        descending: bool,
        /// Add every listed course instance to the selection
        #[arg(long)]
        select_all: bool,
        /// Submit the selected course instances as a bulk site creation job
        #[arg(long, requires = "select_all")]
        create_job: bool,
        /// Canvas course whose content seeds the created sites
        #[arg(long, requires = "create_job")]
        template: Option<String>,
    },
}

#[derive(clap::Args, Debug, Default)]
struct FilterArgs {
    #[arg(long)]
    school: Option<String>,
    #[arg(long)]
    term: Option<String>,
    #[arg(long)]
    department: Option<String>,
    #[arg(long)]
    course_group: Option<String>,
}

impl FilterArgs {
    /// Requested selections in cascade order.
    fn selections(&self) -> Vec<(FilterKind, &str)> {
        [
            (FilterKind::School, &self.school),
            (FilterKind::Term, &self.term),
            (FilterKind::Department, &self.department),
            (FilterKind::CourseGroup, &self.course_group),
        ]
        .into_iter()
        .filter_map(|(kind, value)| value.as_deref().map(|id| (kind, id)))
        .collect()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(v) = cli.server_url.clone() {
        settings.base_url = v;
    }
    if cli.resource_link_id.is_some() {
        settings.resource_link_id = cli.resource_link_id.clone();
    }
    if cli.csrf_token.is_some() {
        settings.csrf_token = cli.csrf_token.clone();
    }
    if cli.seed.is_some() {
        settings.seed_path = cli.seed.clone();
    }

    let seed = load_seed(settings.seed_path.as_deref())?;
    let api = HttpCatalogApi::new(HttpCatalogConfig {
        base_url: settings.base_url.clone(),
        resource_link_id: settings.resource_link_id.clone(),
        csrf_token: settings.csrf_token.clone(),
        timeout: settings.request_timeout(),
    })
    .context("failed to configure catalog client")?;
    info!(base_url = %api.routes().base_url(), "bulk_select: starting");
    let session = SelectionSession::new(Arc::new(api), &seed);

    match cli.command {
        Command::Options { kind, filters } => {
            apply_filters(&session, &filters).await?;
            print_options(&session, kind).await;
        }
        Command::Summary { filters } => {
            apply_filters(&session, &filters).await?;
            if !session.summary_snapshot().await.data_loaded {
                session.load_course_instance_summary().await;
            }
            print_summary(&session).await;
        }
        Command::Courses {
            filters,
            search,
            start,
            length,
            descending,
            select_all,
            create_job,
            template,
        } => {
            apply_filters(&session, &filters).await?;
            let query = CourseInstanceQuery {
                start,
                length,
                search,
                order_dir: if descending {
                    SortDirection::Desc
                } else {
                    SortDirection::Asc
                },
                ..CourseInstanceQuery::default()
            };
            list_courses(&session, &query, select_all).await?;
            if create_job {
                let job_id = session
                    .create_bulk_job(template)
                    .await
                    .context("failed to create bulk job")?;
                println!("created bulk job {job_id}");
            }
        }
    }

    if session.has_error() {
        return Err(anyhow!("one or more catalog requests failed"));
    }
    Ok(())
}

/// Loads option lists the seed did not provide, then applies the requested
/// selections school first so each dependent list is scoped correctly.
async fn apply_filters(session: &SelectionSession, filters: &FilterArgs) -> Result<()> {
    load_missing_options(session).await;
    for (kind, id) in filters.selections() {
        session
            .select_filter(kind, id)
            .await
            .with_context(|| format!("cannot select {kind} '{id}'"))?;
    }
    Ok(())
}

async fn load_missing_options(session: &SelectionSession) {
    if session
        .filters_snapshot()
        .await
        .options(FilterKind::School)
        .is_empty()
    {
        session.load_filter_options(FilterKind::School).await;
    }
    let filters = session.filters_snapshot().await;
    if filters.selected_filter_id(FilterKind::School).is_empty() {
        return;
    }
    for kind in [FilterKind::Term, FilterKind::Department, FilterKind::CourseGroup] {
        if filters.options(kind).is_empty() {
            session.load_filter_options(kind).await;
        }
    }
}

async fn print_options(session: &SelectionSession, kind: FilterKind) {
    let filters = session.filters_snapshot().await;
    let selected = filters.dimension(kind).selected().to_string();
    if filters.options(kind).is_empty() {
        println!("no {kind} options available");
        return;
    }
    for option in filters.options(kind) {
        let marker = if option.id == selected { '*' } else { ' ' };
        println!("{marker} {}\t{}", option.id, option.name);
    }
    if !filters.is_filter_selectable(kind) {
        println!("({kind} has a single option and is selected automatically)");
    }
}

async fn print_summary(session: &SelectionSession) {
    let filters = session.filters_snapshot().await;
    let term_id = filters.selected_filter_id(FilterKind::Term);
    if term_id.is_empty() {
        println!("select a term to see course counts");
        return;
    }
    let summary = session.summary_snapshot().await;
    let counters = summary.counters;
    println!(
        "term: {} ({term_id})",
        filters.selected_filter_name(FilterKind::Term)
    );
    println!("account: {}", filters.account_filter_id());
    if !summary.data_loaded {
        println!("course counts unavailable");
        return;
    }
    println!("total courses: {}", counters.total_courses);
    println!(
        "  with a canvas site: {} (isite {}, external {})",
        counters.total_courses_with_canvas_site,
        counters.total_courses_with_canvas_site_with_isite,
        counters.total_courses_with_canvas_site_with_external
    );
    println!(
        "  without a canvas site: {} (isite {}, external {})",
        counters.total_courses_without_canvas_site,
        counters.total_courses_without_canvas_site_with_isite,
        counters.total_courses_without_canvas_site_with_external
    );
}

async fn list_courses(
    session: &SelectionSession,
    query: &CourseInstanceQuery,
    select_all: bool,
) -> Result<()> {
    let page = match session.list_course_instances(query).await {
        Ok(Some(page)) => page,
        Ok(None) => {
            println!("select a term to list course instances");
            return Ok(());
        }
        Err(err) if err.is_cancelled() => {
            warn!(error = %err, "bulk_select: listing request was cancelled");
            return Ok(());
        }
        Err(err) => return Err(err).context("failed to list course instances"),
    };

    println!(
        "showing {} of {} course instances",
        page.data.len(),
        page.summary.records_total
    );
    for record in &page.data {
        let canvas = if record.has_canvas_site { "canvas" } else { "-" };
        println!(
            "{}\t{}\t{}\t{canvas}\t{}",
            record.id, record.registrar_code, record.title, record.associated_sites
        );
    }

    if select_all {
        for record in page.data {
            session.add_selected_course_instance(record).await;
        }
        println!(
            "{} course instances selected",
            session.selected_course_ids_count().await
        );
    }
    Ok(())
}
