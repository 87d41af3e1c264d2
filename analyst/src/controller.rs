use crate::cli::{Cmd, CsvExportArgs, ExportArgs, ListCmd};
use crate::error::{AppError, InputError};
use crate::input;
use cell_query::{CellFilters, CellService, PgCellStore, QueryError, key_by_cgi};
use kmz_export::{KmzDocument, Layout, distinct_cgis, export_kmz, read_csv_path};
use shared::ExportConfig;
use shared::geocell::{Cell, PolygonKind};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// A fully validated search.
#[derive(Debug, Clone, PartialEq)]
pub enum Search {
    Cgi(Vec<String>),
    Neighbors {
        cgi: String,
        radius_km: f64,
        same_network: bool,
    },
    Circle {
        lat: f64,
        lon: f64,
        radius_km: f64,
    },
    Rectangle {
        lat1: f64,
        lon1: f64,
        lat2: f64,
        lon2: f64,
    },
    Region {
        district: Option<String>,
        county: String,
    },
    LacTac(i64),
    EnbGnb(i64),
    Band(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportTarget {
    pub path: PathBuf,
    pub kind: PolygonKind,
}

impl ExportTarget {
    fn from_args(args: ExportArgs) -> Option<Self> {
        Some(Self {
            path: args.kmz?,
            kind: polygon_kind(args.short_polygons),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Search {
        search: Search,
        filters: CellFilters,
        export: Option<ExportTarget>,
    },
    CsvExport {
        csv: PathBuf,
        target: ExportTarget,
    },
    List(ListCmd),
}

/// Where search results were written and how many cells the archive draws.
#[derive(Debug)]
pub struct Exported {
    pub path: PathBuf,
    pub cells: usize,
}

/// What the user sees once an action finishes.
#[derive(Debug)]
pub enum Outcome {
    Cells {
        cells: Vec<Cell>,
        exported: Option<Exported>,
    },
    CsvExported {
        path: PathBuf,
        observations: usize,
        cells: usize,
    },
    Listing {
        title: &'static str,
        items: Vec<String>,
    },
    InvalidInput(InputError),
    InvalidArgument(String),
    QueryFailed(QueryError),
    ExportFailed(String),
    TaskFailed(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            Outcome::Cells { .. } | Outcome::CsvExported { .. } | Outcome::Listing { .. }
        )
    }
}

impl From<AppError> for Outcome {
    fn from(error: AppError) -> Self {
        match error {
            AppError::Input(e) => Outcome::InvalidInput(e),
            AppError::Query(QueryError::IllegalArgs(message)) => Outcome::InvalidArgument(message),
            AppError::Query(e) => Outcome::QueryFailed(e),
            AppError::Export(e) => Outcome::ExportFailed(e.to_string()),
            AppError::Initialization(e) => Outcome::TaskFailed(e.to_string()),
            AppError::Config(e) => Outcome::TaskFailed(e.to_string()),
        }
    }
}

fn polygon_kind(short: bool) -> PolygonKind {
    if short {
        PolygonKind::Short
    } else {
        PolygonKind::Full
    }
}

/// Validates a command into an [`Action`] without touching the database.
pub fn parse_command(cmd: Cmd) -> Result<Action, InputError> {
    let (search, filters, export) = match cmd {
        Cmd::Cgi(args) => {
            let cgis: Vec<String> = args
                .cgis
                .iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect();
            if cgis.is_empty() {
                return Err(InputError::Missing("CGI"));
            }
            (Search::Cgi(cgis), CellFilters::default(), args.export)
        }
        Cmd::Neighbors(args) => (
            Search::Neighbors {
                cgi: input::required("CGI", &args.cgi)?,
                radius_km: input::radius_km(&args.radius_km)?,
                same_network: args.same_network,
            },
            input::filters(&args.filters)?,
            args.export,
        ),
        Cmd::Circle(args) => (
            Search::Circle {
                lat: input::latitude("latitude", &args.lat)?,
                lon: input::longitude("longitude", &args.lon)?,
                radius_km: input::radius_km(&args.radius_km)?,
            },
            input::filters(&args.filters)?,
            args.export,
        ),
        Cmd::Rectangle(args) => (
            Search::Rectangle {
                lat1: input::latitude("first latitude", &args.lat1)?,
                lon1: input::longitude("first longitude", &args.lon1)?,
                lat2: input::latitude("second latitude", &args.lat2)?,
                lon2: input::longitude("second longitude", &args.lon2)?,
            },
            input::filters(&args.filters)?,
            args.export,
        ),
        Cmd::Region(args) => (
            Search::Region {
                district: args
                    .district
                    .as_deref()
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .map(String::from),
                county: input::required("county", &args.county)?,
            },
            input::filters(&args.filters)?,
            args.export,
        ),
        Cmd::LacTac(args) => (
            Search::LacTac(input::integer("LAC/TAC", &args.value)?),
            input::filters(&args.filters)?,
            args.export,
        ),
        Cmd::EnbGnb(args) => (
            Search::EnbGnb(input::integer("eNB/gNB", &args.value)?),
            input::filters(&args.filters)?,
            args.export,
        ),
        Cmd::Band(args) => (
            Search::Band(input::required("band", &args.value)?),
            input::filters(&args.filters)?,
            args.export,
        ),
        Cmd::CsvExport(CsvExportArgs {
            csv,
            output,
            short_polygons,
        }) => {
            return Ok(Action::CsvExport {
                csv,
                target: ExportTarget {
                    path: output,
                    kind: polygon_kind(short_polygons),
                },
            });
        }
        Cmd::List(list) => return Ok(Action::List(list)),
    };

    Ok(Action::Search {
        search,
        filters,
        export: ExportTarget::from_args(export),
    })
}

/// Runs user actions one background task at a time and turns every result into an [`Outcome`].
pub struct Controller {
    service: Arc<CellService<PgCellStore>>,
    export: Arc<ExportConfig>,
}

impl Controller {
    pub fn new(service: CellService<PgCellStore>, export: ExportConfig) -> Self {
        Self {
            service: Arc::new(service),
            export: Arc::new(export),
        }
    }

    pub async fn run(&self, cmd: Cmd) -> Outcome {
        let action = match parse_command(cmd) {
            Ok(action) => action,
            Err(e) => return Outcome::InvalidInput(e),
        };

        let service = Arc::clone(&self.service);
        let export = Arc::clone(&self.export);
        let handle = tokio::spawn(async move { execute(&service, &export, action).await });

        match handle.await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => {
                warn!(error = ?e, "action failed");
                Outcome::from(e)
            }
            Err(e) => {
                warn!(error = ?e, "background task did not complete");
                Outcome::TaskFailed(e.to_string())
            }
        }
    }
}

async fn execute(
    service: &CellService<PgCellStore>,
    export: &ExportConfig,
    action: Action,
) -> Result<Outcome, AppError> {
    match action {
        Action::Search {
            search,
            filters,
            export: target,
        } => {
            let cells = run_search(service, search, &filters).await?;
            let exported = match target {
                Some(target) => {
                    let drawn = export_cells(service, export, &cells, &target).await?;
                    Some(Exported {
                        path: target.path,
                        cells: drawn,
                    })
                }
                None => None,
            };
            Ok(Outcome::Cells { cells, exported })
        }
        Action::CsvExport { csv, target } => export_csv(service, export, &csv, &target).await,
        Action::List(list) => list_values(service.store(), list).await,
    }
}

async fn run_search(
    service: &CellService<PgCellStore>,
    search: Search,
    filters: &CellFilters,
) -> Result<Vec<Cell>, QueryError> {
    match search {
        Search::Cgi(cgis) => Ok(service.cells_by_cgi_list(&cgis).await?.into_values().collect()),
        Search::Neighbors {
            cgi,
            radius_km,
            same_network,
        } => {
            service
                .neighbor_cells(&cgi, radius_km, same_network, filters)
                .await
        }
        Search::Circle {
            lat,
            lon,
            radius_km,
        } => service.cells_in_circle(lat, lon, radius_km, filters).await,
        Search::Rectangle {
            lat1,
            lon1,
            lat2,
            lon2,
        } => {
            service
                .cells_in_rectangle(lat1, lon1, lat2, lon2, filters)
                .await
        }
        Search::Region { district, county } => {
            service
                .cells_in_administrative_region(district.as_deref(), &county, filters)
                .await
        }
        Search::LacTac(lac_tac) => service.cells_by_lac_tac(lac_tac, filters).await,
        Search::EnbGnb(enb_gnb) => service.cells_by_enb_gnb(enb_gnb, filters).await,
        Search::Band(band) => service.cells_by_band(&band, filters).await,
    }
}

async fn export_cells(
    service: &CellService<PgCellStore>,
    export: &ExportConfig,
    cells: &[Cell],
    target: &ExportTarget,
) -> Result<usize, AppError> {
    let polygons = service.polygons_for(cells, target.kind).await?;
    let by_cgi = key_by_cgi(cells.iter().cloned());
    let drawn = export_kmz(
        &target.path,
        &KmzDocument {
            cells: &by_cgi,
            polygons: &polygons,
            layout: Layout::Flat,
            config: export,
        },
    )?;
    info!(path = %target.path.display(), cells = drawn, "query results exported");
    Ok(drawn)
}

async fn export_csv(
    service: &CellService<PgCellStore>,
    export: &ExportConfig,
    csv: &std::path::Path,
    target: &ExportTarget,
) -> Result<Outcome, AppError> {
    let records = read_csv_path(csv)?;
    let cells = service.cells_by_cgi_list(&distinct_cgis(&records)).await?;
    let found: Vec<Cell> = cells.values().cloned().collect();
    let polygons = service.polygons_for(&found, target.kind).await?;

    let drawn = export_kmz(
        &target.path,
        &KmzDocument {
            cells: &cells,
            polygons: &polygons,
            layout: Layout::Timeline(&records),
            config: export,
        },
    )?;
    info!(
        csv = %csv.display(),
        path = %target.path.display(),
        observations = records.len(),
        cells = drawn,
        "observations exported"
    );
    Ok(Outcome::CsvExported {
        path: target.path.clone(),
        observations: records.len(),
        cells: drawn,
    })
}

async fn list_values(store: &PgCellStore, list: ListCmd) -> Result<Outcome, AppError> {
    let (title, items) = match list {
        ListCmd::Districts => ("Districts", store.list_districts().await?),
        ListCmd::Counties { district } => ("Counties", store.list_counties(district.as_deref()).await?),
        ListCmd::Operators => ("Operators", store.list_operator_brands().await?),
        ListCmd::Bands => ("Bands", store.list_bands().await?),
    };
    Ok(Outcome::Listing { title, items })
}
